//! Generation Errors

use thiserror::Error;

use crate::memory::AllocError;

/// Errors that can occur while generating a program.
///
/// Running out of memory is the only failure. Malformed opcodes, wild jump
/// offsets and out-of-range operands are generated on purpose and are never
/// reported as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("out of memory: could not allocate {len} filter instructions")]
    FilterAllocation { len: usize },

    #[error("out of memory: could not allocate a program descriptor")]
    DescriptorAllocation,
}

impl From<AllocError> for GenerateError {
    fn from(err: AllocError) -> Self {
        match err {
            AllocError::Filter { len } => Self::FilterAllocation { len },
            AllocError::Descriptor => Self::DescriptorAllocation,
        }
    }
}

pub type GenerateResult<T> = Result<T, GenerateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_errors_map_to_variants() {
        assert_eq!(
            GenerateError::from(AllocError::Filter { len: 3 }),
            GenerateError::FilterAllocation { len: 3 }
        );
        assert_eq!(
            GenerateError::from(AllocError::Descriptor),
            GenerateError::DescriptorAllocation
        );
    }
}
