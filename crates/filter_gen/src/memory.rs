//! Program Storage
//!
//! Storage for generated programs is acquired through [`FilterMemory`] so
//! that allocation failure is an ordinary, reportable outcome. [`Heap`]
//! reserves instruction arrays fallibly from the global allocator.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use thiserror::Error;

use crate::bytecode::insn::Insn;
use crate::bytecode::program::FilterDescriptor;

/// Storage could not be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error("could not allocate {len} filter instructions")]
    Filter { len: usize },
    #[error("could not allocate a program descriptor")]
    Descriptor,
}

/// Source of storage for programs and their descriptors.
pub trait FilterMemory {
    /// Acquire an empty instruction array with room for `len` instructions.
    fn allocate_filter(&mut self, len: usize) -> Result<Vec<Insn>, AllocError>;

    /// Acquire a fresh, detached program descriptor.
    fn allocate_descriptor(&mut self) -> Result<Box<FilterDescriptor>, AllocError>;
}

/// Global allocator storage.
///
/// Instruction arrays are reserved with [`Vec::try_reserve_exact`]. Boxing a
/// descriptor goes through the infallible allocation path, which aborts on
/// exhaustion instead of reporting it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heap;

impl FilterMemory for Heap {
    fn allocate_filter(&mut self, len: usize) -> Result<Vec<Insn>, AllocError> {
        let mut insns = Vec::new();
        insns
            .try_reserve_exact(len)
            .map_err(|_| AllocError::Filter { len })?;
        Ok(insns)
    }

    fn allocate_descriptor(&mut self) -> Result<Box<FilterDescriptor>, AllocError> {
        Ok(Box::default())
    }
}

impl<M: FilterMemory + ?Sized> FilterMemory for &mut M {
    fn allocate_filter(&mut self, len: usize) -> Result<Vec<Insn>, AllocError> {
        (**self).allocate_filter(len)
    }

    fn allocate_descriptor(&mut self) -> Result<Box<FilterDescriptor>, AllocError> {
        (**self).allocate_descriptor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_reserves_exact_capacity() {
        let insns = Heap.allocate_filter(17).expect("small allocation");
        assert!(insns.is_empty());
        assert!(insns.capacity() >= 17);
    }

    #[test]
    fn heap_reports_impossible_reservation() {
        let len = usize::MAX / Insn::SIZE;
        assert_eq!(Heap.allocate_filter(len), Err(AllocError::Filter { len }));
    }

    #[test]
    fn heap_descriptor_is_detached() {
        let descriptor = Heap.allocate_descriptor().expect("descriptor");
        assert!(!descriptor.is_attached());
        assert_eq!(descriptor.len(), 0);
    }
}
