//! Classic Filter Program Representation
//!
//! A generated program is handed out in one of three shapes:
//!
//! - [`FilterProgram`]: the owned instruction sequence.
//! - [`FilterDescriptor`]: a `sock_fprog`-shaped descriptor that owns its
//!   instruction array. Callers that already hold a descriptor have it
//!   filled in place.
//! - [`OwnedProgram`]: a freshly allocated descriptor transferred to the
//!   caller together with its byte size, for harnesses that marshal an
//!   "address + length" pair into a system call argument.
//!
//! The length is kept in the descriptor's `u16` width, so a program never
//! holds more than `u16::MAX` instructions.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::mem::size_of;
use core::ptr;

use filter_abi::{SockFilter, SockFprog};

use super::insn::Insn;

/// Owned, fully populated instruction sequence.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FilterProgram {
    insns: Vec<Insn>,
}

impl FilterProgram {
    /// Wrap an instruction sequence.
    ///
    /// # Panics
    ///
    /// Panics if `insns` holds more than `u16::MAX` instructions.
    pub fn new(insns: Vec<Insn>) -> Self {
        assert!(
            insns.len() <= usize::from(u16::MAX),
            "classic programs hold at most {} instructions",
            u16::MAX
        );
        Self { insns }
    }

    /// Get the instruction stream.
    #[inline]
    pub fn instructions(&self) -> &[Insn] {
        &self.insns
    }

    /// Get the number of instructions.
    #[inline]
    pub fn len(&self) -> usize {
        self.insns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.insns.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Insn> {
        self.insns.iter()
    }

    pub fn into_instructions(self) -> Vec<Insn> {
        self.insns
    }

    /// Little-endian `sock_filter` array, as it would be copied from user
    /// memory.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.insns
            .iter()
            .flat_map(|insn| insn.raw().to_le_bytes())
            .collect()
    }
}

impl<'a> IntoIterator for &'a FilterProgram {
    type Item = &'a Insn;
    type IntoIter = core::slice::Iter<'a, Insn>;

    fn into_iter(self) -> Self::IntoIter {
        self.insns.iter()
    }
}

impl fmt::Debug for FilterProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterProgram")
            .field("insn_count", &self.insns.len())
            .finish()
    }
}

impl fmt::Display for FilterProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, insn) in self.insns.iter().enumerate() {
            writeln!(f, "{idx:4}: {insn}")?;
        }
        Ok(())
    }
}

/// Program descriptor, the owning counterpart of `struct sock_fprog`.
///
/// A detached descriptor has no instruction array and a length of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDescriptor {
    len: u16,
    filter: Option<FilterProgram>,
}

impl FilterDescriptor {
    /// Byte size of the raw descriptor handed across the system call
    /// boundary.
    pub const RAW_SIZE: usize = size_of::<SockFprog>();

    pub const fn new() -> Self {
        Self {
            len: 0,
            filter: None,
        }
    }

    /// Instruction count recorded in the descriptor.
    #[inline]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if an instruction array is attached.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.filter.is_some()
    }

    #[inline]
    pub fn program(&self) -> Option<&FilterProgram> {
        self.filter.as_ref()
    }

    #[inline]
    pub fn instructions(&self) -> Option<&[Insn]> {
        self.filter.as_ref().map(FilterProgram::instructions)
    }

    /// Attach `program`, replacing any previous one.
    pub fn attach(&mut self, program: FilterProgram) {
        // FilterProgram::new bounds the length
        self.len = program.len() as u16;
        self.filter = Some(program);
    }

    /// Remove the instruction array, leaving the descriptor detached.
    pub fn detach(&mut self) -> Option<FilterProgram> {
        self.len = 0;
        self.filter.take()
    }

    /// Raw `sock_fprog` view for marshaling.
    ///
    /// The returned pointer borrows from `self`; it stays valid until the
    /// descriptor is modified or dropped. A detached descriptor yields a
    /// null filter pointer.
    pub fn as_sock_fprog(&mut self) -> SockFprog {
        let filter = match self.filter.as_mut() {
            Some(program) => program.insns.as_mut_ptr().cast::<SockFilter>(),
            None => ptr::null_mut(),
        };

        SockFprog {
            len: self.len,
            filter,
        }
    }
}

/// A descriptor allocated by the generator and transferred to the caller.
#[derive(Debug)]
pub struct OwnedProgram {
    descriptor: Box<FilterDescriptor>,
}

impl OwnedProgram {
    pub(crate) fn new(descriptor: Box<FilterDescriptor>) -> Self {
        Self { descriptor }
    }

    #[inline]
    pub fn descriptor(&self) -> &FilterDescriptor {
        &self.descriptor
    }

    #[inline]
    pub fn descriptor_mut(&mut self) -> &mut FilterDescriptor {
        &mut self.descriptor
    }

    /// Byte size of the descriptor, reported alongside its address.
    #[inline]
    pub const fn byte_len(&self) -> usize {
        FilterDescriptor::RAW_SIZE
    }

    pub fn into_descriptor(self) -> Box<FilterDescriptor> {
        self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    fn sample() -> FilterProgram {
        FilterProgram::new(vec![
            Insn::new(0x28, 0, 0, 12),
            Insn::new(0x15, 0, 1, 0x800),
            Insn::new(0x06, 0, 0, 0xffff),
        ])
    }

    #[test]
    fn program_accessors() {
        let program = sample();
        assert_eq!(program.len(), 3);
        assert!(!program.is_empty());
        assert_eq!(program.instructions()[1].jf, 1);
        assert_eq!(program.iter().count(), 3);

        let insns = program.into_instructions();
        assert_eq!(insns[2], Insn::new(0x06, 0, 0, 0xffff));
    }

    #[test]
    fn program_bytes() {
        let bytes = sample().to_bytes();
        assert_eq!(bytes.len(), 3 * Insn::SIZE);
        assert_eq!(&bytes[8..16], &[0x15, 0x00, 0x00, 0x01, 0x00, 0x08, 0x00, 0x00]);
    }

    #[test]
    fn program_listing() {
        let listing = sample().to_string();
        assert_eq!(
            listing,
            "   0: ldh abs 0xc\n   1: jeq #0x800, +0, +1\n   2: ret #0xffff\n"
        );
    }

    #[test]
    fn descriptor_attach_detach() {
        let mut descriptor = FilterDescriptor::new();
        assert!(!descriptor.is_attached());

        descriptor.attach(sample());
        assert!(descriptor.is_attached());
        assert_eq!(descriptor.len(), 3);
        assert_eq!(descriptor.instructions().map(<[Insn]>::len), Some(3));

        let program = descriptor.detach().expect("attached program");
        assert_eq!(program.len(), 3);
        assert!(descriptor.is_empty());
        assert!(descriptor.program().is_none());
    }

    #[test]
    fn raw_view_points_at_instructions() {
        let mut descriptor = FilterDescriptor::new();
        assert!(descriptor.as_sock_fprog().filter.is_null());

        descriptor.attach(sample());
        let raw = descriptor.as_sock_fprog();
        assert_eq!(raw.len, 3);
        let expected = descriptor
            .instructions()
            .map(|insns| insns.as_ptr().cast::<SockFilter>());
        assert_eq!(Some(raw.filter.cast_const()), expected);
    }

    #[test]
    fn raw_size_matches_abi() {
        assert_eq!(FilterDescriptor::RAW_SIZE, size_of::<SockFprog>());
        let owned = OwnedProgram::new(Box::default());
        assert_eq!(owned.byte_len(), FilterDescriptor::RAW_SIZE);
    }
}
