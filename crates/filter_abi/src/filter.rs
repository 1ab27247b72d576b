use core::ptr;

pub const BPF_LD: u16 = 0x00;
pub const BPF_LDX: u16 = 0x01;
pub const BPF_ST: u16 = 0x02;
pub const BPF_STX: u16 = 0x03;
pub const BPF_ALU: u16 = 0x04;
pub const BPF_JMP: u16 = 0x05;
pub const BPF_RET: u16 = 0x06;
pub const BPF_MISC: u16 = 0x07;

pub const BPF_W: u16 = 0x00;
pub const BPF_H: u16 = 0x08;
pub const BPF_B: u16 = 0x10;

pub const BPF_IMM: u16 = 0x00;
pub const BPF_ABS: u16 = 0x20;
pub const BPF_IND: u16 = 0x40;
pub const BPF_MEM: u16 = 0x60;
pub const BPF_LEN: u16 = 0x80;
pub const BPF_MSH: u16 = 0xa0;

pub const BPF_ADD: u16 = 0x00;
pub const BPF_SUB: u16 = 0x10;
pub const BPF_MUL: u16 = 0x20;
pub const BPF_DIV: u16 = 0x30;
pub const BPF_OR: u16 = 0x40;
pub const BPF_AND: u16 = 0x50;
pub const BPF_LSH: u16 = 0x60;
pub const BPF_RSH: u16 = 0x70;
pub const BPF_NEG: u16 = 0x80;
pub const BPF_MOD: u16 = 0x90;
pub const BPF_XOR: u16 = 0xa0;

pub const BPF_JA: u16 = 0x00;
pub const BPF_JEQ: u16 = 0x10;
pub const BPF_JGT: u16 = 0x20;
pub const BPF_JGE: u16 = 0x30;
pub const BPF_JSET: u16 = 0x40;

pub const BPF_K: u16 = 0x00;
pub const BPF_X: u16 = 0x08;
pub const BPF_A: u16 = 0x10;

pub const BPF_TAX: u16 = 0x00;
pub const BPF_TXA: u16 = 0x80;

#[inline]
pub const fn bpf_class(code: u16) -> u16 {
    code & 0x07
}

#[inline]
pub const fn bpf_size(code: u16) -> u16 {
    code & 0x18
}

#[inline]
pub const fn bpf_mode(code: u16) -> u16 {
    code & 0xe0
}

#[inline]
pub const fn bpf_op(code: u16) -> u16 {
    code & 0xf0
}

#[inline]
pub const fn bpf_src(code: u16) -> u16 {
    code & 0x08
}

#[inline]
pub const fn bpf_rval(code: u16) -> u16 {
    code & 0x18
}

#[inline]
pub const fn bpf_miscop(code: u16) -> u16 {
    code & 0xf8
}

/// One classic filter instruction, `struct sock_filter`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SockFilter {
    pub code: u16,
    pub jt: u8,
    pub jf: u8,
    pub k: u32,
}

impl SockFilter {
    pub const SIZE: usize = 8;

    #[must_use]
    pub const fn new(code: u16, jt: u8, jf: u8, k: u32) -> Self {
        Self { code, jt, jf, k }
    }

    /// Little-endian wire encoding, as the kernel reads it on x86_64/aarch64.
    #[must_use]
    pub const fn to_le_bytes(self) -> [u8; Self::SIZE] {
        let code = self.code.to_le_bytes();
        let k = self.k.to_le_bytes();
        [code[0], code[1], self.jt, self.jf, k[0], k[1], k[2], k[3]]
    }
}

/// Program descriptor, `struct sock_fprog`.
///
/// This is the layout handed to `setsockopt(SO_ATTACH_FILTER)` and
/// `prctl(PR_SET_SECCOMP)`. The pointer is not owned.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SockFprog {
    pub len: u16,
    pub filter: *mut SockFilter,
}

impl Default for SockFprog {
    fn default() -> Self {
        Self {
            len: 0,
            filter: ptr::null_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use core::mem::size_of;

    use super::*;

    #[test]
    fn instruction_size() {
        assert_eq!(size_of::<SockFilter>(), SockFilter::SIZE);
    }

    #[test]
    fn field_extraction() {
        let code = BPF_LD | BPF_B | BPF_ABS;
        assert_eq!(bpf_class(code), BPF_LD);
        assert_eq!(bpf_size(code), BPF_B);
        assert_eq!(bpf_mode(code), BPF_ABS);
        assert_eq!(bpf_op(BPF_JMP | BPF_JSET | BPF_X), BPF_JSET);
        assert_eq!(bpf_src(BPF_JMP | BPF_JSET | BPF_X), BPF_X);
        assert_eq!(bpf_miscop(BPF_MISC | BPF_TXA), BPF_TXA);
    }

    #[test]
    fn wire_encoding() {
        let insn = SockFilter::new(0x0015, 1, 2, 0xdead_beef);
        assert_eq!(
            insn.to_le_bytes(),
            [0x15, 0x00, 0x01, 0x02, 0xef, 0xbe, 0xad, 0xde]
        );
    }

    #[test]
    fn empty_descriptor() {
        let fprog = SockFprog::default();
        assert_eq!(fprog.len, 0);
        assert!(fprog.filter.is_null());
    }
}
