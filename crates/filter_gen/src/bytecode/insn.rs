//! Classic Filter Instruction Format
//!
//! Classic instructions are 64 bits (8 bytes):
//!
//! ```text
//! +----------+--------+--------+------------+
//! |   code   |   jt   |   jf   |     k      |
//! | 16 bits  | 8 bits | 8 bits |  32 bits   |
//! +----------+--------+--------+------------+
//! ```
//!
//! `jt` and `jf` are forward offsets taken when a conditional jump is true or
//! false. Other classes leave them unused, which makes them good noise.
//!
//! [`Opcode`] is the structured form of a code: a class plus only the fields
//! that class defines. It is serialized to the raw 16-bit value with
//! [`Opcode::encode`] at the boundary.

use core::fmt;
use core::ops::{Deref, DerefMut};

use filter_abi::SockFilter;

use super::opcode::{
    AluOp, JmpOp, MemMnemonic, MemMode, MemSize, MiscOp, OpcodeClass, RetVal, SourceType,
};

/// A well-formed opcode built from the field taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `ld`, `ldx`, `st` or `stx`. `class` is always one of those four.
    Memory {
        class: OpcodeClass,
        size: MemSize,
        mode: MemMode,
        source: SourceType,
    },
    Alu {
        op: AluOp,
        source: SourceType,
    },
    Jmp {
        op: JmpOp,
        source: SourceType,
    },
    Ret {
        val: RetVal,
    },
    Misc {
        op: MiscOp,
    },
}

impl Opcode {
    /// Get the instruction class.
    #[inline]
    pub const fn class(self) -> OpcodeClass {
        match self {
            Self::Memory { class, .. } => class,
            Self::Alu { .. } => OpcodeClass::Alu,
            Self::Jmp { .. } => OpcodeClass::Jmp,
            Self::Ret { .. } => OpcodeClass::Ret,
            Self::Misc { .. } => OpcodeClass::Misc,
        }
    }

    /// Serialize to the raw code by OR-ing each field's bit pattern onto the
    /// class bits.
    #[inline]
    pub const fn encode(self) -> u16 {
        match self {
            Self::Memory {
                class,
                size,
                mode,
                source,
            } => class.bits() | size.bits() | mode.bits() | source.bits(),
            Self::Alu { op, source } => OpcodeClass::Alu.bits() | op.bits() | source.bits(),
            Self::Jmp { op, source } => OpcodeClass::Jmp.bits() | op.bits() | source.bits(),
            Self::Ret { val } => OpcodeClass::Ret.bits() | val.bits(),
            Self::Misc { op } => OpcodeClass::Misc.bits() | op.bits(),
        }
    }
}

impl From<Opcode> for u16 {
    fn from(opcode: Opcode) -> Self {
        opcode.encode()
    }
}

/// Single classic filter instruction (8 bytes).
///
/// Layout-identical to [`SockFilter`], so a slice of `Insn` can be handed to
/// the kernel as a `struct sock_filter` array.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Insn(SockFilter);

impl Insn {
    /// Size of an instruction in bytes
    pub const SIZE: usize = SockFilter::SIZE;

    /// An all-zero instruction (`ld #0`).
    pub const ZERO: Self = Self(SockFilter::new(0, 0, 0, 0));

    #[inline]
    pub const fn new(code: u16, jt: u8, jf: u8, k: u32) -> Self {
        Self(SockFilter::new(code, jt, jf, k))
    }

    #[inline]
    pub const fn raw(self) -> SockFilter {
        self.0
    }

    #[inline]
    pub const fn class(&self) -> OpcodeClass {
        OpcodeClass::from_code(self.0.code)
    }

    #[inline]
    pub const fn source_type(&self) -> SourceType {
        SourceType::from_code(self.0.code)
    }

    /// Memory size, for memory classes whose size field is defined.
    #[inline]
    pub const fn mem_size(&self) -> Option<MemSize> {
        if self.class().is_memory() {
            MemSize::from_code(self.0.code)
        } else {
            None
        }
    }

    /// Memory mode, for memory classes whose mode field is defined.
    #[inline]
    pub const fn mem_mode(&self) -> Option<MemMode> {
        if self.class().is_memory() {
            MemMode::from_code(self.0.code)
        } else {
            None
        }
    }

    #[inline]
    pub const fn alu_op(&self) -> Option<AluOp> {
        match self.class() {
            OpcodeClass::Alu => AluOp::from_code(self.0.code),
            _ => None,
        }
    }

    #[inline]
    pub const fn jmp_op(&self) -> Option<JmpOp> {
        match self.class() {
            OpcodeClass::Jmp => JmpOp::from_code(self.0.code),
            _ => None,
        }
    }

    #[inline]
    pub const fn ret_val(&self) -> Option<RetVal> {
        match self.class() {
            OpcodeClass::Ret => RetVal::from_code(self.0.code),
            _ => None,
        }
    }

    #[inline]
    pub const fn misc_op(&self) -> Option<MiscOp> {
        match self.class() {
            OpcodeClass::Misc => MiscOp::from_code(self.0.code),
            _ => None,
        }
    }

    /// Check if bits above the low byte are set. No classic opcode uses them.
    #[inline]
    pub const fn has_high_bits(&self) -> bool {
        self.0.code & 0xff00 != 0
    }

    fn fmt_source(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source_type() {
            SourceType::K => write!(f, "#{:#x}", self.0.k),
            SourceType::X => write!(f, "x"),
        }
    }
}

impl Deref for Insn {
    type Target = SockFilter;

    fn deref(&self) -> &SockFilter {
        &self.0
    }
}

impl DerefMut for Insn {
    fn deref_mut(&mut self) -> &mut SockFilter {
        &mut self.0
    }
}

impl From<SockFilter> for Insn {
    fn from(raw: SockFilter) -> Self {
        Self(raw)
    }
}

impl From<Insn> for SockFilter {
    fn from(insn: Insn) -> Self {
        insn.0
    }
}

impl fmt::Debug for Insn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Insn")
            .field("code", &format_args!("{:#06x}", self.0.code))
            .field("jt", &self.0.jt)
            .field("jf", &self.0.jf)
            .field("k", &format_args!("{:#010x}", self.0.k))
            .finish()
    }
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_high_bits() {
            let class = self.class();

            if let (Some(size), Some(mode)) = (self.mem_size(), self.mem_mode()) {
                return write!(f, "{} {} {:#x}", MemMnemonic(class, size), mode, self.0.k);
            }

            if let Some(op) = self.alu_op() {
                if op.is_unary() {
                    return write!(f, "{op}");
                }
                write!(f, "{op} ")?;
                return self.fmt_source(f);
            }

            if let Some(op) = self.jmp_op() {
                if !op.is_conditional() {
                    return write!(f, "ja +{}", self.0.k);
                }
                write!(f, "{op} ")?;
                self.fmt_source(f)?;
                return write!(f, ", +{}, +{}", self.0.jt, self.0.jf);
            }

            if let Some(val) = self.ret_val() {
                return match val {
                    RetVal::A => write!(f, "ret a"),
                    RetVal::X => write!(f, "ret x"),
                    RetVal::K => write!(f, "ret #{:#x}", self.0.k),
                };
            }

            if let Some(op) = self.misc_op() {
                return write!(f, "{op}");
            }
        }

        // Outside the taxonomy
        write!(
            f,
            "code={:#06x} jt={} jf={} k={:#x}",
            self.0.code, self.0.jt, self.0.jf, self.0.k
        )
    }
}
