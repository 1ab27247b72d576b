//! Classic Filter Opcode Fields
//!
//! Classic instructions carry a 16-bit code whose low byte is laid out as:
//!
//! ```text
//! +----------------+--------+--------------------+
//! |    4 bits      | 1 bit  |      3 bits        |
//! |   operation    | source |   instruction      |
//! |    code        |  type  |     class          |
//! +----------------+--------+--------------------+
//! ```
//!
//! Memory classes reuse the upper five bits as a 3-bit mode and a 2-bit size.
//! The size field overlaps the source bit, so `BPF_B | BPF_X` reads back as
//! the undefined size `0x18`.
//!
//! Every field below has an explicit bit-pattern table (`ALL`) that the
//! synthesizer draws from uniformly.

use core::fmt;

use filter_abi::{
    BPF_A, BPF_ABS, BPF_ADD, BPF_ALU, BPF_AND, BPF_B, BPF_DIV, BPF_H, BPF_IMM, BPF_IND, BPF_JA,
    BPF_JEQ, BPF_JGE, BPF_JGT, BPF_JMP, BPF_JSET, BPF_K, BPF_LD, BPF_LDX, BPF_LEN, BPF_LSH,
    BPF_MEM, BPF_MISC, BPF_MOD, BPF_MSH, BPF_MUL, BPF_NEG, BPF_OR, BPF_RET, BPF_RSH, BPF_ST,
    BPF_STX, BPF_SUB, BPF_TAX, BPF_TXA, BPF_W, BPF_X, BPF_XOR, bpf_class, bpf_miscop, bpf_mode,
    bpf_op, bpf_rval, bpf_size, bpf_src,
};

/// Instruction class (bits 0-2 of the code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum OpcodeClass {
    /// Load into the accumulator
    Ld = BPF_LD,
    /// Load into the index register
    Ldx = BPF_LDX,
    /// Store the accumulator into scratch memory
    St = BPF_ST,
    /// Store the index register into scratch memory
    Stx = BPF_STX,
    /// Arithmetic on the accumulator
    Alu = BPF_ALU,
    /// Conditional and unconditional jumps
    Jmp = BPF_JMP,
    /// Return from the filter
    Ret = BPF_RET,
    /// Register transfers
    Misc = BPF_MISC,
}

impl OpcodeClass {
    pub const ALL: [Self; 8] = [
        Self::Ld,
        Self::Ldx,
        Self::St,
        Self::Stx,
        Self::Alu,
        Self::Jmp,
        Self::Ret,
        Self::Misc,
    ];

    /// Extract the class from a code.
    ///
    /// The class field is three bits wide and all eight values are defined,
    /// so this never fails, whatever else is set in `code`.
    #[inline]
    pub const fn from_code(code: u16) -> Self {
        match bpf_class(code) {
            BPF_LD => Self::Ld,
            BPF_LDX => Self::Ldx,
            BPF_ST => Self::St,
            BPF_STX => Self::Stx,
            BPF_ALU => Self::Alu,
            BPF_JMP => Self::Jmp,
            BPF_RET => Self::Ret,
            _ => Self::Misc,
        }
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self as u16
    }

    /// Check if this class can address the ancillary data window.
    #[inline]
    pub const fn is_load(self) -> bool {
        matches!(self, Self::Ld | Self::Ldx)
    }

    #[inline]
    pub const fn is_store(self) -> bool {
        matches!(self, Self::St | Self::Stx)
    }

    /// Check if this class takes size and mode fields.
    #[inline]
    pub const fn is_memory(self) -> bool {
        self.is_load() || self.is_store()
    }

    #[inline]
    pub const fn is_jump(self) -> bool {
        matches!(self, Self::Jmp)
    }
}

/// Memory access size (bits 3-4 of the code for memory classes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MemSize {
    /// 32-bit word
    Word = BPF_W,
    /// 16-bit half word
    Half = BPF_H,
    /// 8-bit byte
    Byte = BPF_B,
}

impl MemSize {
    pub const ALL: [Self; 3] = [Self::Word, Self::Half, Self::Byte];

    #[inline]
    pub const fn from_code(code: u16) -> Option<Self> {
        match bpf_size(code) {
            BPF_W => Some(Self::Word),
            BPF_H => Some(Self::Half),
            BPF_B => Some(Self::Byte),
            _ => None,
        }
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self as u16
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::Word => "",
            Self::Half => "h",
            Self::Byte => "b",
        }
    }
}

/// Memory addressing mode (bits 5-7 of the code for memory classes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MemMode {
    /// Constant in `k`
    Imm = BPF_IMM,
    /// Packet data at offset `k`
    Abs = BPF_ABS,
    /// Packet data at offset `x + k`
    Ind = BPF_IND,
    /// Scratch memory slot `k`
    Mem = BPF_MEM,
    /// Packet length
    Len = BPF_LEN,
    /// IP header length nibble, `4 * (pkt[k] & 0xf)`
    Msh = BPF_MSH,
}

impl MemMode {
    pub const ALL: [Self; 6] = [
        Self::Imm,
        Self::Abs,
        Self::Ind,
        Self::Mem,
        Self::Len,
        Self::Msh,
    ];

    #[inline]
    pub const fn from_code(code: u16) -> Option<Self> {
        match bpf_mode(code) {
            BPF_IMM => Some(Self::Imm),
            BPF_ABS => Some(Self::Abs),
            BPF_IND => Some(Self::Ind),
            BPF_MEM => Some(Self::Mem),
            BPF_LEN => Some(Self::Len),
            BPF_MSH => Some(Self::Msh),
            _ => None,
        }
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for MemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Imm => "imm",
            Self::Abs => "abs",
            Self::Ind => "ind",
            Self::Mem => "mem",
            Self::Len => "len",
            Self::Msh => "msh",
        };
        write!(f, "{s}")
    }
}

/// ALU operation codes (bits 4-7 of the code for the ALU class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum AluOp {
    /// Add: a += src
    Add = BPF_ADD,
    /// Subtract: a -= src
    Sub = BPF_SUB,
    /// Multiply: a *= src
    Mul = BPF_MUL,
    /// Divide: a /= src
    Div = BPF_DIV,
    /// Bitwise OR: a |= src
    Or = BPF_OR,
    /// Bitwise AND: a &= src
    And = BPF_AND,
    /// Left shift: a <<= src
    Lsh = BPF_LSH,
    /// Right shift: a >>= src
    Rsh = BPF_RSH,
    /// Negate: a = -a
    Neg = BPF_NEG,
    /// Modulo: a %= src
    Mod = BPF_MOD,
    /// Bitwise XOR: a ^= src
    Xor = BPF_XOR,
}

impl AluOp {
    pub const ALL: [Self; 11] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Or,
        Self::And,
        Self::Lsh,
        Self::Rsh,
        Self::Neg,
        Self::Mod,
        Self::Xor,
    ];

    #[inline]
    pub const fn from_code(code: u16) -> Option<Self> {
        match bpf_op(code) {
            BPF_ADD => Some(Self::Add),
            BPF_SUB => Some(Self::Sub),
            BPF_MUL => Some(Self::Mul),
            BPF_DIV => Some(Self::Div),
            BPF_OR => Some(Self::Or),
            BPF_AND => Some(Self::And),
            BPF_LSH => Some(Self::Lsh),
            BPF_RSH => Some(Self::Rsh),
            BPF_NEG => Some(Self::Neg),
            BPF_MOD => Some(Self::Mod),
            BPF_XOR => Some(Self::Xor),
            _ => None,
        }
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self as u16
    }

    #[inline]
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::Neg)
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Or => "or",
            Self::And => "and",
            Self::Lsh => "lsh",
            Self::Rsh => "rsh",
            Self::Neg => "neg",
            Self::Mod => "mod",
            Self::Xor => "xor",
        };
        write!(f, "{s}")
    }
}

/// Jump operation codes (bits 4-7 of the code for the JMP class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum JmpOp {
    /// Unconditional jump by `k`
    Ja = BPF_JA,
    /// Jump if a == src
    Jeq = BPF_JEQ,
    /// Jump if a > src
    Jgt = BPF_JGT,
    /// Jump if a >= src
    Jge = BPF_JGE,
    /// Jump if a & src
    Jset = BPF_JSET,
}

impl JmpOp {
    pub const ALL: [Self; 5] = [Self::Ja, Self::Jeq, Self::Jgt, Self::Jge, Self::Jset];

    #[inline]
    pub const fn from_code(code: u16) -> Option<Self> {
        match bpf_op(code) {
            BPF_JA => Some(Self::Ja),
            BPF_JEQ => Some(Self::Jeq),
            BPF_JGT => Some(Self::Jgt),
            BPF_JGE => Some(Self::Jge),
            BPF_JSET => Some(Self::Jset),
            _ => None,
        }
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self as u16
    }

    #[inline]
    pub const fn is_conditional(self) -> bool {
        !matches!(self, Self::Ja)
    }
}

impl fmt::Display for JmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ja => "ja",
            Self::Jeq => "jeq",
            Self::Jgt => "jgt",
            Self::Jge => "jge",
            Self::Jset => "jset",
        };
        write!(f, "{s}")
    }
}

/// Operand source (bit 3 of the code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SourceType {
    /// Constant in `k`
    K = BPF_K,
    /// Index register
    X = BPF_X,
}

impl SourceType {
    pub const ALL: [Self; 2] = [Self::K, Self::X];

    #[inline]
    pub const fn from_code(code: u16) -> Self {
        if bpf_src(code) != 0 { Self::X } else { Self::K }
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self as u16
    }
}

/// Return value source (bits 3-4 of the code for the RET class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum RetVal {
    /// Return the accumulator
    A = BPF_A,
    /// Return the constant `k`
    K = BPF_K,
    /// Return the index register
    X = BPF_X,
}

impl RetVal {
    pub const ALL: [Self; 3] = [Self::A, Self::K, Self::X];

    #[inline]
    pub const fn from_code(code: u16) -> Option<Self> {
        match bpf_rval(code) {
            BPF_A => Some(Self::A),
            BPF_K => Some(Self::K),
            BPF_X => Some(Self::X),
            _ => None,
        }
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self as u16
    }
}

/// Register transfer operations (bits 3-7 of the code for the MISC class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MiscOp {
    /// x = a
    Tax = BPF_TAX,
    /// a = x
    Txa = BPF_TXA,
}

impl MiscOp {
    pub const ALL: [Self; 2] = [Self::Tax, Self::Txa];

    #[inline]
    pub const fn from_code(code: u16) -> Option<Self> {
        match bpf_miscop(code) {
            BPF_TAX => Some(Self::Tax),
            BPF_TXA => Some(Self::Txa),
            _ => None,
        }
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for MiscOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tax => write!(f, "tax"),
            Self::Txa => write!(f, "txa"),
        }
    }
}

/// Mnemonic for a load or store of the given class and size, e.g. `ldh`.
pub(crate) struct MemMnemonic(pub OpcodeClass, pub MemSize);

impl fmt::Display for MemMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.0 {
            OpcodeClass::Ld => "ld",
            OpcodeClass::Ldx => "ldx",
            OpcodeClass::St => "st",
            OpcodeClass::Stx => "stx",
            _ => return write!(f, "?"),
        };
        write!(f, "{base}{}", self.1.suffix())
    }
}
