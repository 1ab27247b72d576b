//! Opcode Synthesizer
//!
//! Draws a class uniformly, then draws each field that class defines from
//! its table and composes a structured [`Opcode`]. One draw in
//! `corrupt_opcode` additionally ORs a random 16-bit mask over the result.
//! The mask covers the class bits as well, so a corrupted code may decode
//! to a different class than the one drawn.
//!
//! Synthesis never fails and never retries.

use crate::bytecode::insn::Opcode;
use crate::bytecode::opcode::{
    AluOp, JmpOp, MemMode, MemSize, MiscOp, OpcodeClass, RetVal, SourceType,
};
use crate::config::GeneratorConfig;
use crate::entropy::Entropy;

/// A synthesized opcode and the corruption applied to it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesizedOpcode {
    /// The well-formed opcode built from the field tables.
    pub opcode: Opcode,
    /// Bits ORed over the encoded opcode.
    pub corruption: Option<u16>,
}

impl SynthesizedOpcode {
    /// The final 16-bit code.
    #[inline]
    pub const fn code(&self) -> u16 {
        match self.corruption {
            Some(mask) => self.opcode.encode() | mask,
            None => self.opcode.encode(),
        }
    }

    /// Class of the final code, which differs from `opcode.class()` when the
    /// corruption mask sets class bits.
    #[inline]
    pub const fn class(&self) -> OpcodeClass {
        OpcodeClass::from_code(self.code())
    }

    #[inline]
    pub const fn is_corrupted(&self) -> bool {
        self.corruption.is_some()
    }
}

/// Draw the fields of one opcode.
///
/// Draw order: class, then the class's fields in declaration order, then the
/// corruption coin and mask.
pub fn synthesize_opcode<R: Entropy + ?Sized>(
    rng: &mut R,
    config: &GeneratorConfig,
) -> SynthesizedOpcode {
    let opcode = match rng.pick(&OpcodeClass::ALL) {
        class @ (OpcodeClass::Ld | OpcodeClass::Ldx | OpcodeClass::St | OpcodeClass::Stx) => {
            Opcode::Memory {
                class,
                size: rng.pick(&MemSize::ALL),
                mode: rng.pick(&MemMode::ALL),
                source: rng.pick(&SourceType::ALL),
            }
        }
        OpcodeClass::Alu => Opcode::Alu {
            op: rng.pick(&AluOp::ALL),
            source: rng.pick(&SourceType::ALL),
        },
        OpcodeClass::Jmp => Opcode::Jmp {
            op: rng.pick(&JmpOp::ALL),
            source: rng.pick(&SourceType::ALL),
        },
        OpcodeClass::Ret => Opcode::Ret {
            val: rng.pick(&RetVal::ALL),
        },
        OpcodeClass::Misc => Opcode::Misc {
            op: rng.pick(&MiscOp::ALL),
        },
    };

    let corruption = if rng.one_in(config.corrupt_opcode) {
        Some(rng.half_word())
    } else {
        None
    };

    SynthesizedOpcode { opcode, corruption }
}
