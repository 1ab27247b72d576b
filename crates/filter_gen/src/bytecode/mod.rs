//! Classic Filter Bytecode
//!
//! The classic packet-filter instruction set, as accepted by socket filter
//! attachment and seccomp policy installation.
//!
//! # Architecture
//!
//! - Accumulator `a`, index register `x`, 16 scratch memory slots
//! - 32-bit operations only
//! - 8-byte instruction format with separate true/false jump offsets
//!
//! Jumps are forward-only and relative in the real semantics; nothing here
//! enforces that.

pub mod insn;
pub mod opcode;
pub mod program;

pub use insn::{Insn, Opcode};
pub use opcode::{AluOp, JmpOp, MemMode, MemSize, MiscOp, OpcodeClass, RetVal, SourceType};
pub use program::{FilterDescriptor, FilterProgram, OwnedProgram};
