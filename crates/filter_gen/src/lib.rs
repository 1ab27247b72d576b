//! Random Classic Filter Program Generator
//!
//! This crate produces syntactically random classic packet-filter programs
//! for fuzzing the kernel code that accepts them: socket filter attachment,
//! seccomp policy installation and the interpreters and JITs behind them.
//!
//! Programs are plausible enough to get past shallow validation, and
//! frequently break deeper invariants: wild jump offsets, reserved opcode
//! bits, out-of-range operands.
//!
//! # Generation
//!
//! | Step | Odds (default) |
//! |------|----------------|
//! | Program length | uniform in `0..MAX_INSNS` |
//! | Class and fields | uniform per field table |
//! | Opcode corruption | 1 in 10 |
//! | Jump offsets | random bytes on `jmp` |
//! | `jt`/`jf` noise | 1 in 10 each, any class |
//! | Zero operand | 1 in 2 |
//! | Ancillary window remap | 1 in 2, large `ld`/`ldx` operands |
//!
//! # Modules
//!
//! - [`bytecode`] - Field taxonomy, instructions and program descriptors
//! - [`synth`] - Opcode synthesizer
//! - [`assembler`] - Whole-program generation
//! - [`platform`] - Compile-time limits of the target kernel
//! - [`config`] - Runtime odds
//! - [`entropy`] - Random source helpers
//! - [`memory`] - Fallible program storage
//!
//! # Quick Start
//!
//! ```rust
//! use filter_gen::ProgramGenerator;
//! use filter_gen::bytecode::FilterDescriptor;
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let mut generator = ProgramGenerator::new(SmallRng::seed_from_u64(1));
//!
//! // Caller-held descriptor, filled in place
//! let mut descriptor = FilterDescriptor::new();
//! if generator.fill_descriptor(&mut descriptor).is_ok() {
//!     let fprog = descriptor.as_sock_fprog();
//!     assert_eq!(usize::from(fprog.len), descriptor.len());
//! }
//!
//! // Descriptor allocated for the caller
//! if let Ok(owned) = generator.generate_owned() {
//!     assert_eq!(owned.byte_len(), core::mem::size_of::<filter_abi::SockFprog>());
//! }
//! ```

#![no_std]

extern crate alloc;

pub mod assembler;
pub mod bytecode;
pub mod config;
pub mod entropy;
pub mod error;
pub mod memory;
pub mod platform;
pub mod synth;

pub use assembler::ProgramGenerator;
pub use config::GeneratorConfig;
pub use entropy::Entropy;
pub use error::{GenerateError, GenerateResult};
pub use memory::{AllocError, FilterMemory, Heap};
pub use platform::{ActivePlatform, FilterPlatform, LinuxPlatform};
