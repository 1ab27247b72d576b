//! Program Assembler
//!
//! Builds whole programs out of synthesized opcodes. For each program the
//! assembler:
//!
//! 1. draws a length in `0..P::MAX_INSNS`,
//! 2. acquires storage for that many instructions, giving up without output
//!    if storage is unavailable,
//! 3. fills every slot: code, jump offsets for jumps, jump noise on any
//!    class, the operand, and the ancillary window remap for loads.
//!
//! Nothing validates jump targets. Out-of-bounds offsets and jump cycles are
//! part of the output.
//!
//! # Calling conventions
//!
//! - [`ProgramGenerator::fill_descriptor`] fills a descriptor the caller
//!   already holds. Only the instruction array is allocated.
//! - [`ProgramGenerator::generate_owned`] allocates the descriptor as well
//!   and transfers it, with its byte size, to the caller.

use core::marker::PhantomData;

use log::{debug, trace};

use crate::bytecode::insn::Insn;
use crate::bytecode::program::{FilterDescriptor, FilterProgram, OwnedProgram};
use crate::config::GeneratorConfig;
use crate::entropy::Entropy;
use crate::error::GenerateResult;
use crate::memory::{FilterMemory, Heap};
use crate::platform::{ActivePlatform, FilterPlatform};
use crate::synth::{SynthesizedOpcode, synthesize_opcode};

/// Operands of `ld`/`ldx` strictly between this floor and the ancillary
/// window base are candidates for remapping into the window.
pub const REMAP_FLOOR: u32 = 65_000;

/// Random classic filter program generator.
///
/// # Type Parameters
///
/// - `R`: the random source; any [`rand::RngCore`].
/// - `M`: where program storage comes from. Defaults to [`Heap`].
/// - `P`: the platform limits. Defaults to [`ActivePlatform`].
pub struct ProgramGenerator<R, M = Heap, P = ActivePlatform> {
    rng: R,
    memory: M,
    config: GeneratorConfig,
    _platform: PhantomData<P>,
}

impl<R: Entropy> ProgramGenerator<R> {
    /// Create a generator with default odds, heap storage and Linux limits.
    pub fn new(rng: R) -> Self {
        Self::with_memory(rng, Heap)
    }
}

impl<R: Entropy, M: FilterMemory, P: FilterPlatform> ProgramGenerator<R, M, P> {
    /// Create a generator with the given storage.
    pub fn with_memory(rng: R, memory: M) -> Self {
        Self {
            rng,
            memory,
            config: GeneratorConfig::default(),
            _platform: PhantomData,
        }
    }

    /// Replace the generation odds.
    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    #[inline]
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn into_parts(self) -> (R, M) {
        (self.rng, self.memory)
    }

    /// Synthesize a single opcode.
    pub fn synthesize_opcode(&mut self) -> SynthesizedOpcode {
        synthesize_opcode(&mut self.rng, &self.config)
    }

    /// Generate a single instruction slot.
    pub fn generate_insn(&mut self) -> Insn {
        let mut insn = Insn::ZERO;
        insn.code = self.synthesize_opcode().code();

        // Class of the final code; a corrupted opcode may land anywhere.
        let class = insn.class();

        if class.is_jump() {
            insn.jt = self.rng.byte();
            insn.jf = self.rng.byte();
        }

        if self.rng.one_in(self.config.jt_noise) {
            insn.jt |= self.rng.byte();
        }
        if self.rng.one_in(self.config.jf_noise) {
            insn.jf |= self.rng.byte();
        }

        insn.k = if self.rng.one_in(self.config.zero_operand) {
            0
        } else {
            self.rng.word()
        };

        // Uniform 32-bit operands almost never hit the ancillary window.
        if class.is_load()
            && insn.k > REMAP_FLOOR
            && insn.k < P::AD_BASE
            && self.rng.one_in(self.config.extension_remap)
        {
            let k = P::AD_BASE.wrapping_add(self.rng.below(P::AD_MAX));
            trace!("remapped {class:?} operand {:#x} to {k:#x}", insn.k);
            insn.k = k;
        }

        insn
    }

    /// Generate a program of random length.
    pub fn generate(&mut self) -> GenerateResult<FilterProgram> {
        let len = self.rng.below(u32::from(P::MAX_INSNS)) as usize;

        let mut insns = self.memory.allocate_filter(len).inspect_err(|err| {
            debug!("no program generated: {err}");
        })?;

        for _ in 0..len {
            let insn = self.generate_insn();
            insns.push(insn);
        }

        trace!("generated {len} instruction program for {}", P::NAME);
        Ok(FilterProgram::new(insns))
    }

    /// Generate a program into a descriptor the caller already holds.
    ///
    /// The descriptor is detached first. If storage for the instruction array
    /// cannot be acquired it stays detached.
    pub fn fill_descriptor(&mut self, descriptor: &mut FilterDescriptor) -> GenerateResult<()> {
        descriptor.detach();
        let program = self.generate()?;
        descriptor.attach(program);
        Ok(())
    }

    /// Generate a program into a freshly allocated descriptor owned by the
    /// caller.
    ///
    /// If either allocation fails, nothing acquired by this call survives.
    pub fn generate_owned(&mut self) -> GenerateResult<OwnedProgram> {
        let mut descriptor = self.memory.allocate_descriptor().inspect_err(|err| {
            debug!("no program generated: {err}");
        })?;

        self.fill_descriptor(&mut descriptor)?;
        Ok(OwnedProgram::new(descriptor))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::bytecode::opcode::OpcodeClass;

    #[test]
    fn constant_source_builds_all_jump_program() {
        let mut generator = ProgramGenerator::new(StepRng::new(5, 0));
        let program = generator.generate().expect("heap allocation");

        assert_eq!(program.len(), 5);
        for insn in &program {
            assert_eq!(insn.raw(), filter_abi::SockFilter::new(0x0d, 5, 5, 5));
        }
    }

    #[test]
    fn seeded_programs_are_reproducible() {
        let mut a = ProgramGenerator::new(SmallRng::seed_from_u64(42));
        let mut b = ProgramGenerator::new(SmallRng::seed_from_u64(42));

        for _ in 0..8 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn noise_free_non_jumps_keep_zero_offsets() {
        let mut generator = ProgramGenerator::new(SmallRng::seed_from_u64(7))
            .with_config(GeneratorConfig::without_noise());

        for _ in 0..4096 {
            let insn = generator.generate_insn();
            if insn.class() != OpcodeClass::Jmp {
                assert_eq!((insn.jt, insn.jf), (0, 0));
            }
        }
    }

    #[test]
    fn disabled_remap_leaves_large_load_operands() {
        let config = GeneratorConfig {
            extension_remap: 0,
            ..GeneratorConfig::without_noise()
        };
        let mut generator = ProgramGenerator::new(SmallRng::seed_from_u64(11)).with_config(config);
        assert_eq!(generator.config(), &config);

        for _ in 0..4096 {
            let insn = generator.generate_insn();
            assert!(!ActivePlatform::in_ad_window(insn.k));
        }
    }

    #[test]
    fn into_parts_returns_the_source() {
        let generator = ProgramGenerator::new(StepRng::new(9, 1));
        let (mut rng, _memory) = generator.into_parts();
        assert_eq!(rand::RngCore::next_u32(&mut rng), 9);
    }
}
