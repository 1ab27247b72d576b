//! Generation Property Tests
//!
//! Invariants that hold for every seed, checked with proptest.

mod common;

use filter_abi::{BPF_B, BPF_X, bpf_class, bpf_size};
use filter_gen::bytecode::{FilterProgram, OpcodeClass, SourceType};
use filter_gen::{ActivePlatform, FilterPlatform, GeneratorConfig, ProgramGenerator};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use common::Script;

fn generate(seed: u64, config: GeneratorConfig) -> FilterProgram {
    ProgramGenerator::new(SmallRng::seed_from_u64(seed))
        .with_config(config)
        .generate()
        .expect("heap allocation")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn length_below_max(seed: u64) {
        let program = generate(seed, GeneratorConfig::default());
        prop_assert!(program.len() < usize::from(ActivePlatform::MAX_INSNS));
    }

    #[test]
    fn class_always_decodes(seed: u64) {
        let program = generate(seed, GeneratorConfig::default());
        for insn in &program {
            let class = insn.class();
            prop_assert!(OpcodeClass::ALL.contains(&class));
            prop_assert_eq!(class.bits(), bpf_class(insn.code));
        }
    }

    #[test]
    fn uncorrupted_fields_come_from_tables(seed: u64) {
        let program = generate(seed, GeneratorConfig::without_noise());
        for insn in &program {
            prop_assert!(!insn.has_high_bits());
            match insn.class() {
                class if class.is_memory() => {
                    prop_assert!(insn.mem_mode().is_some());
                    // The source bit doubles as the low size bit
                    prop_assert!(
                        insn.mem_size().is_some()
                            || (bpf_size(insn.code) == BPF_B | BPF_X
                                && insn.source_type() == SourceType::X)
                    );
                }
                OpcodeClass::Alu => prop_assert!(insn.alu_op().is_some()),
                OpcodeClass::Jmp => prop_assert!(insn.jmp_op().is_some()),
                OpcodeClass::Ret => prop_assert!(insn.ret_val().is_some()),
                OpcodeClass::Misc => prop_assert!(insn.misc_op().is_some()),
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn noise_free_non_jumps_have_zero_offsets(seed: u64) {
        let program = generate(seed, GeneratorConfig::without_noise());
        for insn in &program {
            if !insn.class().is_jump() {
                prop_assert_eq!((insn.jt, insn.jf), (0, 0));
            }
        }
    }

    #[test]
    fn remap_lands_in_window_or_keeps_operand(
        load in 0u32..2,
        k in 65_001u32..ActivePlatform::AD_BASE,
        coin: u32,
        slot: u32,
    ) {
        // len=1; ld/ldx w imm k; no corruption; no noise; nonzero k
        let draws = [1, load, 0, 0, 0, 1, 1, 1, 1, k, coin, slot];
        let mut generator = ProgramGenerator::new(Script::new(&draws));
        let program = generator.generate().expect("heap allocation");

        let out = program.instructions()[0].k;
        prop_assert!(out == k || ActivePlatform::in_ad_window(out));
        if coin % 2 == 0 {
            prop_assert_eq!(out, ActivePlatform::AD_BASE + slot % ActivePlatform::AD_MAX);
        } else {
            prop_assert_eq!(out, k);
        }
    }
}
