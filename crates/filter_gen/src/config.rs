//! Generator Configuration
//!
//! Every random decision with a weighted exception path is expressed as
//! "one in N" odds. `0` disables the path entirely and skips its draw.

/// Odds of each deliberate deviation from a well-formed program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneratorConfig {
    /// OR a random 16-bit value over a synthesized opcode.
    pub corrupt_opcode: u32,
    /// OR a random byte into `jt`, on any class.
    pub jt_noise: u32,
    /// OR a random byte into `jf`, on any class.
    pub jf_noise: u32,
    /// Leave `k` at zero instead of drawing 32 random bits.
    pub zero_operand: u32,
    /// Steer a large `ld`/`ldx` operand into the ancillary data window.
    pub extension_remap: u32,
}

impl GeneratorConfig {
    pub const DEFAULT: Self = Self {
        corrupt_opcode: 10,
        jt_noise: 10,
        jf_noise: 10,
        zero_operand: 2,
        extension_remap: 2,
    };

    /// Defaults with the opcode corruption and jump noise paths disabled.
    ///
    /// Programs generated this way only contain codes from the field
    /// taxonomy, and `jt`/`jf` are zero outside of jumps.
    pub const fn without_noise() -> Self {
        Self {
            corrupt_opcode: 0,
            jt_noise: 0,
            jf_noise: 0,
            ..Self::DEFAULT
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
