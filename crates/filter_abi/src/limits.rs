/// Maximum number of instructions in a classic filter program.
pub const BPF_MAXINSNS: u16 = 4096;

/// Base offset of the ancillary data window addressed by `ld`/`ldx`.
pub const SKF_AD_OFF: i32 = -0x1000;

/// Number of ancillary data slots above [`SKF_AD_OFF`].
pub const SKF_AD_MAX: u32 = 56;
