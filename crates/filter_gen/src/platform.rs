//! Target Platform Limits
//!
//! Compile-time constants describing the kernel that will receive the
//! generated programs. Generation is parameterized over a platform the same
//! way programs are; the defaults describe Linux.
//!
//! # Example
//!
//! ```rust
//! use filter_gen::platform::{ActivePlatform, FilterPlatform};
//!
//! assert_eq!(ActivePlatform::MAX_INSNS, 4096);
//! assert_eq!(ActivePlatform::AD_BASE, 0xffff_f000);
//! ```

use filter_abi::{BPF_MAXINSNS, SKF_AD_MAX, SKF_AD_OFF};

/// Limits of the classic filter implementation being fuzzed.
pub trait FilterPlatform: 'static {
    /// Exclusive upper bound on generated program length.
    ///
    /// Must be non-zero.
    const MAX_INSNS: u16;

    /// Signed base offset of the ancillary data window.
    const AD_OFF: i32;

    /// Number of addressable slots in the ancillary data window.
    ///
    /// Must be non-zero.
    const AD_MAX: u32;

    /// Platform name for diagnostics and logging.
    const NAME: &'static str;

    /// First `k` value inside the ancillary data window.
    const AD_BASE: u32 = Self::AD_OFF as u32;

    /// Check if `k` addresses the ancillary data window.
    #[inline]
    fn in_ad_window(k: u32) -> bool {
        k >= Self::AD_BASE && k - Self::AD_BASE < Self::AD_MAX
    }
}

/// Linux socket filters and seccomp.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxPlatform;

impl FilterPlatform for LinuxPlatform {
    const MAX_INSNS: u16 = BPF_MAXINSNS;
    const AD_OFF: i32 = SKF_AD_OFF;
    const AD_MAX: u32 = SKF_AD_MAX;
    const NAME: &'static str = "linux";
}

/// The platform used when none is named.
pub type ActivePlatform = LinuxPlatform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_limits() {
        assert_eq!(LinuxPlatform::MAX_INSNS, 4096);
        assert_eq!(LinuxPlatform::AD_BASE, 0xffff_f000);
        assert_eq!(LinuxPlatform::AD_MAX, 56);
        assert_eq!(LinuxPlatform::NAME, "linux");
    }

    #[test]
    fn ad_window_bounds() {
        assert!(!LinuxPlatform::in_ad_window(0xffff_efff));
        assert!(LinuxPlatform::in_ad_window(0xffff_f000));
        assert!(LinuxPlatform::in_ad_window(0xffff_f037));
        assert!(!LinuxPlatform::in_ad_window(0xffff_f038));
        assert!(!LinuxPlatform::in_ad_window(65_001));
    }
}
