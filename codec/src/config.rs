//! Options for [crate::Codec::pack_cfg] and [crate::Codec::unpack_cfg].

/// Configuration for packing and unpacking.
///
/// # Examples
///
/// ```
/// use wirepack::Config;
///
/// let cfg = Config::unverified();
/// assert!(!cfg.verify);
/// assert!(cfg.with_verify(true).verify);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    /// Check every pack and unpack by reversing it.
    ///
    /// When set, `pack` unpacks its output and asserts it equals the input value, and `unpack`
    /// re-packs the decoded value and asserts it equals the input bytes. A failed check is a bug
    /// in a wire type (not bad input) and panics.
    pub verify: bool,
}

impl Config {
    /// Returns a configuration that checks every round-trip.
    pub const fn verified() -> Self {
        Self { verify: true }
    }

    /// Returns a configuration that performs no round-trip checks.
    pub const fn unverified() -> Self {
        Self { verify: false }
    }

    pub const fn with_verify(self, verify: bool) -> Self {
        Self { verify }
    }
}

impl Default for Config {
    /// Verifies round-trips only when debug assertions are enabled.
    fn default() -> Self {
        Self {
            verify: cfg!(debug_assertions),
        }
    }
}
