//! Store configuration
//!
//! Per-instance settings passed into `FrameStore::with_config`. Nothing here is
//! global; two stores over two devices never share state.

/// Default seed for the write-offset generator
pub const DEFAULT_SEED: u64 = 0x5245_5441_494E_4B56; // "RETAINKV"

/// Frame store configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Seed for the pseudo-random write offset
    ///
    /// Embedded targets should seed from a hardware entropy source (e.g. the
    /// ring oscillator) so offsets differ across resets.
    pub seed: u64,
    /// Write every frame at this offset instead of a random one
    pub fixed_offset: Option<u32>,
    /// Log a warning when a load finds an unreadable or damaged frame
    pub warn_on_corruption: bool,
}

impl StoreConfig {
    /// Default configuration with a custom RNG seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Default configuration writing every frame at `offset`
    pub fn with_fixed_offset(offset: u32) -> Self {
        Self {
            fixed_offset: Some(offset),
            ..Self::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            fixed_offset: None,
            warn_on_corruption: true,
        }
    }
}
