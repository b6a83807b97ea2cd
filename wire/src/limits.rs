//! Configurable limits for frame encoding and dispatch.

/// Wire-level limits.
///
/// Checked before a frame is decoded and after a frame is encoded. Limits on
/// the values inside a packet body live in [`codec::CodecLimits`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    /// Maximum frame size in bytes, packet id included.
    pub max_frame_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // Room for a full chunk of biome blobs plus headers.
            max_frame_bytes: 8 * 1024 * 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_frame_bytes: 4096,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_frame_bytes: usize::MAX,
        }
    }

    /// Returns `Err(actual)` when `len` exceeds the frame limit.
    pub(crate) const fn check_frame(&self, len: usize) -> Result<(), usize> {
        if len > self.max_frame_bytes {
            Err(len)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_frame_bytes() {
        assert_eq!(Limits::default().max_frame_bytes, 8 * 1024 * 1024);
    }

    #[test]
    fn testing_limits_smaller() {
        assert!(Limits::for_testing().max_frame_bytes < Limits::default().max_frame_bytes);
    }

    #[test]
    fn unlimited_limits() {
        assert_eq!(Limits::unlimited().max_frame_bytes, usize::MAX);
    }

    #[test]
    fn check_frame_boundary() {
        let limits = Limits::for_testing();
        assert_eq!(limits.check_frame(4096), Ok(()));
        assert_eq!(limits.check_frame(4097), Err(4097));
    }

    #[test]
    fn limits_const_constructible() {
        const LIMITS: Limits = Limits::for_testing();
        assert_eq!(LIMITS.max_frame_bytes, 4096);
    }
}
