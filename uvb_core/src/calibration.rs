//! Persisted zero offset.
//!
//! The offset lives under `offset` in the `calibration` namespace. A device that was never
//! calibrated reads 0.0.

use uvb_traits::Store;

pub const NAMESPACE: &str = "calibration";
pub const OFFSET_KEY: &str = "offset";

/// Stored offset in volts, 0.0 when absent or unusable.
pub fn load_offset(store: &dyn Store) -> f32 {
    let v = store.get_f32(OFFSET_KEY, 0.0);
    if v.is_finite() {
        v
    } else {
        tracing::warn!(value = v, "ignoring non-finite calibration offset");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MemoryStore;

    #[test]
    fn missing_offset_defaults_to_zero() {
        assert_eq!(load_offset(&MemoryStore::new()), 0.0);
    }

    #[test]
    fn stored_offset_is_returned() {
        assert_eq!(load_offset(&MemoryStore::with(OFFSET_KEY, 0.012)), 0.012);
    }

    #[test]
    fn nan_offset_is_ignored() {
        assert_eq!(load_offset(&MemoryStore::with(OFFSET_KEY, f32::NAN)), 0.0);
    }
}
