//! Frame sampling policy.

use crate::error::SceneError;

/// Default sampling stride: every 10th decoded frame is scored.
pub const DEFAULT_FRAME_SKIP: u64 = 10;

/// Selects every `stride`-th decoded frame for scoring.
///
/// Larger strides are cheaper but can step over short cuts; the reported
/// cut lags the true one by at most `stride / fps` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSampler {
    stride: u64,
}

impl FrameSampler {
    /// Create a sampler with the given stride.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidOptions`] for a stride of zero.
    pub fn new(stride: u64) -> Result<Self, SceneError> {
        if stride == 0 {
            return Err(SceneError::InvalidOptions(
                "frame skip must be greater than zero".to_string(),
            ));
        }
        Ok(Self { stride })
    }

    /// The configured stride.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Whether the frame at `index` is scored.
    pub fn is_sampled(&self, index: u64) -> bool {
        index % self.stride == 0
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self {
            stride: DEFAULT_FRAME_SKIP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_multiples_of_stride() {
        let sampler = FrameSampler::new(10).unwrap();
        let selected: Vec<u64> = (0..35).filter(|&i| sampler.is_sampled(i)).collect();
        assert_eq!(selected, vec![0, 10, 20, 30]);
    }

    #[test]
    fn stride_one_selects_everything() {
        let sampler = FrameSampler::new(1).unwrap();
        assert!((0..50).all(|i| sampler.is_sampled(i)));
    }

    #[test]
    fn zero_stride_is_rejected() {
        assert!(matches!(
            FrameSampler::new(0),
            Err(SceneError::InvalidOptions(_))
        ));
    }

    #[test]
    fn default_stride_is_ten() {
        assert_eq!(FrameSampler::default().stride(), 10);
    }
}
