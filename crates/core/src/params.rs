//! BM25 tuning constants

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default term-frequency saturation.
pub const DEFAULT_K1: f64 = 1.2;
/// Default document-length normalization.
pub const DEFAULT_B: f64 = 0.75;

/// Tuning values passed to the BM25 term-frequency component.
///
/// `k1` controls how quickly repeated occurrences of a term saturate,
/// `b` how strongly document length normalizes the score (0 = not at all,
/// 1 = fully).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Params {
    /// Term-frequency saturation
    pub k1: f64,
    /// Length normalization in `[0, 1]`
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Bm25Params {
            k1: DEFAULT_K1,
            b: DEFAULT_B,
        }
    }
}

impl Bm25Params {
    /// Create validated parameters.
    pub fn new(k1: f64, b: f64) -> Result<Self> {
        let params = Bm25Params { k1, b };
        params.validate()?;
        Ok(params)
    }

    /// Check that `k1` is finite and non-negative and `b` lies in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(Error::InvalidParams(format!(
                "k1 must be finite and non-negative, got {}",
                self.k1
            )));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(Error::InvalidParams(format!(
                "b must be within [0, 1], got {}",
                self.b
            )));
        }
        Ok(())
    }

    /// Length-normalized term-frequency component:
    /// `tf / (k1 * (1 - b + b * doc_len / avg_doc_len) + tf)`
    pub fn term_freq_score(&self, tf: f64, doc_len: f64, avg_doc_len: f64) -> f64 {
        tf / (self.k1 * (1.0 - self.b + self.b * doc_len / avg_doc_len) + tf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Bm25Params::default();
        assert_eq!(p.k1, 1.2);
        assert_eq!(p.b, 0.75);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            Bm25Params::new(-1.0, 0.5),
            Err(Error::InvalidParams(_))
        ));
        assert!(matches!(
            Bm25Params::new(1.2, 1.5),
            Err(Error::InvalidParams(_))
        ));
        assert!(Bm25Params::new(f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_term_freq_score_average_length() {
        // doc_len == avg_doc_len collapses normalization to k1
        let p = Bm25Params::default();
        let s = p.term_freq_score(1.0, 5.0, 5.0);
        assert!((s - 1.0 / 2.2).abs() < 1e-12);
    }

    #[test]
    fn test_term_freq_score_grows_with_tf() {
        let p = Bm25Params::default();
        let one = p.term_freq_score(1.0, 6.0, 5.0);
        let two = p.term_freq_score(2.0, 6.0, 5.0);
        assert!(two > one);
        assert!(two < 1.0);
    }

    #[test]
    fn test_b_zero_ignores_length() {
        let p = Bm25Params::new(1.2, 0.0).unwrap();
        let short = p.term_freq_score(1.0, 2.0, 10.0);
        let long = p.term_freq_score(1.0, 50.0, 10.0);
        assert_eq!(short, long);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let p: Bm25Params = toml::from_str("k1 = 2.0").unwrap();
        assert_eq!(p.k1, 2.0);
        assert_eq!(p.b, DEFAULT_B);
    }

    proptest::proptest! {
        #[test]
        fn prop_term_freq_score_in_unit_interval(
            tf in 1u32..50,
            doc_len in 1u32..100,
            avg_doc_len in 1.0f64..100.0,
            k1 in 0.1f64..3.0,
            b in 0.0f64..=1.0,
        ) {
            let p = Bm25Params::new(k1, b).unwrap();
            let s = p.term_freq_score(tf as f64, doc_len as f64, avg_doc_len);
            proptest::prop_assert!(s > 0.0 && s < 1.0);
        }
    }
}
