//! Structured coupon record produced by field extraction.

use serde::{Deserialize, Serialize};

/// Coupon fields extracted from a single text submission.
///
/// A record always echoes the full input text in `description`; the other
/// fields are best-effort and keep their zero values when nothing in the
/// text qualified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponRecord {
    /// First URL found in the text, or empty.
    pub link: String,
    /// Organization-like label, or empty.
    pub title: String,
    /// Discount percentage in `[0, 100]`, 0 when none was detected.
    pub discount: u32,
    /// Verbatim copy of the input text.
    pub description: String,
    /// Expiry date: a normalized `YYYY-MM-DD` date when the date scanner
    /// found one, else a raw date-like span, else empty.
    pub expiry: String,
}

impl CouponRecord {
    /// Empty record carrying only the input text as its description.
    pub fn for_text(text: impl Into<String>) -> Self {
        Self {
            description: text.into(),
            ..Self::default()
        }
    }
}
