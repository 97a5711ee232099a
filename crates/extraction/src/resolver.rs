//! Field resolution: one coupon record per input text.

use tracing::debug;
use zepp_core::CouponRecord;

use crate::entities::{EntityLabel, EntityTagger, RuleTagger};
use crate::patterns::{find_link, DateFinder};

/// Combines the entity tagger and the pattern extractors into a single
/// [`CouponRecord`] per input text.
///
/// Assignment policy: `title` and `discount` take the first qualifying
/// entity in scan order and are never overwritten; `expiry` takes the first
/// tagged date span but is unconditionally overridden by the date scanner's
/// last match when the scanner finds anything.
pub struct FieldResolver<T = RuleTagger> {
    tagger: T,
    dates: DateFinder,
}

impl FieldResolver<RuleTagger> {
    pub fn new() -> Self {
        Self::with_tagger(RuleTagger::new())
    }
}

impl Default for FieldResolver<RuleTagger> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: EntityTagger> FieldResolver<T> {
    /// Build a resolver around a specific tagger implementation.
    pub fn with_tagger(tagger: T) -> Self {
        Self {
            tagger,
            dates: DateFinder::new(),
        }
    }

    /// Resolve `text` into a coupon record.
    ///
    /// Pure function of its input: no state is carried between calls, and
    /// resolution never fails.
    pub fn resolve(&self, text: &str) -> CouponRecord {
        let mut record = CouponRecord::for_text(text);

        if let Some(url) = find_link(text) {
            record.link = url.to_string();
        }

        for entity in self.tagger.tag(text) {
            match entity.label {
                EntityLabel::Percent if record.discount == 0 => {
                    if let Some(discount) = parse_discount(&entity.text) {
                        record.discount = discount;
                    }
                }
                EntityLabel::Org
                    if record.title.is_empty() && entity.text.chars().count() > 3 =>
                {
                    record.title = entity.text;
                }
                EntityLabel::Date if record.expiry.is_empty() => {
                    record.expiry = entity.text;
                }
                _ => {}
            }
        }

        // The dedicated date scanner is more accurate for expiry than
        // generic span tagging; its last match overrides whatever the
        // tagger assigned.
        for date in self.dates.find_dates(text) {
            record.expiry = date.format("%Y-%m-%d").to_string();
        }

        debug!(
            discount = record.discount,
            link = %record.link,
            title = %record.title,
            expiry = %record.expiry,
            "resolved coupon fields"
        );
        record
    }
}

/// Parse a percent span minus its trailing sign as a discount percentage.
///
/// Returns `None` for spans whose remainder is not an integer in
/// `[0, 100]`; the caller skips those and keeps scanning, so resolution
/// stays total.
fn parse_discount(span: &str) -> Option<u32> {
    let mut chars = span.chars();
    chars.next_back()?;
    chars
        .as_str()
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|discount| *discount <= 100)
}
