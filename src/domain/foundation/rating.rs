//! Relevance rating value object (1 to 10 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// How closely retrieved evidence matches the counterpart's restated stance,
/// on a 1 (unrelated) to 10 (same topic) scale.
///
/// Ratings above the scale midpoint route the final prompt to the grounded
/// template; everything else uses the ungrounded one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RelevanceRating(u8);

impl RelevanceRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const MIDPOINT: u8 = 5;

    /// Creates a rating, rejecting values outside the 1..=10 scale.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::out_of_range(
                "rating",
                Self::MIN as i32,
                Self::MAX as i32,
                value as i32,
            ));
        }
        Ok(Self(value))
    }

    /// The scale midpoint, used as the default when the service returns
    /// something that is not a number.
    pub fn midpoint() -> Self {
        Self(Self::MIDPOINT)
    }

    /// The scale maximum, used by the constant-graded variant that always
    /// routes to the grounded template.
    pub fn maximum() -> Self {
        Self(Self::MAX)
    }

    /// Parses a generation-service reply that was asked to output a single
    /// integer. Non-numeric output falls back to the midpoint; numeric
    /// output is clamped onto the scale.
    pub fn parse_lenient(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(n) => Self(n.clamp(Self::MIN as i64, Self::MAX as i64) as u8),
            Err(_) => Self::midpoint(),
        }
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// True when the rating mandates grounding the reply in retrieved
    /// evidence (strictly above the midpoint).
    pub fn grounds_reply(&self) -> bool {
        self.0 > Self::MIDPOINT
    }
}

impl fmt::Display for RelevanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_new_accepts_scale_values() {
        assert_eq!(RelevanceRating::new(1).unwrap().value(), 1);
        assert_eq!(RelevanceRating::new(10).unwrap().value(), 10);
    }

    #[test]
    fn rating_new_rejects_out_of_scale() {
        assert!(RelevanceRating::new(0).is_err());
        assert!(RelevanceRating::new(11).is_err());
    }

    #[test]
    fn rating_parse_lenient_reads_plain_integers() {
        assert_eq!(RelevanceRating::parse_lenient("7").value(), 7);
        assert_eq!(RelevanceRating::parse_lenient("  3 ").value(), 3);
    }

    #[test]
    fn rating_parse_lenient_defaults_to_midpoint_on_junk() {
        assert_eq!(RelevanceRating::parse_lenient("very similar").value(), 5);
        assert_eq!(RelevanceRating::parse_lenient("").value(), 5);
        assert_eq!(RelevanceRating::parse_lenient("8/10").value(), 5);
    }

    #[test]
    fn rating_parse_lenient_clamps_numeric_output() {
        assert_eq!(RelevanceRating::parse_lenient("15").value(), 10);
        assert_eq!(RelevanceRating::parse_lenient("0").value(), 1);
        assert_eq!(RelevanceRating::parse_lenient("-2").value(), 1);
    }

    #[test]
    fn rating_grounds_reply_above_midpoint_only() {
        assert!(!RelevanceRating::new(5).unwrap().grounds_reply());
        assert!(RelevanceRating::new(6).unwrap().grounds_reply());
        assert!(RelevanceRating::maximum().grounds_reply());
        assert!(!RelevanceRating::midpoint().grounds_reply());
    }
}
