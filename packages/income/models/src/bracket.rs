//! The ten household income brackets reported by the income survey.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A household income range, ordered by ascending upper bound.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum IncomeBracket {
    /// Less than $10,000
    #[strum(serialize = "Less than $10,000")]
    Under10k,
    /// $10,000 to $14,999
    #[strum(serialize = "$10,000 to $14,999")]
    From10kTo15k,
    /// $15,000 to $24,999
    #[strum(serialize = "$15,000 to $24,999")]
    From15kTo25k,
    /// $25,000 to $34,999
    #[strum(serialize = "$25,000 to $34,999")]
    From25kTo35k,
    /// $35,000 to $49,999
    #[strum(serialize = "$35,000 to $49,999")]
    From35kTo50k,
    /// $50,000 to $74,999
    #[strum(serialize = "$50,000 to $74,999")]
    From50kTo75k,
    /// $75,000 to $99,999
    #[strum(serialize = "$75,000 to $99,999")]
    From75kTo100k,
    /// $100,000 to $149,999
    #[strum(serialize = "$100,000 to $149,999")]
    From100kTo150k,
    /// $150,000 to $199,999
    #[strum(serialize = "$150,000 to $199,999")]
    From150kTo200k,
    /// $200,000 or more
    #[strum(serialize = "$200,000 or more")]
    Over200k,
}

impl IncomeBracket {
    /// Number of brackets in the survey.
    pub const COUNT: usize = 10;

    /// Upper income bound used when interpolating within the bracket.
    ///
    /// The open-ended top bracket is capped at $500,000.
    #[must_use]
    pub const fn upper_bound(self) -> u32 {
        match self {
            Self::Under10k => 10_000,
            Self::From10kTo15k => 15_000,
            Self::From15kTo25k => 25_000,
            Self::From25kTo35k => 35_000,
            Self::From35kTo50k => 50_000,
            Self::From50kTo75k => 75_000,
            Self::From75kTo100k => 100_000,
            Self::From100kTo150k => 150_000,
            Self::From150kTo200k => 200_000,
            Self::Over200k => 500_000,
        }
    }

    /// Whether this is the open-ended top bracket.
    #[must_use]
    pub const fn is_open_ended(self) -> bool {
        matches!(self, Self::Over200k)
    }

    /// Position of this bracket in [`Self::all()`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns all variants of this enum, lowest bound first.
    #[must_use]
    pub const fn all() -> &'static [Self; Self::COUNT] {
        &[
            Self::Under10k,
            Self::From10kTo15k,
            Self::From15kTo25k,
            Self::From25kTo35k,
            Self::From35kTo50k,
            Self::From50kTo75k,
            Self::From75kTo100k,
            Self::From100kTo150k,
            Self::From150kTo200k,
            Self::Over200k,
        ]
    }
}

/// Fraction of a zone's households in each bracket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BracketFractions([f64; IncomeBracket::COUNT]);

impl BracketFractions {
    /// Wraps fractions given in [`IncomeBracket::all()`] order.
    #[must_use]
    pub const fn new(fractions: [f64; IncomeBracket::COUNT]) -> Self {
        Self(fractions)
    }

    /// Fraction of households in `bracket`.
    #[must_use]
    pub const fn get(&self, bracket: IncomeBracket) -> f64 {
        self.0[bracket.index()]
    }

    /// Iterates `(bracket, fraction)` pairs, lowest bound first.
    pub fn iter(&self) -> impl Iterator<Item = (IncomeBracket, f64)> + '_ {
        IncomeBracket::all()
            .iter()
            .map(move |&bracket| (bracket, self.get(bracket)))
    }

    /// Sum of all fractions (≈1 for well-formed survey data).
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_strictly_increase() {
        let bounds: Vec<u32> = IncomeBracket::all()
            .iter()
            .map(|b| b.upper_bound())
            .collect();
        assert!(bounds.windows(2).all(|w| w[0] < w[1]), "{bounds:?}");
    }

    #[test]
    fn index_matches_position() {
        for (i, bracket) in IncomeBracket::all().iter().enumerate() {
            assert_eq!(bracket.index(), i);
        }
    }

    #[test]
    fn labels_roundtrip() {
        for bracket in IncomeBracket::all() {
            let label = bracket.to_string();
            assert_eq!(label.parse::<IncomeBracket>().unwrap(), *bracket);
        }
        assert_eq!(IncomeBracket::From10kTo15k.to_string(), "$10,000 to $14,999");
    }

    #[test]
    fn only_top_bracket_is_open_ended() {
        let open: Vec<_> = IncomeBracket::all()
            .iter()
            .filter(|b| b.is_open_ended())
            .collect();
        assert_eq!(open, vec![&IncomeBracket::Over200k]);
    }
}
