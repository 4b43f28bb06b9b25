//! Affordable-housing income tiers.
//!
//! Each tier is defined as a fixed fraction of the area median income.
//! Tiers are ordered from the lowest income ceiling to the highest.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// An affordable-housing income eligibility tier.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IncomeTier {
    /// Up to 30% of area median income
    ExtremelyLow,
    /// Up to 50% of area median income
    VeryLow,
    /// Up to 80% of area median income
    Low,
    /// Up to 120% of area median income
    Moderate,
    /// Up to 165% of area median income
    Middle,
}

impl IncomeTier {
    /// Fraction of the zone median income that caps this tier.
    #[must_use]
    pub const fn median_multiplier(self) -> f64 {
        match self {
            Self::ExtremelyLow => 0.30,
            Self::VeryLow => 0.50,
            Self::Low => 0.80,
            Self::Moderate => 1.20,
            Self::Middle => 1.65,
        }
    }

    /// Human-readable prefix shared by the tier's table columns
    /// (e.g. `"Extremely Low"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExtremelyLow => "Extremely Low",
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::Middle => "Middle",
        }
    }

    /// Name of the housing-table column holding this tier's unit count.
    #[must_use]
    pub const fn units_column(self) -> &'static str {
        match self {
            Self::ExtremelyLow => "Extremely Low Income Units",
            Self::VeryLow => "Very Low Income Units",
            Self::Low => "Low Income Units",
            Self::Moderate => "Moderate Income Units",
            Self::Middle => "Middle Income Units",
        }
    }

    /// The next lower tier, or `None` for [`Self::ExtremelyLow`].
    #[must_use]
    pub const fn lower(self) -> Option<Self> {
        match self {
            Self::ExtremelyLow => None,
            Self::VeryLow => Some(Self::ExtremelyLow),
            Self::Low => Some(Self::VeryLow),
            Self::Moderate => Some(Self::Low),
            Self::Middle => Some(Self::Moderate),
        }
    }

    /// Returns all variants of this enum, lowest ceiling first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ExtremelyLow,
            Self::VeryLow,
            Self::Low,
            Self::Moderate,
            Self::Middle,
        ]
    }
}

/// One value per [`IncomeTier`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierValues<T> {
    /// Extremely-low income value.
    pub extremely_low: T,
    /// Very-low income value.
    pub very_low: T,
    /// Low income value.
    pub low: T,
    /// Moderate income value.
    pub moderate: T,
    /// Middle income value.
    pub middle: T,
}

impl<T> TierValues<T> {
    /// Builds the set by evaluating `f` once per tier, lowest first.
    pub fn from_fn(mut f: impl FnMut(IncomeTier) -> T) -> Self {
        Self {
            extremely_low: f(IncomeTier::ExtremelyLow),
            very_low: f(IncomeTier::VeryLow),
            low: f(IncomeTier::Low),
            moderate: f(IncomeTier::Moderate),
            middle: f(IncomeTier::Middle),
        }
    }

    /// Returns the value for `tier`.
    #[must_use]
    pub const fn get(&self, tier: IncomeTier) -> &T {
        match tier {
            IncomeTier::ExtremelyLow => &self.extremely_low,
            IncomeTier::VeryLow => &self.very_low,
            IncomeTier::Low => &self.low,
            IncomeTier::Moderate => &self.moderate,
            IncomeTier::Middle => &self.middle,
        }
    }

    /// Returns a mutable reference to the value for `tier`.
    pub const fn get_mut(&mut self, tier: IncomeTier) -> &mut T {
        match tier {
            IncomeTier::ExtremelyLow => &mut self.extremely_low,
            IncomeTier::VeryLow => &mut self.very_low,
            IncomeTier::Low => &mut self.low,
            IncomeTier::Moderate => &mut self.moderate,
            IncomeTier::Middle => &mut self.middle,
        }
    }

    /// Iterates `(tier, value)` pairs, lowest tier first.
    pub fn iter(&self) -> impl Iterator<Item = (IncomeTier, &T)> {
        IncomeTier::all().iter().map(move |&tier| (tier, self.get(tier)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipliers_increase_with_tier() {
        let multipliers: Vec<f64> = IncomeTier::all()
            .iter()
            .map(|t| t.median_multiplier())
            .collect();
        assert!(
            multipliers.windows(2).all(|w| w[0] < w[1]),
            "multipliers not strictly increasing: {multipliers:?}"
        );
    }

    #[test]
    fn lower_chain_walks_down_to_extremely_low() {
        let mut tier = IncomeTier::Middle;
        let mut steps = 0;
        while let Some(next) = tier.lower() {
            assert!(next < tier);
            tier = next;
            steps += 1;
        }
        assert_eq!(tier, IncomeTier::ExtremelyLow);
        assert_eq!(steps, 4);
    }

    #[test]
    fn tier_values_get_matches_from_fn() {
        let values = TierValues::from_fn(|t| t.units_column());
        for (tier, column) in values.iter() {
            assert_eq!(*column, tier.units_column());
        }
        assert_eq!(*values.get(IncomeTier::Low), "Low Income Units");
    }

    #[test]
    fn tier_values_get_mut() {
        let mut values = TierValues::<u64>::default();
        *values.get_mut(IncomeTier::Moderate) += 7;
        assert_eq!(values.moderate, 7);
        assert_eq!(values.middle, 0);
    }
}
