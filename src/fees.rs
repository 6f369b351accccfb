//! Fee tiers - maps the fee slider to a sat/vB rate
//!
//! | Tier | Source |
//! |------|--------|
//! | 0 | custom value, at least `minimum_fee` |
//! | 1 | `economy_fee` |
//! | 2 | `hour_fee` (default) |
//! | 3 | `half_hour_fee` |
//! | 4 | `fastest_fee` |

use serde::{Deserialize, Serialize};

/// Fee recommendations from the Lightning SDK, sat/vB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecommendedFees {
    pub fastest_fee: u64,
    pub half_hour_fee: u64,
    pub hour_fee: u64,
    pub economy_fee: u64,
    pub minimum_fee: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeeTier {
    Custom,
    Economy,
    #[default]
    Hour,
    HalfHour,
    Fastest,
}

impl FeeTier {
    pub fn index(&self) -> u8 {
        match self {
            FeeTier::Custom => 0,
            FeeTier::Economy => 1,
            FeeTier::Hour => 2,
            FeeTier::HalfHour => 3,
            FeeTier::Fastest => 4,
        }
    }
}

impl TryFrom<u8> for FeeTier {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => FeeTier::Custom,
            1 => FeeTier::Economy,
            2 => FeeTier::Hour,
            3 => FeeTier::HalfHour,
            4 => FeeTier::Fastest,
            other => return Err(other),
        })
    }
}

/// What happened to a custom fee the user typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomFeeOutcome {
    Accepted(u64),
    /// Cleared field, fell back to the minimum
    Reset(u64),
    /// Below the minimum, raised to it
    Clamped { requested: u64, minimum: u64 },
}

impl CustomFeeOutcome {
    /// Snackbar shown to the user, if any
    pub fn notice(&self) -> Option<String> {
        match self {
            CustomFeeOutcome::Clamped { minimum, .. } => Some(format!("id_fee_rate_must_be_at_least_s|{minimum}")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSelection {
    pub tier: FeeTier,
    pub custom_fee: u64,
}

impl Default for FeeSelection {
    fn default() -> Self { Self { tier: FeeTier::default(), custom_fee: 1 } }
}

impl FeeSelection {
    pub fn resolve(&self, fees: &RecommendedFees) -> u64 {
        match self.tier {
            FeeTier::Custom => self.custom_fee,
            FeeTier::Economy => fees.economy_fee,
            FeeTier::Hour => fees.hour_fee,
            FeeTier::HalfHour => fees.half_hour_fee,
            FeeTier::Fastest => fees.fastest_fee,
        }
    }

    /// Sets the custom value and switches to the custom tier.
    pub fn set_custom(&mut self, fee: Option<u64>, minimum: u64) -> CustomFeeOutcome {
        let outcome = match fee {
            None => CustomFeeOutcome::Reset(minimum),
            Some(requested) if requested < minimum => CustomFeeOutcome::Clamped { requested, minimum },
            Some(fee) => CustomFeeOutcome::Accepted(fee),
        };
        self.custom_fee = match outcome {
            CustomFeeOutcome::Accepted(fee) | CustomFeeOutcome::Reset(fee) => fee,
            CustomFeeOutcome::Clamped { minimum, .. } => minimum,
        };
        self.tier = FeeTier::Custom;
        outcome
    }
}

/// Formats a sat/kvB rate as sat/vbyte with two decimals.
pub fn fee_rate_kb_with_unit(sat_per_kvb: u64) -> String {
    format!("{}.{:02} sat/vbyte", sat_per_kvb / 1000, (sat_per_kvb % 1000) / 10)
}

/// Formats a whole sat/vB rate. Any `u64` is accepted.
pub fn fee_rate_with_unit(sat_per_vbyte: u64) -> String {
    match sat_per_vbyte.checked_mul(1000) {
        Some(sat_per_kvb) => fee_rate_kb_with_unit(sat_per_kvb),
        None => format!("{sat_per_vbyte}.00 sat/vbyte"),
    }
}
