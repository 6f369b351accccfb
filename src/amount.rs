//! Amount formatting in the user's denomination

use serde::{Deserialize, Serialize};

const SATS_PER_BTC: u64 = 100_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Denomination {
    #[default]
    Btc,
    MilliBtc,
    /// bits
    MicroBtc,
    Sats,
    Fiat,
}

impl Denomination {
    pub fn unit<'a>(&self, settings: &'a Settings) -> &'a str {
        match self {
            Denomination::Btc => "BTC",
            Denomination::MilliBtc => "mBTC",
            Denomination::MicroBtc => "bits",
            Denomination::Sats => "sats",
            Denomination::Fiat => settings.fiat_currency.as_str(),
        }
    }

    /// Sats per unit and shown decimals for bitcoin units
    fn scale(&self) -> Option<(u64, usize)> {
        match self {
            Denomination::Btc => Some((SATS_PER_BTC, 8)),
            Denomination::MilliBtc => Some((100_000, 5)),
            Denomination::MicroBtc => Some((100, 2)),
            Denomination::Sats => Some((1, 0)),
            Denomination::Fiat => None,
        }
    }
}

/// Session display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub unit: Denomination,
    pub fiat_currency: String,
    /// Fiat per BTC; `None` until the rate is fetched
    pub exchange_rate: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self { unit: Denomination::Btc, fiat_currency: "USD".into(), exchange_rate: None }
    }
}

/// Formats `sats` in `denomination`, defaulting to the session unit.
///
/// Fiat yields `None` when no exchange rate is known.
pub fn to_amount_look(sats: i64, settings: &Settings, with_unit: bool, denomination: Option<Denomination>) -> Option<String> {
    let denomination = denomination.unwrap_or(settings.unit);
    let sign = if sats < 0 { "-" } else { "" };
    let abs = sats.unsigned_abs();

    let value = match denomination.scale() {
        Some((per_unit, 0)) => format!("{sign}{}", abs / per_unit),
        Some((per_unit, decimals)) => {
            format!("{sign}{}.{:0width$}", abs / per_unit, abs % per_unit, width = decimals)
        }
        None => {
            let rate = settings.exchange_rate?;
            let fiat = sats as f64 / SATS_PER_BTC as f64 * rate;
            format!("{fiat:.2}")
        }
    };

    Some(if with_unit { format!("{value} {}", denomination.unit(settings)) } else { value })
}
