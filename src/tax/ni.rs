use super::uk::{clamp_amount, NiThresholds, NI_THRESHOLDS};
use rust_decimal::Decimal;
use serde::Serialize;

/// Class 1 employee National Insurance on annual earnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NiReport {
    /// Earnings between the primary and upper thresholds
    pub main_band: Decimal,
    /// Earnings above the upper threshold
    pub upper_band: Decimal,
    pub main_contribution: Decimal,
    pub upper_contribution: Decimal,
    pub total: Decimal,
}

pub fn calculate_ni(gross: Decimal) -> NiReport {
    calculate_ni_with(gross, &NI_THRESHOLDS)
}

pub fn calculate_ni_with(gross: Decimal, thresholds: &NiThresholds) -> NiReport {
    let gross = clamp_amount(gross);
    let main_band = (gross.min(thresholds.upper) - thresholds.primary).max(Decimal::ZERO);
    let upper_band = (gross - thresholds.upper).max(Decimal::ZERO);
    let main_contribution = main_band * thresholds.main_rate;
    let upper_contribution = upper_band * thresholds.upper_rate;

    NiReport {
        main_band,
        upper_band,
        main_contribution,
        upper_contribution,
        total: main_contribution + upper_contribution,
    }
}
