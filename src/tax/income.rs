use super::tax_code::ParsedTaxCode;
use super::uk::{clamp_amount, TaxBand, ALLOWANCE_TAPER_THRESHOLD, MAX_AMOUNT};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Income tax report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeTaxReport {
    pub gross: Decimal,
    /// Allowance from the tax code, before the taper
    pub allowance: Decimal,
    /// Allowance after the £100k taper
    pub effective_allowance: Decimal,
    pub taxable_income: Decimal,
    /// Set when a flat-rate code applied instead of the band table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_rate: Option<Decimal>,
    /// Per-band breakdown, empty for `NT` and flat-rate codes
    pub bands: Vec<BandSlice>,
    pub total: Decimal,
}

/// The part of taxable income falling into one band
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandSlice {
    pub name: &'static str,
    /// Bounds in taxable-income terms (band thresholds shifted down by the allowance)
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
    pub amount: Decimal,
    pub tax: Decimal,
}

/// Allowance after withdrawal of £1 for every £2 of income over £100,000.
/// Zero and negative (K code) allowances are left alone.
pub fn tapered_allowance(allowance: Decimal, gross: Decimal) -> Decimal {
    if allowance <= Decimal::ZERO || gross <= ALLOWANCE_TAPER_THRESHOLD {
        return allowance;
    }
    let reduction = (gross - ALLOWANCE_TAPER_THRESHOLD) / dec!(2);
    (allowance - reduction).max(Decimal::ZERO)
}

/// Calculate income tax on a gross annual income under a parsed tax code
pub fn calculate_income_tax(gross: Decimal, code: &ParsedTaxCode) -> IncomeTaxReport {
    let gross = clamp_amount(gross);
    let allowance = code.allowance().max(-MAX_AMOUNT).min(MAX_AMOUNT);

    if code.is_no_tax() {
        return IncomeTaxReport {
            gross,
            allowance,
            effective_allowance: allowance,
            taxable_income: Decimal::ZERO,
            flat_rate: None,
            bands: Vec::new(),
            total: Decimal::ZERO,
        };
    }

    if let Some(rate) = code.flat_rate() {
        return IncomeTaxReport {
            gross,
            allowance,
            effective_allowance: allowance,
            taxable_income: gross,
            flat_rate: Some(rate),
            bands: Vec::new(),
            total: (gross * rate).max(Decimal::ZERO),
        };
    }

    let effective_allowance = tapered_allowance(allowance, gross);
    let taxable_income = (gross - effective_allowance).max(Decimal::ZERO);
    let bands = band_slices(taxable_income, effective_allowance, code.region.bands());
    let total = bands
        .iter()
        .map(|slice| slice.tax)
        .sum::<Decimal>()
        .max(Decimal::ZERO);

    IncomeTaxReport {
        gross,
        allowance,
        effective_allowance,
        taxable_income,
        flat_rate: None,
        bands,
        total,
    }
}

/// Split taxable income across a band table whose thresholds are in gross terms.
fn band_slices(taxable_income: Decimal, allowance: Decimal, bands: &[TaxBand]) -> Vec<BandSlice> {
    let mut slices = Vec::with_capacity(bands.len());
    let mut lower = Decimal::ZERO;

    for band in bands {
        let upper = band.upper.map(|u| (u - allowance).max(Decimal::ZERO));
        let capped = upper.map_or(taxable_income, |u| taxable_income.min(u));
        let amount = (capped - lower).max(Decimal::ZERO);
        let tax = amount * band.rate;

        log::debug!(
            "Band {} ({} - {:?}) @ {}: {} taxed {}",
            band.name,
            lower,
            upper,
            band.rate,
            amount,
            tax
        );

        slices.push(BandSlice {
            name: band.name,
            lower,
            upper,
            rate: band.rate,
            amount,
            tax,
        });

        match upper {
            Some(u) => lower = u,
            None => break,
        }
    }

    slices
}
