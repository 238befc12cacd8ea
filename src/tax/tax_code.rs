//! PAYE tax code parsing
//!
//! Parsing never fails: anything unrecognised falls back to the standard
//! Personal Allowance and says so in the note.

use super::uk::{Region, PERSONAL_ALLOWANCE};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::str::FromStr;

/// Suffixes marking a non-cumulative (emergency) basis. Only one is stripped.
const NON_CUMULATIVE_SUFFIXES: &[&str] = &["NONCUM", "W1", "M1", "X"];

/// How allowance-based codes were recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AllowanceKind {
    /// `0T`: no Personal Allowance
    Zero,
    /// `K<digits>`: negative allowance
    K,
    /// `<digits><letters>`, e.g. `1257L`
    Numeric,
    /// Unrecognised code, standard allowance assumed
    Fallback,
}

/// The regime a tax code puts earnings under. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode")]
pub enum TaxCodeMode {
    NoTax,
    FlatRate {
        rate: Decimal,
    },
    Allowance {
        amount: Decimal,
        kind: AllowanceKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTaxCode {
    /// Normalised code with suffix and region prefix removed
    pub code: String,
    pub region: Region,
    #[serde(flatten)]
    pub mode: TaxCodeMode,
    pub note: String,
}

impl ParsedTaxCode {
    /// Signed allowance. Zero for `NT` and flat-rate codes.
    pub fn allowance(&self) -> Decimal {
        match self.mode {
            TaxCodeMode::Allowance { amount, .. } => amount,
            TaxCodeMode::NoTax | TaxCodeMode::FlatRate { .. } => Decimal::ZERO,
        }
    }

    pub fn flat_rate(&self) -> Option<Decimal> {
        match self.mode {
            TaxCodeMode::FlatRate { rate } => Some(rate),
            _ => None,
        }
    }

    pub fn is_no_tax(&self) -> bool {
        self.mode == TaxCodeMode::NoTax
    }

    pub fn is_fallback(&self) -> bool {
        matches!(
            self.mode,
            TaxCodeMode::Allowance {
                kind: AllowanceKind::Fallback,
                ..
            }
        )
    }

    /// Short description of the mode for tables
    pub fn describe_mode(&self) -> String {
        match self.mode {
            TaxCodeMode::NoTax => "No tax".to_string(),
            TaxCodeMode::FlatRate { rate } => format!("Flat {:.0}%", rate * dec!(100)),
            TaxCodeMode::Allowance { kind, .. } => match kind {
                AllowanceKind::Zero => "No allowance".to_string(),
                AllowanceKind::K => "K code".to_string(),
                AllowanceKind::Numeric => "Allowance".to_string(),
                AllowanceKind::Fallback => "Default allowance".to_string(),
            },
        }
    }
}

/// Flat rate for `BR`/`D0`–`D3` codes, which differ between regions for D0 and D1
fn flat_rate(code: &str, region: Region) -> Option<Decimal> {
    let rate = match (code, region) {
        ("BR", _) => dec!(0.20),
        ("D0", Region::RestOfUk) => dec!(0.40),
        ("D0", Region::Scotland) => dec!(0.21),
        ("D1", Region::RestOfUk) => dec!(0.45),
        ("D1", Region::Scotland) => dec!(0.42),
        ("D2", _) => dec!(0.45),
        ("D3", _) => dec!(0.48),
        _ => return None,
    };
    Some(rate)
}

fn normalise(input: &str) -> String {
    let mut code: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();
    if let Some(suffix) = NON_CUMULATIVE_SUFFIXES
        .iter()
        .find(|suffix| code.ends_with(*suffix))
    {
        code.truncate(code.len() - suffix.len());
    }
    code
}

/// Digits of a code as a whole number of pounds/10. `None` when empty, not
/// all ASCII digits, or too large to represent.
fn parse_digits(digits: &str) -> Option<Decimal> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(digits).ok()?.checked_mul(dec!(10))
}

/// Split `1257L` into (`1257`, `L`) when the code is digits followed by letters
fn split_numeric(code: &str) -> Option<(&str, &str)> {
    let split = code.find(|c: char| !c.is_ascii_digit())?;
    let (digits, letters) = code.split_at(split);
    if !digits.is_empty() && letters.bytes().all(|b| b.is_ascii_uppercase()) {
        Some((digits, letters))
    } else {
        None
    }
}

/// Parse a free-text tax code. `fallback_region` applies unless the code has
/// an `S` (Scotland) or `C` (Wales, taxed as rest of UK) prefix.
pub fn parse_tax_code(input: &str, fallback_region: Region) -> ParsedTaxCode {
    let normalised = normalise(input);

    let (region, code) = if let Some(rest) = normalised.strip_prefix('S') {
        (Region::Scotland, rest)
    } else if let Some(rest) = normalised.strip_prefix('C') {
        (Region::RestOfUk, rest)
    } else {
        (fallback_region, normalised.as_str())
    };

    let parsed = |mode: TaxCodeMode, note: String| ParsedTaxCode {
        code: code.to_string(),
        region,
        mode,
        note,
    };

    if code == "NT" {
        return parsed(TaxCodeMode::NoTax, "NT code: no Income Tax.".to_string());
    }

    if let Some(rate) = flat_rate(code, region) {
        return parsed(
            TaxCodeMode::FlatRate { rate },
            format!("{code} code: flat tax rate applied to all earnings."),
        );
    }

    if code == "0T" {
        return parsed(
            TaxCodeMode::Allowance {
                amount: Decimal::ZERO,
                kind: AllowanceKind::Zero,
            },
            "0T code: no Personal Allowance.".to_string(),
        );
    }

    if let Some(amount) = code.strip_prefix('K').and_then(parse_digits) {
        return parsed(
            TaxCodeMode::Allowance {
                amount: -amount,
                kind: AllowanceKind::K,
            },
            "K code: negative allowance increases taxable income.".to_string(),
        );
    }

    if let Some(amount) = split_numeric(code).and_then(|(digits, _)| parse_digits(digits)) {
        return parsed(
            TaxCodeMode::Allowance {
                amount,
                kind: AllowanceKind::Numeric,
            },
            "Numeric tax code allowance used.".to_string(),
        );
    }

    log::warn!(
        "Tax code '{}' not recognised, defaulting to {} allowance",
        input.trim(),
        PERSONAL_ALLOWANCE
    );
    parsed(
        TaxCodeMode::Allowance {
            amount: PERSONAL_ALLOWANCE,
            kind: AllowanceKind::Fallback,
        },
        "Tax code not recognised exactly; defaulted to 1257L-style allowance.".to_string(),
    )
}
