use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// UK Tax Year (runs 6 April to 5 April)
/// The year value represents the end year (e.g., 2026 = 2025/26 tax year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxYear(pub i32);

impl TaxYear {
    /// The year all rate tables in this module belong to
    pub const CURRENT: TaxYear = TaxYear(2026);

    /// Start date of the tax year (6 April of previous year)
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0 - 1, 4, 6).expect("6 April is a valid date")
    }

    /// End date of the tax year (5 April)
    pub fn end_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0, 4, 5).expect("5 April is a valid date")
    }

    /// Display as "2025/26" format
    pub fn display(&self) -> String {
        format!("{}/{:02}", self.0 - 1, self.0 % 100)
    }

    /// Long form used in calculation notes
    pub fn label(&self) -> String {
        format!(
            "Tax year: {} to {}",
            self.start_date().format("%-d %B %Y"),
            self.end_date().format("%-d %B %Y")
        )
    }

    /// Approximate birth year of someone who is `age` at the start of this tax year
    pub fn birth_year_for_age(&self, age: i32) -> i32 {
        self.start_date().year() - age
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Income tax region. Scotland has its own band table and flat-rate codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    #[default]
    RestOfUk,
    Scotland,
}

impl Region {
    pub fn bands(self) -> &'static [TaxBand] {
        match self {
            Region::RestOfUk => REST_OF_UK_BANDS,
            Region::Scotland => SCOTLAND_BANDS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Region::RestOfUk => "rest of UK",
            Region::Scotland => "Scotland",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A contiguous slice of gross income taxed at one marginal rate.
///
/// `upper` is inclusive and expressed in gross terms; `None` marks the top band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBand {
    pub name: &'static str,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

pub const REST_OF_UK_BANDS: &[TaxBand] = &[
    TaxBand {
        name: "Basic",
        upper: Some(dec!(50270)),
        rate: dec!(0.20),
    },
    TaxBand {
        name: "Higher",
        upper: Some(dec!(125140)),
        rate: dec!(0.40),
    },
    TaxBand {
        name: "Additional",
        upper: None,
        rate: dec!(0.45),
    },
];

pub const SCOTLAND_BANDS: &[TaxBand] = &[
    TaxBand {
        name: "Starter",
        upper: Some(dec!(15397)),
        rate: dec!(0.19),
    },
    TaxBand {
        name: "Basic",
        upper: Some(dec!(27491)),
        rate: dec!(0.20),
    },
    TaxBand {
        name: "Intermediate",
        upper: Some(dec!(43662)),
        rate: dec!(0.21),
    },
    TaxBand {
        name: "Higher",
        upper: Some(dec!(75000)),
        rate: dec!(0.42),
    },
    TaxBand {
        name: "Advanced",
        upper: Some(dec!(125140)),
        rate: dec!(0.45),
    },
    TaxBand {
        name: "Top",
        upper: None,
        rate: dec!(0.48),
    },
];

/// Standard Personal Allowance (the 1257L code)
pub const PERSONAL_ALLOWANCE: Decimal = dec!(12570);

/// Income above which the Personal Allowance is withdrawn at £1 per £2
pub const ALLOWANCE_TAPER_THRESHOLD: Decimal = dec!(100000);

/// Ceiling for any salary, pot or allowance fed into a calculation.
/// Keeps every intermediate result well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Clamp a money amount into `0..=MAX_AMOUNT`
pub fn clamp_amount(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO).min(MAX_AMOUNT)
}

/// Class 1 employee National Insurance thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NiThresholds {
    pub primary: Decimal,
    pub upper: Decimal,
    pub main_rate: Decimal,
    pub upper_rate: Decimal,
}

pub const NI_THRESHOLDS: NiThresholds = NiThresholds {
    primary: dec!(12570),
    upper: dec!(50270),
    main_rate: dec!(0.08),
    upper_rate: dec!(0.02),
};

/// Auto-enrolment qualifying earnings band
pub const QUALIFYING_EARNINGS_LOWER: Decimal = dec!(6240);
pub const QUALIFYING_EARNINGS_UPPER: Decimal = dec!(50270);

/// Full new State Pension, per week
pub const FULL_STATE_PENSION_WEEKLY: Decimal = dec!(230.25);

/// State Pension age by birth-year cohort: (born before, age).
/// Anyone born in or after the last cohort's year gets `LATEST_STATE_PENSION_AGE`.
const STATE_PENSION_COHORTS: &[(i32, i32)] = &[(1960, 66), (1977, 67)];
const LATEST_STATE_PENSION_AGE: i32 = 68;

pub fn state_pension_age(birth_year: i32) -> i32 {
    STATE_PENSION_COHORTS
        .iter()
        .find(|(born_before, _)| birth_year < *born_before)
        .map(|(_, age)| *age)
        .unwrap_or(LATEST_STATE_PENSION_AGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_year_display() {
        assert_eq!(TaxYear(2025).display(), "2024/25");
        assert_eq!(TaxYear(2026).display(), "2025/26");
        assert_eq!(TaxYear(2010).display(), "2009/10");
    }

    #[test]
    fn tax_year_start_end_dates() {
        let ty = TaxYear::CURRENT;
        assert_eq!(ty.start_date(), NaiveDate::from_ymd_opt(2025, 4, 6).unwrap());
        assert_eq!(ty.end_date(), NaiveDate::from_ymd_opt(2026, 4, 5).unwrap());
    }

    #[test]
    fn tax_year_label() {
        assert_eq!(
            TaxYear::CURRENT.label(),
            "Tax year: 6 April 2025 to 5 April 2026"
        );
    }

    #[test]
    fn band_tables_ascending_with_unbounded_top() {
        for bands in [REST_OF_UK_BANDS, SCOTLAND_BANDS] {
            let (top, rest) = bands.split_last().unwrap();
            assert_eq!(top.upper, None);
            let uppers: Vec<_> = rest.iter().map(|b| b.upper.unwrap()).collect();
            assert!(uppers.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn region_selects_table() {
        assert_eq!(Region::RestOfUk.bands().len(), 3);
        assert_eq!(Region::Scotland.bands().len(), 6);
    }

    #[test]
    fn state_pension_age_cohorts() {
        assert_eq!(state_pension_age(1955), 66);
        assert_eq!(state_pension_age(1959), 66);
        assert_eq!(state_pension_age(1960), 67);
        assert_eq!(state_pension_age(1976), 67);
        assert_eq!(state_pension_age(1977), 68);
        assert_eq!(state_pension_age(1995), 68);
    }

    #[test]
    fn amounts_clamped_to_ceiling() {
        assert_eq!(clamp_amount(dec!(-5)), Decimal::ZERO);
        assert_eq!(clamp_amount(dec!(40000)), dec!(40000));
        assert_eq!(clamp_amount(Decimal::MAX), MAX_AMOUNT);
    }

    #[test]
    fn birth_year_from_age() {
        assert_eq!(TaxYear::CURRENT.birth_year_for_age(30), 1995);
    }
}
