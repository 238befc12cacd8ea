use super::income::{calculate_income_tax, IncomeTaxReport};
use super::ni::{calculate_ni, NiReport};
use super::pension::{project_pension, PensionParameters, PensionReport};
use super::tax_code::{parse_tax_code, ParsedTaxCode};
use super::uk::{clamp_amount, Region, TaxYear};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_tax_code() -> String {
    "1257L".to_string()
}

/// Input root for a take-home pay calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CalculationInput {
    /// Gross annual salary in GBP. Clamped to 0..=1,000,000,000,000,000.
    #[schemars(with = "f64")]
    pub salary: Decimal,
    /// PAYE tax code, e.g. 1257L, S1257L, BR, K475, 1257L W1
    #[serde(default = "default_tax_code")]
    pub tax_code: String,
    /// Region used when the tax code has no S or C prefix
    #[serde(default)]
    pub region: Region,
    /// Workplace pension; omit to skip the projection
    #[serde(default)]
    pub pension: Option<PensionParameters>,
}

impl CalculationInput {
    pub fn new(salary: Decimal, tax_code: &str, region: Region) -> Self {
        CalculationInput {
            salary,
            tax_code: tax_code.to_string(),
            region,
            pension: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TakeHomeReport {
    pub tax_year: String,
    pub tax_code: ParsedTaxCode,
    pub gross_annual: Decimal,
    pub income_tax: IncomeTaxReport,
    pub ni: NiReport,
    pub deductions: Decimal,
    pub net_annual: Decimal,
    pub net_monthly: Decimal,
    pub net_weekly: Decimal,
    pub net_daily: Decimal,
    /// Deductions as a percentage of gross
    pub effective_rate_pct: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pension: Option<PensionReport>,
}

impl TakeHomeReport {
    /// Tax year label followed by the tax code note
    pub fn note(&self) -> String {
        format!("{}. {}", self.tax_year, self.tax_code.note)
    }
}

/// Run the full pipeline for the current tax year
pub fn calculate_take_home(input: &CalculationInput) -> TakeHomeReport {
    calculate_take_home_for(input, TaxYear::CURRENT)
}

pub fn calculate_take_home_for(input: &CalculationInput, tax_year: TaxYear) -> TakeHomeReport {
    let gross = clamp_amount(input.salary);
    let code = parse_tax_code(&input.tax_code, input.region);
    let income_tax = calculate_income_tax(gross, &code);
    let ni = calculate_ni(gross);

    let deductions = income_tax.total + ni.total;
    let net_annual = (gross - deductions).max(Decimal::ZERO);
    let divisor = if gross.is_zero() { Decimal::ONE } else { gross };
    let effective_rate_pct = deductions / divisor * dec!(100);

    let pension = input
        .pension
        .as_ref()
        .map(|params| project_pension(gross, &code, params, tax_year));

    log::debug!(
        "Gross {} ({}): tax {}, NI {}, net {}",
        gross,
        code.code,
        income_tax.total,
        ni.total,
        net_annual
    );

    TakeHomeReport {
        tax_year: tax_year.label(),
        tax_code: code,
        gross_annual: gross,
        income_tax,
        ni,
        deductions,
        net_annual,
        net_monthly: net_annual / dec!(12),
        net_weekly: net_annual / dec!(52),
        net_daily: net_annual / dec!(365),
        effective_rate_pct,
        pension,
    }
}
