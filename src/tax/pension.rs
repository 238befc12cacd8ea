//! Workplace pension contributions and retirement projection
//!
//! Contributions are taken by salary sacrifice, so income tax and NI are
//! recomputed on pay after the employee contribution.

use super::income::calculate_income_tax;
use super::ni::calculate_ni;
use super::tax_code::ParsedTaxCode;
use super::uk::{
    clamp_amount, state_pension_age, TaxYear, FULL_STATE_PENSION_WEEKLY,
    QUALIFYING_EARNINGS_LOWER, QUALIFYING_EARNINGS_UPPER,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const MIN_AGE: i32 = 16;
const MAX_AGE: i32 = 100;
const WEEKS_PER_YEAR: Decimal = dec!(52);

pub const PENSION_TAX_NOTE: &str =
    "Pension-phase tax is an estimate: your current effective tax rate applied to drawdown income.";

/// Pension inputs. Percentages are whole-number percents (5 = 5%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PensionParameters {
    /// Employee contribution, percent of qualifying earnings (0-100)
    #[schemars(with = "f64")]
    pub employee_pct: Decimal,
    /// Employer contribution, percent of qualifying earnings (0-100)
    #[schemars(with = "f64")]
    pub employer_pct: Decimal,
    /// Age today in years (16-100)
    pub current_age: i32,
    /// Planned retirement age in years (16-100)
    pub retirement_age: i32,
    /// Current value of the pension pot, capped at 1,000,000,000,000,000
    #[schemars(with = "f64")]
    pub current_pot: Decimal,
    /// Annual investment growth, percent (0-15)
    #[schemars(with = "f64")]
    pub growth_pct: Decimal,
    /// Annual drawdown from the pot in retirement, percent (1-10)
    #[schemars(with = "f64")]
    pub drawdown_pct: Decimal,
}

impl Default for PensionParameters {
    fn default() -> Self {
        PensionParameters {
            employee_pct: dec!(5),
            employer_pct: dec!(3),
            current_age: 30,
            retirement_age: 67,
            current_pot: Decimal::ZERO,
            growth_pct: dec!(5),
            drawdown_pct: dec!(4),
        }
    }
}

fn clamp(value: Decimal, min: Decimal, max: Decimal) -> Decimal {
    value.max(min).min(max)
}

impl PensionParameters {
    /// Bring every field into its valid range. Each field is clamped on its own,
    /// so a retirement age below the current age is kept and yields zero years.
    pub fn clamped(&self) -> Self {
        PensionParameters {
            employee_pct: clamp(self.employee_pct, Decimal::ZERO, dec!(100)),
            employer_pct: clamp(self.employer_pct, Decimal::ZERO, dec!(100)),
            current_age: self.current_age.clamp(MIN_AGE, MAX_AGE),
            retirement_age: self.retirement_age.clamp(MIN_AGE, MAX_AGE),
            current_pot: clamp_amount(self.current_pot),
            growth_pct: clamp(self.growth_pct, Decimal::ZERO, dec!(15)),
            drawdown_pct: clamp(self.drawdown_pct, dec!(1), dec!(10)),
        }
    }

    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age).max(0) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PensionReport {
    /// Parameters after clamping
    pub parameters: PensionParameters,
    pub qualifying_earnings: Decimal,
    pub employee_contribution: Decimal,
    pub employer_contribution: Decimal,
    pub annual_contribution: Decimal,
    /// Gross pay after the salary sacrifice
    pub pay_after_sacrifice: Decimal,
    pub income_tax: Decimal,
    pub ni: Decimal,
    pub net_annual: Decimal,
    pub years_to_retirement: u32,
    pub projected_pot: Decimal,
    pub drawdown_weekly: Decimal,
    pub state_pension_age: i32,
    /// Zero when retiring before State Pension age
    pub state_pension_weekly: Decimal,
    pub total_weekly_income: Decimal,
    /// Income tax over pay after sacrifice, as a fraction
    pub effective_tax_rate: Decimal,
    pub estimated_weekly_tax: Decimal,
    pub weekly_income_after_tax: Decimal,
    pub note: &'static str,
}

/// Earnings inside the auto-enrolment qualifying band
pub fn qualifying_earnings(gross: Decimal) -> Decimal {
    (gross.min(QUALIFYING_EARNINGS_UPPER) - QUALIFYING_EARNINGS_LOWER).max(Decimal::ZERO)
}

/// Value after `years` of compound growth at `rate` (a fraction) with a
/// contribution added at the end of each year. Saturates at `Decimal::MAX`.
pub fn future_value(
    current_pot: Decimal,
    annual_contribution: Decimal,
    rate: Decimal,
    years: u32,
) -> Decimal {
    let value = if rate.is_zero() {
        annual_contribution
            .checked_mul(Decimal::from(years))
            .and_then(|paid_in| current_pot.checked_add(paid_in))
    } else {
        let factor = Decimal::ONE + rate;
        (0..years)
            .try_fold(Decimal::ONE, |acc, _| acc.checked_mul(factor))
            .and_then(|growth| {
                let grown = current_pot.checked_mul(growth)?;
                let annuity = (growth - Decimal::ONE)
                    .checked_div(rate)?
                    .checked_mul(annual_contribution)?;
                grown.checked_add(annuity)
            })
    };
    value.unwrap_or(Decimal::MAX)
}

pub fn project_pension(
    gross: Decimal,
    code: &ParsedTaxCode,
    params: &PensionParameters,
    tax_year: TaxYear,
) -> PensionReport {
    let gross = clamp_amount(gross);
    let params = params.clamped();
    let hundred = dec!(100);

    let qualifying = qualifying_earnings(gross);
    let employee_contribution = qualifying * params.employee_pct / hundred;
    let employer_contribution = qualifying * params.employer_pct / hundred;
    let annual_contribution = employee_contribution + employer_contribution;

    let pay_after_sacrifice = (gross - employee_contribution).max(Decimal::ZERO);
    let income_tax = calculate_income_tax(pay_after_sacrifice, code).total;
    let ni = calculate_ni(pay_after_sacrifice).total;
    let net_annual = (pay_after_sacrifice - income_tax - ni).max(Decimal::ZERO);

    let years_to_retirement = params.years_to_retirement();
    let projected_pot = future_value(
        params.current_pot,
        annual_contribution,
        params.growth_pct / hundred,
        years_to_retirement,
    );
    log::debug!(
        "Projected pot {} after {} years at {}% growth, {} a year",
        projected_pot,
        years_to_retirement,
        params.growth_pct,
        annual_contribution
    );

    let drawdown_weekly = projected_pot / hundred * params.drawdown_pct / WEEKS_PER_YEAR;

    let spa = state_pension_age(tax_year.birth_year_for_age(params.current_age));
    let state_pension_weekly = if params.retirement_age >= spa {
        FULL_STATE_PENSION_WEEKLY
    } else {
        Decimal::ZERO
    };
    let total_weekly_income = drawdown_weekly + state_pension_weekly;

    let effective_tax_rate = if pay_after_sacrifice.is_zero() {
        Decimal::ZERO
    } else {
        income_tax / pay_after_sacrifice
    };
    let estimated_weekly_tax = drawdown_weekly * effective_tax_rate;

    PensionReport {
        parameters: params,
        qualifying_earnings: qualifying,
        employee_contribution,
        employer_contribution,
        annual_contribution,
        pay_after_sacrifice,
        income_tax,
        ni,
        net_annual,
        years_to_retirement,
        projected_pot,
        drawdown_weekly,
        state_pension_age: spa,
        state_pension_weekly,
        total_weekly_income,
        effective_tax_rate,
        estimated_weekly_tax,
        weekly_income_after_tax: total_weekly_income - estimated_weekly_tax,
        note: PENSION_TAX_NOTE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::tax_code::parse_tax_code;
    use crate::tax::uk::Region;

    fn params(employee_pct: Decimal, current_age: i32, retirement_age: i32) -> PensionParameters {
        PensionParameters {
            employee_pct,
            employer_pct: dec!(3),
            current_age,
            retirement_age,
            current_pot: Decimal::ZERO,
            growth_pct: Decimal::ZERO,
            drawdown_pct: dec!(4),
        }
    }

    #[test]
    fn qualifying_earnings_band() {
        assert_eq!(qualifying_earnings(dec!(30000)), dec!(23760));
        assert_eq!(qualifying_earnings(dec!(5000)), Decimal::ZERO);
        assert_eq!(qualifying_earnings(dec!(80000)), dec!(44030));
    }

    #[test]
    fn zero_growth_future_value() {
        assert_eq!(future_value(Decimal::ZERO, dec!(1000), Decimal::ZERO, 10), dec!(10000));
        assert_eq!(future_value(dec!(500), dec!(1000), Decimal::ZERO, 0), dec!(500));
    }

    #[test]
    fn future_value_saturates_instead_of_overflowing() {
        let pot = Decimal::from_scientific("1e24").unwrap();
        assert_eq!(future_value(pot, dec!(1000), dec!(0.15), 84), Decimal::MAX);
        assert_eq!(future_value(Decimal::MAX, Decimal::MAX, Decimal::ZERO, 2), Decimal::MAX);
    }

    #[test]
    fn huge_pot_is_capped_before_projection() {
        let mut p = params(dec!(5), 16, 100);
        p.current_pot = Decimal::from_scientific("1e24").unwrap();
        p.growth_pct = dec!(15);
        let code = parse_tax_code("1257L", Region::RestOfUk);
        let report = project_pension(dec!(30000), &code, &p, TaxYear::CURRENT);
        assert_eq!(report.parameters.current_pot, crate::tax::uk::MAX_AMOUNT);
        assert_eq!(report.years_to_retirement, 84);
        assert!(report.projected_pot > report.parameters.current_pot);
        assert!(report.projected_pot < Decimal::MAX);
    }

    #[test]
    fn compound_future_value() {
        // 1000 * 1.1^2 + 100 * (1.21 - 1) / 0.1
        assert_eq!(future_value(dec!(1000), dec!(100), dec!(0.10), 2), dec!(1420));
    }

    #[test]
    fn contributions_on_qualifying_earnings() {
        let code = parse_tax_code("1257L", Region::RestOfUk);
        let report = project_pension(dec!(30000), &code, &params(dec!(5), 30, 67), TaxYear::CURRENT);
        assert_eq!(report.employee_contribution, dec!(1188.00));
        assert_eq!(report.employer_contribution, dec!(712.80));
        assert_eq!(report.annual_contribution, dec!(1900.80));
    }

    #[test]
    fn salary_sacrifice_reduces_tax_and_ni() {
        let code = parse_tax_code("1257L", Region::RestOfUk);
        let report = project_pension(dec!(30000), &code, &params(dec!(5), 30, 67), TaxYear::CURRENT);
        assert_eq!(report.pay_after_sacrifice, dec!(28812));
        assert_eq!(report.income_tax, (dec!(28812) - dec!(12570)) * dec!(0.20));
        assert_eq!(report.ni, (dec!(28812) - dec!(12570)) * dec!(0.08));
        assert_eq!(
            report.net_annual,
            dec!(28812) - report.income_tax - report.ni
        );
    }

    #[test]
    fn projection_with_zero_growth() {
        let code = parse_tax_code("1257L", Region::RestOfUk);
        let report = project_pension(dec!(30000), &code, &params(dec!(5), 57, 67), TaxYear::CURRENT);
        assert_eq!(report.years_to_retirement, 10);
        assert_eq!(report.projected_pot, dec!(19008.00));
        assert_eq!(report.drawdown_weekly, dec!(19008) * dec!(0.04) / dec!(52));
    }

    #[test]
    fn retirement_before_current_age_gives_zero_years() {
        let mut p = params(dec!(5), 60, 55);
        p.current_pot = dec!(10000);
        let code = parse_tax_code("1257L", Region::RestOfUk);
        let report = project_pension(dec!(30000), &code, &p, TaxYear::CURRENT);
        assert_eq!(report.years_to_retirement, 0);
        assert_eq!(report.projected_pot, dec!(10000));
    }

    #[test]
    fn state_pension_added_from_state_pension_age() {
        let code = parse_tax_code("1257L", Region::RestOfUk);
        // Born 1995: State Pension age 68
        let early = project_pension(dec!(30000), &code, &params(dec!(5), 30, 67), TaxYear::CURRENT);
        assert_eq!(early.state_pension_age, 68);
        assert_eq!(early.state_pension_weekly, Decimal::ZERO);

        let late = project_pension(dec!(30000), &code, &params(dec!(5), 30, 68), TaxYear::CURRENT);
        assert_eq!(late.state_pension_weekly, FULL_STATE_PENSION_WEEKLY);
        assert_eq!(
            late.total_weekly_income,
            late.drawdown_weekly + FULL_STATE_PENSION_WEEKLY
        );
    }

    #[test]
    fn pension_tax_uses_current_effective_rate() {
        let code = parse_tax_code("1257L", Region::RestOfUk);
        let report = project_pension(dec!(30000), &code, &params(dec!(5), 30, 68), TaxYear::CURRENT);
        let rate = report.income_tax / report.pay_after_sacrifice;
        assert_eq!(report.effective_tax_rate, rate);
        assert_eq!(report.estimated_weekly_tax, report.drawdown_weekly * rate);
        assert!(report.estimated_weekly_tax < report.total_weekly_income * rate);
        assert_eq!(report.note, PENSION_TAX_NOTE);
    }

    #[test]
    fn zero_salary_has_no_tax_rate() {
        let code = parse_tax_code("1257L", Region::RestOfUk);
        let report = project_pension(Decimal::ZERO, &code, &params(dec!(5), 30, 68), TaxYear::CURRENT);
        assert_eq!(report.effective_tax_rate, Decimal::ZERO);
        assert_eq!(report.employee_contribution, Decimal::ZERO);
    }

    #[test]
    fn parameters_clamped_independently() {
        let raw = PensionParameters {
            employee_pct: dec!(150),
            employer_pct: dec!(-5),
            current_age: 5,
            retirement_age: 130,
            current_pot: dec!(-100),
            growth_pct: dec!(40),
            drawdown_pct: dec!(0),
        };
        let clamped = raw.clamped();
        assert_eq!(clamped.employee_pct, dec!(100));
        assert_eq!(clamped.employer_pct, Decimal::ZERO);
        assert_eq!(clamped.current_age, 16);
        assert_eq!(clamped.retirement_age, 100);
        assert_eq!(clamped.current_pot, Decimal::ZERO);
        assert_eq!(clamped.growth_pct, dec!(15));
        assert_eq!(clamped.drawdown_pct, dec!(1));

        let negative = PensionParameters {
            current_age: -3,
            retirement_age: i32::MIN,
            ..raw
        }
        .clamped();
        assert_eq!(negative.current_age, 16);
        assert_eq!(negative.retirement_age, 16);
        assert_eq!(negative.years_to_retirement(), 0);
    }
}
