//! Calculate command - take-home pay, deductions and optional pension projection

use super::{format_gbp, format_rate, read_input};
use crate::tax::{
    calculate_take_home, CalculationInput, IncomeTaxReport, PensionParameters, PensionReport,
    Region, TakeHomeReport,
};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalculateCommand {
    /// Gross annual salary in GBP
    #[arg(short, long, required_unless_present = "input", allow_negative_numbers = true)]
    salary: Option<Decimal>,

    /// PAYE tax code (e.g. 1257L, S1257L, BR, K475)
    #[arg(short, long, default_value = "1257L")]
    tax_code: String,

    /// Region used when the tax code has no S/C prefix
    #[arg(short, long, value_enum, default_value_t = Region::RestOfUk)]
    region: Region,

    /// JSON input file (or "-" for stdin); replaces the salary/code/pension flags
    #[arg(short, long, conflicts_with = "salary")]
    input: Option<PathBuf>,

    #[command(flatten)]
    pension: PensionArgs,

    /// Output as JSON instead of formatted tables
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output line items as CSV
    #[arg(long)]
    csv: bool,
}

/// Pension flags. Giving any of them turns on the projection; unset ones use defaults.
#[derive(Args, Debug)]
pub struct PensionArgs {
    /// Employee pension contribution, % of qualifying earnings
    #[arg(long, allow_negative_numbers = true)]
    employee_pct: Option<Decimal>,

    /// Employer pension contribution, % of qualifying earnings
    #[arg(long, allow_negative_numbers = true)]
    employer_pct: Option<Decimal>,

    /// Current age in years
    #[arg(long, allow_negative_numbers = true)]
    current_age: Option<i32>,

    /// Planned retirement age in years
    #[arg(long, allow_negative_numbers = true)]
    retirement_age: Option<i32>,

    /// Current pension pot value
    #[arg(long, allow_negative_numbers = true)]
    pot: Option<Decimal>,

    /// Annual growth rate, %
    #[arg(long, allow_negative_numbers = true)]
    growth_pct: Option<Decimal>,

    /// Annual drawdown rate in retirement, %
    #[arg(long, allow_negative_numbers = true)]
    drawdown_pct: Option<Decimal>,
}

impl PensionArgs {
    fn to_parameters(&self) -> Option<PensionParameters> {
        let any_set = self.employee_pct.is_some()
            || self.employer_pct.is_some()
            || self.current_age.is_some()
            || self.retirement_age.is_some()
            || self.pot.is_some()
            || self.growth_pct.is_some()
            || self.drawdown_pct.is_some();
        if !any_set {
            return None;
        }

        let defaults = PensionParameters::default();
        Some(PensionParameters {
            employee_pct: self.employee_pct.unwrap_or(defaults.employee_pct),
            employer_pct: self.employer_pct.unwrap_or(defaults.employer_pct),
            current_age: self.current_age.unwrap_or(defaults.current_age),
            retirement_age: self.retirement_age.unwrap_or(defaults.retirement_age),
            current_pot: self.pot.unwrap_or(defaults.current_pot),
            growth_pct: self.growth_pct.unwrap_or(defaults.growth_pct),
            drawdown_pct: self.drawdown_pct.unwrap_or(defaults.drawdown_pct),
        })
    }
}

/// One labelled figure, used for both the table and CSV output
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct LineItem {
    #[tabled(rename = "Section")]
    pub section: &'static str,

    #[tabled(rename = "Item")]
    pub item: String,

    #[tabled(rename = "Amount")]
    pub amount: String,
}

impl LineItem {
    fn new(section: &'static str, item: impl Into<String>, amount: String) -> Self {
        LineItem {
            section,
            item: item.into(),
            amount,
        }
    }
}

impl CalculateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.gather_input()?;
        let report = calculate_take_home(&input);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else if self.csv {
            let mut wtr = csv::Writer::from_writer(io::stdout());
            for row in line_items(&report) {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        } else {
            print_report(&report);
        }
        Ok(())
    }

    fn gather_input(&self) -> anyhow::Result<CalculationInput> {
        if let Some(path) = &self.input {
            return Ok(read_input(path)?);
        }
        let salary = self
            .salary
            .ok_or_else(|| anyhow::anyhow!("--salary is required without --input"))?;
        Ok(CalculationInput {
            pension: self.pension.to_parameters(),
            ..CalculationInput::new(salary, &self.tax_code, self.region)
        })
    }
}

fn print_report(report: &TakeHomeReport) {
    println!();
    println!(
        "TAKE-HOME PAY ({}, {})",
        report.tax_code.code,
        report.tax_code.region
    );
    println!();

    let table = Table::new(line_items(report))
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!();
    println!("{}", report.note());
    if let Some(pension) = &report.pension {
        println!("{}", pension.note);
    }
    println!();
}

/// Flatten a report into labelled rows
pub fn line_items(report: &TakeHomeReport) -> Vec<LineItem> {
    let mut rows = vec![
        LineItem::new("Pay", "Gross annual", format_gbp(report.gross_annual)),
        LineItem::new("Pay", "Tax code", report.tax_code.describe_mode()),
    ];

    income_tax_rows(&report.income_tax, &mut rows);

    rows.push(LineItem::new(
        "National Insurance",
        format!("Main rate on {}", format_gbp(report.ni.main_band)),
        format_gbp(report.ni.main_contribution),
    ));
    rows.push(LineItem::new(
        "National Insurance",
        format!("Upper rate on {}", format_gbp(report.ni.upper_band)),
        format_gbp(report.ni.upper_contribution),
    ));
    rows.push(LineItem::new(
        "National Insurance",
        "Total",
        format_gbp(report.ni.total),
    ));

    rows.extend([
        LineItem::new("Take-home", "Total deductions", format_gbp(report.deductions)),
        LineItem::new("Take-home", "Net per year", format_gbp(report.net_annual)),
        LineItem::new("Take-home", "Net per month", format_gbp(report.net_monthly)),
        LineItem::new("Take-home", "Net per week", format_gbp(report.net_weekly)),
        LineItem::new("Take-home", "Net per day", format_gbp(report.net_daily)),
        LineItem::new(
            "Take-home",
            "Effective deduction rate",
            format!("{:.2}%", report.effective_rate_pct),
        ),
    ]);

    if let Some(pension) = &report.pension {
        pension_rows(pension, &mut rows);
    }

    rows
}

fn income_tax_rows(tax: &IncomeTaxReport, rows: &mut Vec<LineItem>) {
    const SECTION: &str = "Income Tax";

    if let Some(rate) = tax.flat_rate {
        rows.push(LineItem::new(
            SECTION,
            format!("Flat {} on {}", format_rate(rate), format_gbp(tax.gross)),
            format_gbp(tax.total),
        ));
        return;
    }

    if tax.bands.is_empty() {
        rows.push(LineItem::new(SECTION, "No tax", format_gbp(Decimal::ZERO)));
        return;
    }

    rows.push(LineItem::new(
        SECTION,
        "Allowance",
        format_gbp(tax.effective_allowance),
    ));
    rows.push(LineItem::new(
        SECTION,
        "Taxable income",
        format_gbp(tax.taxable_income),
    ));
    for slice in tax.bands.iter().filter(|s| !s.amount.is_zero()) {
        rows.push(LineItem::new(
            SECTION,
            format!(
                "{} {} on {}",
                slice.name,
                format_rate(slice.rate),
                format_gbp(slice.amount)
            ),
            format_gbp(slice.tax),
        ));
    }
    rows.push(LineItem::new(SECTION, "Total", format_gbp(tax.total)));
}

fn pension_rows(pension: &PensionReport, rows: &mut Vec<LineItem>) {
    const SECTION: &str = "Pension";
    let p = &pension.parameters;

    rows.extend([
        LineItem::new(
            SECTION,
            "Qualifying earnings",
            format_gbp(pension.qualifying_earnings),
        ),
        LineItem::new(
            SECTION,
            format!("Employee {}%", p.employee_pct.normalize()),
            format_gbp(pension.employee_contribution),
        ),
        LineItem::new(
            SECTION,
            format!("Employer {}%", p.employer_pct.normalize()),
            format_gbp(pension.employer_contribution),
        ),
        LineItem::new(
            SECTION,
            "Income tax after sacrifice",
            format_gbp(pension.income_tax),
        ),
        LineItem::new(SECTION, "NI after sacrifice", format_gbp(pension.ni)),
        LineItem::new(
            SECTION,
            "Net per year after sacrifice",
            format_gbp(pension.net_annual),
        ),
        LineItem::new(
            SECTION,
            format!(
                "Pot at {} ({} years)",
                p.retirement_age, pension.years_to_retirement
            ),
            format_gbp(pension.projected_pot),
        ),
        LineItem::new(
            SECTION,
            format!("Drawdown {}% per week", p.drawdown_pct.normalize()),
            format_gbp(pension.drawdown_weekly),
        ),
        LineItem::new(
            SECTION,
            format!("State Pension (from {})", pension.state_pension_age),
            format_gbp(pension.state_pension_weekly),
        ),
        LineItem::new(
            SECTION,
            "Weekly income in retirement",
            format_gbp(pension.total_weekly_income),
        ),
        LineItem::new(
            SECTION,
            format!(
                "Estimated tax at {:.2}%",
                pension.effective_tax_rate * dec!(100)
            ),
            format_gbp(pension.estimated_weekly_tax),
        ),
        LineItem::new(
            SECTION,
            "Weekly income after tax",
            format_gbp(pension.weekly_income_after_tax),
        ),
    ]);
}
