//! Bands command - print the income tax and NI thresholds in use

use super::{format_gbp, format_rate};
use crate::tax::uk::{NI_THRESHOLDS, PERSONAL_ALLOWANCE};
use crate::tax::{Region, TaxBand, TaxYear};
use clap::Args;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct BandsCommand {
    /// Region whose income tax bands to show
    #[arg(short, long, value_enum, default_value_t = Region::RestOfUk)]
    region: Region,

    /// Personal Allowance the first band starts from
    #[arg(short, long, default_value_t = PERSONAL_ALLOWANCE, allow_negative_numbers = true)]
    allowance: Decimal,
}

#[derive(Debug, Clone, Tabled)]
pub struct BandRow {
    #[tabled(rename = "Band")]
    pub name: String,

    #[tabled(rename = "From")]
    pub from: String,

    #[tabled(rename = "To")]
    pub to: String,

    #[tabled(rename = "Rate")]
    pub rate: String,
}

impl BandsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let year = TaxYear::CURRENT;

        println!();
        println!("INCOME TAX BANDS ({}, {})", year, self.region);
        println!();
        print_table(band_rows(self.region.bands(), self.allowance));
        println!();

        println!("NATIONAL INSURANCE ({})", year);
        println!();
        print_table(ni_rows());
        println!();
        Ok(())
    }
}

fn print_table(rows: Vec<BandRow>) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

/// Rows in gross-income terms. The first band starts where the allowance ends.
pub fn band_rows(bands: &[TaxBand], allowance: Decimal) -> Vec<BandRow> {
    let allowance = allowance.max(Decimal::ZERO);
    let mut rows = vec![BandRow {
        name: "Personal Allowance".to_string(),
        from: format_gbp(Decimal::ZERO),
        to: format_gbp(allowance),
        rate: "0%".to_string(),
    }];

    let mut from = allowance;
    for band in bands {
        rows.push(BandRow {
            name: band.name.to_string(),
            from: format_gbp(from),
            to: band.upper.map_or("-".to_string(), format_gbp),
            rate: format_rate(band.rate),
        });
        if let Some(upper) = band.upper {
            from = upper;
        }
    }
    rows
}

fn ni_rows() -> Vec<BandRow> {
    vec![
        BandRow {
            name: "Below primary threshold".to_string(),
            from: format_gbp(Decimal::ZERO),
            to: format_gbp(NI_THRESHOLDS.primary),
            rate: "0%".to_string(),
        },
        BandRow {
            name: "Main rate".to_string(),
            from: format_gbp(NI_THRESHOLDS.primary),
            to: format_gbp(NI_THRESHOLDS.upper),
            rate: format_rate(NI_THRESHOLDS.main_rate),
        },
        BandRow {
            name: "Upper rate".to_string(),
            from: format_gbp(NI_THRESHOLDS.upper),
            to: "-".to_string(),
            rate: format_rate(NI_THRESHOLDS.upper_rate),
        },
    ]
}
