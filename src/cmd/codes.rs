//! Codes command - show how tax codes are interpreted

use super::format_gbp;
use crate::tax::{parse_tax_code, ParsedTaxCode, Region};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct CodesCommand {
    /// Tax codes to interpret
    #[arg(required = true)]
    codes: Vec<String>,

    /// Region used when a code has no S/C prefix
    #[arg(short, long, value_enum, default_value_t = Region::RestOfUk)]
    region: Region,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Exit with code 1 if any code was not recognised
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Clone, Tabled)]
struct CodeRow {
    #[tabled(rename = "Input")]
    input: String,

    #[tabled(rename = "Code")]
    code: String,

    #[tabled(rename = "Region")]
    region: String,

    #[tabled(rename = "Mode")]
    mode: String,

    #[tabled(rename = "Allowance")]
    allowance: String,

    #[tabled(rename = "Note")]
    note: String,
}

impl CodesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let parsed: Vec<ParsedTaxCode> = self
            .codes
            .iter()
            .map(|code| parse_tax_code(code, self.region))
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        } else {
            self.print_table(&parsed);
        }

        if self.strict && parsed.iter().any(ParsedTaxCode::is_fallback) {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_table(&self, parsed: &[ParsedTaxCode]) {
        let rows: Vec<CodeRow> = self
            .codes
            .iter()
            .zip(parsed)
            .map(|(input, p)| CodeRow {
                input: input.clone(),
                code: p.code.clone(),
                region: p.region.to_string(),
                mode: p.describe_mode(),
                allowance: format_gbp(p.allowance()),
                note: p.note.clone(),
            })
            .collect();

        println!("{}", Table::new(rows).with(Style::rounded()));
    }
}
