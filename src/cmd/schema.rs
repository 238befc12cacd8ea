//! Schema command - print the expected JSON input format

use crate::tax::CalculationInput;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = schema_for!(CalculationInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
