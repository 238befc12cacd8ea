use clap::{Parser, Subcommand};

mod cmd;
mod tax;

/// UK take-home pay, National Insurance and pension calculator
#[derive(Parser, Debug)]
#[command(name = "takehome", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate income tax, NI and net pay for a salary
    Calculate(cmd::calculate::CalculateCommand),
    /// Show the income tax bands and NI thresholds
    Bands(cmd::bands::BandsCommand),
    /// Show how tax codes are interpreted
    Codes(cmd::codes::CodesCommand),
    /// Print the JSON Schema for calculation input files
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Calculate(calculate) => calculate.exec(),
        Command::Bands(bands) => bands.exec(),
        Command::Codes(codes) => codes.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
