pub mod bands;
pub mod calculate;
pub mod codes;
pub mod schema;

use crate::tax::CalculationInput;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid calculation input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no input received. Provide a file or pipe data to stdin.")]
    Empty,
}

/// Read a JSON calculation input from a file (or stdin with "-")
pub fn read_input(path: &Path) -> Result<CalculationInput, InputError> {
    let buffer = if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .map_err(|source| InputError::Io {
                path: "stdin".to_string(),
                source,
            })?;
        buffer
    } else {
        let io_err = |source| InputError::Io {
            path: path.display().to_string(),
            source,
        };
        let mut buffer = Vec::new();
        BufReader::new(File::open(path).map_err(io_err)?)
            .read_to_end(&mut buffer)
            .map_err(io_err)?;
        buffer
    };

    if buffer.iter().all(u8::is_ascii_whitespace) {
        return Err(InputError::Empty);
    }

    let input: CalculationInput = serde_json::from_slice(&buffer)?;
    log::info!(
        "Read calculation input: salary {}, tax code {}",
        input.salary,
        input.tax_code
    );
    Ok(input)
}

pub fn format_gbp(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-£{:.2}", amount.abs())
    } else {
        format!("£{:.2}", amount)
    }
}

/// Format a fraction (0.2) as a percentage ("20%")
pub fn format_rate(rate: Decimal) -> String {
    let pct = (rate * Decimal::ONE_HUNDRED).normalize();
    format!("{}%", pct)
}
