pub mod income;
pub mod ni;
pub mod pension;
pub mod take_home;
pub mod tax_code;
pub mod uk;

// Flat public surface for domain types and functions.
#[allow(unused_imports)]
pub use income::{calculate_income_tax, tapered_allowance, BandSlice, IncomeTaxReport};
#[allow(unused_imports)]
pub use ni::{calculate_ni, NiReport};
#[allow(unused_imports)]
pub use pension::{future_value, project_pension, PensionParameters, PensionReport};
pub use take_home::{calculate_take_home, CalculationInput, TakeHomeReport};
#[allow(unused_imports)]
pub use tax_code::{parse_tax_code, ParsedTaxCode, TaxCodeMode};
pub use uk::{Region, TaxBand, TaxYear};
