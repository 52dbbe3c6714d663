pub mod constants;
pub mod values;
pub mod progress;

pub use constants::*;
pub use values::{format_float, is_missing, parse_date, parse_measurement};
pub use progress::ProgressReporter;
