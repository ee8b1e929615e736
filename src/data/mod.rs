//! Data module - typed records and CSV parsing

mod parse;
mod record;
mod value;

pub use parse::{parse_csv, ParseError};
pub use record::{Dataset, Record};
pub use value::Value;
