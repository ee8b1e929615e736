//! Chartfeed - Typed CSV Dataset Loading for Chart Front-Ends
//!
//! Fetches a CSV resource over HTTP(S), sniffs a type for every cell
//! (number, boolean, timestamp, string, null), and holds the resulting
//! record sequence in a loader-owned state container for a rendering
//! layer to read.

mod data;
mod fetch;
mod loader;

pub use data::{parse_csv, Dataset, ParseError, Record, Value};
pub use fetch::{FetchError, HttpFetcher};
pub use loader::{DatasetLoader, LoadEvent, LoadTask, LoaderError};
