//! Option-record data: the in-memory table and its CSV loader.

pub mod loader;
pub mod types;

pub use loader::{load_option_table, read_option_table, LoaderError, DEFAULT_DATA_PATH};
pub use types::{OptionRecord, OptionTable, OptionType};
