pub mod csv_table;
pub mod error;
pub mod source;
pub mod values;

pub use csv_table::{CsvTable, read_csv_table};
pub use error::{IngestError, Result};
pub use source::{LoadedSource, ensure_inputs_exist, load_source};
pub use values::{format_optional, parse_f64, parse_opt_f64};
