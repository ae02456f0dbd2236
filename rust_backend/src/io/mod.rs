//! Reading raw records and writing cleaned ones.
//!
//! Raw records are read from JSON arrays or JSON Lines files; cleaned
//! records are written back in either format. Parse errors carry the JSON
//! path of the offending value.
//!
//! # Example
//!
//! ```no_run
//! use users_clean::io::loaders::RecordLoader;
//! use std::path::Path;
//!
//! let result = RecordLoader::load_from_file(Path::new("users_dirty.json"))
//!     .expect("Failed to load");
//! println!("Loaded {} records", result.num_records);
//! ```

pub mod loaders;
pub mod writers;


pub use loaders::{RecordFormat, RecordLoadResult, RecordLoader};
pub use writers::{records_to_string, write_records, write_records_to};
