pub mod csv_import;

pub use csv_import::{load_csv_file, parse_questions_csv};
