pub mod app;
pub mod worksheet_processor;

pub use app::App;
pub use worksheet_processor::{
    process_worksheet, GenerationOutcome, GenerationReport, OUTPUT_FILE_NAME,
};
