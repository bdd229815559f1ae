pub mod toml_loader;

pub use toml_loader::{
    load_taxonomies, load_worksheet_request, save_taxonomies, WorksheetRequest,
};
