pub mod loaders;
pub mod question;
pub mod taxonomy;

pub use loaders::{load_taxonomies, load_worksheet_request, save_taxonomies, WorksheetRequest};
pub use question::{NewQuestion, QuestionRecord};
pub use taxonomy::Taxonomies;
