pub mod math_normalizer;
pub mod page_renderer;
pub mod pdf_writer;

pub use math_normalizer::MathNormalizer;
pub use page_renderer::PageRenderer;
pub use pdf_writer::{FinishedDocument, PageKind, PdfWriter};
