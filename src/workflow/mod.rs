pub mod render_job;
pub mod worksheet_flow;

pub use render_job::{PageImage, PageRole, RenderJob, RenderPage};
pub use worksheet_flow::{
    CancelHandle, Cursor, FlowOutcome, GeneratorState, Pass, WorksheetFlow,
};
