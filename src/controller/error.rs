use thiserror::Error;

use crate::editor::ToolError;
use crate::export::ExportError;
use crate::overlay::HostError;
use crate::state::StateError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("an annotation session is already active")]
    AlreadyActive,
    #[error("no annotation session is active")]
    NoActiveSession,
    #[error("invalid screenshot: {0}")]
    InvalidScreenshot(#[source] ExportError),
    #[error("a {width}x{height} viewport leaves no room for the canvas")]
    NoCanvasSpace { width: u32, height: u32 },
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("failed to export annotation: {0}")]
    Export(#[from] ExportError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    State(#[from] StateError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
