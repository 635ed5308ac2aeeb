use image::RgbaImage;
use thiserror::Error;

use super::{ControlsView, OverlayLayout};
use crate::editor::{CanvasFit, Viewport};
use crate::feedback::Toast;

/// Opaque handle to a node the host created for the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Registration handle for the global keyboard listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("failed to mount overlay: {0}")]
    Mount(String),
    #[error("failed to register keyboard listener: {0}")]
    Listener(String),
    #[error("failed to attach drawing surface: {0}")]
    Attach(String),
    #[error("failed to dispose drawing surface: {0}")]
    Dispose(String),
}

pub type HostResult<T> = std::result::Result<T, HostError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayNodes {
    pub root: NodeId,
    pub description_field: NodeId,
}

/// The page the overlay is injected into.
pub trait OverlayHost {
    fn viewport(&self) -> Viewport;
    fn set_page_scroll_suspended(&mut self, suspended: bool);
    fn mount_overlay(&mut self, layout: &OverlayLayout) -> HostResult<OverlayNodes>;
    fn remove_overlay(&mut self, root: NodeId);
    fn add_key_listener(&mut self) -> HostResult<ListenerId>;
    fn remove_key_listener(&mut self, listener: ListenerId);
    /// Shows the screenshot as a non-interactive background under the canvas.
    fn attach_canvas(
        &mut self,
        root: NodeId,
        fit: &CanvasFit,
        background: &RgbaImage,
    ) -> HostResult<()>;
    fn detach_canvas(&mut self) -> HostResult<()>;
    fn render_controls(&mut self, view: &ControlsView);
    fn show_toast(&mut self, toast: &Toast);
    fn remove_toast(&mut self);
    fn set_title_rows(&mut self, rows: usize);
}
