//! Overlay shell: the chrome around the canvas and the host seam it is
//! injected through.

mod headless;
mod host;
mod layout;
mod shell;

pub use headless::HeadlessHost;
pub use host::{HostError, HostResult, ListenerId, NodeId, OverlayHost, OverlayNodes};
pub use layout::{layout_overlay, OverlayLayout, OverlayPane};
pub use shell::{title_rows_for, ControlsView, FormField, OverlayShell, UiEvent};
