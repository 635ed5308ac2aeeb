use image::RgbaImage;

use super::{
    ControlsView, HostError, HostResult, ListenerId, NodeId, OverlayHost, OverlayLayout,
    OverlayNodes,
};
use crate::editor::{CanvasFit, ImageBounds, Viewport};
use crate::feedback::Toast;

/// Host without a real page. Keeps the overlay's visible state in memory so
/// replays and tests can inspect what a user would see.
#[derive(Debug)]
pub struct HeadlessHost {
    viewport: Viewport,
    next_node: u64,
    next_listener: u64,
    scroll_suspended: bool,
    mounted_root: Option<NodeId>,
    listeners: Vec<ListenerId>,
    canvas: Option<ImageBounds>,
    controls: Option<ControlsView>,
    controls_renders: usize,
    toast: Option<Toast>,
    toasts_shown: usize,
    title_rows: usize,
    failures: InjectedFailures,
}

#[derive(Debug, Default)]
struct InjectedFailures {
    mount: Option<String>,
    listener: Option<String>,
    attach: Option<String>,
    detach: Option<String>,
}

impl HeadlessHost {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            next_node: 1,
            next_listener: 1,
            scroll_suspended: false,
            mounted_root: None,
            listeners: Vec::new(),
            canvas: None,
            controls: None,
            controls_renders: 0,
            toast: None,
            toasts_shown: 0,
            title_rows: 0,
            failures: InjectedFailures::default(),
        }
    }

    fn allocate_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    pub fn scroll_suspended(&self) -> bool {
        self.scroll_suspended
    }

    pub fn mounted_root(&self) -> Option<NodeId> {
        self.mounted_root
    }

    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Display size of the attached drawing surface.
    pub fn canvas(&self) -> Option<ImageBounds> {
        self.canvas
    }

    pub fn controls(&self) -> Option<ControlsView> {
        self.controls
    }

    pub fn controls_renders(&self) -> usize {
        self.controls_renders
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn toasts_shown(&self) -> usize {
        self.toasts_shown
    }

    pub fn title_rows(&self) -> usize {
        self.title_rows
    }
}

#[cfg(test)]
impl HeadlessHost {
    pub(crate) fn fail_next_mount(&mut self, reason: &str) {
        self.failures.mount = Some(reason.to_string());
    }

    pub(crate) fn fail_next_listener(&mut self, reason: &str) {
        self.failures.listener = Some(reason.to_string());
    }

    pub(crate) fn fail_next_attach(&mut self, reason: &str) {
        self.failures.attach = Some(reason.to_string());
    }

    pub(crate) fn fail_next_detach(&mut self, reason: &str) {
        self.failures.detach = Some(reason.to_string());
    }
}

impl OverlayHost for HeadlessHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_page_scroll_suspended(&mut self, suspended: bool) {
        self.scroll_suspended = suspended;
    }

    fn mount_overlay(&mut self, layout: &OverlayLayout) -> HostResult<OverlayNodes> {
        if let Some(reason) = self.failures.mount.take() {
            return Err(HostError::Mount(reason));
        }
        let root = self.allocate_node();
        let description_field = self.allocate_node();
        self.mounted_root = Some(root);
        tracing::debug!(
            root = root.0,
            canvas_width = layout.canvas.width,
            canvas_height = layout.canvas.height,
            "headless overlay mounted"
        );
        Ok(OverlayNodes {
            root,
            description_field,
        })
    }

    fn remove_overlay(&mut self, root: NodeId) {
        if self.mounted_root == Some(root) {
            self.mounted_root = None;
            self.toast = None;
            self.title_rows = 0;
        }
    }

    fn add_key_listener(&mut self) -> HostResult<ListenerId> {
        if let Some(reason) = self.failures.listener.take() {
            return Err(HostError::Listener(reason));
        }
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(id);
        Ok(id)
    }

    fn remove_key_listener(&mut self, listener: ListenerId) {
        self.listeners.retain(|id| *id != listener);
    }

    fn attach_canvas(
        &mut self,
        _root: NodeId,
        fit: &CanvasFit,
        _background: &RgbaImage,
    ) -> HostResult<()> {
        if let Some(reason) = self.failures.attach.take() {
            return Err(HostError::Attach(reason));
        }
        self.canvas = Some(fit.display);
        Ok(())
    }

    fn detach_canvas(&mut self) -> HostResult<()> {
        self.canvas = None;
        match self.failures.detach.take() {
            Some(reason) => Err(HostError::Dispose(reason)),
            None => Ok(()),
        }
    }

    fn render_controls(&mut self, view: &ControlsView) {
        self.controls = Some(*view);
        self.controls_renders += 1;
    }

    fn show_toast(&mut self, toast: &Toast) {
        self.toast = Some(toast.clone());
        self.toasts_shown += 1;
    }

    fn remove_toast(&mut self) {
        self.toast = None;
    }

    fn set_title_rows(&mut self, rows: usize) {
        self.title_rows = rows;
    }
}
