use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use image::{Rgba, RgbaImage};

use super::SessionController;
use crate::config::AnnotatorConfig;
use crate::editor::Viewport;
use crate::export::{encode_png_data_url, GlyphSource};
use crate::overlay::HeadlessHost;
use crate::storage::{
    AnnotationSink, DeliveryReceipt, SavePayload, StorageError, StorageResult,
};

#[derive(Debug, Default)]
pub(crate) struct MemorySink {
    payloads: Mutex<Vec<SavePayload>>,
}

impl MemorySink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn payloads(&self) -> Vec<SavePayload> {
        self.payloads
            .lock()
            .map(|payloads| payloads.clone())
            .unwrap_or_default()
    }
}

impl AnnotationSink for MemorySink {
    fn deliver(&self, payload: &SavePayload) -> StorageResult<DeliveryReceipt> {
        self.payloads
            .lock()
            .expect("sink lock should not be poisoned")
            .push(payload.clone());
        Ok(DeliveryReceipt::default())
    }
}

/// Holds every delivery until the paired sender releases it or is dropped.
#[derive(Debug)]
pub(crate) struct GatedSink {
    gate: Mutex<Receiver<()>>,
    inner: MemorySink,
}

impl GatedSink {
    pub(crate) fn new() -> (Self, Sender<()>) {
        let (release, gate) = mpsc::channel();
        let sink = Self {
            gate: Mutex::new(gate),
            inner: MemorySink::new(),
        };
        (sink, release)
    }

    pub(crate) fn payloads(&self) -> Vec<SavePayload> {
        self.inner.payloads()
    }
}

impl AnnotationSink for GatedSink {
    fn deliver(&self, payload: &SavePayload) -> StorageResult<DeliveryReceipt> {
        let _ = self
            .gate
            .lock()
            .expect("gate lock should not be poisoned")
            .recv();
        self.inner.deliver(payload)
    }
}

#[derive(Debug)]
pub(crate) struct FailingSink;

impl AnnotationSink for FailingSink {
    fn deliver(&self, _payload: &SavePayload) -> StorageResult<DeliveryReceipt> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "downloads blocked",
        )))
    }
}

pub(crate) fn screenshot_url(width: u32, height: u32) -> String {
    let image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    encode_png_data_url(&image).expect("fixture screenshot should encode")
}

pub(crate) fn controller<S: AnnotationSink + 'static>(
    sink: S,
) -> (SessionController<HeadlessHost>, Arc<S>) {
    controller_with_host(HeadlessHost::new(Viewport::new(1920, 1080)), sink)
}

pub(crate) fn controller_with_host<S: AnnotationSink + 'static>(
    host: HeadlessHost,
    sink: S,
) -> (SessionController<HeadlessHost>, Arc<S>) {
    let sink = Arc::new(sink);
    let controller = SessionController::new(
        host,
        Arc::clone(&sink) as Arc<dyn AnnotationSink>,
        AnnotatorConfig::default(),
        GlyphSource::none(),
    );
    (controller, sink)
}

pub(crate) fn object_count(controller: &SessionController<HeadlessHost>) -> usize {
    controller
        .state()
        .canvas
        .as_ref()
        .map_or(0, |canvas| canvas.len())
}
