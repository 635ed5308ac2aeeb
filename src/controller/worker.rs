use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use crate::storage::{AnnotationSink, DeliveryReceipt, SavePayload, StorageError, StorageResult};

/// A save hand-off running on its own thread. The controller polls it from
/// the UI loop; nothing blocks unless `wait` is called.
#[derive(Debug)]
pub(super) struct PendingDelivery {
    rx: mpsc::Receiver<StorageResult<DeliveryReceipt>>,
}

pub(super) fn spawn_delivery(
    sink: Arc<dyn AnnotationSink>,
    payload: SavePayload,
) -> PendingDelivery {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = sink.deliver(&payload);
        let _ = tx.send(result);
    });
    PendingDelivery { rx }
}

impl PendingDelivery {
    pub(super) fn poll(&self) -> Option<StorageResult<DeliveryReceipt>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(StorageError::WorkerLost)),
        }
    }

    pub(super) fn wait(&self, timeout: Duration) -> Option<StorageResult<DeliveryReceipt>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => Some(Err(StorageError::WorkerLost)),
        }
    }
}
