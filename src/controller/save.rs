use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use super::worker::{spawn_delivery, PendingDelivery};
use super::{SessionController, SessionError, SessionResult};
use crate::annotation::{AnnotationRecord, PageInfo};
use crate::editor::ImageBounds;
use crate::export::{encode_png, png_bytes_to_data_url, render_annotated, CanvasData};
use crate::feedback::Toast;
use crate::overlay::OverlayHost;
use crate::state::{SessionEvent, SessionPhase};
use crate::storage::{DeliveryReceipt, SavePayload, StorageResult};

const SAVE_SUCCESS_MESSAGE: &str = "Annotation saved!";

fn save_failure_message(err: &dyn std::fmt::Display) -> String {
    format!("Failed to save annotation: {err}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// `skipped_text` counts text objects missing from the exported image
    /// because no font was available.
    Started { id: Uuid, skipped_text: usize },
    /// A save is already in flight or the session is closing.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved {
        id: Uuid,
        receipt: DeliveryReceipt,
        skipped_text: usize,
    },
    Failed {
        id: Uuid,
        message: String,
    },
}

/// A delivery running on the worker thread.
pub(super) struct InFlightSave {
    id: Uuid,
    skipped_text: usize,
    pending: PendingDelivery,
}

impl<H: OverlayHost> SessionController<H> {
    /// Exports the canvas and hands the record to the sink on a worker
    /// thread. The result is applied by `tick` or `settle_save`.
    pub fn save(&mut self, now: Instant) -> SessionResult<SaveStatus> {
        match self.machine.phase() {
            SessionPhase::Idle => return Err(SessionError::NoActiveSession),
            SessionPhase::Saving | SessionPhase::Closing => {
                tracing::debug!("save already in progress; ignoring trigger");
                return Ok(SaveStatus::Ignored);
            }
            SessionPhase::Active => {}
        }

        if let Some(canvas) = self.state.canvas.as_mut() {
            canvas.clear_selection();
        }
        self.sync_controls();

        let (payload, skipped_text) = match self.build_payload() {
            Ok(built) => built,
            Err(err) => {
                tracing::error!(%err, "annotation export failed");
                let toast = Toast::failure(save_failure_message(&err));
                self.toast.show(&mut self.host, toast, now);
                return Err(err);
            }
        };

        self.machine.transition(SessionEvent::BeginSave)?;
        let id = payload.record.id;
        tracing::info!(id = %id, title = %payload.record.title, "saving annotation");
        if skipped_text > 0 {
            tracing::warn!(id = %id, skipped_text, "exported image is missing text annotations");
        }
        self.delivery = Some(InFlightSave {
            id,
            skipped_text,
            pending: spawn_delivery(Arc::clone(&self.sink), payload),
        });
        self.sync_controls();
        Ok(SaveStatus::Started { id, skipped_text })
    }

    /// Builds the record and reports how many text objects the export left out.
    fn build_payload(&self) -> SessionResult<(SavePayload, usize)> {
        let canvas = self
            .state
            .canvas
            .as_ref()
            .ok_or(SessionError::NoActiveSession)?;
        let screenshot = self
            .state
            .screenshot
            .as_ref()
            .ok_or(SessionError::NoActiveSession)?;

        let rendered = render_annotated(screenshot, canvas, self.state.canvas_scale, &self.glyphs)?;
        let annotated_png = encode_png(&rendered.image)?;
        let original = ImageBounds::new(screenshot.width(), screenshot.height());
        let canvas_data = CanvasData::capture(canvas, original, self.state.canvas_scale);
        let page = PageInfo {
            url: self.state.page_url.clone(),
            title: self.state.page_title.clone(),
        };
        let record = AnnotationRecord::assemble(
            &page,
            self.shell.form(),
            self.state.screenshot_data_url.clone(),
            png_bytes_to_data_url(&annotated_png),
            canvas_data,
        );
        let payload = SavePayload {
            record,
            annotated_png,
        };
        Ok((payload, rendered.skipped_text))
    }

    pub fn is_saving(&self) -> bool {
        self.delivery.is_some()
    }

    pub(super) fn poll_delivery(&mut self, now: Instant) -> Option<SaveOutcome> {
        let result = self.delivery.as_ref()?.pending.poll()?;
        let save = self.delivery.take()?;
        Some(self.apply_delivery(&save, result, now))
    }

    /// Blocks up to `timeout` for the in-flight save and applies its result.
    pub fn settle_save(&mut self, timeout: Duration, now: Instant) -> Option<SaveOutcome> {
        let result = self.delivery.as_ref()?.pending.wait(timeout)?;
        let save = self.delivery.take()?;
        Some(self.apply_delivery(&save, result, now))
    }

    fn apply_delivery(
        &mut self,
        save: &InFlightSave,
        result: StorageResult<DeliveryReceipt>,
        now: Instant,
    ) -> SaveOutcome {
        let id = save.id;
        match result {
            Ok(receipt) => {
                if let Err(err) = self.machine.transition(SessionEvent::SaveSucceeded) {
                    tracing::warn!(%err, "save finished outside of a saving session");
                }
                self.toast
                    .show(&mut self.host, Toast::success(SAVE_SUCCESS_MESSAGE), now);
                self.close_at = Some(now + self.config.close_delay());
                tracing::info!(id = %id, "annotation saved");
                SaveOutcome::Saved {
                    id,
                    receipt,
                    skipped_text: save.skipped_text,
                }
            }
            Err(err) => {
                tracing::warn!(id = %id, %err, "annotation delivery failed");
                if let Err(err) = self.machine.transition(SessionEvent::SaveFailed) {
                    tracing::warn!(%err, "save failed outside of a saving session");
                }
                let message = save_failure_message(&err);
                self.toast
                    .show(&mut self.host, Toast::failure(message.clone()), now);
                self.sync_controls();
                SaveOutcome::Failed { id, message }
            }
        }
    }
}
