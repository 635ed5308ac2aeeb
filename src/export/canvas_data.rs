use serde::{Deserialize, Serialize};

use crate::editor::{Canvas, ImageBounds, ToolObject};

pub const CANVAS_DATA_VERSION: u32 = 1;

/// Portable snapshot of the drawn object graph. Object coordinates are in
/// display pixels; `scale` maps them back onto the original screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasData {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
    pub scale: f64,
    pub objects: Vec<ToolObject>,
}

impl CanvasData {
    pub fn capture(canvas: &Canvas, original: ImageBounds, scale: f64) -> Self {
        let display = canvas.display();
        Self {
            version: CANVAS_DATA_VERSION,
            width: display.width,
            height: display.height,
            original_width: original.width,
            original_height: original.height,
            scale,
            objects: canvas.objects().to_vec(),
        }
    }
}
