use crate::editor::{CanvasChrome, CanvasFit, Viewport};

const TOOL_PALETTE_HEIGHT: u32 = 48;
const TOOL_PALETTE_WIDTH: u32 = 360;
const TOOL_PALETTE_MARGIN: u32 = 12;
const MIN_CANVAS_REGION_WIDTH: u32 = 320;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayPane {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Placement of the overlay chrome: the canvas region on the left with the
/// floating tool palette above the canvas, the metadata panel on the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    pub viewport: Viewport,
    pub palette: OverlayPane,
    pub canvas: OverlayPane,
    pub side_panel: OverlayPane,
    pub fit: CanvasFit,
}

pub fn layout_overlay(viewport: Viewport, chrome: CanvasChrome, fit: CanvasFit) -> OverlayLayout {
    let mut panel_width = chrome.side_panel_width.min(viewport.width);
    let region_width = viewport.width.saturating_sub(panel_width);
    if region_width < MIN_CANVAS_REGION_WIDTH {
        panel_width = viewport.width.saturating_sub(MIN_CANVAS_REGION_WIDTH);
    }
    let region_width = viewport.width.saturating_sub(panel_width);

    let canvas_width = fit.display.width.min(region_width);
    let canvas_height = fit.display.height.min(viewport.height);
    let top_chrome = chrome.vertical_chrome / 2;
    let canvas = OverlayPane {
        x: (region_width - canvas_width) / 2,
        y: top_chrome.min(viewport.height - canvas_height),
        width: canvas_width,
        height: canvas_height,
    };

    let palette_width = TOOL_PALETTE_WIDTH.min(region_width);
    let palette = OverlayPane {
        x: (region_width - palette_width) / 2,
        y: canvas.y.saturating_sub(TOOL_PALETTE_HEIGHT + TOOL_PALETTE_MARGIN),
        width: palette_width,
        height: TOOL_PALETTE_HEIGHT.min(viewport.height),
    };

    let side_panel = OverlayPane {
        x: region_width,
        y: 0,
        width: panel_width,
        height: viewport.height,
    };

    OverlayLayout {
        viewport,
        palette,
        canvas,
        side_panel,
        fit,
    }
}
