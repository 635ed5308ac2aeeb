//! Drawing engine: fitting the screenshot into the overlay, the tool state
//! machine and the pointer protocol that builds shapes on the canvas.

mod engine;
pub mod tools;

use crate::config::AnnotatorConfig;

pub use engine::DrawingEngine;
pub use tools::{
    Canvas, CanvasCursor, CanvasEvent, ImageBounds, PendingShape, StyleChange, StyleControls,
    TextExit, ToolError, ToolKind, ToolObject, ToolPoint,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Fixed overlay chrome around the canvas region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasChrome {
    pub side_panel_width: u32,
    pub horizontal_padding: u32,
    pub vertical_chrome: u32,
}

impl CanvasChrome {
    pub fn from_config(config: &AnnotatorConfig) -> Self {
        Self {
            side_panel_width: config.side_panel_width,
            horizontal_padding: config.horizontal_padding,
            vertical_chrome: config.vertical_chrome,
        }
    }

    /// Space left for the canvas once the chrome is subtracted.
    pub fn available(&self, viewport: Viewport) -> Viewport {
        Viewport::new(
            viewport
                .width
                .saturating_sub(self.side_panel_width)
                .saturating_sub(self.horizontal_padding),
            viewport.height.saturating_sub(self.vertical_chrome),
        )
    }
}

impl Default for CanvasChrome {
    fn default() -> Self {
        Self::from_config(&AnnotatorConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFit {
    pub scale: f64,
    pub original: ImageBounds,
    pub display: ImageBounds,
}

impl CanvasFit {
    /// Multiplier that maps display coordinates back to screenshot pixels.
    pub fn export_multiplier(&self) -> f64 {
        1.0 / self.scale
    }
}

/// Scales the screenshot down (never up) to the space left by the chrome.
///
/// Returns `None` when the image is empty or the chrome leaves no room at
/// all, since no scale can make the canvas fit.
pub fn fit_canvas(
    image: ImageBounds,
    viewport: Viewport,
    chrome: CanvasChrome,
) -> Option<CanvasFit> {
    let available = chrome.available(viewport);
    if image.width == 0 || image.height == 0 || available.width == 0 || available.height == 0 {
        return None;
    }
    let scale_x = f64::from(available.width) / f64::from(image.width);
    let scale_y = f64::from(available.height) / f64::from(image.height);
    let scale = scale_x.min(scale_y).min(1.0);
    Some(CanvasFit {
        scale,
        original: image,
        display: ImageBounds::new(
            scale_dimension(image.width, scale, available.width),
            scale_dimension(image.height, scale, available.height),
        ),
    })
}

/// Scaled size of one axis, kept within `1..=limit`.
fn scale_dimension(value: u32, scale: f64, limit: u32) -> u32 {
    let scaled = (f64::from(value) * scale).round();
    if scaled < 1.0 {
        1
    } else if scaled >= f64::from(limit) {
        limit
    } else {
        scaled as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrome() -> CanvasChrome {
        CanvasChrome {
            side_panel_width: 320,
            horizontal_padding: 48,
            vertical_chrome: 96,
        }
    }

    #[test]
    fn large_screenshot_is_scaled_down_to_fit() {
        let fit = fit_canvas(
            ImageBounds::new(2000, 1200),
            Viewport::new(1600, 900),
            chrome(),
        )
        .expect("canvas should fit");
        assert!(fit.scale < 1.0);
        assert!((fit.scale - 1232.0 / 2000.0).abs() < 1e-9);
        assert_eq!(fit.display, ImageBounds::new(1232, 739));
        assert_eq!(fit.original, ImageBounds::new(2000, 1200));
    }

    #[test]
    fn small_screenshot_is_never_upscaled() {
        let fit = fit_canvas(ImageBounds::new(400, 300), Viewport::new(1920, 1080), chrome())
            .expect("canvas should fit");
        assert!((fit.scale - 1.0).abs() < f64::EPSILON);
        assert_eq!(fit.display, ImageBounds::new(400, 300));
        assert!((fit.export_multiplier() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn scale_is_minimum_of_both_axes() {
        for (image, viewport) in [
            (ImageBounds::new(3000, 500), Viewport::new(1400, 1000)),
            (ImageBounds::new(800, 4000), Viewport::new(1400, 1000)),
            (ImageBounds::new(1032, 904), Viewport::new(1400, 1000)),
        ] {
            let fit = fit_canvas(image, viewport, chrome()).expect("canvas should fit");
            let available = chrome().available(viewport);
            let expected = (f64::from(available.width) / f64::from(image.width))
                .min(f64::from(available.height) / f64::from(image.height))
                .min(1.0);
            assert!((fit.scale - expected).abs() < 1e-12, "{image:?} in {viewport:?}");
        }
    }

    #[test]
    fn tall_capture_uses_exact_scale_and_stays_inside_region() {
        let image = ImageBounds::new(1200, 20000);
        let viewport = Viewport::new(1600, 900);
        let fit = fit_canvas(image, viewport, chrome()).expect("canvas should fit");
        let available = chrome().available(viewport);
        assert_eq!(available, Viewport::new(1232, 804));

        let expected = (1232.0_f64 / 1200.0).min(804.0 / 20000.0).min(1.0);
        assert!((fit.scale - expected).abs() < 1e-12);
        assert!((fit.scale - 0.0402).abs() < 1e-12);
        assert_eq!(fit.display, ImageBounds::new(48, 804));
        assert!(fit.display.height <= available.height);
        assert!(fit.display.width <= available.width);
    }

    #[test]
    fn no_fit_when_chrome_leaves_no_room() {
        assert!(fit_canvas(ImageBounds::new(1000, 1000), Viewport::new(200, 50), chrome()).is_none());
        assert!(fit_canvas(ImageBounds::new(1000, 1000), Viewport::new(1920, 96), chrome()).is_none());
        assert!(fit_canvas(ImageBounds::new(0, 10), Viewport::new(1920, 1080), chrome()).is_none());
    }
}
