use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontArc, ScaleFont};
use image::{Rgba, RgbaImage};
use tiny_skia::{
    ColorU8, FillRule, IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap,
    PremultipliedColorU8, Rect, Stroke, Transform,
};

use super::ExportError;
use crate::editor::tools::{
    ArrowElement, EllipseElement, RectangleElement, StrokeStyle, TextElement,
};
use crate::editor::{Canvas, ToolObject};
use crate::geometry::Color;

const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const FAUX_BOLD_STEP_PX: f32 = 0.5;

/// Font used to rasterize text objects on export.
#[derive(Clone, Default)]
pub struct GlyphSource {
    font: Option<FontArc>,
}

impl std::fmt::Debug for GlyphSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphSource")
            .field("available", &self.is_available())
            .finish()
    }
}

impl GlyphSource {
    pub fn none() -> Self {
        Self { font: None }
    }

    pub fn from_font(font: FontArc) -> Self {
        Self { font: Some(font) }
    }

    pub fn from_file(path: &Path) -> Result<Self, ExportError> {
        let bytes = std::fs::read(path).map_err(|source| ExportError::FontIo {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|_| ExportError::InvalidFont {
            path: path.to_path_buf(),
        })?;
        Ok(Self::from_font(font))
    }

    /// Tries the configured font first, then a few well-known system fonts.
    pub fn discover(configured: Option<&Path>) -> Self {
        let candidates = configured
            .map(Path::to_path_buf)
            .into_iter()
            .chain(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from));
        for path in candidates {
            if !path.is_file() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(source) => {
                    tracing::debug!(path = %path.display(), "loaded export font");
                    return source;
                }
                Err(err) => tracing::warn!(%err, "skipping unusable font"),
            }
        }
        tracing::warn!("no font available; text annotations will be missing from exports");
        Self::none()
    }

    pub fn is_available(&self) -> bool {
        self.font.is_some()
    }
}

/// A flattened export and the text objects it could not draw.
#[derive(Debug, Clone)]
pub struct RenderedAnnotation {
    pub image: RgbaImage,
    /// Text objects left out because no font was available.
    pub skipped_text: usize,
}

/// Flattens the screenshot and every drawn object into one bitmap at the
/// screenshot's native resolution. Objects are stored in display pixels, so
/// each one is scaled by `1 / scale`.
pub fn render_annotated(
    background: &RgbaImage,
    canvas: &Canvas,
    scale: f64,
    glyphs: &GlyphSource,
) -> Result<RenderedAnnotation, ExportError> {
    let (width, height) = background.dimensions();
    let mut pixmap = pixmap_from_image(background)?;
    let multiplier = if scale > 0.0 { (1.0 / scale) as f32 } else { 1.0 };
    let transform = Transform::from_scale(multiplier, multiplier);

    let mut skipped_text = 0usize;
    for object in canvas.objects() {
        match object {
            ToolObject::Rectangle(rectangle) => draw_rectangle(&mut pixmap, rectangle, transform),
            ToolObject::Ellipse(ellipse) => draw_ellipse(&mut pixmap, ellipse, transform),
            ToolObject::Arrow(arrow) => draw_arrow(&mut pixmap, arrow, transform),
            ToolObject::Text(text) => match &glyphs.font {
                Some(font) => draw_text(&mut pixmap, text, font, multiplier),
                None => skipped_text += 1,
            },
        }
    }
    if skipped_text > 0 {
        tracing::warn!(count = skipped_text, "text objects skipped without a font");
    }

    let mut output = RgbaImage::new(width, height);
    for (pixel, color) in output.pixels_mut().zip(pixmap.pixels()) {
        let color = color.demultiply();
        *pixel = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    Ok(RenderedAnnotation {
        image: output,
        skipped_text,
    })
}

fn pixmap_from_image(image: &RgbaImage) -> Result<Pixmap, ExportError> {
    let (width, height) = image.dimensions();
    let size = IntSize::from_wh(width, height).ok_or(ExportError::Pixmap { width, height })?;
    let data = image
        .pixels()
        .flat_map(|Rgba([r, g, b, a])| {
            let color = ColorU8::from_rgba(*r, *g, *b, *a).premultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect::<Vec<_>>();
    Pixmap::from_vec(data, size).ok_or(ExportError::Pixmap { width, height })
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = true;
    paint
}

fn stroke_for(style: StrokeStyle) -> Stroke {
    Stroke {
        width: f32::from(style.width),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    }
}

fn draw_rectangle(pixmap: &mut Pixmap, rectangle: &RectangleElement, transform: Transform) {
    let Some(rect) = Rect::from_xywh(
        rectangle.x as f32,
        rectangle.y as f32,
        rectangle.width as f32,
        rectangle.height as f32,
    ) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    pixmap.stroke_path(
        &path,
        &paint_for(rectangle.style.color),
        &stroke_for(rectangle.style),
        transform,
        None,
    );
}

fn draw_ellipse(pixmap: &mut Pixmap, ellipse: &EllipseElement, transform: Transform) {
    let bounds = ellipse.bounds();
    let path = Rect::from_xywh(
        bounds.x as f32,
        bounds.y as f32,
        bounds.width as f32,
        bounds.height as f32,
    )
    .and_then(PathBuilder::from_oval)
    .or_else(|| {
        // A flat ellipse renders as the segment it collapses to.
        let mut builder = PathBuilder::new();
        builder.move_to(bounds.x as f32, bounds.y as f32);
        builder.line_to(bounds.right() as f32, bounds.bottom() as f32);
        builder.finish()
    });
    if let Some(path) = path {
        pixmap.stroke_path(
            &path,
            &paint_for(ellipse.style.color),
            &stroke_for(ellipse.style),
            transform,
            None,
        );
    }
}

fn draw_arrow(pixmap: &mut Pixmap, arrow: &ArrowElement, transform: Transform) {
    let mut line = PathBuilder::new();
    line.move_to(arrow.start.x as f32, arrow.start.y as f32);
    line.line_to(arrow.end.x as f32, arrow.end.y as f32);
    if let Some(path) = line.finish() {
        pixmap.stroke_path(
            &path,
            &paint_for(arrow.style.color),
            &stroke_for(arrow.style),
            transform,
            None,
        );
    }

    let Some(head) = arrow.head else {
        return;
    };
    let [tip, left, right] = head.vertices();
    let mut triangle = PathBuilder::new();
    triangle.move_to(tip.0 as f32, tip.1 as f32);
    triangle.line_to(left.0 as f32, left.1 as f32);
    triangle.line_to(right.0 as f32, right.1 as f32);
    triangle.close();
    if let Some(path) = triangle.finish() {
        pixmap.fill_path(&path, &paint_for(head.fill), FillRule::Winding, transform, None);
        let outline = Stroke {
            width: 1.0,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint_for(head.stroke), &outline, transform, None);
    }
}

fn draw_text(pixmap: &mut Pixmap, text: &TextElement, font: &FontArc, multiplier: f32) {
    let size = f32::from(text.options.size) * multiplier;
    let scaled = font.as_scaled(size);
    let line_height = text.line_height() as f32 * multiplier;
    let origin_x = text.x as f32 * multiplier;
    let origin_y = text.y as f32 * multiplier;
    let passes = text.options.weight.saturating_sub(400) / 150 + 1;
    let color = text.options.color;

    for (row, line) in text.lines().into_iter().enumerate() {
        let baseline = origin_y + scaled.ascent() + row as f32 * line_height;
        let mut cursor_x = origin_x;
        let mut previous = None;
        for c in line.chars() {
            let glyph_id = font.glyph_id(c);
            if let Some(previous) = previous {
                cursor_x += scaled.kern(previous, glyph_id);
            }
            for pass in 0..passes {
                let offset = f32::from(pass) * FAUX_BOLD_STEP_PX * multiplier;
                let glyph =
                    glyph_id.with_scale_and_position(size, point(cursor_x + offset, baseline));
                if let Some(outlined) = font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|px, py, coverage| {
                        let x = bounds.min.x as i64 + i64::from(px);
                        let y = bounds.min.y as i64 + i64::from(py);
                        blend_pixel(pixmap, x, y, color, coverage);
                    });
                }
            }
            cursor_x += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);
        }
    }
}

fn blend_pixel(pixmap: &mut Pixmap, x: i64, y: i64, color: Color, coverage: f32) {
    let width = i64::from(pixmap.width());
    let height = i64::from(pixmap.height());
    if x < 0 || y < 0 || x >= width || y >= height || coverage <= 0.0 {
        return;
    }
    let Ok(index) = usize::try_from(y * width + x) else {
        return;
    };
    let Some(dst) = pixmap.pixels_mut().get_mut(index) else {
        return;
    };
    let alpha = coverage.min(1.0);
    let inverse = 1.0 - alpha;
    let mix = |src: u8, dst: u8| (f32::from(src) * alpha + f32::from(dst) * inverse).round();
    let out_alpha = mix(255, dst.alpha()).min(255.0) as u8;
    let channel = |src: u8, dst: u8| (mix(src, dst) as u8).min(out_alpha);
    let blended = PremultipliedColorU8::from_rgba(
        channel(color.r, dst.red()),
        channel(color.g, dst.green()),
        channel(color.b, dst.blue()),
        out_alpha,
    );
    if let Some(blended) = blended {
        *dst = blended;
    }
}
