//! Screenshot decoding, annotated bitmap rendering and object-graph
//! serialization for saved annotations.

mod canvas_data;
mod data_url;
mod render;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use canvas_data::{CanvasData, CANVAS_DATA_VERSION};
#[cfg(test)]
pub(crate) use data_url::encode_png_data_url;
pub use data_url::{decode_data_url, encode_png, png_bytes_to_data_url};
pub use render::{render_annotated, GlyphSource, RenderedAnnotation};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("screenshot is not a base64 image data URL")]
    NotADataUrl,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("screenshot has no pixels")]
    EmptyImage,
    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error("failed to read font {}: {source}", path.display())]
    FontIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("font {} could not be parsed", path.display())]
    InvalidFont { path: PathBuf },
}
