use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};

use super::ExportError;

const DATA_URL_IMAGE_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";
const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Decodes a `data:image/<fmt>;base64,<payload>` screenshot into pixels.
pub fn decode_data_url(data_url: &str) -> Result<RgbaImage, ExportError> {
    let rest = data_url
        .trim()
        .strip_prefix(DATA_URL_IMAGE_PREFIX)
        .ok_or(ExportError::NotADataUrl)?;
    let (_format, payload) = rest
        .split_once(BASE64_MARKER)
        .ok_or(ExportError::NotADataUrl)?;
    let bytes = STANDARD.decode(payload.trim())?;
    let image = image::load_from_memory(&bytes)?.to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(ExportError::EmptyImage);
    }
    Ok(image)
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, ImageFormat::Png)?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
pub(crate) fn encode_png_data_url(image: &RgbaImage) -> Result<String, ExportError> {
    Ok(png_bytes_to_data_url(&encode_png(image)?))
}

/// Wraps already-encoded PNG bytes, as read from disk, into a data URL.
pub fn png_bytes_to_data_url(bytes: &[u8]) -> String {
    format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn encoded_png_decodes_back_to_same_pixels() {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(2, 1, Rgba([10, 20, 30, 255]));
        let data_url = encode_png_data_url(&image).expect("png should encode");
        assert!(data_url.starts_with("data:image/png;base64,"));

        let decoded = decode_data_url(&data_url).expect("data url should decode");
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn rejects_non_image_data_urls() {
        assert!(matches!(
            decode_data_url("https://example.com/shot.png"),
            Err(ExportError::NotADataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png,rawbytes"),
            Err(ExportError::NotADataUrl)
        ));
        assert!(matches!(decode_data_url(""), Err(ExportError::NotADataUrl)));
    }

    #[test]
    fn rejects_bad_payloads() {
        assert!(matches!(
            decode_data_url("data:image/png;base64,***"),
            Err(ExportError::Base64(_))
        ));
        let not_an_image = png_bytes_to_data_url(b"definitely not a png");
        assert!(matches!(
            decode_data_url(&not_an_image),
            Err(ExportError::Image(_))
        ));
    }
}
