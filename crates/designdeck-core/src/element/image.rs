//! Image sources for image elements.
//!
//! An image element stores a reference to its pixels as a string: either a
//! remote URL returned by an upload service or an inline `data:` URL.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Raster formats accepted for image elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// Read pixel dimensions from an encoded image header.
pub fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let be16 = |i: usize| -> Option<u32> { Some(u32::from(u16::from_be_bytes([*data.get(i)?, *data.get(i + 1)?]))) };
    let le16 = |i: usize| -> Option<u32> { Some(u32::from(u16::from_le_bytes([*data.get(i)?, *data.get(i + 1)?]))) };
    let le24 = |i: usize| -> Option<u32> {
        Some(u32::from_le_bytes([*data.get(i)?, *data.get(i + 1)?, *data.get(i + 2)?, 0]))
    };

    match ImageFormat::from_magic_bytes(data)? {
        ImageFormat::Png => {
            let word = |i: usize| -> Option<u32> { Some(u32::from_be_bytes(data.get(i..i + 4)?.try_into().ok()?)) };
            Some((word(16)?, word(20)?))
        }
        ImageFormat::Jpeg => {
            let mut i = 2;
            while i + 9 < data.len() {
                if data[i] != 0xFF {
                    return None;
                }
                let marker = data[i + 1];
                // Start-of-frame markers, excluding DHT, JPG and DAC
                if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
                    return Some((be16(i + 7)?, be16(i + 5)?));
                }
                i += 2 + be16(i + 2)? as usize;
            }
            None
        }
        ImageFormat::WebP => match data.get(12..16)? {
            b"VP8X" => Some((le24(24)? + 1, le24(27)? + 1)),
            b"VP8L" => {
                let bits = u32::from_le_bytes(data.get(21..25)?.try_into().ok()?);
                Some(((bits & 0x3FFF) + 1, ((bits >> 14) & 0x3FFF) + 1))
            }
            b"VP8 " => Some((le16(26)? & 0x3FFF, le16(28)? & 0x3FFF)),
            _ => None,
        },
    }
}

/// Encode image bytes as a `data:` URL.
pub fn to_data_url(format: ImageFormat, data: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data))
}

/// Decode the bytes of a `data:` URL produced by [`to_data_url`].
///
/// Returns `None` for remote URLs or malformed payloads.
pub fn decode_data_url(url: &str) -> Option<(ImageFormat, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let format = match mime {
        "image/png" => ImageFormat::Png,
        "image/jpeg" => ImageFormat::Jpeg,
        "image/webp" => ImageFormat::WebP,
        _ => return None,
    };
    STANDARD.decode(payload).ok().map(|bytes| (format, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("gif"), None);
        assert_eq!(ImageFormat::from_magic_bytes(&PNG_HEADER), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF8"), None);
    }

    #[test]
    fn test_data_url_round_trip() {
        let url = to_data_url(ImageFormat::Png, &PNG_HEADER);
        assert!(url.starts_with("data:image/png;base64,"));
        let (format, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(bytes, PNG_HEADER);
    }

    #[test]
    fn test_png_dimensions() {
        let mut png = PNG_HEADER.to_vec();
        png.extend_from_slice(&[0, 0, 0, 13]);
        png.extend_from_slice(b"IHDR");
        png.extend_from_slice(&640u32.to_be_bytes());
        png.extend_from_slice(&480u32.to_be_bytes());
        assert_eq!(image_dimensions(&png), Some((640, 480)));
    }

    #[test]
    fn test_jpeg_dimensions() {
        let jpeg = [
            0xFF, 0xD8, // SOI
            0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, // APP0, length 4
            0xFF, 0xC0, 0x00, 0x11, 0x08, 0x01, 0x2C, 0x01, 0x90, 0x03, // SOF0: 300 x 400
        ];
        assert_eq!(image_dimensions(&jpeg), Some((400, 300)));
    }

    #[test]
    fn test_truncated_header_has_no_dimensions() {
        assert_eq!(image_dimensions(&PNG_HEADER), None);
    }

    #[test]
    fn test_remote_url_is_not_data_url() {
        assert!(decode_data_url("https://cdn.example.com/logo.png").is_none());
    }
}
