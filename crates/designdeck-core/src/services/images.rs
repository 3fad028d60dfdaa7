//! Image upload provider.

use super::{BoxFuture, ServiceError, ServiceResult};
use crate::element::{ImageFormat, image_dimensions, to_data_url};
use uuid::Uuid;

/// Default upload size limit for [`InlineImageProvider`].
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// An image file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Result of an upload. `url` is stored verbatim as the element content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub id: String,
    pub url: String,
    /// Pixel dimensions, when the provider could read them.
    pub dimensions: Option<(u32, u32)>,
}

/// Stores image bytes somewhere and returns a URL for them.
pub trait ImageProvider: Send + Sync {
    fn upload_image(&self, file: ImageFile) -> BoxFuture<'_, ServiceResult<UploadedImage>>;
}

/// Keeps images inside the document as `data:` URLs.
#[derive(Debug, Clone)]
pub struct InlineImageProvider {
    max_bytes: usize,
}

impl Default for InlineImageProvider {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl InlineImageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_bytes(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    fn encode(&self, file: &ImageFile) -> ServiceResult<UploadedImage> {
        if file.bytes.len() > self.max_bytes {
            return Err(ServiceError::Rejected(format!(
                "{} is {} bytes, limit is {}",
                file.name,
                file.bytes.len(),
                self.max_bytes
            )));
        }
        let format = ImageFormat::from_magic_bytes(&file.bytes)
            .ok_or_else(|| ServiceError::Rejected(format!("{} is not a PNG, JPEG or WebP image", file.name)))?;
        Ok(UploadedImage {
            id: Uuid::new_v4().to_string(),
            url: to_data_url(format, &file.bytes),
            dimensions: image_dimensions(&file.bytes),
        })
    }
}

impl ImageProvider for InlineImageProvider {
    fn upload_image(&self, file: ImageFile) -> BoxFuture<'_, ServiceResult<UploadedImage>> {
        Box::pin(async move {
            let uploaded = self.encode(&file)?;
            log::info!("Inlined image {} ({} bytes)", file.name, file.bytes.len());
            Ok(uploaded)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes
    }

    #[test]
    fn test_inline_upload() {
        let provider = InlineImageProvider::new();
        let uploaded = block_on(provider.upload_image(ImageFile::new("logo.png", png(64, 32)))).unwrap();
        assert!(uploaded.url.starts_with("data:image/png;base64,"));
        assert_eq!(uploaded.dimensions, Some((64, 32)));
    }

    #[test]
    fn test_rejects_non_image() {
        let provider = InlineImageProvider::new();
        let result = block_on(provider.upload_image(ImageFile::new("notes.txt", b"hello world".to_vec())));
        assert!(matches!(result, Err(ServiceError::Rejected(_))));
    }

    #[test]
    fn test_rejects_oversized() {
        let provider = InlineImageProvider::with_max_bytes(8);
        let result = block_on(provider.upload_image(ImageFile::new("big.png", png(1, 1))));
        assert!(matches!(result, Err(ServiceError::Rejected(_))));
    }
}
