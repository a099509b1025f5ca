use std::io::Cursor;

use bytes::Bytes;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::ExtendedColorType;

/// Thumbnails are scaled down to this width. Narrower images keep
/// their size.
pub const THUMBNAIL_WIDTH: u32 = 128;
pub const THUMBNAIL_EXTENSION: &str = "webp";

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode thumbnail: {0}")]
    Encode(image::ImageError),
    #[error("thumbnail task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// An encoded WebP thumbnail plus the dimensions of its source image.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub bytes: Bytes,
    pub width: u32,
    pub height: u32,
}

/// Whether a content type names an image.
pub fn is_image(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|mime| mime.type_() == mime::IMAGE)
        .unwrap_or(false)
}

/// Decode and shrink `source` on the blocking pool.
pub async fn generate(source: Bytes) -> Result<Thumbnail, ThumbnailError> {
    tokio::task::spawn_blocking(move || render(&source)).await?
}

pub fn render(source: &[u8]) -> Result<Thumbnail, ThumbnailError> {
    let image = image::load_from_memory(source).map_err(ThumbnailError::Decode)?;
    let (width, height) = (image.width(), image.height());

    let scaled = if width > THUMBNAIL_WIDTH {
        let scaled_height = (u64::from(height) * u64::from(THUMBNAIL_WIDTH) / u64::from(width))
            .max(1) as u32;
        image.resize_exact(THUMBNAIL_WIDTH, scaled_height, FilterType::Triangle)
    } else {
        image
    };

    let rgba = scaled.to_rgba8();
    let mut buf = Cursor::new(Vec::new());
    WebPEncoder::new_lossless(&mut buf)
        .encode(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(ThumbnailError::Encode)?;

    Ok(Thumbnail {
        bytes: Bytes::from(buf.into_inner()),
        width,
        height,
    })
}

#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 90, 255]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}
