use crate::errors::{HistogramError, Result};
use image::{DynamicImage, GenericImageView};
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "ico", "pnm", "pbm", "pgm", "ppm",
    "tga", "qoi",
];

// Beyond this the histogram is still correct but the viewer becomes unusable
const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;
const MAX_MEGAPIXELS: u64 = 100;

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(HistogramError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file_size = std::fs::metadata(path)?.len();
    if file_size > MAX_FILE_SIZE {
        return Err(HistogramError::ImageLoadError {
            path: path.to_path_buf(),
            message: format!("File too large: {}MB (max 500MB)", file_size / (1024 * 1024)),
        });
    }

    let image = image::open(path).map_err(|e| HistogramError::ImageLoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let (width, height) = image.dimensions();
    let megapixels = (width as u64 * height as u64) / 1_000_000;
    if megapixels > MAX_MEGAPIXELS {
        return Err(HistogramError::ImageLoadError {
            path: path.to_path_buf(),
            message: format!("Image too large: {}MP (max {}MP)", megapixels, MAX_MEGAPIXELS),
        });
    }

    tracing::debug!(path = %path.display(), width, height, "image decoded");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        assert!(is_supported_image(Path::new("/a/b/photo.JPEG")));
        assert!(is_supported_image(Path::new("scan.png")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn test_missing_file() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_loads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        RgbaImage::from_pixel(3, 2, Rgba([42, 42, 42, 255]))
            .save(&path)
            .unwrap();

        let image = load_image(&path).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
    }

    #[test]
    fn test_garbage_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = load_image(&path).unwrap_err();
        assert_eq!(err.error_code(), "IMAGE_LOAD_ERROR");
    }
}
