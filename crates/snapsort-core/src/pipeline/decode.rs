//! Image decoding with content-based format detection.

use std::path::Path;

use image::{DynamicImage, ImageReader};

use crate::error::FileError;

/// Decode an image file.
///
/// The format is detected from file content rather than the extension, so a
/// PNG saved as `.jpg` decodes fine and a text file named `.jpg` does not.
pub fn decode(path: &Path) -> Result<DynamicImage, FileError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| FileError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    reader.decode().map_err(|e| FileError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_decode_valid_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.png");
        RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let image = decode(&path).unwrap();
        assert_eq!(image.width(), 8);
        assert_eq!(image.height(), 8);
    }

    #[test]
    fn test_decode_detects_format_by_content() {
        // A PNG with a .jpg extension decodes via content sniffing.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("misnamed.jpg");
        let mut bytes: Vec<u8> = Vec::new();
        RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]))
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        std::fs::write(&path, bytes).unwrap();

        assert!(decode(&path).is_ok());
    }

    #[test]
    fn test_decode_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.jpg");
        std::fs::write(&path, b"this is not an image").unwrap();

        let err = decode(&path).unwrap_err();
        assert!(matches!(err, FileError::Decode { .. }));
        assert!(err.to_string().contains("corrupt.jpg"));
    }

    #[test]
    fn test_decode_rejects_missing_file() {
        let err = decode(Path::new("/nonexistent/missing.png")).unwrap_err();
        assert!(matches!(err, FileError::Decode { .. }));
    }
}
