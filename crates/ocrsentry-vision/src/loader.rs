// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image loader — reads an image file, decodes it with the `image` crate, and
// fingerprints the encoded bytes with SHA-256 so findings can be tied to an
// exact file.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use ocrsentry_core::error::{Result, SentryError};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

/// A decoded image together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub image: DynamicImage,
    /// Lowercase hex SHA-256 of the file bytes.
    pub fingerprint: String,
}

/// Load and decode an image file (PNG, JPEG, BMP, TIFF, WebP, ...).
///
/// A missing file or undecodable contents yields [`SentryError::ImageLoad`].
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    load_image_with_fingerprint(path).map(|loaded| loaded.image)
}

/// Load an image file and compute its fingerprint in one read.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_image_with_fingerprint(path: impl AsRef<Path>) -> Result<LoadedImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|err| SentryError::image_io(path, err))?;

    let image = image::load_from_memory(&bytes)
        .map_err(|err| SentryError::image_decode(path, err.to_string()))?;
    let fingerprint = fingerprint(&bytes);

    info!(
        width = image.width(),
        height = image.height(),
        bytes = bytes.len(),
        "Image loaded"
    );

    Ok(LoadedImage {
        path: path.to_path_buf(),
        image,
        fingerprint,
    })
}

/// Decode an image from raw encoded bytes.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn load_image_from_bytes(data: &[u8]) -> Result<DynamicImage> {
    let image = image::load_from_memory(data)
        .map_err(|err| SentryError::image_decode("<memory>", err.to_string()))?;
    debug!(
        width = image.width(),
        height = image.height(),
        "Image decoded from bytes"
    );
    Ok(image)
}

/// Compute the SHA-256 hash of `data` as a lowercase hex string.
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// SHA-256 of the empty byte slice (well-known constant).
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn loads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        RgbImage::from_pixel(32, 16, Rgb([10, 20, 30])).save(&path).unwrap();

        let loaded = load_image_with_fingerprint(&path).unwrap();
        assert_eq!(loaded.image.width(), 32);
        assert_eq!(loaded.image.height(), 16);
        assert_eq!(loaded.path, path);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(loaded.fingerprint, fingerprint(&bytes));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_image("/nonexistent/dir/shot.png").unwrap_err();
        assert!(matches!(err, SentryError::ImageLoad { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn corrupt_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG definitely not a png").unwrap();

        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, SentryError::ImageLoad { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn decodes_from_memory() {
        let mut buffer = std::io::Cursor::new(Vec::new());
        RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]))
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        let image = load_image_from_bytes(buffer.get_ref()).unwrap();
        assert_eq!(image.width(), 4);
        assert!(load_image_from_bytes(b"garbage").is_err());
    }

    #[test]
    fn fingerprint_known_values() {
        assert_eq!(fingerprint(b""), EMPTY_SHA256);
        assert_eq!(
            fingerprint(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
