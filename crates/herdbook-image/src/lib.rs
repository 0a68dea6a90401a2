//! Deterministic sprite trimming.
//!
//! Game textures ship with generous transparent margins. `trim` cuts a
//! sprite down to the smallest rectangle containing every pixel whose alpha
//! differs from the background pixel at (0,0), preserving pixel data exactly:
//! no resampling, no filtering, pure slicing. Bit-identical input produces
//! bit-identical output.
//!
//! The foreground mask intentionally tests the alpha channel only, even when
//! RGB channels also diverge from the corner pixel. Semi-transparent source
//! art depends on this, so it is part of the contract rather than an
//! implementation detail.

use std::path::{Path, PathBuf};

use image::{imageops, DynamicImage, ImageError, RgbaImage};

#[derive(Debug, thiserror::Error)]
pub enum TrimError {
    /// Every pixel's alpha matches the background pixel at (0,0). There is
    /// no bounding box to compute, which almost always means the source
    /// texture is blank or the wrong file was exported.
    #[error("no pixel differs from the background; cannot compute a bounding box")]
    EmptyBoundingBox,
    #[error("failed to read image {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

/// Crop `source` to the bounding box of all pixels whose alpha channel
/// differs from the alpha of the pixel at (0,0).
///
/// The box is computed with inclusive minima and exclusive maxima (max index
/// plus one). Returns [`TrimError::EmptyBoundingBox`] when no pixel
/// qualifies; callers must treat that as fatal rather than passing the
/// original image through.
pub fn trim(source: &DynamicImage) -> Result<RgbaImage, TrimError> {
    let rgba = source.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(TrimError::EmptyBoundingBox);
    }

    let background_alpha = rgba.get_pixel(0, 0).0[3];

    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for (x, y, pixel) in rgba.enumerate_pixels() {
        if pixel.0[3] != background_alpha {
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if !found {
        return Err(TrimError::EmptyBoundingBox);
    }

    let cropped = imageops::crop_imm(
        &rgba,
        min_x,
        min_y,
        max_x + 1 - min_x,
        max_y + 1 - min_y,
    );
    Ok(cropped.to_image())
}

/// Open `path` and trim it. Read and decode failures are reported as their
/// own variants so callers can tell a missing or corrupt file apart from a
/// genuinely blank texture.
pub fn trim_file(path: &Path) -> Result<RgbaImage, TrimError> {
    let source = image::open(path).map_err(|err| match err {
        ImageError::IoError(source) => TrimError::Read {
            path: path.to_path_buf(),
            source,
        },
        other => TrimError::Decode {
            path: path.to_path_buf(),
            source: other,
        },
    })?;
    trim(&source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn uniform(width: u32, height: u32, pixel: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(pixel))
    }

    #[test]
    fn crops_to_foreground_block() {
        let mut img = uniform(10, 10, [0, 0, 0, 0]);
        for y in 2..5 {
            for x in 2..5 {
                img.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }

        let trimmed = trim(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(trimmed.dimensions(), (3, 3));
        for pixel in trimmed.pixels() {
            assert_eq!(pixel.0, [255, 0, 0, 255]);
        }
    }

    #[test]
    fn single_pixel_foreground() {
        let mut img = uniform(8, 8, [0, 0, 0, 0]);
        img.put_pixel(7, 0, Rgba([1, 2, 3, 128]));

        let trimmed = trim(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(trimmed.dimensions(), (1, 1));
        assert_eq!(trimmed.get_pixel(0, 0).0, [1, 2, 3, 128]);
    }

    #[test]
    fn uniform_image_is_an_error() {
        let img = uniform(10, 10, [40, 40, 40, 255]);
        let err = trim(&DynamicImage::ImageRgba8(img)).unwrap_err();
        assert!(matches!(err, TrimError::EmptyBoundingBox));
    }

    #[test]
    fn rgb_divergence_alone_is_background() {
        // Mask is alpha-only: a pixel with different color but matching
        // alpha does not extend the box.
        let mut img = uniform(6, 6, [0, 0, 0, 255]);
        img.put_pixel(0, 5, Rgba([255, 255, 255, 255]));
        img.put_pixel(3, 3, Rgba([9, 9, 9, 0]));

        let trimmed = trim(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(trimmed.dimensions(), (1, 1));
        assert_eq!(trimmed.get_pixel(0, 0).0, [9, 9, 9, 0]);
    }

    #[test]
    fn preserves_interior_pixels_exactly() {
        let mut img = uniform(5, 5, [0, 0, 0, 0]);
        img.put_pixel(1, 1, Rgba([10, 20, 30, 255]));
        img.put_pixel(3, 1, Rgba([50, 60, 70, 200]));
        // Interior background pixel stays inside the box untouched.
        let trimmed = trim(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(trimmed.dimensions(), (3, 1));
        assert_eq!(trimmed.get_pixel(0, 0).0, [10, 20, 30, 255]);
        assert_eq!(trimmed.get_pixel(1, 0).0, [0, 0, 0, 0]);
        assert_eq!(trimmed.get_pixel(2, 0).0, [50, 60, 70, 200]);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = trim_file(Path::new("/nonexistent/sprite.png")).unwrap_err();
        assert!(matches!(err, TrimError::Read { .. }));
    }
}
