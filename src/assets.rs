// Optional raster assets (institution logo, candidate photo).
//
// Loading never fails the ticket: anything unreadable becomes `None` and the
// element is simply left off the page.

use ::image::{DynamicImage, Rgb, RgbImage, Rgba};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extensions tried, in order, when looking up a photo by seat number.
pub const PHOTO_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];

/// A decoded image flattened to 8-bit RGB on a white background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterAsset {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl RasterAsset {
    pub fn load(path: &Path) -> Option<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "asset unreadable, skipping");
                return None;
            }
        };

        match ::image::load_from_memory(&bytes) {
            Ok(img) => {
                debug!(path = %path.display(), width = img.width(), height = img.height(), "asset loaded");
                Some(Self::from_image(&img))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "asset could not be decoded, skipping");
                None
            }
        }
    }

    /// Like [`RasterAsset::load`], treating an absent or blank path as "no asset".
    pub fn load_optional(path: Option<&Path>) -> Option<Self> {
        let path = path.filter(|p| !p.as_os_str().is_empty())?;
        Self::load(path)
    }

    pub fn from_image(img: &DynamicImage) -> Self {
        let rgba_image = img.to_rgba8();
        let (width, height) = rgba_image.dimensions();

        // Composite against white background
        let mut rgb_image = RgbImage::new(width, height);
        for (x, y, pixel) in rgba_image.enumerate_pixels() {
            let Rgba([r, g, b, a]) = *pixel;
            let alpha = a as f32 / 255.0;
            let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)) as u8;
            rgb_image.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
        }

        Self {
            width,
            height,
            rgb: rgb_image.into_raw(),
        }
    }
}

// ============================================================================
// Photo Lookup
// ============================================================================

/// Maps a seat number to `<dir>/<seat_no>.<ext>`.
#[derive(Debug, Clone)]
pub struct PhotoResolver {
    dir: PathBuf,
}

impl PhotoResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn resolve(&self, seat_no: &str) -> Option<PathBuf> {
        let found = PHOTO_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{seat_no}.{ext}")))
            .find(|candidate| candidate.is_file());
        if found.is_none() {
            debug!(seat_no, dir = %self.dir.display(), "no photo found");
        }
        found
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ::image::{ImageFormat, RgbaImage};

    pub(crate) fn write_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_pixel(width, height, Rgba([20, 40, 200, 255]));
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    #[test]
    fn loads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        write_png(&path, 4, 3);
        let asset = RasterAsset::load(&path).unwrap();
        assert_eq!((asset.width, asset.height), (4, 3));
        assert_eq!(asset.rgb.len(), 4 * 3 * 3);
        assert_eq!(&asset.rgb[..3], &[20, 40, 200]);
    }

    #[test]
    fn transparent_pixels_become_white() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let asset = RasterAsset::from_image(&DynamicImage::ImageRgba8(img));
        assert!(asset.rgb.iter().all(|&c| c == 255));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RasterAsset::load(&dir.path().join("nope.png")).is_none());
    }

    #[test]
    fn corrupt_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();
        assert!(RasterAsset::load(&path).is_none());
    }

    #[test]
    fn blank_path_is_none() {
        assert!(RasterAsset::load_optional(None).is_none());
        assert!(RasterAsset::load_optional(Some(Path::new(""))).is_none());
    }

    #[test]
    fn resolver_prefers_jpg_over_png() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("S1.png"), 2, 2);
        std::fs::write(dir.path().join("S1.jpg"), b"x").unwrap();
        write_png(&dir.path().join("S2.png"), 2, 2);

        let resolver = PhotoResolver::new(dir.path());
        assert_eq!(resolver.resolve("S1"), Some(dir.path().join("S1.jpg")));
        assert_eq!(resolver.resolve("S2"), Some(dir.path().join("S2.png")));
        assert_eq!(resolver.resolve("S3"), None);
    }
}
