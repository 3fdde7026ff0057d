//! Texture image decoding
//!
//! Wraps the `image` crate and normalizes everything to RGBA8.

use std::path::Path;

use crate::assets::AssetError;

/// Decoded RGBA image ready for texture upload
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw RGBA pixel data, row-major
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageData {
    /// Decode an image file
    ///
    /// A missing file is reported as [`AssetError::NotFound`] so callers can
    /// tell it apart from a corrupt one.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        let decoded = image::open(path)
            .map_err(|e| AssetError::LoadFailed(format!("{}: {}", path.display(), e)))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        log::info!("Loaded texture image {}x{} from {:?}", width, height, path);

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Single-color image
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            data: color.repeat(pixels),
            width,
            height,
        }
    }

    /// RGBA pixel at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let texel = self.data.get(offset..offset + 4)?;
        Some([texel[0], texel[1], texel[2], texel[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(3, 2, [255, 0, 0, 255]);
        assert_eq!(img.data.len(), 3 * 2 * 4);
        assert_eq!(img.pixel(2, 1), Some([255, 0, 0, 255]));
        assert_eq!(img.pixel(3, 0), None);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = ImageData::from_file("definitely/not/here/wood.png");
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_file_fails_to_load() {
        let dir = std::env::temp_dir().join(format!("street_scene_bad_img_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("wood.png");
        std::fs::write(&path, b"not an image").unwrap();

        let result = ImageData::from_file(&path);
        assert!(matches!(result, Err(AssetError::LoadFailed(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_png_round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("street_scene_img_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("checker.png");

        let mut buffer = image::RgbaImage::new(2, 2);
        buffer.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));
        buffer.save(&path).unwrap();

        let loaded = ImageData::from_file(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (2, 2));
        assert_eq!(loaded.pixel(1, 0), Some([0, 255, 0, 255]));

        std::fs::remove_dir_all(&dir).ok();
    }
}
