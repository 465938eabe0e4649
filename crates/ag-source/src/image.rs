use std::path::Path;

use ag_core::settings::{Limits, validate_dimensions};
use ag_core::ValidationError;
use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage};

use crate::matting::{self, Matting};

/// Extensions d'image acceptées par la validation.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Frame prête pour le renderer : les trois bitmaps partagent les mêmes
/// dimensions, établies ici par un resize cohérent.
pub struct PreparedFrame {
    /// Luminance 8 bits par cellule.
    pub gray: GrayImage,
    /// Couleur RGB d'origine, même grille.
    pub color: RgbImage,
    /// Masque d'opacité (fond < 128), si le détourage est actif.
    pub mask: Option<GrayImage>,
}

/// Validate an image path before any processing starts.
///
/// Checks existence, regular-file-ness, extension, decodability of the
/// header, and pixel dimensions against the configured bounds.
///
/// # Errors
/// Returns the matching [`ValidationError`] on the first failed check.
pub fn probe_image(path: &Path, limits: &Limits) -> Result<(u32, u32), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(ValidationError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ValidationError::UnsupportedFormat { format: ext });
    }
    let (width, height) =
        image::image_dimensions(path).map_err(|err| ValidationError::CorruptImage {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    validate_dimensions(width, height, limits)?;
    Ok((width, height))
}

/// Load an image from disk.
///
/// # Errors
/// Returns an error if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("Impossible de charger {}", path.display()))
}

/// Dimensions cibles pour une largeur demandée.
///
/// La hauteur est compressée d'un facteur 0.5 : une cellule de terminal est
/// environ deux fois plus haute que large. Ce facteur est volontaire et doit
/// être préservé tel quel.
///
/// # Example
/// ```
/// use ag_source::image::target_size;
/// assert_eq!(target_size(200, 100, 100), (100, 25));
/// ```
#[must_use]
pub fn target_size(src_width: u32, src_height: u32, width: u32) -> (u32, u32) {
    let height = (f64::from(src_height) / f64::from(src_width) * f64::from(width) * 0.5).round();
    (width, (height as u32).max(1))
}

/// Convert to single-channel luminance.
///
/// Les sources avec canal alpha sont d'abord composées sur un fond blanc
/// opaque, sinon les zones transparentes ressortiraient noires.
#[must_use]
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    if !image.color().has_alpha() {
        return image.to_luma8();
    }
    let rgba = image.to_rgba8();
    let mut composited = RgbImage::new(rgba.width(), rgba.height());
    for (out, px) in composited.pixels_mut().zip(rgba.pixels()) {
        let a = u16::from(px[3]);
        for c in 0..3 {
            out[c] = ((u16::from(px[c]) * a + 255 * (255 - a)) / 255) as u8;
        }
    }
    DynamicImage::ImageRgb8(composited).to_luma8()
}

/// Resize, grayscale, and mask a decoded image for one render call.
///
/// Quand `matting` est fourni, le détourage tourne à la taille native, puis
/// les trois bitmaps (luminance, couleur, masque) sont redimensionnés de
/// façon cohérente, ce qui garantit au renderer des dimensions identiques.
#[must_use]
pub fn prepare_frame(
    image: &DynamicImage,
    width: u32,
    matting: Option<&dyn Matting>,
) -> PreparedFrame {
    let (w, h) = target_size(image.width(), image.height(), width);

    let color = image
        .resize_exact(w, h, FilterType::Triangle)
        .to_rgb8();

    match matting {
        Some(matting) => {
            let (cut, mask) = matting::extract(image, matting);
            let gray = to_grayscale(&cut.resize_exact(w, h, FilterType::Triangle));
            let mask = image::imageops::resize(&mask, w, h, FilterType::Triangle);
            PreparedFrame {
                gray,
                color,
                mask: Some(mask),
            }
        }
        None => PreparedFrame {
            gray: to_grayscale(&image.resize_exact(w, h, FilterType::Triangle)),
            color,
            mask: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba, RgbaImage};

    #[test]
    fn target_size_halves_aspect() {
        assert_eq!(target_size(200, 100, 100), (100, 25));
        assert_eq!(target_size(100, 100, 100), (100, 50));
        assert_eq!(target_size(100, 100, 10), (10, 5));
    }

    #[test]
    fn target_size_never_zero_height() {
        assert_eq!(target_size(1000, 1, 10), (10, 1));
    }

    #[test]
    fn grayscale_composites_alpha_over_white() {
        // Fully transparent pixel must read as white, not black
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let gray = to_grayscale(&DynamicImage::ImageRgba8(img));
        assert_eq!(gray.get_pixel(0, 0), &Luma([255u8]));

        // Opaque black stays black
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let gray = to_grayscale(&DynamicImage::ImageRgba8(img));
        assert_eq!(gray.get_pixel(0, 0), &Luma([0u8]));
    }

    #[test]
    fn prepare_frame_dimensions_agree() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 32, Rgba([10, 20, 30, 255])));
        let frame = prepare_frame(&img, 20, None);
        assert_eq!(frame.gray.dimensions(), (20, 5));
        assert_eq!(frame.color.dimensions(), (20, 5));
        assert!(frame.mask.is_none());
    }

    #[test]
    fn probe_rejects_missing_and_bad_extension() {
        let limits = Limits::default();
        assert!(matches!(
            probe_image(Path::new("nope.png"), &limits),
            Err(ValidationError::FileNotFound { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.txt");
        std::fs::write(&path, "not an image").unwrap();
        assert!(matches!(
            probe_image(&path, &limits),
            Err(ValidationError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn probe_rejects_undersized_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        img.save(&path).unwrap();
        assert!(matches!(
            probe_image(&path, &Limits::default()),
            Err(ValidationError::DimensionsOutOfBounds { .. })
        ));
    }

    #[test]
    fn probe_accepts_valid_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.png");
        let img = RgbaImage::from_pixel(32, 16, Rgba([0, 0, 0, 255]));
        img.save(&path).unwrap();
        assert_eq!(probe_image(&path, &Limits::default()).unwrap(), (32, 16));
    }
}
