use std::io::{Cursor, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};

/// Collaborateur de détourage : PNG encodé en entrée, PNG détouré en sortie.
///
/// Boîte noire du point de vue du pipeline : seule la sortie est consommée.
/// L'implémentation par défaut délègue à un binaire externe compatible
/// rembg via subprocess.
pub trait Matting {
    /// Segmente le sujet et retourne l'image ré-encodée (alpha ajouté).
    ///
    /// # Errors
    /// Returns an error if the segmentation fails for any reason. The caller
    /// degrades gracefully, it never aborts on this error.
    fn matte(&self, png: &[u8]) -> Result<Vec<u8>>;
}

/// Détourage par subprocess : écrit le PNG sur stdin, lit le PNG sur stdout.
///
/// Prérequis runtime : la commande (par défaut `rembg i`) accessible dans le
/// PATH. Tout échec (binaire absent, code de sortie non nul, sortie
/// indécodable) est rattrapé en amont par [`extract`].
pub struct MattingCommand {
    program: String,
    args: Vec<String>,
}

impl MattingCommand {
    /// Commande personnalisée. `program` doit lire un PNG sur stdin et
    /// écrire un PNG sur stdout.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Default for MattingCommand {
    fn default() -> Self {
        Self::new("rembg", vec!["i".to_string()])
    }
}

impl Matting for MattingCommand {
    fn matte(&self, png: &[u8]) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Impossible de lancer {}", self.program))?;

        child
            .stdin
            .take()
            .context("stdin du subprocess indisponible")?
            .write_all(png)
            .context("Écriture du PNG vers le subprocess")?;

        let output = child.wait_with_output().context("Attente du subprocess")?;
        if !output.status.success() {
            bail!("{} a retourné {}", self.program, output.status);
        }
        Ok(output.stdout)
    }
}

/// Remove the background and derive an opacity mask.
///
/// Alpha présent dans la sortie du collaborateur : le canal alpha devient le
/// masque. Pas d'alpha : masque tout-premier-plan (255 partout). Échec
/// quelconque : warning loggé, l'image originale est retournée inchangée
/// avec un masque tout-premier-plan, et le traitement continue en dégradé.
#[must_use]
pub fn extract(image: &DynamicImage, matting: &dyn Matting) -> (DynamicImage, GrayImage) {
    match try_extract(image, matting) {
        Ok(pair) => pair,
        Err(err) => {
            log::warn!("Détourage échoué, image originale conservée : {err:#}");
            (image.clone(), all_foreground(image.width(), image.height()))
        }
    }
}

fn try_extract(image: &DynamicImage, matting: &dyn Matting) -> Result<(DynamicImage, GrayImage)> {
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("Encodage PNG avant détourage")?;

    let cut_bytes = matting.matte(&png)?;
    let cut = image::load_from_memory(&cut_bytes).context("Sortie du détourage indécodable")?;

    let mask = if cut.color().has_alpha() {
        let rgba = cut.to_rgba8();
        GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            Luma([rgba.get_pixel(x, y)[3]])
        })
    } else {
        all_foreground(cut.width(), cut.height())
    };
    Ok((cut, mask))
}

fn all_foreground(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([255]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    struct EchoMatting;

    impl Matting for EchoMatting {
        fn matte(&self, png: &[u8]) -> Result<Vec<u8>> {
            Ok(png.to_vec())
        }
    }

    struct FailingMatting;

    impl Matting for FailingMatting {
        fn matte(&self, _png: &[u8]) -> Result<Vec<u8>> {
            bail!("segmentation service unavailable")
        }
    }

    struct HalfTransparent;

    impl Matting for HalfTransparent {
        fn matte(&self, png: &[u8]) -> Result<Vec<u8>> {
            let img = image::load_from_memory(png)?.to_rgba8();
            let (w, h) = img.dimensions();
            let out = RgbaImage::from_fn(w, h, |x, _| {
                if x < w / 2 {
                    Rgba([0, 0, 0, 0])
                } else {
                    Rgba([200, 100, 50, 255])
                }
            });
            let mut bytes = Vec::new();
            DynamicImage::ImageRgba8(out).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
            Ok(bytes)
        }
    }

    fn fixture() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([30, 60, 90, 255])))
    }

    #[test]
    fn alpha_output_becomes_mask() {
        let (cut, mask) = extract(&fixture(), &HalfTransparent);
        assert_eq!(cut.width(), 8);
        assert_eq!(mask.get_pixel(0, 0), &Luma([0u8]));
        assert_eq!(mask.get_pixel(7, 0), &Luma([255u8]));
    }

    #[test]
    fn opaque_output_gets_all_foreground_mask() {
        // EchoMatting returns the RGBA original (opaque alpha everywhere)
        let (_, mask) = extract(&fixture(), &EchoMatting);
        assert!(mask.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn failure_falls_back_to_original() {
        let source = fixture();
        let (cut, mask) = extract(&source, &FailingMatting);
        assert_eq!(cut.to_rgba8(), source.to_rgba8());
        assert_eq!(mask.dimensions(), (8, 8));
        assert!(mask.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn missing_binary_degrades_not_panics() {
        let bogus = MattingCommand::new("asciigen-no-such-binary", vec![]);
        let (cut, mask) = extract(&fixture(), &bogus);
        assert_eq!(cut.width(), 8);
        assert!(mask.pixels().all(|p| p[0] == 255));
    }
}
