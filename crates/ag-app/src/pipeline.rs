use std::path::Path;

use ag_core::RenderOptions;
use ag_source::matting::Matting;
use ag_source::{FrameStream, prepare_frame};
use anyhow::Result;
use image::DynamicImage;

/// Render one decoded bitmap through the whole single-image pipeline :
/// détourage optionnel, resize cohérent, conversion en grille de caractères.
#[must_use]
pub fn render_image(
    image: &DynamicImage,
    options: &RenderOptions,
    matting: &dyn Matting,
) -> String {
    let matting = options.remove_background.then_some(matting);
    let frame = prepare_frame(image, options.width, matting);
    ag_render::render(&frame.gray, &frame.color, frame.mask.as_ref(), options)
}

/// Suite paresseuse de frames rendues, une par `next()`.
///
/// Sources fixes : un seul élément, identique à un rendu direct. GIF : chaque
/// frame passe par le même pipeline que les images fixes, détourage compris.
/// Une erreur de décodage est produite comme dernier élément, puis plus
/// rien : les frames déjà consommées restent acquises. Le pacing (délai
/// d'affichage) appartient au consommateur, entre deux `next()`.
pub struct RenderSequence<'a> {
    frames: FrameStream,
    options: &'a RenderOptions,
    matting: &'a dyn Matting,
}

impl<'a> RenderSequence<'a> {
    /// Open a source file for sequential rendering.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or its header decoded.
    pub fn open(
        path: &Path,
        options: &'a RenderOptions,
        matting: &'a dyn Matting,
    ) -> Result<Self> {
        Ok(Self {
            frames: FrameStream::open(path)?,
            options,
            matting,
        })
    }

    /// True si la source est un GIF.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.frames.is_animated()
    }
}

impl Iterator for RenderSequence<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.frames.next()?;
        Some(frame.map(|image| render_image(&image, self.options, self.matting)))
    }
}
