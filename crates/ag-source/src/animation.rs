use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, Frames};

use crate::image::load_image;

/// Suite de frames décodées, produites une par une à la demande.
///
/// Sources non animées : une seule frame, puis épuisement, jamais une
/// erreur. GIF : décodage paresseux frame par frame, en mémoire, sans
/// artefact temporaire sur disque. Une erreur de décodage fusionne
/// l'itérateur : les frames déjà produites restent valides, aucune autre
/// n'est émise.
pub struct FrameStream {
    inner: Inner,
    done: bool,
}

enum Inner {
    Single(Option<DynamicImage>),
    Animated(Frames<'static>),
}

impl FrameStream {
    /// Open a source file and decide between single-frame and animated.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or its header decoded.
    /// Per-frame decode errors are reported lazily through the iterator.
    pub fn open(path: &Path) -> Result<Self> {
        let is_gif = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gif"));

        let inner = if is_gif {
            let file = File::open(path)
                .with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
            let decoder = GifDecoder::new(BufReader::new(file))
                .with_context(|| format!("GIF invalide : {}", path.display()))?;
            Inner::Animated(decoder.into_frames())
        } else {
            Inner::Single(Some(load_image(path)?))
        };

        Ok(Self { inner, done: false })
    }

    /// True si la source est un GIF (potentiellement multi-frames).
    #[must_use]
    pub fn is_animated(&self) -> bool {
        matches!(self.inner, Inner::Animated(_))
    }
}

impl Iterator for FrameStream {
    type Item = Result<DynamicImage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match &mut self.inner {
            Inner::Single(image) => {
                self.done = true;
                image.take().map(Ok)
            }
            Inner::Animated(frames) => match frames.next() {
                Some(Ok(frame)) => {
                    // Même pipeline que les images fixes : frame convertie en RGB
                    let rgba = DynamicImage::ImageRgba8(frame.into_buffer());
                    Some(Ok(DynamicImage::ImageRgb8(rgba.to_rgb8())))
                }
                Some(Err(err)) => {
                    self.done = true;
                    Some(Err(anyhow::Error::new(err).context("Décodage de frame GIF")))
                }
                None => {
                    self.done = true;
                    None
                }
            },
        }
    }
}
