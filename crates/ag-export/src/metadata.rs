use std::path::{Path, PathBuf};

use ag_core::RenderOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Document de métadonnées écrit à côté de la sortie.
///
/// # Example
/// ```
/// use ag_core::RenderOptions;
/// use ag_export::metadata::Metadata;
/// let meta = Metadata::new("photo.png", &RenderOptions::default());
/// assert_eq!(meta.source_image, "photo.png");
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Metadata {
    /// Chemin de l'image source.
    pub source_image: String,
    /// Horodatage ISO-8601 de la génération.
    pub timestamp: String,
    /// Options utilisées pour le rendu.
    pub options: RenderOptions,
    /// Version de l'outil.
    pub version: String,
}

impl Metadata {
    /// Capture les métadonnées d'un rendu à l'instant présent.
    #[must_use]
    pub fn new(source_image: impl Into<String>, options: &RenderOptions) -> Self {
        Self {
            source_image: source_image.into(),
            timestamp: chrono::Local::now().to_rfc3339(),
            options: options.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Chemin du document sidecar pour une sortie donnée.
    ///
    /// # Example
    /// ```
    /// use ag_export::metadata::Metadata;
    /// use std::path::Path;
    /// let p = Metadata::sidecar_path(Path::new("out/art.txt"));
    /// assert_eq!(p, Path::new("out/art.meta.json"));
    /// ```
    #[must_use]
    pub fn sidecar_path(output: &Path) -> PathBuf {
        output.with_extension("meta.json")
    }

    /// Écrit le document en JSON indenté.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Sérialisation des métadonnées")?;
        std::fs::write(path, json)
            .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
        log::info!("Métadonnées sauvegardées : {}", path.display());
        Ok(())
    }
}
