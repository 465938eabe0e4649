use std::path::Path;

use ag_core::RenderOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// État de projet persisté : le rendu et tout ce qu'il faut pour le refaire.
///
/// Encodé en bincode (format compact, non destiné à l'édition manuelle).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Project {
    /// Chemin de l'image source.
    pub source_image: String,
    /// Options du rendu sauvegardé.
    pub options: RenderOptions,
    /// Le rendu lui-même, escapes inclus.
    pub art: String,
    /// Horodatage ISO-8601 de la sauvegarde.
    pub saved_at: String,
}

impl Project {
    /// Assemble un projet prêt à sauvegarder.
    #[must_use]
    pub fn new(source_image: impl Into<String>, options: &RenderOptions, art: impl Into<String>) -> Self {
        Self {
            source_image: source_image.into(),
            options: options.clone(),
            art: art.into(),
            saved_at: chrono::Local::now().to_rfc3339(),
        }
    }

    /// Écrit le projet encodé en bincode.
    ///
    /// # Errors
    /// Returns an error if encoding or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serialize(self).context("Encodage du projet")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
        log::info!("Projet sauvegardé : {}", path.display());
        Ok(())
    }

    /// Relit un projet sauvegardé.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Impossible de lire {}", path.display()))?;
        bincode::deserialize(&bytes)
            .with_context(|| format!("Projet corrompu : {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ag_core::ColorMode;

    #[test]
    fn save_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.agproj");

        let options = RenderOptions {
            color_mode: ColorMode::Foreground,
            ..RenderOptions::default()
        };
        let project = Project::new("photo.png", &options, "@@..\x1b[0m");
        project.save(&path).unwrap();

        let back = Project::load(&path).unwrap();
        assert_eq!(back.source_image, "photo.png");
        assert_eq!(back.options.color_mode, ColorMode::Foreground);
        assert_eq!(back.art, "@@..\x1b[0m");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.agproj");
        std::fs::write(&path, b"definitely not bincode").unwrap();
        assert!(Project::load(&path).is_err());
    }
}
