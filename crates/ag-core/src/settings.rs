use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::ColorMode;
use crate::config::ExportFormat;
use crate::palette::{DEFAULT_CHARS, PalettePolicy};

/// Bornes de validation pour les entrées.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Limits {
    /// Dimensions minimales de l'image source en pixels.
    pub min_image_size: (u32, u32),
    /// Dimensions maximales de l'image source en pixels.
    pub max_image_size: (u32, u32),
    /// Largeur minimale de sortie en caractères.
    pub min_width: u32,
    /// Largeur maximale de sortie en caractères.
    pub max_width: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_image_size: (10, 10),
            max_image_size: (10_000, 10_000),
            min_width: 10,
            max_width: 500,
        }
    }
}

/// Section rendu du fichier de settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Largeur par défaut en caractères.
    pub width: u32,
    /// Détourage du fond par défaut.
    pub remove_background: bool,
    /// Mode pattern par défaut.
    pub pattern_mode: bool,
    /// Mode couleur par défaut.
    pub color_mode: ColorMode,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 100,
            remove_background: false,
            pattern_mode: false,
            color_mode: ColorMode::None,
        }
    }
}

/// Section palette du fichier de settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PaletteSettings {
    /// Caractères par défaut, du plus dense au plus clair.
    pub default_chars: String,
    /// Règles de validation des palettes.
    pub policy: PalettePolicy,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            default_chars: DEFAULT_CHARS.to_string(),
            policy: PalettePolicy::default(),
        }
    }
}

/// Section sortie du fichier de settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Répertoire de sortie par défaut.
    pub output_dir: PathBuf,
    /// Format d'export par défaut.
    pub format: ExportFormat,
    /// Écrire un document de métadonnées à côté de la sortie.
    pub include_metadata: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            format: ExportFormat::Txt,
            include_metadata: true,
        }
    }
}

/// Settings persistés de l'application, sérialisés en JSON.
///
/// Chargement explicite au démarrage, sauvegarde explicite à la frontière.
/// Aucun état global : la valeur chargée est passée par référence.
///
/// # Example
/// ```
/// use ag_core::settings::Settings;
/// let settings = Settings::default();
/// assert_eq!(settings.render.width, 100);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Defaults for the render options.
    pub render: RenderSettings,
    /// Palette defaults and validation policy.
    pub palette: PaletteSettings,
    /// Output destination defaults.
    pub output: OutputSettings,
    /// Input validation bounds.
    pub limits: Limits,
}

impl Settings {
    /// Charge les settings depuis un fichier JSON.
    ///
    /// Fichier absent : les défauts sont écrits à l'emplacement demandé puis
    /// retournés. Chaque section est optionnelle, les champs manquants
    /// prennent leur valeur par défaut.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let settings = Self::default();
            if let Err(err) = settings.save(path) {
                log::warn!("Impossible d'écrire les settings par défaut : {err:#}");
            } else {
                log::info!("Fichier de settings créé : {}", path.display());
            }
            return Ok(settings);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire {}", path.display()))?;
        let mut settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Erreur de parsing JSON dans {}", path.display()))?;
        settings.clamp_all();
        Ok(settings)
    }

    /// Sauvegarde les settings en JSON (répertoires parents créés au besoin).
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Impossible de créer {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Sérialisation des settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
        Ok(())
    }

    /// Clamp numeric fields to sane ranges after deserialization.
    pub fn clamp_all(&mut self) {
        self.limits.min_width = self.limits.min_width.max(1);
        self.limits.max_width = self.limits.max_width.max(self.limits.min_width);
        self.render.width = self
            .render
            .width
            .clamp(self.limits.min_width, self.limits.max_width);

        // Des bornes d'image inversées (min > max) rejetteraient toute entrée
        let (min_w, min_h) = self.limits.min_image_size;
        let (max_w, max_h) = self.limits.max_image_size;
        self.limits.max_image_size = (max_w.max(min_w), max_h.max(min_h));
    }
}

/// Vérifie qu'une largeur demandée respecte les bornes configurées.
///
/// # Errors
/// Returns [`crate::error::ValidationError::InvalidWidth`] when out of range.
pub fn validate_width(width: u32, limits: &Limits) -> Result<(), crate::error::ValidationError> {
    if width < limits.min_width || width > limits.max_width {
        return Err(crate::error::ValidationError::InvalidWidth {
            width,
            min: limits.min_width,
            max: limits.max_width,
        });
    }
    Ok(())
}

/// Vérifie que les dimensions source respectent les bornes configurées.
///
/// # Errors
/// Returns [`crate::error::ValidationError::DimensionsOutOfBounds`] when out
/// of range.
pub fn validate_dimensions(
    width: u32,
    height: u32,
    limits: &Limits,
) -> Result<(), crate::error::ValidationError> {
    let (min_w, min_h) = limits.min_image_size;
    let (max_w, max_h) = limits.max_image_size;
    if width < min_w || height < min_h || width > max_w || height > max_h {
        return Err(crate::error::ValidationError::DimensionsOutOfBounds {
            width,
            height,
            min_width: min_w,
            min_height: min_h,
            max_width: max_w,
            max_height: max_h,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.render.width, 100);
        assert!(path.exists(), "defaults should be persisted on first load");
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "render": { "width": 80 } }"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.render.width, 80);
        assert_eq!(settings.palette.default_chars, DEFAULT_CHARS);
        assert_eq!(settings.output.format, ExportFormat::Txt);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut settings = Settings::default();
        settings.render.width = 120;
        settings.render.color_mode = ColorMode::Both;
        settings.save(&path).unwrap();
        let back = Settings::load(&path).unwrap();
        assert_eq!(back.render.width, 120);
        assert_eq!(back.render.color_mode, ColorMode::Both);
    }

    #[test]
    fn width_validation_respects_limits() {
        let limits = Limits::default();
        assert!(validate_width(10, &limits).is_ok());
        assert!(validate_width(500, &limits).is_ok());
        assert!(validate_width(9, &limits).is_err());
        assert!(validate_width(501, &limits).is_err());
    }

    #[test]
    fn dimension_validation_respects_limits() {
        let limits = Limits::default();
        assert!(validate_dimensions(100, 100, &limits).is_ok());
        assert!(validate_dimensions(5, 100, &limits).is_err());
        assert!(validate_dimensions(100, 20_000, &limits).is_err());
    }

    #[test]
    fn inverted_image_bounds_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "limits": { "min_image_size": [100, 100], "max_image_size": [50, 50],
                             "min_width": 10, "max_width": 500 } }"#,
        )
        .unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.limits.max_image_size, (100, 100));
        assert!(validate_dimensions(100, 100, &settings.limits).is_ok());
    }

    #[test]
    fn out_of_range_width_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "render": { "width": 9999 } }"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.render.width, 500);
    }
}
