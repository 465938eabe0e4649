use serde::{Deserialize, Serialize};

use crate::color::ColorMode;
use crate::palette::Palette;

/// Options immuables pour un appel de rendu.
///
/// Construites une fois à partir des settings + overrides CLI, passées par
/// référence dans le pipeline. Aucune mutation en cours de rendu.
///
/// # Example
/// ```
/// use ag_core::config::RenderOptions;
/// let options = RenderOptions::default();
/// assert_eq!(options.width, 100);
/// assert!(!options.remove_background);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RenderOptions {
    /// Largeur cible en caractères.
    pub width: u32,
    /// Détourer le sujet avant conversion.
    pub remove_background: bool,
    /// Sélection par position de colonne au lieu de la luminosité.
    pub pattern_mode: bool,
    /// Stratégie de coloration ANSI.
    pub color_mode: ColorMode,
    /// Palette ordonnée de caractères.
    pub palette: Palette,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 100,
            remove_background: false,
            pattern_mode: false,
            color_mode: ColorMode::None,
            palette: Palette::default(),
        }
    }
}

/// Output container format for saved art.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Texte brut, écrit tel quel.
    #[default]
    Txt,
    /// Document HTML minimal, art dans un bloc `<pre>`.
    Html,
    /// Markdown, art dans un bloc de code clôturé.
    Md,
}

impl ExportFormat {
    /// File extension for this format, sans le point.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Html => "html",
            Self::Md => "md",
        }
    }
}
