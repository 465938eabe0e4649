use std::path::PathBuf;

use ag_core::settings::validate_width;
use ag_core::{ColorMode, ExportFormat, Palette, RenderOptions, Settings};
use anyhow::Result;
use clap::Parser;

/// asciigen : convertisseur image vers ASCII art avec couleur ANSI.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF ; les GIF animés sont rejoués).
    pub input: PathBuf,

    /// Fichier de sortie. Absent : le rendu part sur stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Largeur de sortie en caractères.
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Caractères personnalisés, ou un preset nommé ("binary", "blocks", ...).
    #[arg(long)]
    pub chars: Option<String>,

    /// Détourer le sujet avant conversion.
    #[arg(long, default_value_t = false)]
    pub remove_bg: bool,

    /// Répéter la palette par colonne au lieu de suivre la luminosité.
    #[arg(long, default_value_t = false)]
    pub pattern_mode: bool,

    /// Mode couleur : none, foreground, background, both.
    #[arg(long)]
    pub color: Option<String>,

    /// Format de sortie : txt, html, md.
    #[arg(long, default_value = "txt")]
    pub format: String,

    /// Sauvegarder aussi l'état de projet (.agproj) à ce chemin.
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Frames par seconde pour le playback des GIF animés.
    #[arg(long, default_value_t = 10)]
    pub fps: u32,

    /// Fichier de settings JSON. Créé avec les défauts s'il n'existe pas.
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Résout le mode couleur demandé, `None` si le flag est absent.
    ///
    /// Un `--color none` explicite est distinct du flag absent : il prime
    /// sur les settings chargés, comme tous les autres overrides.
    ///
    /// # Errors
    /// Returns an error for anything outside the four known modes.
    pub fn color_mode(&self) -> Result<Option<ColorMode>> {
        let Some(color) = self.color.as_deref() else {
            return Ok(None);
        };
        let mode = match color {
            "none" => ColorMode::None,
            "foreground" => ColorMode::Foreground,
            "background" => ColorMode::Background,
            "both" => ColorMode::Both,
            other => anyhow::bail!(
                "Mode couleur inconnu '{other}'. Choix : none, foreground, background, both."
            ),
        };
        Ok(Some(mode))
    }

    /// Résout le format d'export demandé.
    ///
    /// # Errors
    /// Returns an error for anything outside txt, html, md.
    pub fn export_format(&self) -> Result<ExportFormat> {
        match self.format.as_str() {
            "txt" => Ok(ExportFormat::Txt),
            "html" => Ok(ExportFormat::Html),
            "md" => Ok(ExportFormat::Md),
            other => anyhow::bail!("Format inconnu '{other}'. Choix : txt, html, md."),
        }
    }

    /// Vérifie que `--project` vise bien une source fixe.
    ///
    /// Un projet capture un rendu unique ; pour un GIF animé il n'y a pas
    /// de frame canonique à sauvegarder, la combinaison est refusée plutôt
    /// qu'ignorée en silence.
    ///
    /// # Errors
    /// Returns an error when `--project` is combined with an animated source.
    pub fn check_project_target(&self, animated: bool) -> Result<()> {
        if animated && self.project.is_some() {
            anyhow::bail!("--project ne s'applique qu'aux images fixes, pas aux GIF animés");
        }
        Ok(())
    }

    /// Fusionne settings chargés et overrides CLI en options de rendu.
    ///
    /// Toute la validation d'entrée (largeur, palette) passe ici, avant que
    /// le moindre pixel soit décodé.
    ///
    /// # Errors
    /// Returns a validation error on out-of-range width, bad palette, or an
    /// unknown color mode.
    pub fn to_options(&self, settings: &Settings) -> Result<RenderOptions> {
        let width = self.width.unwrap_or(settings.render.width);
        validate_width(width, &settings.limits)?;

        let policy = &settings.palette.policy;
        let palette = match self.chars.as_deref() {
            Some(arg) => Palette::parse_with_policy(arg, policy)?,
            None => Palette::with_policy(&settings.palette.default_chars, policy)?,
        };

        Ok(RenderOptions {
            width,
            remove_background: self.remove_bg || settings.render.remove_background,
            pattern_mode: self.pattern_mode || settings.render.pattern_mode,
            color_mode: self.color_mode()?.unwrap_or(settings.render.color_mode),
            palette,
        })
    }
}
