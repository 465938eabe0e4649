use std::path::{Path, PathBuf};

use ag_core::{ExportFormat, ValidationError};
use anyhow::{Context, Result};

/// Vérifie qu'une destination est utilisable, en créant les répertoires
/// parents manquants.
///
/// # Errors
/// Returns [`ValidationError::OutputPath`] if the parent directory cannot be
/// created or the destination is a directory.
pub fn validate_output_path(path: &Path) -> Result<(), ValidationError> {
    if path.is_dir() {
        return Err(ValidationError::OutputPath(format!(
            "{} est un répertoire",
            path.display()
        )));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|err| {
            ValidationError::OutputPath(format!(
                "impossible de créer {} : {err}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

/// Écrit le rendu tel quel, sans conteneur.
///
/// # Errors
/// Returns an error if the destination is invalid or the write fails.
pub fn save_text(art: &str, path: &Path) -> Result<()> {
    validate_output_path(path)?;
    std::fs::write(path, art)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("Art sauvegardé : {}", path.display());
    Ok(())
}

/// Export the art wrapped in the requested container format.
///
/// L'extension du chemin est remplacée par celle du format. Le contenu est
/// repris verbatim : un bloc `<pre>` pour HTML, un bloc de code clôturé pour
/// Markdown.
///
/// # Errors
/// Returns an error if the destination is invalid or the write fails.
pub fn export(art: &str, path: &Path, format: ExportFormat) -> Result<PathBuf> {
    let path = path.with_extension(format.extension());
    let content = match format {
        ExportFormat::Txt => art.to_string(),
        ExportFormat::Html => format!(
            "<!DOCTYPE html>\n<html>\n<head><title>ASCII Art</title></head>\n<body><pre>{art}</pre></body>\n</html>\n"
        ),
        ExportFormat::Md => format!("```\n{art}\n```\n"),
    };
    save_text(&content, &path)?;
    Ok(path)
}
