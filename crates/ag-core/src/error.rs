use std::path::PathBuf;

use thiserror::Error;

/// Erreurs de validation détectées avant le rendu.
///
/// Toutes ces erreurs sont fatales : aucun traitement ne démarre si l'une
/// d'elles est levée. Les conditions dégradées (échec du détourage) ne
/// passent pas par ce type, elles sont loggées et absorbées.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Referenced image file does not exist.
    #[error("Fichier introuvable : {}", path.display())]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Path exists but is not a regular file.
    #[error("Le chemin n'est pas un fichier : {}", path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// Unsupported image extension or format.
    #[error("Format non supporté : {format}")]
    UnsupportedFormat {
        /// The format string that is unsupported.
        format: String,
    },

    /// File could not be decoded as an image.
    #[error("Image invalide ou corrompue : {} ({reason})", path.display())]
    CorruptImage {
        /// Path of the rejected file.
        path: PathBuf,
        /// Decoder failure description.
        reason: String,
    },

    /// Pixel dimensions outside the configured bounds.
    #[error("Dimensions hors limites : {width}×{height} (min {min_width}×{min_height}, max {max_width}×{max_height})")]
    DimensionsOutOfBounds {
        /// Source width in pixels.
        width: u32,
        /// Source height in pixels.
        height: u32,
        /// Minimum allowed width.
        min_width: u32,
        /// Minimum allowed height.
        min_height: u32,
        /// Maximum allowed width.
        max_width: u32,
        /// Maximum allowed height.
        max_height: u32,
    },

    /// Character palette rejected (length, empty entry, policy violation).
    #[error("Palette invalide : {0}")]
    InvalidPalette(String),

    /// Requested output width outside the allowed range.
    #[error("Largeur invalide : {width} (attendu entre {min} et {max})")]
    InvalidWidth {
        /// Requested width in characters.
        width: u32,
        /// Minimum allowed width.
        min: u32,
        /// Maximum allowed width.
        max: u32,
    },

    /// Output destination cannot be written.
    #[error("Chemin de sortie invalide : {0}")]
    OutputPath(String),
}
