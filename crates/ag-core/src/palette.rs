use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Palette par défaut : 11 caractères, du plus dense au plus clair.
pub const DEFAULT_CHARS: &str = "@#S%?*+;:,.";

/// Minimum palette length. Below 2 the gradient bucket math divides by zero.
pub const MIN_CHARS: usize = 2;

/// Maximum palette length.
pub const MAX_CHARS: usize = 50;

/// Presets nommés, résolus par `Palette::parse` (insensible à la casse).
pub const PRESETS: &[(&str, &str)] = &[
    ("binary", "10"),
    ("simple", "# "),
    ("blocks", "█▓▒░ "),
    ("dots", "●•°· "),
    ("matrix", "MATRIX"),
    ("cards", "♠♣♥♦"),
    ("weather", "☀⛅☁🌧⛈"),
    (
        "detailed",
        "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`'. ",
    ),
];

/// Behaviour flags applied when a palette is validated.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PalettePolicy {
    /// Autoriser les espaces dans la palette.
    pub allow_spaces: bool,
    /// Autoriser les caractères non alphanumériques.
    pub allow_special: bool,
    /// Restreindre aux caractères ASCII imprimables.
    pub printable_only: bool,
}

impl Default for PalettePolicy {
    fn default() -> Self {
        Self {
            allow_spaces: true,
            allow_special: true,
            printable_only: false,
        }
    }
}

/// Ordered character palette used for intensity buckets or repeating patterns.
///
/// Construction validates the [2, 50] length bound, so a `Palette` in hand is
/// always safe to index with the gradient bucket math.
///
/// # Example
/// ```
/// use ag_core::palette::Palette;
/// let p = Palette::new("@#. ").unwrap();
/// assert_eq!(p.len(), 4);
/// assert!(Palette::new("@").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Palette {
    chars: Vec<char>,
}

impl Palette {
    /// Build a palette from the given characters, in order.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidPalette`] if the length is outside
    /// [2, 50] or the default policy is violated.
    pub fn new(chars: &str) -> Result<Self, ValidationError> {
        Self::with_policy(chars, &PalettePolicy::default())
    }

    /// Build a palette validated against an explicit policy.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidPalette`] on any policy violation.
    pub fn with_policy(chars: &str, policy: &PalettePolicy) -> Result<Self, ValidationError> {
        let chars: Vec<char> = chars.chars().collect();
        validate_chars(&chars, policy)?;
        Ok(Self { chars })
    }

    /// Resolve a CLI argument : un nom de preset connu, sinon les caractères
    /// littéraux dans l'ordre donné.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidPalette`] if the literal characters
    /// fail validation.
    ///
    /// # Example
    /// ```
    /// use ag_core::palette::Palette;
    /// assert_eq!(Palette::parse("binary").unwrap().len(), 2);
    /// assert_eq!(Palette::parse("AB").unwrap().len(), 2);
    /// ```
    pub fn parse(arg: &str) -> Result<Self, ValidationError> {
        Self::parse_with_policy(arg, &PalettePolicy::default())
    }

    /// Comme [`Palette::parse`], avec une policy de validation explicite.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidPalette`] on any policy violation.
    pub fn parse_with_policy(arg: &str, policy: &PalettePolicy) -> Result<Self, ValidationError> {
        let lowered = arg.to_lowercase();
        if let Some((_, chars)) = PRESETS.iter().find(|(name, _)| *name == lowered) {
            return Self::with_policy(chars, policy);
        }
        Self::with_policy(arg, policy)
    }

    /// Number of characters in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false : la construction rejette les palettes vides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Select the character for one grid cell.
    ///
    /// Pattern mode picks by column position only (`column % len`), ignoring
    /// intensity. Gradient mode buckets the intensity over `len - 1` real
    /// intervals; the index is clamped so float rounding can never run past
    /// the last character.
    ///
    /// # Example
    /// ```
    /// use ag_core::palette::Palette;
    /// let p = Palette::new("@. ").unwrap();
    /// assert_eq!(p.select(0, 0, false), '@');
    /// assert_eq!(p.select(255, 0, false), ' ');
    /// assert_eq!(p.select(255, 1, true), '.');
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn select(&self, intensity: u8, column: usize, pattern_mode: bool) -> char {
        if pattern_mode {
            return self.chars[column % self.chars.len()];
        }
        let bucket = 255.0 / (self.chars.len() - 1) as f64;
        let index = (f64::from(intensity) / bucket) as usize;
        self.chars[index.min(self.chars.len() - 1)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            chars: DEFAULT_CHARS.chars().collect(),
        }
    }
}

impl TryFrom<String> for Palette {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Palette> for String {
    fn from(palette: Palette) -> Self {
        palette.chars.into_iter().collect()
    }
}

/// Validate a character list against length bounds and a policy.
///
/// # Errors
/// Returns [`ValidationError::InvalidPalette`] describing the first violation.
pub fn validate_chars(chars: &[char], policy: &PalettePolicy) -> Result<(), ValidationError> {
    if chars.len() < MIN_CHARS {
        return Err(ValidationError::InvalidPalette(format!(
            "au moins {MIN_CHARS} caractères requis, reçu {}",
            chars.len()
        )));
    }
    if chars.len() > MAX_CHARS {
        return Err(ValidationError::InvalidPalette(format!(
            "maximum {MAX_CHARS} caractères, reçu {}",
            chars.len()
        )));
    }
    if !policy.allow_spaces && chars.iter().any(|c| c.is_whitespace()) {
        return Err(ValidationError::InvalidPalette(
            "les espaces ne sont pas autorisés".into(),
        ));
    }
    if !policy.allow_special && chars.iter().any(|c| !c.is_alphanumeric()) {
        return Err(ValidationError::InvalidPalette(
            "les caractères spéciaux ne sont pas autorisés".into(),
        ));
    }
    if policy.printable_only && chars.iter().any(|c| c.is_control() || !c.is_ascii()) {
        return Err(ValidationError::InvalidPalette(
            "caractère non imprimable dans la palette".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_index_in_bounds_for_all_intensities() {
        for len in [2usize, 3, 11, 50] {
            let chars: String = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWX"
                .chars()
                .take(len)
                .collect();
            let palette = Palette::new(&chars).unwrap();
            for intensity in 0..=255u8 {
                // select panics on out-of-bounds, so reaching the end is the assertion
                let _ = palette.select(intensity, 0, false);
            }
        }
    }

    #[test]
    fn gradient_extremes_hit_first_and_last() {
        let palette = Palette::new(DEFAULT_CHARS).unwrap();
        assert_eq!(palette.select(0, 0, false), '@');
        assert_eq!(palette.select(255, 0, false), '.');
    }

    #[test]
    fn binary_palette_thresholds_at_midpoint() {
        let palette = Palette::new("10").unwrap();
        assert_eq!(palette.select(127, 0, false), '1');
        assert_eq!(palette.select(128, 0, false), '0');
    }

    #[test]
    fn pattern_mode_ignores_intensity() {
        let palette = Palette::new("AB").unwrap();
        for column in 0..10 {
            let dark = palette.select(0, column, true);
            let bright = palette.select(255, column, true);
            assert_eq!(dark, bright);
            assert_eq!(dark, if column % 2 == 0 { 'A' } else { 'B' });
        }
    }

    #[test]
    fn rejects_length_out_of_bounds() {
        assert!(Palette::new("x").is_err());
        let too_long = "x".repeat(51);
        assert!(Palette::new(&too_long).is_err());
    }

    #[test]
    fn policy_flags_enforced() {
        let no_spaces = PalettePolicy {
            allow_spaces: false,
            ..PalettePolicy::default()
        };
        assert!(Palette::with_policy("# ", &no_spaces).is_err());

        let no_special = PalettePolicy {
            allow_special: false,
            ..PalettePolicy::default()
        };
        assert!(Palette::with_policy("ab#", &no_special).is_err());
        assert!(Palette::with_policy("ab1", &no_special).is_ok());
    }

    #[test]
    fn parse_resolves_presets_case_insensitive() {
        assert_eq!(Palette::parse("BINARY").unwrap(), Palette::new("10").unwrap());
        assert_eq!(Palette::parse("Blocks").unwrap().len(), 5);
        // Non-preset falls back to literal characters
        assert_eq!(Palette::parse("@.").unwrap().len(), 2);
    }

    #[test]
    fn serde_round_trip_as_string() {
        let palette = Palette::new("@#. ").unwrap();
        let json = serde_json::to_string(&palette).unwrap();
        assert_eq!(json, "\"@#. \"");
        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, palette);
    }
}
