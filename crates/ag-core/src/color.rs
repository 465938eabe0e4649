use serde::{Deserialize, Serialize};

/// Séquence de reset ANSI, émise une seule fois en toute fin de rendu.
pub const RESET: &str = "\x1b[0m";

/// Décalage appliqué au fond en mode `Both` pour le distinguer du texte.
const BOTH_BG_NUDGE: u8 = 20;

/// Stratégie de coloration d'un caractère rendu.
///
/// Énumération fermée : le dispatch par mode est fixé à la compilation,
/// pas une table modifiable au runtime.
///
/// # Example
/// ```
/// use ag_core::color::ColorMode;
/// assert!(matches!(ColorMode::default(), ColorMode::None));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Caractère brut, aucune séquence d'échappement.
    #[default]
    None,
    /// 256-color foreground escape before each character.
    Foreground,
    /// 256-color background escape before each character.
    Background,
    /// Foreground plus a lightened background, two escapes per character.
    Both,
}

/// Quantize an RGB triple into the 6×6×6 terminal color cube.
///
/// Each channel is bucketed into 6 levels (`v * 5 / 255`), giving index
/// `16 + 36r + 6g + b` in the standard 256-color table.
///
/// # Example
/// ```
/// use ag_core::color::cube_index;
/// assert_eq!(cube_index(0, 0, 0), 16);
/// assert_eq!(cube_index(255, 255, 255), 231);
/// ```
#[inline(always)]
#[must_use]
pub fn cube_index(r: u8, g: u8, b: u8) -> u8 {
    let level = |v: u8| -> u16 { u16::from(v) * 5 / 255 };
    (16 + 36 * level(r) + 6 * level(g) + level(b)) as u8
}

/// Append one styled character to `out` according to the color mode.
///
/// Invariant : aucune séquence de reset n'est émise ici. Le reset est la
/// responsabilité de l'appelant, une seule fois après la dernière ligne.
#[inline]
pub fn push_styled(out: &mut String, ch: char, (r, g, b): (u8, u8, u8), mode: ColorMode) {
    use std::fmt::Write;

    match mode {
        ColorMode::None => {}
        ColorMode::Foreground => {
            let _ = write!(out, "\x1b[38;5;{}m", cube_index(r, g, b));
        }
        ColorMode::Background => {
            let _ = write!(out, "\x1b[48;5;{}m", cube_index(r, g, b));
        }
        ColorMode::Both => {
            let bg = cube_index(
                r.saturating_add(BOTH_BG_NUDGE),
                g.saturating_add(BOTH_BG_NUDGE),
                b.saturating_add(BOTH_BG_NUDGE),
            );
            let _ = write!(out, "\x1b[38;5;{}m\x1b[48;5;{bg}m", cube_index(r, g, b));
        }
    }
    out.push(ch);
}

/// One-shot convenience over [`push_styled`].
///
/// # Example
/// ```
/// use ag_core::color::{styled, ColorMode};
/// assert_eq!(styled('@', (0, 0, 0), ColorMode::None), "@");
/// assert_eq!(styled('@', (0, 0, 0), ColorMode::Foreground), "\x1b[38;5;16m@");
/// ```
#[must_use]
pub fn styled(ch: char, rgb: (u8, u8, u8), mode: ColorMode) -> String {
    let mut out = String::new();
    push_styled(&mut out, ch, rgb, mode);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_index_covers_full_range() {
        assert_eq!(cube_index(0, 0, 0), 16);
        assert_eq!(cube_index(255, 0, 0), 196);
        assert_eq!(cube_index(0, 255, 0), 46);
        assert_eq!(cube_index(0, 0, 255), 21);
        assert_eq!(cube_index(255, 255, 255), 231);
        // Every triple stays inside the 216-color cube [16, 231]
        for v in [0u8, 43, 86, 128, 171, 214, 255] {
            let idx = cube_index(v, v, v);
            assert!((16..=231).contains(&idx));
        }
    }

    #[test]
    fn none_mode_emits_no_escape() {
        assert_eq!(styled('x', (12, 200, 90), ColorMode::None), "x");
    }

    #[test]
    fn foreground_emits_one_escape() {
        let s = styled('x', (255, 255, 255), ColorMode::Foreground);
        assert_eq!(s, "\x1b[38;5;231mx");
        assert_eq!(s.matches('\x1b').count(), 1);
    }

    #[test]
    fn background_emits_one_escape() {
        let s = styled('x', (0, 0, 0), ColorMode::Background);
        assert_eq!(s, "\x1b[48;5;16mx");
    }

    #[test]
    fn both_emits_two_escapes_with_nudged_background() {
        let s = styled('x', (0, 0, 0), ColorMode::Both);
        assert_eq!(s.matches('\x1b').count(), 2);
        assert!(s.starts_with("\x1b[38;5;16m"));
        // (20, 20, 20) still quantizes to level 0, so bg stays at 16
        assert!(s.contains("\x1b[48;5;16m"));
    }

    #[test]
    fn both_nudge_saturates_at_white() {
        // 250 + 20 must clamp instead of wrapping
        let s = styled('x', (250, 250, 250), ColorMode::Both);
        assert!(s.contains("\x1b[48;5;231m"));
    }
}
