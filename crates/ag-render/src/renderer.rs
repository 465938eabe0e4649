use ag_core::RenderOptions;
use ag_core::color::{self, RESET};
use image::{GrayImage, RgbImage};

/// Valeur de masque en dessous de laquelle une cellule est du fond.
pub const MASK_THRESHOLD: u8 = 128;

/// Convert one prepared frame into its textual rendering.
///
/// Transformation pure, un seul passage row-major. Chaque cellule masquée
/// (`mask < 128`) devient un espace nu quel que soit le mode couleur ; les
/// autres passent par la sélection de caractère puis le mapper couleur. Les
/// lignes sont jointes par `\n` et la sortie se termine par exactement une
/// séquence de reset.
///
/// Préconditions : `gray`, `color` et `mask` (si présent) ont des dimensions
/// identiques, établies en amont par un resize cohérent. Une violation est
/// une erreur de programmation, pas une condition récupérable.
///
/// # Example
/// ```
/// use ag_core::RenderOptions;
/// use ag_render::renderer::render;
/// use image::{GrayImage, RgbImage};
///
/// let gray = GrayImage::new(4, 2);
/// let color = RgbImage::new(4, 2);
/// let art = render(&gray, &color, None, &RenderOptions::default());
/// assert_eq!(art.lines().count(), 2);
/// ```
#[must_use]
pub fn render(
    gray: &GrayImage,
    color: &RgbImage,
    mask: Option<&GrayImage>,
    options: &RenderOptions,
) -> String {
    debug_assert_eq!(gray.dimensions(), color.dimensions(), "bitmap mismatch");
    if let Some(mask) = mask {
        debug_assert_eq!(gray.dimensions(), mask.dimensions(), "mask mismatch");
    }

    let (width, height) = gray.dimensions();
    log::debug!("Rendu {width}×{height}, couleur {:?}", options.color_mode);

    // Estimation large : jusqu'à deux escapes de ~11 bytes par cellule
    let mut out = String::with_capacity((width as usize + 1) * height as usize * 24);

    for y in 0..height {
        if y > 0 {
            out.push('\n');
        }
        for x in 0..width {
            if let Some(mask) = mask
                && mask.get_pixel(x, y)[0] < MASK_THRESHOLD
            {
                out.push(' ');
                continue;
            }
            let intensity = gray.get_pixel(x, y)[0];
            let ch = options
                .palette
                .select(intensity, x as usize, options.pattern_mode);
            let px = color.get_pixel(x, y);
            color::push_styled(&mut out, ch, (px[0], px[1], px[2]), options.color_mode);
        }
    }
    out.push_str(RESET);
    out
}

/// Nombre de caractères visibles d'une ligne, séquences d'échappement exclues.
///
/// # Example
/// ```
/// use ag_render::renderer::visible_width;
/// assert_eq!(visible_width("\x1b[38;5;16m@\x1b[0m"), 1);
/// ```
#[must_use]
pub fn visible_width(line: &str) -> usize {
    let mut count = 0usize;
    let mut in_escape = false;
    for ch in line.chars() {
        if in_escape {
            if ch == 'm' {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            count += 1;
        }
    }
    count
}
