/// Packed `0x00RRGGBB`, the layout softbuffer presents.
pub type Color = u32;

pub const BLACK: Color = pack_rgb(0, 0, 0);
pub const RAYWHITE: Color = pack_rgb(245, 245, 245);
pub const GRAY: Color = pack_rgb(130, 130, 130);

/// (vertical face, horizontal face) shades per wall id, starting at id 1.
const WALL_PALETTE: [(Color, Color); 4] = [
    (pack_rgb(0, 121, 241), pack_rgb(0, 82, 172)),  // blue
    (pack_rgb(230, 41, 55), pack_rgb(190, 33, 55)), // red
    (pack_rgb(0, 228, 48), pack_rgb(0, 117, 44)),   // green
    (pack_rgb(253, 249, 0), pack_rgb(200, 180, 0)), // yellow
];

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> Color {
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

/// Shade for wall `id`; horizontal faces get the darker tone.
pub fn wall_color(id: u8, horizontal: bool) -> Color {
    let idx = (id.max(1) as usize - 1) % WALL_PALETTE.len();
    let (light, dark) = WALL_PALETTE[idx];
    if horizontal { dark } else { light }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_rgb() {
        assert_eq!(pack_rgb(0x12, 0x34, 0x56), 0x0012_3456);
    }

    #[test]
    fn wall_one_is_two_tone_blue() {
        assert_eq!(wall_color(1, false), 0x0000_79F1);
        assert_eq!(wall_color(1, true), 0x0000_52AC);
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(wall_color(5, false), wall_color(1, false));
        assert_ne!(wall_color(2, false), wall_color(1, false));
    }
}
