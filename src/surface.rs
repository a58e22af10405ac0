use crate::color::Color;

/// Drawing primitives the frame driver needs from the platform.
pub trait Surface {
    fn clear(&mut self, color: Color);

    /// Fills rows `start_row..=end_row` of `column`.
    fn draw_vertical_line(&mut self, column: u32, start_row: u32, end_row: u32, color: Color);

    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: u32, color: Color);
}

// 3x5 glyphs, one row per byte, MSB of the low 3 bits is the left pixel.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b010, 0b010, 0b010], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];

const LETTERS: [[u8; 5]; 26] = [
    [0b010, 0b101, 0b111, 0b101, 0b101], // A
    [0b110, 0b101, 0b110, 0b101, 0b110], // B
    [0b011, 0b100, 0b100, 0b100, 0b011], // C
    [0b110, 0b101, 0b101, 0b101, 0b110], // D
    [0b111, 0b100, 0b110, 0b100, 0b111], // E
    [0b111, 0b100, 0b110, 0b100, 0b100], // F
    [0b011, 0b100, 0b101, 0b101, 0b011], // G
    [0b101, 0b101, 0b111, 0b101, 0b101], // H
    [0b111, 0b010, 0b010, 0b010, 0b111], // I
    [0b001, 0b001, 0b001, 0b101, 0b010], // J
    [0b101, 0b110, 0b100, 0b110, 0b101], // K
    [0b100, 0b100, 0b100, 0b100, 0b111], // L
    [0b101, 0b111, 0b111, 0b101, 0b101], // M
    [0b101, 0b111, 0b111, 0b111, 0b101], // N
    [0b010, 0b101, 0b101, 0b101, 0b010], // O
    [0b110, 0b101, 0b110, 0b100, 0b100], // P
    [0b010, 0b101, 0b101, 0b111, 0b011], // Q
    [0b110, 0b101, 0b110, 0b101, 0b101], // R
    [0b011, 0b100, 0b010, 0b001, 0b110], // S
    [0b111, 0b010, 0b010, 0b010, 0b010], // T
    [0b101, 0b101, 0b101, 0b101, 0b111], // U
    [0b101, 0b101, 0b101, 0b101, 0b010], // V
    [0b101, 0b101, 0b111, 0b111, 0b101], // W
    [0b101, 0b101, 0b010, 0b101, 0b101], // X
    [0b101, 0b101, 0b010, 0b010, 0b010], // Y
    [0b111, 0b001, 0b010, 0b100, 0b111], // Z
];

fn glyph(c: char) -> Option<[u8; 5]> {
    match c {
        '0'..='9' => Some(DIGITS[c as usize - '0' as usize]),
        'A'..='Z' => Some(LETTERS[c as usize - 'A' as usize]),
        'a'..='z' => Some(LETTERS[c as usize - 'a' as usize]),
        '.' => Some([0b000, 0b000, 0b000, 0b000, 0b010]),
        ',' => Some([0b000, 0b000, 0b000, 0b010, 0b100]),
        ':' => Some([0b000, 0b010, 0b000, 0b010, 0b000]),
        '-' => Some([0b000, 0b000, 0b111, 0b000, 0b000]),
        '(' => Some([0b001, 0b010, 0b010, 0b010, 0b001]),
        ')' => Some([0b100, 0b010, 0b010, 0b010, 0b100]),
        _ => None,
    }
}

/// Borrowed `0x00RRGGBB` pixel buffer, row-major.
pub struct FrameBuffer<'a> {
    pixels: &'a mut [u32],
    width: usize,
    height: usize,
}

impl<'a> FrameBuffer<'a> {
    /// Drawing past the end of a short `pixels` is dropped.
    pub fn new(pixels: &'a mut [u32], width: usize, height: usize) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            if let Some(px) = self.pixels.get_mut(y as usize * self.width + x as usize) {
                *px = color;
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        for dy in 0..h {
            for dx in 0..w {
                self.put_pixel(x + dx, y + dy, color);
            }
        }
    }
}

impl Surface for FrameBuffer<'_> {
    fn clear(&mut self, color: Color) {
        let len = self.pixels.len().min(self.width * self.height);
        self.pixels[..len].fill(color);
    }

    fn draw_vertical_line(&mut self, column: u32, start_row: u32, end_row: u32, color: Color) {
        debug_assert!(start_row <= end_row, "inverted slice {start_row}..={end_row}");
        let x = column as usize;
        if x >= self.width || self.height == 0 {
            return;
        }
        let y1 = (end_row as usize).min(self.height - 1);

        for y in start_row as usize..=y1 {
            match self.pixels.get_mut(y * self.width + x) {
                Some(px) => *px = color,
                None => break,
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: u32, color: Color) {
        let scale = (font_size / 5).max(1) as i32;
        let advance = 4 * scale;

        let mut cx = x;
        for c in text.chars() {
            if let Some(rows) = glyph(c) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..3 {
                        if (bits >> (2 - col)) & 1 != 0 {
                            let (px, py) = (cx + col * scale, y + row as i32 * scale);
                            self.fill_rect(px, py, scale, scale, color);
                        }
                    }
                }
            }
            cx += advance;
        }
    }
}
