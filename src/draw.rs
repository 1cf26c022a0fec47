//! Software drawing primitives.
//!
//! Two surfaces are drawn on: the RGB8 camera [`Frame`] (landmark
//! annotation, done by the sampler) and the dashboard's packed-ARGB
//! framebuffer.  Both share the 3×5 bitmap font.  Everything is
//! bounds-checked, so drawing partially off-frame is harmless.

use crate::camera::Frame;

pub const MAGENTA: (u8, u8, u8) = (255, 0, 255);
pub const WHITE: (u8, u8, u8) = (255, 255, 255);

// ════════════════════════════════════════════════════════════════════════════
// RGB frame primitives (annotation overlay)
// ════════════════════════════════════════════════════════════════════════════

pub fn set_px(frame: &mut Frame, x: i32, y: i32, (r, g, b): (u8, u8, u8)) {
    if x < 0 || y < 0 || x >= frame.width as i32 || y >= frame.height as i32 {
        return;
    }
    let i = (y as usize * frame.width + x as usize) * 3;
    frame.data[i] = r;
    frame.data[i + 1] = g;
    frame.data[i + 2] = b;
}

/// Filled disc.
pub fn fill_circle(frame: &mut Frame, cx: i32, cy: i32, radius: i32, color: (u8, u8, u8)) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                set_px(frame, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Bresenham line; `thickness` is applied by stamping a small square at
/// every step.
pub fn draw_line(
    frame: &mut Frame,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: i32,
    color: (u8, u8, u8),
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    let t = thickness.max(1) / 2;
    loop {
        for oy in -t..=t {
            for ox in -t..=t {
                set_px(frame, x + ox, y + oy, color);
            }
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Bitmap-font text on an RGB frame.
pub fn draw_text(frame: &mut Frame, text: &str, x: i32, y: i32, scale: i32, color: (u8, u8, u8)) {
    let scale = scale.max(1);
    let mut cx = x;
    for ch in text.chars() {
        let g = glyph(ch);
        for row in 0..5i32 {
            let bits = g >> (12 - 3 * row as usize) & 0b111;
            for col in 0..3i32 {
                if bits & (1u16 << (2 - col as usize)) != 0 {
                    for oy in 0..scale {
                        for ox in 0..scale {
                            set_px(frame, cx + col * scale + ox, y + row * scale + oy, color);
                        }
                    }
                }
            }
        }
        cx += 4 * scale;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ARGB framebuffer primitives (dashboard)
// ════════════════════════════════════════════════════════════════════════════

/// Filled rectangle on a packed 0xAARRGGBB buffer with row length `stride`.
pub fn fill_rect(buf: &mut [u32], stride: usize, x: usize, y: usize, w: usize, h: usize, color: u32) {
    if stride == 0 {
        return;
    }
    let rows = buf.len() / stride;
    for row in y..(y + h).min(rows) {
        for col in x..(x + w).min(stride) {
            buf[row * stride + col] = color;
        }
    }
}

/// One-pixel rectangle outline.
pub fn draw_rect_outline(
    buf: &mut [u32],
    stride: usize,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    color: u32,
) {
    if w == 0 || h == 0 {
        return;
    }
    fill_rect(buf, stride, x, y, w, 1, color);
    fill_rect(buf, stride, x, y + h - 1, w, 1, color);
    fill_rect(buf, stride, x, y, 1, h, color);
    fill_rect(buf, stride, x + w - 1, y, 1, h, color);
}

/// Bitmap-font text on the dashboard buffer.
pub fn draw_label(
    buf: &mut [u32],
    stride: usize,
    text: &str,
    x: usize,
    y: usize,
    scale: usize,
    color: u32,
) {
    let scale = scale.max(1);
    let mut cx = x;
    for ch in text.chars() {
        let g = glyph(ch);
        for row in 0..5usize {
            let bits = g >> (12 - 3 * row) & 0b111;
            for col in 0..3usize {
                if bits & (1u16 << (2 - col)) != 0 {
                    fill_rect(buf, stride, cx + col * scale, y + row * scale, scale, scale, color);
                }
            }
        }
        cx += 4 * scale;
        if cx >= stride {
            break;
        }
    }
}

/// Width in pixels of a label drawn at the given scale.
pub fn label_width(text: &str, scale: usize) -> usize {
    text.chars().count() * 4 * scale.max(1)
}

// ════════════════════════════════════════════════════════════════════════════
// 3×5 bitmap font
// ════════════════════════════════════════════════════════════════════════════

/// One `u16` per character: five rows of three bits, top row in the most
/// significant bits.  Lowercase renders as uppercase.
pub fn glyph(c: char) -> u16 {
    match c.to_ascii_uppercase() {
        '0' => 0b111_101_101_101_111,
        '1' => 0b010_110_010_010_111,
        '2' => 0b111_001_111_100_111,
        '3' => 0b111_001_111_001_111,
        '4' => 0b101_101_111_001_001,
        '5' => 0b111_100_111_001_111,
        '6' => 0b111_100_111_101_111,
        '7' => 0b111_001_001_001_001,
        '8' => 0b111_101_111_101_111,
        '9' => 0b111_101_111_001_111,
        'A' => 0b111_101_111_101_101,
        'B' => 0b110_101_110_101_110,
        'C' => 0b111_100_100_100_111,
        'D' => 0b110_101_101_101_110,
        'E' => 0b111_100_111_100_111,
        'F' => 0b111_100_111_100_100,
        'G' => 0b111_100_101_101_111,
        'H' => 0b101_101_111_101_101,
        'I' => 0b111_010_010_010_111,
        'J' => 0b001_001_001_101_111,
        'K' => 0b101_101_110_101_101,
        'L' => 0b100_100_100_100_111,
        'M' => 0b101_111_101_101_101,
        'N' => 0b111_101_101_101_101,
        'O' => 0b111_101_101_101_111,
        'P' => 0b111_101_111_100_100,
        'Q' => 0b111_101_101_111_001,
        'R' => 0b110_101_110_101_101,
        'S' => 0b111_100_111_001_111,
        'T' => 0b111_010_010_010_010,
        'U' => 0b101_101_101_101_111,
        'V' => 0b101_101_101_101_010,
        'W' => 0b101_101_101_111_101,
        'X' => 0b101_101_010_101_101,
        'Y' => 0b101_101_111_010_010,
        'Z' => 0b111_001_010_100_111,
        '%' => 0b101_001_010_100_101,
        ':' => 0b000_010_000_010_000,
        '.' => 0b000_000_000_000_010,
        ',' => 0b000_000_000_010_100,
        '-' => 0b000_000_111_000_000,
        '=' => 0b000_111_000_111_000,
        '/' => 0b001_001_010_100_100,
        '+' => 0b000_010_111_010_000,
        ' ' => 0,
        _ => 0b000_000_010_000_000, // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
