//! Letter avatars.
//!
//! The background colour is picked from a fixed palette by the letter's character code and
//! the glyph comes from a built-in 5x7 bitmap font, so the same letter always produces the
//! same PNG bytes.

use std::io::Cursor;

use image::{ImageOutputFormat, Rgb, RgbImage};

pub const AVATAR_SIZE: u32 = 100;

const PALETTE: [[u8; 3]; 10] = [
    [0xFF, 0x57, 0x33],
    [0x33, 0xA8, 0xFF],
    [0x75, 0x33, 0xFF],
    [0xFF, 0x33, 0xA8],
    [0x33, 0xFF, 0x9E],
    [0xFF, 0xC3, 0x00],
    [0xC7, 0x00, 0x39],
    [0x90, 0x0C, 0x3F],
    [0x58, 0x18, 0x45],
    [0x1A, 0x93, 0x6F],
];

const FOREGROUND: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);

const GLYPH_COLS: u32 = 5;
const GLYPH_ROWS: u32 = 7;

/// Background colour for `letter`.
pub fn background_for(letter: char) -> Rgb<u8> {
    let code = letter.to_ascii_uppercase() as usize;
    Rgb(PALETTE[code % PALETTE.len()])
}

/// Renders `letter` centred on its background colour and encodes it as PNG.
pub fn generate_avatar(
    letter: char,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, image::ImageError> {
    let letter = letter.to_ascii_uppercase();
    let mut img = RgbImage::from_pixel(width, height, background_for(letter));

    // Glyph takes roughly half the shorter side.
    let scale = (width.min(height) / 2 / GLYPH_ROWS).max(1);
    let glyph_w = GLYPH_COLS * scale;
    let glyph_h = GLYPH_ROWS * scale;
    let left = width.saturating_sub(glyph_w) / 2;
    let top = height.saturating_sub(glyph_h) / 2;

    for (row, bits) in glyph(letter).iter().enumerate() {
        for col in 0..GLYPH_COLS {
            if bits & (1 << (GLYPH_COLS - 1 - col)) == 0 {
                continue;
            }
            let x0 = left + col * scale;
            let y0 = top + row as u32 * scale;
            for y in y0..(y0 + scale).min(height) {
                for x in x0..(x0 + scale).min(width) {
                    img.put_pixel(x, y, FOREGROUND);
                }
            }
        }
    }

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

/// First character of `name`, or `?` for an empty name.
pub fn initial(name: &str) -> char {
    name.chars().next().unwrap_or('?')
}

fn glyph(letter: char) -> [u8; 7] {
    match letter {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}
