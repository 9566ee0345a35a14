//! Shade offsets and the shade sampler.
//!
//! Offsets are computed in `f32` and floored, so the exact integer values
//! match across platforms. Feeding and rendering use slightly different
//! dark formulas; see [`dark_feed_offset`] and [`table_row_offset`].

use crate::color::{is_black_or_white, shift_pixel};
use crate::histogram::Population;
use crate::image::PixelBuffer;

/// Which side of the original brightness a shade table covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeKind {
    Light,
    Dark,
}

#[inline]
fn ramp(step: u32, shades: u32) -> f32 {
    step as f32 / (shades - 1) as f32 * 255.0
}

/// Light offset fed for step `j` of `shades` (used for `j` in `1..shades`).
pub fn light_feed_offset(j: u32, shades: u32) -> i32 {
    (ramp(j, shades) + 0.5).floor() as i32
}

/// Dark offset fed for step `j` of `shades` (used for `j` in `0..shades - 1`).
///
/// The `- 0.5` bias makes step 0 come out as -256, which clamps the same
/// as -255.
pub fn dark_feed_offset(j: u32, shades: u32) -> i32 {
    (ramp(j, shades) - 0.5).floor() as i32 - 255
}

/// Offsets of every light shade pass, in feed order.
pub fn light_feed_offsets(shades: u32) -> Vec<i32> {
    (1..shades).map(|j| light_feed_offset(j, shades)).collect()
}

/// Offsets of every dark shade pass, in feed order.
pub fn dark_feed_offsets(shades: u32) -> Vec<i32> {
    (0..shades - 1).map(|j| dark_feed_offset(j, shades)).collect()
}

/// Offset applied to row `y` of a shade table.
pub fn table_row_offset(y: u32, shades: u32, kind: ShadeKind) -> i32 {
    let shade = (ramp(y, shades) + 0.5).floor() as i32;
    match kind {
        ShadeKind::Light => shade,
        ShadeKind::Dark => shade - 255,
    }
}

/// Feed every pixel of `image`, brightness-shifted by `shade`, into the
/// population.
///
/// With `suppress_black_white` (and an opaque quantizer space) shifted
/// pixels that land on pure black or pure white are dropped, since those
/// two colors are forced into the palette anyway.
pub fn sample(
    population: &mut Population,
    image: &PixelBuffer,
    shade: i32,
    suppress_black_white: bool,
) {
    let suppress = suppress_black_white && !population.transparency();
    for &p in image.pixels() {
        let shifted = shift_pixel(p, shade);
        if suppress && is_black_or_white(shifted) {
            continue;
        }
        population.feed(shifted);
    }
}
