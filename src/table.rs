use log::debug;

use crate::color::shift_channel;
use crate::error::ShadeError;
use crate::image::PixelBuffer;
use crate::palette::Palette;
use crate::shade::{ShadeKind, table_row_offset};

/// A shade table: one column per palette entry, one row per shade level.
///
/// Row 0 of a light table is the palette itself and the last row is white;
/// a dark table runs from black up to the palette.
#[derive(Debug, Clone)]
pub struct ShadeTable {
    kind: ShadeKind,
    rgba: PixelBuffer,
    indices: Vec<u8>,
}

impl ShadeTable {
    /// Build the RGBA grid for `palette` and map it back onto the palette.
    pub fn synthesize(palette: &Palette, shades: u32, kind: ShadeKind) -> Result<Self, ShadeError> {
        if !(2..=256).contains(&shades) {
            return Err(ShadeError::InvalidShades(shades));
        }
        let rgba = render_grid(palette, shades, kind)?;
        let indices = palette.map_pixels(rgba.pixels())?;
        debug!(
            "{kind:?} shade table {}x{} synthesized",
            rgba.width(),
            rgba.height()
        );
        Ok(Self {
            kind,
            rgba,
            indices,
        })
    }

    pub fn kind(&self) -> ShadeKind {
        self.kind
    }

    /// Number of columns (the palette size).
    pub fn width(&self) -> usize {
        self.rgba.width()
    }

    /// Number of rows (the shade count).
    pub fn height(&self) -> usize {
        self.rgba.height()
    }

    /// The unmapped shifted colors.
    pub fn rgba(&self) -> &PixelBuffer {
        &self.rgba
    }

    /// Palette index per cell, row-major.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Palette index of column `x` at shade row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x` is not a palette column or `y` not a shade row.
    pub fn index_at(&self, x: usize, y: usize) -> u8 {
        assert!(
            x < self.width() && y < self.height(),
            "cell ({x}, {y}) out of bounds"
        );
        self.indices[y * self.width() + x]
    }
}

fn render_grid(palette: &Palette, shades: u32, kind: ShadeKind) -> Result<PixelBuffer, ShadeError> {
    let mut grid = PixelBuffer::try_alloc(palette.len(), shades as usize, "shadetable")?;

    for y in 0..shades {
        let shade = table_row_offset(y, shades, kind);
        for (x, c) in palette.entries().iter().enumerate() {
            grid.set(
                x,
                y as usize,
                rgb::RGBA {
                    r: shift_channel(c.r, shade),
                    g: shift_channel(c.g, shade),
                    b: shift_channel(c.b, shade),
                    a: 255,
                },
            );
        }
    }

    Ok(grid)
}
