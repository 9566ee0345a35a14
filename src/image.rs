use crate::error::ShadeError;

/// A row-major RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<rgb::RGBA<u8>>,
}

impl PixelBuffer {
    /// Wrap existing pixels. The length must equal `width * height`.
    pub fn new(
        pixels: Vec<rgb::RGBA<u8>>,
        width: usize,
        height: usize,
    ) -> Result<Self, ShadeError> {
        validate_dimensions(pixels.len(), width, height)?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Allocate a buffer filled with transparent black.
    ///
    /// Reports [`ShadeError::Allocation`] instead of aborting when the
    /// allocator refuses the request.
    pub fn try_alloc(width: usize, height: usize, what: &'static str) -> Result<Self, ShadeError> {
        if width == 0 || height == 0 {
            return Err(ShadeError::ZeroDimension);
        }
        let len = width
            .checked_mul(height)
            .ok_or(ShadeError::Allocation(what))?;
        let pixels = try_filled(len, rgb::RGBA { r: 0, g: 0, b: 0, a: 0 }, what)?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a buffer from loader output, premultiplying alpha into the
    /// color channels and forcing every pixel opaque.
    pub fn from_straight_alpha(
        pixels: Vec<rgb::RGBA<u8>>,
        width: usize,
        height: usize,
    ) -> Result<Self, ShadeError> {
        let mut buffer = Self::new(pixels, width, height)?;
        for p in &mut buffer.pixels {
            *p = premultiply_opaque(*p);
        }
        Ok(buffer)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[rgb::RGBA<u8>] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [rgb::RGBA<u8>] {
        &mut self.pixels
    }

    /// Pixel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get(&self, x: usize, y: usize) -> rgb::RGBA<u8> {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y * self.width + x]
    }

    /// Overwrite the pixel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set(&mut self, x: usize, y: usize, color: rgb::RGBA<u8>) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y * self.width + x] = color;
    }
}

/// Fold alpha into r, g and b (truncating) and set alpha to 255.
/// Opaque pixels are returned unchanged.
pub fn premultiply_opaque(p: rgb::RGBA<u8>) -> rgb::RGBA<u8> {
    if p.a == 255 {
        return p;
    }
    let a = p.a as f32 / 255.0;
    rgb::RGBA {
        r: (p.r as f32 * a) as u8,
        g: (p.g as f32 * a) as u8,
        b: (p.b as f32 * a) as u8,
        a: 255,
    }
}

/// A vector of `len` copies of `value`, or an allocation error.
pub(crate) fn try_filled<T: Clone>(
    len: usize,
    value: T,
    what: &'static str,
) -> Result<Vec<T>, ShadeError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| ShadeError::Allocation(what))?;
    v.resize(len, value);
    Ok(v)
}

pub(crate) fn validate_dimensions(
    pixel_count: usize,
    width: usize,
    height: usize,
) -> Result<(), ShadeError> {
    if width == 0 || height == 0 {
        return Err(ShadeError::ZeroDimension);
    }
    if width.checked_mul(height) != Some(pixel_count) {
        return Err(ShadeError::DimensionMismatch {
            len: pixel_count,
            width,
            height,
        });
    }
    Ok(())
}
