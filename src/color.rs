/// Per-channel weights of the quantizer space.
///
/// Green carries the most perceived brightness and blue the least, so the
/// space is stretched along green and squeezed along blue before distances
/// are measured.
pub const SCALE_R: f32 = 1.0;
pub const SCALE_G: f32 = 1.2;
pub const SCALE_B: f32 = 0.8;
pub const SCALE_A: f32 = 1.0;

/// Opaque black, forced into reserved palettes.
pub const BLACK: rgb::RGBA<u8> = rgb::RGBA {
    r: 0,
    g: 0,
    b: 0,
    a: 255,
};

/// Opaque white, forced into reserved palettes.
pub const WHITE: rgb::RGBA<u8> = rgb::RGBA {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};

/// A color in the weighted quantizer space.
///
/// Channels are normalized to [0, 1] and multiplied by the `SCALE_*` weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl QuantColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Project an 8-bit color into quantizer space.
    ///
    /// `channel_mask` is applied to r, g and b before normalizing. With
    /// `transparency` the color channels are premultiplied by alpha.
    pub fn from_rgba(color: rgb::RGBA<u8>, channel_mask: u8, transparency: bool) -> Self {
        let r = color.r & channel_mask;
        let g = color.g & channel_mask;
        let b = color.b & channel_mask;

        let mut q = Self {
            r: r as f32 / 255.0 * SCALE_R,
            g: g as f32 / 255.0 * SCALE_G,
            b: b as f32 / 255.0 * SCALE_B,
            a: color.a as f32 / 255.0 * SCALE_A,
        };

        if transparency {
            q.r *= q.a;
            q.g *= q.a;
            q.b *= q.a;
        }

        q
    }

    /// Back to 8-bit channels, undoing the weights (and the alpha
    /// premultiplication when `transparency` is set).
    pub fn to_rgba(self, transparency: bool) -> rgb::RGBA<u8> {
        let (mut r, mut g, mut b) = (self.r, self.g, self.b);
        let a = self.a;

        if transparency && a > 1e-6 {
            r /= a;
            g /= a;
            b /= a;
        }

        rgb::RGBA {
            r: unit_to_u8(r / SCALE_R),
            g: unit_to_u8(g / SCALE_G),
            b: unit_to_u8(b / SCALE_B),
            a: unit_to_u8(a / SCALE_A),
        }
    }

    /// Squared Euclidean distance in quantizer space.
    pub fn distance_sq(self, other: Self) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        let da = self.a - other.a;
        dr * dr + dg * dg + db * db + da * da
    }
}

#[inline]
fn unit_to_u8(v: f32) -> u8 {
    (v * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

/// Mask keeping the top `bits` of an 8-bit channel.
pub fn channel_mask(bits: u32) -> u8 {
    let bits = bits.clamp(1, 8);
    (0xff00u16 >> bits) as u8
}

/// Pack a color into the 32-bit population key (r in the low byte).
#[inline]
pub fn pack(color: rgb::RGBA<u8>) -> u32 {
    color.r as u32 | (color.g as u32) << 8 | (color.b as u32) << 16 | (color.a as u32) << 24
}

#[inline]
pub fn unpack(key: u32) -> rgb::RGBA<u8> {
    rgb::RGBA {
        r: key as u8,
        g: (key >> 8) as u8,
        b: (key >> 16) as u8,
        a: (key >> 24) as u8,
    }
}

/// Rec. 709 relative luminance on raw 8-bit channels.
#[inline]
pub fn luminance(color: rgb::RGBA<u8>) -> f32 {
    0.2126 * color.r as f32 + 0.7152 * color.g as f32 + 0.0722 * color.b as f32
}

/// Add `shade` to a channel, clamped to [0, 255].
#[inline]
pub fn shift_channel(c: u8, shade: i32) -> u8 {
    (c as i32 + shade).clamp(0, 255) as u8
}

/// Shift r, g and b by `shade`. Alpha is left untouched.
#[inline]
pub fn shift_pixel(color: rgb::RGBA<u8>, shade: i32) -> rgb::RGBA<u8> {
    rgb::RGBA {
        r: shift_channel(color.r, shade),
        g: shift_channel(color.g, shade),
        b: shift_channel(color.b, shade),
        a: color.a,
    }
}

#[inline]
pub fn is_black_or_white(color: rgb::RGBA<u8>) -> bool {
    (color.r == 0 && color.g == 0 && color.b == 0)
        || (color.r == 255 && color.g == 255 && color.b == 255)
}
