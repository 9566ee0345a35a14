#![forbid(unsafe_code)]

pub mod codec;
pub mod color;
pub mod error;
pub mod feed;
pub mod histogram;
pub mod image;
pub mod median_cut;
pub mod palette;
pub mod pipeline;
pub mod quantizer;
pub mod shade;
pub mod table;

pub use error::ShadeError;
pub use feed::Feeder;
pub use histogram::Population;
pub use image::PixelBuffer;
pub use palette::Palette;
pub use pipeline::{OutputOptions, RunSummary, run};
pub use quantizer::{MedianCutQuantizer, Quantizer};
pub use shade::ShadeKind;
pub use table::ShadeTable;

/// Which shade tables to generate (and which shade passes to feed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeType {
    Light,
    Dark,
    Both,
}

impl Default for ShadeType {
    fn default() -> Self {
        Self::Light
    }
}

impl ShadeType {
    pub fn includes_light(self) -> bool {
        matches!(self, Self::Light | Self::Both)
    }

    pub fn includes_dark(self) -> bool {
        matches!(self, Self::Dark | Self::Both)
    }

    /// Table kinds to render, light first.
    pub fn kinds(self) -> Vec<ShadeKind> {
        let mut kinds = Vec::with_capacity(2);
        if self.includes_light() {
            kinds.push(ShadeKind::Light);
        }
        if self.includes_dark() {
            kinds.push(ShadeKind::Dark);
        }
        kinds
    }
}

impl core::str::FromStr for ShadeType {
    type Err = core::convert::Infallible;

    /// Only the first letter counts: `d…` is dark, `b…` is both, anything
    /// else is light.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.chars().next() {
            Some('d' | 'D') => Self::Dark,
            Some('b' | 'B') => Self::Both,
            _ => Self::Light,
        })
    }
}

/// Configuration for palette and shade table generation.
#[derive(Debug, Clone)]
pub struct ShadeConfig {
    /// Palette size (2..=256), reserved entries included.
    pub colors: u32,
    /// Rows per shade table (2..=256).
    pub shades: u32,
    pub shade_type: ShadeType,
    /// Ask the quantizer for extra refinement.
    pub high_quality: bool,
    /// Force opaque black and white into the palette.
    pub reserve: bool,
    /// Extra unshifted feeds per image, biasing the palette toward the
    /// original colors.
    pub priority: u32,
    /// Precision of the quantizer space (1..=8 bits per channel).
    pub channel_bits: u32,
}

impl Default for ShadeConfig {
    fn default() -> Self {
        Self {
            colors: 256,
            shades: 64,
            shade_type: ShadeType::Light,
            high_quality: false,
            reserve: false,
            priority: 0,
            channel_bits: 8,
        }
    }
}

impl ShadeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colors(mut self, n: u32) -> Self {
        self.colors = n;
        self
    }

    pub fn shades(mut self, n: u32) -> Self {
        self.shades = n;
        self
    }

    pub fn shade_type(mut self, t: ShadeType) -> Self {
        self.shade_type = t;
        self
    }

    pub fn high_quality(mut self, hq: bool) -> Self {
        self.high_quality = hq;
        self
    }

    pub fn reserve(mut self, reserve: bool) -> Self {
        self.reserve = reserve;
        self
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn channel_bits(mut self, bits: u32) -> Self {
        self.channel_bits = bits;
        self
    }

    pub fn validate(&self) -> Result<(), ShadeError> {
        if !(2..=256).contains(&self.colors) {
            return Err(ShadeError::InvalidColors(self.colors));
        }
        if !(2..=256).contains(&self.shades) {
            return Err(ShadeError::InvalidShades(self.shades));
        }
        Ok(())
    }
}
