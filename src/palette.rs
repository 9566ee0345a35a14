use std::collections::HashMap;

use log::{debug, info};

use crate::color::{BLACK, QuantColor, WHITE, luminance, pack};
use crate::error::ShadeError;
use crate::histogram::Population;
use crate::median_cut::nearest_index;
use crate::quantizer::Quantizer;

/// Filler for slots the quantizer could not populate.
const EMPTY_SLOT: rgb::RGBA<u8> = rgb::RGBA {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
};

const NEAR_BLACK: rgb::RGBA<u8> = rgb::RGBA {
    r: 1,
    g: 1,
    b: 1,
    a: 255,
};

const NEAR_WHITE: rgb::RGBA<u8> = rgb::RGBA {
    r: 254,
    g: 254,
    b: 254,
    a: 255,
};

/// A finalized, committed palette.
///
/// Entries are in ascending luminance order. Every pixel mapping goes through
/// [`Palette::nearest`], so mapped indices always refer to these exact
/// entries.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<rgb::RGBA<u8>>,
    quant: Vec<QuantColor>,
    transparency: bool,
}

impl Palette {
    /// Run the quantizer over a finished population and commit the result.
    ///
    /// With `reserve`, two slots are kept for opaque black and white.
    /// The population is consumed: nothing can be fed after finalizing.
    pub fn finalize<Q: Quantizer + ?Sized>(
        population: Population,
        quantizer: &mut Q,
        colors: u32,
        reserve: bool,
        high_quality: bool,
    ) -> Result<Self, ShadeError> {
        if !(2..=256).contains(&colors) {
            return Err(ShadeError::InvalidColors(colors));
        }
        let colors = colors as usize;
        let requested = if reserve { colors - 2 } else { colors };

        info!(
            "Quantizing {} distinct colors{}",
            population.len(),
            if high_quality { ", high quality" } else { "" }
        );
        debug!("requesting {requested} colors from quantizer");

        let mut entries = Vec::new();
        entries
            .try_reserve_exact(colors)
            .map_err(|_| ShadeError::Allocation("palette"))?;
        entries.extend(
            quantizer
                .quantize(&population, requested, high_quality)
                .into_iter()
                .take(requested),
        );
        if entries.len() < requested {
            debug!(
                "quantizer returned {} of {requested} colors, padding",
                entries.len()
            );
            entries.resize(requested, EMPTY_SLOT);
        }

        if reserve {
            // The forced entries must stay unique.
            for c in entries.iter_mut() {
                if *c == BLACK {
                    *c = NEAR_BLACK;
                } else if *c == WHITE {
                    *c = NEAR_WHITE;
                }
            }
            entries.push(BLACK);
            entries.push(WHITE);
        }

        info!("Generating & sorting palette");
        sort_by_luminance(&mut entries);

        Self::from_entries(entries, population.transparency())
    }

    /// Commit an externally decided palette as-is.
    ///
    /// Indices are stored as `u8`, so the palette must hold 2 to 256 entries.
    pub fn from_entries(
        entries: Vec<rgb::RGBA<u8>>,
        transparency: bool,
    ) -> Result<Self, ShadeError> {
        if !(2..=256).contains(&entries.len()) {
            return Err(ShadeError::InvalidColors(
                u32::try_from(entries.len()).unwrap_or(u32::MAX),
            ));
        }
        let quant = entries
            .iter()
            .map(|&c| QuantColor::from_rgba(c, 0xff, transparency))
            .collect();
        Ok(Self {
            entries,
            quant,
            transparency,
        })
    }

    pub fn entries(&self) -> &[rgb::RGBA<u8>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the nearest entry in quantizer space.
    pub fn nearest(&self, color: rgb::RGBA<u8>) -> u8 {
        let q = QuantColor::from_rgba(color, 0xff, self.transparency);
        nearest_index(&self.quant, q) as u8
    }

    /// Map pixels to palette indices. Repeated colors are looked up once.
    pub fn map_pixels(&self, pixels: &[rgb::RGBA<u8>]) -> Result<Vec<u8>, ShadeError> {
        let mut indices = Vec::new();
        indices
            .try_reserve_exact(pixels.len())
            .map_err(|_| ShadeError::Allocation("index buffer"))?;

        let mut cache: HashMap<u32, u8> = HashMap::new();
        for &p in pixels {
            let idx = *cache.entry(pack(p)).or_insert_with(|| self.nearest(p));
            indices.push(idx);
        }
        Ok(indices)
    }

    /// Palette as packed RGB triples, for a PLTE chunk.
    pub fn rgb_bytes(&self) -> Vec<u8> {
        self.entries.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
    }

    /// Alpha values for a tRNS chunk, truncated after the last non-opaque
    /// entry. `None` when every entry is opaque.
    pub fn alpha_table(&self) -> Option<Vec<u8>> {
        let last_non_opaque = self.entries.iter().rposition(|c| c.a != 255)?;
        Some(self.entries[..=last_non_opaque].iter().map(|c| c.a).collect())
    }
}

/// Sort ascending by [`luminance`]. Equal luminance has no defined order.
pub fn sort_by_luminance(entries: &mut [rgb::RGBA<u8>]) {
    entries.sort_unstable_by(|a, b| {
        luminance(*a)
            .partial_cmp(&luminance(*b))
            .unwrap_or(core::cmp::Ordering::Equal)
    });
}
