use std::collections::HashMap;

use crate::color::{QuantColor, channel_mask, pack, unpack};

/// A population entry: one exact RGBA color and how often it was fed.
#[derive(Debug, Clone, Copy)]
pub struct HistEntry {
    /// The color as fed (after shading).
    pub color: rgb::RGBA<u8>,
    /// Quantizer-space representation, fixed at first insertion.
    pub quant: QuantColor,
    /// Number of times this exact color was fed.
    pub count: u64,
}

/// Exact-match color histogram feeding the quantizer.
///
/// Keys are the packed 32-bit RGBA value, so distinct alpha values are
/// distinct samples.
#[derive(Debug, Clone)]
pub struct Population {
    entries: HashMap<u32, HistEntry>,
    channel_mask: u8,
    transparency: bool,
    total: u64,
}

impl Default for Population {
    fn default() -> Self {
        Self::new(8, false)
    }
}

impl Population {
    /// `channel_bits` (1..=8) limits the precision of the quantizer-space
    /// projection; `transparency` premultiplies that projection by alpha.
    pub fn new(channel_bits: u32, transparency: bool) -> Self {
        Self {
            entries: HashMap::new(),
            channel_mask: channel_mask(channel_bits),
            transparency,
            total: 0,
        }
    }

    /// Whether the quantizer space is alpha-premultiplied.
    pub fn transparency(&self) -> bool {
        self.transparency
    }

    /// Count one occurrence of `color`.
    #[inline]
    pub fn feed(&mut self, color: rgb::RGBA<u8>) {
        let mask = self.channel_mask;
        let transparency = self.transparency;
        self.entries
            .entry(pack(color))
            .and_modify(|e| e.count = e.count.saturating_add(1))
            .or_insert_with(|| HistEntry {
                color,
                quant: QuantColor::from_rgba(color, mask, transparency),
                count: 1,
            });
        self.total = self.total.saturating_add(1);
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of colors fed, duplicates included.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Occurrence count of an exact color.
    pub fn count(&self, color: rgb::RGBA<u8>) -> Option<u64> {
        self.entries.get(&pack(color)).map(|e| e.count)
    }

    /// Entries ordered by packed key, so downstream clustering does not
    /// depend on hash iteration order.
    pub fn sorted_entries(&self) -> Vec<HistEntry> {
        let mut keys: Vec<u32> = self.entries.keys().copied().collect();
        keys.sort_unstable();
        keys.into_iter().map(|k| self.entries[&k]).collect()
    }

    /// Distinct colors, ordered by packed key.
    pub fn colors(&self) -> Vec<rgb::RGBA<u8>> {
        let mut keys: Vec<u32> = self.entries.keys().copied().collect();
        keys.sort_unstable();
        keys.into_iter().map(unpack).collect()
    }
}
