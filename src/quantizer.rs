use crate::histogram::Population;
use crate::median_cut::median_cut;

/// Palette selection service.
///
/// Implementations pick up to `colors` representative entries from the
/// population. Returning fewer entries is allowed; the finalizer fills the
/// gap. Mapping pixels to indices is done by the committed
/// [`Palette`](crate::palette::Palette), not by the quantizer.
pub trait Quantizer {
    fn quantize(
        &mut self,
        population: &Population,
        colors: usize,
        high_quality: bool,
    ) -> Vec<rgb::RGBA<u8>>;
}

/// Default quantizer: weighted median cut in the population's quantizer
/// space, with k-means refinement in high quality mode.
#[derive(Debug, Clone)]
pub struct MedianCutQuantizer {
    /// k-means rounds run when `high_quality` is requested.
    pub refine_rounds: usize,
}

impl Default for MedianCutQuantizer {
    fn default() -> Self {
        Self { refine_rounds: 3 }
    }
}

impl Quantizer for MedianCutQuantizer {
    fn quantize(
        &mut self,
        population: &Population,
        colors: usize,
        high_quality: bool,
    ) -> Vec<rgb::RGBA<u8>> {
        if colors == 0 || population.is_empty() {
            return Vec::new();
        }

        let entries = population.sorted_entries();

        // Already fits: hand back the exact colors instead of round-tripping
        // them through the weighted space.
        if entries.len() <= colors {
            return entries.into_iter().map(|e| e.color).collect();
        }

        let samples = entries
            .into_iter()
            .map(|e| (e.quant, e.count as f32))
            .collect();
        let rounds = if high_quality { self.refine_rounds } else { 0 };

        median_cut(samples, colors, rounds)
            .into_iter()
            .map(|c| c.to_rgba(population.transparency()))
            .collect()
    }
}
