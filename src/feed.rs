use log::{debug, info};

use crate::error::ShadeError;
use crate::histogram::Population;
use crate::image::PixelBuffer;
use crate::palette::Palette;
use crate::quantizer::Quantizer;
use crate::shade::{dark_feed_offsets, light_feed_offsets, sample};
use crate::ShadeConfig;

/// Feed phase: owns the population until the palette is finalized.
#[derive(Debug)]
pub struct Feeder {
    config: ShadeConfig,
    population: Population,
    light_offsets: Vec<i32>,
    dark_offsets: Vec<i32>,
}

impl Feeder {
    pub fn new(config: &ShadeConfig) -> Result<Self, ShadeError> {
        config.validate()?;
        let light_offsets = if config.shade_type.includes_light() {
            light_feed_offsets(config.shades)
        } else {
            Vec::new()
        };
        let dark_offsets = if config.shade_type.includes_dark() {
            dark_feed_offsets(config.shades)
        } else {
            Vec::new()
        };
        Ok(Self {
            config: config.clone(),
            population: Population::new(config.channel_bits, false),
            light_offsets,
            dark_offsets,
        })
    }

    /// Feed one image: priority repeats, then light shades, then dark shades.
    pub fn feed_image(&mut self, image: &PixelBuffer, name: &str) {
        let reserve = self.config.reserve;

        info!("Generating priority colors for input file \"{name}\"");
        for _ in 0..self.config.priority {
            sample(&mut self.population, image, 0, reserve);
        }

        if !self.light_offsets.is_empty() {
            info!("Generating light shades for input file \"{name}\"");
            for &shade in &self.light_offsets {
                sample(&mut self.population, image, shade, reserve);
            }
        }

        if !self.dark_offsets.is_empty() {
            info!("Generating dark shades for input file \"{name}\"");
            for &shade in &self.dark_offsets {
                sample(&mut self.population, image, shade, reserve);
            }
        }

        debug!(
            "population now {} distinct colors from {} samples",
            self.population.len(),
            self.population.total()
        );
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// End the feed phase and produce the committed palette.
    pub fn finalize<Q: Quantizer + ?Sized>(self, quantizer: &mut Q) -> Result<Palette, ShadeError> {
        Palette::finalize(
            self.population,
            quantizer,
            self.config.colors,
            self.config.reserve,
            self.config.high_quality,
        )
    }
}
