//! End-to-end run: load and feed every input, finalize the palette, write
//! the remapped inputs and the requested shade tables.

use std::path::{Path, PathBuf};

use log::info;

use crate::codec::{load_rgba, output_path, write_indexed_png};
use crate::error::ShadeError;
use crate::feed::Feeder;
use crate::image::PixelBuffer;
use crate::palette::Palette;
use crate::quantizer::Quantizer;
use crate::shade::ShadeKind;
use crate::table::ShadeTable;
use crate::ShadeConfig;

/// Where and how outputs are written.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub dir: PathBuf,
    pub light_name: String,
    pub dark_name: String,
    /// Overwrite existing files without asking.
    pub force: bool,
}

impl OutputOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            light_name: "shadetable_light.png".to_string(),
            dark_name: "shadetable_dark.png".to_string(),
            force: false,
        }
    }

    pub fn light_name(mut self, name: impl Into<String>) -> Self {
        self.light_name = name.into();
        self
    }

    pub fn dark_name(mut self, name: impl Into<String>) -> Self {
        self.dark_name = name.into();
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn table_path(&self, kind: ShadeKind) -> PathBuf {
        let name = match kind {
            ShadeKind::Light => &self.light_name,
            ShadeKind::Dark => &self.dark_name,
        };
        output_path(&self.dir, Path::new(name))
    }
}

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub palette: Palette,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Generate the palette, remapped images and shade tables.
///
/// `confirm_overwrite` is asked about every existing target unless
/// `output.force` is set; a `false` answer skips that file. All inputs are
/// loaded before anything is written, so a bad input leaves no output.
pub fn run<Q, F>(
    config: &ShadeConfig,
    inputs: &[PathBuf],
    output: &OutputOptions,
    quantizer: &mut Q,
    mut confirm_overwrite: F,
) -> Result<RunSummary, ShadeError>
where
    Q: Quantizer + ?Sized,
    F: FnMut(&Path) -> bool,
{
    if inputs.is_empty() {
        return Err(ShadeError::NoInputs);
    }

    let mut feeder = Feeder::new(config)?;
    let mut images: Vec<PixelBuffer> = Vec::with_capacity(inputs.len());
    for path in inputs {
        let image = load_rgba(path)?;
        feeder.feed_image(&image, &path.display().to_string());
        images.push(image);
    }

    let palette = feeder.finalize(quantizer)?;

    let mut summary = RunSummary {
        palette,
        written: Vec::new(),
        skipped: Vec::new(),
    };

    for (input, image) in inputs.iter().zip(images) {
        let target = output_path(&output.dir, input);
        if !may_write(&target, output.force, &mut confirm_overwrite) {
            info!("Skipping image \"{}\"", target.display());
            summary.skipped.push(target);
            continue;
        }
        let indices = summary.palette.map_pixels(image.pixels())?;
        info!("Saving image \"{}\"", target.display());
        write_indexed_png(&target, &indices, image.width(), image.height(), &summary.palette)?;
        summary.written.push(target);
    }

    for kind in config.shade_type.kinds() {
        let target = output.table_path(kind);
        if !may_write(&target, output.force, &mut confirm_overwrite) {
            info!("Skipping image \"{}\"", target.display());
            summary.skipped.push(target);
            continue;
        }
        let table = ShadeTable::synthesize(&summary.palette, config.shades, kind)?;
        info!("Saving image \"{}\"", target.display());
        write_indexed_png(
            &target,
            table.indices(),
            table.width(),
            table.height(),
            &summary.palette,
        )?;
        summary.written.push(target);
    }

    Ok(summary)
}

fn may_write<F: FnMut(&Path) -> bool>(target: &Path, force: bool, confirm: &mut F) -> bool {
    force || !target.exists() || confirm(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_paths_under_output_dir() {
        let out = OutputOptions::new("out").dark_name("d.png");
        assert_eq!(out.table_path(ShadeKind::Light), PathBuf::from("out/shadetable_light.png"));
        assert_eq!(out.table_path(ShadeKind::Dark), PathBuf::from("out/d.png"));
    }

    #[test]
    fn no_inputs_is_an_error() {
        let mut q = crate::MedianCutQuantizer::default();
        let err = run(&ShadeConfig::default(), &[], &OutputOptions::new("out"), &mut q, |_| true)
            .unwrap_err();
        assert!(matches!(err, ShadeError::NoInputs));
    }

    #[test]
    fn force_skips_confirmation() {
        let mut asked = 0;
        let mut confirm = |_: &Path| {
            asked += 1;
            false
        };
        assert!(may_write(Path::new("Cargo.toml"), true, &mut confirm));
        assert!(!may_write(Path::new("Cargo.toml"), false, &mut confirm));
        assert!(may_write(Path::new("does-not-exist.png"), false, &mut confirm));
        assert_eq!(asked, 1);
    }
}
