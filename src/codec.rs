//! PNG input and indexed PNG output.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ShadeError;
use crate::image::{PixelBuffer, try_filled};
use crate::palette::Palette;

/// Load a PNG as an opaque, alpha-premultiplied RGBA8 buffer.
///
/// Palette, grayscale and 16-bit images are expanded to 8-bit channels.
pub fn load_rgba(path: &Path) -> Result<PixelBuffer, ShadeError> {
    let file = File::open(path).map_err(|source| ShadeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decode_err = |source| ShadeError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().map_err(decode_err)?;

    let mut buf = try_filled(reader.output_buffer_size(), 0u8, "image")?;
    let frame = reader.next_frame(&mut buf).map_err(decode_err)?;
    buf.truncate(frame.buffer_size());

    let (w, h) = (frame.width as usize, frame.height as usize);
    let channels = match frame.color_type {
        png::ColorType::Rgba => 4,
        png::ColorType::Rgb => 3,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Grayscale => 1,
        other => {
            return Err(ShadeError::UnsupportedFormat {
                path: path.to_path_buf(),
                color_type: other,
            });
        }
    };

    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(buf.len() / channels)
        .map_err(|_| ShadeError::Allocation("image"))?;
    pixels.extend(buf.chunks_exact(channels).map(|c| match *c {
        [r, g, b, a] => rgb::RGBA { r, g, b, a },
        [r, g, b] => rgb::RGBA { r, g, b, a: 255 },
        [v, a] => rgb::RGBA { r: v, g: v, b: v, a },
        _ => rgb::RGBA {
            r: c[0],
            g: c[0],
            b: c[0],
            a: 255,
        },
    }));

    PixelBuffer::from_straight_alpha(pixels, w, h)
}

/// Write an 8-bit palette PNG.
///
/// Scanlines are stored unfiltered. A tRNS chunk is added only when some
/// palette entry is not fully opaque.
pub fn write_indexed_png(
    path: &Path,
    indices: &[u8],
    width: usize,
    height: usize,
    palette: &Palette,
) -> Result<(), ShadeError> {
    crate::image::validate_dimensions(indices.len(), width, height)?;

    let encode_err = |source| ShadeError::Encode {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|source| ShadeError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);

    {
        let mut encoder = png::Encoder::new(&mut out, width as u32, height as u32);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_filter(png::FilterType::NoFilter);
        encoder.set_palette(palette.rgb_bytes());
        if let Some(trns) = palette.alpha_table() {
            encoder.set_trns(trns);
        }

        let mut writer = encoder.write_header().map_err(encode_err)?;
        writer.write_image_data(indices).map_err(encode_err)?;
        writer.finish().map_err(encode_err)?;
    }

    out.flush().map_err(|source| ShadeError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// `<output_dir>/<file name of input>`.
pub fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    match input.file_name() {
        Some(name) => output_dir.join(name),
        None => output_dir.join(input),
    }
}
