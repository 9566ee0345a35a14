//! Integration tests: real PNG files through the full pipeline, decoded back
//! with the `png` crate.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use shadetabler::{MedianCutQuantizer, OutputOptions, ShadeConfig, ShadeError, ShadeType};

/// Write an 8-bit RGBA PNG.
fn write_rgba_png(path: &Path, pixels: &[[u8; 4]], width: u32, height: u32) {
    let file = File::create(path).unwrap();
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    let data: Vec<u8> = pixels.iter().flatten().copied().collect();
    writer.write_image_data(&data).unwrap();
}

/// Write an 8-bit PNG of any non-indexed color type from raw samples.
fn write_raw_png(path: &Path, data: &[u8], color: png::ColorType, width: u32, height: u32) {
    let file = File::create(path).unwrap();
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(data).unwrap();
}

struct Indexed {
    width: u32,
    height: u32,
    palette: Vec<[u8; 3]>,
    trns: Option<Vec<u8>>,
    indices: Vec<u8>,
}

/// Read an indexed PNG without expanding the palette.
fn read_indexed_png(path: &Path) -> Indexed {
    let mut decoder = png::Decoder::new(File::open(path).unwrap());
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().unwrap();
    let info = reader.info();
    assert_eq!(info.color_type, png::ColorType::Indexed);
    assert_eq!(info.bit_depth, png::BitDepth::Eight);
    let palette = info
        .palette
        .as_ref()
        .unwrap()
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    let trns = info.trns.as_ref().map(|t| t.to_vec());

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).unwrap();
    buf.truncate(frame.buffer_size());
    Indexed {
        width: frame.width,
        height: frame.height,
        palette,
        trns,
        indices: buf,
    }
}

fn gradient(width: u32, height: u32) -> Vec<[u8; 4]> {
    let mut pixels = Vec::new();
    for y in 0..height {
        for x in 0..width {
            pixels.push([(x * 255 / width) as u8, (y * 255 / height) as u8, 64, 255]);
        }
    }
    pixels
}

fn luminance(c: [u8; 3]) -> f32 {
    0.2126 * c[0] as f32 + 0.7152 * c[1] as f32 + 0.0722 * c[2] as f32
}

#[test]
fn full_run_writes_images_and_tables() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    std::fs::create_dir_all(&input_dir).unwrap();
    std::fs::create_dir_all(&output_dir).unwrap();

    let a = input_dir.join("a.png");
    let b = input_dir.join("b.png");
    write_rgba_png(&a, &gradient(16, 16), 16, 16);
    write_rgba_png(&b, &[[200, 40, 40, 255]; 12], 4, 3);

    let config = ShadeConfig::new()
        .colors(32)
        .shades(8)
        .shade_type(ShadeType::Both)
        .reserve(true);
    let output = OutputOptions::new(&output_dir);
    let summary = shadetabler::run(
        &config,
        &[a.clone(), b.clone()],
        &output,
        &mut MedianCutQuantizer::default(),
        |_| panic!("nothing to overwrite"),
    )
    .unwrap();

    assert_eq!(summary.written.len(), 4);
    assert!(summary.skipped.is_empty());

    let img_a = read_indexed_png(&output_dir.join("a.png"));
    assert_eq!((img_a.width, img_a.height), (16, 16));
    assert_eq!(img_a.palette.len(), 32);
    assert!(img_a.trns.is_none());
    assert!(img_a.indices.iter().all(|&i| (i as usize) < 32));

    // Sorted by luminance, reserved black first and white last.
    assert_eq!(img_a.palette[0], [0, 0, 0]);
    assert_eq!(img_a.palette[31], [255, 255, 255]);
    for w in img_a.palette.windows(2) {
        assert!(luminance(w[0]) <= luminance(w[1]));
    }

    let img_b = read_indexed_png(&output_dir.join("b.png"));
    assert_eq!((img_b.width, img_b.height), (4, 3));
    assert!(img_b.indices.iter().all(|&i| i == img_b.indices[0]));

    let light = read_indexed_png(&output_dir.join("shadetable_light.png"));
    assert_eq!((light.width, light.height), (32, 8));
    assert_eq!(light.palette, img_a.palette);
    // Row 0 is the palette itself; the last row is all white.
    for x in 0..32 {
        assert_eq!(light.palette[light.indices[x] as usize], light.palette[x]);
        assert_eq!(light.indices[7 * 32 + x], 31);
    }

    let dark = read_indexed_png(&output_dir.join("shadetable_dark.png"));
    assert_eq!((dark.width, dark.height), (32, 8));
    for x in 0..32 {
        assert_eq!(dark.indices[x], 0);
        assert_eq!(dark.palette[dark.indices[7 * 32 + x] as usize], dark.palette[x]);
    }
}

#[test]
fn translucent_input_is_premultiplied() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("t.png");
    write_rgba_png(&input, &[[200, 100, 50, 128], [200, 100, 50, 0]], 2, 1);

    let image = shadetabler::codec::load_rgba(&input).unwrap();
    assert_eq!(image.get(0, 0), rgb::RGBA { r: 100, g: 50, b: 25, a: 255 });
    assert_eq!(image.get(1, 0), rgb::RGBA { r: 0, g: 0, b: 0, a: 255 });
}

#[test]
fn declined_overwrite_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let out_dir = dir.path().join("out");
    std::fs::create_dir_all(&out_dir).unwrap();
    write_rgba_png(&input, &gradient(4, 4), 4, 4);

    let existing = out_dir.join("in.png");
    std::fs::write(&existing, b"keep me").unwrap();

    let mut asked: Vec<PathBuf> = Vec::new();
    let summary = shadetabler::run(
        &ShadeConfig::new().colors(8).shades(4),
        &[input],
        &OutputOptions::new(&out_dir),
        &mut MedianCutQuantizer::default(),
        |p| {
            asked.push(p.to_path_buf());
            false
        },
    )
    .unwrap();

    assert_eq!(asked, vec![existing.clone()]);
    assert_eq!(summary.skipped, vec![existing.clone()]);
    assert_eq!(summary.written, vec![out_dir.join("shadetable_light.png")]);
    assert_eq!(std::fs::read(&existing).unwrap(), b"keep me");
}

#[test]
fn forced_overwrite_replaces_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let out_dir = dir.path().join("out");
    std::fs::create_dir_all(&out_dir).unwrap();
    write_rgba_png(&input, &gradient(4, 4), 4, 4);
    std::fs::write(out_dir.join("in.png"), b"stale").unwrap();

    let summary = shadetabler::run(
        &ShadeConfig::new().colors(4).shades(2).shade_type(ShadeType::Dark),
        &[input],
        &OutputOptions::new(&out_dir).dark_name("dark.png").force(true),
        &mut MedianCutQuantizer::default(),
        |_| panic!("force must not prompt"),
    )
    .unwrap();

    assert_eq!(summary.written.len(), 2);
    let img = read_indexed_png(&out_dir.join("in.png"));
    assert_eq!(img.palette.len(), 4);
    let dark = read_indexed_png(&out_dir.join("dark.png"));
    assert_eq!((dark.width, dark.height), (4, 2));
}

#[test]
fn missing_input_aborts_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.png");
    write_rgba_png(&good, &gradient(4, 4), 4, 4);
    let out_dir = dir.path().join("out");
    std::fs::create_dir_all(&out_dir).unwrap();

    let err = shadetabler::run(
        &ShadeConfig::default(),
        &[good, dir.path().join("missing.png")],
        &OutputOptions::new(&out_dir),
        &mut MedianCutQuantizer::default(),
        |_| true,
    )
    .unwrap_err();

    assert!(matches!(err, ShadeError::Open { .. }));
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 0);
}

#[test]
fn garbage_input_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.png");
    std::fs::write(&bad, b"definitely not a png").unwrap();

    let err = shadetabler::codec::load_rgba(&bad).unwrap_err();
    assert!(matches!(err, ShadeError::Decode { .. }));
}

#[test]
fn every_channel_layout_loads() {
    let dir = tempfile::tempdir().unwrap();
    let cases: [(&str, png::ColorType, &[u8], [u8; 4]); 3] = [
        ("rgb.png", png::ColorType::Rgb, &[10, 20, 30, 40, 50, 60], [10, 20, 30, 255]),
        ("gray.png", png::ColorType::Grayscale, &[77, 88], [77, 77, 77, 255]),
        ("graya.png", png::ColorType::GrayscaleAlpha, &[200, 0, 100, 255], [0, 0, 0, 255]),
    ];
    for (name, color, data, first) in cases {
        let path = dir.path().join(name);
        write_raw_png(&path, data, color, 2, 1);
        let image = shadetabler::codec::load_rgba(&path).unwrap();
        assert_eq!((image.width(), image.height()), (2, 1), "{name}");
        let [r, g, b, a] = first;
        assert_eq!(image.get(0, 0), rgb::RGBA { r, g, b, a }, "{name}");
    }
}
