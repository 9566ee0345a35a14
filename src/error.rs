use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShadeError {
    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("number of colors must be between 2 and 256, got {0}")]
    InvalidColors(u32),

    #[error("number of shades must be between 2 and 256, got {0}")]
    InvalidShades(u32),

    #[error("unable to allocate memory for {0}")]
    Allocation(&'static str),

    #[error("no input file specified")]
    NoInputs,

    #[error("could not load input file \"{}\": unable to open input file", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not load input file \"{}\": {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: png::DecodingError,
    },

    #[error("unsupported pixel format {color_type:?} in \"{}\"", path.display())]
    UnsupportedFormat {
        path: PathBuf,
        color_type: png::ColorType,
    },

    #[error("can't encode image \"{}\": {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },

    #[error("unable to write to \"{}\"", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
