use rayon::prelude::*;

use crate::command::RasterBlob;
use crate::error::{HdrscopeError, Result};

/// Channel selection applied when composing a raster for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelMode {
    #[default]
    Rgb,
    Alpha,
}

impl ChannelMode {
    pub fn label(&self) -> &'static str {
        match self {
            ChannelMode::Rgb => "RGB",
            ChannelMode::Alpha => "Alpha",
        }
    }
}

/// One decoded RGBA8 preview frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    /// Interleaved RGBA, row-major, length `width * height * 4`.
    pub rgba: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        if rgba.len() != (width as usize) * (height as usize) * 4 {
            return Err(HdrscopeError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Decode an engine raster blob (PNG-encoded RGBA). The decoded
    /// dimensions are authoritative over the blob's advertised ones.
    pub fn decode(blob: &RasterBlob) -> Result<Self> {
        let decoded = image::load_from_memory(&blob.data)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        Ok(Self {
            width,
            height,
            rgba: decoded.into_raw(),
        })
    }

    /// Pixel buffer composed for display under `mode`.
    ///
    /// Alpha mode visualizes coverage as opaque grayscale: each pixel's RGB
    /// becomes its alpha value and alpha is forced to 255.
    pub fn composed(&self, mode: ChannelMode) -> Vec<u8> {
        match mode {
            ChannelMode::Rgb => self.rgba.clone(),
            ChannelMode::Alpha => {
                let mut out = self.rgba.clone();
                out.par_chunks_exact_mut(4).for_each(|px| {
                    let a = px[3];
                    px[0] = a;
                    px[1] = a;
                    px[2] = a;
                    px[3] = 255;
                });
                out
            }
        }
    }
}
