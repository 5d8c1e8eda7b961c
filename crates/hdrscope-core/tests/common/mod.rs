use std::sync::Mutex;

use hdrscope_core::command::{
    EngineBridge, EngineRequest, EngineResponse, PixelSample, RasterBlob,
};
use hdrscope_core::error::Result;
use hdrscope_core::scope::{RawWaveform, ScopeStats};

/// Engine bridge stub: answers from the supplied handler and records the
/// name of every command it receives.
pub struct StubBridge {
    calls: Mutex<Vec<String>>,
    handler: Box<dyn Fn(&EngineRequest) -> Result<EngineResponse> + Send + Sync>,
}

impl StubBridge {
    pub fn new(
        handler: impl Fn(&EngineRequest) -> Result<EngineResponse> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            handler: Box::new(handler),
        }
    }

    /// Command names in invocation order.
    pub fn call_names(&self) -> Vec<String> {
        self.calls.lock().expect("call log poisoned").clone()
    }
}

impl EngineBridge for StubBridge {
    fn invoke(&self, request: EngineRequest) -> Result<EngineResponse> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(request.name().to_owned());
        (self.handler)(&request)
    }
}

/// A PNG-encoded raster blob of one solid color, as the engine would return.
pub fn png_blob(width: u32, height: u32, rgba: [u8; 4]) -> RasterBlob {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut data = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut data), image::ImageFormat::Png)
        .expect("encode test png");
    RasterBlob {
        width,
        height,
        data,
    }
}

/// 256-bin stats with a single populated bin per channel.
pub fn stats_with_peaks(r: (usize, u32), g: (usize, u32), b: (usize, u32)) -> ScopeStats {
    let mut stats = ScopeStats {
        hist_r: vec![0; 256],
        hist_g: vec![0; 256],
        hist_b: vec![0; 256],
    };
    stats.hist_r[r.0] = r.1;
    stats.hist_g[g.0] = g.1;
    stats.hist_b[b.0] = b.1;
    stats
}

/// An x×y waveform whose counts are all `fill`.
pub fn waveform_filled(x_bins: usize, y_bins: usize, fill: u32) -> RawWaveform {
    RawWaveform {
        x_bins,
        y_bins,
        r: vec![fill; x_bins * y_bins],
        g: vec![fill; x_bins * y_bins],
        b: vec![fill; x_bins * y_bins],
    }
}

/// Happy-path handler covering every preview-related command.
pub fn preview_happy_path(request: &EngineRequest) -> Result<EngineResponse> {
    match request {
        EngineRequest::OpenImage(_) => Ok(EngineResponse::Raster(png_blob(4, 4, [10, 20, 30, 255]))),
        EngineRequest::UpdatePreview(_) => {
            Ok(EngineResponse::Raster(png_blob(4, 4, [40, 50, 60, 255])))
        }
        EngineRequest::ImageStats => Ok(EngineResponse::Stats(stats_with_peaks(
            (128, 500),
            (64, 250),
            (32, 125),
        ))),
        EngineRequest::ImageWaveform => Ok(EngineResponse::Waveform(waveform_filled(4, 4, 3))),
        EngineRequest::ProbePixel { .. } => Ok(EngineResponse::Pixel(PixelSample {
            r: 0.25,
            g: 0.5,
            b: 0.75,
            a: 1.0,
        })),
        _ => Ok(EngineResponse::Ack),
    }
}
