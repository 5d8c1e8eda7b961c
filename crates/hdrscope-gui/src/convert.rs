use hdrscope_core::raster::{ChannelMode, Raster};

/// Compose a raster under the given channel mode and convert it to an egui
/// ColorImage for texture upload.
pub fn raster_to_color_image(raster: &Raster, mode: ChannelMode) -> egui::ColorImage {
    let rgba = raster.composed(mode);
    egui::ColorImage::from_rgba_unmultiplied(
        [raster.width as usize, raster.height as usize],
        &rgba,
    )
}
