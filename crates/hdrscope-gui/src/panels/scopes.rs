use hdrscope_core::consts::STATS_BINS;
use hdrscope_core::scope::{
    histogram_heights, waveform_cells, Channel, ChannelFilter, ScopeStats, ScopeViewConfig,
    WaveformStats,
};

use crate::app::HdrscopeApp;

const SCOPE_HEIGHT: f32 = 120.0;

pub fn show(ctx: &egui::Context, app: &mut HdrscopeApp) {
    egui::SidePanel::right("scopes")
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading("Scopes");

            let mut changed = false;
            ui.horizontal(|ui| {
                let filter = &mut app.config.scope.channel_filter;
                for candidate in [
                    ChannelFilter::Rgb,
                    ChannelFilter::R,
                    ChannelFilter::G,
                    ChannelFilter::B,
                ] {
                    changed |= ui
                        .selectable_value(filter, candidate, candidate.label())
                        .changed();
                }
            });
            changed |= ui
                .add(egui::Slider::new(&mut app.config.scope.scale, 1.0..=10.0).text("Scale"))
                .changed();
            if changed {
                // View changes re-render from cached stats; persisted, no
                // engine round-trip
                app.config.save();
            }

            ui.add_space(6.0);
            ui.label("Histogram");
            draw_histogram(ui, app.scopes.stats.as_ref(), app.config.scope);

            ui.add_space(6.0);
            ui.label("Waveform");
            draw_waveform(ui, app.scopes.waveform.as_ref(), app.config.scope);
        });
}

fn channel_color(channel: Channel) -> egui::Color32 {
    match channel {
        Channel::R => egui::Color32::from_rgba_unmultiplied(255, 64, 64, 180),
        Channel::G => egui::Color32::from_rgba_unmultiplied(64, 255, 64, 180),
        Channel::B => egui::Color32::from_rgba_unmultiplied(64, 128, 255, 180),
    }
}

fn scope_canvas(ui: &mut egui::Ui) -> (egui::Rect, egui::Painter) {
    let width = ui.available_width().max(STATS_BINS as f32);
    let (rect, _response) =
        ui.allocate_exact_size(egui::vec2(width, SCOPE_HEIGHT), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    // Full clear; draws never accumulate across frames
    painter.rect_filled(rect, 2.0, egui::Color32::from_gray(20));
    (rect, painter)
}

fn draw_histogram(ui: &mut egui::Ui, stats: Option<&ScopeStats>, view: ScopeViewConfig) {
    let (rect, painter) = scope_canvas(ui);
    let Some(stats) = stats else {
        return;
    };

    // Normalize against the largest bin across the rendered channels,
    // recomputed on every draw
    let max_bin = stats.max_bin(view.channel_filter);
    let bin_width = rect.width() / STATS_BINS as f32;

    for &channel in view.channel_filter.channels() {
        if !stats.is_drawable(channel) {
            continue;
        }
        let color = channel_color(channel);
        let heights = histogram_heights(stats.histogram(channel), max_bin, view.scale);
        for (bin, &height) in heights.iter().enumerate() {
            if height <= 0.0 {
                continue;
            }
            let x = rect.left() + (bin as f32 + 0.5) * bin_width;
            painter.line_segment(
                [
                    egui::pos2(x, rect.bottom()),
                    egui::pos2(x, rect.bottom() - height * rect.height()),
                ],
                egui::Stroke::new(bin_width.max(1.0), color),
            );
        }
    }
}

fn draw_waveform(ui: &mut egui::Ui, waveform: Option<&WaveformStats>, view: ScopeViewConfig) {
    let (rect, painter) = scope_canvas(ui);
    let Some(waveform) = waveform else {
        return;
    };
    if waveform.x_bins == 0 || waveform.y_bins == 0 {
        return;
    }

    let cell_w = rect.width() / waveform.x_bins as f32;
    let cell_h = rect.height() / waveform.y_bins as f32;

    for &channel in view.channel_filter.channels() {
        let color = channel_color(channel);
        for cell in waveform_cells(waveform, channel, view.scale) {
            let min = egui::pos2(
                rect.left() + cell.x as f32 * cell_w,
                rect.top() + cell.row as f32 * cell_h,
            );
            let cell_rect = egui::Rect::from_min_size(min, egui::vec2(cell_w, cell_h));
            painter.rect_filled(cell_rect, 0.0, color.gamma_multiply(cell.alpha));
        }
    }
}
