use crate::app::HdrscopeApp;
use crate::messages::WorkerCommand;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 20.0;

pub fn show(ctx: &egui::Context, app: &mut HdrscopeApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        paint_background(ui, rect);

        let texture_info = app
            .viewport
            .texture
            .as_ref()
            .map(|t| (t.id(), [t.size()[0] as f32, t.size()[1] as f32]));

        if let Some((texture_id, tex_size)) = texture_info {
            let image_size = egui::vec2(tex_size[0], tex_size[1]);
            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

            handle_zoom(ui, &response, app, rect);
            handle_pan(ui, &response, app);

            if response.double_clicked() {
                fit_to_rect(
                    &mut app.viewport.zoom,
                    &mut app.viewport.pan_offset,
                    image_size,
                    rect,
                );
            }

            let img_rect = compute_img_rect(rect, image_size, app);
            draw_image(ui, texture_id, img_rect);

            handle_probe(ui, &response, app, img_rect, image_size);

            draw_readout(ui, rect, app);
        } else {
            show_placeholder(ui);
        }
    });
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn handle_zoom(ui: &egui::Ui, response: &egui::Response, app: &mut HdrscopeApp, rect: egui::Rect) {
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
    if scroll_delta == 0.0 || !response.hovered() {
        return;
    }

    let zoom_factor = (scroll_delta * 0.005).exp();
    let new_zoom = (app.viewport.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);

    // Zoom toward mouse cursor
    if let Some(mouse_pos) = ui.input(|i| i.pointer.hover_pos()) {
        let center = rect.center().to_vec2() + app.viewport.pan_offset;
        let mouse_rel = mouse_pos.to_vec2() - center;
        let scale_change = new_zoom / app.viewport.zoom;
        app.viewport.pan_offset += mouse_rel * (1.0 - scale_change);
    }

    app.viewport.zoom = new_zoom;
}

fn handle_pan(ui: &egui::Ui, response: &egui::Response, app: &mut HdrscopeApp) {
    if response.dragged_by(egui::PointerButton::Middle)
        || (response.dragged_by(egui::PointerButton::Primary) && ui.input(|i| i.modifiers.command))
    {
        app.viewport.pan_offset += response.drag_delta();
    }
}

fn compute_img_rect(rect: egui::Rect, image_size: egui::Vec2, app: &HdrscopeApp) -> egui::Rect {
    let scaled = image_size * app.viewport.zoom;
    let center = rect.center() + app.viewport.pan_offset;
    egui::Rect::from_center_size(center, scaled)
}

fn draw_image(ui: &egui::Ui, texture_id: egui::TextureId, img_rect: egui::Rect) {
    ui.painter().image(
        texture_id,
        img_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

/// Pixel probe: hovering issues `probe_pixel` for the pixel under the
/// cursor; a click freezes the readout (and copies it), a second click
/// releases it.
fn handle_probe(
    ui: &egui::Ui,
    response: &egui::Response,
    app: &mut HdrscopeApp,
    img_rect: egui::Rect,
    image_size: egui::Vec2,
) {
    let Some(pointer) = response.hover_pos() else {
        return;
    };
    let pixel = preview_pixel_at(pointer, img_rect, image_size, app.viewport.zoom);

    if response.clicked() {
        if app.viewport.pipette_fixed {
            app.viewport.pipette_fixed = false;
        } else if pixel.is_some() {
            app.viewport.pipette_fixed = true;
            if !app.viewport.readout.is_empty() {
                ui.ctx().copy_text(app.viewport.readout.clone());
            }
        }
        return;
    }

    if app.viewport.pipette_fixed {
        return;
    }
    if let Some((x, y)) = pixel {
        // One probe per pixel position, not per frame
        if app.viewport.last_probe != Some((x, y)) {
            app.viewport.last_probe = Some((x, y));
            app.send_command(WorkerCommand::ProbePixel { x, y });
        }
    }
}

fn preview_pixel_at(
    pointer: egui::Pos2,
    img_rect: egui::Rect,
    image_size: egui::Vec2,
    zoom: f32,
) -> Option<(u32, u32)> {
    if !img_rect.contains(pointer) || zoom <= 0.0 {
        return None;
    }
    let x = ((pointer.x - img_rect.min.x) / zoom).floor();
    let y = ((pointer.y - img_rect.min.y) / zoom).floor();
    if x < 0.0 || y < 0.0 || x >= image_size.x || y >= image_size.y {
        return None;
    }
    Some((x as u32, y as u32))
}

fn draw_readout(ui: &egui::Ui, rect: egui::Rect, app: &HdrscopeApp) {
    if app.viewport.readout.is_empty() {
        return;
    }
    let mut text = app.viewport.readout.clone();
    if app.viewport.pipette_fixed {
        text.push_str("  [fixed]");
    }
    ui.painter().text(
        rect.left_bottom() + egui::vec2(8.0, -8.0),
        egui::Align2::LEFT_BOTTOM,
        text,
        egui::FontId::monospace(12.0),
        egui::Color32::from_white_alpha(220),
    );
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Open an EXR image to begin")
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}

fn fit_to_rect(zoom: &mut f32, pan: &mut egui::Vec2, image_size: egui::Vec2, rect: egui::Rect) {
    let available = rect.size();
    let fit_x = available.x / image_size.x;
    let fit_y = available.y / image_size.y;
    *zoom = fit_x.min(fit_y).clamp(MIN_ZOOM, MAX_ZOOM);
    *pan = egui::Vec2::ZERO;
}
