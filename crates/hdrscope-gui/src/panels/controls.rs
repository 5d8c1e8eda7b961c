use hdrscope_core::raster::ChannelMode;

use crate::app::HdrscopeApp;
use crate::panels::menu_bar;
use crate::state::NON_TRANSFORM;

pub fn show(ctx: &egui::Context, app: &mut HdrscopeApp) {
    egui::TopBottomPanel::top("controls").show(ctx, |ui| {
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Path:");
            let width = (ui.available_width() - 300.0).max(120.0);
            ui.add(
                egui::TextEdit::singleline(&mut app.ui.path_input)
                    .desired_width(width)
                    .hint_text("/path/to/image.exr"),
            );
            if ui.button("Browse...").clicked() {
                menu_bar::open_files(app);
            }
            if ui.button("Open").clicked() {
                app.open_path();
            }
            let save_label = if app.exports.is_empty() {
                "Save PNG"
            } else {
                "Run Export Queue"
            };
            if ui.button(save_label).clicked() {
                if app.exports.is_empty() {
                    menu_bar::save_preview(app);
                } else {
                    app.dispatch_exports();
                }
            }
            if app.ui.open_progress.is_some() && ui.button("Cancel").clicked() {
                app.request_cancel_open();
            }
        });

        ui.add_space(4.0);

        ui.horizontal(|ui| {
            // Every change here funnels through the debouncer; a slider drag
            // becomes a single engine call.
            if ui
                .add(
                    egui::Slider::new(&mut app.params.exposure, -10.0..=10.0)
                        .text("Exposure")
                        .fixed_decimals(2),
                )
                .changed()
            {
                app.schedule_update();
            }
            if ui
                .add(
                    egui::Slider::new(&mut app.params.gamma, 0.2..=4.0)
                        .text("Gamma")
                        .fixed_decimals(2),
                )
                .changed()
            {
                app.schedule_update();
            }
            if ui
                .checkbox(&mut app.params.high_quality, "High quality")
                .changed()
            {
                app.schedule_update();
            }
        });

        ui.add_space(4.0);

        ui.horizontal(|ui| {
            transform_selector(ui, app);

            ui.separator();

            let mut mode = app.preview.channel_mode();
            let before = mode;
            ui.selectable_value(&mut mode, ChannelMode::Rgb, "RGB");
            ui.selectable_value(&mut mode, ChannelMode::Alpha, "Alpha");
            if mode != before {
                // Presentation-only change, no engine round-trip
                app.preview.set_channel_mode(mode);
                app.refresh_texture(ui.ctx());
            }

            let compare = app.preview.compare_active();
            if ui
                .add_enabled(
                    app.preview.has_previous(),
                    egui::Button::new("A/B").selected(compare),
                )
                .on_hover_text("Show the frame before the last change")
                .clicked()
            {
                app.preview.toggle_compare();
                app.refresh_texture(ui.ctx());
            }
        });

        ui.add_space(4.0);
    });
}

fn transform_selector(ui: &mut egui::Ui, app: &mut HdrscopeApp) {
    let mut selection: Option<String> = None;
    egui::ComboBox::from_label("Transform")
        .selected_text(app.ui.selected_transform.clone())
        .show_ui(ui, |ui| {
            if ui
                .selectable_label(app.ui.selected_transform == NON_TRANSFORM, NON_TRANSFORM)
                .clicked()
            {
                selection = Some(NON_TRANSFORM.to_owned());
            }
            for preset in &app.ui.transforms {
                let text = match &preset.group {
                    Some(group) => format!("{group} / {}", preset.label),
                    None => preset.label.clone(),
                };
                if ui
                    .selectable_label(app.ui.selected_transform == preset.label, text)
                    .clicked()
                {
                    selection = Some(preset.label.clone());
                }
            }
        });

    if let Some(label) = selection {
        app.ui.selected_transform = label.clone();
        app.config.default_transform = Some(label);
        app.config.save();
        app.apply_selected_transform();
    }
}
