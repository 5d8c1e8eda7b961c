use crate::app::HdrscopeApp;

pub fn show(ctx: &egui::Context, app: &mut HdrscopeApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Progress bar for the active long-running operation
        let active = [
            ("Opening", app.ui.open_progress),
            ("Sequence", app.ui.seq_progress),
            ("Video", app.ui.video_progress),
        ]
        .into_iter()
        .find_map(|(label, progress)| progress.map(|p| (label, p)));

        if let Some((label, percent)) = active {
            ui.add(
                egui::ProgressBar::new(percent as f32 / 100.0)
                    .text(format!("{label} {percent}%"))
                    .animate(true),
            );
        } else {
            // Invisible placeholder — same height, no animation
            ui.add(egui::ProgressBar::new(0.0).text(""));
        }

        // Log area — fixed height for 4 lines, scrollable.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui.log_messages.is_empty() {
                    // Reserve space for 4 empty lines to prevent layout jump.
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui.log_messages {
                        ui.label(msg);
                    }
                }
            });

        // Status line
        ui.horizontal(|ui| {
            ui.label(app.preview.status_line());
            ui.separator();
            ui.label(format!("Zoom: {:.0}%", app.viewport.zoom * 100.0));
            ui.separator();
            match app.ui.bridge_ready {
                Some(true) => {
                    ui.label("Engine: connected");
                }
                Some(false) => {
                    ui.colored_label(egui::Color32::YELLOW, "Engine: unavailable");
                }
                None => {
                    ui.label("Engine: resolving...");
                }
            }
            if let Some(error) = &app.ui.error {
                ui.separator();
                ui.colored_label(egui::Color32::RED, error);
            }
        });

        ui.add_space(2.0);
    });
}
