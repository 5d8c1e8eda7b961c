use hdrscope_core::export::ExportStatus;

use crate::app::HdrscopeApp;

pub fn show(ctx: &egui::Context, app: &mut HdrscopeApp) {
    if app.exports.is_empty() {
        return;
    }

    egui::TopBottomPanel::bottom("export_queue").show(ctx, |ui| {
        ui.add_space(2.0);
        ui.horizontal(|ui| {
            ui.label(format!("Export queue ({})", app.exports.tasks().len()));
            if !app.ui.exporting && ui.button("Start").clicked() {
                app.dispatch_exports();
            }
        });

        let mut cancel_requests = Vec::new();
        for task in app.exports.tasks() {
            ui.horizontal(|ui| {
                let name = task
                    .source
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| task.source.display().to_string());
                ui.label(name);
                ui.add(
                    egui::ProgressBar::new(task.progress as f32 / 100.0).desired_width(160.0),
                );
                let status = match task.status {
                    ExportStatus::Pending => "pending",
                    ExportStatus::Running => "running",
                    // Terminal tasks leave the view on the next event
                    _ => "done",
                };
                ui.weak(status);
                if ui
                    .add_enabled(!task.cancel.is_cancelled(), egui::Button::new("Cancel"))
                    .clicked()
                {
                    cancel_requests.push(task.id);
                }
            });
        }

        for id in cancel_requests {
            // A running task also needs the backend abort; a pending one is
            // simply skipped when the runner reaches it.
            if app.exports.request_cancel(id) == Some(ExportStatus::Running) {
                app.request_cancel_open();
            }
        }
        ui.add_space(2.0);
    });
}
