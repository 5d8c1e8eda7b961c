use crate::app::HdrscopeApp;
use crate::messages::{WorkerCommand, WorkerResult};

pub fn show(ctx: &egui::Context, app: &mut HdrscopeApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut =
                    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui
                    .add(
                        egui::Button::new("Open...")
                            .shortcut_text(ctx.format_shortcut(&open_shortcut)),
                    )
                    .clicked()
                {
                    ui.close();
                    open_files(app);
                }

                if ui.button("Save Preview PNG...").clicked() {
                    ui.close();
                    save_preview(app);
                }

                ui.separator();

                let quit_shortcut =
                    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui
                    .add(
                        egui::Button::new("Quit")
                            .shortcut_text(ctx.format_shortcut(&quit_shortcut)),
                    )
                    .clicked()
                {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Video Tools").clicked() {
                    ui.close();
                    app.ui.show_video = true;
                }
                if ui.button("Attributes").clicked() {
                    ui.close();
                    app.ui.show_attributes = true;
                }
                ui.separator();
                let mut consent = app.ui.log_consent;
                if ui.checkbox(&mut consent, "Send engine logs").changed() {
                    app.ui.log_consent = consent;
                    app.send_command(WorkerCommand::SetLogPermission { allow: consent });
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| {
            i.consume_shortcut(&egui::KeyboardShortcut::new(
                egui::Modifiers::COMMAND,
                egui::Key::O,
            ))
        }) {
            open_files(app);
        }
        if ctx.input_mut(|i| {
            i.consume_shortcut(&egui::KeyboardShortcut::new(
                egui::Modifiers::COMMAND,
                egui::Key::Q,
            ))
        }) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Pick one or more EXR files. The first opens; when several are chosen they
/// all join the export queue.
pub fn open_files(app: &HdrscopeApp) {
    let result_tx = app.result_tx.clone();
    std::thread::spawn(move || {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("EXR", &["exr"])
            .add_filter("All files", &["*"])
            .pick_files()
        {
            if !paths.is_empty() {
                let _ = result_tx.send(WorkerResult::FilesPicked(paths));
            }
        }
    });
}

pub fn save_preview(app: &HdrscopeApp) {
    let result_tx = app.result_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name("preview.png")
            .save_file()
        {
            let _ = result_tx.send(WorkerResult::SaveTargetPicked(path));
        }
    });
}
