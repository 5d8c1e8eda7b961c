use crate::app::HdrscopeApp;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::state::{COLORSPACE_NAMES, PROFILE_NAMES, QUALITY_NAMES, TRANSFER_NAMES};

pub fn show(ctx: &egui::Context, app: &mut HdrscopeApp) {
    if !app.ui.show_video {
        return;
    }
    let mut open = true;
    egui::Window::new("Video Tools")
        .open(&mut open)
        .default_width(420.0)
        .show(ctx, |ui| {
            sequence_section(ui, app);
            ui.separator();
            prores_section(ui, app);
        });
    app.ui.show_video = open;
}

fn sequence_section(ui: &mut egui::Ui, app: &mut HdrscopeApp) {
    ui.heading("Sequence FPS");

    ui.horizontal(|ui| {
        ui.label("Folder:");
        ui.add(
            egui::TextEdit::singleline(&mut app.video.seq_dir)
                .desired_width(260.0)
                .hint_text("/path/to/sequence"),
        );
        if ui.button("Browse...").clicked() {
            pick_folder(app);
        }
    });

    ui.horizontal(|ui| {
        ui.add(egui::DragValue::new(&mut app.video.seq_fps).speed(0.1).range(1.0..=240.0));
        ui.label("fps");
        ui.label("Attribute:");
        ui.add(egui::TextEdit::singleline(&mut app.video.seq_attr).desired_width(140.0));
    });
    ui.horizontal(|ui| {
        ui.checkbox(&mut app.video.seq_recursive, "Recursive");
        ui.checkbox(&mut app.video.seq_dry_run, "Dry run");
    });

    ui.horizontal(|ui| {
        if ui
            .add_enabled(!app.ui.seq_running, egui::Button::new("Apply FPS"))
            .clicked()
        {
            if app.video.seq_dir.trim().is_empty() {
                app.ui.add_log("sequence folder required");
            } else {
                app.ui.seq_running = true;
                app.ui.seq_progress = Some(0);
                app.send_command(WorkerCommand::SequenceFps {
                    request: app.video.sequence_request(),
                });
            }
        }
        if app.ui.seq_running && ui.button("Cancel").clicked() {
            app.request_cancel_sequence();
        }
    });

    if let Some(percent) = app.ui.seq_progress {
        ui.add(egui::ProgressBar::new(percent as f32 / 100.0).show_percentage());
    }
}

fn prores_section(ui: &mut egui::Ui, app: &mut HdrscopeApp) {
    ui.heading("ProRes Export");

    ui.horizontal(|ui| {
        ui.add(
            egui::DragValue::new(&mut app.video.prores_fps)
                .speed(0.1)
                .range(1.0..=240.0),
        );
        ui.label("fps");
        index_combo(ui, "Colorspace", &mut app.video.prores_colorspace_index, COLORSPACE_NAMES);
        index_combo(ui, "Profile", &mut app.video.prores_profile_index, PROFILE_NAMES);
    });

    ui.horizontal(|ui| {
        ui.label("Max size:");
        ui.add(
            egui::DragValue::new(&mut app.video.prores_max_size)
                .speed(16)
                .range(256..=8192),
        );
        index_combo(ui, "Transfer", &mut app.video.prores_transfer_index, TRANSFER_NAMES);
        index_combo(ui, "Quality", &mut app.video.prores_quality_index, QUALITY_NAMES);
    });

    ui.horizontal(|ui| {
        ui.label("Output:");
        ui.add(
            egui::TextEdit::singleline(&mut app.video.prores_out)
                .desired_width(260.0)
                .hint_text("/path/to/out.mov"),
        );
        if ui.button("Browse...").clicked() {
            pick_video_target(app);
        }
    });

    if ui
        .add_enabled(!app.ui.video_running, egui::Button::new("Export ProRes"))
        .clicked()
    {
        if app.video.seq_dir.trim().is_empty() {
            app.ui.add_log("sequence folder required");
        } else if app.video.prores_out.trim().is_empty() {
            app.ui.add_log("output path required");
        } else {
            app.ui.video_running = true;
            app.ui.video_progress = Some(0);
            app.send_command(WorkerCommand::ExportVideo {
                request: app.video.video_request(),
            });
        }
    }

    if let Some(percent) = app.ui.video_progress {
        ui.add(egui::ProgressBar::new(percent as f32 / 100.0).show_percentage());
    }
}

fn index_combo(ui: &mut egui::Ui, label: &str, index: &mut usize, names: &[&str]) {
    egui::ComboBox::from_label(label)
        .selected_text(names[*index])
        .show_ui(ui, |ui| {
            for (i, name) in names.iter().enumerate() {
                ui.selectable_value(index, i, *name);
            }
        });
}

fn pick_folder(app: &HdrscopeApp) {
    let result_tx = app.result_tx.clone();
    std::thread::spawn(move || {
        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
            let _ = result_tx.send(WorkerResult::FolderPicked(dir));
        }
    });
}

fn pick_video_target(app: &HdrscopeApp) {
    let result_tx = app.result_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("ProRes MOV", &["mov"])
            .set_file_name("out.mov")
            .save_file()
        {
            let _ = result_tx.send(WorkerResult::VideoTargetPicked(path));
        }
    });
}
