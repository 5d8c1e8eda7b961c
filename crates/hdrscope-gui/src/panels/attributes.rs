use hdrscope_core::metadata::RowState;

use crate::app::HdrscopeApp;

pub fn show(ctx: &egui::Context, app: &mut HdrscopeApp) {
    if !app.ui.show_attributes {
        return;
    }
    let mut open = true;
    egui::Window::new("Attributes")
        .open(&mut open)
        .default_width(420.0)
        .show(ctx, |ui| {
            if app.attributes.rows().is_empty() {
                ui.weak("No attributes loaded");
            }

            let mut deletions = Vec::new();
            egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                egui::Grid::new("attr_grid").num_columns(4).show(ui, |ui| {
                    for (index, row) in app.attributes.rows_mut().iter_mut().enumerate() {
                        let mut name = row.name.clone();
                        let mut value = row.value.clone();
                        let mut edited = false;
                        edited |= ui
                            .add(egui::TextEdit::singleline(&mut name).desired_width(150.0))
                            .changed();
                        edited |= ui
                            .add(egui::TextEdit::singleline(&mut value).desired_width(150.0))
                            .changed();
                        if edited {
                            row.edit(name, value);
                        }

                        match row.state() {
                            RowState::Clean => {
                                ui.label("");
                            }
                            RowState::Modified => {
                                ui.colored_label(egui::Color32::YELLOW, "modified");
                            }
                            RowState::Added => {
                                ui.colored_label(egui::Color32::LIGHT_GREEN, "added");
                            }
                            RowState::Deleted => {
                                ui.colored_label(egui::Color32::LIGHT_RED, "deleted");
                            }
                        }

                        if ui.button("Delete").clicked() {
                            deletions.push(index);
                        }
                        ui.end_row();
                    }
                });
            });
            // Back-to-front so earlier indices stay valid
            for index in deletions.into_iter().rev() {
                app.attributes.delete_row(index);
            }

            ui.horizontal(|ui| {
                if ui.button("Add attribute").clicked() {
                    app.attributes.add_row();
                }
                if app.attributes.dirty() {
                    ui.weak("Unsaved changes");
                }
            });
        });
    app.ui.show_attributes = open;
}
