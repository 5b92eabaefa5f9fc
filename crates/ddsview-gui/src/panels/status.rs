use crate::app::DdsViewApp;

pub fn show(ctx: &egui::Context, app: &mut DdsViewApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area, fixed height for 4 lines.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        let state = app.inspector.state();
        ui.horizontal(|ui| {
            let images = app.inspector.images();
            if !images.is_empty() {
                ui.label(format!("File {}/{}", images.index() + 1, images.len()));
                ui.separator();
            }
            if let Some(image) = &state.image {
                ui.label(image.metadata.format.to_string());
                ui.separator();
                ui.label(format!(
                    "Slice {}/{}",
                    state.view.slice_index as u32 + 1,
                    image.max_slices
                ));
                ui.separator();
            }
            ui.label(format!("Channel: {}", state.view.channel));
            ui.separator();
            ui.label(format!("Scale: {:.3}", state.view.scale));
            ui.separator();
            ui.label(format!("Bias: {:.3}", state.view.bias));
            if state.view.depth_mode {
                ui.separator();
                ui.label("Depth");
            }
            if state.view.stencil_mode {
                ui.separator();
                ui.label("Stencil");
            }
        });

        ui.add_space(2.0);
    });
}
