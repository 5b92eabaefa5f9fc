use ddsview_core::inspector::{EventSink, Key};

use crate::app::DdsViewApp;

pub fn show(ctx: &egui::Context, app: &mut DdsViewApp) {
    let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
    let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui
                    .add(egui::Button::new("Open...").shortcut_text(ctx.format_shortcut(&open_shortcut)))
                    .clicked()
                {
                    ui.close();
                    app.request_open(ctx);
                }

                ui.separator();

                if ui
                    .add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut)))
                    .clicked()
                {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let mut show_info = app.inspector.state().show_info;
                if ui.checkbox(&mut show_info, "Show info").changed() {
                    app.inspector.on_show_info(show_info);
                }
                if ui.add(egui::Button::new("Reset").shortcut_text("Space")).clicked() {
                    ui.close();
                    app.dispatch_key(ctx, Key::Reset);
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("Keyboard").clicked() {
                    ui.close();
                    app.ui_state.show_keys = true;
                }
                if ui.button("About").clicked() {
                    ui.close();
                    app.ui_state.show_about = true;
                }
            });
        });

        if ctx.input_mut(|i| i.consume_shortcut(&open_shortcut)) {
            app.request_open(ctx);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&quit_shortcut)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}
