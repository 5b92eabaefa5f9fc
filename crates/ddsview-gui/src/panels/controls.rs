use ddsview_core::inspector::{Channel, EventSink};

use crate::app::DdsViewApp;

/// "Show info" checkbox and channel slider.
pub fn show(ctx: &egui::Context, app: &mut DdsViewApp) {
    egui::TopBottomPanel::top("controls").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let mut show_info = app.inspector.state().show_info;
            if ui.checkbox(&mut show_info, "Show info").changed() {
                app.inspector.on_show_info(show_info);
            }

            ui.separator();

            let mut index = app.inspector.state().view.channel.index();
            let slider = egui::Slider::new(&mut index, 0..=Channel::A.index())
                .text("Channel")
                .custom_formatter(|v, _| {
                    Channel::from_index(v as u32).map_or_else(String::new, |c| c.to_string())
                });
            if ui.add(slider).changed() {
                if let Some(channel) = Channel::from_index(index) {
                    app.inspector.on_channel_selected(channel);
                }
            }
        });
    });
}
