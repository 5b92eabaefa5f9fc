use ddsview_core::inspector::{EventSink, InspectorState};

use crate::app::DdsViewApp;
use crate::render::ImageCallback;

const INFO_MARGIN: f32 = 8.0;
const INFO_FONT_SIZE: f32 = 14.0;

pub fn show(ctx: &egui::Context, app: &mut DdsViewApp) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
        .show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            let state = app.inspector.state();
            if !state.is_loaded() {
                show_placeholder(ui);
                return;
            }

            let ppp = ctx.pixels_per_point();
            let viewport = [
                (rect.width() * ppp).round() as u32,
                (rect.height() * ppp).round() as u32,
            ];
            ui.painter().add(egui_wgpu::Callback::new_paint_callback(
                rect,
                ImageCallback {
                    params: app.inspector.frame_params(),
                    variant: app.inspector.active_variant(),
                    quad: state.quad(viewport),
                },
            ));

            if state.show_info {
                draw_info(ui, rect, state);
            }
        });
}

/// Overlay text in the channel's colour.
fn draw_info(ui: &egui::Ui, rect: egui::Rect, state: &InspectorState) {
    let [r, g, b, a] = state.view.channel.text_color();
    let color = egui::Color32::from(egui::Rgba::from_rgba_unmultiplied(r, g, b, a));
    let font = egui::FontId::monospace(INFO_FONT_SIZE);

    let mut pos = rect.left_top() + egui::vec2(INFO_MARGIN, INFO_MARGIN);
    for line in state.info_lines() {
        let painted = ui
            .painter()
            .text(pos, egui::Align2::LEFT_TOP, line, font.clone(), color);
        pos.y = painted.bottom();
    }
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Open a DDS file to begin")
                .size(18.0)
                .color(egui::Color32::from_gray(120)),
        );
    });
}
