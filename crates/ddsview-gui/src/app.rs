use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::Context;
use ddsview_core::config::ViewerConfig;
use ddsview_core::error::DdsViewError;
use ddsview_core::inspector::{EventSink, Inspector, Key, Navigation};

use crate::panels;
use crate::render::WgpuBackend;
use crate::state::UIState;

const KEY_BINDINGS: [(egui::Key, Key); 16] = [
    (egui::Key::Num1, Key::ChannelPrev),
    (egui::Key::Num2, Key::ChannelNext),
    (egui::Key::ArrowUp, Key::Navigate(Navigation::Up)),
    (egui::Key::ArrowDown, Key::Navigate(Navigation::Down)),
    (egui::Key::PageUp, Key::Navigate(Navigation::PageUp)),
    (egui::Key::PageDown, Key::Navigate(Navigation::PageDown)),
    (egui::Key::Home, Key::Navigate(Navigation::Home)),
    (egui::Key::End, Key::Navigate(Navigation::End)),
    (egui::Key::ArrowLeft, Key::SliceLeft),
    (egui::Key::ArrowRight, Key::SliceRight),
    (egui::Key::Q, Key::BiasUp),
    (egui::Key::W, Key::BiasDown),
    (egui::Key::A, Key::ScaleUp),
    (egui::Key::S, Key::ScaleDown),
    (egui::Key::Space, Key::Reset),
    (egui::Key::I, Key::ToggleInfo),
];

pub struct DdsViewApp {
    pub inspector: Inspector,
    pub backend: WgpuBackend,
    pub ui_state: UIState,
    open_tx: mpsc::Sender<PathBuf>,
    open_rx: mpsc::Receiver<PathBuf>,
}

impl DdsViewApp {
    /// Create the renderer and load `path`. A failure here ends the process.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        path: &Path,
        config: ViewerConfig,
    ) -> anyhow::Result<Self> {
        let render_state = cc
            .wgpu_render_state
            .as_ref()
            .context("The wgpu renderer is not available")?;
        let mut backend = WgpuBackend::new(render_state);
        backend.set_screen(monitor_size(&cc.egui_ctx));

        let mut inspector = Inspector::new(config);
        inspector.open(path, &mut backend)?;

        let (open_tx, open_rx) = mpsc::channel();
        let mut app = Self {
            inspector,
            backend,
            ui_state: UIState::default(),
            open_tx,
            open_rx,
        };
        app.on_image_loaded(&cc.egui_ctx);
        Ok(app)
    }

    /// Pick a file on a dialog thread; the result is opened on the next frame.
    pub fn request_open(&self, ctx: &egui::Context) {
        let open_tx = self.open_tx.clone();
        let extension = self.inspector.config().files.extension.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("DDS textures", &[extension.as_str()])
                .add_filter("All files", &["*"])
                .pick_file()
            {
                let _ = open_tx.send(path);
                ctx.request_repaint();
            }
        });
    }

    pub fn dispatch_key(&mut self, ctx: &egui::Context, key: Key) {
        let result = self.inspector.on_key(key, &mut self.backend);
        self.finish(ctx, result);
    }

    fn poll_open(&mut self, ctx: &egui::Context) {
        while let Ok(path) = self.open_rx.try_recv() {
            let result = self.inspector.open(&path, &mut self.backend).map(|()| true);
            self.finish(ctx, result);
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let keys: Vec<Key> = ctx.input_mut(|i| {
            KEY_BINDINGS
                .iter()
                .filter(|(egui_key, _)| i.consume_key(egui::Modifiers::NONE, *egui_key))
                .map(|(_, key)| *key)
                .collect()
        });
        for key in keys {
            self.dispatch_key(ctx, key);
        }
    }

    /// `result` carries whether a new image was committed.
    fn finish(&mut self, ctx: &egui::Context, result: Result<bool, DdsViewError>) {
        match result {
            Ok(true) => self.on_image_loaded(ctx),
            Ok(false) => {}
            Err(e) => {
                tracing::error!("{e}");
                self.ui_state.add_log(format!("ERROR: {e}"));
                error_dialog(&e.to_string());
            }
        }
    }

    fn on_image_loaded(&mut self, ctx: &egui::Context) {
        let state = self.inspector.state();
        if let Some(title) = state.title() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
        }
        if let Some([width, height]) = self.inspector.window_size() {
            let ppp = ctx.pixels_per_point();
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                width as f32 / ppp,
                height as f32 / ppp,
            )));
        }

        if let Some(image) = &state.image {
            let images = self.inspector.images();
            let message = format!(
                "Opened: {} [{}/{}] ({}, {} shader)",
                image.path.display(),
                images.index() + 1,
                images.len().max(1),
                image.metadata.format,
                image.variant
            );
            self.ui_state.add_log(message);
        }
    }
}

impl eframe::App for DdsViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.backend.set_screen(monitor_size(ctx));
        self.poll_open(ctx);
        self.handle_keys(ctx);

        panels::menu_bar::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::status::show(ctx, self);
        panels::viewport::show(ctx, self);

        if self.ui_state.show_keys {
            egui::Window::new("Keyboard")
                .collapsible(false)
                .resizable(false)
                .open(&mut self.ui_state.show_keys)
                .show(ctx, |ui| {
                    egui::Grid::new("keys").striped(true).show(ui, |ui| {
                        for (keys, action) in KEY_HELP {
                            ui.monospace(*keys);
                            ui.label(*action);
                            ui.end_row();
                        }
                    });
                });
        }

        if self.ui_state.show_about {
            egui::Window::new("About ddsView")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("ddsView");
                        ui.label("DDS Texture Inspector");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.ui_state.show_about = false;
                        }
                    });
                });
        }
    }
}

const KEY_HELP: &[(&str, &str)] = &[
    ("1 / 2", "Previous / next channel"),
    ("Up / Down", "Previous / next file"),
    ("PgUp / PgDn", "Page through files"),
    ("Home / End", "Jump through files"),
    ("Left / Right", "Previous / next slice"),
    ("Q / W", "Bias up / down"),
    ("A / S", "Scale up / down"),
    ("Space", "Reset view"),
    ("I", "Toggle info"),
];

/// Monitor size in physical pixels, once the windowing layer knows it.
fn monitor_size(ctx: &egui::Context) -> Option<[u32; 2]> {
    let ppp = ctx.pixels_per_point();
    ctx.input(|i| i.viewport().monitor_size)
        .map(|size| [(size.x * ppp) as u32, (size.y * ppp) as u32])
}

/// Blocking error box.
pub fn error_dialog(message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("ddsView")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
