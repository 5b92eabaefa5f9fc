mod app;
mod panels;
mod render;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ddsview_core::config::ViewerConfig;
use ddsview_core::inspector::{suggest_window_size, DisplayMetrics};
use ddsview_core::io::dds::read_metadata;
use egui_wgpu::wgpu;

#[derive(Parser)]
#[command(name = "ddsview-gui", version, about = "Interactive DDS texture inspector")]
struct Cli {
    /// DDS file to open
    file: PathBuf,

    /// Viewer configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            app::error_dialog(&e.render().to_string());
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            app::error_dialog(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    let metadata = read_metadata(&cli.file)
        .with_context(|| format!("Failed to open {}", cli.file.display()))?;
    let metrics = DisplayMetrics {
        screen: None,
        remote_session: render::detect_remote_session(),
    };
    let [width, height] =
        suggest_window_size(metadata.width, metadata.height, &metrics, &config.window);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32])
            .with_min_inner_size([320.0, 240.0])
            .with_title("ddsView"),
        wgpu_options: wgpu_configuration(),
        ..Default::default()
    };

    eframe::run_native(
        "ddsView",
        options,
        Box::new(move |cc| {
            let app = app::DdsViewApp::new(cc, &cli.file, config)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Ask for BC texture sampling and the adapter's full texture limits.
fn wgpu_configuration() -> egui_wgpu::WgpuConfiguration {
    let mut configuration = egui_wgpu::WgpuConfiguration::default();
    if let egui_wgpu::WgpuSetup::CreateNew(setup) = &mut configuration.wgpu_setup {
        setup.device_descriptor = Arc::new(|adapter: &wgpu::Adapter| wgpu::DeviceDescriptor {
            label: Some("ddsview device"),
            required_features: adapter.features() & wgpu::Features::TEXTURE_COMPRESSION_BC,
            required_limits: adapter.limits(),
            ..Default::default()
        });
    }
    configuration
}
