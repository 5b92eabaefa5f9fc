use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use ddsview_core::inspector::Channel;
use ddsview_core::io::dds::DdsReader;
use ddsview_core::shading::{render_slice, save_rgba, ShadeParams};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ChannelArg {
    Rgba,
    R,
    G,
    B,
    A,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Rgba => Channel::Rgba,
            ChannelArg::R => Channel::R,
            ChannelArg::G => Channel::G,
            ChannelArg::B => Channel::B,
            ChannelArg::A => Channel::A,
        }
    }
}

#[derive(Args)]
pub struct ExportArgs {
    /// Input DDS file
    pub file: PathBuf,

    /// Output image (.png or .tiff)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Array item, or depth slice of a volume texture
    #[arg(long, default_value_t = 0)]
    pub slice: u32,

    /// Mip level
    #[arg(long, default_value_t = 0)]
    pub mip: u32,

    /// Channel to show; single-channel formats default to R
    #[arg(long, value_enum)]
    pub channel: Option<ChannelArg>,

    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub bias: f32,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    let reader = DdsReader::open(&args.file)?;
    let format = reader.metadata().format;
    let image = reader.load()?;

    let channel = args.channel.map(Channel::from).unwrap_or(if format.is_single_channel() {
        Channel::R
    } else {
        Channel::Rgba
    });
    let params = ShadeParams {
        channel,
        scale: args.scale,
        bias: args.bias,
    };
    tracing::debug!(
        "Shading {} as {format}: channel {channel}, scale {}, bias {}",
        args.file.display(),
        params.scale,
        params.bias
    );

    let pixels = render_slice(&image, args.slice, args.mip, &params).with_context(|| {
        format!(
            "Failed to render slice {} mip {} of {}",
            args.slice,
            args.mip,
            args.file.display()
        )
    })?;
    save_rgba(&pixels, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Exported {} (slice {}, mip {}, {} x{} {:+}) to {}",
        args.file.display(),
        args.slice,
        args.mip,
        channel,
        args.scale,
        args.bias,
        args.output.display()
    );
    Ok(())
}
