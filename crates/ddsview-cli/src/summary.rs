use std::path::Path;

use console::Style;
use ddsview_core::io::dds::{DdsHeader, DDPF_FOURCC};
use ddsview_core::scratch::{payload_size, Subresource};
use ddsview_core::texture::TexMetadata;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    flag: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            flag: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }

    fn yes_no(&self, on: bool) -> String {
        if on {
            self.flag.apply_to("yes").to_string()
        } else {
            self.disabled.apply_to("no").to_string()
        }
    }
}

pub fn print_texture_summary(path: &Path, header: &DdsHeader, meta: &TexMetadata) {
    let s = Styles::new();
    let row = |label: &str, value: String| {
        println!("  {:<14}{}", s.label.apply_to(label), value);
    };

    println!();
    println!("  {}", s.title.apply_to("DDS Texture"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(11)));
    println!();

    row("File", s.path.apply_to(path.display()).to_string());
    row(
        "Format",
        format!(
            "{} {}",
            s.value.apply_to(meta.format),
            s.label.apply_to(format!("({})", meta.format.0))
        ),
    );
    row("Dimension", s.value.apply_to(meta.dimension).to_string());
    let size = if meta.is_volume() {
        format!("{} X {} X {}", meta.width, meta.height, meta.depth)
    } else {
        format!("{} X {}", meta.width, meta.height)
    };
    row("Size", s.value.apply_to(size).to_string());
    row("Array size", s.value.apply_to(meta.array_size).to_string());
    row("Mip levels", s.value.apply_to(meta.mip_levels).to_string());
    row("Slices", s.value.apply_to(meta.max_slices()).to_string());
    println!();

    println!("  {}", s.header.apply_to("Display"));
    row("Cube map", s.yes_no(meta.is_cubemap()));
    row("Depth mode", s.yes_no(meta.format.is_single_channel()));
    row("Stencil", s.yes_no(meta.format.has_stencil()));
    row("sRGB", s.yes_no(meta.format.is_srgb()));
    row("Compressed", s.yes_no(meta.format.is_compressed()));
    println!();

    println!("  {}", s.header.apply_to("Header"));
    let kind = match &header.dx10 {
        Some(_) => "DX10".to_string(),
        None if header.pixel_format.flags & DDPF_FOURCC != 0 => {
            format!(
                "legacy FourCC '{}'",
                String::from_utf8_lossy(&header.pixel_format.four_cc)
            )
        }
        None => format!("legacy {}-bit masks", header.pixel_format.rgb_bit_count),
    };
    row("Kind", s.value.apply_to(kind).to_string());
    row(
        "Data offset",
        s.value.apply_to(header.data_offset()).to_string(),
    );
    if let Ok(payload) = payload_size(meta) {
        let payload_kb = payload as f64 / 1024.0;
        row("Data size", s.value.apply_to(format!("{payload_kb:.1} KB")).to_string());
    }
    println!();
}

pub fn print_subresources(subresources: &[Subresource]) {
    let s = Styles::new();

    println!("  {}", s.header.apply_to("Subresources"));
    println!(
        "  {}",
        s.label.apply_to(format!(
            "{:>5} {:>4} {:>5} {:>11} {:>10} {:>10} {:>10}",
            "item", "mip", "slice", "size", "row pitch", "bytes", "offset"
        ))
    );
    for sub in subresources {
        println!(
            "  {:>5} {:>4} {:>5} {:>11} {:>10} {:>10} {:>10}",
            sub.item,
            sub.mip,
            sub.slice,
            format!("{}x{}", sub.width, sub.height),
            sub.row_pitch,
            sub.slice_pitch,
            sub.offset
        );
    }
    println!();
}
