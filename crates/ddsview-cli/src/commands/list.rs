use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use console::Style;
use ddsview_core::config::ViewerConfig;
use ddsview_core::io::dds::read_metadata;
use ddsview_core::io::image_set::ImageSet;

#[derive(Args)]
pub struct ListArgs {
    /// A DDS file (its directory is listed) or a directory
    pub path: PathBuf,
}

pub fn run(args: &ListArgs, config: &ViewerConfig) -> Result<()> {
    let images = if args.path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && config.files.matches(p))
            .collect();
        files.sort();
        ImageSet::from_paths(files, 0)
    } else {
        ImageSet::scan(&args.path, &config.files)?
    };

    if images.is_empty() {
        bail!("No .{} files in {}", config.files.extension, args.path.display());
    }

    let current = Style::new().bold().cyan();
    let dim = Style::new().dim();
    let error = Style::new().red();
    let marks_current = !args.path.is_dir();

    for (i, path) in images.files().iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_current = marks_current && i == images.index();
        let details = match read_metadata(path) {
            Ok(meta) => dim
                .apply_to(format!(
                    "{} {}x{} {} slices={}",
                    meta.format,
                    meta.width,
                    meta.height,
                    meta.dimension,
                    meta.max_slices()
                ))
                .to_string(),
            Err(e) => error.apply_to(e.to_string()).to_string(),
        };
        let (marker, name) = if is_current {
            (">", current.apply_to(format!("{name:<32}")).to_string())
        } else {
            (" ", format!("{name:<32}"))
        };
        println!("{marker} {i:>4}  {name} {details}");
    }

    println!();
    println!(
        "{} files, PageUp/PageDown step {}, Home/End step {}",
        images.len(),
        config.navigation.page_step(images.len()),
        config.navigation.jump_step(images.len())
    );
    Ok(())
}
