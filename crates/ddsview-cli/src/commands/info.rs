use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ddsview_core::io::dds::DdsReader;

use crate::summary::{print_subresources, print_texture_summary};

#[derive(Args)]
pub struct InfoArgs {
    /// Input DDS file
    pub file: PathBuf,

    /// Also list every subresource with its offset and pitch
    #[arg(short, long)]
    pub subresources: bool,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let reader = DdsReader::open(&args.file)?;
    print_texture_summary(&args.file, &reader.header, reader.metadata());

    if args.subresources {
        let image = reader.load()?;
        print_subresources(image.subresources());
    }

    Ok(())
}
