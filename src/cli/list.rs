use anyhow::Result;
use castape::process::catalog::{Catalog, CatalogEntry};
use serde::Serialize;

use super::command::ListArgs;
use crate::input::InputReader;

pub fn cmd_list(args: &ListArgs) -> Result<()> {
    let mut input_reader = InputReader::new(&args.input)?;
    if input_reader.is_pipe() {
        log::debug!("Reading image from stdin");
    }
    let image = input_reader.read_all()?;
    log::debug!("Listing {} ({} bytes)", args.input.display(), image.len());

    let entries: Vec<CatalogEntry> = Catalog::new(&image).collect();
    if entries.is_empty() {
        log::warn!("No files found in {}", args.input.display());
    }

    let listing = Listing {
        image: args.input.display().to_string(),
        files: entries,
    };
    print!("{}", render_listing(&listing, args.yaml)?);
    Ok(())
}

#[derive(Debug, Serialize)]
struct Listing {
    image: String,
    files: Vec<CatalogEntry>,
}

fn render_listing(listing: &Listing, yaml: bool) -> Result<String> {
    if yaml {
        return Ok(serde_yaml_ng::to_string(listing)?);
    }

    Ok(listing.files.iter().map(|entry| format!("{entry}\n")).collect())
}
