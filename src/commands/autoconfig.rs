//! Command: write a manifest template.
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::AutoconfigOpts;
use crate::config::manifest;

/// Write the template manifest to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the template cannot be serialized or written.
pub fn write_template(path: &Path) -> Result<()> {
    let json = manifest::template()
        .to_pretty_json()
        .context("serializing manifest template")?;
    std::fs::write(path, json)
        .with_context(|| format!("writing manifest template to {}", path.display()))?;
    Ok(())
}

/// Run the autoconfig command.
///
/// # Errors
///
/// Returns an error if the template cannot be written.
#[allow(clippy::print_stdout)]
pub fn run(opts: &AutoconfigOpts) -> Result<()> {
    write_template(&opts.path)?;
    println!("manifest template written to {}", opts.path.display());
    Ok(())
}
