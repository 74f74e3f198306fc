//! Rendering and destination handling

use anyhow::{Context, Result};
use clap::ValueEnum;
use stackdsl_core::Template;
use std::path::Path;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Serialize the template in the requested format. `pretty` only affects
/// JSON; YAML is always block-formatted.
pub fn render(template: &Template, format: OutputFormat, pretty: bool) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json if pretty => template.to_json_pretty()?,
        OutputFormat::Json => template.to_json()?,
        OutputFormat::Yaml => template.to_yaml()?,
    };
    Ok(rendered)
}

/// Write the rendered document to `dest`, or stdout when no destination
/// was given. File output always ends with a newline.
pub fn write_rendered(rendered: &str, dest: Option<&Path>) -> Result<()> {
    match dest {
        Some(path) => {
            let mut contents = rendered.to_string();
            if !contents.ends_with('\n') {
                contents.push('\n');
            }
            std::fs::write(path, contents)
                .with_context(|| format!("cannot write template to {}", path.display()))
        }
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}
