//! Rendering results as JSON or YAML

use std::fs;
use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use color_eyre::eyre::Context;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn render<T: Serialize>(self, value: &T) -> color_eyre::Result<String> {
        match self {
            OutputFormat::Json => {
                serde_json::to_string_pretty(value).wrap_err("Failed to render JSON")
            }
            OutputFormat::Yaml => serde_saphyr::to_string(value).wrap_err("Failed to render YAML"),
        }
    }
}

/// Write `value` to `path`, or to stdout when no path is given
pub fn write_output<T: Serialize>(
    value: &T,
    format: OutputFormat,
    path: Option<&Path>,
) -> color_eyre::Result<()> {
    let mut rendered = format.render(value)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match path {
        Some(path) => {
            fs::write(path, rendered)
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), ?format, "wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .wrap_err("Failed to write to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
