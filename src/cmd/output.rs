use std::path::Path;

use anyhow::Result;

use docform::render::to_terminal;
use docform::{images, ConversionResult};

use crate::OutputFormat;

/// Print a rendered result in the requested format.
pub fn output_result(result: &ConversionResult, html: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Html => println!("{html}"),
        OutputFormat::Text => {
            match result {
                ConversionResult::Empty => println!("(empty result)"),
                // Data URIs would flood the terminal.
                ConversionResult::Images(items) => {
                    for item in items {
                        println!("{} ({}, {} base64 chars)", item.filename, item.mime, item.data.len());
                    }
                    println!("\n({} images)", items.len());
                }
                _ => println!("{}", to_terminal(html)),
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
    }
    Ok(())
}

/// Decode image results into `dir`, if both are present.
pub fn save_images(result: &ConversionResult, dir: Option<&Path>) -> Result<()> {
    let (ConversionResult::Images(items), Some(dir)) = (result, dir) else {
        return Ok(());
    };
    let written = images::save_all(items, dir)?;
    for path in &written {
        eprintln!("💾 {}", path.display());
    }
    eprintln!("Saved {} images to {}", written.len(), dir.display());
    Ok(())
}

pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
