use std::path::Path;

use anyhow::{Context, Result};

use docform::{Config, ContentPolicy, ConversionResult, Renderer};

use super::output::output_result;
use crate::OutputFormat;

pub fn cmd_render(file: &Path, format: OutputFormat, escape: bool) -> Result<()> {
    let body = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let result = ConversionResult::from_json(&body)
        .with_context(|| format!("{} is not a result body", file.display()))?;

    let policy = if escape {
        ContentPolicy::Escaped
    } else {
        Config::load()?.content_policy
    };
    let html = Renderer::new(policy).render(&result);

    output_result(&result, &html, format)
}
