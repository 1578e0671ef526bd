use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;

use docform::ports::download::DirectorySink;
use docform::ports::memory::{MemoryClipboard, MemoryPage};
use docform::{
    catalog, parse_field_args, Config, ContentPolicy, FormClient, FormController, Outcome,
    PageForm, Ports, Renderer, Submission, Submitter,
};

use super::output::{output_result, save_images};
use crate::OutputFormat;

pub struct SubmitArgs {
    pub url: Option<String>,
    pub feature: String,
    pub fields: Vec<String>,
    pub files: Vec<String>,
    pub action: Option<String>,
    pub format: OutputFormat,
    pub out: Option<PathBuf>,
    pub save_images: Option<PathBuf>,
    pub escape: bool,
    pub no_page: bool,
}

pub async fn cmd_submit(args: SubmitArgs) -> Result<()> {
    let config = Config::load()?;
    let url = args.url.unwrap_or_else(|| config.base_url.clone());
    let client = Arc::new(FormClient::with_timeouts(
        &url,
        config.connect_timeout(),
        config.timeout(),
    )?);

    if catalog::lookup(&args.feature).is_none() {
        warn!(feature = %args.feature, "Unknown feature; submitting anyway");
    }

    let form = if args.no_page {
        PageForm::for_feature(&args.feature)
    } else {
        discover_form(&client, &url, &args.feature).await?
    };

    let submitter = match args.action.as_deref() {
        Some(action) => {
            let (name, value) = parse_field_args(&[action.to_string()])?
                .pop()
                .context("missing action")?;
            Some(Submitter::new(name, value))
        }
        None => None,
    };

    let submission = Submission {
        fields: parse_field_args(&args.fields)?,
        files: parse_field_args(&args.files)?
            .into_iter()
            .map(|(name, path)| (name, PathBuf::from(path)))
            .collect(),
        submitter,
    };

    let policy = if args.escape {
        ContentPolicy::Escaped
    } else {
        config.content_policy
    };
    let out_dir = args.out.unwrap_or_else(|| config.download_dir.clone());

    let page = Arc::new(MemoryPage::new());
    let ports = Ports::with_page(
        client,
        &page,
        Arc::new(MemoryClipboard::new()),
        Arc::new(DirectorySink::new(out_dir)),
    );
    let form_id = form.id.clone();
    let controller = FormController::new(ports, vec![form])
        .with_renderer(Renderer::new(policy))
        .with_copy_revert(config.copy_revert());

    eprintln!("Submitting to: {}", controller.endpoint(&form_id).unwrap_or("(none)"));

    match controller.submit(&form_id, submission).await {
        Ok(Outcome::Rendered(result)) => {
            let html = page.snapshot().results_html;
            output_result(&result, &html, args.format)?;
            save_images(&result, args.save_images.as_deref())?;
        }
        Ok(Outcome::Downloaded { filename, path }) => {
            println!("💾 Saved {filename} to {}", path.display());
        }
        Err(_) => {
            for alert in page.alerts() {
                eprintln!("❌ {alert}");
            }
            anyhow::bail!("submission failed");
        }
    }

    Ok(())
}

/// Find the page form for `feature`, falling back to a bare form when the
/// page doesn't have one.
async fn discover_form(client: &FormClient, url: &str, feature: &str) -> Result<PageForm> {
    let html = client
        .fetch_page(url)
        .await
        .with_context(|| format!("failed to fetch form page {url}"))?;
    let forms = PageForm::parse_all(&html)?;

    if let Some(form) = PageForm::find_by_feature(&forms, feature) {
        return Ok(form.clone());
    }

    warn!(feature, forms = forms.len(), "No form for feature on page; posting a bare form");
    Ok(PageForm::for_feature(feature))
}
