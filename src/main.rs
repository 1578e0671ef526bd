//! `docform` CLI - Submit the conversion app's forms from a terminal

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "docform")]
#[command(about = "Submit document-conversion forms and render their results")]
#[command(version)]
struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// How a JSON result is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The HTML placed in the results panel
    Html,
    /// Panel HTML flattened to terminal text
    Text,
    /// The decoded result as JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the forms on a page and their API endpoints
    Forms {
        /// Page URL holding the forms (defaults to the configured base_url)
        url: Option<String>,
    },

    /// Submit a form and render or download the response
    Submit {
        /// Page URL holding the forms, also the base for /api/ endpoints
        /// (defaults to the configured base_url)
        url: Option<String>,

        /// Feature the form targets (e.g. text, metadata, docx-to-md)
        #[arg(short = 'F', long)]
        feature: String,

        /// Form field as name=value (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// File for a file control as name=path (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,

        /// Submit control as name=value (e.g. preview=true)
        #[arg(short, long)]
        action: Option<String>,

        /// Output format for JSON results
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Directory for downloaded files
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Decode image results into this directory
        #[arg(long)]
        save_images: Option<PathBuf>,

        /// HTML-escape server strings in rendered output
        #[arg(long)]
        escape: bool,

        /// Skip fetching the page; post straight to /api/<feature>
        #[arg(long)]
        no_page: bool,
    },

    /// Render a saved JSON response
    Render {
        /// File holding the JSON body
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "html")]
        format: OutputFormat,

        /// HTML-escape server strings
        #[arg(long)]
        escape: bool,
    },

    /// List the features the web app serves
    Features,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    match cli.command {
        Commands::Forms { url } => {
            cmd::forms::cmd_forms(url).await?;
        }
        Commands::Submit {
            url,
            feature,
            fields,
            files,
            action,
            format,
            out,
            save_images,
            escape,
            no_page,
        } => {
            cmd::submit::cmd_submit(cmd::submit::SubmitArgs {
                url,
                feature,
                fields,
                files,
                action,
                format,
                out,
                save_images,
                escape,
                no_page,
            })
            .await?;
        }
        Commands::Render { file, format, escape } => {
            cmd::render::cmd_render(&file, format, escape)?;
        }
        Commands::Features => {
            cmd::features::cmd_features();
        }
    }

    Ok(())
}
