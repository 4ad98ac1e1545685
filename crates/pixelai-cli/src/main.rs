use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod app;
mod commands;
mod theme;

#[derive(Parser)]
#[command(name = "pixelai")]
#[command(about = "PixelAI - terminal chat for Google's Gemini models")]
#[command(version)]
struct Cli {
    /// Send a single prompt, print the reply and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Image to attach to the single prompt (repeatable)
    #[arg(long = "image", value_name = "PATH")]
    images: Vec<PathBuf>,

    /// File to attach to the single prompt (repeatable; shown locally, not uploaded)
    #[arg(long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Start with the light theme
    #[arg(long)]
    light: bool,

    /// Start with the conversation list hidden
    #[arg(long)]
    no_sidebar: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = pixelai_core::Settings::load();

    if let Some(ref model) = cli.model {
        settings.api.model = model.clone();
    }
    if cli.light {
        settings.ui.dark_mode = false;
    }
    if cli.no_sidebar {
        settings.ui.sidebar_open = false;
    }

    if let Some(prompt) = cli.prompt {
        let attachments: Vec<PathBuf> = cli.images.into_iter().chain(cli.files).collect();
        app::run_single_prompt(&settings, &prompt, &attachments).await?;
    } else {
        app::run_repl(settings).await?;
    }

    Ok(())
}
