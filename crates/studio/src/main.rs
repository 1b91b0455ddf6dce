//! `p2f` -- prompt-to-film command line front end.
//!
//! Generates clips through the Veo service, keeps a local library of
//! finished projects and lets it be reordered, cleared or exported.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default          | Description                           |
//! |--------------------------|----------|------------------|---------------------------------------|
//! | `API_KEY`                | no       | --               | Credential; otherwise use `p2f key`   |
//! | `VEO_API_URL`            | no       | public           | Service base URL                      |
//! | `VEO_MODEL`              | no       | Veo 3.1 fast     | Model id                              |
//! | `POLL_INTERVAL_SECS`     | no       | `10`             | Seconds between status queries (> 0)  |
//! | `P2F_DATA_DIR`           | no       | `.prompt2film`   | Library and key location              |
//! | `P2F_RECHECK_CREDENTIAL` | no       | `false`          | Verify the key after `p2f key`        |

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use p2f_core::request::{AspectRatio, GenerationRequest, Resolution, VideoDuration, VideoStyle};
use p2f_library::export::DEFAULT_MANIFEST_NAME;
use p2f_library::kv::FileKvStore;
use p2f_library::ProjectStore;
use p2f_pipeline::{GenerationWorkflow, PollConfig};
use p2f_studio::config::StudioConfig;
use p2f_studio::{Phase, Studio, StudioOptions};
use p2f_veo::api::VeoApi;
use p2f_veo::credentials::{CredentialGate, KeyFileHost};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "p2f", version, about = "Turn text prompts into short video clips")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a clip and add it to the library.
    Generate {
        prompt: String,
        #[arg(long, default_value_t = AspectRatio::Landscape)]
        aspect_ratio: AspectRatio,
        #[arg(long, default_value_t = Resolution::Hd720)]
        resolution: Resolution,
        #[arg(long, default_value_t = VideoStyle::None)]
        style: VideoStyle,
        #[arg(long, default_value_t = VideoDuration::Medium)]
        duration: VideoDuration,
    },
    /// List library projects, newest first unless reordered.
    List,
    /// Move the project at FROM to position TO (0-based).
    Move { from: usize, to: usize },
    /// Delete the whole library.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Write the library manifest as JSON.
    Export { path: Option<PathBuf> },
    /// Select an API key.
    Key,
    /// Show credential and library status.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "p2f=info,p2f_studio=info,p2f_pipeline=info,p2f_library=warn,p2f_veo=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = StudioConfig::from_env()?;

    let mut studio = build_studio(&config).await?;

    match cli.command {
        Command::Generate {
            prompt,
            aspect_ratio,
            resolution,
            style,
            duration,
        } => {
            let request = GenerationRequest::new(&prompt)?
                .with_aspect_ratio(aspect_ratio)
                .with_resolution(resolution)
                .with_style(style)
                .with_duration(duration);
            run_generate(&mut studio, request).await?;
        }
        Command::List => {
            for (index, project) in studio.projects().iter().enumerate() {
                println!(
                    "{index:>3}  {}  {}  {}",
                    project.id,
                    project.timestamp.format("%Y-%m-%d %H:%M"),
                    project.prompt,
                );
            }
        }
        Command::Move { from, to } => {
            if studio.move_project(from, to)? {
                println!("Moved clip {from} to position {to}");
            } else {
                println!("Nothing to move");
            }
        }
        Command::Clear { yes } => {
            let cleared =
                studio.clear_library(|| yes || confirm("Permanently delete your master library?"))?;
            if cleared {
                println!("Library cleared");
            }
        }
        Command::Export { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_NAME));
            studio.export_manifest(&path)?;
            println!("Wrote {}", path.display());
        }
        Command::Key => {
            if config.api_key.is_some() {
                println!("API_KEY is set in the environment; unset it to select a key");
            } else {
                studio.request_credential().await;
                // Only a recheck reflects whether a key was stored.
                if config.recheck_credential && studio.state().needs_credential {
                    println!("No key selected");
                }
            }
        }
        Command::Status => {
            let state = studio.state();
            println!(
                "credential: {}",
                if state.needs_credential { "missing" } else { "ready" }
            );
            println!("projects:   {}", studio.projects().len());
        }
    }

    Ok(())
}

async fn build_studio(config: &StudioConfig) -> anyhow::Result<Studio> {
    let kv = FileKvStore::open(&config.data_dir)
        .with_context(|| format!("opening data dir {}", config.data_dir.display()))?;
    let library = ProjectStore::load(Arc::new(kv));

    // Without a static credential the key file acts as the selection dialog.
    let gate = match &config.api_key {
        Some(key) => CredentialGate::with_static(Some(key.clone())),
        None => CredentialGate::with_static(None)
            .with_host(Arc::new(KeyFileHost::new(config.key_file()))),
    };

    let api = Arc::new(VeoApi::new(config.api_url.clone(), config.model.clone()));
    let workflow = GenerationWorkflow::new(
        api,
        gate,
        PollConfig {
            interval: config.poll_interval,
        },
    );

    let options = StudioOptions {
        recheck_credential_after_select: config.recheck_credential,
    };
    Ok(Studio::open(workflow, library, options).await)
}

async fn run_generate(studio: &mut Studio, request: GenerationRequest) -> anyhow::Result<()> {
    if studio.state().phase() == Phase::NeedsCredential {
        anyhow::bail!("An API credential is required: run `p2f key` or set API_KEY");
    }

    let mut updates = studio.subscribe();
    let printer = tokio::spawn(async move {
        let mut last = String::new();
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.is_generating && state.progress_message != last {
                eprintln!("{}", state.progress_message);
                last = state.progress_message;
            }
        }
    });

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = studio.generate_with_cancel(request, &cancel).await;
    printer.abort();

    let project = result?;
    println!("{}", project.url);
    println!("Saved as project {}", project.id);
    Ok(())
}

fn confirm(question: &str) -> bool {
    print!("{question} [y/N] ");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
