use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use voicestar::capture::Recorder;
use voicestar::preview::PreviewPlayer;
use voicestar::{
    CatalogStore, Category, CategoryFilter, Config, ConversionController, HttpVoiceService,
    UploadStage, UploadValidator,
};

/// Voicestar - convert your voice to a celebrity's
#[derive(Parser)]
#[command(name = "voicestar", version, about)]
struct Cli {
    /// Conversion service base URL
    #[arg(long, env = "VOICESTAR_SERVER_URL")]
    server_url: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available celebrity voices
    List {
        /// Filter by category (bollywood, tollywood, kollywood, regional)
        #[arg(long)]
        category: Option<String>,

        /// Search by name or voice characteristic
        #[arg(long)]
        search: Option<String>,
    },
    /// Convert an audio file to a celebrity's voice
    Convert {
        /// Celebrity identifier (see `list`)
        #[arg(short, long)]
        celebrity: String,

        /// Audio file to convert (mp3, wav, m4a, aac, ogg, flac)
        file: PathBuf,
    },
    /// Record from the microphone and convert
    Record {
        /// Celebrity identifier (see `list`)
        #[arg(short, long)]
        celebrity: String,

        /// Recording length in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Play a celebrity's reference voice sample
    Preview {
        /// Celebrity identifier (see `list`)
        celebrity: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,voicestar=info",
        1 => "info,voicestar=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.server_url.as_deref());
    let service = Arc::new(HttpVoiceService::new(&config.server_url));

    match cli.command {
        Command::List { category, search } => {
            let mut catalog = CatalogStore::new();
            catalog.load(service.as_ref()).await?;

            if let Some(tag) = category {
                let category = Category::parse(&tag)
                    .with_context(|| format!("unknown category: {tag}"))?;
                catalog.set_category(CategoryFilter::Only(category));
            }
            if let Some(query) = search {
                catalog.set_query(query);
            }

            let visible = catalog.visible();
            println!("{} celebrity voices:", visible.len());
            for celebrity in visible {
                println!(
                    "  {:24} {:12} {}",
                    celebrity.id,
                    celebrity.category,
                    celebrity.voice_characteristics.join(", ")
                );
            }
        }

        Command::Convert { celebrity, file } => {
            let mut stage = UploadStage::new(UploadValidator::new(config.max_upload_bytes));
            stage.stage_file(&file)?;
            let audio = stage.take().context("no staged file")?;

            let artifact = convert(&config, service, &celebrity, &audio).await?;
            println!("{artifact}");
        }

        Command::Record {
            celebrity,
            duration,
        } => {
            let mut recorder = Recorder::new()?;
            recorder.start()?;
            eprintln!("recording for {duration}s...");
            while recorder.elapsed_secs() < duration {
                tokio::time::sleep(Duration::from_millis(250)).await;
            }
            let result = recorder.stop()?;
            eprintln!("recorded {}s", result.duration_secs);

            let artifact = convert(&config, service, &celebrity, &result.audio).await?;
            println!("{artifact}");
        }

        Command::Preview { celebrity } => {
            let mut catalog = CatalogStore::new();
            catalog.load(service.as_ref()).await?;
            let target = catalog
                .get(&celebrity)
                .with_context(|| format!("unknown celebrity: {celebrity}"))?;

            let mut player = PreviewPlayer::new(&config.server_url);
            if !player.toggle(target).await {
                anyhow::bail!("preview unavailable for {celebrity}");
            }
        }
    }

    Ok(())
}

/// Run a conversion through the workflow controller, echoing progress
async fn convert(
    config: &Config,
    service: Arc<HttpVoiceService>,
    celebrity: &str,
    audio: &voicestar::AudioPayload,
) -> anyhow::Result<String> {
    let controller =
        ConversionController::new(service, &config.server_url, config.progress);
    controller.select_target(celebrity);

    let mut rx = controller.subscribe();
    let progress = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            if snapshot.state == voicestar::JobState::Submitting {
                eprint!("\rconverting... {:3}%", snapshot.progress);
            }
        }
    });

    let result = controller.submit(audio).await;
    progress.abort();
    eprintln!();

    Ok(result?)
}
