use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::Parser;
use serde::Deserialize;

use pagemark::config::load_app_config;
use pagemark::controller::{KeyPress, PointerEvent, SaveOutcome};
use pagemark::editor::Viewport;
use pagemark::export::{png_bytes_to_data_url, GlyphSource};
use pagemark::input::TextInputEvent;
use pagemark::overlay::{HeadlessHost, UiEvent};
use pagemark::state::SessionPhase;
use pagemark::storage::DownloadSink;
use pagemark::{logging, ActivationMessage, SessionController};

const SAVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Replays recorded overlay input against a screenshot and saves the
/// annotation through the download sink.
#[derive(Parser)]
#[command(name = "pagemark", version)]
struct Cli {
    /// PNG screenshot to annotate
    screenshot: PathBuf,

    /// JSON array of recorded input events
    events: PathBuf,

    /// Directory for the saved record and image (default: ~/Downloads/pagemark)
    out_dir: Option<PathBuf>,

    #[arg(long, default_value = "about:blank")]
    page_url: String,

    /// Defaults to the screenshot file name
    #[arg(long)]
    page_title: Option<String>,

    #[arg(long, default_value_t = 1920)]
    viewport_width: u32,

    #[arg(long, default_value_t = 1080)]
    viewport_height: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ReplayEvent {
    Pointer(PointerEvent),
    Key(KeyPress),
    Text(TextInputEvent),
    Ui(UiEvent),
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();
    let config = load_app_config();

    let png = std::fs::read(&cli.screenshot)
        .with_context(|| format!("failed to read screenshot {}", cli.screenshot.display()))?;
    let events_json = std::fs::read_to_string(&cli.events)
        .with_context(|| format!("failed to read events {}", cli.events.display()))?;
    let events: Vec<ReplayEvent> = serde_json::from_str(&events_json)
        .with_context(|| format!("failed to parse events {}", cli.events.display()))?;

    let sink = match cli.out_dir {
        Some(dir) => DownloadSink::with_dir(dir),
        None => DownloadSink::with_default_dir().context("no output directory available")?,
    };
    let page_title = cli.page_title.unwrap_or_else(|| {
        cli.screenshot
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let glyphs = GlyphSource::discover(config.font_path.as_deref());
    let host = HeadlessHost::new(Viewport::new(cli.viewport_width, cli.viewport_height));
    let mut controller = SessionController::new(host, Arc::new(sink), config, glyphs);

    let activation = ActivationMessage {
        screenshot: png_bytes_to_data_url(&png),
        page_url: cli.page_url,
        page_title,
    };
    controller
        .open(&activation)
        .context("failed to open annotation session")?;

    let mut outcome = None;
    for (index, event) in events.into_iter().enumerate() {
        let now = Instant::now();
        let result = match event {
            ReplayEvent::Pointer(pointer) => controller.handle_pointer(pointer),
            ReplayEvent::Key(press) => controller.handle_key(press, now).map(|_| ()),
            ReplayEvent::Text(input) => controller.text_input(input).map(|_| ()),
            ReplayEvent::Ui(ui) => controller.handle_ui(ui, now),
        };
        if let Err(err) = result {
            tracing::warn!(index, %err, "replayed event rejected");
        }
        if let Some(settled) = controller.tick(now) {
            outcome = Some(settled);
        }
        if !controller.is_active() {
            break;
        }
    }

    if outcome.is_none() && controller.phase() == SessionPhase::Active {
        controller
            .save(Instant::now())
            .context("failed to export annotation")?;
    }
    if outcome.is_none() && controller.is_saving() {
        outcome = controller.settle_save(SAVE_TIMEOUT, Instant::now());
    }
    controller.cleanup();

    match outcome {
        Some(SaveOutcome::Saved {
            id,
            receipt,
            skipped_text,
        }) => {
            println!("saved annotation {id}");
            if skipped_text > 0 {
                eprintln!(
                    "warning: {skipped_text} text annotation(s) missing from the image; set font_path in the config"
                );
            }
            for location in receipt.locations {
                println!("  {}", location.display());
            }
            Ok(())
        }
        Some(SaveOutcome::Failed { message, .. }) => bail!(message),
        None => bail!("session closed before the annotation was saved"),
    }
}
