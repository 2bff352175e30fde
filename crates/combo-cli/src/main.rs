use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use combo_core::config::load_item_labels;
use combo_core::item::items_from_labels;
use combo_core::{ComboConfig, Mode};

/// combo: an editable combo box with pill tokens, in the terminal.
///
/// Type to filter the list, open it with the arrow keys, pick one item or
/// several, and press Enter on new text to add it to the list.
#[derive(Parser, Debug)]
#[command(name = "combo", version, about)]
struct Cli {
    /// Selection mode: `single` or `multi` (overrides the config file).
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Text shown while the field is empty.
    #[arg(short, long)]
    placeholder: Option<String>,

    /// Start with the combo box disabled.
    #[arg(long)]
    disabled: bool,

    /// Load item labels from a JSON array or a TOML file with `items = [...]`.
    #[arg(short, long)]
    items: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging.
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Log to a file so the alternate screen stays clean. If the file can't
    // be opened, logs are discarded.
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("combo");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_path = log_dir.join("combo.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path);

    match log_file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
                )
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("off"))
                .with_writer(std::io::sink)
                .init();
        }
    }

    // Load config.
    let config = ComboConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
        ComboConfig::default()
    });

    tracing::info!("Starting combo v{}", env!("CARGO_PKG_VERSION"));

    let mut options = config.widget.to_options();
    if let Some(mode) = cli.mode {
        options.mode = mode;
    }
    if let Some(placeholder) = cli.placeholder {
        options.placeholder = placeholder;
    }
    if cli.disabled {
        options.disabled = true;
    }
    if let Some(ref path) = cli.items {
        let labels = load_item_labels(path)
            .with_context(|| format!("failed to load items from {}", path.display()))?;
        tracing::info!(count = labels.len(), path = %path.display(), "loaded items");
        options.items = items_from_labels(labels);
    }

    // Start the TUI.
    let mut app = combo_tui::App::new(options, &config.ui);
    app.run().await?;

    tracing::info!("combo exited cleanly");
    Ok(())
}
