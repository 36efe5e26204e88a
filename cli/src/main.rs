mod script;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use outfit_board::config::{BoardConfig, ConfigError};
use outfit_board::doc::{Item, ItemId, ItemStore};
use outfit_board::engine::{Board, BoardHost, HostInputs};
use outfit_board::image::ImageRef;
use outfit_board::snapshot::{self, SnapshotError};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::script::ScriptError;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("invalid images file: {0}")]
    Images(#[from] serde_json::Error),
    #[error("images file must hold a JSON array")]
    ImagesNotAnArray,
}

#[derive(Parser, Debug)]
#[command(name = "outfit", about = "Headless outfit board: replay edit scripts and inspect snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a script of host events and print the resulting item list.
    Replay(ReplayArgs),
    /// List the items of a snapshot in draw order.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[arg(long, help = "Board config JSON file")]
    config: Option<PathBuf>,

    #[arg(long, env = "OUTFIT_BOARD_WIDTH")]
    board_width: Option<f64>,

    #[arg(long, env = "OUTFIT_BOARD_HEIGHT")]
    board_height: Option<f64>,

    #[arg(long, env = "OUTFIT_GRID")]
    grid: Option<bool>,

    #[arg(long, env = "OUTFIT_GRID_SIZE")]
    grid_size: Option<f64>,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    config: ConfigArgs,

    #[arg(long, help = "Snapshot to start from")]
    state: Option<PathBuf>,

    #[arg(long, help = "JSON array of images to import at start")]
    images: Option<PathBuf>,

    #[arg(long, help = "Script file, or - for stdin")]
    script: String,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[arg(long)]
    state: PathBuf,
}

/// Logs what a live host would display.
struct LogHost;

impl BoardHost for LogHost {
    fn on_state_change(&mut self, items_json: &str) {
        debug!(bytes = items_json.len(), "state changed");
    }

    fn on_board_name_change(&mut self, name: &str) {
        info!(%name, "board renamed");
    }

    fn on_selection_change(&mut self, selected: Option<&ItemId>) {
        debug!(selected = ?selected.map(ItemId::as_str), "selection changed");
    }
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Replay(args) => run_replay(args),
        Command::Inspect(args) => run_inspect(&args),
    }
}

fn run_replay(args: ReplayArgs) -> Result<(), CliError> {
    let config = load_config(&args.config)?;

    let initial_state = args.state.as_deref().map(read_path).transpose()?;
    let input_images = match args.images.as_deref() {
        Some(path) => match serde_json::from_str::<Value>(&read_path(path)?)? {
            Value::Array(images) => images,
            _ => return Err(CliError::ImagesNotAnArray),
        },
        None => Vec::new(),
    };

    let text = if args.script == "-" { read_stdin()? } else { read_path(Path::new(&args.script))? };
    let events = script::parse(&text)?;

    let inputs = HostInputs { initial_state, input_images, export_trigger: false };
    let mut board = Board::initialize(config, &inputs, LogHost);
    let count = events.len();
    for event in events {
        event.apply(&mut board);
    }
    info!(events = count, items = board.items().len(), "replay complete");

    println!("{}", snapshot::serialize(board.items())?);
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<(), CliError> {
    let mut store = ItemStore::new();
    store.load_snapshot(snapshot::deserialize(&read_path(&args.state)?)?);
    for item in store.sorted_items() {
        println!("{}", describe(item));
    }
    Ok(())
}

fn describe(item: &Item) -> String {
    let image = match &item.image_ref {
        ImageRef::Url(url) => url.clone(),
        ImageRef::Asset(handle) => format!("asset:{handle}"),
    };
    let mut flags = Vec::new();
    if !item.visible {
        flags.push("hidden");
    }
    if item.flipped {
        flags.push("flipped");
    }
    format!(
        "{}\tz={}\t{},{}\t{}x{}\trot={}\topacity={}\t{}\t{}",
        item.id, item.z_index, item.x, item.y, item.width, item.height, item.rotation, item.opacity, flags.join(","), image
    )
}

fn load_config(args: &ConfigArgs) -> Result<BoardConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => BoardConfig::from_json(&read_path(path)?)?,
        None => BoardConfig::default(),
    };
    if let Some(width) = args.board_width {
        config.board_width = width;
    }
    if let Some(height) = args.board_height {
        config.board_height = height;
    }
    if let Some(grid) = args.grid {
        config.grid_enabled = grid;
    }
    if let Some(size) = args.grid_size {
        config.grid_size = size;
    }
    Ok(config)
}

fn read_path(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.display().to_string(), source })
}

fn read_stdin() -> Result<String, CliError> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .map_err(|source| CliError::Read { path: "stdin".to_owned(), source })?;
    Ok(text)
}
