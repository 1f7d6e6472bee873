use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cachegrid_core::{FileStore, GameConfig, World};
use cachegrid_term::{App, GameModel, ScreenRenderer, Terminal};

/// Walk the grid, collect tokens, combine them into the goal token.
#[derive(Parser, Debug)]
#[command(name = "cachegrid", version, about)]
struct Args {
    /// JSON file overriding game settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the game is saved.
    #[arg(long, default_value = "cachegrid-save.json")]
    save: PathBuf,

    /// Directory for cachegrid.log.
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,

    /// Start a new game even if a save exists.
    #[arg(long)]
    fresh: bool,

    /// Leave the mouse to the terminal (no clicking on caches).
    #[arg(long)]
    no_mouse: bool,
}

/// Log to a file; the terminal belongs to the game. `RUST_LOG` overrides
/// the default filter.
fn setup_file_logging(dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::never(dir, "cachegrid.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cachegrid_core=info,cachegrid_term=info,cachegrid=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    guard
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.log_dir)?;
    let _guard = setup_file_logging(&args.log_dir);

    let config = match &args.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    let mut store = FileStore::new(&args.save);

    let (width, height) = Terminal::size()?;
    let mut world = World::new(config, ScreenRenderer::new(), 1, 1);
    if args.fresh {
        log::info!("starting fresh, ignoring {}", store.path().display());
    } else if !world.load(&store)? {
        log::info!("no saved game at {}", store.path().display());
    }

    let driver = Terminal::new().with_mouse(!args.no_mouse);
    let mut app = App::new(GameModel::new(world), driver, width, height);
    let result = app.run();
    let world = app.into_model().into_world();
    world.save(&mut store)?;
    if let Err(e) = &result {
        log::error!("game loop failed: {e}");
    }
    result
}
