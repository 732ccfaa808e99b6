mod cli;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use reelmark_api::Movie;
use reelmark_core::config::AppConfig;
use reelmark_core::screen::DetailScreen;
use reelmark_core::view::{run_view, HeadlessView};
use reelmark_core::CoreError;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging.filter);

    match run(cli.command, cli.config, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, CoreError> {
    let mut config = match &cli.config {
        Some(path) if path.exists() => AppConfig::load_from(path)?,
        Some(_) => AppConfig::default(),
        None => AppConfig::load()?,
    };
    cli.overrides.apply(&mut config);
    Ok(config)
}

/// `RUST_LOG` wins over the configured filter. Logs go to stderr so stdout
/// stays clean for the screen output.
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(
    command: Command,
    config_path: Option<PathBuf>,
    config: AppConfig,
) -> Result<(), CoreError> {
    match command {
        Command::Show(args) => show(&config, args.into_movie(), None).await,
        Command::Favorite(args) => show(&config, args.into_movie(), Some(true)).await,
        Command::Unfavorite(args) => show(&config, args.into_movie(), Some(false)).await,
        Command::Config(args) => {
            if args.save {
                match &config_path {
                    Some(path) => config.save_to(path)?,
                    None => config.save()?,
                }
                tracing::info!("Config saved");
            }
            let path = config_path.unwrap_or_else(AppConfig::config_path);
            println!("# {}", path.display());
            let rendered = toml::to_string_pretty(&config.redacted())
                .map_err(|e| CoreError::Config(e.to_string()))?;
            print!("{rendered}");
            Ok(())
        }
    }
}

/// Open the detail screen for `movie`, optionally press one of the favorite
/// buttons, then print what the screen ended up showing.
async fn show(config: &AppConfig, movie: Movie, toggle: Option<bool>) -> Result<(), CoreError> {
    let client = Arc::new(config.tmdb_client()?);
    let (tx, rx) = mpsc::unbounded_channel();

    let mut screen = DetailScreen::new(client, movie, tx);
    screen.appear().settled().await;
    let toggled = match toggle {
        Some(favorite) => Some(screen.toggle_favorite(favorite).await),
        None => None,
    };
    drop(screen);

    let view = run_view(rx, HeadlessView::default()).await;
    print_view(&view);

    match toggled {
        Some(Err(e)) => Err(e),
        Some(Ok(None)) => {
            eprintln!("warning: the server did not confirm the change");
            Ok(())
        }
        _ => Ok(()),
    }
}

fn print_view(view: &HeadlessView) {
    println!("title:    {}", view.title.as_deref().unwrap_or(""));
    println!("status:   {}", view.status());

    let mut controls = Vec::new();
    if view.controls.add_visible {
        controls.push("add");
    }
    if view.controls.remove_visible {
        controls.push("remove");
    }
    println!("controls: [{}]", controls.join(", "));

    match &view.poster {
        Some(poster) => println!(
            "poster:   {}x{} ({} bytes)",
            poster.width,
            poster.height,
            poster.raw.len()
        ),
        None => println!("poster:   none"),
    }
}
