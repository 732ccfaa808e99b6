use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use reelmark_api::Movie;
use reelmark_core::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "reelmark", version, about = "Show a movie and manage it as a favorite")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings that take precedence over the config file.
#[derive(Debug, Args)]
pub struct Overrides {
    #[arg(long, env = "TMDB_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "TMDB_SESSION_ID", global = true, hide_env_values = true)]
    pub session_id: Option<String>,

    #[arg(long, env = "TMDB_USER_ID", global = true)]
    pub user_id: Option<String>,

    #[arg(long, env = "TMDB_BASE_URL", global = true)]
    pub base_url: Option<String>,

    #[arg(long, env = "TMDB_IMAGE_BASE_URL", global = true)]
    pub image_base_url: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut AppConfig) {
        let pairs = [
            (&self.api_key, &mut config.session.api_key),
            (&self.session_id, &mut config.session.session_id),
            (&self.user_id, &mut config.session.user_id),
            (&self.base_url, &mut config.api.base_url),
            (&self.image_base_url, &mut config.api.image_base_url),
        ];
        for (value, slot) in pairs {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a movie's favorite status and poster.
    Show(MovieArgs),
    /// Mark a movie as a favorite.
    Favorite(MovieArgs),
    /// Remove a movie from favorites.
    Unfavorite(MovieArgs),
    /// Print the config file path and the effective settings.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the effective settings, overrides included, to the config file.
    #[arg(long)]
    pub save: bool,
}

#[derive(Debug, Args)]
pub struct MovieArgs {
    /// Movie id.
    #[arg(long)]
    pub id: u64,

    /// Title to display.
    #[arg(long, default_value = "")]
    pub title: String,

    /// Poster path on the image host, e.g. `/abc.jpg`.
    #[arg(long)]
    pub poster: Option<String>,
}

impl MovieArgs {
    pub fn into_movie(self) -> Movie {
        Movie::new(self.id, self.title, self.poster)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::try_parse_from([
            "reelmark", "show", "--id", "550", "--title", "Fight Club", "--poster", "/abc.jpg",
        ])
        .unwrap();
        match cli.command {
            Command::Show(args) => {
                assert_eq!(
                    args.into_movie(),
                    Movie::new(550, "Fight Club", Some("/abc.jpg".into()))
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "reelmark", "favorite", "--id", "550", "--user-id", "77", "--api-key", "k",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        cli.overrides.apply(&mut config);
        assert_eq!(config.session.user_id, "77");
        assert_eq!(config.session.api_key, "k");
        assert!(matches!(cli.command, Command::Favorite(_)));
    }

    #[test]
    fn test_parse_config_save() {
        let cli = Cli::try_parse_from(["reelmark", "config", "--save", "--session-id", "s"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigArgs { save: true })));
        assert_eq!(cli.overrides.session_id.as_deref(), Some("s"));

        let cli = Cli::try_parse_from(["reelmark", "config"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigArgs { save: false })));
    }

    #[test]
    fn test_id_is_required() {
        assert!(Cli::try_parse_from(["reelmark", "unfavorite"]).is_err());
    }
}
