use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use uni_core::FilterDimension;

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(name = "uni")]
#[command(about = "UNI CLI - browse, filter and bookmark unicorn companies", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the UNI web API
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the companies that pass the current filters
    List,
    /// Print the options offered for a filter (cities, industries, investors)
    Options { dimension: FilterDimension },
    /// Inspect or change the persisted filter selection
    Filter {
        #[command(subcommand)]
        action: FilterAction,
    },
    /// Manage the signed-in user's saved companies
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    /// Keep saved items in sync and print every change until Ctrl-C
    Watch,
}

#[derive(Subcommand)]
enum FilterAction {
    /// Select or deselect a value
    Toggle {
        dimension: FilterDimension,
        value: String,
    },
    /// Clear every filter and turn favorites-only off
    Clear,
    /// Show only saved companies
    Favorites { state: Switch },
    /// Print the current selection
    Show,
}

#[derive(Subcommand)]
enum SavedAction {
    /// Print saved company names
    List,
    /// Save a company
    Add { name: String },
    /// Remove a saved company
    Remove { name: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config, cli.api_url)?;
    bootstrap::init_tracing(&config.log_level);
    let usecase = bootstrap::build_usecase(&config)?;
    let identity = config.identity();

    let result = match cli.command {
        Commands::List => commands::list::run(&usecase, identity).await,
        Commands::Options { dimension } => commands::options::run(&usecase, dimension).await,
        Commands::Filter { action } => match action {
            FilterAction::Toggle { dimension, value } => {
                commands::filter::toggle(&usecase, dimension, &value)
            }
            FilterAction::Clear => commands::filter::clear(&usecase),
            FilterAction::Favorites { state } => {
                commands::filter::favorites(&usecase, matches!(state, Switch::On))
            }
            FilterAction::Show => commands::filter::show(&usecase),
        },
        Commands::Saved { action } => match action {
            SavedAction::List => commands::saved::list(&usecase, identity).await,
            SavedAction::Add { name } => commands::saved::add(&usecase, identity, &name).await,
            SavedAction::Remove { name } => {
                commands::saved::remove(&usecase, identity, &name).await
            }
        },
        Commands::Watch => commands::watch::run(&usecase, identity).await,
    };

    usecase.shutdown();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_filter_toggle() {
        let cli = Cli::parse_from(["uni", "filter", "toggle", "city", "Berlin"]);
        match cli.command {
            Commands::Filter {
                action: FilterAction::Toggle { dimension, value },
            } => {
                assert_eq!(dimension, FilterDimension::Cities);
                assert_eq!(value, "Berlin");
            }
            _ => panic!("expected filter toggle"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_dimension() {
        assert!(Cli::try_parse_from(["uni", "options", "countries"]).is_err());
    }

    #[test]
    fn test_parse_global_api_url() {
        let cli = Cli::parse_from(["uni", "saved", "add", "Stripe", "--api-url", "http://api.test"]);
        assert_eq!(cli.api_url.as_deref(), Some("http://api.test"));
        assert!(matches!(
            cli.command,
            Commands::Saved {
                action: SavedAction::Add { ref name }
            } if name == "Stripe"
        ));
    }
}
