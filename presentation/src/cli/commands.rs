//! CLI command definitions
//!
//! One parser per recipe binary. Only pr-visualization takes a flag; the
//! others exist so every binary answers `--help` and `--version`.

use clap::Parser;

const CONFIG_HELP: &str = r#"
Configuration is loaded from (in priority order):
1. COPILOT_RECIPES_* environment variables (e.g. COPILOT_RECIPES_CLIENT__CLI_URL)
2. ./recipes.toml or ./.recipes.toml
3. ~/.config/copilot-recipes/config.toml
"#;

/// CLI arguments for the error-handling recipe
#[derive(Parser, Debug)]
#[command(name = "error-handling")]
#[command(author, version, about = "Send one prompt and print the first reply")]
#[command(after_help = CONFIG_HELP)]
pub struct ErrorHandlingCli {}

/// CLI arguments for the managing-local-files recipe
#[derive(Parser, Debug)]
#[command(name = "managing-local-files")]
#[command(
    author,
    version,
    about = "Ask Copilot to organize a folder by file type, streaming tool activity"
)]
#[command(after_help = CONFIG_HELP)]
pub struct ManagingLocalFilesCli {}

/// CLI arguments for the multiple-sessions recipe
#[derive(Parser, Debug)]
#[command(name = "multiple-sessions")]
#[command(
    author,
    version,
    about = "Run three independent conversations on one client"
)]
#[command(after_help = CONFIG_HELP)]
pub struct MultipleSessionsCli {}

/// CLI arguments for the persisting-sessions recipe
#[derive(Parser, Debug)]
#[command(name = "persisting-sessions")]
#[command(
    author,
    version,
    about = "Create, resume, list and delete a session with a fixed identifier"
)]
#[command(after_help = CONFIG_HELP)]
pub struct PersistingSessionsCli {}

/// CLI arguments for the pr-visualization recipe
#[derive(Parser, Debug)]
#[command(name = "pr-visualization")]
#[command(author, version, about = "Chart the age of a repository's open pull requests")]
#[command(long_about = r#"
Analyzes the open pull requests of a GitHub repository and asks Copilot to
render an age chart, then keeps the conversation open for follow-ups.

The repository is taken from --repo, else from the `origin` remote of the
current git repository, else it is asked for interactively.

Example:
  pr-visualization --repo rust-lang/cargo
"#)]
#[command(after_help = CONFIG_HELP)]
pub struct PrVisualizationCli {
    /// GitHub repository to analyze
    #[arg(long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parsers_are_well_formed() {
        ErrorHandlingCli::command().debug_assert();
        ManagingLocalFilesCli::command().debug_assert();
        MultipleSessionsCli::command().debug_assert();
        PersistingSessionsCli::command().debug_assert();
        PrVisualizationCli::command().debug_assert();
    }

    #[test]
    fn test_repo_flag() {
        let cli = PrVisualizationCli::try_parse_from(["pr-visualization", "--repo", "acme/widgets"])
            .unwrap();
        assert_eq!(cli.repo.as_deref(), Some("acme/widgets"));

        let cli = PrVisualizationCli::try_parse_from(["pr-visualization"]).unwrap();
        assert!(cli.repo.is_none());
    }

    #[test]
    fn test_flagless_recipes_reject_arguments() {
        assert!(ErrorHandlingCli::try_parse_from(["error-handling", "--repo", "x/y"]).is_err());
        assert!(MultipleSessionsCli::try_parse_from(["multiple-sessions", "extra"]).is_err());
    }
}
