//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use designdeck_core::{ProductKind, ProjectId, SocialPlatform};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "designdeck")]
#[command(about = "Create and inspect DesignDeck documents")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding saved projects
    #[arg(long, env = "DESIGNDECK_STORAGE_DIR", global = true)]
    pub storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a document for a product type
    New(NewArgs),
    /// Expand a template file with field values
    Instantiate(InstantiateArgs),
    /// List the built-in templates
    Templates {
        /// Only templates for this product type
        #[arg(long)]
        kind: Option<ProductKind>,
        /// Only social templates for this platform
        #[arg(long)]
        platform: Option<SocialPlatform>,
    },
    /// List saved projects, newest first
    Projects,
    /// Print a saved project
    Show { id: ProjectId },
    /// Delete a saved project
    Delete { id: ProjectId },
}

#[derive(Debug, Clone, Args)]
pub struct NewArgs {
    /// travel-ad, logo, social or cv
    pub variant: ProductKind,

    /// Target platform for social posts
    #[arg(long)]
    pub platform: Option<SocialPlatform>,

    /// Start from this template among the variant's choices
    #[arg(long)]
    pub template: Option<usize>,

    /// Organization profile JSON used to fill template fields
    #[arg(long)]
    pub organization: Option<PathBuf>,

    /// Project name
    #[arg(long)]
    pub name: Option<String>,

    /// Save to the project directory instead of printing
    #[arg(long, conflicts_with = "out")]
    pub save: bool,

    /// Write the canvas JSON to a file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct InstantiateArgs {
    /// Template JSON file
    pub template: PathBuf,

    /// JSON object of field values
    #[arg(long)]
    pub fields: Option<PathBuf>,

    /// Field value, overriding --fields
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub assignments: Vec<(String, String)>,

    /// Write the canvas JSON to a file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new() {
        let cli = Cli::try_parse_from(["designdeck", "new", "social", "--platform", "twitter", "--save"]).unwrap();
        let Command::New(args) = cli.command else {
            panic!("expected new");
        };
        assert_eq!(args.variant, ProductKind::Social);
        assert_eq!(args.platform, Some(SocialPlatform::Twitter));
        assert!(args.save);
    }

    #[test]
    fn test_save_conflicts_with_out() {
        let result = Cli::try_parse_from(["designdeck", "new", "logo", "--save", "--out", "x.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_variant() {
        assert!(Cli::try_parse_from(["designdeck", "new", "poster"]).is_err());
    }

    #[test]
    fn test_assignments() {
        let cli = Cli::try_parse_from([
            "designdeck",
            "instantiate",
            "t.json",
            "--set",
            "name=Sara",
            "--set",
            "price=€ 499",
        ])
        .unwrap();
        let Command::Instantiate(args) = cli.command else {
            panic!("expected instantiate");
        };
        assert_eq!(
            args.assignments,
            vec![
                ("name".to_string(), "Sara".to_string()),
                ("price".to_string(), "€ 499".to_string())
            ]
        );
        assert_eq!(parse_assignment("=x"), Err("expected NAME=VALUE, got '=x'".to_string()));
    }
}
