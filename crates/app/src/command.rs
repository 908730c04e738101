//! Command-line interface.

use std::path::PathBuf;

use catalog_domain::ProductId;
use clap::{Parser, Subcommand};

/// Catalog administration client.
#[derive(Debug, Parser)]
#[command(name = "catalog-admin", version)]
#[command(about = "Browse, import and delete products of the catalog service")]
#[command(
    after_help = "Environment:\n  CATALOG_CONFIG    Configuration file\n  CATALOG_BASE_URL  Product service URL\n  RUST_LOG          Log filter"
)]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List products
    List {
        /// Shareable link such as 'category=Books&page=2'
        query: Option<String>,
    },
    /// List the selectable categories
    Categories,
    /// Import products from a CSV, TSV or JSON file
    Import {
        /// File to import
        path: PathBuf,
    },
    /// Delete a product
    Delete {
        /// Product to delete
        id: ProductId,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("catalog-admin").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse(&["list"]).unwrap(), Command::List { query: None });
        assert_eq!(
            parse(&["list", "?search=lamp&page=2"]).unwrap(),
            Command::List {
                query: Some("?search=lamp&page=2".to_string())
            }
        );
        assert_eq!(parse(&["categories"]).unwrap(), Command::Categories);
        assert_eq!(
            parse(&["import", "products.csv"]).unwrap(),
            Command::Import {
                path: PathBuf::from("products.csv")
            }
        );
        assert_eq!(parse(&["delete", "42"]).unwrap(), Command::Delete { id: 42 });
    }

    #[test]
    fn test_parse_rejects_bad_invocations() {
        assert_eq!(
            parse(&["delete", "abc"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
        assert_eq!(
            parse(&["import"]).unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(
            parse(&["export"]).unwrap_err().kind(),
            ErrorKind::InvalidSubcommand
        );
        assert!(parse(&[]).is_err());
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
    }
}
