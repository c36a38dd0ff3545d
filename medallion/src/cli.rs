// medallion/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medallion")]
#[command(about = "Bronze/Silver/Gold pipeline for marketplace sales exports", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the pipeline (Bronze -> Silver -> Gold)
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🧪 Checks the lookup tables for shadowed rules and overlapping ids
    Validate {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Exit with an error when a conflict is found
        #[arg(long)]
        strict: bool,
    },

    /// 🔎 Shows how one entity is renamed and classified
    Explain {
        /// Raw entity name, as exported
        #[arg(long)]
        name: String,

        /// Entity identifier
        #[arg(long)]
        id: i64,

        /// Project directory (for lookup overrides)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔍 Inspects a warehouse table (schema + sample rows)
    Inspect {
        /// Path to the DuckDB database file
        #[arg(long, default_value = "medallion.duckdb", env = "MEDALLION_WAREHOUSE")]
        db_path: String,

        /// Table name to inspect
        #[arg(long, short)]
        table: String,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// 🧹 Cleans build artifacts (target/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_run_defaults() -> Result<()> {
        let args = Cli::parse_from(["medallion", "run"]);
        match args.command {
            Commands::Run { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_validate_strict() -> Result<()> {
        let args = Cli::parse_from(["medallion", "validate", "--strict", "--project-dir", "/tmp"]);
        match args.command {
            Commands::Validate {
                project_dir,
                strict,
            } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
                assert!(strict);
                Ok(())
            }
            _ => bail!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_parse_explain() -> Result<()> {
        let args = Cli::parse_from([
            "medallion",
            "explain",
            "--name",
            "San Paolo Gelato - Amélia",
            "--id",
            "53018",
        ]);
        match args.command {
            Commands::Explain { name, id, .. } => {
                assert_eq!(name, "San Paolo Gelato - Amélia");
                assert_eq!(id, 53018);
                Ok(())
            }
            _ => bail!("Expected Explain command"),
        }
    }

    #[test]
    fn test_cli_explain_requires_numeric_id() {
        let parsed = Cli::try_parse_from(["medallion", "explain", "--name", "x", "--id", "abc"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_cli_parse_inspect() -> Result<()> {
        let args = Cli::parse_from([
            "medallion",
            "inspect",
            "--table",
            "gold_ifood",
            "--limit",
            "10",
            "--db-path",
            "warehouse.duckdb",
        ]);
        match args.command {
            Commands::Inspect {
                table,
                limit,
                db_path,
            } => {
                assert_eq!(table, "gold_ifood");
                assert_eq!(limit, 10);
                assert_eq!(db_path, "warehouse.duckdb");
                Ok(())
            }
            _ => bail!("Expected Inspect command"),
        }
    }
}
