use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brewdex")]
#[command(author, version, about, long_about = None)]
#[command(about = "Index Homebrew installs and find what was first installed when")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Index file location (default: <brew repository>/installs_index.json)
    #[arg(long, global = true)]
    pub index: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan installed formulae and casks and write the index
    Index {
        /// Enrich with history from GitHub
        #[arg(long)]
        enrich: bool,

        /// Index available (non-installed) packages from the last year
        #[arg(long)]
        available: bool,
    },

    /// Find packages installed for the first time between X and Y days ago
    Query {
        /// Older bound (days ago)
        x: i64,

        /// Newer bound (days ago)
        y: i64,

        /// Output raw JSON array
        #[arg(long)]
        json: bool,

        /// Show brew info for each match
        #[arg(long)]
        info: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_index_flags() {
        let cli = Cli::try_parse_from(["brewdex", "index", "--enrich", "--available"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Index {
                enrich: true,
                available: true
            }
        ));
    }

    #[test]
    fn parses_query_bounds_and_global_flags() {
        let cli = Cli::try_parse_from(["brewdex", "query", "30", "7", "--json", "-v", "--index", "/tmp/i.json"])
            .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.index, Some(PathBuf::from("/tmp/i.json")));
        match cli.command {
            Command::Query { x, y, json, info } => {
                assert_eq!((x, y), (30, 7));
                assert!(json);
                assert!(!info);
            }
            _ => panic!("expected query"),
        }
    }

    #[test]
    fn index_takes_no_positionals() {
        assert!(Cli::try_parse_from(["brewdex", "index", "extra"]).is_err());
    }

    #[test]
    fn query_needs_both_bounds() {
        assert!(Cli::try_parse_from(["brewdex", "query", "30"]).is_err());
    }
}
