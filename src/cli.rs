//! Command-line argument parsing
//!
//! Subcommands exercise the library headlessly:
//! - `find` fills the find-results tree from files and prints it
//! - `links` lists URLs the hover detector would highlight
//! - `preview` renders the markdown preview sidebar's HTML
//! - `convert` re-saves a file in another encoding

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "textdock", version, about = "Editor sidebars and widget tools")]
pub struct CliArgs {
    /// Encoding to read input files with (detected when omitted)
    #[arg(long, global = true, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search files and print the results tree
    Find {
        query: String,
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,
        /// Treat the query as a regular expression
        #[arg(short = 'r', long)]
        regex: bool,
        #[arg(short = 'i', long)]
        ignore_case: bool,
        #[arg(short = 'w', long)]
        whole_word: bool,
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// List URLs found in a file
    Links {
        file: PathBuf,
        /// Open the Nth link (1-based) in the default browser
        #[arg(long, value_name = "N")]
        open: Option<usize>,
    },
    /// Render a markdown file to HTML
    Preview {
        file: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short = 'o', long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
    /// Re-save a file in another encoding
    Convert {
        file: PathBuf,
        #[arg(long, value_name = "LABEL")]
        to: String,
        /// Target path (defaults to overwriting the input)
        #[arg(short = 'o', long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_find() {
        let args = CliArgs::parse_from(["textdock", "find", "-i", "todo", "a.txt", "b.txt"]);
        match args.command {
            Command::Find {
                query,
                files,
                ignore_case,
                regex,
                ..
            } => {
                assert_eq!(query, "todo");
                assert_eq!(files.len(), 2);
                assert!(ignore_case);
                assert!(!regex);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_find_requires_files() {
        assert!(CliArgs::try_parse_from(["textdock", "find", "todo"]).is_err());
    }

    #[test]
    fn test_global_encoding_after_subcommand() {
        let args = CliArgs::parse_from(["textdock", "links", "x.txt", "--encoding", "latin1"]);
        assert_eq!(args.encoding.as_deref(), Some("latin1"));
    }
}
