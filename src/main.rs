use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use textdock::editor::hover::{find_links, SystemBrowser, UrlOpener};
use textdock::model::{Document, DocumentRegistry};
use textdock::search::{find_all, SearchOptions};
use textdock::sidebars::{ItemRole, ItemValue, MarkdownSidebar, NodeRef, ResultsTree, TreeModel};
use textdock::EditorConfig;

mod cli;

use cli::{CliArgs, Command};

fn main() -> Result<()> {
    textdock::tracing::init();

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => EditorConfig::load_from(path),
        None => EditorConfig::load(),
    };
    let encoding = args.encoding.as_deref();

    match args.command {
        Command::Find {
            query,
            files,
            regex,
            ignore_case,
            whole_word,
            json,
        } => {
            let options = SearchOptions {
                case_sensitive: !ignore_case,
                whole_word,
                regex,
            };
            let mut registry = DocumentRegistry::new();
            let mut tree = ResultsTree::new();

            for path in &files {
                let document = open_document(path, encoding, &config)?;
                let id = registry.insert(document);
                let Some(document) = registry.get(id) else {
                    continue;
                };
                let matches = find_all(&document.buffer.to_string(), &query, options)?;
                if !matches.is_empty() {
                    tree.add_results(document, &matches);
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&tree.snapshot())?);
            } else {
                print_tree(&tree)?;
            }
        }
        Command::Links { file, open } => {
            let document = open_document(&file, encoding, &config)?;
            let text = document.buffer.to_string();
            let links = find_links(&text);

            for (n, &(start, end)) in links.iter().enumerate() {
                println!("{:>3}  {}..{}  {}", n + 1, start, end, document.text_range(start, end));
            }

            if let Some(n) = open {
                let &(start, end) = n
                    .checked_sub(1)
                    .and_then(|idx| links.get(idx))
                    .ok_or_else(|| anyhow!("no link #{} (found {})", n, links.len()))?;
                SystemBrowser.open_url(&document.text_range(start, end));
            }
        }
        Command::Preview { file, output } => {
            let document = open_document(&file, encoding, &config)?;
            let mut sidebar = MarkdownSidebar::new(config.preview_theme.clone());
            sidebar.load(&document);

            match output {
                Some(out) => std::fs::write(&out, sidebar.html())
                    .with_context(|| format!("writing {}", out.display()))?,
                None => std::io::stdout().write_all(sidebar.html().as_bytes())?,
            }
        }
        Command::Convert { file, to, output } => {
            let mut document = open_document(&file, encoding, &config)?;
            let from = document.encoding.name();
            let target = output.unwrap_or_else(|| file.clone());
            document
                .save_to_file(&target, Some(&to))
                .with_context(|| format!("saving {}", target.display()))?;
            eprintln!(
                "{}: {} -> {} ({})",
                file.display(),
                from,
                document.encoding.name(),
                target.display()
            );
        }
    }

    Ok(())
}

fn open_document(path: &Path, encoding: Option<&str>, config: &EditorConfig) -> Result<Document> {
    Document::from_file(path, encoding, config.eol_mode)
        .with_context(|| format!("opening {}", path.display()))
}

/// Walk the tree through the same interface a tree view would use
fn print_tree(tree: &ResultsTree) -> Result<()> {
    let mut out = std::io::stdout().lock();
    let display = |node: NodeRef| match tree.value_at(node, 0, ItemRole::Display) {
        Some(ItemValue::Text(text)) => text,
        _ => String::new(),
    };

    for row in 0..tree.child_count(NodeRef::Root) {
        let Some(group) = tree.child_at(NodeRef::Root, row) else {
            continue;
        };
        writeln!(out, "{} ({})", display(group), tree.child_count(group))?;
        for leaf_row in 0..tree.child_count(group) {
            if let Some(leaf) = tree.child_at(group, leaf_row) {
                writeln!(out, "    {}", display(leaf))?;
            }
        }
    }
    writeln!(out, "{} matches", tree.match_count())?;
    Ok(())
}
