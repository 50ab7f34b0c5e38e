use clap::Parser;
use ringwick::newick::{BranchLengthFormat, NewickWriter};
use ringwick::parse_newick_file;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

/// Parse a file of Newick trees and print each tree again.
#[derive(Parser)]
#[command(name = "ringwick")]
#[command(about = "Re-print rooted and unrooted Newick trees")]
struct Cli {
    /// File with `;`-terminated Newick trees
    file: PathBuf,

    /// Write shortest round-trip branch lengths instead of fixed precision
    #[arg(long)]
    shortest: bool,

    /// Write integer support values as node labels
    #[arg(long)]
    support: bool,

    /// Write bracketed branch labels
    #[arg(long)]
    labels: bool,

    /// Print each tree from the vertex on the other side of its entry edge
    #[arg(long)]
    from_back: bool,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let cli = Cli::parse();

    let trees = match parse_newick_file(&cli.file) {
        Ok(trees) => trees,
        Err(e) => {
            error!("{}: {e}", cli.file.display());
            return ExitCode::FAILURE;
        }
    };

    let mut writer = NewickWriter::new();
    if cli.shortest {
        writer = writer.with_length_format(BranchLengthFormat::Shortest);
    }
    if cli.support {
        writer = writer.with_support();
    }
    if cli.labels {
        writer = writer.with_branch_labels();
    }

    for (i, tree) in trees.iter().enumerate() {
        let Some(entry) = tree.entry() else {
            continue;
        };
        let start = if cli.from_back {
            tree.back(entry).unwrap_or(entry)
        } else {
            entry
        };

        match writer.write(tree, start) {
            Ok(newick) => println!("{newick}"),
            Err(e) => {
                error!("tree {i}: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
