mod utils;

use crate::utils::*;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use freecell_common::board::Board;
use freecell_solver::Strategy;

use std::{
    io::{IsTerminal, Read, stdin},
    path::PathBuf,
    process::ExitCode,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// A* guided by the remaining-moves estimate
    Astar,
    /// Depth-first search
    Dfs,
    /// Breadth-first search (fewest moves)
    Bfs,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Astar => Strategy::AStar,
            StrategyArg::Dfs => Strategy::DepthFirst,
            StrategyArg::Bfs => Strategy::BreadthFirst,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Search strategy
    #[arg(short, long, value_enum, default_value_t = StrategyArg::Astar)]
    strategy: StrategyArg,
    /// Preview initial layout without solving
    #[arg(short, long)]
    preview: bool,
    /// Path to a CSV layout file, one column per row (reads stdin if omitted)
    file: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let Cli {
        strategy,
        preview,
        file,
    } = Cli::parse();

    let board = if let Some(file) = file {
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        Board::parse(&content).context("Failed to parse board")?
    } else if !stdin().is_terminal() {
        let mut content = String::new();
        stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
        Board::parse(&content).context("Failed to parse board")?
    } else {
        bail!("No layout `file` provided.");
    };
    if preview {
        println!("{}", board.pretty_print());
        return Ok(ExitCode::SUCCESS);
    }

    do_solve(board, strategy.into())
}
