use anyhow::Result;
use freecell_common::{action::format_moves, board::Board};
use freecell_solver::{
    SearchError, SolveResult, Solver, Strategy, search::DEFAULT_PROGRESS_INTERVAL,
};
use indicatif::{ProgressBar, ProgressStyle};

use std::{
    io::{IsTerminal, stderr},
    process::ExitCode,
    time::{Duration, Instant},
};

/// Solves `board`, printing the layout, a summary line and the numbered
/// moves. Exits with failure when the layout has no solution.
pub fn do_solve(board: Board, strategy: Strategy) -> Result<ExitCode> {
    println!("{}\n", board.pretty_print());

    let spinner = new_spinner(&format!("Solving with {strategy}..."))?;
    let mut solver = Solver::new(board);
    if let Some(spinner) = spinner.clone() {
        solver = solver.on_progress(DEFAULT_PROGRESS_INTERVAL, move |progress| {
            spinner.set_message(format!(
                "{} states expanded, {} open",
                progress.expanded, progress.open
            ));
        });
    }
    let timer = Instant::now();
    let result = solver.solve(strategy);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(SolveResult {
            moves,
            cost,
            states,
            elapsed,
            strategy,
            ..
        }) => {
            let elapsed_str = format_elapsed(elapsed);
            println!(
                "✓ Solved in {} Moves — Strategy: {strategy}, Cost: {cost}, Time: {elapsed_str}, States: {states}\n",
                moves.len()
            );
            print!("{}", format_moves(&moves));
            Ok(ExitCode::SUCCESS)
        }
        Err(SearchError::NoSolution { expanded }) => {
            let elapsed_str = format_elapsed(timer.elapsed());
            println!(
                "✗ No solution — Strategy: {strategy}, Time: {elapsed_str}, States: {expanded}"
            );
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}

fn new_spinner(message: &str) -> Result<Option<ProgressBar>> {
    if !stderr().is_terminal() {
        return Ok(None);
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {spinner} {prefix} {msg}",
    )?);
    spinner.set_prefix(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(Some(spinner))
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 90 {
        let ms = elapsed.subsec_millis();
        format!("{secs}.{ms:03}s")
    } else {
        let minutes = secs / 60;
        let secs = secs % 60;
        format!("{minutes}m {secs}s")
    }
}
