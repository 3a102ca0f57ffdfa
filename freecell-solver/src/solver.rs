use crate::describe::describe_transition;
use crate::estimate::remaining_moves;
use crate::moves;
use crate::search::{
    InconsistentStates, Problem, Search, SearchError, SearchProgress, Solution, Strategy,
};

use freecell_common::board::Board;

use std::time::{Duration, Instant};

/// FreeCell as a search problem rooted at one layout.
#[derive(Debug, Clone)]
pub struct FreeCellProblem {
    initial: Board,
}

impl FreeCellProblem {
    pub fn new(initial: Board) -> Self {
        Self { initial }
    }
}

impl Problem for FreeCellProblem {
    type State = Board;

    fn initial_state(&self) -> Board {
        self.initial.clone()
    }

    fn is_goal(&self, state: &Board) -> bool {
        state.is_solved()
    }

    fn neighbors(&self, state: &Board) -> Vec<(Board, u32)> {
        moves::neighbors(state)
    }

    fn move_description(&self, from: &Board, to: &Board) -> Result<String, InconsistentStates> {
        describe_transition(from, to)
    }
}

pub fn solve(board: Board, strategy: Strategy) -> Result<SolveResult, SearchError> {
    Solver::new(board).solve(strategy)
}

type Observer<'a> = Box<dyn FnMut(&SearchProgress) + 'a>;

/// Solves one layout, optionally reporting progress along the way.
pub struct Solver<'a> {
    problem: FreeCellProblem,
    progress: Option<(Duration, Observer<'a>)>,
}

impl<'a> Solver<'a> {
    pub fn new(board: Board) -> Self {
        Self {
            problem: FreeCellProblem::new(board),
            progress: None,
        }
    }

    pub fn on_progress(
        mut self,
        interval: Duration,
        observer: impl FnMut(&SearchProgress) + 'a,
    ) -> Self {
        self.progress = Some((interval, Box::new(observer)));
        self
    }

    pub fn solve(self, strategy: Strategy) -> Result<SolveResult, SearchError> {
        let Self { problem, progress } = self;
        let timer = Instant::now();

        let mut search = Search::new(&problem);
        if let Some((interval, observer)) = progress {
            search = search.on_progress(interval, observer);
        }
        let Solution {
            moves,
            path,
            cost,
            expanded,
        } = match strategy {
            Strategy::DepthFirst => search.dfs(),
            Strategy::BreadthFirst => search.bfs(),
            Strategy::AStar => search.astar(remaining_moves),
        }?;

        Ok(SolveResult {
            moves,
            path,
            cost,
            states: expanded,
            elapsed: timer.elapsed(),
            strategy,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SolveResult {
    /// One description per move, in play order.
    pub moves: Vec<String>,
    /// The boards visited, starting with the initial layout.
    pub path: Vec<Board>,
    pub cost: u32,
    pub states: usize,
    pub elapsed: Duration,
    pub strategy: Strategy,
}
