//! A FreeCell solver built on a generic graph search.
//!
//! [`search`] holds the problem-independent engine; the FreeCell rules,
//! auto-play and the move heuristic plug into it through
//! [`FreeCellProblem`].
mod describe;
mod estimate;
mod moves;
mod open_set;
pub mod search;
mod solver;

pub use crate::describe::describe_transition;
pub use crate::estimate::remaining_moves;
pub use crate::moves::{PossibleActions, autoplay, is_safe_home_move, legal_actions, neighbors};
pub use crate::open_set::{OpenSet, PriorityQueue, Queue, Stack};
pub use crate::search::{SearchError, SearchProgress, Strategy};
pub use crate::solver::{FreeCellProblem, SolveResult, Solver, solve};
