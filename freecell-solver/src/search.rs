//! Generic best-first/depth-first graph search.
//!
//! [`Search`] runs a single traversal skeleton over any [`Problem`]; the
//! [`OpenSet`] passed to [`Search::run`] decides the visiting order, which
//! is all that separates depth-first, breadth-first and A* search.
use crate::open_set::{OpenSet, PriorityQueue, Queue, Stack};

use ahash::{AHashMap, AHashSet};
use std::{
    fmt,
    hash::Hash,
    time::{Duration, Instant},
};
use thiserror::Error;

pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

// Expansions between clock reads when a progress observer is set.
const PROGRESS_CHECK_MASK: usize = 0xff;

/// A state graph to search.
pub trait Problem {
    type State: Clone + Eq + Hash;

    fn initial_state(&self) -> Self::State;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// Successor states with the cost of reaching each one (at least 1).
    fn neighbors(&self, state: &Self::State) -> Vec<(Self::State, u32)>;

    /// Describes the edge between two adjacent states. Fails when `to` is
    /// not a successor of `from`.
    fn move_description(
        &self,
        from: &Self::State,
        to: &Self::State,
    ) -> Result<String, InconsistentStates>;
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Strategy {
    DepthFirst,
    BreadthFirst,
    #[default]
    AStar,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::DepthFirst => "DFS",
            Strategy::BreadthFirst => "BFS",
            Strategy::AStar => "A*",
        };
        f.write_str(name)
    }
}

/// Two states handed to [`Problem::move_description`] are not adjacent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("states are not adjacent: {0}")]
pub struct InconsistentStates(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no solution found after expanding {expanded} states")]
    NoSolution { expanded: usize },
    #[error(transparent)]
    InconsistentStates(#[from] InconsistentStates),
}

/// A path from the initial state to a goal.
#[derive(Debug, Clone)]
pub struct Solution<S> {
    /// One description per edge, root to goal.
    pub moves: Vec<String>,
    /// Every state on the path, starting with the initial state.
    pub path: Vec<S>,
    /// Sum of the edge costs along the path.
    pub cost: u32,
    pub expanded: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SearchProgress {
    pub open: usize,
    pub closed: usize,
    pub expanded: usize,
    pub elapsed: Duration,
}

struct Reporter<'a> {
    interval: Duration,
    observer: Box<dyn FnMut(&SearchProgress) + 'a>,
}

/// One search invocation over `problem`.
pub struct Search<'a, P: Problem> {
    problem: &'a P,
    reporter: Option<Reporter<'a>>,
}

impl<'a, P: Problem> Search<'a, P> {
    pub fn new(problem: &'a P) -> Self {
        Self {
            problem,
            reporter: None,
        }
    }

    /// Calls `observer` at most once per `interval` while the search runs.
    pub fn on_progress(
        mut self,
        interval: Duration,
        observer: impl FnMut(&SearchProgress) + 'a,
    ) -> Self {
        self.reporter = Some(Reporter {
            interval,
            observer: Box::new(observer),
        });
        self
    }

    pub fn dfs(self) -> Result<Solution<P::State>, SearchError> {
        self.run(Stack::new())
    }

    pub fn bfs(self) -> Result<Solution<P::State>, SearchError> {
        self.run(Queue::new())
    }

    /// A* ordered by path cost plus `heuristic`. The heuristic must be
    /// non-negative; the result is only shortest if it never overestimates.
    pub fn astar<H>(self, heuristic: H) -> Result<Solution<P::State>, SearchError>
    where
        H: Fn(&P::State) -> u32,
    {
        self.run(PriorityQueue::new(heuristic))
    }

    pub fn run<O>(mut self, mut open: O) -> Result<Solution<P::State>, SearchError>
    where
        O: OpenSet<P::State>,
    {
        let timer = Instant::now();
        let mut last_report = timer;
        let mut closed: AHashSet<P::State> = AHashSet::new();
        let mut came_from: AHashMap<P::State, (P::State, u32)> = AHashMap::new();
        let mut expanded = 0;

        open.push(self.problem.initial_state(), 0);
        while let Some(current) = open.pop() {
            if self.problem.is_goal(&current) {
                return self.reconstruct_path(current, &came_from, expanded);
            }
            if !closed.insert(current.clone()) {
                continue;
            }

            for (neighbor, cost) in self.problem.neighbors(&current) {
                if closed.contains(&neighbor) {
                    continue;
                }
                if open.push(neighbor.clone(), cost) {
                    came_from.insert(neighbor, (current.clone(), cost));
                }
            }
            expanded += 1;

            if let Some(reporter) = self.reporter.as_mut()
                && expanded & PROGRESS_CHECK_MASK == 0
                && last_report.elapsed() >= reporter.interval
            {
                last_report = Instant::now();
                (reporter.observer)(&SearchProgress {
                    open: open.len(),
                    closed: closed.len(),
                    expanded,
                    elapsed: timer.elapsed(),
                });
            }
        }

        Err(SearchError::NoSolution { expanded })
    }

    fn reconstruct_path(
        &self,
        goal: P::State,
        came_from: &AHashMap<P::State, (P::State, u32)>,
        expanded: usize,
    ) -> Result<Solution<P::State>, SearchError> {
        let mut path = vec![goal.clone()];
        let mut cost = 0;
        let mut current = &goal;
        while let Some((parent, edge_cost)) = came_from.get(current) {
            cost += edge_cost;
            path.push(parent.clone());
            current = parent;
        }
        path.reverse();

        let moves = path
            .windows(2)
            .map(|pair| self.problem.move_description(&pair[0], &pair[1]))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Solution {
            moves,
            path,
            cost,
            expanded,
        })
    }
}

pub fn dfs<P: Problem>(problem: &P) -> Result<Solution<P::State>, SearchError> {
    Search::new(problem).dfs()
}

pub fn bfs<P: Problem>(problem: &P) -> Result<Solution<P::State>, SearchError> {
    Search::new(problem).bfs()
}

pub fn astar<P, H>(problem: &P, heuristic: H) -> Result<Solution<P::State>, SearchError>
where
    P: Problem,
    H: Fn(&P::State) -> u32,
{
    Search::new(problem).astar(heuristic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Walk the integers from `start` to `goal` with `+1` (cost 1), `-1`
    /// (cost 1) or `*2` (cost 5), never going above `limit`.
    struct Walk {
        start: u32,
        goal: u32,
        limit: u32,
    }

    impl Problem for Walk {
        type State = u32;

        fn initial_state(&self) -> u32 {
            self.start
        }

        fn is_goal(&self, state: &u32) -> bool {
            *state == self.goal
        }

        fn neighbors(&self, state: &u32) -> Vec<(u32, u32)> {
            let mut next = vec![];
            if *state > 0 {
                next.push((state - 1, 1));
            }
            if state + 1 <= self.limit {
                next.push((state + 1, 1));
            }
            if state * 2 <= self.limit && *state > 1 {
                next.push((state * 2, 5));
            }
            next
        }

        fn move_description(&self, from: &u32, to: &u32) -> Result<String, InconsistentStates> {
            if *to == from + 1 {
                Ok("inc".into())
            } else if *to == from * 2 {
                Ok("double".into())
            } else if *to + 1 == *from {
                Ok("dec".into())
            } else {
                Err(InconsistentStates(format!("{from} -> {to}")))
            }
        }
    }

    fn assert_valid<P: Problem>(problem: &P, solution: &Solution<P::State>) {
        assert_eq!(solution.path.len(), solution.moves.len() + 1);
        assert!(solution.path[0] == problem.initial_state());
        assert!(problem.is_goal(solution.path.last().unwrap()));
        let mut cost = 0;
        for pair in solution.path.windows(2) {
            let (_, edge_cost) = problem
                .neighbors(&pair[0])
                .into_iter()
                .find(|(state, _)| *state == pair[1])
                .expect("consecutive states are adjacent");
            cost += edge_cost;
        }
        assert_eq!(cost, solution.cost);
    }

    #[test]
    fn test_bfs_finds_fewest_edges() {
        let problem = Walk {
            start: 1,
            goal: 16,
            limit: 40,
        };
        let solution = bfs(&problem).unwrap();
        assert_valid(&problem, &solution);
        assert_eq!(solution.moves, ["inc", "double", "double", "double"]);
        assert_eq!(solution.cost, 16);
    }

    #[test]
    fn test_astar_finds_cheapest_path() {
        let problem = Walk {
            start: 1,
            goal: 9,
            limit: 40,
        };
        let solution = astar(&problem, |_| 0).unwrap();
        assert_valid(&problem, &solution);
        // 1 -> 2 -> 4 -> 8 -> 9 costs 12; eight increments cost 8.
        assert_eq!(solution.cost, 8);
        assert_eq!(solution.moves.len(), 8);
    }

    #[test]
    fn test_dfs_finds_a_path() {
        let problem = Walk {
            start: 3,
            goal: 0,
            limit: 20,
        };
        let solution = dfs(&problem).unwrap();
        assert_valid(&problem, &solution);
        assert!(!solution.moves.is_empty());
    }

    #[test]
    fn test_initial_state_is_goal() {
        let problem = Walk {
            start: 5,
            goal: 5,
            limit: 10,
        };
        let solution = dfs(&problem).unwrap();
        assert!(solution.moves.is_empty());
        assert_eq!(solution.path, [5]);
        assert_eq!(solution.cost, 0);
    }

    #[test]
    fn test_no_solution() {
        let problem = Walk {
            start: 1,
            goal: 50,
            limit: 20,
        };
        for result in [dfs(&problem), bfs(&problem), astar(&problem, |_| 1)] {
            assert_eq!(result.unwrap_err(), SearchError::NoSolution { expanded: 21 });
        }
    }

    #[test]
    fn test_inconsistent_description_fails() {
        struct Broken;

        impl Problem for Broken {
            type State = u8;

            fn initial_state(&self) -> u8 {
                0
            }

            fn is_goal(&self, state: &u8) -> bool {
                *state == 1
            }

            fn neighbors(&self, _: &u8) -> Vec<(u8, u32)> {
                vec![(1, 1)]
            }

            fn move_description(&self, _: &u8, _: &u8) -> Result<String, InconsistentStates> {
                Err(InconsistentStates("nothing changed".into()))
            }
        }

        let err = bfs(&Broken).unwrap_err();
        assert!(matches!(err, SearchError::InconsistentStates(_)));
        assert_eq!(err.to_string(), "states are not adjacent: nothing changed");
    }

    #[test]
    fn test_self_loop_is_not_recorded() {
        struct SelfLoop;

        impl Problem for SelfLoop {
            type State = u8;

            fn initial_state(&self) -> u8 {
                0
            }

            fn is_goal(&self, state: &u8) -> bool {
                *state == 2
            }

            fn neighbors(&self, state: &u8) -> Vec<(u8, u32)> {
                match state {
                    0 => vec![(1, 1)],
                    1 => vec![(1, 1), (2, 1)],
                    _ => vec![],
                }
            }

            fn move_description(&self, from: &u8, to: &u8) -> Result<String, InconsistentStates> {
                Ok(format!("{from} -> {to}"))
            }
        }

        for solution in [dfs(&SelfLoop), bfs(&SelfLoop), astar(&SelfLoop, |_| 0)] {
            let solution = solution.unwrap();
            assert_eq!(solution.path, [0, 1, 2]);
            assert_eq!(solution.moves, ["0 -> 1", "1 -> 2"]);
            assert_eq!(solution.cost, 2);
        }
    }

    #[test]
    fn test_progress_does_not_change_result() {
        let problem = Walk {
            start: 1,
            goal: 300,
            limit: 400,
        };
        let reports = Cell::new(0);
        let observed = Search::new(&problem)
            .on_progress(Duration::ZERO, |progress| {
                assert!(progress.closed <= progress.expanded);
                reports.set(reports.get() + 1);
            })
            .astar(|state| 300u32.abs_diff(*state))
            .unwrap();
        let plain = astar(&problem, |state| 300u32.abs_diff(*state)).unwrap();
        assert_eq!(observed.moves, plain.moves);
        assert_eq!(observed.expanded, plain.expanded);
        assert_valid(&problem, &observed);
        assert!(reports.get() == observed.expanded / (PROGRESS_CHECK_MASK + 1));
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::default(), Strategy::AStar);
        assert_eq!(Strategy::AStar.to_string(), "A*");
        assert_eq!(Strategy::DepthFirst.to_string(), "DFS");
        assert_eq!(Strategy::BreadthFirst.to_string(), "BFS");
    }
}
