use ahash::{AHashMap, AHashSet};
use std::{
    cmp::Ordering,
    collections::{BinaryHeap, VecDeque},
    hash::Hash,
};

/// The frontier of a search. The strategy is entirely in how states are
/// ordered and which pushes are accepted.
pub trait OpenSet<S> {
    /// Offers `state`, reached from the most recently popped state by an
    /// edge of `cost` (the initial state is pushed with cost 0). Returns
    /// whether the state was accepted.
    fn push(&mut self, state: S, cost: u32) -> bool;

    fn pop(&mut self) -> Option<S>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// LIFO open set for depth-first search.
#[derive(Debug, Clone)]
pub struct Stack<S> {
    items: Vec<S>,
}

impl<S> Stack<S> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }
}

impl<S> Default for Stack<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> OpenSet<S> for Stack<S> {
    fn push(&mut self, state: S, _cost: u32) -> bool {
        self.items.push(state);
        true
    }

    fn pop(&mut self) -> Option<S> {
        self.items.pop()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// FIFO open set for breadth-first search.
///
/// A state is only queued the first time it is offered, so the parent
/// recorded for it is one of the shallowest.
#[derive(Debug, Clone)]
pub struct Queue<S> {
    items: VecDeque<S>,
    queued: AHashSet<S>,
}

impl<S> Queue<S> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            queued: AHashSet::new(),
        }
    }
}

impl<S> Default for Queue<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Eq + Hash> OpenSet<S> for Queue<S> {
    fn push(&mut self, state: S, _cost: u32) -> bool {
        if !self.queued.insert(state.clone()) {
            return false;
        }
        self.items.push_back(state);
        true
    }

    fn pop(&mut self) -> Option<S> {
        self.items.pop_front()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug)]
struct Entry<S> {
    f_score: u32,
    g_score: u32,
    sequence: u64,
    state: S,
}

impl<S> PartialEq for Entry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score && self.sequence == other.sequence
    }
}

impl<S> Eq for Entry<S> {}

impl<S> Ord for Entry<S> {
    // Lowest f-score first; among equal scores the latest push wins.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl<S> PartialOrd for Entry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* open set ordered by `g + h`.
///
/// A push is rejected when the state already has an equal or better
/// g-score. Entries superseded by a better g-score stay in the heap and are
/// dropped when popped.
pub struct PriorityQueue<S, H> {
    heap: BinaryHeap<Entry<S>>,
    g_scores: AHashMap<S, u32>,
    last_g_score: Option<u32>,
    sequence: u64,
    heuristic: H,
}

impl<S, H> PriorityQueue<S, H>
where
    S: Clone + Eq + Hash,
    H: Fn(&S) -> u32,
{
    pub fn new(heuristic: H) -> Self {
        Self {
            heap: BinaryHeap::new(),
            g_scores: AHashMap::new(),
            last_g_score: None,
            sequence: 0,
            heuristic,
        }
    }

    pub fn g_score(&self, state: &S) -> Option<u32> {
        self.g_scores.get(state).copied()
    }
}

impl<S, H> OpenSet<S> for PriorityQueue<S, H>
where
    S: Clone + Eq + Hash,
    H: Fn(&S) -> u32,
{
    fn push(&mut self, state: S, cost: u32) -> bool {
        let g_score = self.last_g_score.unwrap_or(0).saturating_add(cost);
        if self.g_score(&state).is_some_and(|best| g_score >= best) {
            return false;
        }

        let f_score = g_score.saturating_add((self.heuristic)(&state));
        self.g_scores.insert(state.clone(), g_score);
        self.sequence += 1;
        self.heap.push(Entry {
            f_score,
            g_score,
            sequence: self.sequence,
            state,
        });
        true
    }

    fn pop(&mut self) -> Option<S> {
        while let Some(entry) = self.heap.pop() {
            if self.g_score(&entry.state).is_some_and(|best| best < entry.g_score) {
                continue;
            }
            self.last_g_score = Some(entry.g_score);
            return Some(entry.state);
        }
        None
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}
