use crate::card::Card;

/// Where a card is taken from or put to.
///
/// `Column` indexes the board's canonical tableau order. `NewColumn` is
/// only valid as a destination.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Slot {
    Home,
    Free,
    Column(usize),
    NewColumn,
}

/// A single card move, applied with [`crate::board::Board::apply`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Action {
    pub card: Card,
    pub from: Slot,
    pub to: Slot,
}

impl Action {
    pub fn new(card: Card, from: Slot, to: Slot) -> Self {
        Self { card, from, to }
    }
}

pub fn format_moves(moves: &[String]) -> String {
    let width = moves.len().to_string().len();
    let mut output = String::new();
    for (i, description) in moves.iter().enumerate() {
        output.push_str(&format!("{:>width$}. {description}\n", i + 1));
    }
    output
}
