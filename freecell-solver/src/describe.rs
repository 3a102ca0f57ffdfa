use crate::search::InconsistentStates;

use freecell_common::board::Board;
use freecell_common::card::{Card, TOTAL_SUITS};

/// Describes the move that turns `from` into `to`, found by comparing the
/// two boards: a card new to the free cells, then cards new to home, then a
/// card added to the tableau.
pub fn describe_transition(from: &Board, to: &Board) -> Result<String, InconsistentStates> {
    if let Some(card) = to.free().iter().find(|card| !from.free().contains(card)) {
        return Ok(format!("Move {card} to a free cell"));
    }

    let mut homed: Vec<Card> = (0..TOTAL_SUITS as u8)
        .flat_map(|suit| {
            (from.home_rank(suit) + 1..=to.home_rank(suit))
                .filter_map(move |rank| Card::new(rank, suit))
        })
        .collect();
    if !homed.is_empty() {
        homed.sort_by_key(|card| (card.rank(), card.suit()));
        return Ok(format!("Move {} home", join_cards(&homed)));
    }

    for column in to.tableau() {
        if from.tableau().contains(column) {
            continue;
        }
        let Some((&card, rest)) = column.cards().split_last() else {
            continue;
        };
        match rest.last() {
            None if !from.tableau().iter().any(|c| c.bottom() == Some(card)) => {
                return Ok(format!("Move {card} to a new column"));
            }
            Some(below) if from.tableau().iter().any(|c| c.cards() == rest) => {
                return Ok(format!("Move {card} onto {below}"));
            }
            _ => {}
        }
    }

    Err(InconsistentStates(format!(
        "no single move leads from\n{}\nto\n{}",
        from.pretty_print(),
        to.pretty_print()
    )))
}

fn join_cards(cards: &[Card]) -> String {
    let names: Vec<String> = cards.iter().map(Card::to_string).collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
        _ => names.concat(),
    }
}
