use freecell_common::action::{Action, Slot};
use freecell_common::board::Board;
use freecell_common::card::{Card, TOTAL_SUITS};

use smallvec::SmallVec;

pub type PossibleActions = SmallVec<[Action; 64]>;

/// Every successor of `board` with its cost.
///
/// When some cards can be sent home safely, the only successor is the board
/// with all of them sent home, at a cost of one per card. Otherwise every
/// single-card move is a successor of cost 1. Successors are distinct and
/// sorted.
pub fn neighbors(board: &Board) -> Vec<(Board, u32)> {
    if let Some((next, count)) = autoplay(board) {
        return vec![(next, count)];
    }

    let mut successors: Vec<Board> = legal_actions(board)
        .iter()
        .map(|action| board.apply(action))
        .collect();
    successors.sort_unstable();
    successors.dedup();
    successors.into_iter().map(|next| (next, 1)).collect()
}

pub fn legal_actions(board: &Board) -> PossibleActions {
    let mut actions = PossibleActions::new();
    free_to_home(board, &mut actions);
    free_to_tableau(board, &mut actions);
    tableau_to_tableau(board, &mut actions);
    tableau_to_free(board, &mut actions);
    tableau_to_home(board, &mut actions);
    home_to_free(board, &mut actions);
    home_to_tableau(board, &mut actions);
    actions
}

/// Sends every safe card home, repeating until none is left. Returns the
/// resulting board and the number of cards moved, or `None` if no card was
/// safe to move.
pub fn autoplay(board: &Board) -> Option<(Board, u32)> {
    let mut current = board.clone();
    let mut count = 0;
    while let Some(action) = next_safe_home_action(&current) {
        current = current.apply(&action);
        count += 1;
    }
    (count > 0).then_some((current, count))
}

fn next_safe_home_action(board: &Board) -> Option<Action> {
    let from_free = board
        .free()
        .iter()
        .map(|&card| Action::new(card, Slot::Free, Slot::Home));
    let from_tableau = board
        .tableau()
        .iter()
        .enumerate()
        .filter_map(|(idx, column)| {
            Some(Action::new(column.top()?, Slot::Column(idx), Slot::Home))
        });

    from_free.chain(from_tableau).find(|action| {
        board.can_go_home(action.card) && is_safe_home_move(board.home(), action.card)
    })
}

/// Whether `card`, once home, can never be needed in the tableau again.
///
/// Aces, twos and threes always are. Higher cards need both home piles of
/// the opposite color at `rank - 1` and the other pile of the same color at
/// `rank - 2`.
pub fn is_safe_home_move(home: &[u8; TOTAL_SUITS], card: Card) -> bool {
    let rank = card.rank();
    if rank <= 3 {
        return true;
    }

    let suit = card.suit() as usize;
    let sibling = suit ^ 1;
    let opposite = [suit ^ 2, suit ^ 3];
    opposite.iter().all(|&s| home[s] >= rank - 1) && home[sibling] >= rank - 2
}

fn free_to_home(board: &Board, actions: &mut PossibleActions) {
    for &card in board.free() {
        if board.can_go_home(card) {
            actions.push(Action::new(card, Slot::Free, Slot::Home));
        }
    }
}

fn free_to_tableau(board: &Board, actions: &mut PossibleActions) {
    for &card in board.free() {
        push_to_tableau(board, card, Slot::Free, actions);
    }
}

fn tableau_to_tableau(board: &Board, actions: &mut PossibleActions) {
    for (src_idx, src) in board.tableau().iter().enumerate() {
        let Some(card) = src.top() else {
            continue;
        };
        if board.has_free_column() && src.len() > 1 {
            actions.push(Action::new(card, Slot::Column(src_idx), Slot::NewColumn));
        }
        for (dest_idx, dest) in board.tableau().iter().enumerate() {
            if dest_idx != src_idx && dest.accepts(card) {
                actions.push(Action::new(card, Slot::Column(src_idx), Slot::Column(dest_idx)));
            }
        }
    }
}

fn tableau_to_free(board: &Board, actions: &mut PossibleActions) {
    if !board.has_free_cell() {
        return;
    }
    for (idx, column) in board.tableau().iter().enumerate() {
        if let Some(card) = column.top() {
            actions.push(Action::new(card, Slot::Column(idx), Slot::Free));
        }
    }
}

fn tableau_to_home(board: &Board, actions: &mut PossibleActions) {
    for (idx, column) in board.tableau().iter().enumerate() {
        if let Some(card) = column.top()
            && board.can_go_home(card)
        {
            actions.push(Action::new(card, Slot::Column(idx), Slot::Home));
        }
    }
}

fn home_to_free(board: &Board, actions: &mut PossibleActions) {
    if !board.has_free_cell() {
        return;
    }
    for card in home_cards(board) {
        actions.push(Action::new(card, Slot::Home, Slot::Free));
    }
}

fn home_to_tableau(board: &Board, actions: &mut PossibleActions) {
    for card in home_cards(board) {
        push_to_tableau(board, card, Slot::Home, actions);
    }
}

fn home_cards(board: &Board) -> impl Iterator<Item = Card> + '_ {
    (0..TOTAL_SUITS as u8).filter_map(|suit| board.home_card(suit))
}

fn push_to_tableau(board: &Board, card: Card, from: Slot, actions: &mut PossibleActions) {
    if board.has_free_column() {
        actions.push(Action::new(card, from, Slot::NewColumn));
    }
    for (idx, column) in board.tableau().iter().enumerate() {
        if column.accepts(card) {
            actions.push(Action::new(card, from, Slot::Column(idx)));
        }
    }
}
