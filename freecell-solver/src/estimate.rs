use freecell_common::board::Board;
use freecell_common::card::{MAX_RANK, TOTAL_SUITS};

/// Estimated number of moves left before `board` is solved.
///
/// Every card outside home counts once, free cells included. Walking each
/// column from the bottom, a tableau card counts twice when its rank is not
/// below the lowest rank of its suit seen so far in that column. That
/// minimum starts at 13 for every suit, so a king always counts twice, as
/// does any card with a lower card of its suit beneath it. This is a guide
/// for A*, not a lower bound: it can overestimate, so solutions found with
/// it are not guaranteed to be the shortest.
pub fn remaining_moves(board: &Board) -> u32 {
    let mut num = board.free().len();
    let mut mins = [MAX_RANK; TOTAL_SUITS];

    for column in board.tableau() {
        mins.fill(MAX_RANK);
        num += column.len();

        for card in column.iter() {
            let suit = card.suit() as usize;
            if card.rank() < mins[suit] {
                mins[suit] = card.rank();
            } else {
                num += 1;
            }
        }
    }

    num as u32
}
