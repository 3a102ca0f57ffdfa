use crate::action::{Action, Slot};
use crate::card::{Card, Deck, MAX_RANK, TOTAL_CARDS, TOTAL_SUITS};

use anyhow::{Context, Result, anyhow, bail};
use smallvec::SmallVec;

pub const TOTAL_FREE_CELLS: usize = 4;
pub const TOTAL_COLUMNS: usize = 8;
const COLUMN_SIZE: usize = 19;

/// A tableau column, bottom card first; the last card is the playable one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Column {
    cards: SmallVec<[Card; COLUMN_SIZE]>,
}

impl Column {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn bottom(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    /// Whether `card` can be stacked on this column. Columns on a board are
    /// never empty, so an empty column accepts nothing here; use
    /// [`Slot::NewColumn`] to start one.
    pub fn accepts(&self, card: Card) -> bool {
        self.top().is_some_and(|top| top.accepts(card))
    }

    fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }
}

/// A FreeCell position and the vertex type of the search graph.
///
/// Boards are values: free cells and columns are kept sorted and empty
/// columns are dropped, so two boards holding the same cards in the same
/// places compare and hash equal however they were reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Board {
    home: [u8; TOTAL_SUITS],
    free: SmallVec<[Card; TOTAL_FREE_CELLS]>,
    tableau: SmallVec<[Column; TOTAL_COLUMNS]>,
}

impl Board {
    pub fn new(
        home: [u8; TOTAL_SUITS],
        free: impl IntoIterator<Item = Card>,
        tableau: impl IntoIterator<Item = Column>,
    ) -> Self {
        let mut board = Self {
            home,
            free: free.into_iter().collect(),
            tableau: tableau.into_iter().collect(),
        };
        board.canonicalize();
        board
    }

    pub fn home(&self) -> &[u8; TOTAL_SUITS] {
        &self.home
    }

    pub fn home_rank(&self, suit: u8) -> u8 {
        self.home[suit as usize]
    }

    /// The highest card on the home pile of `suit`.
    pub fn home_card(&self, suit: u8) -> Option<Card> {
        Card::new(self.home_rank(suit), suit)
    }

    pub fn free(&self) -> &[Card] {
        &self.free
    }

    pub fn tableau(&self) -> &[Column] {
        &self.tableau
    }

    pub fn has_free_cell(&self) -> bool {
        self.free.len() < TOTAL_FREE_CELLS
    }

    pub fn has_free_column(&self) -> bool {
        self.tableau.len() < TOTAL_COLUMNS
    }

    pub fn can_go_home(&self, card: Card) -> bool {
        self.home_rank(card.suit()) + 1 == card.rank()
    }

    pub fn cards_at_home(&self) -> usize {
        self.home.iter().map(|&rank| rank as usize).sum()
    }

    pub fn is_solved(&self) -> bool {
        self.home.iter().all(|&rank| rank == MAX_RANK)
    }

    /// Every card exactly once across home, free cells and tableau, within
    /// the cell and column limits.
    pub fn is_valid(&self) -> bool {
        if self.free.len() > TOTAL_FREE_CELLS || self.tableau.len() > TOTAL_COLUMNS {
            return false;
        }
        if self.tableau.iter().any(Column::is_empty) {
            return false;
        }

        let mut seen = [false; TOTAL_CARDS];
        let mut count = 0;
        let mut check_card = |card: Card| -> bool {
            if seen[card.id()] {
                return false;
            }
            seen[card.id()] = true;
            count += 1;
            true
        };

        for suit in 0..TOTAL_SUITS as u8 {
            let rank = self.home_rank(suit);
            if rank > MAX_RANK {
                return false;
            }
            for r in 1..=rank {
                if !Card::new(r, suit).is_some_and(&mut check_card) {
                    return false;
                }
            }
        }
        if !self.free.iter().all(|&card| check_card(card)) {
            return false;
        }
        for column in &self.tableau {
            if !column.iter().all(|&card| check_card(card)) {
                return false;
            }
        }
        count == TOTAL_CARDS
    }

    /// Returns the board that results from `action`. The action must be
    /// legal for this board.
    pub fn apply(&self, action: &Action) -> Board {
        let mut next = self.clone();
        next.take(action.card, action.from);
        next.put(action.card, action.to);
        next.canonicalize();
        next
    }

    fn take(&mut self, card: Card, from: Slot) {
        match from {
            Slot::Home => {
                debug_assert_eq!(self.home_card(card.suit()), Some(card));
                self.home[card.suit() as usize] -= 1;
            }
            Slot::Free => {
                let idx = self.free.iter().position(|&c| c == card);
                debug_assert!(idx.is_some(), "{card} is not in a free cell");
                if let Some(idx) = idx {
                    self.free.remove(idx);
                }
            }
            Slot::Column(idx) => {
                let top = self.tableau[idx].pop();
                debug_assert_eq!(top, Some(card));
            }
            Slot::NewColumn => unreachable!("cards are never taken from a new column"),
        }
    }

    fn put(&mut self, card: Card, to: Slot) {
        match to {
            Slot::Home => {
                debug_assert!(self.can_go_home(card));
                self.home[card.suit() as usize] = card.rank();
            }
            Slot::Free => self.free.push(card),
            Slot::Column(idx) => self.tableau[idx].push(card),
            Slot::NewColumn => self.tableau.push(Column::new([card])),
        }
    }

    fn canonicalize(&mut self) {
        self.free.sort_unstable();
        self.tableau.retain(|column| !column.is_empty());
        self.tableau.sort_unstable();
    }

    /// Loads a layout: one tableau column per comma-separated row, bottom
    /// card first. Rows whose first cell is blank or starts with `#` are
    /// skipped. The
    /// layout must hold the full deck exactly once.
    pub fn parse(content: &str) -> Result<Self> {
        let mut seen = [false; TOTAL_CARDS];
        let mut tableau = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            let mut cells = line.split(',').map(str::trim).peekable();
            if cells
                .peek()
                .is_none_or(|first| first.is_empty() || first.starts_with('#'))
            {
                continue;
            }
            let line_context = || format!("Failed to parse line {} '{line}'", line_no + 1);
            let mut cards = Vec::new();
            for token in cells.filter(|t| !t.is_empty()) {
                let card = Card::parse(token).with_context(line_context)?;
                if seen[card.id()] {
                    return Err(anyhow!("Duplicate card {card}")).with_context(line_context);
                }
                seen[card.id()] = true;
                cards.push(card);
            }
            if !cards.is_empty() {
                tableau.push(Column::new(cards));
            }
        }

        if tableau.is_empty() {
            bail!("The layout has no columns");
        }
        if tableau.len() > TOTAL_COLUMNS {
            bail!(
                "The layout has {} columns; at most {TOTAL_COLUMNS} are allowed",
                tableau.len()
            );
        }
        let missing: Vec<String> = Deck::get()
            .cards()
            .iter()
            .filter(|card| !seen[card.id()])
            .map(Card::to_string)
            .collect();
        if !missing.is_empty() {
            bail!("Missing cards: {}", missing.join(", "));
        }

        Ok(Self::new([0; TOTAL_SUITS], [], tableau))
    }

    pub fn pretty_print(&self) -> String {
        let mut output = String::from("Home:");
        for suit in 0..TOTAL_SUITS as u8 {
            match self.home_card(suit) {
                Some(card) => output.push_str(&format!(" {card}")),
                None => output.push_str(" --"),
            }
        }

        output.push_str("\nFree:");
        for card in &self.free {
            output.push_str(&format!(" {card}"));
        }

        for (i, column) in self.tableau.iter().enumerate() {
            output.push_str(&format!("\nColumn{}:", i + 1));
            for card in column.iter() {
                output.push_str(&format!(" {card}"));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CLUBS, DIAMONDS, HEARTS, SPADES};

    const DEAL: &str = r#"# A standard deal
5S,7D,5D,JH,QC,4H
2H,9S,JS,6H,KS,TC,TS
KC,5H,2D,AC,8H,QD,9D
2S,AH,2C,QS,4C,7S

4S,8D,3H,TD,TH,8C,3S
JC,5C,KH,QH,9H,6C,7H
AD,KD,8S,6D,6S,AS
3D,4D,3C,7C,9C,JD
"#;

    fn card(name: &str) -> Card {
        Card::parse(name).unwrap()
    }

    fn column(names: &[&str]) -> Column {
        Column::new(names.iter().map(|name| card(name)))
    }

    #[test]
    fn test_parse_board() {
        let board = Board::parse(DEAL).unwrap();
        assert!(board.is_valid());
        assert_eq!(board.home(), &[0; 4]);
        assert!(board.free().is_empty());
        assert_eq!(board.tableau().len(), 8);
        assert!(board.tableau().contains(&column(&["AD", "KD", "8S", "6D", "6S", "AS"])));
        assert_eq!(board.tableau().iter().map(Column::len).sum::<usize>(), 52);
    }

    #[test]
    fn test_parse_lenient_tokens() {
        let content = DEAL.replace("TD", "10d").replace("KS", " ks ");
        assert_eq!(Board::parse(&content).unwrap(), Board::parse(DEAL).unwrap());
    }

    #[test]
    fn test_parse_duplicate_card() {
        let content = DEAL.replace("3D,4D", "3D,3D");
        let err = Board::parse(&content).unwrap_err();
        assert!(format!("{err:#}").contains("Duplicate card 3D"));
    }

    #[test]
    fn test_parse_missing_card() {
        let content = DEAL.replace(",JD", "");
        let err = Board::parse(&content).unwrap_err();
        assert_eq!(err.to_string(), "Missing cards: JD");
    }

    #[test]
    fn test_parse_skips_rows_with_blank_first_cell() {
        let content = DEAL.replace("3D,4D,3C,7C,9C,JD", ",3D,4D,3C,7C,9C,JD");
        let err = Board::parse(&content).unwrap_err();
        assert_eq!(err.to_string(), "Missing cards: 3D, 4D, JD, 3C, 7C, 9C");

        let content = DEAL.replace("5S,7D", "  # ,5S,7D");
        let err = Board::parse(&content).unwrap_err();
        assert!(err.to_string().starts_with("Missing cards: "));

        let content = format!(",,\n  \n{DEAL}");
        assert_eq!(Board::parse(&content).unwrap(), Board::parse(DEAL).unwrap());
    }

    #[test]
    fn test_parse_bad_token() {
        let content = DEAL.replace("JD", "JX");
        let err = Board::parse(&content).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid card 'JX'"));
    }

    #[test]
    fn test_parse_too_many_columns() {
        let content = DEAL.replace("3D,4D,", "3D\n4D,");
        assert!(Board::parse(&content).is_err());
    }

    #[test]
    fn test_structural_equality() {
        let a = Board::new(
            [1, 0, 0, 0],
            [card("KS"), card("2D")],
            [column(&["3H", "6C"]), column(&["6S"])],
        );
        let b = Board::new(
            [1, 0, 0, 0],
            [card("2D"), card("KS")],
            [column(&["6S"]), column(&[]), column(&["3H", "6C"])],
        );
        assert_eq!(a, b);

        use std::hash::{BuildHasher, RandomState};
        let hasher = RandomState::new();
        assert_eq!(hasher.hash_one(&a), hasher.hash_one(&b));
    }

    #[test]
    fn test_apply() {
        let board = Board::new(
            [0, 0, 1, 0],
            [card("AD")],
            [column(&["3H", "6C"]), column(&["7H", "2C"])],
        );
        let idx = board
            .tableau()
            .iter()
            .position(|c| c.top() == Some(card("2C")))
            .unwrap();

        let next = board.apply(&Action::new(card("2C"), Slot::Column(idx), Slot::Home));
        assert_eq!(next.home_rank(CLUBS), 2);
        assert!(next.tableau().contains(&column(&["7H"])));

        let next = next.apply(&Action::new(card("AD"), Slot::Free, Slot::Home));
        assert_eq!(next.home_card(DIAMONDS), Some(card("AD")));
        assert!(next.free().is_empty());

        let next = next.apply(&Action::new(card("2C"), Slot::Home, Slot::NewColumn));
        assert_eq!(next.home_rank(CLUBS), 1);
        assert_eq!(next.tableau().len(), 3);
        assert!(next.tableau().contains(&column(&["2C"])));

        let idx = next
            .tableau()
            .iter()
            .position(|c| c.top() == Some(card("2C")))
            .unwrap();
        assert!(next.tableau()[idx].accepts(card("AD")));
        let next = next.apply(&Action::new(card("AD"), Slot::Home, Slot::Column(idx)));
        assert_eq!(next.home_rank(DIAMONDS), 0);
        assert!(next.tableau().contains(&column(&["2C", "AD"])));
        assert_eq!(next.cards_at_home(), 1);
    }

    #[test]
    fn test_apply_removes_empty_column() {
        let board = Board::new([0; 4], [], [column(&["6S"]), column(&["7H"])]);
        let idx = board
            .tableau()
            .iter()
            .position(|c| c.top() == Some(card("6S")))
            .unwrap();
        let target = 1 - idx;
        let next = board.apply(&Action::new(card("6S"), Slot::Column(idx), Slot::Column(target)));
        assert_eq!(next.tableau(), &[column(&["7H", "6S"])]);
    }

    #[test]
    fn test_is_valid() {
        let board = Board::parse(DEAL).unwrap();
        assert!(board.is_valid());
        assert!(!Board::default().is_valid());

        let solved = Board::new([MAX_RANK; 4], [], []);
        assert!(solved.is_valid());
        assert!(solved.is_solved());

        let almost = Board::new([13, 13, 13, 12], [card("KS")], []);
        assert!(almost.is_valid());
        assert!(!almost.is_solved());
        assert!(almost.can_go_home(card("KS")));

        let twice = Board::new([13, 13, 13, 12], [card("KS")], [column(&["KS"])]);
        assert!(!twice.is_valid());

        let home_and_free = Board::new([13, 13, 13, 13], [card("KS")], []);
        assert!(!home_and_free.is_valid());
        assert_eq!(home_and_free.home_card(SPADES), Some(card("KS")));
        assert_eq!(home_and_free.home_card(HEARTS), Some(card("KH")));
    }

    #[test]
    fn test_pretty_print() {
        let board = Board::new(
            [2, 0, 1, 0],
            [card("KS")],
            [column(&["3H", "6C"]), column(&["6S"])],
        );
        assert_eq!(
            board.pretty_print(),
            "Home: 2D -- AC --\nFree: KS\nColumn1: 3H 6C\nColumn2: 6S"
        );
    }
}
