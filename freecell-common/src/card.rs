use anyhow::{Context, Result};
use rustc_hash::FxHashMap;

use std::fmt;
use std::sync::LazyLock;

pub const MAX_RANK: u8 = 13;
pub const TOTAL_SUITS: usize = 4;
pub const TOTAL_CARDS: usize = TOTAL_SUITS * MAX_RANK as usize;

pub const DIAMONDS: u8 = 0;
pub const HEARTS: u8 = 1;
pub const CLUBS: u8 = 2;
pub const SPADES: u8 = 3;

const SUITS: [char; TOTAL_SUITS] = ['D', 'H', 'C', 'S'];
const RANKS: [char; MAX_RANK as usize + 1] = [
    '?', 'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K',
];

static DECK: LazyLock<Deck> = LazyLock::new(Deck::build);

/// A playing card, `suit * 13 + (rank - 1)` packed in one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card(u8);

/// The (rank, color) pair that decides tableau stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardType {
    pub rank: u8,
    pub is_red: bool,
}

impl Card {
    /// Returns `None` unless `rank` is in `1..=13` and `suit` in `0..4`.
    pub const fn new(rank: u8, suit: u8) -> Option<Self> {
        if rank == 0 || rank > MAX_RANK || suit as usize >= TOTAL_SUITS {
            None
        } else {
            Some(Self(suit * MAX_RANK + rank - 1))
        }
    }

    /// Parses a token such as `3h`, `TD` or `10S`.
    pub fn parse(token: &str) -> Result<Self> {
        Deck::get()
            .lookup(token)
            .copied()
            .with_context(|| format!("Invalid card '{token}'"))
    }

    pub fn id(&self) -> usize {
        self.0 as usize
    }

    pub fn rank(&self) -> u8 {
        self.0 % MAX_RANK + 1
    }

    pub fn suit(&self) -> u8 {
        self.0 / MAX_RANK
    }

    pub fn is_red(&self) -> bool {
        self.suit() == DIAMONDS || self.suit() == HEARTS
    }

    pub fn card_type(&self) -> CardType {
        CardType {
            rank: self.rank(),
            is_red: self.is_red(),
        }
    }

    /// The type of card that may be stacked on top of this one.
    pub fn next_type(&self) -> Option<CardType> {
        match self.rank() {
            1 => None,
            rank => Some(CardType {
                rank: rank - 1,
                is_red: !self.is_red(),
            }),
        }
    }

    /// The card of the same suit one rank higher; the next one to go home.
    pub fn next_in_rank(&self) -> Option<Card> {
        Card::new(self.rank() + 1, self.suit())
    }

    /// Whether `card` may be placed on top of this card in the tableau.
    pub fn accepts(&self, card: Card) -> bool {
        self.next_type() == Some(card.card_type())
    }

    pub fn rank_symbol(&self) -> char {
        RANKS[self.rank() as usize]
    }

    pub fn suit_symbol(&self) -> char {
        SUITS[self.suit() as usize]
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_symbol(), self.suit_symbol())
    }
}

/// Lookup table holding the only instance of each of the 52 cards.
#[derive(Debug)]
pub struct Deck {
    cards: [Card; TOTAL_CARDS],
    names: FxHashMap<String, usize>,
}

impl Deck {
    pub fn get() -> &'static Deck {
        &DECK
    }

    fn build() -> Self {
        let cards: [Card; TOTAL_CARDS] = std::array::from_fn(|id| Card(id as u8));
        let names = cards
            .iter()
            .map(|card| (card.to_string(), card.id()))
            .collect();
        Self { cards, names }
    }

    /// Finds a card by its display string, ignoring case; `10` is read as `T`.
    pub fn lookup(&self, name: &str) -> Option<&Card> {
        let mut name = name.trim().to_ascii_uppercase();
        if name.starts_with("10") {
            name.replace_range(..2, "T");
        }
        self.names.get(&name).map(|&id| &self.cards[id])
    }

    pub fn by_rank_suit(&self, rank: u8, suit: u8) -> Option<&Card> {
        Card::new(rank, suit).map(|card| &self.cards[card.id()])
    }

    pub fn cards(&self) -> &[Card; TOTAL_CARDS] {
        &self.cards
    }
}
