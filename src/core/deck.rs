use std::sync::Arc;

use rand::Rng;

use super::{
    NavigationError,
    VocabRecord,
};

/// An ordered view over a filtered record subset with a cursor.
///
/// The cursor is only meaningful while the deck is non-empty; an empty deck
/// is a normal state and every query reports "no current record".
#[derive(Debug, Clone, Default)]
pub struct Deck {
    members: Vec<Arc<VocabRecord>>,
    cursor: usize,
}

impl Deck {
    pub fn new(members: Vec<Arc<VocabRecord>>) -> Self {
        Self { members, cursor: 0 }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Arc<VocabRecord>> {
        self.members.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Arc<VocabRecord>] {
        &self.members
    }

    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.members.len()
    }

    pub fn has_previous(&self) -> bool {
        !self.members.is_empty() && self.cursor > 0
    }

    /// Shuffling a single card (or none) is meaningless.
    pub fn can_shuffle(&self) -> bool {
        self.members.len() > 1
    }

    /// One-based `(position, size)` for the position indicator.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current().map(|_| (self.cursor + 1, self.members.len()))
    }

    pub fn advance(&mut self) -> Result<(), NavigationError> {
        if self.members.is_empty() {
            return Err(NavigationError::Empty);
        }
        if !self.has_next() {
            return Err(NavigationError::AtEnd);
        }
        self.cursor += 1;
        Ok(())
    }

    pub fn retreat(&mut self) -> Result<(), NavigationError> {
        if self.members.is_empty() {
            return Err(NavigationError::Empty);
        }
        if !self.has_previous() {
            return Err(NavigationError::AtStart);
        }
        self.cursor -= 1;
        Ok(())
    }

    /// Fisher-Yates over the members, then back to the first card.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in (1..self.members.len()).rev() {
            let j = rng.random_range(0..=i);
            self.members.swap(i, j);
        }
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use rand::{
        rngs::StdRng,
        SeedableRng,
    };

    use super::*;

    fn deck_of(n: usize) -> Deck {
        let members = (0..n)
            .map(|i| {
                Arc::new(VocabRecord {
                    term: format!("term{}", i),
                    phonetic: String::new(),
                    definition: format!("definition{}", i),
                    category: "HSK 1".to_string(),
                    ordinal: i,
                })
            })
            .collect();
        Deck::new(members)
    }

    fn ordinals(deck: &Deck) -> Vec<usize> {
        deck.members().iter().map(|record| record.ordinal).collect()
    }

    #[test]
    fn test_empty_deck_queries() {
        let mut deck = Deck::empty();
        assert!(deck.current().is_none());
        assert!(deck.position().is_none());
        assert!(!deck.has_next());
        assert!(!deck.has_previous());
        assert!(!deck.can_shuffle());
        assert_eq!(deck.advance(), Err(NavigationError::Empty));
        assert_eq!(deck.retreat(), Err(NavigationError::Empty));
    }

    #[test]
    fn test_bounds() {
        let mut deck = deck_of(3);
        assert!(!deck.has_previous());
        assert_eq!(deck.retreat(), Err(NavigationError::AtStart));

        for expected in 1..3 {
            assert!(deck.has_next());
            deck.advance().unwrap();
            assert_eq!(deck.cursor(), expected);
        }

        assert!(!deck.has_next());
        assert_eq!(deck.advance(), Err(NavigationError::AtEnd));
        assert_eq!(deck.cursor(), 2);
        assert_eq!(deck.position(), Some((3, 3)));

        deck.retreat().unwrap();
        assert_eq!(deck.cursor(), 1);
    }

    #[test]
    fn test_single_card_deck() {
        let deck = deck_of(1);
        assert!(!deck.has_next());
        assert!(!deck.has_previous());
        assert!(!deck.can_shuffle());
        assert_eq!(deck.position(), Some((1, 1)));
    }

    #[test]
    fn test_shuffle_is_a_permutation_and_resets_cursor() {
        let mut deck = deck_of(20);
        deck.advance().unwrap();
        deck.advance().unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        deck.shuffle(&mut rng);

        assert_eq!(deck.cursor(), 0);
        let mut after = ordinals(&deck);
        assert_ne!(after, (0..20).collect::<Vec<_>>());
        after.sort_unstable();
        assert_eq!(after, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_is_reproducible_with_seed() {
        let mut a = deck_of(10);
        let mut b = deck_of(10);
        a.shuffle(&mut StdRng::seed_from_u64(42));
        b.shuffle(&mut StdRng::seed_from_u64(42));
        assert_eq!(ordinals(&a), ordinals(&b));
    }
}
