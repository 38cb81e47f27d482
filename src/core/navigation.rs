use std::{
    sync::Arc,
    time::{
        Duration,
        Instant,
    },
};

use rand::Rng;
use tracing::{
    debug,
    info,
    warn,
};

use super::{
    deck::Deck,
    filter::{
        self,
        FilterSelection,
    },
    Direction,
    VocabRecord,
};

/// Identifies one pending transition. Handed to the renderer when the exit
/// animation starts and handed back when it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionHandle(u64);

#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub handle: TransitionHandle,
    pub direction: Direction,
    pub started_at: Instant,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Transitioning(Transition),
}

/// State of the card currently on screen. A new generation is issued every
/// time a card is rendered, and it always starts face up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardFace {
    pub ordinal: usize,
    pub generation: u64,
    pub flipped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    AwaitingSelection,
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::AwaitingSelection => "Select a level to begin.",
            EmptyState::NoMatches => "No matching entries found for the selected level(s).",
        }
    }
}

/// Which navigation controls are currently meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub previous: bool,
    pub next: bool,
    pub shuffle: bool,
}

/// Owns the active deck and is the only thing allowed to move its cursor.
///
/// Transitions are two-phase: [`begin_transition`](Self::begin_transition)
/// takes the animation lock and returns a handle, and
/// [`complete_transition`](Self::complete_transition) applies the move once
/// the exit animation is done. Requests that arrive while locked are dropped.
pub struct NavigationController {
    records: Vec<Arc<VocabRecord>>,
    categories: Vec<String>,
    selection: FilterSelection,
    deck: Deck,
    phase: Phase,
    card: Option<CardFace>,
    next_handle: u64,
    generation: u64,
}

impl NavigationController {
    /// Starts with an empty deck until a category is chosen.
    pub fn new(records: Vec<Arc<VocabRecord>>) -> Self {
        let categories = filter::categories(&records);
        Self {
            records,
            categories,
            selection: FilterSelection::new(),
            deck: Deck::empty(),
            phase: Phase::Idle,
            card: None,
            next_handle: 1,
            generation: 0,
        }
    }

    /// Swaps in a new record collection (e.g. a freshly opened file).
    pub fn replace_records(&mut self, records: Vec<Arc<VocabRecord>>) {
        self.categories = filter::categories(&records);
        self.records = records;
        self.selection.clear();
        self.deck = Deck::empty();
        self.cancel_pending();
        self.render_card();
    }

    pub fn records(&self) -> &[Arc<VocabRecord>] {
        &self.records
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current(&self) -> Option<&Arc<VocabRecord>> {
        self.deck.current()
    }

    pub fn card(&self) -> Option<CardFace> {
        self.card
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning(_))
    }

    pub fn pending(&self) -> Option<Transition> {
        match self.phase {
            Phase::Transitioning(transition) => Some(transition),
            Phase::Idle => None,
        }
    }

    pub fn controls(&self) -> Controls {
        Controls {
            previous: self.deck.has_previous(),
            next: self.deck.has_next(),
            shuffle: self.deck.can_shuffle(),
        }
    }

    pub fn position_label(&self) -> Option<String> {
        self.deck.position().map(|(position, size)| format!("{} / {}", position, size))
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.deck.is_empty() {
            return None;
        }
        if self.selection.is_empty() {
            Some(EmptyState::AwaitingSelection)
        } else {
            Some(EmptyState::NoMatches)
        }
    }

    pub fn can_move(&self, direction: Direction) -> bool {
        match direction {
            Direction::Next => self.deck.has_next(),
            Direction::Previous => self.deck.has_previous(),
        }
    }

    /// Takes the animation lock for a feasible move. Returns `None` when a
    /// transition is already running or the move is out of bounds.
    pub fn begin_transition(
        &mut self,
        direction: Direction,
        now: Instant,
    ) -> Option<TransitionHandle> {
        if let Phase::Transitioning(pending) = self.phase {
            debug!("Dropping {:?} request, {:?} still animating", direction, pending.handle);
            return None;
        }
        if !self.can_move(direction) {
            debug!("Ignoring infeasible {:?} request", direction);
            return None;
        }

        let handle = TransitionHandle(self.next_handle);
        self.next_handle += 1;
        self.phase = Phase::Transitioning(Transition { handle, direction, started_at: now });
        Some(handle)
    }

    /// Applies the pending move if `handle` is the one in flight. Stale or
    /// repeated handles are ignored, so this is safe to call more than once.
    pub fn complete_transition(&mut self, handle: TransitionHandle) -> bool {
        let transition = match self.phase {
            Phase::Transitioning(transition) if transition.handle == handle => transition,
            _ => return false,
        };

        self.phase = Phase::Idle;
        let moved = match transition.direction {
            Direction::Next => self.deck.advance(),
            Direction::Previous => self.deck.retreat(),
        };
        if let Err(e) = moved {
            warn!("Transition {:?} could not move the cursor: {}", handle, e);
        }

        self.render_card();
        true
    }

    /// Finishes a transition whose completion signal never arrived.
    pub fn release_stale(&mut self, now: Instant, timeout: Duration) -> bool {
        match self.phase {
            Phase::Transitioning(transition)
                if now.saturating_duration_since(transition.started_at) >= timeout =>
            {
                warn!("Transition {:?} timed out after {:?}, releasing lock", transition.handle, timeout);
                self.complete_transition(transition.handle)
            }
            _ => false,
        }
    }

    /// Reorders the deck and shows its first card. Refused while a transition
    /// holds the lock and when there is nothing to reorder.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.is_transitioning() || !self.deck.can_shuffle() {
            return false;
        }

        self.deck.shuffle(rng);
        self.render_card();
        debug!("Shuffled {} cards", self.deck.len());
        true
    }

    pub fn toggle_filter(&mut self, tag: &str) -> bool {
        let selected = self.selection.toggle(tag);
        self.rebuild_deck();
        selected
    }

    /// Clears the selection, which means every record is in the deck.
    pub fn show_all(&mut self) {
        self.selection.clear();
        self.rebuild_deck();
    }

    pub fn toggle_flip(&mut self) -> bool {
        match &mut self.card {
            Some(card) => {
                card.flipped = !card.flipped;
                true
            }
            None => false,
        }
    }

    fn rebuild_deck(&mut self) {
        self.deck = Deck::new(filter::apply(&self.records, &self.selection));
        self.cancel_pending();
        self.render_card();

        let tags: Vec<&str> = self.selection.tags().collect();
        info!("Deck rebuilt with {} cards for {:?}", self.deck.len(), tags);
    }

    fn cancel_pending(&mut self) {
        if let Phase::Transitioning(transition) = self.phase {
            debug!("Cancelling {:?}, its card was discarded", transition.handle);
        }
        self.phase = Phase::Idle;
    }

    fn render_card(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        self.card = self.deck.current().map(|record| CardFace {
            ordinal: record.ordinal,
            generation,
            flipped: false,
        });
    }
}
