use std::{
    sync::Arc,
    time::{
        Duration,
        Instant,
    },
};

use rand::Rng;
use tracing::debug;

use super::{
    gesture::{
        GestureOutcome,
        GestureRecognizer,
        DEFAULT_SWIPE_THRESHOLD,
    },
    navigation::{
        NavigationController,
        TransitionHandle,
    },
    Direction,
    VocabRecord,
};
use crate::speech::Speaker;

pub const DEFAULT_TRANSITION_TIMEOUT: Duration = Duration::from_millis(1500);

/// Everything the input layer can ask of a study session.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    ToggleFilter(String),
    ShowAll,
    Advance,
    Retreat,
    Shuffle,
    DragStart(f32),
    DragUpdate(f32),
    DragEnd,
    DragCancel,
    /// A click or tap on the card; flips it unless it ended a drag.
    Click,
    /// The pointer was released and no click will follow the drag.
    PointerReleased,
    /// Explicit flip (keyboard), not subject to drag suppression.
    ToggleFlip,
    TransitionFinished(TransitionHandle),
    Speak,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub swipe_threshold: f32,
    pub transition_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            transition_timeout: DEFAULT_TRANSITION_TIMEOUT,
        }
    }
}

/// One user's study state: the deck controller, the drag tracker, the random
/// source used for shuffles and the speech output. All input goes through
/// [`dispatch`](Self::dispatch).
pub struct StudySession<R> {
    nav: NavigationController,
    gesture: GestureRecognizer,
    rng: R,
    speaker: Box<dyn Speaker>,
    transition_timeout: Duration,
}

impl<R: Rng> StudySession<R> {
    pub fn new(
        records: Vec<Arc<VocabRecord>>,
        rng: R,
        speaker: Box<dyn Speaker>,
        options: SessionOptions,
    ) -> Self {
        Self {
            nav: NavigationController::new(records),
            gesture: GestureRecognizer::new(options.swipe_threshold),
            rng,
            speaker,
            transition_timeout: options.transition_timeout,
        }
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.nav
    }

    pub fn gesture(&self) -> &GestureRecognizer {
        &self.gesture
    }

    pub fn set_options(&mut self, options: SessionOptions) {
        self.gesture.set_threshold(options.swipe_threshold);
        self.transition_timeout = options.transition_timeout;
    }

    pub fn set_speaker(&mut self, speaker: Box<dyn Speaker>) {
        self.speaker.stop();
        self.speaker = speaker;
    }

    pub fn replace_records(&mut self, records: Vec<Arc<VocabRecord>>) {
        self.gesture.cancel();
        self.gesture.settle();
        self.nav.replace_records(records);
    }

    pub fn dispatch(&mut self, intent: Intent, now: Instant) {
        let generation = self.card_generation();
        self.apply(intent, now);
        if self.card_generation() != generation {
            self.gesture.settle();
        }
    }

    /// Periodic housekeeping; releases a transition lock whose completion
    /// signal never arrived.
    pub fn tick(&mut self, now: Instant) -> bool {
        let released = self.nav.release_stale(now, self.transition_timeout);
        if released {
            self.gesture.settle();
        }
        released
    }

    fn card_generation(&self) -> Option<u64> {
        self.nav.card().map(|card| card.generation)
    }

    fn apply(&mut self, intent: Intent, now: Instant) {
        match intent {
            Intent::ToggleFilter(tag) => {
                self.gesture.cancel();
                self.nav.toggle_filter(&tag);
            }
            Intent::ShowAll => {
                self.gesture.cancel();
                self.nav.show_all();
            }
            Intent::Advance => {
                self.nav.begin_transition(Direction::Next, now);
            }
            Intent::Retreat => {
                self.nav.begin_transition(Direction::Previous, now);
            }
            Intent::Shuffle => {
                self.nav.shuffle(&mut self.rng);
            }
            Intent::DragStart(x) => {
                self.gesture.begin(x, &self.nav);
            }
            Intent::DragUpdate(x) => {
                self.gesture.update(x);
            }
            Intent::DragEnd => {
                if let GestureOutcome::Rejected(direction) = self.gesture.end(&mut self.nav, now) {
                    debug!("Swipe towards {:?} rejected", direction);
                }
            }
            Intent::DragCancel => self.gesture.cancel(),
            Intent::PointerReleased => self.gesture.settle(),
            Intent::Click => {
                if self.gesture.take_click() {
                    self.nav.toggle_flip();
                }
            }
            Intent::ToggleFlip => {
                if !self.gesture.is_dragging() {
                    self.nav.toggle_flip();
                }
            }
            Intent::TransitionFinished(handle) => {
                self.nav.complete_transition(handle);
            }
            Intent::Speak => {
                if let Some(record) = self.nav.current() {
                    self.speaker.speak(&record.term);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        rc::Rc,
    };

    use rand::{
        rngs::StdRng,
        SeedableRng,
    };

    use super::*;
    use crate::speech::SilentSpeaker;

    #[derive(Clone, Default)]
    struct RecordingSpeaker {
        spoken: Rc<RefCell<Vec<String>>>,
    }

    impl Speaker for RecordingSpeaker {
        fn speak(&mut self, text: &str) {
            self.spoken.borrow_mut().push(text.to_string());
        }
    }

    fn records(categories: &[&str]) -> Vec<Arc<VocabRecord>> {
        categories
            .iter()
            .enumerate()
            .map(|(i, category)| {
                Arc::new(VocabRecord {
                    term: format!("词{}", i),
                    phonetic: format!("cí{}", i),
                    definition: format!("word {}", i),
                    category: category.to_string(),
                    ordinal: i,
                })
            })
            .collect()
    }

    fn session(categories: &[&str]) -> StudySession<StdRng> {
        StudySession::new(
            records(categories),
            StdRng::seed_from_u64(5),
            Box::new(SilentSpeaker),
            SessionOptions::default(),
        )
    }

    fn finish_pending(session: &mut StudySession<StdRng>, now: Instant) {
        let handle = session.navigation().pending().map(|t| t.handle).unwrap();
        session.dispatch(Intent::TransitionFinished(handle), now);
    }

    #[test]
    fn test_filter_advance_shuffle_scenario() {
        let now = Instant::now();
        let mut session = session(&["A", "A", "B"]);

        session.dispatch(Intent::ToggleFilter("A".to_string()), now);
        assert_eq!(session.navigation().deck().len(), 2);
        assert_eq!(session.navigation().deck().cursor(), 0);

        session.dispatch(Intent::Advance, now);
        finish_pending(&mut session, now);
        assert_eq!(session.navigation().deck().cursor(), 1);
        assert!(!session.navigation().deck().has_next());

        session.dispatch(Intent::Shuffle, now);
        assert_eq!(session.navigation().deck().cursor(), 0);
        let mut ordinals: Vec<usize> =
            session.navigation().deck().members().iter().map(|r| r.ordinal).collect();
        ordinals.sort_unstable();
        assert_eq!(ordinals, vec![0, 1]);
    }

    #[test]
    fn test_double_click_moves_once() {
        let now = Instant::now();
        let mut session = session(&["A", "A", "A"]);
        session.dispatch(Intent::ShowAll, now);

        session.dispatch(Intent::Advance, now);
        session.dispatch(Intent::Advance, now);
        finish_pending(&mut session, now);
        assert_eq!(session.navigation().deck().cursor(), 1);
        assert!(!session.navigation().is_transitioning());
    }

    #[test]
    fn test_swipe_then_click_does_not_flip() {
        let now = Instant::now();
        let mut session = session(&["A", "A", "A"]);
        session.dispatch(Intent::ShowAll, now);

        session.dispatch(Intent::DragStart(300.0), now);
        session.dispatch(Intent::DragUpdate(240.0), now);
        assert!(!session.navigation().is_transitioning());
        session.dispatch(Intent::DragEnd, now);
        assert!(session.navigation().is_transitioning());

        session.dispatch(Intent::Click, now);
        finish_pending(&mut session, now);
        assert_eq!(session.navigation().deck().cursor(), 1);
        assert!(!session.navigation().card().unwrap().flipped);

        session.dispatch(Intent::Click, now);
        assert!(session.navigation().card().unwrap().flipped);
        session.dispatch(Intent::ToggleFlip, now);
        assert!(!session.navigation().card().unwrap().flipped);
    }

    #[test]
    fn test_tap_after_swipe_flips_new_card() {
        let now = Instant::now();
        let mut session = session(&["A", "A", "A"]);
        session.dispatch(Intent::ShowAll, now);

        session.dispatch(Intent::DragStart(300.0), now);
        session.dispatch(Intent::DragUpdate(200.0), now);
        session.dispatch(Intent::DragEnd, now);
        finish_pending(&mut session, now);
        assert_eq!(session.navigation().deck().cursor(), 1);

        session.dispatch(Intent::Click, now);
        assert!(session.navigation().card().unwrap().flipped);
    }

    #[test]
    fn test_tap_after_snap_back_flips() {
        let now = Instant::now();
        let mut session = session(&["A", "A", "A"]);
        session.dispatch(Intent::ShowAll, now);

        session.dispatch(Intent::DragStart(300.0), now);
        session.dispatch(Intent::DragUpdate(280.0), now);
        session.dispatch(Intent::DragEnd, now);
        session.dispatch(Intent::PointerReleased, now);
        assert!(!session.navigation().is_transitioning());

        session.dispatch(Intent::Click, now);
        assert!(session.navigation().card().unwrap().flipped);
    }

    #[test]
    fn test_stale_release_clears_click_suppression() {
        let start = Instant::now();
        let mut session = session(&["A", "A"]);
        session.dispatch(Intent::ShowAll, start);

        session.dispatch(Intent::DragStart(300.0), start);
        session.dispatch(Intent::DragUpdate(200.0), start);
        session.dispatch(Intent::DragEnd, start);
        assert!(session.tick(start + DEFAULT_TRANSITION_TIMEOUT));

        session.dispatch(Intent::Click, start);
        assert!(session.navigation().card().unwrap().flipped);
    }

    #[test]
    fn test_swipe_during_transition_is_inert() {
        let now = Instant::now();
        let mut session = session(&["A", "A", "A"]);
        session.dispatch(Intent::ShowAll, now);
        session.dispatch(Intent::Advance, now);

        session.dispatch(Intent::DragStart(300.0), now);
        session.dispatch(Intent::DragUpdate(100.0), now);
        assert!(!session.gesture().is_dragging());
        session.dispatch(Intent::DragEnd, now);

        finish_pending(&mut session, now);
        assert_eq!(session.navigation().deck().cursor(), 1);
    }

    #[test]
    fn test_speak_routes_current_term() {
        let now = Instant::now();
        let speaker = RecordingSpeaker::default();
        let spoken = Rc::clone(&speaker.spoken);
        let mut session = StudySession::new(
            records(&["A", "A"]),
            StdRng::seed_from_u64(1),
            Box::new(speaker),
            SessionOptions::default(),
        );

        session.dispatch(Intent::Speak, now);
        assert!(spoken.borrow().is_empty());

        session.dispatch(Intent::ShowAll, now);
        session.dispatch(Intent::Speak, now);
        session.dispatch(Intent::Advance, now);
        finish_pending(&mut session, now);
        session.dispatch(Intent::Speak, now);
        assert_eq!(*spoken.borrow(), vec!["词0", "词1"]);
    }

    #[test]
    fn test_tick_releases_stuck_lock() {
        let start = Instant::now();
        let mut session = session(&["A", "A"]);
        session.set_options(SessionOptions {
            swipe_threshold: 40.0,
            transition_timeout: Duration::from_millis(200),
        });
        session.dispatch(Intent::ShowAll, start);
        session.dispatch(Intent::Advance, start);

        assert!(!session.tick(start + Duration::from_millis(50)));
        assert!(session.tick(start + Duration::from_millis(250)));
        assert_eq!(session.navigation().deck().cursor(), 1);
        assert!(!session.tick(start + Duration::from_millis(500)));
        assert_eq!(session.gesture().threshold(), 40.0);
    }
}
