//! Front-end application state
//!
//! `AppState` owns the deck, router, gesture translator and modals. Each input
//! returns the effects the view layer applies. Network work is requested with
//! `AppEffect::SubmitVote` and answered through [`AppState::reconcile_vote`].

use tracing::debug;

use super::card::{CardView, InfoPanel, RingAnimation, RingFrame};
use super::deck::Deck;
use super::frame::FrameSlot;
use super::gesture::{
    CardTransform, GestureContext, GestureIntent, GestureTranslator, PointerSample, Transition,
    SNAP_BACK_MS,
};
use super::modal::{Modal, Modals};
use super::profile::{self, ProfileView};
use super::router::{RouteIntent, View, ViewRouter};
use super::trending::{self, TrendingEntry};
use super::Millis;
use crate::auth::SessionUser;
use crate::models::{Record, VoteKind};

/// Card exit animation before the next record is shown
pub const EXIT_ANIMATION_MS: Millis = 340.0;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEffect {
    ShowCard(CardView),
    Ring(RingFrame),
    HighlightVote(VoteKind),
    ClearVoteHighlight,
    /// Send the vote to the server, then call `reconcile_vote`
    SubmitVote { record_id: String, kind: VoteKind },
    RenderTrending(Vec<TrendingEntry>),
    /// Start the swipe-out animation
    ExitCard,
    Gesture(GestureIntent),
    Route(RouteIntent),
    RenderProfile(ProfileView),
    OpenModal(Modal),
    CloseModal(Modal),
    ShowInfo(InfoPanel),
    ShowUser {
        avatar_letter: char,
        name: String,
        subtitle: &'static str,
    },
}

#[derive(Debug, Default)]
pub struct AppState {
    deck: Deck,
    router: ViewRouter,
    gesture: GestureTranslator,
    frame: FrameSlot<CardTransform>,
    modals: Modals,
    user: Option<SessionUser>,
    displayed_confidence: i64,
    ring: Option<RingAnimation>,
    exit_until: Option<Millis>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn modals(&self) -> &Modals {
        &self.modals
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn current_view(&self) -> View {
        self.router.current()
    }

    /// True between a vote and the next card being shown
    pub fn is_exiting(&self) -> bool {
        self.exit_until.is_some()
    }

    pub fn displayed_confidence(&self) -> i64 {
        self.displayed_confidence
    }

    /// Replace the deck with a freshly fetched record list.
    pub fn load(&mut self, records: Vec<Record>, now: Millis) -> Vec<AppEffect> {
        debug!(count = records.len(), "deck loaded");
        self.deck.replace(records);
        self.exit_until = None;
        self.render(now)
    }

    /// Show the current record and start its confidence ring.
    pub fn render(&mut self, now: Millis) -> Vec<AppEffect> {
        let mut effects = Vec::new();

        match self.deck.current() {
            Some(record) => {
                effects.push(AppEffect::ShowCard(CardView::from_record(record)));
                let ring = RingAnimation::new(self.displayed_confidence, record.confidence, now);
                effects.push(AppEffect::Ring(ring.frame(now)));
                self.ring = Some(ring);
            }
            None => {
                effects.push(AppEffect::ShowCard(CardView::placeholder()));
                self.ring = None;
            }
        }

        effects.push(AppEffect::ClearVoteHighlight);
        effects.push(AppEffect::RenderTrending(trending::rank(&self.deck)));
        effects
    }

    /// The one path every vote takes, whether from a button or a swipe.
    ///
    /// Applies the vote locally, asks for it to be submitted, re-ranks the
    /// trending list and starts the exit animation. The deck advances once
    /// `animation_frame` sees the animation finish.
    pub fn cast_vote(&mut self, kind: VoteKind, now: Millis) -> Vec<AppEffect> {
        if self.exit_until.is_some() {
            debug!(%kind, "vote ignored while card is leaving");
            return Vec::new();
        }

        let Some((record_id, confidence)) = self.deck.apply_local_vote(kind) else {
            return Vec::new();
        };
        debug!(record = %record_id, %kind, confidence, "vote cast");

        self.exit_until = Some(now + EXIT_ANIMATION_MS);

        vec![
            AppEffect::HighlightVote(kind),
            AppEffect::SubmitVote { record_id, kind },
            AppEffect::RenderTrending(trending::rank(&self.deck)),
            AppEffect::ExitCard,
        ]
    }

    /// Server answer to a `SubmitVote`
    pub fn reconcile_vote(&mut self, record_id: &str, confidence: i64) -> Vec<AppEffect> {
        if !self.deck.reconcile(record_id, confidence) {
            debug!(record = %record_id, "vote result for record not in deck");
            return Vec::new();
        }
        vec![AppEffect::RenderTrending(trending::rank(&self.deck))]
    }

    pub fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        now: Millis,
        on_interactive_control: bool,
    ) -> Vec<AppEffect> {
        let ctx = GestureContext {
            modal_open: self.modals.any_open(),
            on_interactive_control,
            card_view_active: self.router.current() == View::Home
                && !self.router.is_transitioning()
                && self.exit_until.is_none(),
        };
        let transition = self.gesture.on_pointer_down(PointerSample::new(x, y, now), ctx);
        self.apply_gesture(transition, now)
    }

    /// Moves only schedule a transform; it is delivered by `animation_frame`.
    pub fn pointer_move(&mut self, x: f64, y: f64, now: Millis) -> Vec<AppEffect> {
        let transition = self.gesture.on_pointer_move(PointerSample::new(x, y, now));
        self.apply_gesture(transition, now)
    }

    pub fn pointer_up(&mut self, now: Millis) -> Vec<AppEffect> {
        let transition = self.gesture.on_pointer_up();
        self.apply_gesture(transition, now)
    }

    pub fn pointer_cancel(&mut self, now: Millis) -> Vec<AppEffect> {
        let transition = self.gesture.on_pointer_cancel();
        self.apply_gesture(transition, now)
    }

    fn apply_gesture(&mut self, transition: Transition, now: Millis) -> Vec<AppEffect> {
        let mut effects = Vec::new();

        for intent in transition.intents {
            match intent {
                GestureIntent::Transform(transform) => {
                    self.frame.schedule(transform);
                }
                GestureIntent::Release => {
                    self.frame.cancel();
                    effects.push(AppEffect::Gesture(GestureIntent::Release));
                }
                GestureIntent::CommitSkip => {
                    let voted = self.cast_vote(VoteKind::Skip, now);
                    if voted.is_empty() {
                        // nothing to skip; the card still has to come back to rest
                        effects.push(AppEffect::Gesture(GestureIntent::SnapBack {
                            duration_ms: SNAP_BACK_MS,
                        }));
                    }
                    effects.extend(voted);
                }
                GestureIntent::Suppressed(reason) => {
                    debug!(?reason, "drag not started");
                }
                other => effects.push(AppEffect::Gesture(other)),
            }
        }

        effects
    }

    /// Display frame callback: flushes the pending card transform, steps the
    /// ring, finishes the exit animation and settles view transitions.
    pub fn animation_frame(&mut self, now: Millis) -> Vec<AppEffect> {
        let mut effects = Vec::new();

        if let Some(transform) = self.frame.take() {
            effects.push(AppEffect::Gesture(GestureIntent::Transform(transform)));
        }

        if let Some(ring) = self.ring {
            let frame = ring.frame(now);
            self.displayed_confidence = frame.value;
            if frame.done {
                self.ring = None;
            }
            effects.push(AppEffect::Ring(frame));
        }

        if self.exit_until.is_some_and(|until| now >= until) {
            self.exit_until = None;
            self.deck.advance();
            effects.extend(self.render(now));
        }

        for intent in self.router.tick(now) {
            match intent {
                RouteIntent::RenderProfile => {
                    effects.push(AppEffect::RenderProfile(self.profile()));
                }
                other => effects.push(AppEffect::Route(other)),
            }
        }

        effects
    }

    pub fn navigate(&mut self, to: View, now: Millis) -> Vec<AppEffect> {
        match self.router.navigate(to, now) {
            Ok(intents) => intents.into_iter().map(AppEffect::Route).collect(),
            Err(rejected) => {
                debug!(view = %to, %rejected, "navigation ignored");
                Vec::new()
            }
        }
    }

    pub fn profile(&self) -> ProfileView {
        profile::build(self.user.as_ref(), self.deck.records())
    }

    /// Jump to a record from the profile list and go back to the card.
    pub fn open_record(&mut self, id: &str, now: Millis) -> Vec<AppEffect> {
        let found = self.deck.select(id);
        let mut effects = self.navigate(View::Home, now);
        if found {
            self.exit_until = None;
            effects.extend(self.render(now));
        }
        effects
    }

    pub fn open_info(&mut self) -> Vec<AppEffect> {
        let Some(record) = self.deck.current() else {
            return Vec::new();
        };
        let panel = InfoPanel::from_record(record);
        self.modals.open(Modal::Info);
        vec![AppEffect::ShowInfo(panel), AppEffect::OpenModal(Modal::Info)]
    }

    pub fn open_feedback(&mut self) -> Vec<AppEffect> {
        self.modals.open(Modal::Feedback);
        vec![AppEffect::OpenModal(Modal::Feedback)]
    }

    /// Signed-out users are asked to sign in first.
    pub fn open_upload(&mut self) -> Vec<AppEffect> {
        let modal = if self.user.is_some() {
            Modal::Upload
        } else {
            Modal::Auth
        };
        self.modals.open(modal);
        vec![AppEffect::OpenModal(modal)]
    }

    pub fn close_modal(&mut self, modal: Modal) -> Vec<AppEffect> {
        if !self.modals.is_open(modal) {
            return Vec::new();
        }
        self.modals.close(modal);
        vec![AppEffect::CloseModal(modal)]
    }

    pub fn escape(&mut self) -> Vec<AppEffect> {
        self.modals
            .dismiss_top()
            .map(AppEffect::CloseModal)
            .into_iter()
            .collect()
    }

    /// A record the user just submitted goes to the front of the deck.
    pub fn record_created(&mut self, record: Record, now: Millis) -> Vec<AppEffect> {
        let mut effects = self.close_modal(Modal::Upload);
        self.deck.push_front(record);
        self.exit_until = None;
        effects.extend(self.render(now));
        effects
    }

    pub fn sign_in(&mut self, user: SessionUser) -> Vec<AppEffect> {
        debug!(user = %user.id, "signed in");
        self.user = Some(user);

        let mut effects = self.close_modal(Modal::Auth);
        effects.push(self.user_badge());
        if self.router.current() == View::Profile {
            effects.push(AppEffect::RenderProfile(self.profile()));
        }
        effects
    }

    pub fn sign_out(&mut self, now: Millis) -> Vec<AppEffect> {
        self.user = None;
        let mut effects = vec![self.user_badge()];
        effects.extend(self.navigate(View::Home, now));
        effects
    }

    pub fn user_badge(&self) -> AppEffect {
        match &self.user {
            Some(user) => {
                let name = user.display_name().to_string();
                AppEffect::ShowUser {
                    avatar_letter: name
                        .chars()
                        .next()
                        .map(|c| c.to_ascii_uppercase())
                        .unwrap_or('?'),
                    name,
                    subtitle: "Dashboard",
                }
            }
            None => AppEffect::ShowUser {
                avatar_letter: '?',
                name: "Guest".to_string(),
                subtitle: "Sign in to submit",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::deck::tests::sample;

    fn loaded() -> AppState {
        let mut app = AppState::new();
        app.load(
            vec![sample("a", "Alpha", 50), sample("b", "Beta", 60)],
            0.0,
        );
        app
    }

    fn swipe_left(app: &mut AppState, now: Millis) -> Vec<AppEffect> {
        app.pointer_down(300.0, 200.0, now, false);
        app.pointer_move(250.0, 200.0, now + 400.0);
        app.pointer_move(170.0, 200.0, now + 1000.0);
        app.pointer_up(now + 1000.0)
    }

    fn without_gesture(effects: Vec<AppEffect>) -> Vec<AppEffect> {
        effects
            .into_iter()
            .filter(|e| !matches!(e, AppEffect::Gesture(_)))
            .collect()
    }

    #[test]
    fn test_load_renders_first_card() {
        let mut app = AppState::new();
        let effects = app.load(vec![sample("a", "Alpha", 50)], 0.0);

        let AppEffect::ShowCard(card) = &effects[0] else {
            panic!("expected card first, got {:?}", effects[0]);
        };
        assert_eq!(card.name, "Alpha");
        assert!(effects.contains(&AppEffect::ClearVoteHighlight));
        assert!(matches!(effects.last(), Some(AppEffect::RenderTrending(t)) if t.len() == 1));
    }

    #[test]
    fn test_empty_deck_shows_placeholder() {
        let mut app = AppState::new();
        let effects = app.load(Vec::new(), 0.0);
        assert_eq!(effects[0], AppEffect::ShowCard(CardView::placeholder()));
        assert!(app.cast_vote(VoteKind::Yes, 10.0).is_empty());
    }

    #[test]
    fn test_vote_then_advance() {
        let mut app = loaded();

        let effects = app.cast_vote(VoteKind::Yes, 100.0);
        assert_eq!(effects[0], AppEffect::HighlightVote(VoteKind::Yes));
        assert_eq!(
            effects[1],
            AppEffect::SubmitVote {
                record_id: "a".into(),
                kind: VoteKind::Yes
            }
        );
        assert_eq!(effects[3], AppEffect::ExitCard);
        assert_eq!(app.deck().records()[0].confidence, 52);
        assert!(app.is_exiting());

        // second vote during the exit animation is dropped
        assert!(app.cast_vote(VoteKind::No, 200.0).is_empty());

        let early = app.animation_frame(100.0 + EXIT_ANIMATION_MS - 1.0);
        assert!(!early.iter().any(|e| matches!(e, AppEffect::ShowCard(_))));

        let done = app.animation_frame(100.0 + EXIT_ANIMATION_MS);
        assert!(done
            .iter()
            .any(|e| matches!(e, AppEffect::ShowCard(c) if c.name == "Beta")));
        assert!(!app.is_exiting());
        assert_eq!(app.deck().index(), 1);
    }

    #[test]
    fn test_advance_wraps_around() {
        let mut app = loaded();
        let mut now = 0.0;
        for _ in 0..2 {
            app.cast_vote(VoteKind::Maybe, now);
            now += EXIT_ANIMATION_MS;
            app.animation_frame(now);
        }
        assert_eq!(app.deck().current().unwrap().id, "a");
    }

    #[test]
    fn test_swipe_matches_skip_button() {
        let mut by_button = loaded();
        let mut by_swipe = loaded();

        let button = by_button.cast_vote(VoteKind::Skip, 1000.0);
        let swipe = without_gesture(swipe_left(&mut by_swipe, 0.0));
        assert_eq!(button, swipe);

        let button_done = by_button.animation_frame(2000.0);
        let swipe_done = without_gesture(by_swipe.animation_frame(2000.0));
        assert_eq!(button_done, swipe_done);

        let confidences = |app: &AppState| -> Vec<i64> {
            app.deck().records().iter().map(|r| r.confidence).collect()
        };
        assert_eq!(confidences(&by_button), vec![49, 60]);
        assert_eq!(confidences(&by_button), confidences(&by_swipe));
        assert_eq!(by_button.deck().index(), by_swipe.deck().index());
    }

    #[test]
    fn test_short_drag_snaps_back() {
        let mut app = loaded();
        app.pointer_down(300.0, 200.0, 0.0, false);
        app.pointer_move(280.0, 200.0, 500.0);
        let effects = app.pointer_up(500.0);

        assert_eq!(
            effects,
            vec![
                AppEffect::Gesture(GestureIntent::Release),
                AppEffect::Gesture(GestureIntent::SnapBack {
                    duration_ms: SNAP_BACK_MS
                }),
            ]
        );
        assert_eq!(app.deck().index(), 0);
    }

    #[test]
    fn test_commit_on_empty_deck_returns_card_to_rest() {
        let settle: [fn(&mut AppState, Millis) -> Vec<AppEffect>; 2] =
            [AppState::pointer_up, AppState::pointer_cancel];

        for release in settle {
            let mut app = AppState::new();
            app.load(Vec::new(), 0.0);

            app.pointer_down(300.0, 200.0, 0.0, false);
            app.pointer_move(150.0, 200.0, 100.0);
            let dragged = app.animation_frame(110.0);
            assert!(dragged.iter().any(|e| matches!(
                e,
                AppEffect::Gesture(GestureIntent::Transform(t)) if t.translate_x == -150.0
            )));

            let effects = release(&mut app, 120.0);
            assert_eq!(
                effects,
                vec![
                    AppEffect::Gesture(GestureIntent::Release),
                    AppEffect::Gesture(GestureIntent::SnapBack {
                        duration_ms: SNAP_BACK_MS
                    }),
                ]
            );
            assert!(!app.is_exiting());
            assert!(app.animation_frame(500.0).is_empty());
        }
    }

    #[test]
    fn test_moves_coalesce_into_one_frame() {
        let mut app = loaded();
        app.pointer_down(300.0, 200.0, 0.0, false);
        assert!(app.pointer_move(290.0, 200.0, 10.0).is_empty());
        assert!(app.pointer_move(280.0, 200.0, 20.0).is_empty());

        let transforms: Vec<_> = app
            .animation_frame(30.0)
            .into_iter()
            .filter_map(|e| match e {
                AppEffect::Gesture(GestureIntent::Transform(t)) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(transforms.len(), 1);
        assert_eq!(transforms[0].translate_x, -20.0);
    }

    #[test]
    fn test_release_drops_pending_frame() {
        let mut app = loaded();
        app.pointer_down(300.0, 200.0, 0.0, false);
        app.pointer_move(290.0, 200.0, 10.0);
        app.pointer_cancel(15.0);

        let effects = app.animation_frame(30.0);
        assert!(!effects
            .iter()
            .any(|e| matches!(e, AppEffect::Gesture(GestureIntent::Transform(_)))));
    }

    #[test]
    fn test_drag_suppressed_by_modal_or_view() {
        let mut app = loaded();
        app.open_info();
        assert!(app.pointer_down(300.0, 200.0, 0.0, false).is_empty());
        app.escape();

        assert!(app.pointer_down(300.0, 200.0, 0.0, true).is_empty());

        app.navigate(View::About, 0.0);
        app.animation_frame(400.0);
        assert_eq!(app.current_view(), View::About);
        assert!(app.pointer_down(300.0, 200.0, 500.0, false).is_empty());
    }

    #[test]
    fn test_ring_counts_from_displayed_value() {
        let mut app = loaded();
        app.animation_frame(1000.0);
        assert_eq!(app.displayed_confidence(), 50);

        app.cast_vote(VoteKind::Yes, 1000.0);
        let effects = app.animation_frame(1000.0 + EXIT_ANIMATION_MS);
        let first_ring = effects.iter().rev().find_map(|e| match e {
            AppEffect::Ring(frame) => Some(*frame),
            _ => None,
        });
        assert_eq!(first_ring.map(|f| f.value), Some(50));

        app.animation_frame(5000.0);
        assert_eq!(app.displayed_confidence(), 60);
    }

    #[test]
    fn test_reconcile_updates_trending() {
        let mut app = loaded();
        app.cast_vote(VoteKind::Yes, 0.0);

        let effects = app.reconcile_vote("a", 70);
        let [AppEffect::RenderTrending(entries)] = effects.as_slice() else {
            panic!("expected trending render, got {:?}", effects);
        };
        assert_eq!(entries[0].id, "a");
        assert_eq!(entries[0].confidence, 70);
        assert!(app.reconcile_vote("missing", 10).is_empty());
    }

    #[test]
    fn test_profile_renders_after_entry() {
        let mut app = loaded();
        app.sign_in(SessionUser {
            id: "u1".into(),
            name: Some("sam".into()),
        });

        app.navigate(View::Profile, 0.0);
        let effects = app.animation_frame(400.0);
        assert!(effects
            .iter()
            .any(|e| matches!(e, AppEffect::RenderProfile(ProfileView::Member(_)))));
    }

    #[test]
    fn test_upload_requires_sign_in() {
        let mut app = loaded();
        assert_eq!(app.open_upload(), vec![AppEffect::OpenModal(Modal::Auth)]);

        let effects = app.sign_in(SessionUser {
            id: "u1".into(),
            name: Some("sam".into()),
        });
        assert_eq!(effects[0], AppEffect::CloseModal(Modal::Auth));
        assert_eq!(
            effects[1],
            AppEffect::ShowUser {
                avatar_letter: 'S',
                name: "sam".into(),
                subtitle: "Dashboard"
            }
        );

        assert_eq!(app.open_upload(), vec![AppEffect::OpenModal(Modal::Upload)]);

        let mut created = sample("new", "Fresh", 50);
        created.owner_id = Some("u1".into());
        let effects = app.record_created(created, 0.0);
        assert_eq!(effects[0], AppEffect::CloseModal(Modal::Upload));
        assert_eq!(app.deck().current().unwrap().id, "new");
    }

    #[test]
    fn test_escape_closes_topmost() {
        let mut app = loaded();
        app.open_info();
        app.open_feedback();
        assert_eq!(app.escape(), vec![AppEffect::CloseModal(Modal::Feedback)]);
        assert_eq!(app.escape(), vec![AppEffect::CloseModal(Modal::Info)]);
        assert!(app.escape().is_empty());
    }

    #[test]
    fn test_open_record_from_profile() {
        let mut app = loaded();
        app.navigate(View::Profile, 0.0);
        app.animation_frame(400.0);

        let effects = app.open_record("b", 500.0);
        assert!(effects
            .iter()
            .any(|e| matches!(e, AppEffect::ShowCard(c) if c.name == "Beta")));
        app.animation_frame(900.0);
        assert_eq!(app.current_view(), View::Home);
    }
}
