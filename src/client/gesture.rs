//! Card swipe gesture
//!
//! Turns pointer/touch samples into one of three outcomes: commit (dismiss the
//! card as a skip), snap back, or suppressed. Only leftward dismissal exists;
//! rightward drags are damped so the card resists them.
//!
//! The translator owns no UI. Each event returns the resulting phase and the
//! intents the caller should carry out.

use super::Millis;

/// Release beyond this displacement always commits.
pub const COMMIT_DISTANCE: f64 = -120.0;
/// Smaller displacement that commits when paired with enough leftward speed.
pub const MOMENTUM_DISTANCE: f64 = -60.0;
/// px/ms
pub const MOMENTUM_VELOCITY: f64 = -0.3;
pub const RIGHTWARD_DAMPING: f64 = 0.15;
pub const VERTICAL_VETO_RATIO: f64 = 1.5;
pub const ROTATION_DIVISOR: f64 = 25.0;
pub const FADE_DISTANCE: f64 = 600.0;
pub const MIN_OPACITY: f64 = 0.4;
pub const SNAP_BACK_MS: u32 = 180;

/// A pointer or touch position at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub at: Millis,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, at: Millis) -> Self {
        Self { x, y, at }
    }
}

/// What the UI looks like when a pointer goes down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureContext {
    pub modal_open: bool,
    /// The press started on a button or other control
    pub on_interactive_control: bool,
    pub card_view_active: bool,
}

/// Visual state of the card while dragging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub translate_x: f64,
    pub rotate_deg: f64,
    pub opacity: f64,
}

impl CardTransform {
    pub const NEUTRAL: CardTransform = CardTransform {
        translate_x: 0.0,
        rotate_deg: 0.0,
        opacity: 1.0,
    };

    /// CSS transform value
    pub fn css(&self) -> String {
        format!(
            "translate3d({}px,0,0) rotate({}deg)",
            self.translate_x, self.rotate_deg
        )
    }
}

/// Transform for an (already damped) horizontal displacement
pub fn transform_for(dx: f64) -> CardTransform {
    CardTransform {
        translate_x: dx,
        rotate_deg: dx / ROTATION_DIVISOR,
        opacity: (1.0 - dx.abs() / FADE_DISTANCE).max(MIN_OPACITY),
    }
}

/// A sample whose vertical travel dominates is a scroll, not a swipe
pub fn is_vertical(dx: f64, dy: f64) -> bool {
    dy.abs() > dx.abs() * VERTICAL_VETO_RATIO
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Commit,
    SnapBack,
}

/// Release rule: far enough left, or moderately left with leftward momentum
pub fn decide(dx: f64, velocity: f64) -> Decision {
    if dx < COMMIT_DISTANCE || (dx < MOMENTUM_DISTANCE && velocity < MOMENTUM_VELOCITY) {
        Decision::Commit
    } else {
        Decision::SnapBack
    }
}

/// Why a pointer-down did not start a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    ModalOpen,
    InteractiveTarget,
    InactiveView,
    AlreadyDragging,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureIntent {
    /// Drop card transitions and mark card/overlay as dragging
    Capture,
    Transform(CardTransform),
    /// Remove drag styling and release pointer capture
    Release,
    /// Submit a skip vote, play the exit animation, advance
    CommitSkip,
    /// Animate back to `CardTransform::NEUTRAL`
    SnapBack { duration_ms: u32 },
    Suppressed(Suppression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Dragging,
}

/// Result of feeding one event to the translator
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub phase: GesturePhase,
    pub intents: Vec<GestureIntent>,
}

impl Transition {
    fn new(phase: GesturePhase, intents: Vec<GestureIntent>) -> Self {
        Self { phase, intents }
    }

    pub fn is_noop(&self) -> bool {
        self.intents.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct DragTrack {
    origin_x: f64,
    origin_y: f64,
    last_x: f64,
    last_at: Millis,
    /// Damped displacement of the last accepted sample
    dx: f64,
    /// px/ms between the last two accepted samples
    velocity: f64,
}

/// Swipe state machine: Idle <-> Dragging
#[derive(Debug, Default)]
pub struct GestureTranslator {
    drag: Option<DragTrack>,
}

impl GestureTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        if self.drag.is_some() {
            GesturePhase::Dragging
        } else {
            GesturePhase::Idle
        }
    }

    /// Current damped displacement and velocity, while dragging
    pub fn motion(&self) -> Option<(f64, f64)> {
        self.drag.map(|d| (d.dx, d.velocity))
    }

    pub fn on_pointer_down(&mut self, sample: PointerSample, ctx: GestureContext) -> Transition {
        let suppressed = if self.drag.is_some() {
            Some(Suppression::AlreadyDragging)
        } else if ctx.modal_open {
            Some(Suppression::ModalOpen)
        } else if ctx.on_interactive_control {
            Some(Suppression::InteractiveTarget)
        } else if !ctx.card_view_active {
            Some(Suppression::InactiveView)
        } else {
            None
        };

        if let Some(reason) = suppressed {
            return Transition::new(self.phase(), vec![GestureIntent::Suppressed(reason)]);
        }

        self.drag = Some(DragTrack {
            origin_x: sample.x,
            origin_y: sample.y,
            last_x: sample.x,
            last_at: sample.at,
            dx: 0.0,
            velocity: 0.0,
        });

        Transition::new(GesturePhase::Dragging, vec![GestureIntent::Capture])
    }

    pub fn on_pointer_move(&mut self, sample: PointerSample) -> Transition {
        let Some(drag) = self.drag.as_mut() else {
            return Transition::new(GesturePhase::Idle, Vec::new());
        };

        let raw_dx = sample.x - drag.origin_x;
        let dy = sample.y - drag.origin_y;
        if is_vertical(raw_dx, dy) {
            return Transition::new(GesturePhase::Dragging, Vec::new());
        }

        let dt = sample.at - drag.last_at;
        if dt > 0.0 {
            drag.velocity = (sample.x - drag.last_x) / dt;
        }

        drag.dx = if raw_dx > 0.0 {
            raw_dx * RIGHTWARD_DAMPING
        } else {
            raw_dx
        };
        drag.last_x = sample.x;
        drag.last_at = sample.at;

        Transition::new(
            GesturePhase::Dragging,
            vec![GestureIntent::Transform(transform_for(drag.dx))],
        )
    }

    pub fn on_pointer_up(&mut self) -> Transition {
        let Some(drag) = self.drag.take() else {
            return Transition::new(GesturePhase::Idle, Vec::new());
        };

        let outcome = match decide(drag.dx, drag.velocity) {
            Decision::Commit => GestureIntent::CommitSkip,
            Decision::SnapBack => GestureIntent::SnapBack {
                duration_ms: SNAP_BACK_MS,
            },
        };

        Transition::new(GesturePhase::Idle, vec![GestureIntent::Release, outcome])
    }

    /// The input system gave up on the pointer; settle as if released.
    pub fn on_pointer_cancel(&mut self) -> Transition {
        self.on_pointer_up()
    }
}
