//! View routing
//!
//! Four views in a fixed left-to-right order. Moving to a view further right
//! slides it in from the right; moving left slides the current view out to the
//! left. A transition locks the router until its animation window has elapsed.

use std::fmt;
use std::str::FromStr;

use super::Millis;

/// Lockout window of one transition
pub const TRANSITION_MS: Millis = 320.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    About,
    Explore,
    Profile,
}

impl View {
    pub const ORDER: [View; 4] = [View::Home, View::About, View::Explore, View::Profile];

    pub fn position(self) -> usize {
        match self {
            View::Home => 0,
            View::About => 1,
            View::Explore => 2,
            View::Profile => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            View::Home => "home",
            View::About => "about",
            View::Explore => "explore",
            View::Profile => "profile",
        }
    }

    pub fn theme(self) -> Theme {
        match self {
            View::Home => Theme {
                bg: "#F6F6F6",
                tint: "rgba(255,203,116,.25)",
                darkwash: "rgba(17,17,17,.06)",
            },
            View::About => Theme {
                bg: "#F1F1F1",
                tint: "rgba(255,203,116,.18)",
                darkwash: "rgba(17,17,17,.10)",
            },
            View::Explore => Theme {
                bg: "#ECECEC",
                tint: "rgba(255,203,116,.12)",
                darkwash: "rgba(17,17,17,.14)",
            },
            View::Profile => Theme {
                bg: "#EFEFEF",
                tint: "rgba(255,203,116,.16)",
                darkwash: "rgba(17,17,17,.12)",
            },
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view '{0}'")]
pub struct UnknownView(pub String);

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ORDER
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}

/// Page colors applied per view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg: &'static str,
    pub tint: &'static str,
    pub darkwash: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Target enters from the right
    Forward,
    /// Current view exits to the left
    Backward,
}

impl Direction {
    pub fn between(from: View, to: View) -> Self {
        if to.position() > from.position() {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteIntent {
    SetTheme(Theme),
    HighlightNav(View),
    Activate { view: View, enter_from_right: bool },
    ExitToLeft(View),
    Deactivate(View),
    /// Entry into the profile view finished
    RenderProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RouteRejected {
    #[error("a view transition is already in progress")]
    InProgress,
    #[error("view is already active")]
    AlreadyActive,
}

#[derive(Debug, Clone, Copy)]
struct PendingTransition {
    from: View,
    to: View,
    started: Millis,
}

#[derive(Debug)]
pub struct ViewRouter {
    current: View,
    pending: Option<PendingTransition>,
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self {
            current: View::Home,
            pending: None,
        }
    }
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The settled view. During a transition this is still the view being left.
    pub fn current(&self) -> View {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a transition to `to`.
    pub fn navigate(&mut self, to: View, now: Millis) -> Result<Vec<RouteIntent>, RouteRejected> {
        if self.pending.is_some() {
            return Err(RouteRejected::InProgress);
        }
        if to == self.current {
            return Err(RouteRejected::AlreadyActive);
        }

        let from = self.current;
        let direction = Direction::between(from, to);
        self.pending = Some(PendingTransition {
            from,
            to,
            started: now,
        });

        let mut intents = vec![
            RouteIntent::Activate {
                view: to,
                enter_from_right: direction == Direction::Forward,
            },
            RouteIntent::SetTheme(to.theme()),
            RouteIntent::HighlightNav(to),
        ];
        if direction == Direction::Backward {
            intents.push(RouteIntent::ExitToLeft(from));
        }
        Ok(intents)
    }

    /// Advance time; completes the pending transition once its window elapsed.
    pub fn tick(&mut self, now: Millis) -> Vec<RouteIntent> {
        let Some(pending) = self.pending else {
            return Vec::new();
        };
        if now - pending.started < TRANSITION_MS {
            return Vec::new();
        }

        self.pending = None;
        self.current = pending.to;

        let mut intents = vec![RouteIntent::Deactivate(pending.from)];
        if pending.to == View::Profile {
            intents.push(RouteIntent::RenderProfile);
        }
        intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_views() {
        assert_eq!("explore".parse::<View>().unwrap(), View::Explore);
        assert!("settings".parse::<View>().is_err());
        for view in View::ORDER {
            assert_eq!(view.to_string().parse::<View>().unwrap(), view);
        }
    }

    #[test]
    fn test_forward_transition() {
        let mut router = ViewRouter::new();
        let intents = router.navigate(View::Explore, 0.0).unwrap();

        assert_eq!(
            intents[0],
            RouteIntent::Activate {
                view: View::Explore,
                enter_from_right: true
            }
        );
        assert!(intents.contains(&RouteIntent::SetTheme(View::Explore.theme())));
        assert!(!intents.iter().any(|i| matches!(i, RouteIntent::ExitToLeft(_))));
        assert_eq!(router.current(), View::Home);

        assert!(router.tick(100.0).is_empty());
        assert_eq!(router.tick(320.0), vec![RouteIntent::Deactivate(View::Home)]);
        assert_eq!(router.current(), View::Explore);
        assert!(!router.is_transitioning());
    }

    #[test]
    fn test_backward_transition_exits_left() {
        let mut router = ViewRouter::new();
        router.navigate(View::About, 0.0).unwrap();
        router.tick(400.0);

        let intents = router.navigate(View::Home, 500.0).unwrap();
        assert!(intents.contains(&RouteIntent::Activate {
            view: View::Home,
            enter_from_right: false
        }));
        assert!(intents.contains(&RouteIntent::ExitToLeft(View::About)));
    }

    #[test]
    fn test_lockout() {
        let mut router = ViewRouter::new();
        router.navigate(View::About, 0.0).unwrap();
        assert_eq!(
            router.navigate(View::Profile, 100.0),
            Err(RouteRejected::InProgress)
        );

        router.tick(320.0);
        assert!(router.navigate(View::Profile, 330.0).is_ok());
    }

    #[test]
    fn test_same_view_rejected() {
        let mut router = ViewRouter::new();
        assert_eq!(router.navigate(View::Home, 0.0), Err(RouteRejected::AlreadyActive));
        assert!(!router.is_transitioning());
    }

    #[test]
    fn test_profile_renders_on_completion() {
        let mut router = ViewRouter::new();
        let start = router.navigate(View::Profile, 0.0).unwrap();
        assert!(!start.contains(&RouteIntent::RenderProfile));

        let done = router.tick(TRANSITION_MS);
        assert_eq!(
            done,
            vec![RouteIntent::Deactivate(View::Home), RouteIntent::RenderProfile]
        );
    }
}
