//! Click-vs-drag classification.
//!
//! A pointer-up only counts as a click when it follows its pointer-down
//! within the time threshold, at exactly the same screen position, and the
//! pick ray hit the displayed mesh. Anything else (orbiting the camera,
//! long presses, clicks on empty space) is dropped without a signal.

use glam::{DVec3, Vec2};
use std::time::{Duration, Instant};

pub const DEFAULT_CLICK_THRESHOLD: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    #[default]
    Left,
    Middle,
    Right,
}

/// Raycast result against the currently displayed mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PickResult {
    pub hit: bool,
    pub point: Option<DVec3>,
}

impl PickResult {
    pub fn hit(point: DVec3) -> Self {
        Self {
            hit: true,
            point: Some(point),
        }
    }

    pub fn miss() -> Self {
        Self::default()
    }

    /// The picked point, only when the ray actually hit and reported one.
    pub fn picked_point(&self) -> Option<DVec3> {
        if self.hit {
            self.point
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDown {
    pub position: Vec2,
    pub at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerUp {
    pub position: Vec2,
    pub at: Instant,
    pub button: PointerButton,
    pub ctrl: bool,
    pub pick: PickResult,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(PointerDown),
    Up(PointerUp),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidClick {
    pub button: PointerButton,
    pub ctrl: bool,
    pub point: DVec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoPointerDown,
    HeldTooLong,
    Moved,
    MissedMesh,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    Click(ValidClick),
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickClassifier {
    threshold: Duration,
}

impl Default for ClickClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_CLICK_THRESHOLD)
    }
}

impl ClickClassifier {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Classifies a pointer-up against the pointer-down that preceded it.
    /// Stateless: the caller owns the pointer-down record.
    pub fn classify(&self, down: Option<&PointerDown>, up: &PointerUp) -> ClickOutcome {
        let Some(down) = down else {
            return ClickOutcome::Ignored(IgnoreReason::NoPointerDown);
        };
        if up.at.saturating_duration_since(down.at) > self.threshold {
            return ClickOutcome::Ignored(IgnoreReason::HeldTooLong);
        }
        if up.position != down.position {
            return ClickOutcome::Ignored(IgnoreReason::Moved);
        }
        let Some(point) = up.pick.picked_point() else {
            return ClickOutcome::Ignored(IgnoreReason::MissedMesh);
        };
        ClickOutcome::Click(ValidClick {
            button: up.button,
            ctrl: up.ctrl,
            point,
        })
    }
}
