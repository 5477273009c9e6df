//! Measurement tool.
//!
//! The user places a reference segment of known real-world length and a
//! measured segment on the mesh; the measured segment's real length follows
//! by proportional scaling and is republished whenever a point moves or the
//! reference text changes.
//!
//! Click roles depend only on the button and the ctrl modifier:
//!
//! | button | ctrl | marker |
//! | --- | --- | --- |
//! | left | no | `MeasPoint1` |
//! | left | yes | `RefPoint1` |
//! | right | no | `MeasPoint2` |
//! | right | yes | `RefPoint2` |

pub mod scaling;
mod session;

pub use scaling::{compute_measurement, DisplayResult};
pub use session::{Marker, MeasureSession, Segment};

use super::click::{PointerButton, ValidClick};
use super::ClickTool;
use crate::host::SceneHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum MarkerRole {
    RefPoint1,
    RefPoint2,
    MeasPoint1,
    MeasPoint2,
}

impl MarkerRole {
    pub const ALL: [MarkerRole; 4] = [
        MarkerRole::RefPoint1,
        MarkerRole::RefPoint2,
        MarkerRole::MeasPoint1,
        MarkerRole::MeasPoint2,
    ];

    /// Marker targeted by a click; middle clicks target nothing.
    pub fn for_click(button: PointerButton, ctrl: bool) -> Option<Self> {
        match (button, ctrl) {
            (PointerButton::Left, false) => Some(Self::MeasPoint1),
            (PointerButton::Left, true) => Some(Self::RefPoint1),
            (PointerButton::Right, false) => Some(Self::MeasPoint2),
            (PointerButton::Right, true) => Some(Self::RefPoint2),
            (PointerButton::Middle, _) => None,
        }
    }

    pub fn segment(self) -> SegmentRole {
        match self {
            Self::RefPoint1 | Self::RefPoint2 => SegmentRole::Reference,
            Self::MeasPoint1 | Self::MeasPoint2 => SegmentRole::Measurement,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::RefPoint1 => 0,
            Self::RefPoint2 => 1,
            Self::MeasPoint1 => 2,
            Self::MeasPoint2 => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum SegmentRole {
    Reference,
    Measurement,
}

impl SegmentRole {
    pub const ALL: [SegmentRole; 2] = [SegmentRole::Reference, SegmentRole::Measurement];

    pub fn endpoints(self) -> (MarkerRole, MarkerRole) {
        match self {
            Self::Reference => (MarkerRole::RefPoint1, MarkerRole::RefPoint2),
            Self::Measurement => (MarkerRole::MeasPoint1, MarkerRole::MeasPoint2),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Reference => 0,
            Self::Measurement => 1,
        }
    }
}

/// Click tool placing the four measurement markers.
///
/// The session only exists between enable and disable; nothing carries over
/// to the next mesh.
#[derive(Debug, Default)]
pub struct MeasurementTool {
    session: Option<MeasureSession>,
}

impl MeasurementTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&MeasureSession> {
        self.session.as_ref()
    }

    /// Current display result, `None` while the tool is disabled.
    pub fn result(&self) -> Option<DisplayResult> {
        self.session.as_ref().map(MeasureSession::result)
    }

    fn sync_segment(session: &MeasureSession, role: SegmentRole, host: &mut dyn SceneHost) {
        match session.segment(role).endpoints() {
            Some((from, to)) => {
                host.set_line_endpoints(role, from, to);
                host.set_line_visible(role, true);
            }
            None => host.set_line_visible(role, false),
        }
    }

    fn publish(session: &MeasureSession, host: &mut dyn SceneHost) {
        let result = session.result();
        let text = result.display_text();
        log::debug!("Measurement result: {:?} -> {}", result, text);
        host.set_result(&text, result.tone());
    }

    fn hide_all(host: &mut dyn SceneHost) {
        for role in MarkerRole::ALL {
            host.set_marker_visible(role, false);
        }
        for segment in SegmentRole::ALL {
            host.set_line_visible(segment, false);
        }
    }
}

impl ClickTool for MeasurementTool {
    const NAME: &'static str = "measure";

    fn on_enable(&mut self, host: &mut dyn SceneHost) {
        let session = MeasureSession::new();
        Self::hide_all(host);
        host.set_reference_text("");
        Self::publish(&session, host);
        self.session = Some(session);
    }

    fn on_click(&mut self, click: ValidClick, host: &mut dyn SceneHost) {
        let Some(role) = MarkerRole::for_click(click.button, click.ctrl) else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };

        session.place(role, click.point);
        host.set_marker_position(role, click.point);
        host.set_marker_visible(role, true);
        Self::sync_segment(session, role.segment(), host);
        Self::publish(session, host);
    }

    fn on_text_input(&mut self, text: &str, host: &mut dyn SceneHost) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        log::debug!("Reference length text: {:?}", text);
        session.set_reference_text(text);
        Self::publish(session, host);
    }

    fn on_disable(&mut self, host: &mut dyn SceneHost) {
        self.session = None;
        Self::hide_all(host);
        host.set_reference_text("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HeadlessHost, StatusTone};
    use crate::tools::click::{ClickClassifier, PickResult, PointerDown, PointerEvent, PointerUp};
    use crate::tools::ToolController;
    use glam::{DVec3, Vec2};
    use std::time::{Duration, Instant};

    struct Harness {
        host: HeadlessHost,
        controller: ToolController<MeasurementTool>,
        clock: Instant,
    }

    impl Harness {
        fn enabled() -> Self {
            let mut host = HeadlessHost::new();
            let mut controller =
                ToolController::init(MeasurementTool::new(), ClickClassifier::default(), &mut host);
            controller.enable(&mut host);
            Self {
                host,
                controller,
                clock: Instant::now(),
            }
        }

        fn click(&mut self, button: PointerButton, ctrl: bool, point: DVec3) {
            let position = Vec2::new(200.0, 120.0);
            self.clock += Duration::from_secs(1);
            let down = PointerEvent::Down(PointerDown {
                position,
                at: self.clock,
            });
            let up = PointerEvent::Up(PointerUp {
                position,
                at: self.clock + Duration::from_millis(60),
                button,
                ctrl,
                pick: PickResult::hit(point),
            });
            self.controller.handle_pointer(&down, &mut self.host);
            self.controller.handle_pointer(&up, &mut self.host);
        }

        fn type_reference(&mut self, text: &str) {
            self.host.set_reference_text(text);
            self.controller.text_input(text, &mut self.host);
        }

        fn result_text(&self) -> &str {
            &self.host.result().unwrap().text
        }
    }

    #[test]
    fn role_mapping_is_exhaustive() {
        assert_eq!(
            MarkerRole::for_click(PointerButton::Left, false),
            Some(MarkerRole::MeasPoint1)
        );
        assert_eq!(
            MarkerRole::for_click(PointerButton::Left, true),
            Some(MarkerRole::RefPoint1)
        );
        assert_eq!(
            MarkerRole::for_click(PointerButton::Right, false),
            Some(MarkerRole::MeasPoint2)
        );
        assert_eq!(
            MarkerRole::for_click(PointerButton::Right, true),
            Some(MarkerRole::RefPoint2)
        );
        assert_eq!(MarkerRole::for_click(PointerButton::Middle, true), None);
    }

    #[test]
    fn indices_are_distinct() {
        let mut seen = [false; 4];
        for role in MarkerRole::ALL {
            assert!(!seen[role.index()]);
            seen[role.index()] = true;
            let (start, end) = role.segment().endpoints();
            assert!(start == role || end == role);
        }
    }

    #[test]
    fn enable_starts_empty_with_error_status() {
        let harness = Harness::enabled();
        assert!(!harness.host.any_marker_visible());
        assert!(!harness.host.any_line_visible());
        assert_eq!(harness.host.reference_text(), "");
        let result = harness.host.result().unwrap();
        assert_eq!(result.text, "Place both measurement points");
        assert_eq!(result.tone, StatusTone::Error);
        assert_eq!(
            harness.controller.tool().result(),
            Some(DisplayResult::MeasurementIncomplete)
        );
    }

    #[test]
    fn line_appears_only_with_both_endpoints() {
        let mut harness = Harness::enabled();
        harness.click(PointerButton::Left, false, DVec3::ZERO);
        assert!(harness.host.marker(MarkerRole::MeasPoint1).visible);
        assert!(!harness.host.line(SegmentRole::Measurement).visible);

        harness.click(PointerButton::Right, false, DVec3::new(2.0, 0.0, 0.0));
        let line = harness.host.line(SegmentRole::Measurement);
        assert!(line.visible);
        assert_eq!(line.from, DVec3::ZERO);
        assert_eq!(line.to, DVec3::new(2.0, 0.0, 0.0));
        assert!(!harness.host.line(SegmentRole::Reference).visible);
    }

    #[test]
    fn full_measurement_updates_live() {
        let mut harness = Harness::enabled();
        harness.click(PointerButton::Left, false, DVec3::ZERO);
        harness.click(PointerButton::Right, false, DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(harness.result_text(), "Place both reference points");

        harness.click(PointerButton::Left, true, DVec3::ZERO);
        harness.click(PointerButton::Right, true, DVec3::X);
        assert_eq!(harness.result_text(), "Invalid reference length");

        harness.type_reference("1m");
        assert_eq!(harness.result_text(), "2m");
        assert_eq!(harness.host.result().unwrap().tone, StatusTone::Success);

        harness.type_reference("150cm");
        assert_eq!(harness.result_text(), "3m");

        harness.click(PointerButton::Right, false, DVec3::new(0.5, 0.0, 0.0));
        assert_eq!(harness.result_text(), "75cm");
        assert_eq!(
            harness.host.line(SegmentRole::Measurement).to,
            DVec3::new(0.5, 0.0, 0.0)
        );
    }

    #[test]
    fn degenerate_reference_is_reported() {
        let mut harness = Harness::enabled();
        harness.click(PointerButton::Left, false, DVec3::ZERO);
        harness.click(PointerButton::Right, false, DVec3::ONE);
        harness.click(PointerButton::Left, true, DVec3::Y);
        harness.click(PointerButton::Right, true, DVec3::Y);
        harness.type_reference("1m");
        assert_eq!(harness.result_text(), "Reference points must differ");
    }

    #[test]
    fn disable_clears_everything() {
        let mut harness = Harness::enabled();
        harness.click(PointerButton::Left, false, DVec3::ZERO);
        harness.click(PointerButton::Right, false, DVec3::X);
        harness.click(PointerButton::Left, true, DVec3::ZERO);
        harness.type_reference("1m");

        harness.controller.disable(&mut harness.host);

        assert!(!harness.host.any_marker_visible());
        assert!(!harness.host.any_line_visible());
        assert_eq!(harness.host.reference_text(), "");
        assert!(harness.host.live_subscriptions().is_empty());
        assert!(harness.controller.tool().session().is_none());
        assert!(!harness.host.tool_ui(MeasurementTool::NAME).overlay_visible);
    }

    #[test]
    fn reenable_starts_a_fresh_session() {
        let mut harness = Harness::enabled();
        harness.click(PointerButton::Left, false, DVec3::ONE);
        harness.controller.disable(&mut harness.host);
        harness.controller.enable(&mut harness.host);

        let session = harness.controller.tool().session().unwrap();
        assert_eq!(session.placed_count(), 0);
        assert_eq!(session.marker(MarkerRole::MeasPoint1).placed_position(), None);
    }

    #[test]
    fn middle_click_places_nothing() {
        let mut harness = Harness::enabled();
        harness.click(PointerButton::Middle, false, DVec3::ONE);
        assert!(!harness.host.any_marker_visible());
    }
}
