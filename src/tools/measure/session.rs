use super::scaling::{compute_measurement, DisplayResult};
use super::{MarkerRole, SegmentRole};
use glam::DVec3;

/// One of the four measurement points.
///
/// `placed` is the data-model fact; whether the host currently renders the
/// marker is derived from it by the tool, never read back.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Marker {
    position: DVec3,
    placed: bool,
}

impl Marker {
    pub fn placed_at(position: DVec3) -> Self {
        Self {
            position,
            placed: true,
        }
    }

    pub fn unplaced() -> Self {
        Self::default()
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn placed_position(&self) -> Option<DVec3> {
        self.placed.then_some(self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Marker,
    pub end: Marker,
}

impl Segment {
    pub fn new(start: Marker, end: Marker) -> Self {
        Self { start, end }
    }

    /// Segment with both endpoints placed.
    pub fn between(start: DVec3, end: DVec3) -> Self {
        Self::new(Marker::placed_at(start), Marker::placed_at(end))
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_placed() && self.end.is_placed()
    }

    pub fn endpoints(&self) -> Option<(DVec3, DVec3)> {
        Some((self.start.placed_position()?, self.end.placed_position()?))
    }

    /// Distance between the endpoints in scene units; `None` until complete.
    pub fn local_length(&self) -> Option<f64> {
        self.endpoints().map(|(start, end)| start.distance(end))
    }
}

/// Measurement data for one enable/disable cycle on one mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasureSession {
    markers: [Marker; 4],
    reference_text: String,
}

impl MeasureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the marker for `role`, overwriting any earlier placement.
    pub fn place(&mut self, role: MarkerRole, point: DVec3) {
        self.markers[role.index()] = Marker::placed_at(point);
    }

    pub fn marker(&self, role: MarkerRole) -> Marker {
        self.markers[role.index()]
    }

    pub fn segment(&self, role: SegmentRole) -> Segment {
        let (start, end) = role.endpoints();
        Segment::new(self.marker(start), self.marker(end))
    }

    pub fn placed_count(&self) -> usize {
        self.markers.iter().filter(|marker| marker.is_placed()).count()
    }

    pub fn reference_text(&self) -> &str {
        &self.reference_text
    }

    pub fn set_reference_text(&mut self, text: &str) {
        self.reference_text = text.to_string();
    }

    pub fn result(&self) -> DisplayResult {
        compute_measurement(
            &self.segment(SegmentRole::Measurement),
            &self.segment(SegmentRole::Reference),
            &self.reference_text,
        )
    }
}
