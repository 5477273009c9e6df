//! Scene Host interface.
//!
//! The rendering/scene layer (picking, marker meshes, GUI widgets, mesh
//! streaming) sits behind these traits. The core only ever talks to the host
//! through them, so it runs the same against a real renderer and against the
//! in-memory [`HeadlessHost`].

pub mod headless;

pub use headless::HeadlessHost;

use crate::tools::measure::{MarkerRole, SegmentRole};
use glam::DVec3;

/// Opaque handle for a pointer-event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Opaque handle for a mesh the host has finished loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct MeshHandle(u64);

impl MeshHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Colour signal for the result text: green for a value, red for any error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Success,
    #[default]
    Error,
}

/// Result label contents.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResultText {
    pub text: String,
    pub tone: StatusTone,
}

/// Visibility of one tool's open button and overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ToolUiState {
    pub open_button_visible: bool,
    pub overlay_visible: bool,
}

/// Scene-side surface a click tool drives.
///
/// `tool` arguments are the tool's name, used to address its own open
/// button and overlay.
pub trait SceneHost {
    fn subscribe_pointer(&mut self) -> SubscriptionHandle;
    fn unsubscribe_pointer(&mut self, handle: SubscriptionHandle);

    fn set_marker_position(&mut self, role: MarkerRole, position: DVec3);
    fn set_marker_visible(&mut self, role: MarkerRole, visible: bool);
    fn set_line_endpoints(&mut self, segment: SegmentRole, from: DVec3, to: DVec3);
    fn set_line_visible(&mut self, segment: SegmentRole, visible: bool);

    /// Overwrites the reference-length input field.
    fn set_reference_text(&mut self, text: &str);
    fn set_result(&mut self, text: &str, tone: StatusTone);

    fn set_overlay_visible(&mut self, tool: &str, visible: bool);
    fn set_open_button_visible(&mut self, tool: &str, visible: bool);
}

/// Menu and mesh-streaming surface used by the viewer session.
pub trait ViewerHost: SceneHost {
    fn set_menu_visible(&mut self, visible: bool);
    fn set_back_button_visible(&mut self, visible: bool);
    fn set_loading_visible(&mut self, visible: bool);

    /// Starts an asynchronous load. Completion is reported back through
    /// `ViewerSession::mesh_loaded` or `ViewerSession::mesh_load_failed`.
    fn request_mesh_load(&mut self, index: usize, source: &str);
    fn set_mesh_enabled(&mut self, mesh: MeshHandle, enabled: bool);
    fn set_mesh_position(&mut self, mesh: MeshHandle, position: DVec3);
}
