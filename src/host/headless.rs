//! In-memory Scene Host.
//!
//! Records every effect the core asks for instead of rendering it. Used by
//! the session runner binary and as the test double throughout the crate.

use super::{
    MeshHandle, ResultText, SceneHost, StatusTone, SubscriptionHandle, ToolUiState, ViewerHost,
};
use crate::tools::measure::{MarkerRole, SegmentRole};
use glam::DVec3;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct MarkerState {
    pub position: DVec3,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct LineState {
    pub from: DVec3,
    pub to: DVec3,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PendingLoad {
    pub index: usize,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MeshState {
    pub index: usize,
    pub handle: MeshHandle,
    pub enabled: bool,
    pub position: DVec3,
}

#[derive(Debug, Default, serde::Serialize)]
pub struct HeadlessHost {
    markers: [MarkerState; 4],
    lines: [LineState; 2],
    reference_text: String,
    result: Option<ResultText>,
    tools: BTreeMap<String, ToolUiState>,
    live_subscriptions: Vec<SubscriptionHandle>,
    #[serde(skip)]
    next_subscription: u64,
    menu_visible: bool,
    back_button_visible: bool,
    loading_visible: bool,
    pending_loads: Vec<PendingLoad>,
    meshes: Vec<MeshState>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(&self, role: MarkerRole) -> MarkerState {
        self.markers[role.index()]
    }

    pub fn line(&self, segment: SegmentRole) -> LineState {
        self.lines[segment.index()]
    }

    pub fn any_marker_visible(&self) -> bool {
        self.markers.iter().any(|marker| marker.visible)
    }

    pub fn any_line_visible(&self) -> bool {
        self.lines.iter().any(|line| line.visible)
    }

    pub fn reference_text(&self) -> &str {
        &self.reference_text
    }

    pub fn result(&self) -> Option<&ResultText> {
        self.result.as_ref()
    }

    pub fn tool_ui(&self, tool: &str) -> ToolUiState {
        self.tools.get(tool).copied().unwrap_or_default()
    }

    pub fn live_subscriptions(&self) -> &[SubscriptionHandle] {
        &self.live_subscriptions
    }

    /// Total number of subscriptions ever handed out.
    pub fn subscriptions_created(&self) -> u64 {
        self.next_subscription
    }

    pub fn menu_visible(&self) -> bool {
        self.menu_visible
    }

    pub fn back_button_visible(&self) -> bool {
        self.back_button_visible
    }

    pub fn loading_visible(&self) -> bool {
        self.loading_visible
    }

    pub fn pending_loads(&self) -> &[PendingLoad] {
        &self.pending_loads
    }

    pub fn meshes(&self) -> &[MeshState] {
        &self.meshes
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshState> {
        self.meshes.iter().find(|mesh| mesh.handle == handle)
    }

    /// Finishes the pending load for `index`, as the renderer would once the
    /// mesh file has streamed in. The new mesh starts enabled at the origin.
    pub fn complete_load(&mut self, index: usize) -> Option<MeshHandle> {
        let position = self
            .pending_loads
            .iter()
            .position(|load| load.index == index)?;
        self.pending_loads.remove(position);

        let handle = MeshHandle::new(self.meshes.len() as u64 + 1);
        self.meshes.push(MeshState {
            index,
            handle,
            enabled: true,
            position: DVec3::ZERO,
        });
        Some(handle)
    }

    /// Drops the pending load for `index`, as a failed download would.
    pub fn fail_load(&mut self, index: usize) -> bool {
        let before = self.pending_loads.len();
        self.pending_loads.retain(|load| load.index != index);
        self.pending_loads.len() != before
    }

    fn mesh_mut(&mut self, handle: MeshHandle) -> Option<&mut MeshState> {
        self.meshes.iter_mut().find(|mesh| mesh.handle == handle)
    }

    fn tool_mut(&mut self, tool: &str) -> &mut ToolUiState {
        self.tools.entry(tool.to_string()).or_default()
    }
}

impl SceneHost for HeadlessHost {
    fn subscribe_pointer(&mut self) -> SubscriptionHandle {
        self.next_subscription += 1;
        let handle = SubscriptionHandle::new(self.next_subscription);
        self.live_subscriptions.push(handle);
        handle
    }

    fn unsubscribe_pointer(&mut self, handle: SubscriptionHandle) {
        let before = self.live_subscriptions.len();
        self.live_subscriptions.retain(|live| *live != handle);
        if self.live_subscriptions.len() == before {
            log::warn!("Unknown pointer subscription {}", handle.id());
        }
    }

    fn set_marker_position(&mut self, role: MarkerRole, position: DVec3) {
        self.markers[role.index()].position = position;
    }

    fn set_marker_visible(&mut self, role: MarkerRole, visible: bool) {
        self.markers[role.index()].visible = visible;
    }

    fn set_line_endpoints(&mut self, segment: SegmentRole, from: DVec3, to: DVec3) {
        let line = &mut self.lines[segment.index()];
        line.from = from;
        line.to = to;
    }

    fn set_line_visible(&mut self, segment: SegmentRole, visible: bool) {
        self.lines[segment.index()].visible = visible;
    }

    fn set_reference_text(&mut self, text: &str) {
        self.reference_text = text.to_string();
    }

    fn set_result(&mut self, text: &str, tone: StatusTone) {
        self.result = Some(ResultText {
            text: text.to_string(),
            tone,
        });
    }

    fn set_overlay_visible(&mut self, tool: &str, visible: bool) {
        self.tool_mut(tool).overlay_visible = visible;
    }

    fn set_open_button_visible(&mut self, tool: &str, visible: bool) {
        self.tool_mut(tool).open_button_visible = visible;
    }
}

impl ViewerHost for HeadlessHost {
    fn set_menu_visible(&mut self, visible: bool) {
        self.menu_visible = visible;
    }

    fn set_back_button_visible(&mut self, visible: bool) {
        self.back_button_visible = visible;
    }

    fn set_loading_visible(&mut self, visible: bool) {
        self.loading_visible = visible;
    }

    fn request_mesh_load(&mut self, index: usize, source: &str) {
        self.pending_loads.push(PendingLoad {
            index,
            source: source.to_string(),
        });
    }

    fn set_mesh_enabled(&mut self, mesh: MeshHandle, enabled: bool) {
        match self.mesh_mut(mesh) {
            Some(state) => state.enabled = enabled,
            None => log::warn!("Unknown mesh handle {}", mesh.id()),
        }
    }

    fn set_mesh_position(&mut self, mesh: MeshHandle, position: DVec3) {
        match self.mesh_mut(mesh) {
            Some(state) => state.position = position,
            None => log::warn!("Unknown mesh handle {}", mesh.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriptions_are_tracked_until_removed() {
        let mut host = HeadlessHost::new();
        let first = host.subscribe_pointer();
        let second = host.subscribe_pointer();
        assert_ne!(first, second);
        assert_eq!(host.live_subscriptions().len(), 2);

        host.unsubscribe_pointer(first);
        assert_eq!(host.live_subscriptions(), &[second]);
        host.unsubscribe_pointer(first);
        assert_eq!(host.live_subscriptions().len(), 1);
        assert_eq!(host.subscriptions_created(), 2);
    }

    #[test]
    fn complete_load_consumes_the_pending_request() {
        let mut host = HeadlessHost::new();
        host.request_mesh_load(3, "./fountain.glb");
        assert!(host.complete_load(1).is_none());

        let handle = host.complete_load(3).unwrap();
        assert!(host.pending_loads().is_empty());
        let mesh = host.mesh(handle).unwrap();
        assert_eq!(mesh.index, 3);
        assert!(mesh.enabled);
        assert!(host.complete_load(3).is_none());
    }

    #[test]
    fn tool_ui_defaults_to_hidden() {
        let mut host = HeadlessHost::new();
        assert_eq!(host.tool_ui("measure"), ToolUiState::default());
        host.set_open_button_visible("measure", true);
        assert!(host.tool_ui("measure").open_button_visible);
        assert!(!host.tool_ui("measure").overlay_visible);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut host = HeadlessHost::new();
        host.set_marker_position(MarkerRole::RefPoint1, DVec3::new(1.0, 2.0, 3.0));
        host.set_result("2m", StatusTone::Success);
        let json = serde_json::to_string_pretty(&host).unwrap();
        assert!(json.contains("\"success\""));
        assert!(!json.contains("next_subscription"));
    }
}
