//! Viewer session: the mesh menu, per-slot load cache and the measurement
//! tool bound to whichever mesh is on screen.

pub mod serialization;

use crate::host::{MeshHandle, ViewerHost};
use crate::tools::click::{ClickClassifier, PointerEvent};
use crate::tools::measure::MeasurementTool;
use crate::tools::ToolController;
use glam::DVec3;
use std::time::{Duration, Instant};

/// One selectable mesh in the menu.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeshEntry {
    pub name: String,
    pub source: String,
    /// Applied once, right after the first load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<DVec3>,
}

impl MeshEntry {
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: DVec3) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub click_threshold_ms: u64,
    pub meshes: Vec<MeshEntry>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            click_threshold_ms: crate::tools::click::DEFAULT_CLICK_THRESHOLD.as_millis() as u64,
            meshes: vec![
                MeshEntry::new("Fountain", "./fountain.glb"),
                MeshEntry::new("Fountain Light", "./fountainLight.glb"),
                MeshEntry::new("Fountain Downscaled", "./fountainDownscaled.glb"),
                MeshEntry::new("Fountain Minimal", "./fountainLightDownscaled.glb"),
                MeshEntry::new("Monstree", "./monstree.glb")
                    .with_offset(DVec3::new(0.5, -1.5, 2.0)),
            ],
        }
    }
}

impl ViewerConfig {
    pub fn click_threshold(&self) -> Duration {
        Duration::from_millis(self.click_threshold_ms)
    }

    pub fn mesh(&self, index: usize) -> Option<&MeshEntry> {
        self.meshes.get(index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum SessionMode {
    Menu,
    Loading(usize),
    Viewing(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("No mesh at menu index {index}")]
    UnknownMesh { index: usize },
    #[error("Mesh {index} is not loading")]
    NotLoading { index: usize },
    #[error("Mesh {index} is still loading")]
    LoadInProgress { index: usize },
}

pub type Result<T> = std::result::Result<T, SessionError>;

pub struct ViewerSession<H: ViewerHost> {
    host: H,
    config: ViewerConfig,
    cache: Vec<Option<MeshHandle>>,
    mode: SessionMode,
    load_started: Option<Instant>,
    measure: ToolController<MeasurementTool>,
}

impl<H: ViewerHost> ViewerSession<H> {
    pub fn new(mut host: H, config: ViewerConfig) -> Self {
        let classifier = ClickClassifier::new(config.click_threshold());
        let measure = ToolController::init(MeasurementTool::new(), classifier, &mut host);
        host.set_menu_visible(true);
        host.set_back_button_visible(false);
        host.set_loading_visible(false);

        Self {
            cache: vec![None; config.meshes.len()],
            host,
            config,
            mode: SessionMode::Menu,
            load_started: None,
            measure,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn measure_tool(&self) -> &ToolController<MeasurementTool> {
        &self.measure
    }

    /// Cached handle for a menu slot, once it has loaded.
    pub fn cached_mesh(&self, index: usize) -> Option<MeshHandle> {
        self.cache.get(index).copied().flatten()
    }

    /// Switches to the mesh at `index`. Switching away from a displayed mesh
    /// goes through [`Self::back_to_menu`] first.
    pub fn select_mesh(&mut self, index: usize) -> Result<()> {
        let Some(entry) = self.config.mesh(index) else {
            return Err(SessionError::UnknownMesh { index });
        };
        if let SessionMode::Loading(loading) = self.mode {
            return Err(SessionError::LoadInProgress { index: loading });
        }
        let source = entry.source.clone();
        log::info!("Selected mesh '{}' ({})", entry.name, source);

        self.back_to_menu();

        self.host.set_menu_visible(false);

        if let Some(handle) = self.cached_mesh(index) {
            self.host.set_mesh_enabled(handle, true);
            self.enter_viewing(index);
            return Ok(());
        }

        self.mode = SessionMode::Loading(index);
        self.load_started = Some(Instant::now());
        self.host.set_loading_visible(true);
        self.host.request_mesh_load(index, &source);
        log::info!("Loading mesh {} from {}", index, source);
        Ok(())
    }

    /// Reports a finished load from the host.
    pub fn mesh_loaded(&mut self, index: usize, handle: MeshHandle) -> Result<()> {
        if self.mode != SessionMode::Loading(index) {
            log::warn!("Mesh {} finished loading but was not requested", index);
            return Err(SessionError::NotLoading { index });
        }

        self.cache[index] = Some(handle);
        if let Some(offset) = self.config.mesh(index).and_then(|entry| entry.offset) {
            self.host.set_mesh_position(handle, offset);
        }
        self.host.set_loading_visible(false);

        if let Some(started) = self.load_started.take() {
            log::info!(
                "Mesh {} loaded in {:.1} ms",
                index,
                started.elapsed().as_secs_f64() * 1000.0
            );
        }
        self.enter_viewing(index);
        Ok(())
    }

    /// Reports a failed load. The slot stays empty so a later selection
    /// retries.
    pub fn mesh_load_failed(&mut self, index: usize, reason: &str) -> Result<()> {
        if self.mode != SessionMode::Loading(index) {
            log::warn!("Mesh {} failed to load but was not requested", index);
            return Err(SessionError::NotLoading { index });
        }

        log::error!("Failed to load mesh {}: {}", index, reason);
        self.load_started = None;
        self.host.set_loading_visible(false);
        self.host.set_menu_visible(true);
        self.mode = SessionMode::Menu;
        Ok(())
    }

    /// Leaves the displayed mesh. The tool is disabled before the mesh goes
    /// away so no marker, line or subscription outlives it.
    pub fn back_to_menu(&mut self) {
        let SessionMode::Viewing(index) = self.mode else {
            return;
        };

        self.measure.disable(&mut self.host);
        self.measure.hide_button(&mut self.host);
        if let Some(handle) = self.cached_mesh(index) {
            self.host.set_mesh_enabled(handle, false);
        }
        self.host.set_back_button_visible(false);
        self.host.set_menu_visible(true);
        self.mode = SessionMode::Menu;
        log::info!("Back to menu");
    }

    /// Open button pressed. Ignored unless a mesh is displayed.
    pub fn open_tool(&mut self) {
        if matches!(self.mode, SessionMode::Viewing(_)) {
            self.measure.enable(&mut self.host);
        }
    }

    /// Close button pressed on the tool overlay.
    pub fn close_tool(&mut self) {
        self.measure.disable(&mut self.host);
        if matches!(self.mode, SessionMode::Viewing(_)) {
            self.measure.show_button(&mut self.host);
        }
    }

    pub fn pointer_event(&mut self, event: &PointerEvent) {
        self.measure.handle_pointer(event, &mut self.host);
    }

    /// The reference-length field changed.
    pub fn reference_text_changed(&mut self, text: &str) {
        self.measure.text_input(text, &mut self.host);
    }

    fn enter_viewing(&mut self, index: usize) {
        self.mode = SessionMode::Viewing(index);
        self.host.set_back_button_visible(true);
        self.measure.show_button(&mut self.host);
    }
}
