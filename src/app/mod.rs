//! Scripted viewer sessions.
//!
//! A script is a JSON list of steps replayed against a [`ViewerSession`]
//! backed by the [`HeadlessHost`]. Host-side events that a renderer would
//! produce (load completion, pointer input, typing) are steps too, so a whole
//! interaction can be reproduced without a window.

pub mod input;

use crate::host::{HeadlessHost, SceneHost};
use crate::scene::serialization::{self, SerializationError};
use crate::scene::{SessionError, ViewerConfig, ViewerSession};
use crate::tools::click::{PickResult, PointerButton, PointerDown, PointerEvent, PointerUp};
use glam::{DVec3, Vec2};
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

/// Times (`t`) are milliseconds since the start of the script.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    Select {
        mesh: usize,
    },
    Loaded {
        mesh: usize,
    },
    LoadFailed {
        mesh: usize,
        #[serde(default)]
        reason: String,
    },
    Open,
    Close,
    Back,
    Reference {
        text: String,
    },
    Down {
        t: u64,
        x: f32,
        y: f32,
    },
    Up {
        t: u64,
        x: f32,
        y: f32,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        ctrl: bool,
        /// Picked point on the mesh; absent means the ray missed.
        #[serde(default)]
        pick: Option<DVec3>,
    },
    /// Down and up at the same spot, `hold_ms` apart.
    Click {
        t: u64,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
        #[serde(default)]
        hold_ms: u64,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        pick: Option<DVec3>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error("Step {step}: {source}")]
    Session {
        step: usize,
        #[source]
        source: SessionError,
    },
    #[error("Step {step}: no pending load for mesh {mesh}")]
    NoPendingLoad { step: usize, mesh: usize },
    #[error("Step {step}: timestamp out of range")]
    TimeOutOfRange { step: usize },
}

pub type Result<T> = std::result::Result<T, ScriptError>;

pub fn load_script_from_file(path: &Path) -> Result<Script> {
    let script: Script = serialization::read_json(path)?;
    log::info!(
        "Loaded script from {} ({} steps)",
        path.display(),
        script.steps.len()
    );
    Ok(script)
}

pub struct ScriptRunner {
    session: ViewerSession<HeadlessHost>,
    origin: Instant,
}

impl ScriptRunner {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            session: ViewerSession::new(HeadlessHost::new(), config),
            origin: Instant::now(),
        }
    }

    pub fn session(&self) -> &ViewerSession<HeadlessHost> {
        &self.session
    }

    pub fn into_host(self) -> HeadlessHost {
        self.session.into_host()
    }

    /// Replays every step in order, stopping at the first failure.
    pub fn run(&mut self, script: &Script) -> Result<()> {
        for (index, step) in script.steps.iter().enumerate() {
            self.apply(index, step)?;
            if let Some(result) = self.session.host().result() {
                log::info!("Step {} ({:?}): {}", index, step, result.text);
            }
        }
        Ok(())
    }

    pub fn apply(&mut self, index: usize, step: &ScriptStep) -> Result<()> {
        let session_err = |source| ScriptError::Session {
            step: index,
            source,
        };

        match step {
            ScriptStep::Select { mesh } => self.session.select_mesh(*mesh).map_err(session_err)?,
            ScriptStep::Loaded { mesh } => {
                let handle = self
                    .session
                    .host_mut()
                    .complete_load(*mesh)
                    .ok_or(ScriptError::NoPendingLoad {
                        step: index,
                        mesh: *mesh,
                    })?;
                self.session
                    .mesh_loaded(*mesh, handle)
                    .map_err(session_err)?;
            }
            ScriptStep::LoadFailed { mesh, reason } => {
                if !self.session.host_mut().fail_load(*mesh) {
                    return Err(ScriptError::NoPendingLoad {
                        step: index,
                        mesh: *mesh,
                    });
                }
                self.session
                    .mesh_load_failed(*mesh, reason)
                    .map_err(session_err)?;
            }
            ScriptStep::Open => self.session.open_tool(),
            ScriptStep::Close => self.session.close_tool(),
            ScriptStep::Back => self.session.back_to_menu(),
            ScriptStep::Reference { text } => {
                self.session.host_mut().set_reference_text(text);
                self.session.reference_text_changed(text);
            }
            ScriptStep::Down { t, x, y } => {
                let event = PointerEvent::Down(PointerDown {
                    position: Vec2::new(*x, *y),
                    at: self.at(index, *t)?,
                });
                self.session.pointer_event(&event);
            }
            ScriptStep::Up {
                t,
                x,
                y,
                button,
                ctrl,
                pick,
            } => {
                let event =
                    self.pointer_up(index, *t, Vec2::new(*x, *y), *button, *ctrl, *pick)?;
                self.session.pointer_event(&event);
            }
            ScriptStep::Click {
                t,
                x,
                y,
                hold_ms,
                button,
                ctrl,
                pick,
            } => {
                let position = Vec2::new(*x, *y);
                let down = PointerEvent::Down(PointerDown {
                    position,
                    at: self.at(index, *t)?,
                });
                let released = t
                    .checked_add(*hold_ms)
                    .ok_or(ScriptError::TimeOutOfRange { step: index })?;
                let up = self.pointer_up(index, released, position, *button, *ctrl, *pick)?;
                self.session.pointer_event(&down);
                self.session.pointer_event(&up);
            }
        }
        Ok(())
    }

    fn at(&self, step: usize, t: u64) -> Result<Instant> {
        self.origin
            .checked_add(Duration::from_millis(t))
            .ok_or(ScriptError::TimeOutOfRange { step })
    }

    fn pointer_up(
        &self,
        step: usize,
        t: u64,
        position: Vec2,
        button: PointerButton,
        ctrl: bool,
        pick: Option<DVec3>,
    ) -> Result<PointerEvent> {
        Ok(PointerEvent::Up(PointerUp {
            position,
            at: self.at(step, t)?,
            button,
            ctrl,
            pick: pick.map(PickResult::hit).unwrap_or_else(PickResult::miss),
        }))
    }
}
