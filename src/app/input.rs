use crate::tools::click::{PickResult, PointerButton, PointerDown, PointerEvent, PointerUp};
use glam::Vec2;
use std::time::Instant;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::ModifiersState;

/// Turns raw window input into pointer events for the click tools.
#[derive(Default, Debug, Clone, Copy)]
pub struct PointerTracker {
    cursor: Option<Vec2>,
    ctrl: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn ctrl(&self) -> bool {
        self.ctrl
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
    }

    pub fn cursor_left(&mut self) {
        self.cursor = None;
    }

    pub fn modifiers_changed(&mut self, modifiers: ModifiersState) {
        self.ctrl = modifiers.control_key();
    }

    /// Maps a mouse button transition. `pick` casts the ray at the cursor
    /// and is only called on release.
    pub fn mouse_input(
        &mut self,
        state: ElementState,
        button: MouseButton,
        at: Instant,
        pick: impl FnOnce(Vec2) -> PickResult,
    ) -> Option<PointerEvent> {
        let button = map_mouse_button(button)?;
        let position = self.cursor?;

        match state {
            ElementState::Pressed => Some(PointerEvent::Down(PointerDown { position, at })),
            ElementState::Released => Some(PointerEvent::Up(PointerUp {
                position,
                at,
                button,
                ctrl: self.ctrl,
                pick: pick(position),
            })),
        }
    }
}

fn map_mouse_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Left),
        MouseButton::Right => Some(PointerButton::Right),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}
