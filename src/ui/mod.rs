//! egui overlay for the measurement tool.
//!
//! The panel holds no measurement state of its own. Each frame it draws what
//! the host currently shows and reports user actions as [`PanelEvent`]s.

use crate::host::{ResultText, StatusTone, ToolUiState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    Open,
    Close,
    ReferenceChanged(String),
}

/// Host-side tool state the panel renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub open_button_visible: bool,
    pub overlay_visible: bool,
    pub reference_text: String,
    pub result_text: String,
    pub tone: StatusTone,
}

impl PanelState {
    /// Assembles the panel input from what the host last published. No
    /// result yet reads as an empty error label.
    pub fn new(ui: ToolUiState, reference_text: &str, result: Option<&ResultText>) -> Self {
        let (result_text, tone) = result
            .map(|result| (result.text.clone(), result.tone))
            .unwrap_or_default();
        Self {
            open_button_visible: ui.open_button_visible,
            overlay_visible: ui.overlay_visible,
            reference_text: reference_text.to_string(),
            result_text,
            tone,
        }
    }
}

pub fn tone_color(tone: StatusTone) -> egui::Color32 {
    match tone {
        StatusTone::Success => egui::Color32::GREEN,
        StatusTone::Error => egui::Color32::RED,
    }
}

pub struct MeasurePanel {
    show_hints: bool,
    reference_text: String,
    host_reference_text: String,
}

impl Default for MeasurePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurePanel {
    pub fn new() -> Self {
        Self {
            show_hints: true,
            reference_text: String::new(),
            host_reference_text: String::new(),
        }
    }

    pub fn show_hints(&self) -> bool {
        self.show_hints
    }

    pub fn set_show_hints(&mut self, show: bool) {
        self.show_hints = show;
    }

    /// Text currently in the reference-length field.
    pub fn reference_text(&self) -> &str {
        &self.reference_text
    }

    pub fn show(&mut self, ctx: &egui::Context, state: &PanelState) -> Vec<PanelEvent> {
        let mut events = Vec::new();

        // The host overwrites the field on enable and disable.
        if state.reference_text != self.host_reference_text {
            self.host_reference_text = state.reference_text.clone();
            self.reference_text = state.reference_text.clone();
        }

        if state.open_button_visible {
            egui::Area::new(egui::Id::new("measure_open_button"))
                .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
                .show(ctx, |ui| {
                    if ui.button("Measure").clicked() {
                        events.push(PanelEvent::Open);
                    }
                });
        }

        if !state.overlay_visible {
            return events;
        }

        let show_hints = self.show_hints;
        let reference_text = &mut self.reference_text;
        egui::Window::new("Measure")
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::LEFT_TOP, [12.0, 12.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Reference length");
                    let response = ui.add(
                        egui::TextEdit::singleline(reference_text)
                            .hint_text("e.g. 1.5m")
                            .desired_width(80.0),
                    );
                    if response.changed() {
                        events.push(PanelEvent::ReferenceChanged(reference_text.clone()));
                    }
                });

                ui.separator();
                ui.colored_label(tone_color(state.tone), &state.result_text);

                if show_hints {
                    ui.separator();
                    ui.small("Left click: measurement start");
                    ui.small("Right click: measurement end");
                    ui.small("Ctrl + left click: reference start");
                    ui.small("Ctrl + right click: reference end");
                }

                ui.separator();
                if ui.button("Close").clicked() {
                    events.push(PanelEvent::Close);
                }
            });

        events
    }
}
