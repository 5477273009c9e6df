//! Click-driven tools layered over the displayed mesh.
//!
//! Every tool shares the same lifecycle and click detection; only what a
//! valid click does differs. [`ToolController`] owns the shared part (the
//! pointer subscription, the pending pointer-down record, the open button
//! and overlay visibility) and hands classified clicks to a [`ClickTool`].

pub mod click;
pub mod measure;

use crate::host::{SceneHost, SubscriptionHandle};
use click::{ClickClassifier, ClickOutcome, PointerDown, PointerEvent, ValidClick};

/// Per-tool behaviour plugged into a [`ToolController`].
pub trait ClickTool {
    /// Name the host uses to address this tool's open button and overlay.
    const NAME: &'static str;

    /// Called once per enable, after the pointer subscription exists.
    fn on_enable(&mut self, host: &mut dyn SceneHost);

    fn on_click(&mut self, click: ValidClick, host: &mut dyn SceneHost);

    /// Text typed into the tool's overlay input field.
    fn on_text_input(&mut self, _text: &str, _host: &mut dyn SceneHost) {}

    /// Tears down all visible tool state.
    fn on_disable(&mut self, host: &mut dyn SceneHost);
}

pub struct ToolController<T: ClickTool> {
    tool: T,
    classifier: ClickClassifier,
    subscription: Option<SubscriptionHandle>,
    pointer_down: Option<PointerDown>,
}

impl<T: ClickTool> ToolController<T> {
    /// Binds the tool to its host. The tool starts disabled with its open
    /// button hidden, since no mesh is displayed yet.
    pub fn init(tool: T, classifier: ClickClassifier, host: &mut dyn SceneHost) -> Self {
        let mut controller = Self {
            tool,
            classifier,
            subscription: None,
            pointer_down: None,
        };
        host.set_open_button_visible(T::NAME, false);
        host.set_overlay_visible(T::NAME, false);
        controller.tool.on_disable(host);
        controller
    }

    /// Opens the tool. Re-enabling an enabled tool only hides the button
    /// again; it never creates a second pointer subscription.
    pub fn enable(&mut self, host: &mut dyn SceneHost) {
        self.hide_button(host);
        if self.subscription.is_some() {
            return;
        }

        self.pointer_down = None;
        self.subscription = Some(host.subscribe_pointer());
        host.set_overlay_visible(T::NAME, true);
        self.tool.on_enable(host);
        log::info!("{} tool enabled", T::NAME);
    }

    /// Closes the tool. Safe to call when already disabled.
    pub fn disable(&mut self, host: &mut dyn SceneHost) {
        let Some(handle) = self.subscription.take() else {
            return;
        };

        host.unsubscribe_pointer(handle);
        self.pointer_down = None;
        self.tool.on_disable(host);
        host.set_overlay_visible(T::NAME, false);
        log::info!("{} tool disabled", T::NAME);
    }

    pub fn show_button(&mut self, host: &mut dyn SceneHost) {
        host.set_open_button_visible(T::NAME, true);
    }

    pub fn hide_button(&mut self, host: &mut dyn SceneHost) {
        host.set_open_button_visible(T::NAME, false);
    }

    pub fn is_enabled(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn subscription(&self) -> Option<SubscriptionHandle> {
        self.subscription
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Feeds one pointer event from the host's stream. Events arriving
    /// while the tool holds no subscription are dropped.
    pub fn handle_pointer(&mut self, event: &PointerEvent, host: &mut dyn SceneHost) {
        if self.subscription.is_none() {
            return;
        }

        match event {
            PointerEvent::Down(down) => self.pointer_down = Some(*down),
            PointerEvent::Up(up) => {
                let down = self.pointer_down.take();
                match self.classifier.classify(down.as_ref(), up) {
                    ClickOutcome::Click(click) => {
                        log::debug!(
                            "{} click: {:?} ctrl={} at {}",
                            T::NAME,
                            click.button,
                            click.ctrl,
                            click.point
                        );
                        self.tool.on_click(click, host);
                    }
                    ClickOutcome::Ignored(reason) => {
                        log::trace!("{} ignored pointer-up: {:?}", T::NAME, reason);
                    }
                }
            }
        }
    }

    pub fn text_input(&mut self, text: &str, host: &mut dyn SceneHost) {
        if self.subscription.is_none() {
            return;
        }
        self.tool.on_text_input(text, host);
    }
}

#[cfg(test)]
mod tests {
    use super::click::{PickResult, PointerButton, PointerUp};
    use super::*;
    use crate::host::HeadlessHost;
    use glam::{DVec3, Vec2};
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct RecordingTool {
        enables: usize,
        disables: usize,
        clicks: Vec<ValidClick>,
        texts: Vec<String>,
    }

    impl ClickTool for RecordingTool {
        const NAME: &'static str = "recording";

        fn on_enable(&mut self, _host: &mut dyn SceneHost) {
            self.enables += 1;
        }

        fn on_click(&mut self, click: ValidClick, _host: &mut dyn SceneHost) {
            self.clicks.push(click);
        }

        fn on_text_input(&mut self, text: &str, _host: &mut dyn SceneHost) {
            self.texts.push(text.to_string());
        }

        fn on_disable(&mut self, _host: &mut dyn SceneHost) {
            self.disables += 1;
        }
    }

    fn controller(host: &mut HeadlessHost) -> ToolController<RecordingTool> {
        ToolController::init(RecordingTool::default(), ClickClassifier::default(), host)
    }

    fn click_events(origin: Instant, ctrl: bool) -> [PointerEvent; 2] {
        let position = Vec2::new(10.0, 10.0);
        [
            PointerEvent::Down(PointerDown {
                position,
                at: origin,
            }),
            PointerEvent::Up(PointerUp {
                position,
                at: origin + Duration::from_millis(40),
                button: PointerButton::Right,
                ctrl,
                pick: PickResult::hit(DVec3::X),
            }),
        ]
    }

    #[test]
    fn init_hides_button_and_overlay() {
        let mut host = HeadlessHost::new();
        host.set_open_button_visible(RecordingTool::NAME, true);
        let controller = controller(&mut host);
        assert!(!controller.is_enabled());
        assert!(!host.tool_ui(RecordingTool::NAME).open_button_visible);
        assert!(!host.tool_ui(RecordingTool::NAME).overlay_visible);
    }

    #[test]
    fn enable_twice_subscribes_once() {
        let mut host = HeadlessHost::new();
        let mut controller = controller(&mut host);
        controller.show_button(&mut host);

        controller.enable(&mut host);
        controller.enable(&mut host);

        assert_eq!(host.live_subscriptions().len(), 1);
        assert_eq!(host.subscriptions_created(), 1);
        assert_eq!(controller.tool().enables, 1);
        let ui = host.tool_ui(RecordingTool::NAME);
        assert!(ui.overlay_visible);
        assert!(!ui.open_button_visible);
    }

    #[test]
    fn disable_when_never_enabled_is_a_noop() {
        let mut host = HeadlessHost::new();
        let mut controller = controller(&mut host);
        let disables_after_init = controller.tool().disables;

        controller.disable(&mut host);
        controller.disable(&mut host);

        assert_eq!(controller.tool().disables, disables_after_init);
        assert!(host.live_subscriptions().is_empty());
    }

    #[test]
    fn disable_releases_the_subscription() {
        let mut host = HeadlessHost::new();
        let mut controller = controller(&mut host);
        controller.enable(&mut host);
        controller.disable(&mut host);

        assert!(!controller.is_enabled());
        assert!(host.live_subscriptions().is_empty());
        assert!(!host.tool_ui(RecordingTool::NAME).overlay_visible);
    }

    #[test]
    fn clicks_reach_the_tool_only_while_enabled() {
        let mut host = HeadlessHost::new();
        let mut controller = controller(&mut host);
        let origin = Instant::now();

        for event in click_events(origin, false) {
            controller.handle_pointer(&event, &mut host);
        }
        assert!(controller.tool().clicks.is_empty());

        controller.enable(&mut host);
        for event in click_events(origin, true) {
            controller.handle_pointer(&event, &mut host);
        }
        assert_eq!(
            controller.tool().clicks,
            vec![ValidClick {
                button: PointerButton::Right,
                ctrl: true,
                point: DVec3::X,
            }]
        );
    }

    #[test]
    fn pointer_down_does_not_leak_across_sessions() {
        let mut host = HeadlessHost::new();
        let mut controller = controller(&mut host);
        let origin = Instant::now();
        let [down, up] = click_events(origin, false);

        controller.enable(&mut host);
        controller.handle_pointer(&down, &mut host);
        controller.disable(&mut host);
        controller.enable(&mut host);
        controller.handle_pointer(&up, &mut host);

        assert!(controller.tool().clicks.is_empty());
    }

    #[test]
    fn a_pointer_down_pairs_with_one_pointer_up() {
        let mut host = HeadlessHost::new();
        let mut controller = controller(&mut host);
        let origin = Instant::now();
        let [down, up] = click_events(origin, false);

        controller.enable(&mut host);
        controller.handle_pointer(&down, &mut host);
        controller.handle_pointer(&up, &mut host);
        controller.handle_pointer(&up, &mut host);

        assert_eq!(controller.tool().clicks.len(), 1);
    }

    #[test]
    fn text_input_is_forwarded_while_enabled() {
        let mut host = HeadlessHost::new();
        let mut controller = controller(&mut host);
        controller.text_input("ignored", &mut host);
        controller.enable(&mut host);
        controller.text_input("1m", &mut host);
        assert_eq!(controller.tool().texts, vec!["1m".to_string()]);
    }
}
