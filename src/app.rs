//! Application state and command dispatch.
//!
//! `App` is the controller. It owns the engine binding, the view state, both
//! forms and panels, the notification stack and the task scheduler, and it
//! is the only thing that mutates them. Everything runs on the main loop's
//! thread; time-dependent operations take `now` so the loop (or a test)
//! decides what time it is.

use crate::config::Config;
use crate::engine::{EngineBinding, LoadResult, Readiness};
use crate::error::CommandError;
use crate::form::{self, ChordForm, Form, ScaleForm};
use crate::music::GenerationResult;
use crate::notify::{NotificationCenter, NotificationId};
use crate::panel::{ElementId, PanelView};
use crate::scheduler::Scheduler;
use crate::view::{View, ViewState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

/// Shown when a command arrives before the engine has loaded.
const NOT_READY_MESSAGE: &str = "Music theory engine not ready. Please wait...";

/// Shown when the engine failed to load.
const UNAVAILABLE_MESSAGE: &str =
    "Failed to load music theory engine. Please restart the application.";

/// A timed action, keyed by what it affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Start the reveal transition of one rendered note.
    Reveal { view: View, element: ElementId },
    /// Remove one notification.
    Dismiss(NotificationId),
}

/// What happened to a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not bound; the terminal's own handling applies.
    Ignored,
    /// Bound and consumed.
    Handled,
    Quit,
}

/// Screen regions for mouse hit testing, updated every frame.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegions {
    /// Tab titles.
    pub tabs: Vec<(View, Rect)>,
    /// The active panel's Generate button.
    pub generate_button: Rect,
    /// One row per field of the active panel's form.
    pub fields: Vec<Rect>,
}

impl LayoutRegions {
    /// Checks if a point is within a rectangle.
    fn contains(rect: Rect, x: u16, y: u16) -> bool {
        x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
    }

    pub fn tab_at(&self, x: u16, y: u16) -> Option<View> {
        self.tabs
            .iter()
            .find(|(_, rect)| Self::contains(*rect, x, y))
            .map(|(view, _)| *view)
    }

    pub fn is_generate_button(&self, x: u16, y: u16) -> bool {
        Self::contains(self.generate_button, x, y)
    }

    pub fn field_at(&self, x: u16, y: u16) -> Option<usize> {
        self.fields
            .iter()
            .position(|rect| Self::contains(*rect, x, y))
    }
}

/// Main application state.
pub struct App {
    config: Config,
    engine: EngineBinding,
    view: ViewState,
    pub scale_form: ScaleForm,
    pub chord_form: ChordForm,
    scale_panel: PanelView,
    chord_panel: PanelView,
    notifications: NotificationCenter,
    scheduler: Scheduler<Task>,
    /// Layout regions for mouse hit testing.
    pub layout: LayoutRegions,
    /// Whether the help overlay is visible.
    pub show_help: bool,
}

impl App {
    /// Creates the controller with the engine not yet loading.
    pub fn new(config: Config) -> Self {
        Self {
            engine: EngineBinding::new(),
            view: ViewState::new(config.initial_view),
            scale_form: ScaleForm::new(&config.scale_defaults),
            chord_form: ChordForm::new(&config.chord_defaults),
            scale_panel: PanelView::new(),
            chord_panel: PanelView::new(),
            notifications: NotificationCenter::new(config.timing.max_notifications),
            scheduler: Scheduler::new(),
            layout: LayoutRegions::default(),
            show_help: false,
            config,
        }
    }

    // ==================== Engine lifecycle ====================

    /// Starts loading the engine in the background.
    ///
    /// Generation commands are rejected until the load finishes. A second
    /// call is ignored: the engine is loaded once per process.
    pub fn start_engine<F>(&mut self, loader: F)
    where
        F: FnOnce() -> LoadResult + Send + 'static,
    {
        if let Err(e) = self.engine.initialize(loader) {
            tracing::warn!("Engine start ignored: {}", e);
        }
    }

    /// Blocks for up to `timeout` waiting for the engine, then applies the
    /// outcome like [`tick`](Self::tick) would.
    pub fn wait_for_engine(&mut self, timeout: Duration, now: Instant) -> Readiness {
        let before = self.engine.readiness();
        let after = self.engine.wait(timeout);
        if before == Readiness::NotReady && after != Readiness::NotReady {
            self.on_readiness_changed(after, now);
        }
        after
    }

    fn on_readiness_changed(&mut self, readiness: Readiness, now: Instant) {
        match readiness {
            Readiness::Ready => {
                if let Some(capabilities) = self.engine.capabilities().cloned() {
                    self.scale_form.populate(&capabilities);
                    self.chord_form.populate(&capabilities);
                }
                // Show an example in each panel straight away
                let _ = self.run_scale_generation(now);
                let _ = self.run_chord_generation(now);
            }
            Readiness::Failed => {
                let message = match self.engine.init_error() {
                    Some(e) => format!(
                        "Failed to load music theory engine ({}). Please restart the application.",
                        e
                    ),
                    None => UNAVAILABLE_MESSAGE.to_string(),
                };
                self.notify(message, now);
            }
            Readiness::NotReady => {}
        }
    }

    /// Advances the controller to `now`.
    ///
    /// Picks up a finished engine load and runs every due task. Called once
    /// per frame by the main loop.
    pub fn tick(&mut self, now: Instant) {
        if let Some(readiness) = self.engine.poll() {
            self.on_readiness_changed(readiness, now);
        }

        for task in self.scheduler.drain_due(now) {
            match task {
                Task::Reveal { view, element } => {
                    if !self.panel_mut(view).reveal(element, now) {
                        tracing::trace!("Reveal for removed element {:?} skipped", element);
                    }
                }
                Task::Dismiss(id) => {
                    if !self.notifications.dismiss(id) {
                        tracing::trace!("Notification {:?} already gone", id);
                    }
                }
            }
        }
    }

    // ==================== Notifications ====================

    /// Shows a transient notification that dismisses itself.
    pub fn notify(&mut self, message: impl Into<String>, now: Instant) {
        let (id, superseded) = self.notifications.push(message, now);
        for old in superseded {
            self.scheduler
                .cancel_where(|task| *task == Task::Dismiss(old));
        }
        self.scheduler
            .schedule(now + self.config.timing.notification(), Task::Dismiss(id));
    }

    // ==================== Generation commands ====================

    /// Generates a scale from the scale form into the scale panel.
    ///
    /// Returns the number of rendered notes. On failure exactly one
    /// notification is shown and the panel keeps its previous content.
    pub fn run_scale_generation(&mut self, now: Instant) -> Result<usize, CommandError> {
        self.run_generation(View::Scales, now)
    }

    /// Generates a chord from the chord form into the chord panel.
    pub fn run_chord_generation(&mut self, now: Instant) -> Result<usize, CommandError> {
        self.run_generation(View::Chords, now)
    }

    /// Regenerates whichever panel is active.
    pub fn run_active_generation(&mut self, now: Instant) -> Result<usize, CommandError> {
        self.run_generation(self.view.active(), now)
    }

    fn run_generation(&mut self, view: View, now: Instant) -> Result<usize, CommandError> {
        match self.generate(view) {
            Ok(result) => Ok(self.render(view, &result, now)),
            Err(e) => {
                tracing::warn!("{} generation failed: {}", view.title(), e);
                let message = failure_message(view, &e);
                self.notify(message, now);
                Err(e)
            }
        }
    }

    fn generate(&self, view: View) -> Result<GenerationResult, CommandError> {
        match self.engine.readiness() {
            Readiness::Ready => {}
            Readiness::NotReady => return Err(CommandError::NotReady),
            Readiness::Failed => return Err(CommandError::EngineUnavailable),
        }
        let request = form::read_request(view, &self.scale_form, &self.chord_form)?;
        self.engine.generate(&request)
    }

    /// Renders `result` into a panel and schedules the staggered reveal.
    fn render(&mut self, view: View, result: &GenerationResult, now: Instant) -> usize {
        // Reveals for the elements about to be replaced
        self.scheduler
            .cancel_where(|task| matches!(task, Task::Reveal { view: v, .. } if *v == view));

        let ids = self.panel_mut(view).render(result);
        let step = self.config.timing.reveal_step();
        let mut due = now;
        for &element in &ids {
            self.scheduler.schedule(due, Task::Reveal { view, element });
            due += step;
        }
        ids.len()
    }

    // ==================== View switching ====================

    /// Makes `view` the active panel. Returns true if it changed.
    pub fn switch_view(&mut self, view: View) -> bool {
        self.view.switch_to(view)
    }

    // ==================== Input ====================

    /// Dispatches a key press.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> KeyOutcome {
        let primary = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);

        if primary {
            return match key.code {
                KeyCode::Char('1') => {
                    self.switch_view(View::Scales);
                    KeyOutcome::Handled
                }
                KeyCode::Char('2') => {
                    self.switch_view(View::Chords);
                    KeyOutcome::Handled
                }
                // Ctrl+G for terminals that cannot report Ctrl+Enter
                KeyCode::Enter | KeyCode::Char('g') => {
                    let _ = self.run_active_generation(now);
                    KeyOutcome::Handled
                }
                KeyCode::Char('c') => KeyOutcome::Quit,
                _ => KeyOutcome::Ignored,
            };
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return KeyOutcome::Handled;
        }

        match key.code {
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Tab | KeyCode::BackTab => {
                self.switch_view(self.view.active().other());
            }
            KeyCode::Up | KeyCode::Char('k') => self.active_form_mut().focus_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.active_form_mut().focus_next(),
            KeyCode::Left | KeyCode::Char('h') => self.active_form_mut().cycle_focused(-1),
            KeyCode::Right | KeyCode::Char('l') => self.active_form_mut().cycle_focused(1),
            KeyCode::Enter | KeyCode::Char('g') => {
                let _ = self.run_active_generation(now);
            }
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    /// Dispatches a left click. Returns true if it hit anything.
    pub fn handle_click(&mut self, x: u16, y: u16, now: Instant) -> bool {
        if self.show_help {
            self.show_help = false;
            true
        } else if let Some(view) = self.layout.tab_at(x, y) {
            self.switch_view(view);
            true
        } else if self.layout.is_generate_button(x, y) {
            let _ = self.run_active_generation(now);
            true
        } else if let Some(index) = self.layout.field_at(x, y) {
            self.active_form_mut().set_focus(index);
            true
        } else {
            false
        }
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn readiness(&self) -> Readiness {
        self.engine.readiness()
    }

    pub fn active_view(&self) -> View {
        self.view.active()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn panel(&self, view: View) -> &PanelView {
        match view {
            View::Scales => &self.scale_panel,
            View::Chords => &self.chord_panel,
        }
    }

    fn panel_mut(&mut self, view: View) -> &mut PanelView {
        match view {
            View::Scales => &mut self.scale_panel,
            View::Chords => &mut self.chord_panel,
        }
    }

    /// The active panel's form.
    pub fn active_form(&self) -> &dyn Form {
        match self.view.active() {
            View::Scales => &self.scale_form,
            View::Chords => &self.chord_form,
        }
    }

    fn active_form_mut(&mut self) -> &mut dyn Form {
        match self.view.active() {
            View::Scales => &mut self.scale_form,
            View::Chords => &mut self.chord_form,
        }
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Number of timed tasks still waiting to run.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Updates the layout regions (called during rendering).
    pub fn update_layout(&mut self, layout: LayoutRegions) {
        self.layout = layout;
    }
}

/// The single user-facing message for a failed command.
fn failure_message(view: View, error: &CommandError) -> String {
    let noun = match view {
        View::Scales => "scale",
        View::Chords => "chord",
    };
    match error {
        CommandError::NotReady => NOT_READY_MESSAGE.to_string(),
        CommandError::EngineUnavailable => UNAVAILABLE_MESSAGE.to_string(),
        CommandError::Input(_) | CommandError::Engine(_) => format!(
            "Could not generate {} with the selected parameters.",
            noun
        ),
    }
}
