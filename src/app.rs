use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;
use tui_scrollview::ScrollViewState;

use crate::models::{Field, Gender, StoryTheme};
use crate::network::{GenerateError, StoryGenerator};
use crate::scene::Scene;
use crate::theme::Theme;
use crate::wizard::{Action, Command, RequestId, Step, WizardController};

/// Longest age anyone needs to type ("120").
const MAX_AGE_DIGITS: usize = 3;

/// Results of background work, delivered back to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    Generated {
        request: RequestId,
        outcome: Result<String, GenerateError>,
    },
    Advance {
        from: Step,
        ticket: u64,
    },
}

pub struct App {
    pub wizard: WizardController,
    pub age_input: String,
    pub cursor: usize,
    pub story_scroll: ScrollViewState,
    pub scene: Scene,
    pub show_scene: bool,
    pub theme: Theme,
    pub status: Option<String>,
    pub generated_at: Option<DateTime<Local>>,
    /// Some while the first-run API key popup is open.
    pub api_key_prompt: Option<String>,
    pub frame: usize,
    generator: Arc<dyn StoryGenerator>,
    runtime: Handle,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(
        generator: Arc<dyn StoryGenerator>,
        runtime: Handle,
        advance_delay: Duration,
        show_scene: bool,
    ) -> Self {
        let theme = Theme::default();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            wizard: WizardController::new(advance_delay),
            age_input: String::new(),
            cursor: 0,
            story_scroll: ScrollViewState::default(),
            scene: Scene::new(0, 0, theme.accent),
            show_scene,
            theme,
            status: None,
            generated_at: None,
            api_key_prompt: None,
            frame: 0,
            generator,
            runtime,
            events_tx,
            events_rx,
        }
    }

    pub fn set_generator(&mut self, generator: Arc<dyn StoryGenerator>) {
        self.generator = generator;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn dispatch(&mut self, action: Action) {
        let before = self.wizard.step();
        if action == Action::StartOver {
            self.age_input.clear();
            self.generated_at = None;
            self.status = None;
        }
        if let Some(command) = self.wizard.handle(action) {
            self.execute(command);
        }
        if self.wizard.step() != before {
            self.on_step_changed();
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Generate { request, choices } => {
                self.story_scroll = ScrollViewState::default();
                let pending = self.generator.generate(choices);
                let tx = self.events_tx.clone();
                self.runtime.spawn(async move {
                    let outcome = pending.await;
                    let _ = tx.send(AppEvent::Generated { request, outcome });
                });
            }
            Command::ScheduleAdvance { from, ticket, after } => {
                let tx = self.events_tx.clone();
                self.runtime.spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(AppEvent::Advance { from, ticket });
                });
            }
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Generated { request, outcome } => {
                if outcome.is_ok() {
                    self.generated_at = Some(Local::now());
                    self.story_scroll.scroll_to_top();
                }
                self.wizard.complete(request, outcome);
            }
            AppEvent::Advance { from, ticket } => self.dispatch(Action::DelayedAdvance { from, ticket }),
        }
    }

    /// Applies everything that finished since the last frame.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    #[cfg(test)]
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    pub fn tick(&mut self, elapsed: Duration) {
        self.scene.advance(elapsed);
        self.frame = self.frame.wrapping_add(1);
    }

    fn on_step_changed(&mut self) {
        let selections = *self.wizard.selections();
        self.cursor = match self.wizard.step() {
            Step::Gender => selections
                .gender
                .and_then(|g| Gender::ALL.iter().position(|x| *x == g))
                .unwrap_or(0),
            Step::Theme => selections
                .theme
                .and_then(|t| StoryTheme::ALL.iter().position(|x| *x == t))
                .unwrap_or(0),
            Step::Age | Step::Result => 0,
        };
        debug!(step = self.wizard.step().number(), cursor = self.cursor, "step changed");
    }

    pub fn option_count(&self) -> usize {
        match self.wizard.step() {
            Step::Gender => Gender::ALL.len(),
            Step::Theme => StoryTheme::ALL.len(),
            Step::Age | Step::Result => 0,
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.option_count();
        if count == 0 {
            return;
        }
        self.cursor = (self.cursor as isize + delta).rem_euclid(count as isize) as usize;
    }

    pub fn select_under_cursor(&mut self) {
        let (field, value) = match self.wizard.step() {
            Step::Gender => match Gender::ALL.get(self.cursor) {
                Some(g) => (Field::Gender, g.as_str()),
                None => return,
            },
            Step::Theme => match StoryTheme::ALL.get(self.cursor) {
                Some(t) => (Field::Theme, t.as_str()),
                None => return,
            },
            Step::Age | Step::Result => return,
        };
        self.dispatch(Action::OptionSelected {
            field,
            value: value.to_string(),
        });
    }

    pub fn push_age_digit(&mut self, c: char) {
        if !c.is_ascii_digit() || self.age_input.len() >= MAX_AGE_DIGITS {
            return;
        }
        self.age_input.push(c);
        self.dispatch(Action::AgeEdited(self.age_input.clone()));
    }

    pub fn pop_age_digit(&mut self) {
        if self.age_input.pop().is_some() {
            self.dispatch(Action::AgeEdited(self.age_input.clone()));
        }
    }
}
