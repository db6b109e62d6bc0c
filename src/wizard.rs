// Four-step story wizard: actions in, at most one command out, no IO.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::models::{Field, SelectionStore, Selections, StoryChoices};
use crate::network::GenerateError;

pub const FALLBACK_MESSAGE: &str =
    "Sorry, there was an error generating your story. Please check your API key and try again.";

pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Age = 1,
    Gender = 2,
    Theme = 3,
    Result = 4,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Age, Step::Gender, Step::Theme, Step::Result];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Age => "Age",
            Step::Gender => "Hero",
            Step::Theme => "Theme",
            Step::Result => "Story",
        }
    }

    /// The field that must be set before leaving this step forward.
    pub fn required_field(self) -> Option<Field> {
        match self {
            Step::Age => Some(Field::Age),
            Step::Gender => Some(Field::Gender),
            Step::Theme => Some(Field::Theme),
            Step::Result => None,
        }
    }

    fn next(self) -> Option<Step> {
        match self {
            Step::Age => Some(Step::Gender),
            Step::Gender => Some(Step::Theme),
            Step::Theme => Some(Step::Result),
            Step::Result => None,
        }
    }

    fn previous(self) -> Option<Step> {
        match self {
            Step::Age => None,
            Step::Gender => Some(Step::Age),
            Step::Theme => Some(Step::Gender),
            Step::Result => Some(Step::Theme),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The age text box changed.
    AgeEdited(String),
    ContinueClicked,
    OptionSelected { field: Field, value: String },
    BackClicked,
    GenerateClicked,
    GenerateNew,
    StartOver,
    /// Fired by the timer scheduled after a gender pick.
    DelayedAdvance { from: Step, ticket: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ScheduleAdvance { from: Step, ticket: u64, after: Duration },
    Generate { request: RequestId, choices: StoryChoices },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultDisplay {
    #[default]
    Idle,
    Loading,
    Story(String),
    Failed,
}

#[derive(Debug)]
pub struct WizardState {
    pub current_step: Step,
    pub last_generated_text: Option<String>,
    pub generate_visible: bool,
    pub display: ResultDisplay,
    in_flight: usize,
    next_request: u64,
    /// Only the most recently scheduled advance may fire.
    pending_advance: Option<u64>,
    next_ticket: u64,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current_step: Step::Age,
            last_generated_text: None,
            generate_visible: false,
            display: ResultDisplay::Idle,
            in_flight: 0,
            next_request: 1,
            pending_advance: None,
            next_ticket: 1,
        }
    }
}

#[derive(Debug)]
pub struct WizardController {
    store: SelectionStore,
    state: WizardState,
    advance_delay: Duration,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new(DEFAULT_ADVANCE_DELAY)
    }
}

impl WizardController {
    pub fn new(advance_delay: Duration) -> Self {
        Self {
            store: SelectionStore::new(),
            state: WizardState::default(),
            advance_delay,
        }
    }

    pub fn step(&self) -> Step {
        self.state.current_step
    }

    pub fn selections(&self) -> &Selections {
        self.store.selections()
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn can_continue(&self) -> bool {
        self.step() == Step::Age && self.selections().age.is_some()
    }

    pub fn generate_visible(&self) -> bool {
        self.step() == Step::Theme && self.state.generate_visible
    }

    pub fn is_loading(&self) -> bool {
        self.state.display == ResultDisplay::Loading
    }

    pub fn in_flight(&self) -> usize {
        self.state.in_flight
    }

    /// Text for the result panel; failures always read as the fixed fallback.
    pub fn display_text(&self) -> Option<&str> {
        match &self.state.display {
            ResultDisplay::Story(text) => Some(text),
            ResultDisplay::Failed => Some(FALLBACK_MESSAGE),
            ResultDisplay::Idle | ResultDisplay::Loading => None,
        }
    }

    pub fn handle(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::AgeEdited(text) => {
                if self.step() == Step::Age {
                    if let Err(e) = self.store.set_field(Field::Age, &text) {
                        debug!(error = %e, "age input rejected");
                        self.store.clear(Field::Age);
                    }
                }
                None
            }
            Action::ContinueClicked => {
                if self.can_continue() {
                    self.advance();
                }
                None
            }
            Action::OptionSelected { field, value } => self.select_option(field, &value),
            Action::BackClicked => {
                self.back();
                None
            }
            Action::GenerateClicked => {
                if self.generate_visible() && self.selections().is_set(Field::Theme) {
                    self.advance()
                } else {
                    None
                }
            }
            Action::GenerateNew => {
                if self.step() == Step::Result {
                    self.start_generation()
                } else {
                    None
                }
            }
            Action::StartOver => {
                self.start_over();
                None
            }
            Action::DelayedAdvance { from, ticket } => {
                let current = self.state.pending_advance == Some(ticket);
                if current && self.step() == from && from == Step::Gender && self.selections().gender.is_some() {
                    self.state.pending_advance = None;
                    self.advance();
                } else {
                    debug!(?from, ticket, current = ?self.step(), "stale deferred advance ignored");
                }
                None
            }
        }
    }

    /// Records the outcome of a generation. The latest completion always
    /// overwrites the display, regardless of the order requests were issued.
    pub fn complete(&mut self, request: RequestId, outcome: Result<String, GenerateError>) {
        self.state.in_flight = self.state.in_flight.saturating_sub(1);
        let in_flight = self.state.in_flight;
        match outcome {
            Ok(text) => {
                info!(request = request.0, in_flight, chars = text.chars().count(), "story generated");
                self.state.last_generated_text = Some(text.clone());
                self.state.display = ResultDisplay::Story(text);
            }
            Err(e) => {
                error!(request = request.0, in_flight, error = %e, "story generation failed");
                self.state.display = ResultDisplay::Failed;
            }
        }
    }

    fn select_option(&mut self, field: Field, value: &str) -> Option<Command> {
        if self.step().required_field() != Some(field) || field == Field::Age {
            debug!(%field, step = ?self.step(), "option for another step ignored");
            return None;
        }
        if let Err(e) = self.store.set_field(field, value) {
            debug!(error = %e, "option rejected");
            return None;
        }
        match field {
            Field::Gender => {
                let ticket = self.state.next_ticket;
                self.state.next_ticket += 1;
                self.state.pending_advance = Some(ticket);
                Some(Command::ScheduleAdvance {
                    from: Step::Gender,
                    ticket,
                    after: self.advance_delay,
                })
            }
            Field::Theme => {
                self.state.generate_visible = true;
                None
            }
            Field::Age => None,
        }
    }

    fn advance(&mut self) -> Option<Command> {
        let current = self.step();
        if let Some(field) = current.required_field() {
            if !self.selections().is_set(field) {
                return None;
            }
        }
        let next = current.next()?;
        self.state.current_step = next;
        debug!(from = current.number(), to = next.number(), "wizard advanced");
        if next == Step::Result {
            self.start_generation()
        } else {
            None
        }
    }

    fn back(&mut self) {
        let current = self.step();
        let Some(previous) = current.previous() else {
            return;
        };
        self.state.current_step = previous;
        self.state.pending_advance = None;
        // Coming back to the theme step means picking a theme again.
        self.state.generate_visible = false;
        debug!(from = current.number(), to = previous.number(), "wizard went back");
    }

    fn start_generation(&mut self) -> Option<Command> {
        let Some(choices) = self.selections().complete() else {
            debug!("generation requested with incomplete selections");
            return None;
        };
        let request = RequestId(self.state.next_request);
        self.state.next_request += 1;
        self.state.in_flight += 1;
        self.state.display = ResultDisplay::Loading;
        info!(
            request = request.0,
            age = %choices.age,
            gender = %choices.gender,
            theme = %choices.theme,
            "generating story"
        );
        Some(Command::Generate { request, choices })
    }

    fn start_over(&mut self) {
        self.store.reset();
        let next_request = self.state.next_request;
        let next_ticket = self.state.next_ticket;
        self.state = WizardState {
            next_request,
            next_ticket,
            ..WizardState::default()
        };
        info!("wizard restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Age, Gender, StoryTheme};

    fn option(field: Field, value: &str) -> Action {
        Action::OptionSelected {
            field,
            value: value.to_string(),
        }
    }

    /// Picks a gender and lets its scheduled advance fire.
    fn pick_gender(wizard: &mut WizardController, value: &str) {
        if let Some(Command::ScheduleAdvance { from, ticket, .. }) = wizard.handle(option(Field::Gender, value)) {
            wizard.handle(Action::DelayedAdvance { from, ticket });
        }
    }

    /// Drives a fresh wizard to the result step and returns the first request.
    fn at_result(wizard: &mut WizardController) -> RequestId {
        wizard.handle(Action::AgeEdited("8".into()));
        wizard.handle(Action::ContinueClicked);
        pick_gender(wizard, "female");
        wizard.handle(option(Field::Theme, "adventure"));
        match wizard.handle(Action::GenerateClicked) {
            Some(Command::Generate { request, .. }) => request,
            other => panic!("expected generation, got {other:?}"),
        }
    }

    fn request_of(command: Option<Command>) -> RequestId {
        match command {
            Some(Command::Generate { request, .. }) => request,
            other => panic!("expected generation, got {other:?}"),
        }
    }

    #[test]
    fn starts_on_age_with_nothing_selected() {
        let wizard = WizardController::default();
        assert_eq!(wizard.step(), Step::Age);
        assert_eq!(*wizard.selections(), Selections::default());
        assert!(!wizard.can_continue());
        assert_eq!(wizard.display_text(), None);
    }

    #[test]
    fn invalid_age_keeps_continue_disabled() {
        let mut wizard = WizardController::default();
        for bad in ["0", "121", "abc", "4.5", ""] {
            wizard.handle(Action::AgeEdited(bad.into()));
            assert_eq!(wizard.selections().age, None, "{bad:?}");
            assert!(!wizard.can_continue());
            wizard.handle(Action::ContinueClicked);
            assert_eq!(wizard.step(), Step::Age);
        }
    }

    #[test]
    fn editing_age_to_invalid_value_clears_it() {
        let mut wizard = WizardController::default();
        wizard.handle(Action::AgeEdited("12".into()));
        assert!(wizard.can_continue());
        wizard.handle(Action::AgeEdited("125".into()));
        assert!(!wizard.can_continue());
    }

    #[test]
    fn valid_age_waits_for_continue() {
        let mut wizard = WizardController::default();
        wizard.handle(Action::AgeEdited("30".into()));
        assert_eq!(wizard.step(), Step::Age);
        assert_eq!(wizard.handle(Action::ContinueClicked), None);
        assert_eq!(wizard.step(), Step::Gender);
        assert_eq!(wizard.selections().age, Age::new(30));
    }

    #[test]
    fn gender_pick_schedules_a_deferred_advance() {
        let mut wizard = WizardController::new(Duration::from_millis(250));
        wizard.handle(Action::AgeEdited("30".into()));
        wizard.handle(Action::ContinueClicked);

        let command = wizard.handle(option(Field::Gender, "male"));
        assert_eq!(
            command,
            Some(Command::ScheduleAdvance {
                from: Step::Gender,
                ticket: 1,
                after: Duration::from_millis(250)
            })
        );
        assert_eq!(wizard.step(), Step::Gender);

        wizard.handle(Action::DelayedAdvance { from: Step::Gender, ticket: 1 });
        assert_eq!(wizard.step(), Step::Theme);
        assert!(!wizard.generate_visible());
    }

    #[test]
    fn unknown_gender_is_ignored() {
        let mut wizard = WizardController::default();
        wizard.handle(Action::AgeEdited("30".into()));
        wizard.handle(Action::ContinueClicked);
        assert_eq!(wizard.handle(option(Field::Gender, "wizard")), None);
        assert_eq!(wizard.selections().gender, None);
    }

    #[test]
    fn stale_deferred_advance_does_not_skip() {
        let mut wizard = WizardController::default();
        wizard.handle(Action::AgeEdited("30".into()));
        wizard.handle(Action::ContinueClicked);
        wizard.handle(option(Field::Gender, "male"));
        wizard.handle(Action::BackClicked);
        assert_eq!(wizard.step(), Step::Age);

        wizard.handle(Action::DelayedAdvance { from: Step::Gender, ticket: 1 });
        assert_eq!(wizard.step(), Step::Age);
    }

    #[test]
    fn timer_from_before_going_back_cannot_advance_later() {
        let mut wizard = WizardController::default();
        wizard.handle(Action::AgeEdited("30".into()));
        wizard.handle(Action::ContinueClicked);
        let Some(Command::ScheduleAdvance { from, ticket, .. }) = wizard.handle(option(Field::Gender, "male")) else {
            panic!("expected a scheduled advance");
        };
        wizard.handle(Action::BackClicked);
        wizard.handle(Action::ContinueClicked);
        assert_eq!(wizard.step(), Step::Gender);

        // The gender is still set, but the old timer no longer counts.
        wizard.handle(Action::DelayedAdvance { from, ticket });
        assert_eq!(wizard.step(), Step::Gender);
    }

    #[test]
    fn only_the_latest_gender_pick_advances() {
        let mut wizard = WizardController::default();
        wizard.handle(Action::AgeEdited("30".into()));
        wizard.handle(Action::ContinueClicked);
        let first = wizard.handle(option(Field::Gender, "male"));
        let second = wizard.handle(option(Field::Gender, "female"));
        let (Some(Command::ScheduleAdvance { ticket: old, .. }), Some(Command::ScheduleAdvance { ticket: new, .. })) =
            (first, second)
        else {
            panic!("expected two scheduled advances");
        };
        assert_ne!(old, new);

        wizard.handle(Action::DelayedAdvance { from: Step::Gender, ticket: old });
        assert_eq!(wizard.step(), Step::Gender);
        wizard.handle(Action::DelayedAdvance { from: Step::Gender, ticket: new });
        assert_eq!(wizard.step(), Step::Theme);
    }

    #[test]
    fn options_only_apply_to_their_own_step() {
        let mut wizard = WizardController::default();
        assert_eq!(wizard.handle(option(Field::Theme, "fantasy")), None);
        assert_eq!(wizard.handle(option(Field::Gender, "female")), None);
        assert_eq!(*wizard.selections(), Selections::default());
    }

    #[test]
    fn theme_pick_shows_generate_but_does_not_advance() {
        let mut wizard = WizardController::default();
        wizard.handle(Action::AgeEdited("15".into()));
        wizard.handle(Action::ContinueClicked);
        pick_gender(&mut wizard, "female");

        assert_eq!(wizard.handle(Action::GenerateClicked), None);
        assert_eq!(wizard.step(), Step::Theme);

        wizard.handle(option(Field::Theme, "mystery"));
        assert!(wizard.generate_visible());
        assert_eq!(wizard.step(), Step::Theme);
    }

    #[test]
    fn entering_result_starts_exactly_one_generation() {
        let mut wizard = WizardController::default();
        let request = at_result(&mut wizard);
        assert_eq!(wizard.step(), Step::Result);
        assert!(wizard.is_loading());
        assert_eq!(wizard.in_flight(), 1);
        assert_eq!(request, RequestId(1));

        // Nothing else re-triggers generation while on the result step.
        for action in [Action::ContinueClicked, Action::GenerateClicked] {
            assert_eq!(wizard.handle(action), None);
        }
        assert_eq!(wizard.in_flight(), 1);
    }

    #[test]
    fn generation_uses_current_choices() {
        let mut wizard = WizardController::default();
        wizard.handle(Action::AgeEdited("8".into()));
        wizard.handle(Action::ContinueClicked);
        pick_gender(&mut wizard, "female");
        wizard.handle(option(Field::Theme, "adventure"));
        match wizard.handle(Action::GenerateClicked) {
            Some(Command::Generate { choices, .. }) => {
                assert_eq!(choices.age.years(), 8);
                assert_eq!(choices.gender, Gender::Female);
                assert_eq!(choices.theme, StoryTheme::Adventure);
            }
            other => panic!("expected generation, got {other:?}"),
        }
    }

    #[test]
    fn success_is_displayed_verbatim() {
        let mut wizard = WizardController::default();
        let request = at_result(&mut wizard);
        wizard.complete(request, Ok("Once upon a time...\n".into()));
        assert!(!wizard.is_loading());
        assert_eq!(wizard.display_text(), Some("Once upon a time...\n"));
        assert_eq!(
            wizard.state().last_generated_text.as_deref(),
            Some("Once upon a time...\n")
        );
    }

    #[test]
    fn server_error_shows_fallback_not_raw_error() {
        let mut wizard = WizardController::default();
        let request = at_result(&mut wizard);
        wizard.complete(
            request,
            Err(GenerateError::Status {
                status: 500,
                message: "internal failure at backend-7".into(),
            }),
        );
        assert!(!wizard.is_loading());
        assert_eq!(wizard.display_text(), Some(FALLBACK_MESSAGE));
    }

    #[test]
    fn malformed_and_filtered_responses_share_the_fallback() {
        let mut wizard = WizardController::default();
        let request = at_result(&mut wizard);
        wizard.complete(request, Err(GenerateError::ResponseFormat));
        assert_eq!(wizard.display_text(), Some(FALLBACK_MESSAGE));

        let request = request_of(wizard.handle(Action::GenerateNew));
        wizard.complete(
            request,
            Err(GenerateError::SafetyFiltered {
                reason: "SAFETY".into(),
            }),
        );
        assert_eq!(wizard.display_text(), Some(FALLBACK_MESSAGE));
    }

    #[test]
    fn generate_new_keeps_step_and_reuses_choices() {
        let mut wizard = WizardController::default();
        let first = at_result(&mut wizard);
        wizard.complete(first, Ok("first".into()));

        let second = request_of(wizard.handle(Action::GenerateNew));
        assert_ne!(first, second);
        assert_eq!(wizard.step(), Step::Result);
        assert!(wizard.is_loading());
    }

    #[test]
    fn last_completion_wins_when_requests_overlap() {
        let mut wizard = WizardController::default();
        let _initial = at_result(&mut wizard);
        let a = request_of(wizard.handle(Action::GenerateNew));
        let b = request_of(wizard.handle(Action::GenerateNew));
        assert_eq!(wizard.in_flight(), 3);
        assert!(wizard.is_loading());

        // b resolves first, a resolves last: a's text stays on screen.
        wizard.complete(b, Ok("story b".into()));
        assert_eq!(wizard.display_text(), Some("story b"));
        assert!(!wizard.is_loading());

        wizard.complete(a, Ok("story a".into()));
        assert_eq!(wizard.display_text(), Some("story a"));
        assert_eq!(wizard.in_flight(), 1);
    }

    #[test]
    fn late_failure_overwrites_earlier_success() {
        let mut wizard = WizardController::default();
        let first = at_result(&mut wizard);
        let second = request_of(wizard.handle(Action::GenerateNew));
        wizard.complete(second, Ok("good".into()));
        wizard.complete(first, Err(GenerateError::ResponseFormat));
        assert_eq!(wizard.display_text(), Some(FALLBACK_MESSAGE));
        assert_eq!(wizard.state().last_generated_text.as_deref(), Some("good"));
    }

    #[test]
    fn back_moves_one_step_at_a_time() {
        let mut wizard = WizardController::default();
        at_result(&mut wizard);

        wizard.handle(Action::BackClicked);
        assert_eq!(wizard.step(), Step::Theme);
        assert!(!wizard.generate_visible());

        wizard.handle(Action::BackClicked);
        assert_eq!(wizard.step(), Step::Gender);

        wizard.handle(Action::BackClicked);
        assert_eq!(wizard.step(), Step::Age);

        wizard.handle(Action::BackClicked);
        assert_eq!(wizard.step(), Step::Age);
    }

    #[test]
    fn back_from_result_needs_a_fresh_theme_pick() {
        let mut wizard = WizardController::default();
        at_result(&mut wizard);
        wizard.handle(Action::BackClicked);
        assert_eq!(wizard.handle(Action::GenerateClicked), None);
        assert_eq!(wizard.step(), Step::Theme);
        assert_eq!(wizard.in_flight(), 1);

        wizard.handle(option(Field::Theme, "mystery"));
        assert!(wizard.generate_visible());
        let request = request_of(wizard.handle(Action::GenerateClicked));
        assert_eq!(request, RequestId(2));
        assert_eq!(wizard.step(), Step::Result);
    }

    #[test]
    fn leaving_theme_hides_generate() {
        let mut wizard = WizardController::default();
        wizard.handle(Action::AgeEdited("40".into()));
        wizard.handle(Action::ContinueClicked);
        pick_gender(&mut wizard, "non-binary");
        wizard.handle(option(Field::Theme, "comedy"));
        assert!(wizard.generate_visible());

        wizard.handle(Action::BackClicked);
        assert!(!wizard.state().generate_visible);

        // Gender is still chosen, so the deferred advance is the way back in.
        pick_gender(&mut wizard, "non-binary");
        assert_eq!(wizard.step(), Step::Theme);
        assert!(!wizard.generate_visible());
    }

    #[test]
    fn forward_moves_never_skip_a_step() {
        let mut wizard = WizardController::default();
        wizard.handle(Action::AgeEdited("9".into()));
        let mut seen = vec![wizard.step()];
        let script = [
            Action::ContinueClicked,
            Action::ContinueClicked,
            option(Field::Gender, "male"),
            Action::ContinueClicked,
            option(Field::Theme, "fantasy"),
            Action::GenerateClicked,
            Action::GenerateClicked,
        ];
        let mut check = |wizard: &WizardController| {
            let step = wizard.step();
            let last = *seen.last().unwrap();
            assert!(step.number() <= last.number() + 1, "{last:?} -> {step:?}");
            seen.push(step);
        };
        for action in script {
            if let Some(Command::ScheduleAdvance { from, ticket, .. }) = wizard.handle(action) {
                // Delivered twice: the second one must not skip ahead.
                wizard.handle(Action::DelayedAdvance { from, ticket });
                check(&wizard);
                wizard.handle(Action::DelayedAdvance { from, ticket });
            }
            check(&wizard);
        }
        assert_eq!(wizard.step(), Step::Result);
    }

    #[test]
    fn start_over_resets_everything_from_any_step() {
        for steps_in in 0..=4 {
            let mut wizard = WizardController::default();
            let script = [
                Action::ContinueClicked,
                option(Field::Gender, "female"),
                option(Field::Theme, "friendship"),
                Action::GenerateClicked,
            ];
            wizard.handle(Action::AgeEdited("10".into()));
            for action in script.into_iter().take(steps_in) {
                if let Some(Command::ScheduleAdvance { from, ticket, .. }) = wizard.handle(action) {
                    wizard.handle(Action::DelayedAdvance { from, ticket });
                }
            }

            wizard.handle(Action::StartOver);
            assert_eq!(wizard.step(), Step::Age);
            assert_eq!(*wizard.selections(), Selections::default());
            assert_eq!(wizard.state().last_generated_text, None);
            assert_eq!(wizard.state().display, ResultDisplay::Idle);
            assert!(!wizard.state().generate_visible);
            assert_eq!(wizard.in_flight(), 0);
        }
    }

    #[test]
    fn start_over_twice_matches_once() {
        let mut wizard = WizardController::default();
        at_result(&mut wizard);
        wizard.handle(Action::StartOver);
        let once = (wizard.step(), *wizard.selections());
        wizard.handle(Action::StartOver);
        assert_eq!((wizard.step(), *wizard.selections()), once);
    }

    #[test]
    fn late_response_after_start_over_does_not_reset_choices() {
        let mut wizard = WizardController::default();
        let request = at_result(&mut wizard);
        wizard.handle(Action::StartOver);
        let next = request_of({
            wizard.handle(Action::AgeEdited("20".into()));
            wizard.handle(Action::ContinueClicked);
            pick_gender(&mut wizard, "male");
            wizard.handle(option(Field::Theme, "fantasy"));
            wizard.handle(Action::GenerateClicked)
        });
        assert!(next > request);

        wizard.complete(request, Ok("late".into()));
        assert_eq!(wizard.selections().age, Age::new(20));
        assert_eq!(wizard.step(), Step::Result);
    }
}
