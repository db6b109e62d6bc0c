use std::sync::Arc;

use anyhow::Result;
use arboard::Clipboard;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{info, warn};

use crate::app::App;
use crate::config::{self, Settings};
use crate::network::GeminiClient;
use crate::wizard::{Action, Step};

/// Applies one key press. Returns `Ok(false)` when the app should quit.
pub fn handle_key(key: KeyEvent, app: &mut App, settings: &Settings) -> Result<bool> {
    if key.kind == KeyEventKind::Release {
        return Ok(true);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(false);
    }
    if app.api_key_prompt.is_some() {
        handle_api_key_prompt(key.code, app, settings)?;
        return Ok(true);
    }

    match key.code {
        KeyCode::Char('q') => return Ok(false),
        KeyCode::Char('r') => app.dispatch(Action::StartOver),
        KeyCode::Esc => app.dispatch(Action::BackClicked),
        code => match app.wizard.step() {
            Step::Age => match code {
                KeyCode::Char(c) if c.is_ascii_digit() => app.push_age_digit(c),
                KeyCode::Backspace => app.pop_age_digit(),
                KeyCode::Enter => app.dispatch(Action::ContinueClicked),
                _ => {}
            },
            Step::Gender | Step::Theme => match code {
                KeyCode::Up | KeyCode::Left | KeyCode::Char('k') | KeyCode::Char('h') => app.move_cursor(-1),
                KeyCode::Down | KeyCode::Right | KeyCode::Char('j') | KeyCode::Char('l') => app.move_cursor(1),
                KeyCode::Enter | KeyCode::Char(' ') => app.select_under_cursor(),
                KeyCode::Char('g') => app.dispatch(Action::GenerateClicked),
                KeyCode::Backspace => app.dispatch(Action::BackClicked),
                _ => {}
            },
            Step::Result => match code {
                KeyCode::Up | KeyCode::Char('k') => app.story_scroll.scroll_up(),
                KeyCode::Down | KeyCode::Char('j') => app.story_scroll.scroll_down(),
                KeyCode::PageUp => app.story_scroll.scroll_page_up(),
                KeyCode::PageDown => app.story_scroll.scroll_page_down(),
                KeyCode::Home => app.story_scroll.scroll_to_top(),
                KeyCode::End => app.story_scroll.scroll_to_bottom(),
                KeyCode::Char('n') => app.dispatch(Action::GenerateNew),
                KeyCode::Char('c') => copy_story(app),
                KeyCode::Backspace => app.dispatch(Action::BackClicked),
                _ => {}
            },
        },
    }
    Ok(true)
}

fn handle_api_key_prompt(code: KeyCode, app: &mut App, settings: &Settings) -> Result<()> {
    let Some(buffer) = app.api_key_prompt.as_mut() else {
        return Ok(());
    };
    match code {
        KeyCode::Char(c) if !c.is_whitespace() => buffer.push(c),
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Enter => {
            let key = buffer.trim().to_string();
            if key.is_empty() {
                return Ok(());
            }
            app.api_key_prompt = None;
            if let Err(e) = config::save_api_key(&key) {
                warn!(error = %e, "could not store API key");
                app.set_status("Key not saved, using it for this session only");
            } else {
                info!("API key stored in user config");
                app.set_status("API key saved");
            }
            let mut settings = settings.clone();
            settings.gemini_api_key = Some(key);
            let client = GeminiClient::from_settings(&settings)?;
            app.set_generator(Arc::new(client));
        }
        KeyCode::Esc => {
            app.api_key_prompt = None;
            if let Err(e) = config::disable_api_key_prompt() {
                warn!(error = %e, "could not update user config");
            }
        }
        _ => {}
    }
    Ok(())
}

fn copy_story(app: &mut App) {
    if app.wizard.is_loading() {
        return;
    }
    let Some(text) = app.wizard.display_text().map(str::to_owned) else {
        return;
    };
    match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => app.set_status("Story copied to clipboard"),
        Err(e) => {
            warn!(error = %e, "clipboard unavailable");
            app.set_status("Clipboard unavailable");
        }
    }
}
