use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    layout::{Constraint, Direction, Layout, Position, Size},
    style::{Modifier, Style},
    text::{Line, Span},
    symbols,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tui_scrollview::ScrollView;

use crate::app::App;
use crate::models::{Gender, StoryTheme};
use crate::theme::Theme;
use crate::utils::{calculate_max_scroll, spinner, wrapped_height};
use crate::wizard::{ResultDisplay, Step};

// Straight or curly quoted speech
static DIALOGUE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"\n]*"|“[^”\n]*”"#).unwrap());

/// Splits a story line into plain and dialogue spans.
fn render_story_line(line: &str, theme: &Theme) -> Line<'static> {
    let mut spans = vec![];
    let mut last = 0;
    for m in DIALOGUE_REGEX.find_iter(line) {
        if m.start() > last {
            spans.push(Span::raw(line[last..m.start()].to_owned()));
        }
        spans.push(Span::styled(line[m.start()..m.end()].to_owned(), theme.dialogue));
        last = m.end();
    }
    if last < line.len() {
        spans.push(Span::raw(line[last..].to_owned()));
    }
    Line::from(spans)
}

fn story_lines(text: &str, theme: &Theme, highlight_title: bool) -> Vec<Line<'static>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if highlight_title && i == 0 {
                Line::from(Span::styled(line.trim_matches('#').trim().to_owned(), theme.story_title))
            } else {
                render_story_line(line, theme)
            }
        })
        .collect()
}

/// Renders the whole screen.
pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(app.theme.root_bg)), area);

    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8), Constraint::Length(3)])
        .split(area);

    render_header(f, app, vertical_chunks[0]);

    let columns = if app.show_scene {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(vertical_chunks[1])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1)])
            .split(vertical_chunks[1])
    };

    match app.wizard.step() {
        Step::Age => render_age(f, app, columns[0]),
        Step::Gender => render_gender(f, app, columns[0]),
        Step::Theme => render_theme(f, app, columns[0]),
        Step::Result => render_result(f, app, columns[0]),
    }

    if let Some(scene_area) = columns.get(1).copied() {
        let block = Block::default()
            .title(" Contact ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.blurred_border))
            .title_bottom(Line::from(" storyforge@localhost ").right_aligned());
        app.scene.render(scene_area, f.buffer_mut(), block);
    }

    render_footer(f, app, vertical_chunks[2]);

    if let Some(input) = &app.api_key_prompt {
        render_api_key_popup(f, &app.theme, input);
    }
}

fn step_block<'a>(theme: &Theme, title: String) -> Block<'a> {
    Block::default()
        .title(Span::styled(title, theme.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.focus_border))
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let titles: Vec<Line> = Step::ALL
        .iter()
        .map(|s| Line::from(format!("{} {}", s.number(), s.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" StoryForge ", theme.title))
                .border_style(Style::default().fg(theme.blurred_border)),
        )
        .style(theme.step_idle)
        .highlight_style(theme.step_active)
        .select(app.wizard.step().index())
        .divider(symbols::DOT)
        .padding(" ", " ");
    f.render_widget(tabs, area);
}

fn render_age(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = step_block(theme, " Step 1 · How old is the reader? ".to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let intro = Paragraph::new("We tailor the story to the reader's age.")
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: true });
    f.render_widget(intro, chunks[0]);

    let input_width = 12.min(chunks[1].width);
    let input_area = Rect { width: input_width, ..chunks[1] };
    let input = Paragraph::new(format!("{}▏", app.age_input))
        .style(theme.input)
        .block(Block::default().title("Age").borders(Borders::ALL).border_style(Style::default().fg(theme.accent_secondary)));
    f.render_widget(input, input_area);

    let hint = if !app.age_input.is_empty() && !app.wizard.can_continue() {
        Span::styled("Enter a whole number between 1 and 120", Style::default().fg(Color::Red))
    } else {
        Span::styled("Type digits, Backspace to erase", Style::default().fg(theme.text_secondary))
    };
    f.render_widget(Paragraph::new(Line::from(hint)), chunks[2]);

    let button_style = if app.wizard.can_continue() { theme.button } else { theme.button_disabled };
    f.render_widget(Paragraph::new(Span::styled(" Enter  Continue → ", button_style)), chunks[4]);
}

fn render_gender(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = step_block(theme, " Step 2 · Who is the hero? ".to_string());
    let selected = app.wizard.selections().gender;
    let items: Vec<ListItem> = Gender::ALL
        .iter()
        .map(|g| {
            let chosen = selected == Some(*g);
            let mark = if chosen { "✓ " } else { "  " };
            let style = if chosen { theme.card_selected } else { theme.card };
            ListItem::new(Line::from(vec![Span::raw(mark), Span::styled(g.label(), style)]))
        })
        .collect();
    let mut state = ListState::default();
    state.select(Some(app.cursor));
    let list = List::new(items)
        .block(block)
        .highlight_style(theme.card_cursor)
        .highlight_symbol("▶ ");
    f.render_stateful_widget(list, area, &mut state);
}

fn render_theme(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = step_block(theme, " Step 3 · Pick a theme ".to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    let selected = app.wizard.selections().theme;
    let items: Vec<ListItem> = StoryTheme::ALL
        .iter()
        .map(|t| {
            let chosen = selected == Some(*t);
            let mark = if chosen { "✓ " } else { "  " };
            let style = if chosen { theme.card_selected } else { theme.card };
            ListItem::new(vec![
                Line::from(vec![Span::raw(mark), Span::styled(t.label(), style)]),
                Line::from(Span::styled(format!("  {}", t.description()), theme.card_description)),
            ])
        })
        .collect();
    let mut state = ListState::default();
    state.select(Some(app.cursor));
    let list = List::new(items)
        .highlight_style(theme.card_cursor)
        .highlight_symbol("▶ ");
    f.render_stateful_widget(list, chunks[0], &mut state);

    if app.wizard.generate_visible() {
        let button = Paragraph::new(Span::styled(" g  Generate story ✨ ", theme.button))
            .alignment(Alignment::Center);
        f.render_widget(button, chunks[1]);
    }
}

fn render_result(f: &mut Frame, app: &mut App, area: Rect) {
    let title = match app.generated_at {
        Some(at) if !app.wizard.is_loading() => format!(" Step 4 · Your story ({}) ", at.format("%H:%M")),
        _ => " Step 4 · Your story ".to_string(),
    };
    let block = step_block(&app.theme, title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    match &app.wizard.state().display {
        ResultDisplay::Loading | ResultDisplay::Idle => {
            let mut label = format!("{} Forging your story...", spinner(app.frame));
            let pending = app.wizard.in_flight();
            if pending > 1 {
                label.push_str(&format!(" ({pending} requests, the last to finish wins)"));
            }
            let loading = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(label, app.theme.loading)),
            ])
            .alignment(Alignment::Center);
            f.render_widget(loading, inner);
        }
        display => {
            let is_story = matches!(display, ResultDisplay::Story(_));
            let text = app.wizard.display_text().unwrap_or_default().to_owned();
            let width = inner.width.saturating_sub(1).max(1);
            let height = wrapped_height(&text, width).max(1);

            let max = calculate_max_scroll(height, inner.height);
            let offset = app.story_scroll.offset();
            if offset.y > max {
                app.story_scroll.set_offset(Position { x: 0, y: max });
            }

            let lines = story_lines(&text, &app.theme, is_story);
            let style = if is_story {
                Style::default().fg(app.theme.text)
            } else {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            };
            let mut scroll_view = ScrollView::new(Size::new(width, height));
            scroll_view.render_widget(
                Paragraph::new(lines).style(style).wrap(Wrap { trim: false }),
                Rect::new(0, 0, width, height),
            );
            f.render_stateful_widget(scroll_view, inner, &mut app.story_scroll);
        }
    }
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints = match app.wizard.step() {
        Step::Age => "0-9 Age | Backspace Erase | Enter Continue | r Start over | q Quit",
        Step::Gender => "↑/↓ or j/k Move | Enter Choose | Esc Back | r Start over | q Quit",
        Step::Theme => "↑/↓ or j/k Move | Enter Choose | g Generate | Esc Back | r Start over | q Quit",
        Step::Result => "↑/↓ or j/k Scroll | n Generate new | c Copy | Esc Back | r Start over | q Quit",
    };
    let mut spans = vec![Span::styled(hints, app.theme.footer)];
    if let Some(status) = &app.status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.clone(), app.theme.status));
    }
    let footer = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(app.theme.blurred_border)));
    f.render_widget(footer, area);
}

fn render_api_key_popup(f: &mut Frame, theme: &Theme, input: &str) {
    let popup_area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, popup_area);
    let masked = "•".repeat(input.chars().count());
    let lines = vec![
        Line::from("No Gemini API key found."),
        Line::from(""),
        Line::from("Paste a key and press Enter to store it in ~/.config/storyforge/storyforge.toml,"),
        Line::from("or set GEMINI_API_KEY before starting StoryForge."),
        Line::from(""),
        Line::from(Span::styled(format!("Key: {masked}▏"), theme.input)),
        Line::from(""),
        Line::from(Span::styled("Enter Save | Esc Don't ask again", theme.footer)),
    ];
    let para = Paragraph::new(lines)
        .block(Block::default().title(" API key ").borders(Borders::ALL).style(theme.popup_border))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Left)
        .style(theme.popup_text);
    f.render_widget(para, popup_area);
}

/// Centers a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default().direction(Direction::Vertical)
        .constraints([Constraint::Percentage((100-percent_y)/2), Constraint::Percentage(percent_y), Constraint::Percentage((100-percent_y)/2)]).split(r)[1];
    Layout::default().direction(Direction::Horizontal)
        .constraints([Constraint::Percentage((100-percent_x)/2), Constraint::Percentage(percent_x), Constraint::Percentage((100-percent_x)/2)]).split(vertical)[1]
}
