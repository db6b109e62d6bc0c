const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub fn spinner(frame: usize) -> &'static str {
    SPINNER[frame % SPINNER.len()]
}

/// Number of rows `text` takes when word-wrapped to `width` columns.
///
/// Mirrors ratatui's word wrapping closely enough to size the story scroll
/// view; characters are counted, not display cells, so a line or two of
/// slack is added for wide glyphs.
pub fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    let mut rows = 0usize;
    for line in text.lines() {
        rows += wrap_line(line, width);
    }
    let wide = text.chars().filter(|c| (*c as u32) >= 0x1F000).count();
    let slack = if wide > 0 { 1 + wide / width } else { 0 };
    (rows + slack).min(u16::MAX as usize) as u16
}

fn wrap_line(line: &str, width: usize) -> usize {
    let mut rows = 1;
    let mut used = 0;
    for word in line.split_whitespace() {
        let len = word.chars().count();
        if used == 0 {
            rows += len.saturating_sub(1) / width;
            used = len % width;
            if used == 0 && len > 0 {
                used = width;
            }
        } else if used + 1 + len <= width {
            used += 1 + len;
        } else {
            rows += 1 + len.saturating_sub(1) / width;
            used = len % width;
            if used == 0 {
                used = width;
            }
        }
    }
    rows
}

/// Scroll offset that keeps a view of `view_height` rows inside `content_height`.
pub fn calculate_max_scroll(content_height: u16, view_height: u16) -> u16 {
    content_height.saturating_sub(view_height)
}
