use std::cmp::min;

use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::format::{describe_duration, format_remaining};
use crate::model::{CountdownEntry, SortSpec};

pub const BG_BASE: Color = Color::Rgb(14, 17, 23);
pub const BG_PANEL: Color = Color::Rgb(22, 26, 34);
pub const BG_ACCENT: Color = Color::Rgb(32, 37, 47);
pub const FG_ACCENT: Color = Color::Rgb(120, 161, 255);

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

pub fn short_id(id: &str) -> String {
    // ULIDs share their leading timestamp chars, so show the tail.
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 6 {
        id.to_string()
    } else {
        chars[chars.len() - 6..].iter().collect()
    }
}

pub fn display_label(entry: &CountdownEntry) -> &str {
    if entry.label.is_empty() {
        "(no label)"
    } else {
        entry.label.as_str()
    }
}

/// Elapsed share of the countdown in whole percent.
pub fn progress_percent(entry: &CountdownEntry) -> u16 {
    if entry.duration_seconds == 0 {
        return 100;
    }
    let elapsed = entry.duration_seconds - entry.seconds_remaining.min(entry.duration_seconds);
    ((elapsed as u128 * 100) / entry.duration_seconds as u128) as u16
}

pub fn format_entry_detail_entries(entry: &CountdownEntry) -> Vec<(String, String)> {
    vec![
        (String::from("Label"), display_label(entry).to_string()),
        (String::from("State"), entry.state.as_str().to_string()),
        (
            String::from("Remaining"),
            format_remaining(entry.seconds_remaining),
        ),
        (
            String::from("Duration"),
            format!(
                "{} ({} seconds)",
                describe_duration(entry.duration_seconds),
                entry.duration_seconds
            ),
        ),
        (
            String::from("Progress"),
            format!("{}%", progress_percent(entry)),
        ),
        (String::from("Added"), format_datetime(&entry.created_at)),
        (String::from("ID"), entry.id.clone()),
    ]
}

pub fn sort_caption(sort: &SortSpec) -> String {
    format!("sort: {} {}", sort.by, sort.order)
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("a", "Add a countdown from free text"),
        ("j / k or ↓ / ↑", "Move selection"),
        ("Home / End", "Jump to first / last countdown"),
        ("Enter", "Toggle countdown detail overlay"),
        ("s", "Toggle sort field (added / time)"),
        ("o", "Toggle sort order (asc / desc)"),
        ("x / Delete", "Remove countdown (with confirmation)"),
        ("c", "Clear expired countdowns"),
        ("/", "Command palette"),
        ("h", "Toggle this help overlay"),
        ("q", "Quit"),
        ("Esc", "Cancel/close overlays"),
    ]
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}

pub fn format_datetime(value: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = (*value).into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_added_time(value: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = (*value).into();
    local.format("%H:%M:%S").to_string()
}
