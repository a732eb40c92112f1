use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::layout::Rect;
use rstest::rstest;
use tempfile::TempDir;

use super::input::NormalAction;
use super::{App, InputMode};
use crate::config::AppConfig;
use crate::model::{CountdownState, ExpiryPolicy, SortBy, SortOrder};
use crate::tui::helpers::{centered_rect, progress_percent, short_id};

fn test_app() -> (App, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
    (App::new(config), dir)
}

fn press(app: &mut App, code: KeyCode) {
    app.on_key(KeyEvent::new(code, KeyModifiers::NONE))
        .expect("handle key");
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

fn add(app: &mut App, text: &str) {
    press(app, KeyCode::Char('a'));
    type_text(app, text);
    press(app, KeyCode::Enter);
}

fn advance(app: &mut App, seconds: u64) {
    app.advance_to(Instant::now() + Duration::from_secs(seconds));
}

fn labels(app: &App) -> Vec<&str> {
    app.entries.iter().map(|entry| entry.label.as_str()).collect()
}

#[test]
fn centered_rect_keeps_within_bounds() {
    let area = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };
    let rect = centered_rect(40, 10, area);
    assert_eq!(rect, Rect::new(20, 7, 40, 10));

    let clipped = centered_rect(120, 40, area);
    assert_eq!(clipped, area);
}

#[test]
fn short_id_keeps_the_tail() {
    assert_eq!(short_id("abc"), "abc");
    assert_eq!(short_id("01HZX3K9ABCDEF"), "ABCDEF");
}

#[rstest]
#[case(KeyCode::Char('a'), Some(NormalAction::EnterAdd))]
#[case(KeyCode::Char('s'), Some(NormalAction::ToggleSortBy))]
#[case(KeyCode::Char('o'), Some(NormalAction::ToggleSortOrder))]
#[case(KeyCode::Delete, Some(NormalAction::Remove))]
#[case(KeyCode::Char('c'), Some(NormalAction::ClearExpired))]
#[case(KeyCode::Char('/'), Some(NormalAction::EnterCommand))]
#[case(KeyCode::Char('z'), None)]
fn normal_keys_map_to_actions(#[case] code: KeyCode, #[case] expected: Option<NormalAction>) {
    let key = KeyEvent::new(code, KeyModifiers::NONE);
    assert_eq!(NormalAction::from_event(&key), expected);
}

#[test]
fn ctrl_c_quits() {
    let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(NormalAction::from_event(&key), Some(NormalAction::Quit));
}

#[test]
fn adding_from_keyboard_creates_a_countdown() {
    let (mut app, _dir) = test_app();
    add(&mut app, "20m tea");

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.entries.len(), 1);
    assert_eq!(app.entries[0].label, "tea");
    assert_eq!(app.entries[0].seconds_remaining, 1200);
    assert_eq!(app.selected, 0);
    assert!(app
        .status_text()
        .is_some_and(|text| text.contains("Started 20m for tea")));
}

#[test]
fn blank_input_is_rejected() {
    let (mut app, _dir) = test_app();
    add(&mut app, "   ");

    assert!(app.entries.is_empty());
    assert_eq!(app.input_mode, InputMode::Add);
    assert!(app
        .status_text()
        .is_some_and(|text| text.contains("Enter a duration")));
}

#[test]
fn escape_cancels_add() {
    let (mut app, _dir) = test_app();
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "5m eggs");
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.entries.is_empty());
    assert!(app.input.is_blank());
}

#[test]
fn sort_keys_reorder_the_list() {
    let (mut app, _dir) = test_app();
    add(&mut app, "3m tea");
    add(&mut app, "15m pizza");
    add(&mut app, "1m bread");

    // Newest first by default.
    assert_eq!(labels(&app), vec!["bread", "pizza", "tea"]);

    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.sort.by, SortBy::RemainingTime);
    assert_eq!(labels(&app), vec!["pizza", "tea", "bread"]);

    press(&mut app, KeyCode::Char('o'));
    assert_eq!(app.sort.order, SortOrder::Ascending);
    assert_eq!(labels(&app), vec!["bread", "tea", "pizza"]);
}

#[test]
fn selection_follows_entry_across_resort() {
    let (mut app, _dir) = test_app();
    add(&mut app, "3m tea");
    add(&mut app, "15m pizza");
    press(&mut app, KeyCode::End);
    assert_eq!(app.selected_entry().map(|e| e.label.as_str()), Some("tea"));

    press(&mut app, KeyCode::Char('o'));
    assert_eq!(app.selected, 0);
    assert_eq!(app.selected_entry().map(|e| e.label.as_str()), Some("tea"));
}

#[test]
fn advancing_time_expires_and_retains_by_default() {
    let (mut app, _dir) = test_app();
    add(&mut app, "2s tea");
    add(&mut app, "1m pizza");

    advance(&mut app, 2);

    assert_eq!(app.entries.len(), 2);
    let tea = app
        .entries
        .iter()
        .find(|entry| entry.label == "tea")
        .expect("tea retained");
    assert_eq!(tea.state, CountdownState::Expired);
    assert_eq!(tea.seconds_remaining, 0);
    assert_eq!(app.status_text(), Some("⏰ Time's up: tea"));

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(labels(&app), vec!["pizza"]);
}

#[test]
fn remove_policy_drops_expired_entries() {
    let (mut app, _dir) = test_app();
    app.expiry_policy = ExpiryPolicy::Remove;
    add(&mut app, "1s tea");
    add(&mut app, "10s eggs");

    advance(&mut app, 1);

    assert_eq!(labels(&app), vec!["eggs"]);
    assert_eq!(app.entries[0].seconds_remaining, 9);
}

#[test]
fn alert_status_survives_ttl() {
    let (mut app, _dir) = test_app();
    add(&mut app, "1s tea");
    advance(&mut app, 1);
    if let Some(status) = app.status.as_mut() {
        if let Some(earlier) = status.created_at.checked_sub(Duration::from_secs(60)) {
            status.created_at = earlier;
        }
    }
    app.on_tick();
    assert_eq!(app.status_text(), Some("⏰ Time's up: tea"));
}

#[test]
fn on_tick_converts_elapsed_wall_time() {
    let (mut app, _dir) = test_app();
    add(&mut app, "10s tea");

    app.advance_to(Instant::now() + Duration::from_millis(3_500));

    assert_eq!(app.entries[0].seconds_remaining, 7);
}

#[test]
fn late_countdown_keeps_its_own_second_boundary() {
    let (mut app, _dir) = test_app();
    add(&mut app, "5s tea");
    let eggs_added_after = Instant::now();
    add(&mut app, "2s eggs");

    app.advance_to(eggs_added_after + Duration::from_secs(1));

    let remaining = |label: &str| {
        app.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.seconds_remaining)
    };
    assert_eq!(remaining("tea"), Some(4));
    assert_eq!(remaining("eggs"), Some(2));
}

#[test]
fn fresh_countdown_waits_a_full_second() {
    let (mut app, _dir) = test_app();
    add(&mut app, "2s tea");

    app.on_tick();
    app.advance_to(Instant::now() + Duration::from_millis(900));

    assert_eq!(app.entries[0].seconds_remaining, 2);
    assert_eq!(app.entries[0].state, CountdownState::Running);
}

#[test]
fn long_gap_catches_up_and_expires() {
    let (mut app, _dir) = test_app();
    add(&mut app, "3s tea");
    add(&mut app, "1m pizza");

    advance(&mut app, 10);

    let tea = app
        .entries
        .iter()
        .find(|entry| entry.label == "tea")
        .expect("tea retained");
    assert_eq!(tea.state, CountdownState::Expired);
    let pizza = app
        .entries
        .iter()
        .find(|entry| entry.label == "pizza")
        .expect("pizza running");
    assert_eq!(pizza.seconds_remaining, 50);
}

#[test]
fn remove_requires_confirmation() {
    let (mut app, _dir) = test_app();
    add(&mut app, "5m tea");

    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.input_mode, InputMode::ConfirmRemove);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.entries.len(), 1);

    press(&mut app, KeyCode::Char('x'));
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Enter);
    assert!(app.entries.is_empty());
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn command_palette_adds_and_sorts() {
    let (mut app, _dir) = test_app();
    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "add 1h 30m laundry");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(labels(&app), vec!["laundry"]);
    assert_eq!(app.entries[0].duration_seconds, 5400);

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "order asc");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.sort.order, SortOrder::Ascending);
}

#[test]
fn command_palette_removes_by_id() {
    let (mut app, _dir) = test_app();
    add(&mut app, "5m tea");
    let id = app.entries[0].id.clone();

    app.input_mode = InputMode::Command;
    app.input.set(format!("/remove {}", id));
    app.run_command().expect("run command");

    assert!(app.entries.is_empty());
    assert!(app
        .status_text()
        .is_some_and(|text| text.contains("Removed tea")));
}

#[test]
fn command_suggestions_filter_by_prefix() {
    let (mut app, _dir) = test_app();
    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "so");

    let fills: Vec<&str> = app.suggestions.iter().map(|s| s.fill.as_str()).collect();
    assert_eq!(fills, vec!["/sort "]);

    press(&mut app, KeyCode::Tab);
    let fills: Vec<&str> = app.suggestions.iter().map(|s| s.fill.as_str()).collect();
    assert_eq!(fills, vec!["/sort added", "/sort time"]);
}

#[test]
fn bare_remove_without_entries_finishes() {
    let (mut app, _dir) = test_app();
    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "remove");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.input.as_str(), "/remove ");

    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app
        .status_text()
        .is_some_and(|text| text.contains("Nothing to remove")));
}

#[test]
fn bare_add_command_reports_usage() {
    let (mut app, _dir) = test_app();
    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "add ");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.entries.is_empty());
    assert!(app
        .status_text()
        .is_some_and(|text| text.contains("Usage: /add")));
}

#[test]
fn unknown_command_reports_error() {
    let (mut app, _dir) = test_app();
    app.input_mode = InputMode::Command;
    app.input.set("/launch");
    app.run_command().expect("run command");

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app
        .status_text()
        .is_some_and(|text| text.contains("Unknown command: launch")));
}

#[test]
fn progress_tracks_elapsed_share() {
    let (mut app, _dir) = test_app();
    add(&mut app, "4s tea");
    advance(&mut app, 1);
    assert_eq!(progress_percent(&app.entries[0]), 25);
}
