use std::collections::HashMap;
use std::time::Instant;

use anyhow::Result;
use ratatui::style::{Color, Style};
use ratatui::widgets::TableState;

use super::buffer::TextBuffer;
use super::constants::*;
use super::helpers::display_label;
use crate::config::{initial_sort, AppConfig};
use crate::format::describe_duration;
use crate::model::{CountdownEntry, CountdownState, ExpiryPolicy, SortSpec};
use crate::registry::CountdownRegistry;

mod commands;
mod input;
mod render;
#[cfg(test)]
mod tests;

use commands::Suggestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Add,
    Command,
    Inspect,
    Help,
    ConfirmRemove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmChoice {
    Yes,
    No,
}

impl ConfirmChoice {
    fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(Color::Cyan),
            StatusKind::Alert => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }

    fn expires(&self) -> bool {
        !matches!(self.kind, StatusKind::Alert)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Alert,
    Error,
}

/// Start instants of countdowns; each one ticks on its own whole seconds.
#[derive(Debug, Default)]
struct TickSchedule {
    started: HashMap<String, Instant>,
}

impl TickSchedule {
    fn start(&mut self, id: &str, at: Instant) {
        self.started.insert(id.to_string(), at);
    }

    /// Ticks `entry` is behind on at `now`.
    fn owed(&self, entry: &CountdownEntry, now: Instant) -> u64 {
        let Some(started) = self.started.get(&entry.id) else {
            return 0;
        };
        let due = now.saturating_duration_since(*started).as_secs();
        let done = entry
            .duration_seconds
            .saturating_sub(entry.seconds_remaining);
        due.saturating_sub(done)
    }

    fn retain_known(&mut self, registry: &CountdownRegistry) {
        self.started.retain(|id, _| registry.get(id).is_some());
    }
}

pub(crate) struct App {
    config: AppConfig,
    registry: CountdownRegistry,
    expiry_policy: ExpiryPolicy,
    sort: SortSpec,
    entries: Vec<CountdownEntry>,
    selected: usize,
    table_state: TableState,
    input_mode: InputMode,
    input: TextBuffer,
    suggestions: Vec<Suggestion>,
    suggestion_index: usize,
    status: Option<StatusMessage>,
    inspect_id: Option<String>,
    confirm_choice: ConfirmChoice,
    schedule: TickSchedule,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(config: AppConfig) -> Self {
        let expiry_policy = config.settings().expiry_policy;
        let sort = initial_sort(&config);
        let mut app = Self {
            config,
            registry: CountdownRegistry::new(),
            expiry_policy,
            sort,
            entries: Vec::new(),
            selected: 0,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            input: TextBuffer::new(),
            suggestions: Vec::new(),
            suggestion_index: 0,
            status: None,
            inspect_id: None,
            confirm_choice: ConfirmChoice::No,
            schedule: TickSchedule::default(),
            should_quit: false,
        };
        app.refresh();
        app
    }

    /// Rebuild the sorted snapshot, keeping the selection on the same countdown.
    pub(crate) fn refresh(&mut self) {
        let selected_id = self.selected_entry().map(|entry| entry.id.clone());
        self.entries = self.registry.list(self.sort);

        if self.entries.is_empty() {
            self.selected = 0;
            self.table_state.select(None);
            return;
        }

        if let Some(idx) = selected_id
            .as_deref()
            .and_then(|id| self.entries.iter().position(|entry| entry.id == id))
        {
            self.selected = idx;
        } else if self.selected >= self.entries.len() {
            self.selected = self.entries.len() - 1;
        }
        self.table_state.select(Some(self.selected));
    }

    pub(crate) fn on_tick(&mut self) {
        if let Some(status) = &self.status {
            if status.expires() && status.created_at.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }

        self.advance_to(Instant::now());
    }

    /// Bring every running countdown up to date with `now`.
    fn advance_to(&mut self, now: Instant) {
        let rounds = self
            .registry
            .iter()
            .filter(|entry| entry.state == CountdownState::Running)
            .map(|entry| self.schedule.owed(entry, now))
            .max()
            .unwrap_or(0);
        if rounds == 0 {
            return;
        }

        let schedule = &self.schedule;
        let mut expired = Vec::new();
        for _ in 0..rounds {
            expired.extend(
                self.registry
                    .tick_matching(self.expiry_policy, |entry| schedule.owed(entry, now) > 0),
            );
        }
        self.schedule.retain_known(&self.registry);

        if !expired.is_empty() {
            let labels: Vec<&str> = expired.iter().map(display_label).collect();
            self.set_status_alert(format!("⏰ Time's up: {}", labels.join(", ")));
        }
        self.refresh();
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn selected_entry(&self) -> Option<&CountdownEntry> {
        self.entries.get(self.selected)
    }

    fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.entries.len() - 1);
        self.table_state.select(Some(self.selected));
    }

    fn select_prev(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        }
        self.table_state.select(Some(self.selected));
    }

    fn select_first(&mut self) {
        if !self.entries.is_empty() {
            self.selected = 0;
            self.table_state.select(Some(self.selected));
        }
    }

    fn select_last(&mut self) {
        if !self.entries.is_empty() {
            self.selected = self.entries.len() - 1;
            self.table_state.select(Some(self.selected));
        }
    }

    fn add_countdown(&mut self) -> Result<()> {
        if self.input.is_blank() {
            self.set_status_error(STATUS_EMPTY_INPUT);
            return Ok(());
        }

        let entry = self.registry.create_from_text(self.input.as_str());
        self.schedule.start(&entry.id, Instant::now());
        if entry.duration_seconds == 0 {
            self.set_status_error(format!(
                "No duration found in '{}'; added a countdown that ends now",
                self.input.as_str().trim()
            ));
        } else {
            self.set_status_info(format!(
                "Started {} for {}",
                describe_duration(entry.duration_seconds),
                display_label(&entry)
            ));
        }

        self.input.clear();
        self.input_mode = InputMode::Normal;
        self.refresh();
        self.select_entry_by_id(&entry.id);
        Ok(())
    }

    fn select_entry_by_id(&mut self, id: &str) {
        if let Some(idx) = self.entries.iter().position(|entry| entry.id == id) {
            self.selected = idx;
            self.table_state.select(Some(idx));
        }
    }

    fn toggle_sort_by(&mut self) {
        self.sort.by = self.sort.by.toggle();
        self.refresh();
        self.set_status_info(format!("Sorting by {}", self.sort.summary()));
    }

    fn toggle_sort_order(&mut self) {
        self.sort.order = self.sort.order.toggle();
        self.refresh();
        self.set_status_info(format!("Sorting by {}", self.sort.summary()));
    }

    fn clear_expired(&mut self) {
        let removed = self.registry.clear_expired();
        self.refresh();
        if removed == 0 {
            self.set_status_info("No expired countdowns to clear");
        } else {
            self.set_status_info(format!(
                "Cleared {} expired countdown{}",
                removed,
                if removed == 1 { "" } else { "s" }
            ));
        }
    }

    fn show_selected_details(&mut self) {
        let Some(entry) = self.selected_entry() else {
            self.set_status_info("Nothing to inspect");
            return;
        };
        self.inspect_id = Some(entry.id.clone());
        self.input_mode = InputMode::Inspect;
        self.set_status_info(STATUS_VIEW_DETAILS);
    }

    fn inspected_entry(&self) -> Option<&CountdownEntry> {
        let id = self.inspect_id.as_deref()?;
        self.entries.iter().find(|entry| entry.id == id)
    }

    fn show_help_overlay(&mut self) {
        self.inspect_id = None;
        self.input_mode = InputMode::Help;
        self.set_status_info(STATUS_HELP);
    }

    fn prompt_remove(&mut self) {
        if self.entries.is_empty() {
            self.set_status_info("Nothing to remove");
            return;
        }
        self.confirm_choice = ConfirmChoice::No;
        self.input_mode = InputMode::ConfirmRemove;
        self.set_status_info(STATUS_CONFIRM_REMOVE);
    }

    fn perform_remove(&mut self) {
        let Some(id) = self.selected_entry().map(|entry| entry.id.clone()) else {
            self.set_status_info("Nothing to remove");
            return;
        };
        self.remove_by_id(&id);
    }

    fn remove_by_id(&mut self, id: &str) {
        match self.registry.remove(id) {
            Some(entry) => {
                self.set_status_info(format!("Removed {} 🗑️", display_label(&entry)));
            }
            None => self.set_status_info("Countdown not found"),
        }
        self.refresh();
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("ℹ️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Info));
    }

    pub(crate) fn set_status_alert<T: Into<String>>(&mut self, message: T) {
        self.status = Some(StatusMessage::new(message, StatusKind::Alert));
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("⚠️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Error));
    }

    #[cfg(test)]
    fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }
}
