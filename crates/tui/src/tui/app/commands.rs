use anyhow::Result;

use crate::model::{SortBy, SortOrder};
use crate::tui::constants::COMMAND_HELP;

use super::{App, InputMode};

#[derive(Debug, Clone)]
pub(crate) struct Suggestion {
    pub(crate) fill: String,
    pub(crate) label: String,
}

impl Suggestion {
    fn new<F: Into<String>, L: Into<String>>(fill: F, label: L) -> Self {
        Self {
            fill: fill.into(),
            label: label.into(),
        }
    }
}

impl App {
    pub(crate) fn run_command(&mut self) -> Result<()> {
        let raw = self.input.as_str().trim().to_string();
        let Some(body) = raw.strip_prefix('/') else {
            self.set_status_error("Commands must start with '/'");
            self.finish_command();
            return Ok(());
        };
        let mut parts = body.split_whitespace();
        let Some(cmd) = parts.next().map(|c| c.to_ascii_lowercase()) else {
            self.set_status_error("Enter a command after '/'");
            self.finish_command();
            return Ok(());
        };

        match cmd.as_str() {
            "help" | "h" => {
                self.set_status_info(COMMAND_HELP);
            }
            "add" | "a" => {
                let text = parts.collect::<Vec<_>>().join(" ");
                if text.is_empty() {
                    self.set_status_error("Usage: /add <duration and label>");
                } else {
                    self.input.set(text);
                    self.add_countdown()?;
                }
            }
            "sort" => match parts.next() {
                None => self.toggle_sort_by(),
                Some(value) => match value.parse::<SortBy>() {
                    Ok(by) => {
                        self.sort.by = by;
                        self.refresh();
                        self.set_status_info(format!("Sorting by {}", self.sort.summary()));
                    }
                    Err(err) => self.set_status_error(err.to_string()),
                },
            },
            "order" => match parts.next() {
                None => self.toggle_sort_order(),
                Some(value) => match value.parse::<SortOrder>() {
                    Ok(order) => {
                        self.sort.order = order;
                        self.refresh();
                        self.set_status_info(format!("Sorting by {}", self.sort.summary()));
                    }
                    Err(err) => self.set_status_error(err.to_string()),
                },
            },
            "remove" | "rm" | "delete" | "del" => match parts.next() {
                Some(id) => {
                    let id = id.to_string();
                    self.remove_by_id(&id);
                }
                None => self.prompt_remove(),
            },
            "clear" => self.clear_expired(),
            "quit" | "q" | "exit" => {
                self.should_quit = true;
            }
            unknown => {
                self.set_status_error(format!("Unknown command: {} (try /help)", unknown));
            }
        }

        self.finish_command();
        Ok(())
    }

    pub(crate) fn finish_command(&mut self) {
        self.input.clear();
        self.suggestions.clear();
        self.suggestion_index = 0;
        if matches!(self.input_mode, InputMode::Command | InputMode::Add) {
            self.input_mode = InputMode::Normal;
        }
    }

    pub(crate) fn update_command_suggestions(&mut self) {
        self.suggestions = build_command_suggestions(self);
        if self.suggestion_index >= self.suggestions.len() {
            self.suggestion_index = 0;
        }
    }

    pub(crate) fn accept_suggestion(&mut self) {
        if let Some(s) = self.suggestions.get(self.suggestion_index) {
            self.input.set(s.fill.clone());
            self.update_command_suggestions();
        }
    }
}

fn build_command_suggestions(app: &App) -> Vec<Suggestion> {
    let raw = app.input.as_str();
    let Some(without) = raw.strip_prefix('/') else {
        return Vec::new();
    };
    let without = without.trim_start();
    let mut tokens = without.split_whitespace();
    let first = tokens.next().unwrap_or("").to_ascii_lowercase();
    let rest = tokens.collect::<Vec<_>>().join(" ");
    let typing_args = without.ends_with(' ') || !rest.is_empty();

    if !typing_args {
        return base_suggestions()
            .into_iter()
            .filter(|s| first.is_empty() || s.fill[1..].starts_with(&first))
            .collect();
    }

    let partial = rest.trim().to_ascii_lowercase();
    match first.as_str() {
        "sort" => choices(
            "sort",
            &partial,
            &[
                ("added", "Order by when the countdown was added"),
                ("time", "Order by remaining time"),
            ],
        ),
        "order" => choices(
            "order",
            &partial,
            &[("asc", "Ascending"), ("desc", "Descending")],
        ),
        "add" | "a" => {
            if partial.is_empty() {
                vec![Suggestion::new("/add ", "Enter a duration and a label…")]
            } else {
                vec![Suggestion::new(
                    format!("/add {}", rest.trim()),
                    "⏱️ Start this countdown",
                )]
            }
        }
        "remove" | "rm" | "delete" | "del" => {
            if partial.is_empty() {
                if let Some(entry) = app.selected_entry() {
                    return vec![Suggestion::new(
                        format!("/remove {}", entry.id),
                        "🗑️ Use selected countdown id",
                    )];
                }
            }
            vec![Suggestion::new("/remove ", "🔎 Provide a full countdown id")]
        }
        _ => Vec::new(),
    }
}

fn base_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion::new("/add ", "⏱️ Add a countdown"),
        Suggestion::new("/sort ", "↕️ Sort by added or time"),
        Suggestion::new("/order ", "🔃 Ascending or descending"),
        Suggestion::new("/remove ", "🗑️ Remove selected (or id)"),
        Suggestion::new("/clear", "🧹 Clear expired countdowns"),
        Suggestion::new("/help", "❓ Help: show available commands"),
        Suggestion::new("/quit", "🚪 Quit the application"),
    ]
}

fn choices(command: &str, partial: &str, options: &[(&str, &str)]) -> Vec<Suggestion> {
    options
        .iter()
        .filter(|(name, _)| partial.is_empty() || name.starts_with(partial))
        .map(|(name, desc)| Suggestion::new(format!("/{} {}", command, name), *desc))
        .collect()
}
