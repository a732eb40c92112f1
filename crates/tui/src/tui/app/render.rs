use std::cmp::min;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;

use crate::format::{describe_duration, format_remaining};
use crate::model::{CountdownEntry, CountdownState, SortBy, SortOrder};
use crate::tui::constants::APP_VERSION;
use crate::tui::helpers::{
    accent_title, build_help_lines, centered_rect, display_label, format_added_time,
    format_entry_detail_entries, inset_rect, progress_percent, short_id, sort_caption, BG_ACCENT,
    BG_BASE, BG_PANEL, FG_ACCENT,
};

use super::{App, ConfirmChoice, InputMode};

const PROGRESS_WIDTH: usize = 10;

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let size = f.size();
        f.render_widget(Clear, size);
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), size);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_sort_bar(f, chunks[1]);
        self.draw_countdowns(f, chunks[2]);
        self.draw_footer(f, chunks[3]);

        match self.input_mode {
            InputMode::Add | InputMode::Command => self.draw_input_overlay(f, size),
            InputMode::Inspect => self.draw_detail_overlay(f, size),
            InputMode::Help => self.draw_help_overlay(f, size),
            InputMode::ConfirmRemove => self.draw_confirm_overlay(f, size),
            InputMode::Normal => {}
        }
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        let running = self.registry.running_count();
        let expired = self.registry.len() - running;
        let left_line = Line::from(vec![
            Span::styled(
                format!(" qcd v{} ⏱️ ", APP_VERSION),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{} running • {} expired", running, expired)),
            Span::raw("  "),
            Span::styled(
                format!("on expiry: {}", self.expiry_policy.as_str()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(
            Paragraph::new(left_line).style(Style::default().bg(BG_BASE)),
            cols[0],
        );

        let right_line = Line::from(vec![Span::styled(
            sort_caption(&self.sort),
            Style::default().fg(FG_ACCENT),
        )]);
        f.render_widget(
            Paragraph::new(right_line)
                .alignment(Alignment::Right)
                .style(Style::default().bg(BG_BASE)),
            cols[1],
        );
    }

    fn draw_sort_bar(&self, f: &mut Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let by_index = match self.sort.by {
            SortBy::Added => 0,
            SortBy::RemainingTime => 1,
        };
        let order_index = match self.sort.order {
            SortOrder::Ascending => 0,
            SortOrder::Descending => 1,
        };

        f.render_widget(
            sort_tabs("Sort by (s)", vec!["Added", "Time left"], by_index),
            cols[0],
        );
        f.render_widget(
            sort_tabs("Order (o)", vec!["Ascending", "Descending"], order_index),
            cols[1],
        );
    }

    fn draw_countdowns(&mut self, f: &mut Frame<'_>, area: Rect) {
        if self.entries.is_empty() {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .style(Style::default().bg(BG_PANEL));
            let inner = block.inner(area);
            f.render_widget(block, area);
            if inner.width == 0 || inner.height == 0 {
                return;
            }

            let lines = empty_state_lines();
            let height = (lines.len() as u16).min(inner.height);
            let content_area = centered_rect(inner.width.min(70), height, inner);
            f.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .alignment(Alignment::Center)
                    .style(Style::default().bg(BG_PANEL)),
                content_area,
            );
            return;
        }

        let header = Row::new(vec![
            Cell::from("#️⃣ ID"),
            Cell::from("⏳ Left"),
            Cell::from("📝 Label"),
            Cell::from("⏱ Duration"),
            Cell::from("🕒 Added"),
            Cell::from("📊 Progress"),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self.entries.iter().map(countdown_row).collect();

        let widths = [
            Constraint::Length(8),
            Constraint::Length(13),
            Constraint::Percentage(40),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(18),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(accent_title("Countdowns"))
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let status_line = match &self.status {
            Some(status) => Line::from(vec![Span::styled(status.text.clone(), status.style())]),
            None => Line::from(vec![Span::raw("Ready")]),
        };
        f.render_widget(Paragraph::new(status_line), lines[0]);

        let help = match self.input_mode {
            InputMode::Normal => {
                "a add ✚ | j/k move | enter details ℹ️ | s sort | o order | x remove 🗑️ | c clear expired 🧹 | / command ⌨️ | h help ❔ | q quit"
            }
            InputMode::Add => "Enter to start ⏱️ • Esc to cancel",
            InputMode::Command => {
                "Up/Down navigate • Tab/Right complete • Enter select/run • Esc cancel"
            }
            InputMode::Inspect => "Enter/Esc to close ℹ️",
            InputMode::Help => "Enter/Esc to close ❔",
            InputMode::ConfirmRemove => "←/→ choose • y/n • Enter confirm • Esc cancel",
        };
        let help_line = Line::from(vec![Span::styled(
            help,
            Style::default().fg(Color::DarkGray),
        )]);
        f.render_widget(Paragraph::new(help_line), lines[1]);
    }

    fn draw_input_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(10), 80);
        let extra_height = match self.input_mode {
            InputMode::Command => self.suggestions.len().min(7) as u16 + 1,
            _ => 5,
        };
        let popup_area = centered_rect(width, 3 + extra_height, area);
        f.render_widget(Clear, popup_area);

        let title = if self.input_mode == InputMode::Command {
            "⌨️ Command"
        } else {
            "➕ Add Countdown"
        };
        let inner = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(popup_area);

        let input_block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title(title))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let input_area = input_block.inner(inner[0]);
        f.render_widget(input_block, inner[0]);
        f.render_widget(
            Paragraph::new(self.input.as_str()).style(Style::default().bg(BG_PANEL)),
            input_area,
        );
        let cursor_x = input_area
            .x
            .saturating_add(self.input.cursor_column() as u16)
            .min(input_area.right().saturating_sub(1));
        f.set_cursor(cursor_x, input_area.y);

        let lines: Vec<Line<'_>> = if self.input_mode == InputMode::Command {
            self.suggestion_lines()
        } else {
            self.preview_lines()
        };
        let body = Block::default().style(Style::default().bg(BG_PANEL));
        let body_inner = inset_rect(body.inner(inner[1]), 1);
        f.render_widget(body, inner[1]);
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .style(Style::default().bg(BG_PANEL)),
            body_inner,
        );
    }

    fn suggestion_lines(&self) -> Vec<Line<'_>> {
        let mut lines = vec![Line::from(vec![Span::styled(
            "Suggestions",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )])];
        for (i, s) in self.suggestions.iter().enumerate() {
            let style = if i == self.suggestion_index {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(s.fill.as_str(), style.add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(s.label.as_str(), Style::default().fg(Color::DarkGray)),
            ]));
        }
        lines
    }

    /// Live parse of the add buffer so the user sees what will be scheduled.
    fn preview_lines(&self) -> Vec<Line<'static>> {
        let parsed = crate::parser::parse_timer_text(self.input.as_str());
        let key_style = Style::default().fg(Color::Cyan);
        let label = if parsed.label.is_empty() {
            String::from("(no label)")
        } else {
            parsed.label
        };
        vec![
            Line::from(vec![
                Span::styled("Duration  ", key_style),
                Span::raw(format!(
                    "{} ({})",
                    describe_duration(parsed.total_seconds),
                    format_remaining(parsed.total_seconds)
                )),
            ]),
            Line::from(vec![Span::styled("Label     ", key_style), Span::raw(label)]),
            Line::from(vec![Span::styled(
                "Units: d/day h/hour m/min s/sec, e.g. `1 day 2 minutes 30s cat is dog`",
                Style::default().fg(Color::DarkGray),
            )]),
        ]
    }

    fn draw_detail_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let Some(entry) = self.inspected_entry() else {
            return;
        };
        let detail_entries = format_entry_detail_entries(entry);

        let width = min(area.width.saturating_sub(20), 90).max(40);
        let popup_height = (detail_entries.len() as u16 + 4)
            .min(area.height.saturating_sub(2))
            .max(6);
        let popup_area = centered_rect(width, popup_height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("🗒 Countdown Details"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let rows: Vec<Row> = detail_entries
            .into_iter()
            .map(|(key, value)| {
                Row::new(vec![
                    Cell::from(key)
                        .style(Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD)),
                    Cell::from(value),
                ])
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(20)])
            .block(Block::default().style(Style::default().bg(BG_PANEL)))
            .column_spacing(2);
        f.render_widget(table, inset_rect(inner, 1));
    }

    fn draw_help_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = build_help_lines();
        let width = min(area.width.saturating_sub(10), 80);
        let height = min(lines.len() as u16 + 6, area.height.saturating_sub(2)).max(10);
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("⌨️ Keyboard Reference"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);
        if inner.width < 3 || inner.height < 3 {
            return;
        }

        let mut help_lines: Vec<Line> = lines
            .into_iter()
            .map(|(combo, desc)| {
                Line::from(vec![
                    Span::styled(format!("{:<16}", combo), Style::default().fg(Color::Cyan)),
                    Span::raw(desc),
                ])
            })
            .collect();
        help_lines.push(Line::default());
        help_lines.push(Line::from(vec![Span::styled(
            format!("Data directory: {}", self.config.data_dir().display()),
            Style::default().fg(Color::DarkGray),
        )]));

        f.render_widget(
            Paragraph::new(help_lines)
                .wrap(Wrap { trim: true })
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }

    fn draw_confirm_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(20), 60).max(40);
        let popup_area = centered_rect(width, 7, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("🗑 Remove Countdown"))
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let label = self
            .selected_entry()
            .map(display_label)
            .unwrap_or("selected countdown");

        let yes_style = if self.confirm_choice == ConfirmChoice::Yes {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };
        let no_style = if self.confirm_choice == ConfirmChoice::No {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let lines = vec![
            Line::from(vec![Span::styled(
                format!("Remove '{}'?", label),
                Style::default().fg(Color::White),
            )]),
            Line::default(),
            Line::from(vec![
                Span::styled("  Yes  ", yes_style),
                Span::raw("    "),
                Span::styled("  No  ", no_style),
            ]),
        ];

        f.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }
}

fn sort_tabs<'a>(title: &'a str, titles: Vec<&'a str>, selected: usize) -> Tabs<'a> {
    Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(accent_title(title))
                .border_style(Style::default().fg(Color::DarkGray))
                .style(Style::default().bg(BG_PANEL)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .bg(BG_ACCENT)
                .add_modifier(Modifier::BOLD),
        )
}

fn countdown_row(entry: &CountdownEntry) -> Row<'static> {
    let remaining_style = match entry.state {
        CountdownState::Running if entry.seconds_remaining <= 10 => {
            Style::default().fg(Color::Yellow)
        }
        CountdownState::Running => Style::default().fg(Color::White),
        CountdownState::Expired => Style::default().fg(Color::Red),
    };
    let remaining = match entry.state {
        CountdownState::Running => format_remaining(entry.seconds_remaining),
        CountdownState::Expired => String::from("⏰ done"),
    };

    Row::new(vec![
        Cell::from(short_id(&entry.id)),
        Cell::from(remaining).style(remaining_style),
        Cell::from(display_label(entry).to_string()),
        Cell::from(describe_duration(entry.duration_seconds)),
        Cell::from(format_added_time(&entry.created_at)),
        Cell::from(progress_bar(progress_percent(entry))),
    ])
}

fn progress_bar(percent: u16) -> String {
    let filled = (percent as usize * PROGRESS_WIDTH) / 100;
    format!(
        "{}{} {:>3}%",
        "█".repeat(filled),
        "░".repeat(PROGRESS_WIDTH - filled),
        percent
    )
}

fn empty_state_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(vec![Span::styled(
            "No countdowns yet",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::default(),
        Line::from("Press `a` and type something like `20m tea` or `1d 2h 20m food is ready`."),
        Line::from(vec![Span::styled(
            "Type `/help` for commands or `h` for the keyboard reference.",
            Style::default().fg(Color::DarkGray),
        )]),
    ]
}
