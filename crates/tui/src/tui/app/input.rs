use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::constants::{STATUS_COMMAND_PALETTE, STATUS_ENTER_ADD};

use super::{App, ConfirmChoice, InputMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NormalAction {
    Quit,
    EnterAdd,
    EnterCommand,
    ShowDetails,
    ShowHelp,
    ToggleSortBy,
    ToggleSortOrder,
    Remove,
    ClearExpired,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
}

impl NormalAction {
    pub(crate) fn from_event(key: &KeyEvent) -> Option<Self> {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }

        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('a') => Some(Self::EnterAdd),
            KeyCode::Char('/') => Some(Self::EnterCommand),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(Self::ShowHelp),
            KeyCode::Char('s') => Some(Self::ToggleSortBy),
            KeyCode::Char('o') => Some(Self::ToggleSortOrder),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Remove),
            KeyCode::Char('c') => Some(Self::ClearExpired),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Enter => Some(Self::ShowDetails),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            _ => None,
        }
    }
}

impl App {
    pub(crate) fn on_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode(key),
            InputMode::Add => self.handle_add_mode(key),
            InputMode::Command => self.handle_command_mode(key),
            InputMode::Inspect => self.handle_inspect_mode(key),
            InputMode::Help => self.handle_help_mode(key),
            InputMode::ConfirmRemove => self.handle_confirm_remove_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(action) = NormalAction::from_event(&key) {
            self.execute_normal_action(action)?;
        }
        Ok(())
    }

    fn execute_normal_action(&mut self, action: NormalAction) -> Result<()> {
        match action {
            NormalAction::Quit => {
                self.should_quit = true;
            }
            NormalAction::EnterAdd => {
                self.input_mode = InputMode::Add;
                self.input.clear();
                self.set_status_info(STATUS_ENTER_ADD);
            }
            NormalAction::EnterCommand => {
                self.input_mode = InputMode::Command;
                self.input.set("/");
                self.suggestion_index = 0;
                self.update_command_suggestions();
                self.set_status_info(STATUS_COMMAND_PALETTE);
            }
            NormalAction::ShowDetails => self.show_selected_details(),
            NormalAction::ShowHelp => self.show_help_overlay(),
            NormalAction::ToggleSortBy => self.toggle_sort_by(),
            NormalAction::ToggleSortOrder => self.toggle_sort_order(),
            NormalAction::Remove => self.prompt_remove(),
            NormalAction::ClearExpired => self.clear_expired(),
            NormalAction::SelectNext => self.select_next(),
            NormalAction::SelectPrev => self.select_prev(),
            NormalAction::SelectFirst => self.select_first(),
            NormalAction::SelectLast => self.select_last(),
        }
        Ok(())
    }

    fn handle_add_mode(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter => return self.add_countdown(),
            KeyCode::Esc => {
                self.input.clear();
                self.input_mode = InputMode::Normal;
                self.status = None;
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete_char(),
            KeyCode::Char(c) => self.input.insert_char(c),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
        Ok(())
    }

    fn handle_inspect_mode(&mut self, key: KeyEvent) -> Result<()> {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            self.inspect_id = None;
            self.input_mode = InputMode::Normal;
            self.status = None;
        }
        Ok(())
    }

    fn handle_help_mode(&mut self, key: KeyEvent) -> Result<()> {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('h') | KeyCode::Char('?')
        ) {
            self.input_mode = InputMode::Normal;
            self.status = None;
        }
        Ok(())
    }

    fn handle_confirm_remove_mode(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => {
                self.input_mode = InputMode::Normal;
                self.set_status_info("Removal cancelled");
            }
            KeyCode::Char('y') => {
                self.input_mode = InputMode::Normal;
                self.perform_remove();
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char(' ') => {
                self.confirm_choice = self.confirm_choice.toggle();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                if self.confirm_choice == ConfirmChoice::Yes {
                    self.perform_remove();
                } else {
                    self.set_status_info("Removal cancelled");
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter => {
                let Some(suggestion) = self.suggestions.get(self.suggestion_index).cloned() else {
                    return self.run_command();
                };
                // A fill that adds nothing runs as typed.
                if suggestion.fill.ends_with(' ') && suggestion.fill != self.input.as_str() {
                    self.input.set(suggestion.fill);
                    self.update_command_suggestions();
                    return Ok(());
                }
                self.input.set(suggestion.fill);
                return self.run_command();
            }
            KeyCode::Esc => {
                self.finish_command();
                self.status = None;
            }
            KeyCode::Backspace => {
                self.input.backspace();
                self.update_command_suggestions();
            }
            KeyCode::Delete => {
                self.input.delete_char();
                self.update_command_suggestions();
            }
            KeyCode::Char(c) => {
                self.input.insert_char(c);
                self.update_command_suggestions();
            }
            KeyCode::Tab | KeyCode::Right => self.accept_suggestion(),
            KeyCode::Up => {
                if !self.suggestions.is_empty() {
                    if self.suggestion_index == 0 {
                        self.suggestion_index = self.suggestions.len() - 1;
                    } else {
                        self.suggestion_index -= 1;
                    }
                }
            }
            KeyCode::Down => {
                if !self.suggestions.is_empty() {
                    self.suggestion_index = (self.suggestion_index + 1) % self.suggestions.len();
                }
            }
            _ => {}
        }
        Ok(())
    }
}
