use std::num::IntErrorKind;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ParseResult, UnitKind, UnitValue};

static DIGITS_UNIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([0-9]+)([dhms])").expect("valid regex"));

/// Accumulates unit values and leftover words while walking the input once.
#[derive(Debug, Default)]
struct ParseState {
    seconds: Option<u64>,
    minutes: Option<u64>,
    hours: Option<u64>,
    days: Option<u64>,
    pending_number: Option<PendingNumber>,
    message_parts: Vec<String>,
    components: Vec<UnitValue>,
}

/// A bare positive integer waiting to see whether the next token is a unit word.
#[derive(Debug)]
struct PendingNumber {
    value: u64,
    /// Label text if the number goes unclaimed.
    text: String,
}

impl ParseState {
    fn slot_mut(&mut self, unit: UnitKind) -> &mut Option<u64> {
        match unit {
            UnitKind::Second => &mut self.seconds,
            UnitKind::Minute => &mut self.minutes,
            UnitKind::Hour => &mut self.hours,
            UnitKind::Day => &mut self.days,
        }
    }

    /// First assignment for a unit wins; returns false when the unit is already set.
    fn assign(&mut self, unit: UnitKind, value: u64) -> bool {
        let slot = self.slot_mut(unit);
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        self.components.push(UnitValue { unit, value });
        true
    }

    fn remember_number(&mut self, number: PendingNumber) {
        self.flush_pending();
        self.pending_number = Some(number);
    }

    fn take_pending_value(&mut self) -> Option<u64> {
        self.pending_number.take().map(|pending| pending.value)
    }

    fn flush_pending(&mut self) {
        if let Some(pending) = self.pending_number.take() {
            self.message_parts.push(pending.text);
        }
    }

    fn push_word(&mut self, word: &str) {
        self.message_parts.push(word.to_string());
    }

    fn total_seconds(&self) -> u64 {
        self.components.iter().fold(0u64, |total, component| {
            total.saturating_add(component.value.saturating_mul(component.unit.seconds()))
        })
    }

    fn finish(mut self) -> ParseResult {
        self.flush_pending();
        ParseResult {
            total_seconds: self.total_seconds(),
            label: self.message_parts.join(" "),
            components: self.components,
        }
    }
}

/// Split countdown text such as `"1d 2h 20m food is ready"` into a duration and a label.
///
/// Bare numbers are held back for one token so that `"2 minutes"` can claim them.
/// Each unit takes the first value it sees; later mentions of the same unit stay
/// in the label, while a number claimed by a repeated unit word is dropped.
/// Input that cannot be read as a duration ends up in the label, so this never fails.
pub fn parse_timer_text(text: &str) -> ParseResult {
    let mut state = ParseState::default();

    for token in text.split_whitespace() {
        match bare_integer(token) {
            Some(BareInteger::NonPositive) => {
                state.push_word(token);
                continue;
            }
            Some(BareInteger::Positive(number)) => {
                state.remember_number(number);
                continue;
            }
            None => {}
        }

        match classify_unit_token(token, &mut state) {
            (Some(unit), Some(value)) => {
                if !state.assign(unit, value) {
                    state.flush_pending();
                    state.push_word(token);
                }
            }
            _ => {
                state.flush_pending();
                state.push_word(token);
            }
        }
    }

    state.finish()
}

enum BareInteger {
    NonPositive,
    Positive(PendingNumber),
}

/// Signed integers count as bare numbers unless they start with `0`, so that
/// `"007"` or `"0h"` are read by the other rules instead. Values past `u64::MAX`
/// saturate but keep their digits for the label.
fn bare_integer(token: &str) -> Option<BareInteger> {
    if token.starts_with('0') {
        return None;
    }
    match token.parse::<i64>() {
        Ok(number) if number <= 0 => Some(BareInteger::NonPositive),
        Ok(number) => Some(BareInteger::Positive(PendingNumber {
            value: number.unsigned_abs(),
            text: number.to_string(),
        })),
        Err(err) => match err.kind() {
            IntErrorKind::NegOverflow => Some(BareInteger::NonPositive),
            IntErrorKind::PosOverflow => {
                let digits = token.trim_start_matches('+');
                Some(BareInteger::Positive(PendingNumber {
                    value: saturating_digits(digits)?,
                    text: digits.to_string(),
                }))
            }
            _ => None,
        },
    }
}

fn saturating_digits(digits: &str) -> Option<u64> {
    match digits.parse::<u64>() {
        Ok(value) => Some(value),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    }
}

fn classify_unit_token(token: &str, state: &mut ParseState) -> (Option<UnitKind>, Option<u64>) {
    if let Some(unit) = UnitKind::from_word_prefix(token) {
        return (Some(unit), state.take_pending_value());
    }

    if let Some(caps) = DIGITS_UNIT_RE.captures(token) {
        let unit = caps[2].chars().next().and_then(UnitKind::from_suffix);
        let value = saturating_digits(&caps[1]).filter(|value| *value > 0);
        return (unit, value);
    }

    (None, None)
}
