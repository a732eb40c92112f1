//! Human-readable renderings of countdown durations.

use crate::model::UnitKind;

/// Format seconds as "HH:MM:SS", with a leading "Nd " once a day or more remains.
pub fn format_remaining(seconds: u64) -> String {
    let days = seconds / UnitKind::Day.seconds();
    let rest = seconds % UnitKind::Day.seconds();
    let h = rest / 3600;
    let m = (rest % 3600) / 60;
    let s = rest % 60;
    if days > 0 {
        format!("{}d {:02}:{:02}:{:02}", days, h, m, s)
    } else {
        format!("{:02}:{:02}:{:02}", h, m, s)
    }
}

/// Compact unit form such as "1d 2h 20m"; zero renders as "0s".
pub fn describe_duration(seconds: u64) -> String {
    let mut remaining = seconds;
    let mut parts = Vec::new();
    for unit in UnitKind::ALL.iter().rev() {
        let count = remaining / unit.seconds();
        if count > 0 {
            parts.push(format!("{}{}", count, unit.suffix()));
            remaining %= unit.seconds();
        }
    }

    if parts.is_empty() {
        String::from("0s")
    } else {
        parts.join(" ")
    }
}
