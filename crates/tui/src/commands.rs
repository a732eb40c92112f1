use std::fmt;
use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::cli::{CliCommand, ParseArgs, RunArgs};
use crate::config::AppConfig;
use crate::format::{describe_duration, format_remaining};
use crate::model::{ParseResult, TickOutcome};
use crate::parser::parse_timer_text;
use crate::registry::CountdownRegistry;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub fn execute<W: Write>(config: &AppConfig, command: CliCommand, mut writer: W) -> Result<()> {
    match command {
        CliCommand::Parse(args) => handle_parse(&args, &mut writer),
        CliCommand::Run(args) => handle_run(config, &args, &mut writer, || {
            thread::sleep(TICK_INTERVAL)
        }),
        CliCommand::Tui(_) => Err(anyhow!("launch interactive surfaces directly")),
    }
}

fn handle_parse<W: Write>(args: &ParseArgs, mut writer: W) -> Result<()> {
    let parsed = parse_timer_text(&args.joined());
    if args.json {
        let payload = serde_json::to_string_pretty(&parsed)?;
        writeln!(writer, "{payload}")?;
    } else {
        ParseSummary(&parsed).write_to(&mut writer)?;
    }
    Ok(())
}

/// Foreground countdown. `wait` is called once before every tick.
fn handle_run<W, F>(config: &AppConfig, args: &RunArgs, mut writer: W, mut wait: F) -> Result<()>
where
    W: Write,
    F: FnMut(),
{
    let mut registry = CountdownRegistry::new();
    let entry = registry.create_from_text(&args.joined());
    let label = display_label(&entry.label);
    tracing::info!(
        seconds = entry.duration_seconds,
        policy = config.settings().expiry_policy.as_str(),
        "foreground countdown started"
    );

    writeln!(
        writer,
        "Started {} countdown: {}",
        describe_duration(entry.duration_seconds),
        label
    )?;
    writer.flush()?;

    loop {
        wait();
        match registry.tick(&entry.id) {
            Some(TickOutcome::Continuing(remaining)) => {
                writeln!(writer, "{}  {}", format_remaining(remaining), label)?;
                writer.flush()?;
            }
            Some(TickOutcome::Expired) | None => break,
        }
    }

    writeln!(writer, "{}", TimesUp(label))?;
    Ok(())
}

fn display_label(label: &str) -> &str {
    if label.is_empty() {
        "countdown"
    } else {
        label
    }
}

struct ParseSummary<'a>(&'a ParseResult);

impl ParseSummary<'_> {
    fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let parsed = self.0;
        writeln!(
            writer,
            "Duration: {} ({} seconds)",
            describe_duration(parsed.total_seconds),
            parsed.total_seconds
        )?;
        if parsed.label.is_empty() {
            writeln!(writer, "Label:    (none)")?;
        } else {
            writeln!(writer, "Label:    {}", parsed.label)?;
        }
        if !parsed.components.is_empty() {
            let parts: Vec<String> = parsed
                .components
                .iter()
                .map(|component| {
                    format!(
                        "{} {}{}",
                        component.value,
                        component.unit,
                        if component.value == 1 { "" } else { "s" }
                    )
                })
                .collect();
            writeln!(writer, "Units:    {}", parts.join(", "))?;
        }
        Ok(())
    }
}

struct TimesUp<'a>(&'a str);

impl fmt::Display for TimesUp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "⏰ Time's up: {}", self.0)
    }
}
