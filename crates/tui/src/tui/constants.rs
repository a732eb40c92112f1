use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(5);

pub(crate) const COMMAND_HELP: &str = concat!(
    "Commands: /help, /add <text>, /sort [added|time], /order [asc|desc], ",
    "/remove [id], /clear, /quit"
);

pub(crate) const STATUS_ENTER_ADD: &str =
    "Type a duration and a label, e.g. `1d 2h 20m food is ready` (Esc to cancel)";
pub(crate) const STATUS_COMMAND_PALETTE: &str =
    "Type a /command • Up/Down: navigate • Tab/Right: complete • Enter: run • Esc: cancel";
pub(crate) const STATUS_VIEW_DETAILS: &str = "Viewing countdown details • Enter/Esc to close";
pub(crate) const STATUS_HELP: &str = "Keyboard reference • Enter/Esc to close";
pub(crate) const STATUS_CONFIRM_REMOVE: &str =
    "Confirm removal • arrows choose, Enter confirms, Esc cancels";
pub(crate) const STATUS_EMPTY_INPUT: &str = "Enter a duration and a label before adding";
