pub use qcd_core::config::*;

use crate::cli::{Cli, TuiArgs};
use crate::model::SortSpec;

/// Resolve the data directory and apply global command-line overrides on top of
/// `settings.json`.
pub fn from_cli(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::discover(cli.data_dir.clone())?;
    if let Some(policy) = cli.expiry {
        config.settings_mut().expiry_policy = policy;
    }
    Ok(config)
}

pub fn apply_tui_args(config: &mut AppConfig, args: &TuiArgs) {
    let settings = config.settings_mut();
    if let Some(by) = args.sort_by {
        settings.sort_by = by;
    }
    if let Some(order) = args.order {
        settings.sort_order = order;
    }
    if args.allow_multiple {
        settings.allow_multiple_instances = true;
    }
}

pub fn initial_sort(config: &AppConfig) -> SortSpec {
    config.settings().sort_spec()
}
