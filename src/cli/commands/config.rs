use formwright_config::Config;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        "config [key [value]]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::section(format!(
                "Configuration ({})",
                context.config_manager.config_path().display()
            ));
            for key in Config::KEYS {
                output::info(format!("  {key:<20} {}", context.config.get(key)?));
            }
            output::info(format!(
                "  {:<20} {}",
                "(data in use)",
                context.data_dir.display()
            ));
            Ok(())
        }
        [key] => {
            output::info(format!("{key} = {}", context.config.get(key)?));
            Ok(())
        }
        [key, value @ ..] => {
            let mut updated = context.config.clone();
            updated.set(key, &value.join(" "))?;
            context.config = updated;
            context.persist_config()?;
            output::set_preferences(OutputPreferences {
                color: context.config.ui_color_enabled,
            });
            output::success(format!("{key} = {}", context.config.get(key)?));
            match *key {
                "data_dir" => output::hint("The new data directory is used from the next start."),
                "default_form_name" | "notice_timeout_secs" => {
                    output::hint("Applies to forms opened from now on.")
                }
                _ => {}
            }
            Ok(())
        }
    }
}
