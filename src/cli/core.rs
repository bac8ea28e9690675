//! Shell context, dispatch and error reporting.

use std::{io, path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use formwright_config::{Config, ConfigError, ConfigManager};
use formwright_core::{CoreError, NavigationContext, SubmissionSession, SystemClock};
use formwright_storage_json::JsonFileStore;
use thiserror::Error;

use crate::{
    builder::{BuilderSettings, FormBuilder},
    errors::FormError,
    utils::paths,
};

use super::{
    commands, io as cli_io,
    output::{self, OutputPreferences},
    registry::CommandRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Form(FormError::Core(err))
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::Form(FormError::Config(err))
    }
}

/// Failures that stop the shell itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("Input error: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Form(FormError::Core(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Form(FormError::Config(err))
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub builder: FormBuilder,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub store: Arc<JsonFileStore>,
    pub data_dir: PathBuf,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(paths::config_home())?;
        let config = config_manager.load()?;
        output::set_preferences(OutputPreferences {
            color: config.ui_color_enabled,
        });

        let data_dir = paths::resolve_data_dir(&config);
        let store = Arc::new(JsonFileStore::new(data_dir.clone())?);
        let builder = FormBuilder::open(
            store.clone(),
            Arc::new(SystemClock),
            BuilderSettings::from_config(&config),
            NavigationContext::default(),
        )?;
        tracing::info!(data_dir = %data_dir.display(), "shell started");

        let context = ShellContext {
            mode,
            registry,
            builder,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            store,
            data_dir,
            running: true,
        };
        if let Some(message) = context.builder.draft_notice() {
            output::info(message);
        }
        Ok(context)
    }

    /// Replaces the edit session, e.g. to edit a saved form or start from a template.
    pub(crate) fn reopen(&mut self, nav: NavigationContext) -> Result<(), CommandError> {
        self.builder = FormBuilder::open(
            self.store.clone(),
            Arc::new(SystemClock),
            BuilderSettings::from_config(&self.config),
            nav,
        )?;
        Ok(())
    }

    /// Opens a fill-in session for a saved form by id or shareable id.
    pub(crate) fn open_submission(&self, key: &str) -> Result<SubmissionSession, CommandError> {
        Ok(SubmissionSession::open(self.builder.catalog(), key)?)
    }

    pub(crate) fn prompt(&self) -> String {
        let marker = if self.builder.saved_notice().is_some() {
            " (saved)"
        } else if self.builder.form_id().is_some() {
            ""
        } else {
            "*"
        };
        format!("formwright [{}{}]> ", self.builder.name(), marker)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.suggest(input) {
            output::hint(format!("Did you mean `{best}`?"));
        }
    }

    /// Asks before destructive actions. Script mode and a disabled
    /// `confirm_destructive` setting both answer yes.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script || !self.config.confirm_destructive {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Form(FormError::Core(CoreError::EmptyForm)) => {
                output::error(CoreError::EmptyForm);
                output::hint("Try `add text` to add a first field.");
                Ok(())
            }
            CommandError::Form(FormError::Core(CoreError::FieldNotFound(id))) => {
                output::error(format!("Field not found: {id}"));
                output::hint("Use `show` to list field ids.");
                Ok(())
            }
            other => {
                tracing::debug!(error = %other, "command failed");
                output::error(other);
                Ok(())
            }
        }
    }
}
