use crate::error::LaunchError;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
};
use tracing::{debug, info, instrument};

/// Результат завершившегося дочернего процесса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Код выхода, None если процесс был убит сигналом
    pub code: Option<i32>,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ProcessOutcome {
    fn from(status: ExitStatus) -> Self {
        ProcessOutcome { code: status.code() }
    }
}

/// Запуск внешней программы с ожиданием ее завершения
pub trait ProcessRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutcome, LaunchError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Реальный запуск процессов, stdin/stdout/stderr наследуются от нас
#[derive(Debug, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    /// Голое имя ищем в PATH, любой другой путь оставляем как есть
    fn resolve_executable(program: &Path) -> Result<PathBuf, LaunchError> {
        if program.is_absolute() || program.components().count() > 1 {
            return Ok(program.to_path_buf());
        }
        which::which(program).map_err(|err| LaunchError::ExecutableNotFound(program.display().to_string(), err))
    }
}

impl ProcessRunner for SystemProcessRunner {
    #[instrument(level = "info", skip(self))]
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutcome, LaunchError> {
        let executable = Self::resolve_executable(program)?;
        debug!(?executable, "Resolved executable");

        // Блокирующий запуск, ждем завершения
        let status = Command::new(&executable)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|err| LaunchError::Spawn(executable.clone(), err))?;

        let outcome = ProcessOutcome::from(status);
        debug!(code = ?outcome.code, "Process finished");

        Ok(outcome)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Ничего не запускает, только выводит команду
#[derive(Debug, Default)]
pub struct DryRunProcessRunner;

impl ProcessRunner for DryRunProcessRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutcome, LaunchError> {
        let command_line = format_command_line(program, args);
        info!(%command_line, "Dry run");
        println!("{}", command_line);
        Ok(ProcessOutcome { code: Some(0) })
    }
}

pub fn format_command_line(program: &Path, args: &[OsString]) -> String {
    let mut text = program.display().to_string();
    for arg in args {
        text.push(' ');
        text.push_str(&arg.to_string_lossy());
    }
    text
}
