use crate::{
    config::LaunchConfig,
    error::LaunchError,
    process::{ProcessOutcome, ProcessRunner},
};
use std::ffi::OsString;
use tracing::{info, instrument, warn};

/// Ключ POV-Ray для запуска рендера сцены
pub const RENDER_SWITCH: &str = "/RENDER";

/// Результаты обоих шагов
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchReport {
    pub conversion: ProcessOutcome,
    pub render: ProcessOutcome,
}

/// Последовательно запускает конвертер и рендер.
///
/// Сам ничего не читает и не пишет на диск, вся работа с файлами на стороне внешних утилит.
pub struct Launcher<'a, R: ProcessRunner> {
    config: &'a LaunchConfig,
    runner: &'a R,
}

impl<'a, R: ProcessRunner> Launcher<'a, R> {
    pub fn new(config: &'a LaunchConfig, runner: &'a R) -> Launcher<'a, R> {
        Launcher { config, runner }
    }

    pub fn converter_args(&self) -> Vec<OsString> {
        vec![self.config.in_file.clone().into_os_string(), self.config.out_file.clone().into_os_string()]
    }

    pub fn render_args(&self) -> Vec<OsString> {
        vec![OsString::from(RENDER_SWITCH), self.config.pov_scene_file.clone().into_os_string()]
    }

    /// cinema2pov <in_file> <out_file>
    #[instrument(level = "error", skip(self))]
    pub fn run_conversion(&self) -> Result<ProcessOutcome, LaunchError> {
        info!(converter = ?self.config.converter_path, "Run converter");
        self.runner.run(&self.config.converter_path, &self.converter_args())
    }

    /// pvengine64 /RENDER <pov_scene_file>
    #[instrument(level = "error", skip(self))]
    pub fn run_render(&self) -> Result<ProcessOutcome, LaunchError> {
        info!(renderer = ?self.config.pov_path, "Run renderer");
        self.runner.run(&self.config.pov_path, &self.render_args())
    }

    pub fn run(&self) -> Result<LaunchReport, LaunchError> {
        let conversion = self.run_conversion()?;
        if !conversion.success() {
            if self.config.continue_on_converter_failure {
                warn!(code = ?conversion.code, "Converter failed, render anyway");
            } else {
                return Err(LaunchError::ConverterFailed(conversion.code));
            }
        }

        let render = self.run_render()?;
        if !render.success() {
            warn!(code = ?render.code, "Renderer failed");
        }

        Ok(LaunchReport { conversion, render })
    }
}
