mod app_arguments;
mod config;
mod error;
mod launcher;
mod process;

use crate::{
    app_arguments::AppArguments,
    config::{ConfigFile, LaunchConfig},
    launcher::{LaunchReport, Launcher},
    process::{DryRunProcessRunner, SystemProcessRunner},
};
use eyre::WrapErr;
use structopt::StructOpt;
use tracing::{debug, info, Level};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Настойка уровня логирования
fn setup_logging(arguments: &AppArguments) -> Result<(), eyre::Error> {
    use tracing_subscriber::prelude::*;

    // Настройка логирования на основании количества флагов verbose
    let level = match arguments.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        3 => Level::TRACE,
        _ => {
            return Err(eyre::eyre!("Verbose level must be in [0, 3] range"));
        }
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .with(tracing_subscriber::filter::EnvFilter::new(env!("CARGO_PKG_NAME"))) // Логи только от текущего приложения, без библиотек
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_error::ErrorLayer::default()) // Для поддержки захватывания SpanTrace в eyre
        .try_init()
        .wrap_err("Tracing init failed")
}

/// Диагностическая строка с версией
fn version_string() -> String {
    format!(
        "{} {} ({}-{})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn launch(arguments: &AppArguments) -> Result<LaunchReport, eyre::Error> {
    let config_file = match arguments.config.as_deref() {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let config = LaunchConfig::resolve(arguments, config_file).wrap_err("Launch parameters")?;
    debug!(?config, "Launch config");

    let report = if arguments.dry_run {
        Launcher::new(&config, &DryRunProcessRunner).run()?
    } else {
        Launcher::new(&config, &SystemProcessRunner).run()?
    };

    Ok(report)
}

fn main() {
    // Человекочитаемый вывод паники
    color_backtrace::install();

    // Настройка color eyre для ошибок
    color_eyre::install().expect("Error setup failed");

    // Аргументы коммандной строки
    let arguments = AppArguments::from_args();

    println!("{}", version_string());

    // Настройка логирования на основании количества флагов verbose
    if let Err(err) = setup_logging(&arguments) {
        eprint!("Error! Failed with: {:?}", err);
        std::process::exit(1);
    }

    // Display arguments
    debug!(?arguments, "App arguments");

    match launch(&arguments) {
        Ok(report) => {
            info!(conversion = ?report.conversion.code, render = ?report.render.code, "Launch finished");
        }
        Err(err) => {
            // При ошибке не паникуем, а спокойно выводим сообщение и завершаем приложение с кодом ошибки
            eprint!("Error! Failed with: {:?}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string() {
        let text = version_string();
        assert!(text.starts_with("pov_render "));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }
}
