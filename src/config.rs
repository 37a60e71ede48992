use crate::app_arguments::AppArguments;
use eyre::WrapErr;
use serde::Deserialize;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::instrument;

/// Конвертер по умолчанию ищется в PATH
pub const DEFAULT_CONVERTER: &str = "cinema2pov";

/// Рендер по умолчанию ищется в PATH
pub const DEFAULT_RENDERER: &str = "pvengine64";

/// Содержимое json конфига, все поля опциональны
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub converter_path: Option<PathBuf>,
    pub in_file: Option<PathBuf>,
    pub out_file: Option<PathBuf>,
    pub pov_path: Option<PathBuf>,
    pub pov_scene_file: Option<PathBuf>,
    pub continue_on_converter_failure: Option<bool>,
}

impl ConfigFile {
    #[instrument(level = "error")]
    pub fn load(path: &Path) -> Result<ConfigFile, eyre::Error> {
        let file = File::open(path).wrap_err_with(|| format!("Config file open failed: {:?}", path))?;
        let config = serde_json::from_reader(BufReader::new(file)).wrap_err_with(|| format!("Config file parse failed: {:?}", path))?;
        Ok(config)
    }
}

/// Итоговые параметры запуска
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchConfig {
    pub converter_path: PathBuf,
    pub in_file: PathBuf,
    pub out_file: PathBuf,
    pub pov_path: PathBuf,
    pub pov_scene_file: PathBuf,
    /// Запускать ли рендер, если конвертер завершился с ошибкой
    pub continue_on_converter_failure: bool,
}

impl LaunchConfig {
    /// Аргументы командной строки важнее конфига, конфиг важнее значений по умолчанию
    pub fn resolve(arguments: &AppArguments, file: ConfigFile) -> Result<LaunchConfig, eyre::Error> {
        let converter_path = arguments
            .converter_path
            .clone()
            .or(file.converter_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONVERTER));
        let pov_path = arguments
            .pov_path
            .clone()
            .or(file.pov_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RENDERER));

        let in_file = arguments
            .in_file
            .clone()
            .or(file.in_file)
            .ok_or_else(|| eyre::eyre!("Input scene file is not specified (--in-file)"))?;
        let out_file = arguments
            .out_file
            .clone()
            .or(file.out_file)
            .ok_or_else(|| eyre::eyre!("Output include file is not specified (--out-file)"))?;
        let pov_scene_file = arguments
            .pov_scene_file
            .clone()
            .or(file.pov_scene_file)
            .ok_or_else(|| eyre::eyre!("POV-Ray scene file is not specified (--pov-scene-file)"))?;

        let continue_on_converter_failure = if arguments.stop_on_converter_failure {
            false
        } else {
            file.continue_on_converter_failure.unwrap_or(true)
        };

        Ok(LaunchConfig {
            converter_path,
            in_file,
            out_file,
            pov_path,
            pov_scene_file,
            continue_on_converter_failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::sync::Mutex;
    use structopt::StructOpt;

    const ENV_VARIABLES: &[&str] = &[
        "POV_RENDER_CONVERTER",
        "POV_RENDER_INPUT",
        "POV_RENDER_OUTPUT",
        "POV_RENDER_RENDERER",
        "POV_RENDER_SCENE",
        "POV_RENDER_CONFIG",
    ];

    // Окружение общее для всех тестов процесса
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn parse(params: &[&str]) -> AppArguments {
        let mut all = vec!["pov_render"];
        all.extend_from_slice(params);
        AppArguments::from_iter_safe(all).expect("Arguments parse failed")
    }

    fn parse_without_env(params: &[&str]) -> AppArguments {
        for var in ENV_VARIABLES {
            std::env::remove_var(var);
        }
        parse(params)
    }

    /// Парсинг только из переданных параметров, переменные окружения сбрасываются
    fn arguments(params: &[&str]) -> AppArguments {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        parse_without_env(params)
    }

    #[test]
    fn test_environment_fallback_and_isolation() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner());

        std::env::set_var("POV_RENDER_OUTPUT", "env.inc");
        std::env::set_var("POV_RENDER_CONVERTER", "/usr/bin/c2p");
        let from_env = parse(&["--in-file", "a.c4d", "--pov-scene-file", "a.pov"]);
        let isolated = parse_without_env(&["--in-file", "a.c4d", "--pov-scene-file", "a.pov"]);

        assert_eq!(from_env.out_file, Some(PathBuf::from("env.inc")));
        assert_eq!(from_env.converter_path, Some(PathBuf::from("/usr/bin/c2p")));
        assert_eq!(isolated.out_file, None);
        assert_eq!(isolated.converter_path, None);
    }

    #[test]
    fn test_defaults() {
        let args = arguments(&[
            "--in-file", "lights_test.c4d",
            "--out-file", "lights_test.inc",
            "--pov-scene-file", "c4d_test.pov",
        ]);
        let config = LaunchConfig::resolve(&args, ConfigFile::default()).expect("Resolve failed");
        assert_eq!(
            config,
            LaunchConfig {
                converter_path: PathBuf::from(DEFAULT_CONVERTER),
                in_file: PathBuf::from("lights_test.c4d"),
                out_file: PathBuf::from("lights_test.inc"),
                pov_path: PathBuf::from(DEFAULT_RENDERER),
                pov_scene_file: PathBuf::from("c4d_test.pov"),
                continue_on_converter_failure: true,
            }
        );
    }

    #[test]
    fn test_arguments_override_file() {
        let args = arguments(&["--in-file", "cli.c4d", "--pov-path", "/opt/povray/bin/povray"]);
        let file = ConfigFile {
            converter_path: Some(PathBuf::from("/opt/c4d/cinema2pov")),
            in_file: Some(PathBuf::from("file.c4d")),
            out_file: Some(PathBuf::from("file.inc")),
            pov_path: Some(PathBuf::from("pvengine64.exe")),
            pov_scene_file: Some(PathBuf::from("file.pov")),
            continue_on_converter_failure: Some(false),
        };
        let config = LaunchConfig::resolve(&args, file).expect("Resolve failed");
        assert_eq!(config.converter_path, PathBuf::from("/opt/c4d/cinema2pov"));
        assert_eq!(config.in_file, PathBuf::from("cli.c4d"));
        assert_eq!(config.out_file, PathBuf::from("file.inc"));
        assert_eq!(config.pov_path, PathBuf::from("/opt/povray/bin/povray"));
        assert_eq!(config.pov_scene_file, PathBuf::from("file.pov"));
        assert_eq!(config.continue_on_converter_failure, false);
    }

    #[test]
    fn test_stop_flag() {
        let args = arguments(&[
            "--in-file", "a.c4d",
            "--out-file", "a.inc",
            "--pov-scene-file", "a.pov",
            "--stop-on-converter-failure",
        ]);
        let file = ConfigFile {
            continue_on_converter_failure: Some(true),
            ..ConfigFile::default()
        };
        let config = LaunchConfig::resolve(&args, file).expect("Resolve failed");
        assert_eq!(config.continue_on_converter_failure, false);
    }

    #[test]
    fn test_missing_required_path() {
        let args = arguments(&["--in-file", "a.c4d", "--pov-scene-file", "a.pov"]);
        let err = LaunchConfig::resolve(&args, ConfigFile::default()).expect_err("Must fail without out file");
        assert!(err.to_string().contains("--out-file"));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Temp file create failed");
        write!(
            file,
            r#"{{
                "in_file": "data/lights_test.c4d",
                "out_file": "data/lights_test.inc",
                "pov_scene_file": "data/c4d_test.pov",
                "continue_on_converter_failure": false
            }}"#
        )
        .expect("Temp file write failed");

        let loaded = ConfigFile::load(file.path()).expect("Config load failed");
        assert_eq!(loaded.in_file, Some(PathBuf::from("data/lights_test.c4d")));
        assert_eq!(loaded.out_file, Some(PathBuf::from("data/lights_test.inc")));
        assert_eq!(loaded.pov_scene_file, Some(PathBuf::from("data/c4d_test.pov")));
        assert_eq!(loaded.converter_path, None);
        assert_eq!(loaded.continue_on_converter_failure, Some(false));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("Temp file create failed");
        write!(file, r#"{{ "render_flag": "/EXIT" }}"#).expect("Temp file write failed");
        assert!(ConfigFile::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().expect("Temp dir create failed");
        assert!(ConfigFile::load(&dir.path().join("missing.json")).is_err());
    }
}
