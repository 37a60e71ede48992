use quick_error::quick_error;
use std::path::PathBuf;

quick_error! {
    #[derive(Debug)]
    pub enum LaunchError {
        /// Исполняемый файл не найден в PATH
        ExecutableNotFound(name: String, err: which::Error) {
            display("Executable '{}' not found: {}", name, err)
            source(err)
        }

        /// Не удалось запустить процесс
        Spawn(program: PathBuf, err: std::io::Error) {
            display("Process {:?} spawn failed: {}", program, err)
            source(err)
        }

        /// Конвертер завершился с ошибкой, а рендер запрещен политикой
        ConverterFailed(code: Option<i32>) {
            display("Converter failed with exit code {:?}, render skipped", code)
        }
    }
}
