//! Определения ошибок для modbind.

use thiserror::Error;

/// Основной тип `Result` для библиотеки.
pub type BindResult<T> = Result<T, BindError>;

/// Перечисление всех возможных ошибок.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("Invalid binding type, must be a function or a class name: {0}")]
    InvalidBinding(String),

    #[error("Unable to determine name for function: {0}")]
    BindingName(String),

    #[error("Binding not found for key: '{0}'")]
    BindingNotFound(String),

    #[error("Binding '{0}' is not callable")]
    NotCallable(String),

    #[error("Cannot {0} values in the import container")]
    ReadOnlyBinding(String),

    #[error("File does not exist: {0}")]
    ModuleNotFound(String),

    #[error("The import file must return an export registry: {0}")]
    InvalidExport(String),

    // === Ошибки классов и вызовов ===
    #[error("Binding '{0}' is not a class")]
    NotConstructible(String),

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("{name} expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("Runtime error: {0}")]
    Runtime(String),

    // === Ошибки загрузки и конфигурации ===
    #[error("Module error: {0}")]
    ModuleError(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Config error: {0}")]
    Config(String),
}
