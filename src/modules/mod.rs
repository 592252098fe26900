//! Система именованных экспортов и импортов.
//!
//! Экспортирующий модуль возвращает реестр привязок, построенный через
//! [`export`]; импортирующий получает его по пути через [`Host::from`].
//!
//! ## Пример
//!
//! ```rust,ignore
//! // Модуль classes: тело, зарегистрированное в NativeLoader
//! classes.declare(ClassDef::new("Person", &["name", "age"]));
//! export(classes, [Export::from(Function::new(prnt)), Export::class("Person")])
//!
//! // Импортирующий код
//! let view = host.from("./classes")?;
//! let person = view.construct("Person", &args, host.classes())?;
//! view.call("prnt", &[person])?;
//! ```

mod loader;
mod registry;
mod resolver;
mod view;

pub use loader::{Evaluation, Host, ModuleBody, ModuleLoader, NativeLoader};
pub use registry::{ExportEntry, ExportManifest, Registry};
pub use resolver::ModuleResolver;
pub use view::ImportView;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classes::ClassTable;
use crate::error::{BindError, BindResult};
use crate::function::Function;
use crate::value::Value;

/// Расширение файлов модулей по умолчанию.
pub const DEFAULT_EXTENSION: &str = "mod";

/// Ключ привязки: имя или позиция.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Position(usize),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{}", name),
            Key::Position(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Position(index)
    }
}

/// То, что передаётся в [`export`] и [`Registry::bind`].
#[derive(Debug, Clone)]
pub enum Export {
    /// Вызываемая функция
    Function(Function),
    /// Идентификатор класса
    Class(String),
    /// Обычное значение (привязать нельзя)
    Value(Value),
}

impl Export {
    /// Экспорт класса по имени.
    pub fn class(name: impl Into<String>) -> Self {
        Export::Class(name.into())
    }
}

impl From<Function> for Export {
    fn from(f: Function) -> Self {
        Export::Function(f)
    }
}

impl From<Value> for Export {
    fn from(v: Value) -> Self {
        Export::Value(v)
    }
}

/// Сохранённая привязка.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Function(Function),
    Class(String),
}

impl Binding {
    /// Вид привязки для манифеста и сообщений.
    pub fn kind(&self) -> &'static str {
        match self {
            Binding::Function(_) => "function",
            Binding::Class(_) => "class",
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Binding::Function(f) => Some(f),
            Binding::Class(_) => None,
        }
    }

    pub fn as_class(&self) -> Option<&str> {
        match self {
            Binding::Class(name) => Some(name),
            Binding::Function(_) => None,
        }
    }
}

/// Элемент списка экспорта: позиционный или именованный.
#[derive(Debug, Clone)]
pub enum ExportItem {
    Positional(Export),
    Named(String, Export),
}

impl From<Export> for ExportItem {
    fn from(export: Export) -> Self {
        ExportItem::Positional(export)
    }
}

impl From<Function> for ExportItem {
    fn from(f: Function) -> Self {
        ExportItem::Positional(Export::Function(f))
    }
}

impl<S: Into<String>> From<(S, Export)> for ExportItem {
    fn from((name, export): (S, Export)) -> Self {
        ExportItem::Named(name.into(), export)
    }
}

/// Экспортировать функции и классы модуля.
///
/// Позиционные элементы получают ключ [`Key::Position`], то есть без
/// явного имени: имя функции выводится, класс привязывается под своим
/// идентификатором. Возвращает новый реестр или первую ошибку привязки.
pub fn export<I, T>(classes: &ClassTable, items: I) -> BindResult<Registry>
where
    I: IntoIterator<Item = T>,
    T: Into<ExportItem>,
{
    let mut registry = Registry::new();
    let mut position = 0;

    for item in items {
        match item.into() {
            ExportItem::Positional(export) => {
                registry.bind(Some(Key::Position(position)), export, classes)?;
                position += 1;
            }
            ExportItem::Named(name, export) => {
                registry.bind(Some(Key::Name(name)), export, classes)?;
            }
        }
    }

    log::debug!("exported {} binding(s)", registry.len());
    Ok(registry)
}

/// Конфигурация импорта.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Расширение, добавляемое к пути без расширения
    pub extension: String,
    /// Базовая директория для относительных путей
    pub base_dir: Option<PathBuf>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            base_dir: None,
        }
    }
}

impl ImportConfig {
    /// Установить расширение (ведущая точка отбрасывается).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Установить базовую директорию.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Прочитать конфигурацию из JSON.
    pub fn from_json(source: &str) -> BindResult<Self> {
        let mut config: ImportConfig =
            serde_json::from_str(source).map_err(|e| BindError::Config(e.to_string()))?;
        config.extension = config.extension.trim_start_matches('.').to_string();
        config.validate()?;
        Ok(config)
    }

    /// Проверить корректность конфигурации.
    pub fn validate(&self) -> BindResult<()> {
        if self.extension.is_empty() {
            return Err(BindError::Config("module extension must not be empty".into()));
        }
        Ok(())
    }
}
