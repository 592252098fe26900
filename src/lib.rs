//! # modbind
//!
//! Именованные экспорты и импорты модулей по пути.
//!
//! ## Основные модули
//!
//! - [`modules`] - реестр привязок, представление импорта, `export` и `from`
//! - [`classes`] - таблица объявленных классов
//! - [`function`] - экспортируемые функции и вывод их имён
//! - [`value`] - значения, передаваемые функциям
//! - [`error`] - ошибки
//!
//! ## Пример использования
//!
//! ```rust,ignore
//! use modbind::{export, Evaluation, Function, Host, NativeLoader};
//!
//! let mut loader = NativeLoader::new();
//! loader.register("modules/functions.mod", |classes| {
//!     export(classes, [Function::new(named_func)]).map(Evaluation::from)
//! })?;
//!
//! let mut host = Host::new(loader);
//! let functions = host.from("modules/functions")?;
//! functions.call("named_func", &[])?;
//! ```

pub mod classes;
pub mod error;
pub mod function;
pub mod modules;
pub mod value;

// === Re-exports для удобства ===
pub use classes::{ClassDef, ClassTable};
pub use error::{BindError, BindResult};
pub use function::Function;
pub use modules::{
    export, Binding, Evaluation, Export, ExportItem, Host, ImportConfig, ImportView, Key, ModuleLoader,
    NativeLoader, Registry,
};
pub use value::{Object, Value};
