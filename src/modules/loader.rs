//! Загрузчик модулей.
//!
//! Отвечает за разрешение пути, однократное выполнение модуля и проверку
//! того, что модуль вернул реестр экспорта.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ImportConfig, ImportView, ModuleResolver, Registry};
use crate::classes::ClassTable;
use crate::error::{BindError, BindResult};
use crate::value::Value;

/// Результат выполнения верхнего уровня модуля.
#[derive(Debug, Clone)]
pub enum Evaluation {
    /// Модуль вернул реестр экспорта
    Exports(Registry),
    /// Модуль вернул обычное значение
    Value(Value),
}

impl From<Registry> for Evaluation {
    fn from(registry: Registry) -> Self {
        Evaluation::Exports(registry)
    }
}

impl From<Value> for Evaluation {
    fn from(value: Value) -> Self {
        Evaluation::Value(value)
    }
}

/// Загрузка модуля по разрешённому пути.
///
/// Вызывается ровно один раз на каждый импорт; кэширование (если нужно)
/// остаётся на совести реализации.
pub trait ModuleLoader {
    fn load(&self, path: &Path, classes: &mut ClassTable) -> BindResult<Evaluation>;
}

/// Тело модуля, написанное на Rust.
pub type ModuleBody = Box<dyn Fn(&mut ClassTable) -> BindResult<Evaluation> + Send + Sync>;

/// Загрузчик, сопоставляющий файлам модулей тела на Rust.
///
/// Файл на диске обозначает модуль, а его тело регистрируется по
/// каноническому пути этого файла.
#[derive(Default)]
pub struct NativeLoader {
    bodies: HashMap<PathBuf, ModuleBody>,
}

impl NativeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Зарегистрировать тело модуля для существующего файла.
    pub fn register<F>(&mut self, path: impl AsRef<Path>, body: F) -> BindResult<()>
    where
        F: Fn(&mut ClassTable) -> BindResult<Evaluation> + Send + Sync + 'static,
    {
        let canonical = canonicalize(path.as_ref())?;
        log::debug!("registered native module {}", canonical.display());
        self.bodies.insert(canonical, Box::new(body));
        Ok(())
    }

    /// Количество зарегистрированных модулей.
    pub fn count(&self) -> usize {
        self.bodies.len()
    }
}

impl ModuleLoader for NativeLoader {
    fn load(&self, path: &Path, classes: &mut ClassTable) -> BindResult<Evaluation> {
        let canonical = canonicalize(path)?;
        let body = self.bodies.get(&canonical).ok_or_else(|| {
            BindError::ModuleError(format!("no module body registered for {}", canonical.display()))
        })?;

        log::debug!("evaluating module {}", canonical.display());
        body(classes)
    }
}

impl fmt::Debug for NativeLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeLoader")
            .field("modules", &self.bodies.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn canonicalize(path: &Path) -> BindResult<PathBuf> {
    fs::canonicalize(path).map_err(|e| BindError::Io(format!("Failed to resolve {}: {}", path.display(), e)))
}

/// Хост импорта: конфигурация, таблица классов и загрузчик.
pub struct Host {
    config: ImportConfig,
    resolver: ModuleResolver,
    classes: ClassTable,
    loader: Box<dyn ModuleLoader>,
}

impl Host {
    /// Создать хост с конфигурацией по умолчанию.
    pub fn new(loader: impl ModuleLoader + 'static) -> Self {
        let config = ImportConfig::default();
        Self {
            resolver: ModuleResolver::new(&config),
            config,
            classes: ClassTable::new(),
            loader: Box::new(loader),
        }
    }

    /// Создать хост с заданной конфигурацией.
    pub fn with_config(config: ImportConfig, loader: impl ModuleLoader + 'static) -> BindResult<Self> {
        config.validate()?;
        Ok(Self {
            resolver: ModuleResolver::new(&config),
            config,
            classes: ClassTable::new(),
            loader: Box::new(loader),
        })
    }

    /// Импортировать функции и классы из модуля по пути.
    ///
    /// Модуль выполняется при каждом вызове; результат должен быть
    /// реестром экспорта, иначе [`BindError::InvalidExport`].
    pub fn from(&mut self, path: &str) -> BindResult<ImportView> {
        let resolved = self.resolver.resolve(path)?;

        match self.loader.load(&resolved, &mut self.classes)? {
            Evaluation::Exports(registry) => {
                log::debug!("imported {} binding(s) from {}", registry.len(), resolved.display());
                Ok(ImportView::new(registry))
            }
            Evaluation::Value(value) => Err(BindError::InvalidExport(format!(
                "{} returned {} value",
                resolved.display(),
                value.type_name()
            ))),
        }
    }

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ClassTable {
        &mut self.classes
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("config", &self.config)
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::ClassDef;
    use crate::function::Function;
    use crate::modules::{export, Binding, Export, Key};
    use std::fs::File;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn greet(args: &[Value]) -> BindResult<Value> {
        let name = args.first().and_then(Value::as_str).unwrap_or("world");
        Ok(Value::from(format!("Hello, {}!", name)))
    }

    fn host_in(dir: &Path, loader: NativeLoader) -> Host {
        let config = ImportConfig::default().with_base_dir(dir);
        Host::with_config(config, loader).unwrap()
    }

    #[test]
    fn test_import_function_and_class() {
        init_logger();
        let dir = tempdir().unwrap();
        let module_path = dir.path().join("a.mod");
        File::create(&module_path).unwrap();

        let greet_fn = Function::new(greet);
        let exported = greet_fn.clone();
        let mut loader = NativeLoader::new();
        loader
            .register(&module_path, move |classes| {
                classes.declare(ClassDef::new("Person", &["name", "age"]));
                export(classes, [Export::from(exported.clone()), Export::class("Person")])
                    .map(Evaluation::from)
            })
            .unwrap();

        let mut host = host_in(dir.path(), loader);
        let view = host.from("./a").unwrap();

        assert_eq!(view.get("greet").unwrap(), &Binding::Function(greet_fn));
        assert_eq!(view.get("Person").unwrap(), &Binding::Class("Person".into()));
        assert_eq!(
            view.call("greet", &[Value::from("Jimmy")]).unwrap(),
            Value::from("Hello, Jimmy!")
        );

        let person = view
            .construct("Person", &[Value::from("Jimmy"), Value::Int(19)], host.classes())
            .unwrap();
        assert_eq!(person.as_object().unwrap().class, "Person");
    }

    #[test]
    fn test_missing_module() {
        let dir = tempdir().unwrap();
        let mut host = host_in(dir.path(), NativeLoader::new());

        assert!(matches!(host.from("./missing"), Err(BindError::ModuleNotFound(_))));
    }

    #[test]
    fn test_plain_value_is_invalid_export() {
        let dir = tempdir().unwrap();
        let module_path = dir.path().join("plain.mod");
        File::create(&module_path).unwrap();

        let mut loader = NativeLoader::new();
        loader
            .register(&module_path, |_| Ok(Evaluation::from(Value::Int(42))))
            .unwrap();

        let mut host = host_in(dir.path(), loader);
        assert!(matches!(host.from("plain"), Err(BindError::InvalidExport(_))));
    }

    #[test]
    fn test_module_runs_on_every_import() {
        let dir = tempdir().unwrap();
        let module_path = dir.path().join("counted.mod");
        File::create(&module_path).unwrap();

        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let mut loader = NativeLoader::new();
        loader
            .register(&module_path, move |classes| {
                counter.fetch_add(1, Ordering::SeqCst);
                export(classes, [Function::new(greet)]).map(Evaluation::from)
            })
            .unwrap();

        let mut host = host_in(dir.path(), loader);
        let first = host.from("./counted").unwrap();
        let second = host.from("./counted.mod").unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 2);
        // Каждый импорт получает свой реестр
        assert_ne!(first.get("greet").unwrap(), second.get("greet").unwrap());
    }

    #[test]
    fn test_unregistered_module_file() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("orphan.mod")).unwrap();

        let mut host = host_in(dir.path(), NativeLoader::new());
        assert!(matches!(host.from("orphan"), Err(BindError::ModuleError(_))));
    }

    #[test]
    fn test_register_requires_existing_file() {
        let dir = tempdir().unwrap();
        let mut loader = NativeLoader::new();

        let result = loader.register(dir.path().join("nope.mod"), |_| Ok(Evaluation::from(Value::Unit)));
        assert!(matches!(result, Err(BindError::Io(_))));
        assert_eq!(loader.count(), 0);
    }

    #[test]
    fn test_export_errors_propagate() {
        let dir = tempdir().unwrap();
        let module_path = dir.path().join("broken.mod");
        File::create(&module_path).unwrap();

        let mut loader = NativeLoader::new();
        loader
            .register(&module_path, |classes| {
                export(classes, [Export::class("Undeclared")]).map(Evaluation::from)
            })
            .unwrap();

        let mut host = host_in(dir.path(), loader);
        assert!(matches!(host.from("broken"), Err(BindError::InvalidBinding(_))));
    }

    #[test]
    fn test_round_trip_every_name() {
        let dir = tempdir().unwrap();
        let module_path = dir.path().join("lib.mod");
        File::create(&module_path).unwrap();

        let helper = Function::named("helper", |_: &[Value]| Ok(Value::Int(1)));
        let (expected, exported) = {
            let mut classes = ClassTable::new();
            classes.declare(ClassDef::new("Point", &["x", "y"]));
            let registry = export(
                &classes,
                [Export::from(helper.clone()), Export::from(Function::new(greet)), Export::class("Point")],
            )
            .unwrap();
            (registry.clone(), registry)
        };

        let mut loader = NativeLoader::new();
        loader
            .register(&module_path, move |classes| {
                classes.declare(ClassDef::new("Point", &["x", "y"]));
                Ok(Evaluation::from(exported.clone()))
            })
            .unwrap();

        let mut host = host_in(dir.path(), loader);
        let view = host.from("lib").unwrap();

        for name in expected.names() {
            assert_eq!(view.get(name).unwrap(), expected.get(&Key::from(name)).unwrap());
        }
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn test_with_config_rejects_empty_extension() {
        let config = ImportConfig {
            extension: String::new(),
            base_dir: None,
        };
        assert!(matches!(
            Host::with_config(config, NativeLoader::new()),
            Err(BindError::Config(_))
        ));
    }
}
