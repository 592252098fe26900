//! Разрешение путей модулей.
//!
//! Путь проверяется как есть, затем с добавленным расширением модуля.

use std::path::{Path, PathBuf};

use super::ImportConfig;
use crate::error::{BindError, BindResult};

/// Резолвер путей модулей.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    /// Базовая директория для относительных путей
    base_dir: Option<PathBuf>,
    /// Расширение файлов модулей (без точки)
    extension: String,
}

impl ModuleResolver {
    /// Создать резолвер из конфигурации.
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            base_dir: config.base_dir.clone(),
            extension: config.extension.clone(),
        }
    }

    /// Разрешить путь модуля в существующий файл.
    ///
    /// 1. `path` как есть;
    /// 2. `path` + `.` + расширение;
    /// 3. иначе [`BindError::ModuleNotFound`].
    pub fn resolve(&self, path: &str) -> BindResult<PathBuf> {
        let exact = self.absolutize(Path::new(path));
        if exact.is_file() {
            log::debug!("resolved module '{}' to {}", path, exact.display());
            return Ok(exact);
        }

        let with_ext = self.absolutize(Path::new(&format!("{}.{}", path, self.extension)));
        if with_ext.is_file() {
            log::debug!("resolved module '{}' to {}", path, with_ext.display());
            return Ok(with_ext);
        }

        Err(BindError::ModuleNotFound(path.to_string()))
    }

    /// Присоединить относительный путь к базовой директории.
    fn absolutize(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Расширение файлов модулей.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl Default for ModuleResolver {
    fn default() -> Self {
        Self::new(&ImportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn resolver_in(dir: &Path) -> ModuleResolver {
        ModuleResolver::new(&ImportConfig::default().with_base_dir(dir))
    }

    #[test]
    fn test_resolve_exact_path() {
        let dir = tempdir().unwrap();
        let module_path = dir.path().join("functions");
        File::create(&module_path).unwrap().write_all(b"functions").unwrap();

        let result = resolver_in(dir.path()).resolve("./functions");
        assert_eq!(result.unwrap(), dir.path().join("./functions"));
    }

    #[test]
    fn test_resolve_with_extension() {
        let dir = tempdir().unwrap();
        let module_path = dir.path().join("classes.mod");
        File::create(&module_path).unwrap().write_all(b"classes").unwrap();

        let result = resolver_in(dir.path()).resolve("./classes");
        assert_eq!(result.unwrap(), dir.path().join("./classes.mod"));
    }

    #[test]
    fn test_exact_path_wins() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("both")).unwrap();
        File::create(dir.path().join("both.mod")).unwrap();

        let result = resolver_in(dir.path()).resolve("both");
        assert_eq!(result.unwrap(), dir.path().join("both"));
    }

    #[test]
    fn test_directory_is_not_a_module() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("utils")).unwrap();

        let result = resolver_in(dir.path()).resolve("utils");
        assert!(matches!(result, Err(BindError::ModuleNotFound(_))));
    }

    #[test]
    fn test_resolve_not_found() {
        let dir = tempdir().unwrap();
        let result = resolver_in(dir.path()).resolve("./missing");

        assert_eq!(result, Err(BindError::ModuleNotFound("./missing".to_string())));
    }

    #[test]
    fn test_custom_extension() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("plugin.plug")).unwrap();

        let config = ImportConfig::default()
            .with_base_dir(dir.path())
            .with_extension(".plug");
        let resolver = ModuleResolver::new(&config);

        assert_eq!(resolver.extension(), "plug");
        assert!(resolver.resolve("plugin").is_ok());
    }
}
