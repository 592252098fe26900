//! Реестр привязок одного экспорта.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Binding, Export, Key};
use crate::classes::ClassTable;
use crate::error::{BindError, BindResult};

/// Описание одной привязки в манифесте.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// Позиция в порядке экспорта
    pub position: usize,
    /// Имя, если привязка всё ещё доступна по нему
    pub name: Option<String>,
    /// "function" или "class"
    pub kind: String,
    /// Идентификатор класса (только для классов)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

/// Сериализуемый список экспортов модуля.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportManifest {
    pub exports: Vec<ExportEntry>,
}

/// Реестр привязок, построенный одним вызовом `export`.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Привязки по имени (последняя запись побеждает)
    by_name: HashMap<String, Binding>,
    /// Привязки в порядке экспорта
    by_position: Vec<Binding>,
    /// Имя, под которым привязана каждая позиция
    bound_names: Vec<String>,
}

impl Registry {
    /// Создать пустой реестр.
    pub fn new() -> Self {
        Self::default()
    }

    /// Привязать функцию или класс.
    ///
    /// Без явного имени (`None` или [`Key::Position`]) функция привязывается
    /// под своим объявленным именем, класс под своим идентификатором.
    /// При ошибке реестр не изменяется.
    pub fn bind(&mut self, key: Option<Key>, concrete: Export, classes: &ClassTable) -> BindResult<()> {
        let explicit = match key {
            Some(Key::Name(name)) => Some(name),
            _ => None,
        };

        let (name, binding) = match concrete {
            Export::Function(f) => {
                let name = match explicit {
                    Some(name) => name,
                    None => f
                        .name()
                        .map(str::to_string)
                        .ok_or_else(|| BindError::BindingName(format!("{:?}", f)))?,
                };
                (name, Binding::Function(f))
            }
            Export::Class(class) => {
                if !classes.exists(&class) {
                    return Err(BindError::InvalidBinding(format!("unknown class '{}'", class)));
                }
                (explicit.unwrap_or_else(|| class.clone()), Binding::Class(class))
            }
            Export::Value(value) => {
                return Err(BindError::InvalidBinding(format!(
                    "got {} value {}",
                    value.type_name(),
                    value
                )));
            }
        };

        log::debug!("binding {} '{}' at position {}", binding.kind(), name, self.by_position.len());

        if self.by_name.insert(name.clone(), binding.clone()).is_some() {
            log::warn!("binding '{}' overwritten by a later export", name);
        }
        self.by_position.push(binding);
        self.bound_names.push(name);

        Ok(())
    }

    /// Получить привязку: по имени, иначе по позиции.
    pub fn get(&self, key: &Key) -> BindResult<&Binding> {
        log::trace!("lookup '{}'", key);

        let binding = match key {
            Key::Name(name) => self.by_name.get(name),
            Key::Position(index) => self.by_position.get(*index),
        };

        binding.ok_or_else(|| BindError::BindingNotFound(key.to_string()))
    }

    /// Проверить наличие привязки по имени.
    ///
    /// Позиционные ключи здесь не учитываются, хотя `get` их принимает.
    pub fn exists(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Количество привязок (по позициям).
    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    /// Все имена, отсортированные.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Привязки в порядке экспорта.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.by_position.iter()
    }

    /// Построить манифест экспорта.
    pub fn manifest(&self) -> ExportManifest {
        let exports = self
            .by_position
            .iter()
            .zip(&self.bound_names)
            .enumerate()
            .map(|(position, (binding, name))| {
                // Имя могло быть перезаписано более поздней привязкой
                let reachable = self.by_name.get(name) == Some(binding);
                ExportEntry {
                    position,
                    name: reachable.then(|| name.clone()),
                    kind: binding.kind().to_string(),
                    class: binding.as_class().map(str::to_string),
                }
            })
            .collect();

        ExportManifest { exports }
    }

    /// Манифест в виде JSON.
    pub fn to_json(&self) -> BindResult<String> {
        serde_json::to_string_pretty(&self.manifest()).map_err(|e| BindError::Runtime(e.to_string()))
    }
}
