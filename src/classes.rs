//! Таблица объявленных классов.
//!
//! Класс считается существующим, если он объявлен в [`ClassTable`].
//! Экспорт класса по имени проверяется именно по этой таблице.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{BindError, BindResult};
use crate::value::{Object, Value};

/// Определение класса.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Имя класса
    pub name: String,
    /// Поля, заполняемые конструктором по порядку
    pub fields: Vec<String>,
}

impl ClassDef {
    /// Создать определение класса.
    pub fn new(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Создать экземпляр: по одному аргументу на поле.
    pub fn instantiate(&self, args: &[Value]) -> BindResult<Value> {
        if args.len() != self.fields.len() {
            return Err(BindError::Arity {
                name: self.name.clone(),
                expected: self.fields.len(),
                got: args.len(),
            });
        }

        let fields: BTreeMap<String, Value> = self
            .fields
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect();

        Ok(Value::Object(Object {
            class: self.name.clone(),
            fields,
        }))
    }
}

/// Таблица классов хоста.
#[derive(Debug, Clone, Default)]
pub struct ClassTable {
    classes: HashMap<String, ClassDef>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Объявить класс. Повторное объявление заменяет прежнее.
    pub fn declare(&mut self, class: ClassDef) {
        log::debug!("declaring class {}", class.name);
        self.classes.insert(class.name.clone(), class);
    }

    /// Проверить, объявлен ли класс.
    pub fn exists(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Получить определение класса.
    pub fn get(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    /// Создать экземпляр класса по имени.
    pub fn instantiate(&self, name: &str, args: &[Value]) -> BindResult<Value> {
        self.get(name)
            .ok_or_else(|| BindError::UnknownClass(name.to_string()))?
            .instantiate(args)
    }

    /// Количество объявленных классов.
    pub fn count(&self) -> usize {
        self.classes.len()
    }
}
