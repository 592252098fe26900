//! Представление импорта: доступ к реестру только на чтение.

use super::{Binding, Export, Key, Registry};
use crate::classes::ClassTable;
use crate::error::{BindError, BindResult};
use crate::value::Value;

/// Импортированные привязки одного модуля.
///
/// Все операции делегируются реестру; запись и удаление всегда
/// завершаются ошибкой [`BindError::ReadOnlyBinding`].
#[derive(Debug, Clone)]
pub struct ImportView {
    registry: Registry,
}

impl ImportView {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Получить привязку по имени или позиции.
    pub fn get(&self, key: impl Into<Key>) -> BindResult<&Binding> {
        self.registry.get(&key.into())
    }

    /// Проверить наличие привязки по имени.
    pub fn has(&self, name: &str) -> bool {
        self.registry.exists(name)
    }

    /// Вызвать импортированную функцию.
    pub fn call(&self, name: impl Into<Key>, args: &[Value]) -> BindResult<Value> {
        let key: Key = name.into();
        match self.registry.get(&key)? {
            Binding::Function(f) => f.call(args),
            Binding::Class(_) => Err(BindError::NotCallable(key.to_string())),
        }
    }

    /// Создать экземпляр импортированного класса.
    pub fn construct(&self, name: impl Into<Key>, args: &[Value], classes: &ClassTable) -> BindResult<Value> {
        let key: Key = name.into();
        match self.registry.get(&key)? {
            Binding::Class(class) => classes.instantiate(class, args),
            Binding::Function(_) => Err(BindError::NotConstructible(key.to_string())),
        }
    }

    /// Разобрать первые `N` привязок по позициям.
    pub fn destructure<const N: usize>(&self) -> BindResult<[&Binding; N]> {
        let mut bindings = Vec::with_capacity(N);
        for index in 0..N {
            bindings.push(self.registry.get(&Key::Position(index))?);
        }

        bindings
            .try_into()
            .map_err(|_| BindError::BindingNotFound(N.to_string()))
    }

    /// Запись запрещена.
    pub fn set(&self, key: impl Into<Key>, _value: Export) -> BindResult<()> {
        let key: Key = key.into();
        log::debug!("rejected write to import binding '{}'", key);
        Err(BindError::ReadOnlyBinding("set".to_string()))
    }

    /// Удаление запрещено.
    pub fn unset(&self, key: impl Into<Key>) -> BindResult<()> {
        let key: Key = key.into();
        log::debug!("rejected unset of import binding '{}'", key);
        Err(BindError::ReadOnlyBinding("unset".to_string()))
    }

    /// Реестр только для чтения.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.registry.iter()
    }
}
