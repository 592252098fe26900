//! Экспортируемые функции.
//!
//! [`Function`] хранит разделяемый вызываемый объект и его объявленное имя.
//! Имя либо задаётся явно ([`Function::named`]), либо выводится из пути
//! функции-элемента ([`Function::new`]): `my_mod::greet` даёт `greet`.
//! Замыкания имени не имеют.

use std::fmt;
use std::sync::Arc;

use crate::error::BindResult;
use crate::value::Value;

type Callable = dyn Fn(&[Value]) -> BindResult<Value> + Send + Sync;

/// Экспортируемая функция.
#[derive(Clone)]
pub struct Function {
    name: Option<String>,
    callable: Arc<Callable>,
}

impl Function {
    /// Создать функцию, выводя имя из её типа.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> BindResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: short_name(std::any::type_name::<F>()),
            callable: Arc::new(f),
        }
    }

    /// Создать функцию с явным именем.
    pub fn named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> BindResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            callable: Arc::new(f),
        }
    }

    /// Объявленное имя функции, если его удалось определить.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Вызвать функцию.
    pub fn call(&self, args: &[Value]) -> BindResult<Value> {
        (self.callable)(args)
    }

    /// Ссылаются ли две функции на один и тот же вызываемый объект.
    pub fn same(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.callable, &other.callable)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Function({})", name),
            None => write!(f, "Function(<anonymous>)"),
        }
    }
}

/// Короткое имя из полного пути типа: `a::b::greet` -> `greet`.
///
/// Замыкания (`{{closure}}`) и обобщённые пути имени не дают.
fn short_name(type_path: &str) -> Option<String> {
    if type_path.contains('{') || type_path.contains('<') {
        return None;
    }

    let name = type_path.rsplit("::").next()?;
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());

    valid.then(|| name.to_string())
}
