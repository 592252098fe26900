//! Пример импорта функций и классов из двух модулей.
//!
//! Запуск: `RUST_LOG=debug cargo run --example import`

use std::path::PathBuf;

use modbind::{
    export, BindError, BindResult, Binding, ClassDef, ClassTable, Evaluation, Export, Function, Host,
    ImportConfig, NativeLoader, Value,
};

/// Модуль `functions`.
fn named_func(_args: &[Value]) -> BindResult<Value> {
    println!("Hello from named_func!");
    Ok(Value::Unit)
}

fn functions_module(classes: &mut ClassTable) -> BindResult<Evaluation> {
    export(classes, [Function::new(named_func)]).map(Evaluation::from)
}

/// Модуль `classes`.
fn prnt(args: &[Value]) -> BindResult<Value> {
    let person = args
        .first()
        .and_then(Value::as_object)
        .ok_or_else(|| BindError::Runtime("prnt expects a Person".into()))?;
    let name = person.field("name").cloned().unwrap_or_default();
    let age = person.field("age").cloned().unwrap_or_default();

    println!("{} is {} years old.", name, age);
    Ok(Value::Unit)
}

fn classes_module(classes: &mut ClassTable) -> BindResult<Evaluation> {
    classes.declare(ClassDef::new("Person", &["name", "age"]));
    export(classes, [Export::from(Function::new(prnt)), Export::class("Person")]).map(Evaluation::from)
}

fn run() -> BindResult<()> {
    let modules_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join("modules");

    let mut loader = NativeLoader::new();
    loader.register(modules_dir.join("functions.mod"), functions_module)?;
    loader.register(modules_dir.join("classes.mod"), classes_module)?;

    let config = ImportConfig::default().with_base_dir(&modules_dir);
    let mut host = Host::with_config(config, loader)?;

    // imports
    let functions = host.from("./functions")?;
    let classes = host.from("./classes")?;

    // вызов по позиции
    let [named] = functions.destructure::<1>()?;
    if let Binding::Function(f) = named {
        f.call(&[])?;
    }

    // создание экземпляра импортированного класса и вызов функции из того же импорта
    let [_, person_class] = classes.destructure::<2>()?;
    let person_class = person_class.as_class().unwrap_or("Person");
    let example = host
        .classes()
        .instantiate(person_class, &[Value::from("Jimmy"), Value::Int(19)])?;
    classes.call("prnt", &[example])?;

    // доступ по именам
    let example = classes.construct("Person", &[Value::from("John"), Value::Int(27)], host.classes())?;
    classes.call("prnt", &[example])?;

    println!("{}", classes.registry().to_json()?);
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
