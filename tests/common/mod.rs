//! Shared fixtures: a small engine/car type hierarchy.
//!
//! ```text
//! Engine (interface)
//! ├── BaseEngine (abstract)
//! │   └── Turbine(power: ?int)
//! ├── V8            call(prefix = "") -> prefix + "World"
//! └── W16(left: Engine, right: Engine)
//! Car(engine: Engine, color = "red")    describe() -> "<color> car"
//! ```
#![allow(dead_code)]

use std::rc::Rc;

use rwire::{
    Instance, Param, Registry, RegistryError, RegistryResult, TypeCatalog, TypeDescriptor, Value,
};

pub struct V8;

pub struct W16 {
    pub left: Instance,
    pub right: Instance,
}

pub struct Turbine {
    pub power: Option<i64>,
}

pub struct Car {
    pub engine: Instance,
    pub color: String,
}

fn next(args: &mut impl Iterator<Item = Value>) -> Value {
    args.next().unwrap_or_default()
}

pub fn catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(TypeDescriptor::interface("Engine"))
        .with(TypeDescriptor::abstract_type("BaseEngine").implements("Engine").method::<Turbine, _>(
            "power",
            vec![],
            |turbine, _| Ok(turbine.power.map(Value::Int).unwrap_or_default()),
        ))
        .with(
            TypeDescriptor::concrete("V8", || V8)
                .implements("Engine")
                .method::<V8, _>(
                    "call",
                    vec![Param::new("prefix").with_default("")],
                    |_, args| {
                        let prefix = next(&mut args.into_iter()).into_string("V8::call")?;
                        Ok(Value::Str(format!("{prefix}World")))
                    },
                ),
        )
        .with(
            TypeDescriptor::constructed(
                "W16",
                vec![Param::typed("left", "Engine"), Param::typed("right", "Engine")],
                |args| {
                    let mut args = args.into_iter();
                    Ok(W16 {
                        left: next(&mut args).into_instance("W16")?,
                        right: next(&mut args).into_instance("W16")?,
                    })
                },
            )
            .implements("Engine"),
        )
        .with(
            TypeDescriptor::constructed(
                "Turbine",
                vec![Param::new("power").nullable()],
                |args| {
                    Ok(Turbine {
                        power: args.first().and_then(Value::as_int),
                    })
                },
            )
            .implements("BaseEngine"),
        )
        .with(
            TypeDescriptor::constructed(
                "Car",
                vec![
                    Param::typed("engine", "Engine"),
                    Param::new("color").with_default("red"),
                ],
                |args| {
                    let mut args = args.into_iter();
                    Ok(Car {
                        engine: next(&mut args).into_instance("Car")?,
                        color: next(&mut args).into_string("Car")?,
                    })
                },
            )
            .method::<Car, _>("describe", vec![], |car, _| {
                Ok(Value::Str(format!("{} car", car.color)))
            }),
        )
}

pub fn registry() -> Registry {
    rwire::util::testing::init_test_setup();
    Registry::new(Rc::new(catalog()))
}

/// Class name of an instance value, `None` for anything else.
pub fn class_of(value: &RegistryResult<Value>) -> Option<&str> {
    value.as_ref().ok()?.as_instance().map(Instance::class)
}

pub fn instance(value: RegistryResult<Value>) -> Instance {
    value
        .expect("resolution succeeds")
        .into_instance("test")
        .expect("value is an instance")
}

pub fn car(value: RegistryResult<Value>) -> Rc<Car> {
    instance(value).downcast::<Car>().expect("instance is a Car")
}

pub fn cyclic(name: &str) -> RegistryError {
    RegistryError::CyclicDependency(name.to_string())
}
