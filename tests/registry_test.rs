//! Integration tests for the entry store and factory resolution.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use rwire::{Arguments, ErrorKind, Factory, Registry, RegistryError, Value};

use common::{car, class_of, instance, registry};

// ============================================================
// Literal values
// ============================================================

#[test]
fn given_literal_when_set_then_get_returns_it_unchanged() {
    // Arrange
    let di = registry();

    // Act
    di.set("color", "blue").unwrap();

    // Assert
    assert_eq!(di.get("color"), Ok(Value::from("blue")));
    assert!(di.exists("color"));
    assert!(!di.is_frozen("color"), "literal reads do not freeze");
}

#[test]
fn given_unknown_key_when_getting_then_not_found() {
    let di = registry();

    let err = di.get("missing").unwrap_err();

    assert_eq!(err, RegistryError::not_found("missing"));
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "entry [missing] not found");
}

#[test]
fn given_function_under_plain_key_when_getting_then_returned_not_called() {
    let di = registry();
    let called = Rc::new(Cell::new(false));
    let seen = called.clone();
    let function = rwire::Function::new(vec![], move |_| {
        seen.set(true);
        Ok(Value::Null)
    });

    di.set("callback", function.clone()).unwrap();
    let value = di.get("callback").unwrap();

    assert_eq!(value, Value::Function(function));
    assert!(!called.get());
}

#[test]
fn given_entries_when_enumerating_then_insertion_order_is_kept() {
    let di = registry()
        .with_entries([("b", Value::Int(2)), ("a", Value::Int(1)), ("c", Value::Int(3))])
        .unwrap();

    di.set("a", 10).unwrap();

    assert_eq!(di.keys(), vec!["b", "a", "c"]);
    assert_eq!(di.len(), 3);
    assert!(!di.is_empty());
}

#[test]
fn given_missing_key_when_unset_then_noop() {
    let di = registry();
    di.set("color", "red").unwrap();

    di.unset("nothing").unwrap();
    di.unset("color").unwrap();

    assert!(di.is_empty());
    assert!(!di.exists("color"));
}

// ============================================================
// Factories
// ============================================================

#[test]
fn given_factory_when_resolved_twice_then_invoked_once() {
    // Arrange
    let di = registry();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    di.set(
        "Engine",
        Factory::new(move |make| {
            counter.set(counter.get() + 1);
            make.build("V8", Arguments::new())
        }),
    )
    .unwrap();

    // Act
    let first = di.get("Engine").unwrap();
    let second = di.get("Engine").unwrap();

    // Assert
    assert_eq!(calls.get(), 1);
    assert_eq!(first, second, "same instance is returned");
}

#[test]
fn given_plain_key_factory_when_resolved_then_result_is_memoized() {
    let di = registry();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    di.set(
        "answer",
        Factory::new(move |_| {
            counter.set(counter.get() + 1);
            Ok(Value::Int(42))
        }),
    )
    .unwrap();

    assert_eq!(di.get("answer"), Ok(Value::Int(42)));
    assert_eq!(di.get("answer"), Ok(Value::Int(42)));
    assert_eq!(calls.get(), 1);
}

#[test]
fn given_factory_returning_wrong_type_when_getting_then_factory_contract() {
    // Arrange: Car does not implement Engine
    let di = registry();
    di.set("Engine", Factory::new(|make| make.build("V8", Arguments::new())))
        .unwrap();
    di.set("Engine$wrong", Factory::new(|make| make.build("Car", Arguments::new())))
        .unwrap();

    // Act
    let err = di.get("Engine$wrong").unwrap_err();

    // Assert
    assert_eq!(err.kind(), ErrorKind::FactoryContract);
    assert_eq!(
        err.to_string(),
        "service factory must return an instance of [Engine]"
    );
    assert!(!di.is_frozen("Engine$wrong"), "failed resolution is not cached");
}

#[test]
fn given_factory_returning_literal_for_type_key_when_getting_then_factory_contract() {
    let di = registry();
    di.set("Engine", Factory::new(|_| Ok(Value::from("V8")))).unwrap();

    assert!(matches!(
        di.get("Engine"),
        Err(RegistryError::FactoryContract { .. })
    ));
}

#[test]
fn given_subtype_instance_when_checking_contract_then_transitive_supertypes_count() {
    // Turbine -> BaseEngine -> Engine
    let di = registry();
    di.set("Engine", Factory::new(|make| make.build("Turbine", Arguments::new())))
        .unwrap();

    assert_eq!(class_of(&di.get("Engine")), Some("Turbine"));
}

#[test]
fn given_arguments_for_type_key_when_getting_then_type_is_built_with_them() {
    let di = registry();
    di.set("Engine", "V8").unwrap();
    di.set("Car", Arguments::new().named("color", "green"))
        .unwrap();

    let car = car(di.get("Car"));

    assert_eq!(car.color, "green");
    assert_eq!(car.engine.class(), "V8");
}

#[test]
fn given_function_for_type_key_when_getting_then_invoked_with_autowiring() {
    let di = registry();
    di.set("Engine", "V8").unwrap();
    let factory = rwire::Function::new(
        vec![rwire::Param::typed("engine", "Engine")],
        |args| Ok(args.into_iter().next().unwrap_or_default()),
    );

    di.set("Engine$spare", factory).unwrap();

    assert_eq!(class_of(&di.get("Engine$spare")), Some("V8"));
}

// ============================================================
// End-to-end wiring
// ============================================================

#[test]
fn given_engine_alias_when_getting_car_then_car_has_v8_and_default_color() {
    // Arrange
    let di = registry();
    di.set("Engine", "V8").unwrap();

    // Act
    let car = car(di.make("Car", Arguments::new()));

    // Assert
    assert_eq!(car.color, "red");
    assert_eq!(car.engine.class(), "V8");
}

#[test]
fn given_registered_car_when_getting_twice_then_same_car_and_engine() {
    let di = registry();
    di.set("Engine", "V8").unwrap();
    di.set("Car", Arguments::new()).unwrap();

    let first = instance(di.get("Car"));
    let second = instance(di.get("Car"));
    let engine = instance(di.get("Engine"));

    assert!(first.ptr_eq(&second));
    assert!(first.downcast_ref::<common::Car>().unwrap().engine.ptr_eq(&engine));
}

#[test]
fn given_delegate_registry_when_resolving_parameters_then_delegate_wins() {
    // Arrange
    let catalog = Rc::new(common::catalog());
    let parent = Rc::new(Registry::new(catalog.clone()));
    parent.set("Engine", "V8").unwrap();
    parent.set("color", "black").unwrap();
    let child = Registry::with_delegate(catalog, parent.clone());

    // Act
    let car = car(child.make("Car", Arguments::new().named("color", "$color")));

    // Assert
    assert_eq!(car.color, "black");
    assert!(car.engine.ptr_eq(&instance(parent.get("Engine"))));
    assert!(!child.exists("Engine"));
}
