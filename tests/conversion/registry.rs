//! Registry override and ancestor resolution

use crate::common::*;
use std::sync::Arc;
use std::thread;

struct Person {
    name: String,
}

struct Employee {
    person: Person,
    number: u32,
}

struct Manager {
    employee: Employee,
}

struct PersonConverter;

impl TypedConverter for PersonConverter {
    type Value = Person;

    fn to_wire(&self, value: &Person, _registry: &ConverterRegistry) -> Result<String> {
        Ok(format!("person {}", value.name))
    }
}

struct EmployeeConverter;

impl TypedConverter for EmployeeConverter {
    type Value = Employee;

    fn to_wire(&self, value: &Employee, _registry: &ConverterRegistry) -> Result<String> {
        Ok(format!("employee {}", value.number))
    }
}

fn hierarchy(r: &ConverterRegistry) {
    r.declare_subtype::<Employee, Person>(|e| &e.person);
    r.declare_subtype::<Manager, Employee>(|m| &m.employee);
}

fn manager() -> Manager {
    Manager {
        employee: Employee {
            person: Person {
                name: "Bob".to_string(),
            },
            number: 7,
        },
    }
}

#[test]
fn unregistered_subtype_uses_nearest_ancestor() {
    let r = registry();
    hierarchy(&r);
    r.register_typed(PersonConverter);
    assert_eq!(r.convert_value(&manager()).unwrap(), "person Bob");

    r.register_typed(EmployeeConverter);
    assert_eq!(r.convert_value(&manager()).unwrap(), "employee 7");
}

#[test]
fn subtype_registration_does_not_affect_ancestor() {
    let r = registry();
    hierarchy(&r);
    r.register_typed(PersonConverter);
    r.register_typed(EmployeeConverter);
    let bob = Person {
        name: "Bob".to_string(),
    };
    assert_eq!(r.convert_value(&bob).unwrap(), "person Bob");
    assert_eq!(r.convert_value(&manager().employee).unwrap(), "employee 7");
}

#[test]
fn latest_registration_wins() {
    struct Loud;
    impl TypedConverter for Loud {
        type Value = bool;
        fn to_wire(&self, value: &bool, _registry: &ConverterRegistry) -> Result<String> {
            Ok(if *value { "TRUE" } else { "FALSE" }.to_string())
        }
    }

    let r = registry();
    let previous = r.register_typed(Loud);
    assert!(previous.is_some());
    assert_eq!(r.convert_value(&true).unwrap(), "TRUE");
}

#[test]
fn unknown_type_falls_back_to_object() {
    struct Widget;
    let r = registry();
    assert_eq!(r.to_wire(&Widget).unwrap(), "<Widget object>");
}

#[test]
fn boxed_value_of_unseen_type_keeps_its_name() {
    struct Gizmo;
    struct Doohickey;
    let r = registry();
    assert_eq!(r.convert_value(&dyn_value(Gizmo)).unwrap(), "<Gizmo object>");

    let args = Arguments::new().arg(Doohickey);
    assert_eq!(
        r.convert_value(&args.positional()[0]).unwrap(),
        "<Doohickey object>"
    );
}

#[test]
fn no_converter_after_object_removed() {
    struct Widget;
    let r = registry();
    assert!(r.unregister(TypeKey::object()).is_some());
    let err = r.to_wire(&Widget).unwrap_err();
    assert!(err.is_no_converter());
}

#[test]
fn registries_are_isolated() {
    let a = registry();
    let b = registry();
    a.register_typed(PersonConverter);
    assert!(a.contains(TypeKey::of::<Person>()));
    assert!(!b.contains(TypeKey::of::<Person>()));
}

#[test]
fn registration_is_visible_across_threads() {
    let r = registry();
    hierarchy(&r);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let r = r.clone();
            thread::spawn(move || {
                if i == 0 {
                    r.register_typed(EmployeeConverter);
                }
                for _ in 0..100 {
                    let out = r.convert_value(&manager()).unwrap();
                    assert!(out == "employee 7" || out == "<Manager object>");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(r.convert_value(&manager()).unwrap(), "employee 7");
}

#[test]
fn shared_converter_instance() {
    let r = registry();
    let shared: Arc<dyn Converter> = Arc::new(Typed(PersonConverter));
    r.register_shared(TypeKey::of::<Person>(), Arc::clone(&shared));
    assert_eq!(
        r.resolve(TypeKey::of::<Person>()).ok().map(|c| c.name()),
        Some(shared.name())
    );
}
