//! Employees hired before a given date

use crate::common::*;
use waferslim::{declare_subtype, register_converter};

const FIELDS: usize = 4;

#[derive(Clone)]
struct Employee {
    number: u32,
    first_name: &'static str,
    last_name: &'static str,
    hire_date: NaiveDate,
}

struct Manager {
    employee: Employee,
    reports: Vec<u32>,
}

/// Row form: `[["employee number", ..], ["first name", ..], ..]`
struct EmployeeConverter;

impl TypedConverter for EmployeeConverter {
    type Value = Employee;

    fn to_wire(&self, value: &Employee, registry: &ConverterRegistry) -> Result<String> {
        let row: Vec<(String, DynValue)> = vec![
            ("employee number".to_string(), dyn_value(value.number)),
            ("first name".to_string(), dyn_value(value.first_name)),
            ("last name".to_string(), dyn_value(value.last_name)),
            ("hire date".to_string(), dyn_value(value.hire_date)),
        ];
        registry.to_wire(&row)
    }
}

struct EmployeesHiredBefore {
    before: NaiveDate,
}

impl EmployeesHiredBefore {
    fn new(args: Arguments) -> Result<Self> {
        let before = args
            .get::<NaiveDate>(0)
            .copied()
            .ok_or_else(|| Error::conversion("NaiveDate", "", "missing hire date"))?;
        Ok(EmployeesHiredBefore { before })
    }

    fn query(&self) -> Vec<Employee> {
        roster()
            .into_iter()
            .filter(|e| e.hire_date < self.before)
            .collect()
    }
}

fn roster() -> Vec<Employee> {
    vec![
        Employee {
            number: 1429,
            first_name: "Bob",
            last_name: "Martin",
            hire_date: ymd(1974, 10, 1),
        },
        Employee {
            number: 8832,
            first_name: "James",
            last_name: "Grenning",
            hire_date: ymd(1979, 12, 15),
        },
        Employee {
            number: 3,
            first_name: "Ward",
            last_name: "Cunningham",
            hire_date: ymd(1970, 1, 1),
        },
    ]
}

fn fixture_registry() -> ConverterRegistry {
    let r = registry();
    r.register_typed(EmployeeConverter);
    r.declare_subtype::<Manager, Employee>(|m| &m.employee);
    r
}

fn field(row_item: &str) -> (String, String) {
    let pair = items(row_item);
    assert_eq!(pair.len(), 2, "field should be a [name, value] pair");
    (pair[0].clone(), pair[1].clone())
}

#[test]
fn constructor_receives_coerced_date() {
    let r = fixture_registry();
    let new_fixture = convert_arg::<NaiveDate>(&r).wrap(EmployeesHiredBefore::new);
    let fixture = new_fixture(Arguments::from_wire(["1974-10-10"])).unwrap();
    assert_eq!(fixture.before, ymd(1974, 10, 10));
}

#[test]
fn constructor_rejects_malformed_date() {
    let r = fixture_registry();
    let new_fixture = convert_arg::<NaiveDate>(&r).wrap(EmployeesHiredBefore::new);
    let err = new_fixture(Arguments::from_wire(["10-10-1974"])).err().unwrap();
    assert!(err.is_conversion());
}

#[test]
fn query_serializes_to_rows_of_pairs() {
    let r = fixture_registry();
    let new_fixture = convert_arg::<NaiveDate>(&r).wrap(EmployeesHiredBefore::new);
    let fixture = new_fixture(Arguments::from_wire(["1974-10-10"])).unwrap();
    let query = convert_result::<Vec<Employee>>(&r)
        .wrap(move |_args: Arguments| -> Result<Vec<Employee>> { Ok(fixture.query()) });

    let out = query(Arguments::new()).unwrap();
    let rows = items(&out);
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(items(row).len(), FIELDS);
    }

    let bob: Vec<(String, String)> = items(&rows[0]).iter().map(|f| field(f)).collect();
    assert_eq!(
        bob,
        vec![
            ("employee number".to_string(), "1429".to_string()),
            ("first name".to_string(), "Bob".to_string()),
            ("last name".to_string(), "Martin".to_string()),
            ("hire date".to_string(), "1974-10-01".to_string()),
        ]
    );
    assert_eq!(field(&items(&rows[1])[0]).1, "3");
}

#[test]
fn query_output_decodes_as_untyped_structure() {
    let r = fixture_registry();
    let out = r.to_wire(&roster()).unwrap();
    let rows = r.from_wire::<Vec<DynValue>>(&out).unwrap();
    assert_eq!(rows.len(), 3);
    let row = rows[1].downcast_ref::<Vec<DynValue>>().unwrap();
    assert_eq!(row.len(), FIELDS);
    let pair = row[2].downcast_ref::<Vec<DynValue>>().unwrap();
    assert_eq!(pair[0].downcast_ref::<String>().unwrap(), "last name");
    assert_eq!(pair[1].downcast_ref::<String>().unwrap(), "Grenning");
}

#[test]
fn managers_serialize_as_employees() {
    let r = fixture_registry();
    let staff: Vec<DynValue> = vec![
        dyn_value(roster()[0].clone()),
        dyn_value(Manager {
            employee: roster()[1].clone(),
            reports: vec![1429],
        }),
    ];
    let rows = items(&r.to_wire(&staff).unwrap());
    assert_eq!(rows.len(), 2);
    assert_eq!(field(&items(&rows[1])[1]).1, "James");
}

#[test]
fn manager_converter_overrides_row_form() {
    struct ManagerConverter;

    impl TypedConverter for ManagerConverter {
        type Value = Manager;

        fn to_wire(&self, value: &Manager, registry: &ConverterRegistry) -> Result<String> {
            let mut row = items(&EmployeeConverter.to_wire(&value.employee, registry)?);
            let reports = registry.to_wire(&value.reports)?;
            row.push(wire::encode_list(["reports", reports.as_str()]));
            Ok(wire::encode_list(row))
        }
    }

    let r = fixture_registry();
    r.register_typed(ManagerConverter);
    let boss = Manager {
        employee: roster()[2].clone(),
        reports: vec![1429, 8832],
    };
    let row = items(&r.to_wire(&boss).unwrap());
    assert_eq!(row.len(), FIELDS + 1);
    let (name, reports) = field(&row[FIELDS]);
    assert_eq!(name, "reports");
    assert_eq!(r.from_wire::<Vec<u32>>(&reports).unwrap(), vec![1429, 8832]);
    assert_eq!(items(&r.to_wire(&roster()[0]).unwrap()).len(), FIELDS);
}

#[test]
fn global_registry_serves_fixture_types() {
    init_tracing();
    register_converter(EmployeeConverter);
    declare_subtype::<Manager, Employee>(|m| &m.employee);
    let out = convert_value(&roster()).unwrap();
    assert_eq!(items(&out).len(), 3);
}
