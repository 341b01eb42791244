//! Round-trip laws
//!
//! For every built-in type T and value v: from_wire::<T>(convert_value(v)) == v.

use crate::common::*;
use proptest::prelude::*;

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn bool_roundtrip() {
    let r = registry();
    for v in [true, false] {
        let wire = r.convert_value(&v).unwrap();
        assert_eq!(r.from_wire::<bool>(&wire).unwrap(), v);
    }
}

#[test]
fn int_roundtrip() {
    let r = registry();
    for v in [0i64, -1, 123456] {
        let wire = r.convert_value(&v).unwrap();
        assert_eq!(r.from_wire::<i64>(&wire).unwrap(), v);
    }
    assert_eq!(r.convert_value(&-1i64).unwrap(), "-1");
}

#[test]
fn float_roundtrip() {
    let r = registry();
    for v in [0.0f64, -3.14] {
        let wire = r.convert_value(&v).unwrap();
        assert_eq!(r.from_wire::<f64>(&wire).unwrap(), v);
    }
    assert_eq!(r.convert_value(&0.0f64).unwrap(), "0.0");
}

#[test]
fn date_roundtrip() {
    let r = registry();
    let v = ymd(2024, 1, 31);
    let wire = r.convert_value(&v).unwrap();
    assert_eq!(wire, "2024-01-31");
    assert_eq!(r.from_wire::<NaiveDate>(&wire).unwrap(), v);
}

#[test]
fn string_roundtrip() {
    let r = registry();
    for v in ["", "hello"] {
        let wire = r.convert_value(&v.to_string()).unwrap();
        assert_eq!(r.from_wire::<String>(&wire).unwrap(), v);
    }
}

#[test]
fn null_is_the_sentinel() {
    let r = registry();
    let wire = r.convert_value(&()).unwrap();
    assert_eq!(wire, r.config().null_sentinel);
    r.from_wire::<()>(&wire).unwrap();
}

// ============================================================================
// Composites
// ============================================================================

#[test]
fn scalar_pair_list_roundtrip_without_setup() {
    let r = registry();
    let v = vec![(1i64, "a".to_string()), (2, "b".to_string())];
    let wire = r.to_wire(&v).unwrap();
    assert_eq!(
        wire,
        "[000002:000027:[000002:000001:1:000001:a:]:000027:[000002:000001:2:000001:b:]:]"
    );
    assert_eq!(r.from_wire::<Vec<(i64, String)>>(&wire).unwrap(), v);
}

#[test]
fn nested_scalar_lists_roundtrip_without_setup() {
    let r = registry();

    let ints = vec![vec![1i64, 2], vec![], vec![3]];
    let wire = r.to_wire(&ints).unwrap();
    assert_eq!(items(&wire).len(), 3);
    assert_eq!(r.from_wire::<Vec<Vec<i64>>>(&wire).unwrap(), ints);

    let words = vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]];
    let wire = r.to_wire(&words).unwrap();
    assert!(!wire.contains("object"), "nested strings fell back: {}", wire);
    assert_eq!(r.from_wire::<Vec<Vec<String>>>(&wire).unwrap(), words);

    let cube = vec![vec![vec![ymd(2024, 1, 31)]], vec![]];
    let wire = r.to_wire(&cube).unwrap();
    assert_eq!(r.from_wire::<Vec<Vec<Vec<NaiveDate>>>>(&wire).unwrap(), cube);
}

#[test]
fn nested_lists_dispatch_through_convert_value() {
    let r = registry();
    let rows: DynValue = dyn_value(vec![vec!["x".to_string()], vec!["y".to_string()]]);
    assert_eq!(
        r.convert_value(&rows).unwrap(),
        "[000002:000018:[000001:000001:x:]:000018:[000001:000001:y:]:]"
    );
}

#[test]
fn pair_of_fixture_type_still_needs_declaring() {
    struct Badge;
    let r = registry();
    let v = vec![(1i64, Badge)];
    assert_eq!(r.to_wire(&v).unwrap(), "<Vec<(i64, Badge)> object>");
}

#[test]
fn options_use_the_null_sentinel() {
    let r = registry();
    let sentinel = r.config().null_sentinel.clone();

    assert_eq!(r.to_wire(&None::<String>).unwrap(), sentinel);
    assert_eq!(r.to_wire(&Some(5i64)).unwrap(), "5");
    assert_eq!(r.from_wire::<Option<NaiveDate>>(&sentinel).unwrap(), None);
    assert_eq!(
        r.from_wire::<Option<NaiveDate>>("2024-01-31").unwrap(),
        Some(ymd(2024, 1, 31))
    );

    let v = vec![Some(1i64), None, Some(3)];
    let wire = r.to_wire(&v).unwrap();
    assert_eq!(r.from_wire::<Vec<Option<i64>>>(&wire).unwrap(), v);
}

#[test]
fn undeclared_list_recovers_structure_as_strings() {
    let r = registry();
    let v: Vec<DynValue> = vec![
        dyn_value(vec![dyn_value(1i64), dyn_value("a")]),
        dyn_value(vec![dyn_value(2i64), dyn_value("b")]),
    ];
    let wire = r.to_wire(&v).unwrap();
    let back = r.from_wire::<Vec<DynValue>>(&wire).unwrap();
    assert_eq!(back.len(), 2);
    let first = back[0].downcast_ref::<Vec<DynValue>>().unwrap();
    assert_eq!(first[0].downcast_ref::<String>().unwrap(), "1");
    assert_eq!(first[1].downcast_ref::<String>().unwrap(), "a");
    assert_eq!(r.to_wire(&back).unwrap(), wire);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_i64_roundtrip(v in any::<i64>()) {
        let r = ConverterRegistry::new();
        let wire = r.convert_value(&v).unwrap();
        prop_assert_eq!(r.from_wire::<i64>(&wire).unwrap(), v);
    }

    #[test]
    fn prop_finite_f64_roundtrip(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let r = ConverterRegistry::new();
        let wire = r.convert_value(&v).unwrap();
        prop_assert!(!wire.contains('e') && !wire.contains('E'));
        prop_assert_eq!(r.from_wire::<f64>(&wire).unwrap(), v);
    }

    #[test]
    fn prop_string_roundtrip(v in ".*") {
        let r = ConverterRegistry::new();
        prop_assume!(v != r.config().null_sentinel);
        let wire = r.convert_value(&v).unwrap();
        prop_assert_eq!(r.from_wire::<String>(&wire).unwrap(), v);
    }

    #[test]
    fn prop_string_list_roundtrip(v in proptest::collection::vec(".*", 0..8)) {
        let r = ConverterRegistry::new();
        prop_assume!(v.iter().all(|s| *s != r.config().null_sentinel));
        let wire = r.to_wire(&v).unwrap();
        prop_assert_eq!(r.from_wire::<Vec<String>>(&wire).unwrap(), v);
    }

    #[test]
    fn prop_date_roundtrip(days in 0i64..200_000) {
        let r = ConverterRegistry::new();
        let v = ymd(1900, 1, 1) + chrono::Duration::days(days);
        let wire = r.convert_value(&v).unwrap();
        prop_assert_eq!(r.from_wire::<NaiveDate>(&wire).unwrap(), v);
    }
}
