//! Built-in converters
//!
//! Every registry starts with exactly one converter for each of these types:
//!
//! | Type | Converter | Wire form |
//! |------|-----------|-----------|
//! | `bool` | [`BoolConverter`] | `true` / `false` |
//! | `i8`..`i128`, `isize`, `u8`..`u128`, `usize` | [`IntConverter`] | decimal |
//! | `f32`, `f64` | [`FloatConverter`] | decimal with fraction |
//! | `()` | [`NullConverter`] | null sentinel |
//! | `NaiveDate` | [`DateConverter`] | `%Y-%m-%d` |
//! | `String` | [`StringConverter`] | identity |
//! | `&'static str` | [`StrConverter`] | identity (serialize only) |
//! | `Object` | [`ObjectConverter`] | `<TypeName object>` fallback |
//! | `DynValue` | [`DynValueConverter`] | dispatch on the boxed value |
//!
//! Composite forms are registered for the scalar types above too, so the
//! common shapes serialize recursively without any setup:
//!
//! | Shape | Registered for |
//! |-------|----------------|
//! | `Vec<T>`, `Vec<Vec<T>>`, `Vec<Vec<Vec<T>>>` | every scalar `T` |
//! | `Option<T>`, `Vec<Option<T>>` | every scalar `T` (`None` is the null sentinel) |
//! | `(A, B)`, `Vec<(A, B)>` | every pair of `bool`, `i32`, `i64`, `u32`, `u64`, `usize`, `f64`, `String`, `&'static str`, `NaiveDate`, `DynValue` |
//! | `BTreeMap<String, V>` | `V` = `String`, `DynValue` |
//!
//! Deeper nesting, and pairs or options of fixture types, are registered
//! with `register_list`, `register_pair` and `register_typed(OptionConverter)`.

mod date;
mod object;
mod scalar;
mod text;

pub use date::DateConverter;
pub use object::ObjectConverter;
pub use scalar::{
    BoolConverter, DisplayConverter, FloatConverter, FloatValue, IntConverter, YesNoConverter,
};
pub use text::{NullConverter, StrConverter, StringConverter};

use crate::composite::{
    DynListConverter, DynValueConverter, MapConverter, OptionConverter,
};
use crate::registry::ConverterRegistry;
use chrono::NaiveDate;
use std::any::Any;
use waferslim_core::{DynValue, TypeKey};

macro_rules! register_ints {
    ($registry:expr, $($t:ty),+ $(,)?) => {
        $( $registry.register_typed(IntConverter::<$t>::new()); )+
    };
}

/// `Vec<Vec<T>>` (and by extension `Vec<Vec<Vec<T>>>`) plus `Option<T>`
macro_rules! register_shapes {
    ($registry:expr, $($t:ty),+ $(,)?) => {
        $(
            $registry.register_list::<Vec<$t>>();
            $registry.register_typed(OptionConverter::<$t>::new());
        )+
    };
}

macro_rules! register_pair_keys {
    ($registry:expr, $($a:ty),+ $(,)?) => {
        $( register_pairs_keyed_by::<$a>($registry); )+
    };
}

fn register_pairs_keyed_by<A: Any + Send + Sync>(registry: &ConverterRegistry) {
    registry.register_pair::<A, bool>();
    registry.register_pair::<A, i32>();
    registry.register_pair::<A, i64>();
    registry.register_pair::<A, u32>();
    registry.register_pair::<A, u64>();
    registry.register_pair::<A, usize>();
    registry.register_pair::<A, f64>();
    registry.register_pair::<A, String>();
    registry.register_pair::<A, &'static str>();
    registry.register_pair::<A, NaiveDate>();
    registry.register_pair::<A, DynValue>();
}

/// Insert the built-in converters into a registry
pub(crate) fn register_builtins(registry: &ConverterRegistry) {
    registry.register(TypeKey::object(), ObjectConverter);

    registry.register_typed(BoolConverter);
    register_ints!(registry, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
    registry.register_typed(FloatConverter::<f32>::new());
    registry.register_typed(FloatConverter::<f64>::new());
    registry.register_typed(NullConverter);
    registry.register_typed(DateConverter);
    registry.register_typed(StringConverter);
    registry.register_typed(StrConverter);

    // Untyped lists decode with a depth limit, so this goes in before the
    // plain list converter would be added for Vec<DynValue>.
    registry.register_typed(DynListConverter);
    registry.register_typed(DynValueConverter);

    register_shapes!(
        registry,
        bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
        f32, f64, NaiveDate, String, &'static str,
    );
    registry.register_typed(OptionConverter::<DynValue>::new());

    register_pair_keys!(
        registry,
        bool, i32, i64, u32, u64, usize, f64, String, &'static str, NaiveDate, DynValue,
    );

    registry.register_typed(MapConverter::<String>::new());
    registry.register_typed(MapConverter::<DynValue>::new());
}
