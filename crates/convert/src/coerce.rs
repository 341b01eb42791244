//! Argument coercion
//!
//! The protocol layer hands fixture entry points their arguments as wire
//! strings. [`convert_arg`] wraps a callable so that selected arguments are
//! parsed into a target type before the callable runs; [`convert_result`]
//! wraps one so its typed return value leaves as a wire string.
//!
//! ```ignore
//! let new_query = convert_arg::<NaiveDate>(&registry)
//!     .wrap(|args: Arguments| -> Result<EmployeesHiredBefore> {
//!         let before = args.get::<NaiveDate>(0).copied().unwrap_or_default();
//!         Ok(EmployeesHiredBefore::new(before))
//!     });
//!
//! let fixture = new_query(Arguments::from_wire(["1974-10-10"]))?;
//! ```
//!
//! ## Contract
//!
//! - A selected argument holding a wire string (`String` or `&'static str`) is
//!   replaced by the parsed value.
//! - A selected argument already of the target type, or of any other
//!   non-string type, passes through unchanged.
//! - A selected parameter that was not supplied is left absent.
//! - Malformed input returns the `ConversionError` without invoking the
//!   wrapped callable.
//! - With no parameters selected, every positional and named argument is
//!   coerced.
//! - Wrapping an already wrapped callable composes: each layer coerces its
//!   own parameters once.

use crate::converter::Converter;
use crate::registry::ConverterRegistry;
use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;
use waferslim_core::{dyn_value, DynValue, Error, Result, TypeKey};

// ============================================================================
// Arguments
// ============================================================================

/// Arguments passed to a fixture callable
#[derive(Default)]
pub struct Arguments {
    positional: Vec<DynValue>,
    named: BTreeMap<String, DynValue>,
}

impl Arguments {
    /// No arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional arguments straight off the wire
    pub fn from_wire<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arguments {
            positional: values
                .into_iter()
                .map(|s| -> DynValue { Box::new(Into::<String>::into(s)) })
                .collect(),
            named: BTreeMap::new(),
        }
    }

    /// Append a positional argument
    pub fn arg<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.positional.push(dyn_value(value));
        self
    }

    /// Add a named argument
    pub fn named<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.named.insert(name.into(), dyn_value(value));
        self
    }

    /// Number of positional arguments
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// Whether there are no positional or named arguments
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Positional argument `index` as a `T`
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.positional.get(index)?.downcast_ref::<T>()
    }

    /// Named argument as a `T`
    pub fn get_named<T: Any>(&self, name: &str) -> Option<&T> {
        self.named.get(name)?.downcast_ref::<T>()
    }

    /// Take positional argument `index` as a `T`, leaving `()` in its place
    ///
    /// # Errors
    ///
    /// Returns `Error::Conversion` if the argument is missing or holds
    /// another type; the argument is left untouched in that case.
    pub fn take<T: Any>(&mut self, index: usize) -> Result<T> {
        let type_name = TypeKey::of::<T>().short_name();
        let slot = self.positional.get_mut(index).ok_or_else(|| {
            Error::conversion(type_name.clone(), "", format!("no argument at position {}", index))
        })?;
        if !slot.is::<T>() {
            return Err(Error::conversion(
                type_name,
                "",
                format!("argument {} has another type", index),
            ));
        }
        let empty: DynValue = Box::new(());
        let value = std::mem::replace(slot, empty);
        value
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| Error::conversion(TypeKey::of::<T>().short_name(), "", "downcast failed"))
    }

    /// Positional arguments in order
    pub fn positional(&self) -> &[DynValue] {
        &self.positional
    }

    /// Named arguments by name
    pub fn named_args(&self) -> &BTreeMap<String, DynValue> {
        &self.named
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("positional", &self.positional.len())
            .field("named", &self.named.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A parameter selected for coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Positional parameter by index
    Position(usize),
    /// Named parameter
    Named(String),
}

impl From<usize> for Param {
    fn from(index: usize) -> Self {
        Param::Position(index)
    }
}

impl From<&str> for Param {
    fn from(name: &str) -> Self {
        Param::Named(name.to_string())
    }
}

impl From<String> for Param {
    fn from(name: String) -> Self {
        Param::Named(name)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Position(i) => write!(f, "#{}", i),
            Param::Named(name) => f.write_str(name),
        }
    }
}

// ============================================================================
// convert_arg
// ============================================================================

/// Coercion of selected arguments to `T`
pub struct ConvertArg<T> {
    registry: ConverterRegistry,
    params: Vec<Param>,
    using: Option<Arc<dyn Converter>>,
    _target: PhantomData<fn() -> T>,
}

/// Start a coercion of arguments to `T` through `registry`
pub fn convert_arg<T: Any + Send + Sync>(registry: &ConverterRegistry) -> ConvertArg<T> {
    ConvertArg {
        registry: registry.clone(),
        params: Vec::new(),
        using: None,
        _target: PhantomData,
    }
}

impl<T: Any + Send + Sync> ConvertArg<T> {
    /// Select a positional parameter
    pub fn param(mut self, index: usize) -> Self {
        self.params.push(Param::Position(index));
        self
    }

    /// Select several positional parameters
    pub fn params(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.params.extend(indices.into_iter().map(Param::Position));
        self
    }

    /// Select a named parameter
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param::Named(name.into()));
        self
    }

    /// Select a parameter of either kind
    pub fn select(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Parse with this converter instead of the one registered for `T`
    pub fn using<C: Converter + 'static>(mut self, converter: C) -> Self {
        self.using = Some(Arc::new(converter));
        self
    }

    /// Coerce the selected arguments in place
    ///
    /// Stops at the first malformed argument. Arguments coerced before it
    /// keep their new values.
    pub fn apply(&self, args: &mut Arguments) -> Result<()> {
        if self.params.is_empty() {
            for (index, slot) in args.positional.iter_mut().enumerate() {
                self.coerce_slot(&Param::Position(index), slot)?;
            }
            for (name, slot) in args.named.iter_mut() {
                self.coerce_slot(&Param::Named(name.clone()), slot)?;
            }
            return Ok(());
        }
        for param in &self.params {
            let slot = match param {
                Param::Position(index) => args.positional.get_mut(*index),
                Param::Named(name) => args.named.get_mut(name),
            };
            if let Some(slot) = slot {
                self.coerce_slot(param, slot)?;
            }
        }
        Ok(())
    }

    fn coerce_slot(&self, param: &Param, slot: &mut DynValue) -> Result<()> {
        if (**slot).type_id() == TypeId::of::<T>() {
            return Ok(());
        }
        let parsed = match wire_text(slot) {
            Some(text) => self.parse(text),
            None => return Ok(()),
        };
        match parsed {
            Ok(value) => {
                *slot = value;
                Ok(())
            }
            Err(err) => {
                warn!(
                    param = %param,
                    target = TypeKey::of::<T>().name(),
                    error = %err,
                    "Argument coercion failed"
                );
                Err(err)
            }
        }
    }

    fn parse(&self, text: &str) -> Result<DynValue> {
        match &self.using {
            None => Ok(Box::new(self.registry.from_wire::<T>(text)?)),
            Some(converter) => {
                let value = converter.from_wire(text, &self.registry)?;
                if (*value).type_id() == TypeId::of::<T>() {
                    Ok(value)
                } else {
                    Err(Error::conversion(
                        TypeKey::of::<T>().short_name(),
                        text,
                        format!("{} produces another type", converter.name()),
                    ))
                }
            }
        }
    }

    /// Wrap a callable so the selected arguments are coerced before it runs
    pub fn wrap<F, R, E>(self, f: F) -> impl Fn(Arguments) -> std::result::Result<R, E>
    where
        F: Fn(Arguments) -> std::result::Result<R, E>,
        E: From<Error>,
    {
        move |mut args: Arguments| {
            self.apply(&mut args)?;
            f(args)
        }
    }
}

fn wire_text(slot: &DynValue) -> Option<&str> {
    if let Some(s) = slot.downcast_ref::<String>() {
        Some(s.as_str())
    } else {
        slot.downcast_ref::<&'static str>().copied()
    }
}

// ============================================================================
// convert_result
// ============================================================================

/// Conversion of a callable's `T` result to its wire string
pub struct ConvertResult<T> {
    registry: ConverterRegistry,
    using: Option<Arc<dyn Converter>>,
    _result: PhantomData<fn() -> T>,
}

/// Start a result conversion for callables returning `T`
pub fn convert_result<T: Any>(registry: &ConverterRegistry) -> ConvertResult<T> {
    ConvertResult {
        registry: registry.clone(),
        using: None,
        _result: PhantomData,
    }
}

impl<T: Any> ConvertResult<T> {
    /// Serialize with this converter instead of dispatching on the value
    pub fn using<C: Converter + 'static>(mut self, converter: C) -> Self {
        self.using = Some(Arc::new(converter));
        self
    }

    /// Serialize one result
    pub fn convert(&self, value: &T) -> Result<String> {
        match &self.using {
            Some(converter) => converter.to_wire(value, &self.registry),
            None => self.registry.to_wire(value),
        }
    }

    /// Wrap a callable so its result leaves as a wire string
    pub fn wrap<F, E>(self, f: F) -> impl Fn(Arguments) -> std::result::Result<String, E>
    where
        F: Fn(Arguments) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        move |args: Arguments| {
            let value = f(args)?;
            Ok(self.convert(&value)?)
        }
    }
}
