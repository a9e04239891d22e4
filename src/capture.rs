//! Captured argument and result values.
//!
//! The renderer never sees live user values. Each argument and result is snapshotted
//! into a [`CapturedValue`] at interception time: a small sum type distinguishing
//! ordered collections, key-value mappings, arrays and everything else, with an
//! opaque fallback for values that cannot be rendered at all.
//!
//! User types participate through the [`Capture`] trait. Impls are provided for the
//! primitive types, strings, `Option`, `Vec`, slices, arrays and the standard maps;
//! domain types usually derive theirs from `Debug` with
//! [`impl_capture_debug!`](crate::impl_capture_debug). Registered
//! [`ValueFormatter`] hooks are tried before the `Debug` fallback so users can teach
//! the printer about types whose `Debug` form is unsuitable.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{LazyLock, Mutex};

/// Hook tried before the built-in capture rules. Return `Some(text)` to take over
/// rendering of a value, `None` to pass.
pub type ValueFormatter = fn(&dyn Any) -> Option<String>;

static FORMATTERS: LazyLock<Mutex<Vec<ValueFormatter>>> = LazyLock::new(Mutex::default);

/// Registers a formatter hook. Hooks are consulted in registration order.
pub fn add_value_formatter(formatter: ValueFormatter) {
    FORMATTERS
        .lock()
        .expect("Mutex poisoned")
        .push(formatter);
}

fn apply_formatters(value: &dyn Any) -> Option<String> {
    // Hooks run outside the lock: a panicking hook must not poison the registry.
    let formatters = FORMATTERS.lock().expect("Mutex poisoned").clone();
    formatters.iter().find_map(|formatter| formatter(value))
}

/// Runs a rendering closure, containing any panic from a misbehaving `Debug`
/// or formatter impl. Capture happens in the decorator before delegation, so
/// a panic escaping here would reach the wrapped call's caller.
fn contained(render: impl FnOnce() -> String) -> Option<String> {
    panic::catch_unwind(AssertUnwindSafe(render)).ok()
}

/// Snapshot of a single argument or result value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedValue {
    /// Absent value: `None`, or a unit return.
    Null,
    /// Ordered collection with its element count and rendered contents.
    Collection { len: usize, repr: String },
    /// Key-value mapping with its entry count and rendered contents.
    Map { len: usize, repr: String },
    /// Array or slice with its element count and rendered contents.
    Array { len: usize, repr: String },
    /// Anything else, rendered through a formatter hook or `Debug`/`Display`.
    Other { repr: String },
    /// A value that could not be rendered: type name plus address.
    Opaque {
        type_name: &'static str,
        address: usize,
    },
}

impl CapturedValue {
    pub fn other(repr: impl Into<String>) -> Self {
        CapturedValue::Other { repr: repr.into() }
    }

    /// Marks a value as unrenderable. The renderer prints `TypeSimpleName@hex`.
    pub fn opaque<T: ?Sized>(value: &T) -> Self {
        CapturedValue::Opaque {
            type_name: std::any::type_name::<T>(),
            address: std::ptr::from_ref(value).cast::<u8>() as usize,
        }
    }
}

/// Converts a live value into its [`CapturedValue`] snapshot.
pub trait Capture {
    fn capture(&self) -> CapturedValue;
}

/// Captures any `Debug` value, consulting the formatter hooks first. A value
/// whose rendering panics is recorded as opaque instead.
pub fn capture_debug<T: Any + Debug>(value: &T) -> CapturedValue {
    match contained(|| apply_formatters(value).unwrap_or_else(|| format!("{value:?}"))) {
        Some(repr) => CapturedValue::Other { repr },
        None => CapturedValue::opaque(value),
    }
}

macro_rules! impl_capture_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Capture for $ty {
                fn capture(&self) -> CapturedValue {
                    CapturedValue::Other {
                        repr: self.to_string(),
                    }
                }
            }
        )*
    };
}

impl_capture_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
);

impl Capture for str {
    fn capture(&self) -> CapturedValue {
        CapturedValue::Other {
            repr: self.to_string(),
        }
    }
}

impl<T: Capture + ?Sized> Capture for &T {
    fn capture(&self) -> CapturedValue {
        (**self).capture()
    }
}

impl Capture for () {
    fn capture(&self) -> CapturedValue {
        CapturedValue::Null
    }
}

impl<T: Capture> Capture for Option<T> {
    fn capture(&self) -> CapturedValue {
        match self {
            None => CapturedValue::Null,
            Some(value) => value.capture(),
        }
    }
}

impl<T: Debug> Capture for Vec<T> {
    fn capture(&self) -> CapturedValue {
        match contained(|| format!("{self:?}")) {
            Some(repr) => CapturedValue::Collection {
                len: self.len(),
                repr,
            },
            None => CapturedValue::opaque(self),
        }
    }
}

impl<T: Debug> Capture for [T] {
    fn capture(&self) -> CapturedValue {
        match contained(|| format!("{self:?}")) {
            Some(repr) => CapturedValue::Array {
                len: self.len(),
                repr,
            },
            None => CapturedValue::opaque(self),
        }
    }
}

impl<T: Debug, const N: usize> Capture for [T; N] {
    fn capture(&self) -> CapturedValue {
        match contained(|| format!("{self:?}")) {
            Some(repr) => CapturedValue::Array { len: N, repr },
            None => CapturedValue::opaque(self),
        }
    }
}

impl<K: Debug, V: Debug, S> Capture for HashMap<K, V, S> {
    fn capture(&self) -> CapturedValue {
        match contained(|| format!("{self:?}")) {
            Some(repr) => CapturedValue::Map {
                len: self.len(),
                repr,
            },
            None => CapturedValue::opaque(self),
        }
    }
}

impl<K: Debug, V: Debug> Capture for BTreeMap<K, V> {
    fn capture(&self) -> CapturedValue {
        match contained(|| format!("{self:?}")) {
            Some(repr) => CapturedValue::Map {
                len: self.len(),
                repr,
            },
            None => CapturedValue::opaque(self),
        }
    }
}
