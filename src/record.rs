//! The per-call record handed to the renderer.

use std::any::Any;
use std::fmt;

use crate::callsite::CallSite;
use crate::capture::CapturedValue;
use crate::marker::{EffectiveMarker, LogStyle};
use crate::method::Argument;
use crate::render::simple_type_name;

/// Abnormal termination of the wrapped call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thrown {
    /// Fully-qualified error type name; the renderer prints the simple name.
    pub type_name: &'static str,
    pub message: Option<String>,
}

impl Thrown {
    pub fn from_error<E: fmt::Display>(error: &E) -> Self {
        Self {
            type_name: std::any::type_name::<E>(),
            message: Some(error.to_string()),
        }
    }

    /// Captures a panic payload. Panics carry a `&str` or `String` message in
    /// practice; anything else is recorded without one.
    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned());
        Self {
            type_name: "panic",
            message,
        }
    }
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", simple_type_name(self.type_name))?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// Everything the renderer needs for one profiled invocation. Short-lived:
/// built after the wrapped call finishes, rendered, then dropped.
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    /// `path::to::TargetType::method`.
    pub method_qualified: String,
    pub arguments: Vec<Argument>,
    /// Captured return value; absent when the call terminated abnormally.
    pub result: Option<CapturedValue>,
    /// Present iff the call terminated abnormally (the error is re-raised to
    /// the caller after logging).
    pub thrown: Option<Thrown>,
    /// Elapsed wall time from a monotonic clock; never negative.
    pub elapsed_nanos: u64,
    pub caller: CallSite,
    pub style: LogStyle,
    pub marker: EffectiveMarker,
}
