//! Profiling markers: the declarative intent to profile a type or a single method.
//!
//! A [`Marker`] carries a free-form message and four boolean toggles that mute
//! individual fields of the emitted record. All toggles default to `true`. Markers
//! are attached to a type ("profile every method") or to a method ("profile just
//! this one, with these options") through the global registry in [`crate::selector`],
//! either with explicit calls at setup or declaratively via the
//! [`profile_type!`](crate::profile_type) / [`profile_method!`](crate::profile_method)
//! macros. A method-scoped marker strictly overrides a type-scoped one.

use serde_derive::Deserialize;

/// Declarative profiling options for a type or method. Read-only at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Free-form message displayed in the log output.
    pub message: String,
    /// Whether the return value shows up in the output.
    pub log_result: bool,
    /// Whether parameter types and values show up in the output.
    pub log_params: bool,
    /// Whether the elapsed time shows up in the output.
    pub log_time: bool,
    /// Whether the resolved call site shows up in the output.
    pub log_caller_info: bool,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            message: String::new(),
            log_result: true,
            log_params: true,
            log_time: true,
            log_caller_info: true,
        }
    }
}

impl Marker {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn log_result(mut self, on: bool) -> Self {
        self.log_result = on;
        self
    }

    #[must_use]
    pub fn log_params(mut self, on: bool) -> Self {
        self.log_params = on;
        self
    }

    #[must_use]
    pub fn log_time(mut self, on: bool) -> Self {
        self.log_time = on;
        self
    }

    #[must_use]
    pub fn log_caller_info(mut self, on: bool) -> Self {
        self.log_caller_info = on;
        self
    }

    /// True when every output toggle is muted. The interceptor then emits a single
    /// short notice line instead of a full record.
    pub fn all_toggles_off(&self) -> bool {
        !(self.log_result || self.log_params || self.log_time || self.log_caller_info)
    }
}

/// Where the marker in force for an invocation was attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerScope {
    Type,
    Method,
}

/// The marker actually in force for one invocation, resolved by the
/// method-over-type precedence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveMarker {
    pub marker: Marker,
    pub scope: MarkerScope,
}

/// Output layout for rendered records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LogStyle {
    /// Bare prefixed lines, no framing or alignment.
    #[default]
    #[serde(rename = "SIMPLE")]
    Simple,
    /// Framed fixed-width table with word wrapping and truncation.
    #[serde(rename = "PRETTIER")]
    Prettier,
}
