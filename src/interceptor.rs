//! The invocation interceptor.
//!
//! An [`Interceptor`] is bound to one target instance by its decorator. For
//! every forwarded call it consults the [`Selector`]: with no marker in force
//! it delegates directly, with all toggles muted it emits a single short
//! notice, and otherwise it times the call on a monotonic clock, captures the
//! outcome, builds a [`ProfileRecord`] and hands the rendered text to the sink.
//!
//! The wrapped call's observable behavior is never changed: it runs exactly
//! once, its return value is passed through untouched, an `Err` is logged and
//! returned unchanged, and a panic is logged and resumed. Failures inside the
//! instrumentation itself are swallowed and reported through [`Sink::error`];
//! they never reach the caller.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::callsite;
use crate::capture::CapturedValue;
use crate::marker::{EffectiveMarker, LogStyle};
use crate::method::MethodCall;
use crate::record::{ProfileRecord, Thrown};
use crate::render;
use crate::selector::Selector;
use crate::sink::{LogSink, Sink};

/// Wrapper state bound to one target instance. Holds only immutable
/// references, so sharing across threads is safe; each intercepted call runs
/// entirely on the caller's thread.
#[derive(Clone)]
pub struct Interceptor {
    target_type: &'static str,
    /// Generated decorator type name, filtered out of call-site resolution.
    decorator_type: Option<&'static str>,
    default_style: LogStyle,
    sink: Arc<dyn Sink>,
}

impl Interceptor {
    pub fn new(target_type: &'static str, default_style: LogStyle) -> Self {
        Self {
            target_type,
            decorator_type: None,
            default_style,
            sink: Arc::new(LogSink),
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn with_decorator_type(mut self, decorator_type: &'static str) -> Self {
        self.decorator_type = Some(decorator_type);
        self
    }

    pub fn target_type(&self) -> &'static str {
        self.target_type
    }

    /// Profiles an infallible call.
    ///
    /// `capture_result` snapshots the return value for every profiled call;
    /// the marker's `log_result` toggle controls rendering, not capture. A
    /// panic unwinding out of `call_target` is recorded as abnormal
    /// termination and resumed unchanged.
    pub fn invoke<R>(
        &self,
        call: MethodCall,
        capture_result: impl FnOnce(&R) -> CapturedValue,
        call_target: impl FnOnce() -> R,
    ) -> R {
        let Some(effective) = Selector::qualifies(self.target_type, call.method.name) else {
            return call_target();
        };
        if effective.marker.all_toggles_off() {
            self.emit_notice(&effective);
            return call_target();
        }

        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(call_target));
        let elapsed_nanos = elapsed_nanos(start);

        match outcome {
            Ok(value) => {
                let result = capture_result(&value);
                self.emit(&call, Some(result), None, elapsed_nanos, &effective);
                value
            }
            Err(payload) => {
                let thrown = Thrown::from_panic(payload.as_ref());
                self.emit(&call, None, Some(thrown), elapsed_nanos, &effective);
                panic::resume_unwind(payload)
            }
        }
    }

    /// Profiles a fallible call. An `Err` outcome is recorded as abnormal
    /// termination and handed back to the caller unchanged, after logging; a
    /// panic is recorded the same way and resumed.
    pub fn invoke_fallible<T, E: std::fmt::Display>(
        &self,
        call: MethodCall,
        capture_result: impl FnOnce(&T) -> CapturedValue,
        call_target: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let Some(effective) = Selector::qualifies(self.target_type, call.method.name) else {
            return call_target();
        };
        if effective.marker.all_toggles_off() {
            self.emit_notice(&effective);
            return call_target();
        }

        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(call_target));
        let elapsed_nanos = elapsed_nanos(start);

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(payload) => {
                let thrown = Thrown::from_panic(payload.as_ref());
                self.emit(&call, None, Some(thrown), elapsed_nanos, &effective);
                panic::resume_unwind(payload)
            }
        };

        match &outcome {
            Ok(value) => {
                let result = capture_result(value);
                self.emit(&call, Some(result), None, elapsed_nanos, &effective);
            }
            Err(error) => {
                let thrown = Thrown::from_error(error);
                self.emit(&call, None, Some(thrown), elapsed_nanos, &effective);
            }
        }
        outcome
    }

    fn emit_notice(&self, effective: &EffectiveMarker) {
        self.sink.info(&format!(
            "Profiling method intercepted with message: {}",
            effective.marker.message
        ));
    }

    /// Builds, renders and sinks the record. Instrumentation failures must
    /// never replace the wrapped call's outcome, so everything here runs under
    /// `catch_unwind`.
    fn emit(
        &self,
        call: &MethodCall,
        result: Option<CapturedValue>,
        thrown: Option<Thrown>,
        elapsed_nanos: u64,
        effective: &EffectiveMarker,
    ) {
        let emitted = panic::catch_unwind(AssertUnwindSafe(|| {
            let caller = callsite::resolve_caller(self.decorator_type);
            let record = ProfileRecord {
                method_qualified: call.qualified_name(),
                arguments: call.arguments.clone(),
                result,
                thrown,
                elapsed_nanos,
                caller,
                style: self.default_style,
                marker: effective.clone(),
            };
            self.sink.info(&render::render(&record));
        }));
        if emitted.is_err() {
            self.sink
                .error("Error logging profiling info", &"rendering or sink write panicked");
        }
    }
}

fn elapsed_nanos(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX)
}
