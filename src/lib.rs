//! A method-invocation profiling library
//!
//! Callprof wraps application services in generated decorators that time each
//! call, capture its arguments and outcome, and write a formatted text block
//! to a dedicated logger. The wrapped call's behavior is never changed: it
//! runs exactly once, errors and panics pass through unchanged, and failures
//! inside the instrumentation itself are swallowed rather than surfaced.
//!
//! The pieces fit together like this:
//! * A [`Marker`] attached to a service type (or a single method) opts it into
//!   profiling and selects which record fields are logged. Markers are
//!   attached declaratively with [`profile_type!`] and [`profile_method!`],
//!   which register them before `main` runs.
//! * [`profile_service!`] generates a decorator for a service: an
//!   implementation of the service's API trait that forwards every call
//!   through an [`Interceptor`].
//! * The interceptor consults the [`Selector`] per call, times qualifying
//!   calls, and renders a [`ProfileRecord`] in the configured
//!   [`LogStyle`] (SIMPLE or PRETTIER).
//! * An installer ([`AdvisorInstaller`] or [`LegacyInstaller`], chosen by
//!   [`ProfilingConfig`]) sweeps a [`ServiceRegistry`] and swaps qualifying
//!   services for their decorators in place.
pub mod callsite;
pub mod capture;
pub mod config;
pub mod error;
pub mod installer;
pub mod interceptor;
pub mod log;
pub mod macros;
pub mod marker;
pub mod method;
pub mod record;
pub mod registry;
pub mod render;
pub mod selector;
pub mod sink;

pub use callsite::CallSite;
pub use capture::{add_value_formatter, Capture, CapturedValue, ValueFormatter};
pub use config::{InstallMode, ProfilingConfig};
pub use error::ProfilingError;
pub use installer::{installer_for, AdvisorInstaller, Install, LegacyInstaller};
pub use interceptor::Interceptor;
pub use marker::{EffectiveMarker, LogStyle, Marker, MarkerScope};
pub use method::{Argument, MethodCall, MethodDescriptor};
pub use record::{ProfileRecord, Thrown};
pub use registry::{Decorate, ServiceRegistry};
pub use render::render;
pub use selector::{markers, Selector};
pub use sink::{LogSink, MemorySink, Sink, PROFILING_LOGGER};

pub use crate::log::{debug, error, info, trace, warn};

// Required by the registration macros.
#[doc(hidden)]
pub use ctor;
#[doc(hidden)]
pub use paste;
