//! Marker registration and the selection predicate.
//!
//! Markers live in a process-wide [`MarkerRegistry`]: type-scoped markers,
//! method-scoped markers, and the infrastructure exclusion set the installer
//! feeds in so the profiler never wraps its own machinery. [`Selector`] is the
//! pure predicate over that registry: given a target type and method name it
//! decides whether the invocation is profiled and resolves the marker in force,
//! with a method-scoped marker strictly winning over a type-scoped one.

use std::collections::{HashMap, HashSet};
use std::sync::{LazyLock, Mutex, MutexGuard};

use crate::marker::{EffectiveMarker, Marker, MarkerScope};

/// A global instance of the marker registry.
static MARKER_REGISTRY: LazyLock<Mutex<MarkerRegistry>> = LazyLock::new(Mutex::default);

/// Acquires an exclusive lock on the global marker registry, blocking until
/// it's available.
pub fn markers() -> MutexGuard<'static, MarkerRegistry> {
    MARKER_REGISTRY.lock().expect("Mutex poisoned")
}

/// Holds type- and method-scoped markers plus the infrastructure exclusion set.
#[derive(Default)]
pub struct MarkerRegistry {
    type_markers: HashMap<&'static str, Marker>,
    method_markers: HashMap<(&'static str, &'static str), Marker>,
    exclusions: HashSet<&'static str>,
}

impl MarkerRegistry {
    /// Attaches a marker at type scope: every method of the type qualifies.
    pub fn attach_type(&mut self, type_name: &'static str, marker: Marker) {
        self.type_markers.insert(type_name, marker);
    }

    /// Attaches a marker to a single method, overriding any type-scoped marker
    /// for that method.
    pub fn attach_method(
        &mut self,
        type_name: &'static str,
        method_name: &'static str,
        marker: Marker,
    ) {
        self.method_markers.insert((type_name, method_name), marker);
    }

    /// Adds a type to the exclusion set. Excluded types never qualify.
    pub fn exclude(&mut self, type_name: &'static str) {
        self.exclusions.insert(type_name);
    }

    pub fn is_excluded(&self, type_name: &str) -> bool {
        self.exclusions.contains(type_name)
    }

    /// Whether the type carries a type-scoped marker or any method-scoped one.
    /// This is the installer's eligibility check.
    pub fn has_any_marker(&self, type_name: &str) -> bool {
        self.type_markers.contains_key(type_name)
            || self
                .method_markers
                .keys()
                .any(|(marked_type, _)| *marked_type == type_name)
    }

    fn type_marker(&self, type_name: &str) -> Option<&Marker> {
        self.type_markers.get(type_name)
    }

    fn method_marker(&self, type_name: &'static str, method_name: &'static str) -> Option<&Marker> {
        self.method_markers.get(&(type_name, method_name))
    }
}

/// The pure selection predicate over the global registry.
pub struct Selector;

impl Selector {
    /// Resolves the marker in force for `(type, method)`, or `None` when the
    /// invocation must not be profiled. A method-scoped marker strictly wins;
    /// its fields are taken verbatim, with no merging.
    pub fn qualifies(
        type_name: &'static str,
        method_name: &'static str,
    ) -> Option<EffectiveMarker> {
        let registry = markers();
        if registry.is_excluded(type_name) {
            return None;
        }
        if let Some(marker) = registry.method_marker(type_name, method_name) {
            return Some(EffectiveMarker {
                marker: marker.clone(),
                scope: MarkerScope::Method,
            });
        }
        registry.type_marker(type_name).map(|marker| EffectiveMarker {
            marker: marker.clone(),
            scope: MarkerScope::Type,
        })
    }

    /// Whether the installer should wrap objects of this type at all.
    pub fn type_qualifies(type_name: &'static str) -> bool {
        let registry = markers();
        !registry.is_excluded(type_name) && registry.has_any_marker(type_name)
    }
}
