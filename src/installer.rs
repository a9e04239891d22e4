//! Installers that sweep a [`ServiceRegistry`] and decorate qualifying
//! services in place.
//!
//! Two strategies exist with identical observable results. The
//! [`AdvisorInstaller`] asks the [`Selector`] whether a type qualifies, the
//! same check the interceptor uses per call. The [`LegacyInstaller`] inspects
//! the marker registry directly, mirroring the pre-advisor wiring. Both
//! exclude the profiling infrastructure itself so it can never be wrapped,
//! and both leave a service untouched (with a warning) when wrapping fails.

use std::sync::Arc;

use crate::config::{InstallMode, ProfilingConfig};
use crate::interceptor::Interceptor;
use crate::registry::ServiceRegistry;
use crate::selector::{markers, Selector};
use crate::sink::Sink;

/// Installation strategy over a registry.
pub trait Install {
    fn install(&self, registry: &mut ServiceRegistry);
}

/// Picks the installer for the configured mode.
#[must_use]
pub fn installer_for(config: &ProfilingConfig) -> Box<dyn Install> {
    match config.mode {
        InstallMode::Aop => Box::new(AdvisorInstaller::new(config.clone())),
        InstallMode::Legacy => Box::new(LegacyInstaller::new(config.clone())),
    }
}

/// Selector-driven installer.
pub struct AdvisorInstaller {
    config: ProfilingConfig,
    sink: Option<Arc<dyn Sink>>,
}

impl AdvisorInstaller {
    #[must_use]
    pub fn new(config: ProfilingConfig) -> Self {
        register_infrastructure_exclusions();
        Self { config, sink: None }
    }

    /// Routes decorator output to `sink` instead of the default logger.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }
}

impl Install for AdvisorInstaller {
    fn install(&self, registry: &mut ServiceRegistry) {
        if !self.config.enabled {
            return;
        }
        for index in 0..registry.entries.len() {
            let entry = &registry.entries[index];
            if entry.decorated || !Selector::type_qualifies(entry.type_name) {
                continue;
            }
            decorate_in_place(registry, index, &self.config, self.sink.as_ref());
        }
    }
}

/// Marker-inspection installer kept for parity with older wiring.
pub struct LegacyInstaller {
    config: ProfilingConfig,
    sink: Option<Arc<dyn Sink>>,
}

impl LegacyInstaller {
    #[must_use]
    pub fn new(config: ProfilingConfig) -> Self {
        register_infrastructure_exclusions();
        Self { config, sink: None }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }
}

impl Install for LegacyInstaller {
    fn install(&self, registry: &mut ServiceRegistry) {
        if !self.config.enabled {
            return;
        }
        for index in 0..registry.entries.len() {
            let entry = &registry.entries[index];
            if entry.decorated {
                continue;
            }
            let qualifies = {
                let markers = markers();
                !markers.is_excluded(entry.type_name) && markers.has_any_marker(entry.type_name)
            };
            if !qualifies {
                continue;
            }
            decorate_in_place(registry, index, &self.config, self.sink.as_ref());
        }
    }
}

/// The profiling machinery must never profile itself.
fn register_infrastructure_exclusions() {
    let mut markers = markers();
    markers.exclude(std::any::type_name::<AdvisorInstaller>());
    markers.exclude(std::any::type_name::<LegacyInstaller>());
    markers.exclude(std::any::type_name::<Interceptor>());
}

fn decorate_in_place(
    registry: &mut ServiceRegistry,
    index: usize,
    config: &ProfilingConfig,
    sink: Option<&Arc<dyn Sink>>,
) {
    let entry = &mut registry.entries[index];
    let mut interceptor = Interceptor::new(entry.type_name, config.log_type);
    if let Some(sink) = sink {
        interceptor = interceptor.with_sink(Arc::clone(sink));
    }
    let object = std::mem::replace(&mut entry.object, Box::new(()));
    match (entry.decorate)(object, interceptor) {
        Ok(decorated) => {
            entry.object = decorated;
            entry.decorated = true;
        }
        Err((original, error)) => {
            log::warn!(
                "Cannot install profiling decorator for {}: {error}. \
                 Profiling won't work, keeping original object",
                entry.name
            );
            entry.object = original;
        }
    }
}
