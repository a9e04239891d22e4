//! The service registry the installers operate on.
//!
//! Services are held type-erased as `Box<dyn Any>` so one registry can carry
//! heterogeneous application objects. Registering a service monomorphizes a
//! decorate hook for its concrete type; installation later drives that hook
//! without knowing the type. Wrapping replaces the stored object with its
//! decorated form, and a failed wrap hands the original back untouched.

use std::any::Any;

use crate::error::ProfilingError;
use crate::interceptor::Interceptor;

/// Implemented by service types that have a generated profiling decorator.
/// `decorate` consumes the service; on failure the original comes back in the
/// error so the registry can keep serving it undecorated.
pub trait Decorate: Any + Sized {
    type Decorated: Any;

    fn decorate(self, interceptor: Interceptor) -> Result<Self::Decorated, (Self, ProfilingError)>;
}

/// Type-erased wrapping hook, monomorphized per service type at registration.
/// Returns the original box on failure.
pub(crate) type DecorateFn =
    fn(Box<dyn Any>, Interceptor) -> Result<Box<dyn Any>, (Box<dyn Any>, ProfilingError)>;

pub(crate) struct ServiceEntry {
    pub(crate) name: String,
    pub(crate) type_name: &'static str,
    pub(crate) object: Box<dyn Any>,
    pub(crate) decorate: DecorateFn,
    pub(crate) decorated: bool,
}

/// Holds the application's services by name.
#[derive(Default)]
pub struct ServiceRegistry {
    pub(crate) entries: Vec<ServiceEntry>,
}

impl ServiceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service under `name`. Later registrations with the same
    /// name coexist; lookup returns the first match.
    pub fn register<S: Decorate>(&mut self, name: impl Into<String>, service: S) {
        self.entries.push(ServiceEntry {
            name: name.into(),
            type_name: std::any::type_name::<S>(),
            object: Box::new(service),
            decorate: decorate_entry::<S>,
            decorated: false,
        });
    }

    /// Looks up the service registered under `name`, downcast to `T`. For a
    /// decorated entry `T` is the decorator type, not the original service.
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| entry.object.downcast_ref::<T>())
    }

    /// Whether the named service currently carries a profiling decorator.
    pub fn is_decorated(&self, name: &str) -> bool {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .is_some_and(|entry| entry.decorated)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decorate_entry<S: Decorate>(
    object: Box<dyn Any>,
    interceptor: Interceptor,
) -> Result<Box<dyn Any>, (Box<dyn Any>, ProfilingError)> {
    let service = match object.downcast::<S>() {
        Ok(service) => *service,
        Err(object) => {
            return Err((
                object,
                ProfilingError::WrappingError(format!(
                    "registered object is not a {}",
                    std::any::type_name::<S>()
                )),
            ));
        }
    };
    match service.decorate(interceptor) {
        Ok(decorated) => Ok(Box::new(decorated)),
        Err((service, error)) => Err((Box::new(service), error)),
    }
}
