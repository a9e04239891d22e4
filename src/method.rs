//! Method descriptors and per-call argument capture.
//!
//! A [`MethodDescriptor`] identifies a method on a target type by name and
//! parameter type list; a [`MethodCall`] is one invocation of it, carrying the
//! captured arguments. Both are built by the generated decorators out of
//! `stringify!` and `std::any::type_name`, so every name is `'static`.

use crate::capture::CapturedValue;

/// Identifies one method on a target type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub name: &'static str,
    /// Fully-qualified parameter type names, in declaration order.
    pub parameter_types: Vec<&'static str>,
}

impl MethodDescriptor {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            parameter_types: Vec::new(),
        }
    }
}

/// One captured argument: its declared type, its parameter name when known, and
/// its snapshotted value.
#[derive(Debug, Clone)]
pub struct Argument {
    pub type_name: &'static str,
    pub name: Option<&'static str>,
    pub value: CapturedValue,
}

/// A single invocation about to be intercepted.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub target_type: &'static str,
    pub method: MethodDescriptor,
    pub arguments: Vec<Argument>,
}

impl MethodCall {
    pub fn new(target_type: &'static str, method_name: &'static str) -> Self {
        Self {
            target_type,
            method: MethodDescriptor::new(method_name),
            arguments: Vec::new(),
        }
    }

    /// Appends one argument, extending the descriptor's parameter type list to match.
    #[must_use]
    pub fn with_argument(
        mut self,
        name: &'static str,
        type_name: &'static str,
        value: CapturedValue,
    ) -> Self {
        self.method.parameter_types.push(type_name);
        self.arguments.push(Argument {
            type_name,
            name: Some(name),
            value,
        });
        self
    }

    /// `path::to::TargetType::method`.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.target_type, self.method.name)
    }
}
