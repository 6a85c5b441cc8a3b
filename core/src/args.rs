//! Argument normalization and positional binding.
//!
//! Typed convenience parameters are turned into the wire's string values
//! here. Booleans always become `"0"` or `"1"`; `None` means the argument is
//! left out of the request entirely.

use tracing::debug;

use crate::descriptor::MethodDescriptor;

/// A typed value that can fill an argument slot.
pub trait ArgValue {
    fn into_arg(self) -> Option<String>;
}

impl ArgValue for bool {
    fn into_arg(self) -> Option<String> {
        Some(if self { "1" } else { "0" }.to_string())
    }
}

impl ArgValue for &str {
    fn into_arg(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl ArgValue for String {
    fn into_arg(self) -> Option<String> {
        Some(self)
    }
}

impl ArgValue for &String {
    fn into_arg(self) -> Option<String> {
        Some(self.clone())
    }
}

macro_rules! display_arg {
    ($($ty:ty),*) => {
        $(
            impl ArgValue for $ty {
                fn into_arg(self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

display_arg!(i32, i64, u32, u64, usize, f64);

impl<T: ArgValue> ArgValue for Option<T> {
    fn into_arg(self) -> Option<String> {
        self.and_then(ArgValue::into_arg)
    }
}

/// Named argument values collected by a convenience entry point.
///
/// `bind` lines them up with a descriptor's slots. Names the descriptor does
/// not declare are dropped, which is how an entry point shared between API
/// versions narrows to the version it is running against.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Vec<(&'static str, Option<String>)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl ArgValue) -> Self {
        self.values.push((name, value.into_arg()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Positional values aligned with `descriptor.argument_names()`.
    pub fn bind(&self, descriptor: &MethodDescriptor) -> Vec<Option<String>> {
        for (name, _) in &self.values {
            if !descriptor.accepts(name) {
                debug!(method = descriptor.name(), argument = *name, "argument not accepted by method; dropped");
            }
        }
        descriptor
            .argument_names()
            .iter()
            .map(|slot| self.get(slot).map(str::to_string))
            .collect()
    }
}
