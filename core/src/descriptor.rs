//! Remote method schemas.

use std::fmt;

/// Immutable definition of a remote method: its wire name and the ordered
/// names of its argument slots.
///
/// Argument order is the positional contract with the service; a value
/// vector passed to `MethodInvoker::execute` is aligned slot by slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    argument_names: Vec<String>,
}

impl MethodDescriptor {
    pub fn new<I, S>(name: impl Into<String>, argument_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            argument_names: argument_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn argument_names(&self) -> &[String] {
        &self.argument_names
    }

    pub fn arity(&self) -> usize {
        self.argument_names.len()
    }

    pub fn accepts(&self, argument: &str) -> bool {
        self.argument_names.iter().any(|a| a == argument)
    }

    /// A new descriptor with `extra` slots appended after the existing ones.
    pub fn extended<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argument_names = self.argument_names.clone();
        argument_names.extend(extra.into_iter().map(Into::into));
        Self {
            name: self.name.clone(),
            argument_names,
        }
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.argument_names.join(", "))
    }
}
