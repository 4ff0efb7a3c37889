use crate::error::{FunctraceError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// How a parameter accepts its value
///
/// Variants are declared in the order they must appear in a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Filled only by position
    PositionalOnly,
    /// Filled by position or by name
    PositionalOrKeyword,
    /// Collects surplus positional arguments
    VarPositional,
    /// Filled only by name
    KeywordOnly,
    /// Collects surplus keyword arguments
    VarKeyword,
}

/// A declared parameter of a traced function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
    pub default: Option<Value>,
}

impl Parameter {
    /// A positional-or-keyword parameter without a default
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::PositionalOrKeyword,
            default: None,
        }
    }

    pub fn positional_only(name: impl Into<String>) -> Self {
        Self {
            kind: ParameterKind::PositionalOnly,
            ..Self::new(name)
        }
    }

    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self {
            kind: ParameterKind::KeywordOnly,
            ..Self::new(name)
        }
    }

    pub fn var_positional(name: impl Into<String>) -> Self {
        Self {
            kind: ParameterKind::VarPositional,
            ..Self::new(name)
        }
    }

    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self {
            kind: ParameterKind::VarKeyword,
            ..Self::new(name)
        }
    }

    /// Set the value used when the caller does not supply one
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self.kind, ParameterKind::VarPositional | ParameterKind::VarKeyword)
    }

    pub fn is_positional(&self) -> bool {
        matches!(self.kind, ParameterKind::PositionalOnly | ParameterKind::PositionalOrKeyword)
    }

    /// A parameter that must be bound by every call
    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.is_variadic()
    }

    /// Value a missing argument takes once defaults are applied
    pub(crate) fn default_value(&self) -> Option<Value> {
        match self.kind {
            ParameterKind::VarPositional => Some(Value::Array(Vec::new())),
            ParameterKind::VarKeyword => Some(Value::Object(serde_json::Map::new())),
            _ => self.default.clone(),
        }
    }
}

/// Identity and declared parameter list of a traced function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    name: String,
    qualname: String,
    module: Option<String>,
    parameters: Vec<Parameter>,
}

impl Signature {
    /// Create a signature, validating the parameter list
    ///
    /// # Arguments
    ///
    /// * `name` - The function name; also used as the qualified name until one is set
    /// * `parameters` - Declared parameters, in declaration order
    ///
    /// # Errors
    ///
    /// Fails when a name repeats, kinds are out of order, a kind is variadic more than
    /// once, a variadic parameter has a default, or a positional parameter without a
    /// default follows one that has a default.
    pub fn new(name: impl Into<String>, parameters: impl IntoIterator<Item = Parameter>) -> Result<Self> {
        let name = name.into();
        let parameters: Vec<Parameter> = parameters.into_iter().collect();
        validate(&parameters)?;

        Ok(Self {
            qualname: name.clone(),
            name,
            module: None,
            parameters,
        })
    }

    /// Set the qualified name, e.g. `Counter::increment`
    pub fn with_qualname(mut self, qualname: impl Into<String>) -> Self {
        self.qualname = qualname.into();
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

fn validate(parameters: &[Parameter]) -> Result<()> {
    let mut names = HashSet::new();
    let mut previous_kind: Option<ParameterKind> = None;
    let mut seen_positional_default = false;

    for parameter in parameters {
        if !names.insert(parameter.name.as_str()) {
            return Err(FunctraceError::DuplicateParameter(parameter.name.clone()));
        }

        if let Some(previous) = previous_kind {
            if parameter.kind < previous {
                return Err(FunctraceError::InvalidSignature(format!(
                    "{:?} parameter '{}' cannot follow a {:?} parameter",
                    parameter.kind, parameter.name, previous
                )));
            }
            if parameter.kind == previous && parameter.is_variadic() {
                return Err(FunctraceError::InvalidSignature(format!(
                    "only one {:?} parameter is allowed",
                    parameter.kind
                )));
            }
        }

        if parameter.is_variadic() && parameter.default.is_some() {
            return Err(FunctraceError::InvalidSignature(format!(
                "variadic parameter '{}' cannot have a default",
                parameter.name
            )));
        }

        if parameter.is_positional() {
            if parameter.default.is_some() {
                seen_positional_default = true;
            } else if seen_positional_default {
                return Err(FunctraceError::InvalidSignature(format!(
                    "parameter '{}' without a default follows a parameter with a default",
                    parameter.name
                )));
            }
        }

        previous_kind = Some(parameter.kind);
    }

    Ok(())
}
