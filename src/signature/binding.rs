//! Binding of call-site arguments to a declared parameter list.
//!
//! Positional arguments fill positional parameters left to right, keyword arguments
//! fill parameters by name, surplus arguments go to variadic parameters when declared.
//! The result is always ordered by declaration, never by call order.

use super::arguments::Arguments;
use super::parameter::{ParameterKind, Signature};
use crate::error::{FunctraceError, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Arguments bound to parameter names, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments {
    slots: Vec<(String, Option<Value>)>,
}

impl BoundArguments {
    /// Value bound to `name`, if any
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Bound `(name, value)` pairs in declaration order; unbound parameters are skipped
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.as_str(), v)))
    }

    /// Every declared parameter with its value, or `undefined` when unbound
    pub fn with_undefined<'a>(&'a self, undefined: &'a Value) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.slots
            .iter()
            .map(move |(name, value)| (name.as_str(), value.as_ref().unwrap_or(undefined)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Signature {
    /// Bind call-site arguments to this signature
    ///
    /// Parameters the caller did not supply stay unbound.
    ///
    /// # Errors
    ///
    /// Returns a binding error when arguments cannot be matched to parameters:
    /// missing required argument, surplus positional arguments, unknown or repeated
    /// keywords, or a parameter given both by position and by name.
    pub fn bind(&self, args: &Arguments) -> Result<BoundArguments> {
        self.bind_arguments(args, false)
    }

    /// Bind like [`Signature::bind`], then fill unbound parameters with their defaults
    ///
    /// Variadic parameters default to an empty array or object.
    pub fn bind_with_defaults(&self, args: &Arguments) -> Result<BoundArguments> {
        self.bind_arguments(args, true)
    }

    pub(crate) fn bind_arguments(&self, args: &Arguments, apply_defaults: bool) -> Result<BoundArguments> {
        let parameters = self.parameters();
        let mut slots: Vec<Option<Value>> = vec![None; parameters.len()];

        let mut seen = HashSet::new();
        for (name, _) in args.keyword() {
            if !seen.insert(name.as_str()) {
                return Err(FunctraceError::DuplicateKeyword(name.clone()));
            }
        }

        // Positional arguments, left to right
        let mut positional = args.positional().iter();
        for (index, parameter) in parameters.iter().enumerate() {
            if !parameter.is_positional() {
                break;
            }
            match positional.next() {
                Some(value) => slots[index] = Some(value.clone()),
                None => break,
            }
        }

        let surplus: Vec<Value> = positional.cloned().collect();
        if !surplus.is_empty() {
            match position_of(self, ParameterKind::VarPositional) {
                Some(index) => slots[index] = Some(Value::Array(surplus)),
                None => {
                    return Err(FunctraceError::TooManyPositional {
                        expected: parameters.iter().filter(|p| p.is_positional()).count(),
                        given: args.positional().len(),
                    })
                }
            }
        }

        // Keyword arguments, by name
        let var_keyword = position_of(self, ParameterKind::VarKeyword);
        let mut extra = Map::new();
        for (name, value) in args.keyword() {
            let target = parameters
                .iter()
                .position(|p| p.name == *name && !p.is_variadic());

            match target {
                Some(index) if parameters[index].kind == ParameterKind::PositionalOnly => {
                    if var_keyword.is_none() {
                        return Err(FunctraceError::PositionalOnlyAsKeyword(name.clone()));
                    }
                    extra.insert(name.clone(), value.clone());
                }
                Some(index) => {
                    if slots[index].is_some() {
                        return Err(FunctraceError::MultipleValues(name.clone()));
                    }
                    slots[index] = Some(value.clone());
                }
                None => {
                    if var_keyword.is_none() {
                        return Err(FunctraceError::UnexpectedKeyword(name.clone()));
                    }
                    extra.insert(name.clone(), value.clone());
                }
            }
        }
        if let Some(index) = var_keyword {
            if !extra.is_empty() {
                slots[index] = Some(Value::Object(extra));
            }
        }

        for (parameter, slot) in parameters.iter().zip(slots.iter_mut()) {
            if slot.is_some() {
                continue;
            }
            if parameter.is_required() {
                return Err(FunctraceError::MissingArgument(parameter.name.clone()));
            }
            if apply_defaults {
                *slot = parameter.default_value();
            }
        }

        Ok(BoundArguments {
            slots: parameters
                .iter()
                .map(|p| p.name.clone())
                .zip(slots)
                .collect(),
        })
    }
}

fn position_of(signature: &Signature, kind: ParameterKind) -> Option<usize> {
    signature.parameters().iter().position(|p| p.kind == kind)
}
