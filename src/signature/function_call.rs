use super::arguments::Arguments;
use super::parameter::{Parameter, Signature};
use crate::error::{FunctraceError, Result};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::panic::Location;
use std::sync::{Arc, OnceLock};

/// Pattern used by [`FunctionCall`]'s `Display` implementation
pub const DEFAULT_CALL_PATTERN: &str = "{qualname}({params})";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{(\w*)\}").expect("placeholder pattern is valid")
    })
}

/// Controls which arguments a rendered call shows and how unbound ones appear
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Fill parameters the caller left out with their declared defaults
    pub apply_defaults: bool,
    /// Shown for parameters that are still unbound
    pub undefined_value: Value,
    /// Only these parameters are shown; `None` shows all of them
    pub include: Option<Vec<String>>,
    /// These parameters are never shown
    pub exclude: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            apply_defaults: false,
            undefined_value: Value::Null,
            include: None,
            exclude: Vec::new(),
        }
    }
}

impl RenderOptions {
    fn is_selected(&self, name: &str) -> bool {
        let included = self
            .include
            .as_ref()
            .map_or(true, |include| include.iter().any(|n| n == name));
        included && !self.exclude.iter().any(|n| n == name)
    }
}

/// One call of a traced function, with its arguments bound and selected
///
/// Built before the function runs, so it describes the call as the caller made it.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    signature: Arc<Signature>,
    arguments: Vec<(String, Value)>,
    raw_arguments: Arguments,
    location: Option<&'static Location<'static>>,
}

impl FunctionCall {
    /// Bind `args` against `signature` and keep the selected arguments
    ///
    /// # Arguments
    ///
    /// * `signature` - Declared identity and parameters of the function
    /// * `args` - Arguments as supplied by the caller
    /// * `options` - Default handling and parameter selection
    /// * `location` - Call site, when known
    pub fn new(
        signature: Arc<Signature>,
        args: &Arguments,
        options: &RenderOptions,
        location: Option<&'static Location<'static>>,
    ) -> Result<Self> {
        let bound = signature.bind_arguments(args, options.apply_defaults)?;
        let arguments = bound
            .with_undefined(&options.undefined_value)
            .filter(|(name, _)| options.is_selected(name))
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();

        Ok(Self {
            signature,
            arguments,
            raw_arguments: args.clone(),
            location,
        })
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn name(&self) -> &str {
        self.signature.name()
    }

    pub fn qualname(&self) -> &str {
        self.signature.qualname()
    }

    /// Selected `(name, value)` pairs in declaration order
    pub fn arguments(&self) -> &[(String, Value)] {
        &self.arguments
    }

    /// Arguments exactly as the caller passed them, before binding and selection
    pub fn raw_arguments(&self) -> &Arguments {
        &self.raw_arguments
    }

    /// Where the traced function was called from
    pub fn location(&self) -> Option<&'static Location<'static>> {
        self.location
    }

    /// Render the call with a pattern
    ///
    /// Supported placeholders: `{name}`, `{qualname}`, `{module}`, `{file}`, `{line}`
    /// and `{params}`. Missing module or location render as an empty string. `{{` and
    /// `}}` render as literal braces.
    ///
    /// # Arguments
    ///
    /// * `pattern` - Template such as `"{module}::{qualname}({params})"`
    /// * `association` - Placed between a parameter name and its value
    /// * `separator` - Placed between parameters
    ///
    /// # Errors
    ///
    /// Returns [`FunctraceError::UnknownPlaceholder`] for any other placeholder.
    pub fn format(&self, pattern: &str, association: &str, separator: &str) -> Result<String> {
        let mut output = String::with_capacity(pattern.len());
        let mut last = 0;

        for captures in placeholder_regex().captures_iter(pattern) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            output.push_str(&pattern[last..whole.start()]);
            match captures.get(1) {
                Some(key) => output.push_str(&self.placeholder(key.as_str(), association, separator)?),
                None => output.push_str(&whole.as_str()[..1]),
            }
            last = whole.end();
        }
        output.push_str(&pattern[last..]);

        Ok(output)
    }

    fn placeholder(&self, key: &str, association: &str, separator: &str) -> Result<String> {
        let value = match key {
            "name" => self.name().to_string(),
            "qualname" => self.qualname().to_string(),
            "module" => self.signature.module().unwrap_or_default().to_string(),
            "file" => self.location.map(|l| l.file().to_string()).unwrap_or_default(),
            "line" => self.location.map(|l| l.line().to_string()).unwrap_or_default(),
            "params" => self.params(association, separator),
            other => return Err(FunctraceError::UnknownPlaceholder(other.to_string())),
        };
        Ok(value)
    }

    fn params(&self, association: &str, separator: &str) -> String {
        self.arguments
            .iter()
            .map(|(name, value)| format!("{}{}{}", name, association, value))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.qualname(), self.params("=", ", "))
    }
}

/// Render a call as `identity(name1=value1, name2=value2, ...)`
///
/// Arguments are bound against `parameters` first, so the output follows declaration
/// order whatever mix of positional and keyword arguments was used.
///
/// # Errors
///
/// Fails when the parameter list is invalid or the arguments cannot be bound.
pub fn render(
    identity: &str,
    parameters: &[Parameter],
    positional: &[Value],
    keyword: &[(String, Value)],
) -> Result<String> {
    let signature = Signature::new(identity, parameters.to_vec())?;
    let args = keyword
        .iter()
        .fold(Arguments::from_positional(positional.iter().cloned()), |args, (name, value)| {
            args.kwarg(name.clone(), value.clone())
        });

    let call = FunctionCall::new(Arc::new(signature), &args, &RenderOptions::default(), None)?;
    Ok(call.to_string())
}
