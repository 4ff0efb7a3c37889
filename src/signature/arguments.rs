use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Call-site arguments, as presented by the caller
///
/// Positional arguments keep their call order; keyword arguments keep theirs too,
/// although binding reorders everything into declaration order.
///
/// # Examples
///
/// ```
/// use functrace::Arguments;
///
/// let args = Arguments::new().arg(1).arg("two").kwarg("c", 3.5);
/// assert_eq!(args.get(1), Some(&serde_json::json!("two")));
/// assert_eq!(args.get_keyword("c"), Some(&serde_json::json!(3.5)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arguments {
    positional: Vec<Value>,
    keyword: Vec<(String, Value)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from positional values only
    pub fn from_positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keyword: Vec::new(),
        }
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword(&self) -> &[(String, Value)] {
        &self.keyword
    }

    /// Positional argument at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// First keyword argument called `name`
    pub fn get_keyword(&self, name: &str) -> Option<&Value> {
        self.keyword.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Total number of arguments supplied
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}
