//! Call signature rendering
//!
//! A traced function declares its identity and parameters once, as a [`Signature`].
//! Each call supplies [`Arguments`]; binding them against the signature yields
//! [`BoundArguments`] in declaration order, and a [`FunctionCall`] renders the
//! result as `name(param1=value1, param2=value2)`.
//!
//! Argument values are `serde_json::Value`s and render in their JSON form.
//!
//! # Usage Example
//!
//! ```rust
//! use functrace::signature::{render, Parameter};
//! use serde_json::json;
//!
//! let params = ["a", "b", "c"].map(Parameter::new);
//! let rendered = render("func", &params, &[json!(1)], &[("c".into(), json!(3)), ("b".into(), json!(2))])
//!     .unwrap();
//! assert_eq!(rendered, "func(a=1, b=2, c=3)");
//! ```

pub mod arguments;
pub mod binding;
pub mod function_call;
pub mod parameter;

pub use arguments::Arguments;
pub use binding::BoundArguments;
pub use function_call::{render, FunctionCall, RenderOptions, DEFAULT_CALL_PATTERN};
pub use parameter::{Parameter, ParameterKind, Signature};
