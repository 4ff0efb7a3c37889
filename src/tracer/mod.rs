//! Tracing of function calls
//!
//! A traced function reports every call to a user-supplied callback: once when the call
//! starts, and once when it completes or fails. The callback receives a [`TraceResult`]
//! snapshot carrying the rendered call, the elapsed time, and the returned value or error.
//! The caller gets exactly what the wrapped function returned.
//!
//! # Architecture
//!
//! - **TraceConfig**: the callback plus rendering and callback-failure options
//! - **Tracer**: reusable factory wrapping any number of functions with one configuration
//! - **Traced**: a wrapped function; `call` for plain functions, `call_async` for futures
//! - **TraceResult**: immutable per-transition snapshot passed to the callback
//!
//! # Usage Example
//!
//! ```rust
//! use functrace::tracer::{trace, TraceConfig, TraceResult};
//! use functrace::signature::{Arguments, Parameter, Signature};
//!
//! let config = TraceConfig::new(|result: &TraceResult<'_, i64, String>| {
//!     println!("{}", result.printable_summary());
//!     Ok(())
//! });
//! let signature = Signature::new("add", ["a", "b"].map(Parameter::new)).unwrap();
//! let add = trace(config, signature, |args: Arguments| -> Result<i64, String> {
//!     let a = args.get(0).and_then(|v| v.as_i64()).ok_or("a must be an integer")?;
//!     let b = args.get(1).and_then(|v| v.as_i64()).ok_or("b must be an integer")?;
//!     Ok(a + b)
//! });
//!
//! // add(a=1, b=2) | Started
//! // add(a=1, b=2) | Completed | 850 nanoseconds | 3
//! assert_eq!(add.call(Arguments::from_positional([1, 2])).unwrap(), 3);
//! ```
//!
//! # Callback failures
//!
//! The callback is part of the call: if it fails on the started snapshot, the function
//! is not called and the callback's error is returned. If it fails on the terminal
//! snapshot, [`CallbackFailurePolicy`] decides whether its error replaces the call's
//! outcome (the default) or is logged while the outcome is kept.

pub mod callbacks;
pub mod config;
pub mod trace_result;
pub mod traced;

// Re-export main types
pub use config::{callback_fn, CallbackError, CallbackFailurePolicy, TraceCallback, TraceConfig};
pub use trace_result::{CallState, TraceResult};
pub use traced::{trace, TraceError, Traced, Tracer};
