//! Function call tracing.
//!
//! Wrap any function so that each call is observed, timed and reported to a callback,
//! without changing what the function returns. See [`tracer`] for the lifecycle and
//! [`signature`] for how calls are rendered.

pub mod duration;
pub mod error;
pub mod signature;
pub mod tracer;

pub use duration::{Duration, DurationFormat};
pub use error::{FunctraceError, Result};
pub use signature::{Arguments, BoundArguments, FunctionCall, Parameter, ParameterKind, Signature};
pub use tracer::{trace, CallState, TraceConfig, TraceError, TraceResult, Traced, Tracer};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::duration::Duration;
    pub use crate::error::{FunctraceError, Result};
    pub use crate::signature::{Arguments, Parameter, Signature};
    pub use crate::tracer::{
        trace, CallState, CallbackError, CallbackFailurePolicy, TraceConfig, TraceError, TraceResult,
        Traced, Tracer,
    };
}
