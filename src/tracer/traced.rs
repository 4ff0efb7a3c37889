//! The tracing wrapper
//!
//! [`Traced`] holds a function together with its [`Signature`] and a [`TraceConfig`].
//! Every call runs the same lifecycle:
//!
//! 1. bind and render the arguments (binding errors abort the call here)
//! 2. emit the started snapshot (callback errors abort the call here)
//! 3. run the function, timed with a monotonic clock
//! 4. emit the completed or failed snapshot
//! 5. hand the function's value or error back to the caller
//!
//! Nothing is shared between calls except the wrapper's immutable configuration, so a
//! single `Traced` can be called from many threads or tasks at once.

use super::config::{CallbackError, CallbackFailurePolicy, TraceConfig};
use super::trace_result::TraceResult;
use crate::duration::Duration;
use crate::error::FunctraceError;
use crate::signature::{Arguments, FunctionCall, Signature};
use std::future::Future;
use std::panic::Location;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Error returned by a traced call
#[derive(Error, Debug)]
pub enum TraceError<E> {
    /// Arguments did not fit the signature; the function was not called
    #[error("Argument binding failed: {0}")]
    Binding(#[source] FunctraceError),

    /// The trace callback failed
    #[error("Trace callback failed: {0}")]
    Callback(#[source] CallbackError),

    /// The wrapped function's own error, unchanged
    #[error("{0}")]
    Function(E),
}

impl<E> TraceError<E> {
    pub fn is_binding_error(&self) -> bool {
        matches!(self, TraceError::Binding(_))
    }

    pub fn is_callback_error(&self) -> bool {
        matches!(self, TraceError::Callback(_))
    }

    pub fn is_function_error(&self) -> bool {
        matches!(self, TraceError::Function(_))
    }

    /// The wrapped function's error, if that is what this is
    pub fn function_error(&self) -> Option<&E> {
        match self {
            TraceError::Function(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_function_error(self) -> Option<E> {
        match self {
            TraceError::Function(error) => Some(error),
            _ => None,
        }
    }
}

/// Reusable factory of traced functions sharing one configuration
pub struct Tracer<R, E> {
    config: TraceConfig<R, E>,
}

impl<R, E> Tracer<R, E> {
    pub fn new(config: TraceConfig<R, E>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TraceConfig<R, E> {
        &self.config
    }

    /// Wrap `function`, described by `signature`
    ///
    /// The tracer keeps no state of its own, so it can wrap any number of functions;
    /// each wrapped function traces its calls independently.
    pub fn wrap<F>(&self, signature: Signature, function: F) -> Traced<F, R, E> {
        Traced {
            signature: Arc::new(signature),
            function,
            config: self.config.clone(),
        }
    }
}

impl<R, E> Clone for Tracer<R, E> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
        }
    }
}

/// Wrap `function` so that every call is reported to the configured callback
///
/// # Examples
///
/// ```
/// use functrace::{trace, Arguments, Parameter, Signature, TraceConfig};
///
/// let config = TraceConfig::new(|result: &functrace::TraceResult<'_, f64, String>| {
///     println!("{}", result.printable_summary());
///     Ok(())
/// });
/// let signature = Signature::new("divide", ["a", "b"].map(Parameter::new)).unwrap();
///
/// let divide = trace(config, signature, |args: Arguments| {
///     let a = args.get(0).and_then(|v| v.as_f64()).unwrap_or_default();
///     let b = args.get(1).and_then(|v| v.as_f64()).unwrap_or_default();
///     if b == 0.0 {
///         return Err("division by zero".to_string());
///     }
///     Ok(a / b)
/// });
///
/// assert_eq!(divide.call(Arguments::from_positional([1, 2])).unwrap(), 0.5);
/// assert!(divide.call(Arguments::from_positional([1, 0])).unwrap_err().is_function_error());
/// ```
pub fn trace<F, R, E>(config: TraceConfig<R, E>, signature: Signature, function: F) -> Traced<F, R, E> {
    Tracer::new(config).wrap(signature, function)
}

/// A function wrapped with tracing
///
/// Same inputs and outputs as the wrapped function; the only difference is the
/// [`TraceError`] around the error type, which carries the function's own error
/// unchanged in [`TraceError::Function`].
pub struct Traced<F, R, E> {
    signature: Arc<Signature>,
    function: F,
    config: TraceConfig<R, E>,
}

impl<F, R, E> Traced<F, R, E> {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn config(&self) -> &TraceConfig<R, E> {
        &self.config
    }

    /// The wrapped function, untraced
    pub fn inner(&self) -> &F {
        &self.function
    }

    pub fn into_inner(self) -> F {
        self.function
    }

    /// Call the wrapped function, tracing the call
    ///
    /// A call whose arguments are rejected at binding is not a traced call: the
    /// callback sees neither snapshot and the function does not run.
    ///
    /// # Arguments
    ///
    /// * `args` - Passed to the wrapped function unmodified
    ///
    /// # Errors
    ///
    /// - [`TraceError::Binding`] when `args` do not fit the signature (nothing is emitted)
    /// - [`TraceError::Callback`] when the callback fails on the started snapshot (the
    ///   function never runs), or on the terminal snapshot under
    ///   [`CallbackFailurePolicy::Propagate`]
    /// - [`TraceError::Function`] with the function's own error
    #[track_caller]
    pub fn call(&self, args: Arguments) -> Result<R, TraceError<E>>
    where
        F: Fn(Arguments) -> Result<R, E>,
    {
        let (call_id, function_call) = self.start(&args, Location::caller())?;

        let started_at = Instant::now();
        let outcome = (self.function)(args);
        let elapsed = Duration::from(started_at.elapsed());

        self.finish(call_id, &function_call, elapsed, outcome)
    }

    /// Call an async wrapped function, tracing the call
    ///
    /// Binding and the started snapshot happen before the returned future is first
    /// polled. As with [`call`](Self::call), a binding failure emits no snapshot.
    /// Elapsed time covers the function's whole future, including the time it spends
    /// suspended. A future dropped before completion emits no terminal snapshot.
    #[track_caller]
    pub fn call_async<'a, Fut>(
        &'a self,
        args: Arguments,
    ) -> impl Future<Output = Result<R, TraceError<E>>> + 'a
    where
        F: Fn(Arguments) -> Fut,
        Fut: Future<Output = Result<R, E>> + 'a,
        R: 'a,
        E: 'a,
    {
        let location = Location::caller();
        let started = self.start(&args, location);

        async move {
            let (call_id, function_call) = match started {
                Ok(started) => started,
                Err(err) => return Err(err),
            };

            let started_at = Instant::now();
            let outcome = (self.function)(args).await;
            let elapsed = Duration::from(started_at.elapsed());

            self.finish(call_id, &function_call, elapsed, outcome)
        }
    }

    fn start(
        &self,
        args: &Arguments,
        location: &'static Location<'static>,
    ) -> Result<(Uuid, FunctionCall), TraceError<E>> {
        let function_call = FunctionCall::new(
            Arc::clone(&self.signature),
            args,
            &self.config.render,
            Some(location),
        )
        .map_err(TraceError::Binding)?;

        let call_id = Uuid::new_v4();
        self.config
            .emit(&TraceResult::started(call_id, &function_call))
            .map_err(TraceError::Callback)?;

        Ok((call_id, function_call))
    }

    fn finish(
        &self,
        call_id: Uuid,
        function_call: &FunctionCall,
        elapsed: Duration,
        outcome: Result<R, E>,
    ) -> Result<R, TraceError<E>> {
        let emitted = match &outcome {
            Ok(value) => self
                .config
                .emit(&TraceResult::completed(call_id, function_call, elapsed, value)),
            Err(error) => self
                .config
                .emit(&TraceResult::failed(call_id, function_call, elapsed, error)),
        };

        if let Err(callback_error) = emitted {
            match self.config.callback_failure_policy {
                CallbackFailurePolicy::Propagate => return Err(TraceError::Callback(callback_error)),
                CallbackFailurePolicy::PreserveOutcome => {
                    warn!(
                        call_id = %call_id,
                        call = %function_call,
                        error = %callback_error,
                        "Trace callback failed after the call finished, keeping the call's outcome"
                    );
                }
            }
        }

        outcome.map_err(TraceError::Function)
    }
}

impl<F: Clone, R, E> Clone for Traced<F, R, E> {
    fn clone(&self) -> Self {
        Self {
            signature: Arc::clone(&self.signature),
            function: self.function.clone(),
            config: self.config.clone(),
        }
    }
}
