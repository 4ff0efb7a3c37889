use super::trace_result::TraceResult;
use crate::signature::RenderOptions;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Error a trace callback may return
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for trace callback functions
pub type TraceCallback<R, E> =
    Arc<dyn Fn(&TraceResult<'_, R, E>) -> Result<(), CallbackError> + Send + Sync>;

/// Wrap a closure as a [`TraceCallback`]
pub fn callback_fn<R, E, F>(callback: F) -> TraceCallback<R, E>
where
    F: Fn(&TraceResult<'_, R, E>) -> Result<(), CallbackError> + Send + Sync + 'static,
{
    Arc::new(callback)
}

/// What happens when the callback fails on the completed or failed snapshot
///
/// A callback failure on the started snapshot always aborts the call before the
/// wrapped function runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackFailurePolicy {
    /// The callback error replaces the call's return value or error
    #[default]
    Propagate,
    /// The callback error is logged and the call's own outcome is returned
    PreserveOutcome,
}

/// Configuration of a [`Tracer`](super::Tracer)
pub struct TraceConfig<R, E> {
    callback: TraceCallback<R, E>,
    pub render: RenderOptions,
    pub callback_failure_policy: CallbackFailurePolicy,
}

impl<R, E> TraceConfig<R, E> {
    /// Create a configuration around a callback
    ///
    /// # Arguments
    ///
    /// * `callback` - Invoked with every snapshot of every traced call
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&TraceResult<'_, R, E>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        Self::with_callback(Arc::new(callback))
    }

    /// Create a configuration around an already shared callback
    pub fn with_callback(callback: TraceCallback<R, E>) -> Self {
        Self {
            callback,
            render: RenderOptions::default(),
            callback_failure_policy: CallbackFailurePolicy::default(),
        }
    }

    /// Show declared defaults for parameters the caller left out
    pub fn apply_defaults(mut self, apply_defaults: bool) -> Self {
        self.render.apply_defaults = apply_defaults;
        self
    }

    /// Value shown for parameters that remain unbound
    pub fn undefined_value(mut self, value: impl Into<Value>) -> Self {
        self.render.undefined_value = value.into();
        self
    }

    /// Show only the named parameters
    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.render.include = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Never show the named parameters
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.render.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn callback_failure_policy(mut self, policy: CallbackFailurePolicy) -> Self {
        self.callback_failure_policy = policy;
        self
    }

    pub fn callback(&self) -> &TraceCallback<R, E> {
        &self.callback
    }

    pub(crate) fn emit(&self, result: &TraceResult<'_, R, E>) -> Result<(), CallbackError> {
        (self.callback)(result)
    }
}

impl<R, E> Clone for TraceConfig<R, E> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
            render: self.render.clone(),
            callback_failure_policy: self.callback_failure_policy,
        }
    }
}

impl<R, E> fmt::Debug for TraceConfig<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceConfig")
            .field("render", &self.render)
            .field("callback_failure_policy", &self.callback_failure_policy)
            .finish_non_exhaustive()
    }
}
