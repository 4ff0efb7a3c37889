//! Snapshots of a traced call's lifecycle
//!
//! A [`TraceResult`] is handed to the trace callback once when the call starts and
//! once when it completes or fails. Both snapshots of one call share a `call_id`.

use crate::duration::Duration;
use crate::signature::FunctionCall;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle state of a traced call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    Started,
    Completed,
    Failed,
}

impl CallState {
    /// Whether no further snapshot follows this state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CallState::Started)
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CallState::Started => "Started",
            CallState::Completed => "Completed",
            CallState::Failed => "Failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug)]
enum Outcome<'a, R, E> {
    Started,
    Completed { elapsed: Duration, value: &'a R },
    Failed { elapsed: Duration, error: &'a E },
}

impl<R, E> Clone for Outcome<'_, R, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, E> Copy for Outcome<'_, R, E> {}

/// Immutable snapshot of one lifecycle transition of a traced call
///
/// The returned value and the error are borrowed: the traced call hands the originals
/// back to its caller untouched once the callback returns.
///
/// Exactly one of [`is_started`](Self::is_started), [`is_completed`](Self::is_completed)
/// and [`is_failed`](Self::is_failed) is true:
///
/// - started: no elapsed time, no value, no error
/// - completed: elapsed time and returned value
/// - failed: elapsed time and error
#[derive(Debug)]
pub struct TraceResult<'a, R, E> {
    call_id: Uuid,
    timestamp: DateTime<Utc>,
    function_call: &'a FunctionCall,
    outcome: Outcome<'a, R, E>,
}

impl<R, E> Clone for TraceResult<'_, R, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, E> Copy for TraceResult<'_, R, E> {}

impl<'a, R, E> TraceResult<'a, R, E> {
    pub(crate) fn started(call_id: Uuid, function_call: &'a FunctionCall) -> Self {
        Self::with_outcome(call_id, function_call, Outcome::Started)
    }

    pub(crate) fn completed(
        call_id: Uuid,
        function_call: &'a FunctionCall,
        elapsed: Duration,
        value: &'a R,
    ) -> Self {
        Self::with_outcome(call_id, function_call, Outcome::Completed { elapsed, value })
    }

    pub(crate) fn failed(
        call_id: Uuid,
        function_call: &'a FunctionCall,
        elapsed: Duration,
        error: &'a E,
    ) -> Self {
        Self::with_outcome(call_id, function_call, Outcome::Failed { elapsed, error })
    }

    fn with_outcome(call_id: Uuid, function_call: &'a FunctionCall, outcome: Outcome<'a, R, E>) -> Self {
        Self {
            call_id,
            timestamp: Utc::now(),
            function_call,
            outcome,
        }
    }

    /// Identifier shared by the started and terminal snapshots of one call
    pub fn call_id(&self) -> Uuid {
        self.call_id
    }

    /// Wall-clock time at which this snapshot was taken
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The call as presented by the caller
    pub fn function_call(&self) -> &'a FunctionCall {
        self.function_call
    }

    pub fn state(&self) -> CallState {
        match self.outcome {
            Outcome::Started => CallState::Started,
            Outcome::Completed { .. } => CallState::Completed,
            Outcome::Failed { .. } => CallState::Failed,
        }
    }

    pub fn is_started(&self) -> bool {
        self.state() == CallState::Started
    }

    pub fn is_completed(&self) -> bool {
        self.state() == CallState::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.state() == CallState::Failed
    }

    /// Time spent in the wrapped function; `None` while the call is only started
    pub fn elapsed_time(&self) -> Option<Duration> {
        match self.outcome {
            Outcome::Started => None,
            Outcome::Completed { elapsed, .. } | Outcome::Failed { elapsed, .. } => Some(elapsed),
        }
    }

    /// Value returned by a completed call
    pub fn returned_value(&self) -> Option<&'a R> {
        match self.outcome {
            Outcome::Completed { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Error raised by a failed call
    pub fn error(&self) -> Option<&'a E> {
        match self.outcome {
            Outcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl<R, E: std::error::Error> TraceResult<'_, R, E> {
    /// Error of a failed call followed by its chain of sources, one per line
    ///
    /// ```text
    /// config could not be loaded
    /// caused by: file is not valid JSON
    /// caused by: expected value at line 1 column 1
    /// ```
    pub fn traceback(&self) -> Option<String> {
        let error = self.error()?;
        let mut lines = vec![error.to_string()];
        let mut source = error.source();
        while let Some(cause) = source {
            lines.push(format!("caused by: {}", cause));
            source = cause.source();
        }
        Some(lines.join("\n"))
    }
}

impl<R: fmt::Debug, E: fmt::Debug> TraceResult<'_, R, E> {
    /// One-line summary, e.g. `func(a=1, b=2) | Completed | 1 microsecond | 0.5`
    pub fn printable_summary(&self) -> String {
        let mut parts = vec![self.function_call.to_string(), self.state().to_string()];

        match self.outcome {
            Outcome::Started => {}
            Outcome::Completed { elapsed, value } => {
                parts.push(elapsed.format());
                parts.push(format!("{:?}", value));
            }
            Outcome::Failed { elapsed, error } => {
                parts.push(elapsed.format());
                parts.push(format!("{:?}", error));
            }
        }

        parts.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{Arguments, Parameter, RenderOptions, Signature};
    use std::sync::Arc;

    fn function_call() -> FunctionCall {
        let signature = Arc::new(Signature::new("func", ["a", "b"].map(Parameter::new)).unwrap());
        FunctionCall::new(
            signature,
            &Arguments::from_positional([1, 2]),
            &RenderOptions::default(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_started_snapshot_is_empty() {
        let call = function_call();
        let result: TraceResult<'_, f64, String> = TraceResult::started(Uuid::new_v4(), &call);

        assert!(result.is_started());
        assert!(!result.is_completed());
        assert!(!result.is_failed());
        assert_eq!(result.elapsed_time(), None);
        assert_eq!(result.returned_value(), None);
        assert_eq!(result.error(), None);
        assert!(!result.state().is_terminal());
    }

    #[test]
    fn test_completed_snapshot() {
        let call = function_call();
        let value = 0.5;
        let elapsed = Duration::from_nanoseconds(1_200).unwrap();
        let result: TraceResult<'_, f64, String> =
            TraceResult::completed(Uuid::new_v4(), &call, elapsed, &value);

        assert!(result.is_completed());
        assert!(!result.is_started());
        assert!(!result.is_failed());
        assert_eq!(result.elapsed_time(), Some(elapsed));
        assert_eq!(result.returned_value(), Some(&0.5));
        assert_eq!(result.error(), None);
        assert!(result.state().is_terminal());
    }

    #[test]
    fn test_failed_snapshot() {
        let call = function_call();
        let error = "division by zero".to_string();
        let result: TraceResult<'_, f64, String> =
            TraceResult::failed(Uuid::new_v4(), &call, Duration::ZERO, &error);

        assert!(result.is_failed());
        assert_eq!(result.elapsed_time(), Some(Duration::ZERO));
        assert_eq!(result.returned_value(), None);
        assert_eq!(result.error(), Some(&error));
    }

    #[derive(Debug, thiserror::Error)]
    enum LoadError {
        #[error("config could not be loaded")]
        Config(#[source] ParseError),
        #[error("config path is empty")]
        EmptyPath,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("file is not valid JSON")]
    struct ParseError(#[source] serde_json::Error);

    #[test]
    fn test_traceback_renders_source_chain() {
        let call = function_call();
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let json_message = json_error.to_string();
        let error = LoadError::Config(ParseError(json_error));
        let result: TraceResult<'_, f64, LoadError> =
            TraceResult::failed(Uuid::new_v4(), &call, Duration::ZERO, &error);

        let traceback = result.traceback().unwrap();
        let lines: Vec<&str> = traceback.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "config could not be loaded");
        assert_eq!(lines[1], "caused by: file is not valid JSON");
        assert_eq!(lines[2], format!("caused by: {}", json_message));
    }

    #[test]
    fn test_traceback_without_source() {
        let call = function_call();
        let error = LoadError::EmptyPath;
        let failed: TraceResult<'_, f64, LoadError> =
            TraceResult::failed(Uuid::new_v4(), &call, Duration::ZERO, &error);
        let started: TraceResult<'_, f64, LoadError> = TraceResult::started(Uuid::new_v4(), &call);

        assert_eq!(failed.traceback().as_deref(), Some("config path is empty"));
        assert_eq!(started.traceback(), None);
    }

    #[test]
    fn test_printable_summary() {
        let call = function_call();
        let id = Uuid::new_v4();
        let value = 0.5;
        let error = "division by zero".to_string();
        let elapsed = Duration::from_nanoseconds(1_200).unwrap();

        let started: TraceResult<'_, f64, String> = TraceResult::started(id, &call);
        assert_eq!(started.printable_summary(), "func(a=1, b=2) | Started");

        let completed: TraceResult<'_, f64, String> = TraceResult::completed(id, &call, elapsed, &value);
        assert_eq!(
            completed.printable_summary(),
            "func(a=1, b=2) | Completed | 1 microsecond, 200 nanoseconds | 0.5"
        );

        let failed: TraceResult<'_, f64, String> = TraceResult::failed(id, &call, elapsed, &error);
        assert_eq!(
            failed.printable_summary(),
            "func(a=1, b=2) | Failed | 1 microsecond, 200 nanoseconds | \"division by zero\""
        );
    }

    #[test]
    fn test_snapshot_is_copy() {
        let call = function_call();
        let result: TraceResult<'_, f64, String> = TraceResult::started(Uuid::new_v4(), &call);
        let copy = result;

        assert_eq!(copy.call_id(), result.call_id());
        assert_eq!(copy.timestamp(), result.timestamp());
        assert_eq!(copy.function_call().to_string(), "func(a=1, b=2)");
    }

    #[test]
    fn test_call_state_display_and_serde() {
        assert_eq!(CallState::Completed.to_string(), "Completed");
        assert_eq!(serde_json::to_string(&CallState::Failed).unwrap(), "\"failed\"");
    }
}
