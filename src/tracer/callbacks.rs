//! Ready-made trace callbacks

use super::config::{callback_fn, TraceCallback};
use super::trace_result::{CallState, TraceResult};
use std::fmt::Debug;
use tracing::{debug, warn};

/// A callback that discards every snapshot
pub fn noop<R: 'static, E: 'static>() -> TraceCallback<R, E> {
    callback_fn(|_| Ok(()))
}

/// A callback that logs every snapshot through `tracing`
///
/// Started and completed snapshots are logged at debug level, failed ones at warn
/// level, each with its `call_id` and `state` as structured fields.
pub fn tracing_callback<R, E>() -> TraceCallback<R, E>
where
    R: Debug + 'static,
    E: Debug + 'static,
{
    callback_fn(|result: &TraceResult<'_, R, E>| {
        let summary = result.printable_summary();
        match result.state() {
            CallState::Failed => {
                warn!(call_id = %result.call_id(), state = %result.state(), "{}", summary)
            }
            _ => debug!(call_id = %result.call_id(), state = %result.state(), "{}", summary),
        }
        Ok(())
    })
}
