//! Logging traced calls through `tracing`
//!
//! Wraps a few functions, a method-like function and an async function, and logs
//! every lifecycle snapshot with a custom callback built on the call pattern
//! placeholders.
//!
//! # Running the example
//!
//! ```bash
//! RUST_LOG=debug cargo run --example trace_logging
//! ```

use functrace::prelude::*;
use functrace::tracer::callbacks;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn log_callback(
    result: &TraceResult<'_, serde_json::Value, String>,
) -> std::result::Result<(), CallbackError> {
    let call = result.function_call().format("{file}:{line} | {qualname}({params})", "=", ", ")?;
    let elapsed = result.elapsed_time().map(|d| d.format()).unwrap_or_default();

    match result.state() {
        CallState::Started => debug!("{} | Started", call),
        CallState::Completed => {
            debug!("{} | Completed | {} | {:?}", call, elapsed, result.returned_value())
        }
        CallState::Failed => warn!("{} | Failed | {} | {:?}", call, elapsed, result.error()),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let tracer = Tracer::new(TraceConfig::new(log_callback).apply_defaults(true));

    // A plain function
    let greet = tracer.wrap(
        Signature::new("greet", [Parameter::new("name"), Parameter::new("punctuation").with_default("!")])?,
        |args: Arguments| {
            let name = args.get(0).and_then(|v| v.as_str()).unwrap_or("world");
            Ok(serde_json::json!(format!("Hello, {}!", name)))
        },
    );
    greet.call(Arguments::new().arg("Ada"))?;

    // A method: hide the receiver from the rendered call
    let counter = Tracer::new(
        TraceConfig::new(log_callback).exclude(["self"]),
    )
    .wrap(
        Signature::new("increment", [Parameter::new("self"), Parameter::new("by")])?
            .with_qualname("Counter::increment"),
        |args: Arguments| {
            let by = args.get(1).and_then(|v| v.as_i64()).unwrap_or(1);
            Ok(serde_json::json!(41 + by))
        },
    );
    counter.call(Arguments::new().arg("<Counter>").kwarg("by", 1))?;

    // A failing function: the error reaches the caller unchanged
    let divide = tracer.wrap(
        Signature::new("divide", ["a", "b"].map(Parameter::new))?,
        |args: Arguments| {
            let a = args.get(0).and_then(|v| v.as_f64()).unwrap_or_default();
            let b = args.get(1).and_then(|v| v.as_f64()).unwrap_or_default();
            if b == 0.0 {
                return Err("division by zero".to_string());
            }
            Ok(serde_json::json!(a / b))
        },
    );
    if let Err(err) = divide.call(Arguments::from_positional([1, 0])) {
        println!("divide failed as expected: {}", err);
    }

    // An async function, logged with the stock tracing callback
    let fetch = functrace::trace(
        TraceConfig::with_callback(callbacks::tracing_callback()),
        Signature::new("fetch", [Parameter::new("key"), Parameter::keyword_only("timeout_ms").with_default(100)])?,
        |args: Arguments| async move {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            let key = args.get(0).and_then(|v| v.as_str()).unwrap_or_default().to_string();
            Ok::<_, String>(format!("value-of-{}", key))
        },
    );
    let value = fetch.call_async(Arguments::new().arg("answer")).await?;
    println!("fetched {}", value);

    Ok(())
}
