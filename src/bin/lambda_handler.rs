//! AWS Lambda handler for rules engine tool calls
//!
//! Accepts a [`ToolCall`] JSON payload and returns the assessment JSON.
//! Direct invocations pass the call as the event itself; Lambda Function URL
//! invocations carry it as a string `body` and get an HTTP-shaped response.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use retirement_rules::{RulesEngine, ToolCall};
use serde_json::{json, Value};

fn http_response(status: u16, body: &Value) -> Value {
    json!({
        "statusCode": status,
        "headers": {"Content-Type": "application/json"},
        "body": body.to_string(),
    })
}

/// Run a call and shape the outcome as (HTTP status, JSON body)
fn evaluate(engine: &RulesEngine, payload: Value) -> (u16, Value) {
    let call: ToolCall = match serde_json::from_value(payload) {
        Ok(call) => call,
        Err(e) => return (400, json!({"error": format!("Invalid tool call: {}", e)})),
    };

    match engine.dispatch(&call) {
        Ok(result) => (200, result),
        Err(e) => {
            log::warn!("{} failed: {}", call.operation(), e);
            (422, json!({"error": e.to_string()}))
        }
    }
}

async fn handler(engine: &RulesEngine, event: LambdaEvent<Value>) -> Result<Value, Error> {
    let (payload, _context) = event.into_parts();

    // Function URL request: the tool call is a JSON string in `body`
    if let Some(body) = payload.get("body").and_then(Value::as_str) {
        let parsed = match serde_json::from_str::<Value>(body) {
            Ok(value) => value,
            Err(e) => return Ok(http_response(400, &json!({"error": format!("Invalid JSON: {}", e)}))),
        };
        let (status, result) = evaluate(engine, parsed);
        return Ok(http_response(status, &result));
    }

    match evaluate(engine, payload) {
        (200, result) => Ok(result),
        (_, error) => Err(Error::from(error.to_string())),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let engine = RulesEngine::from_csv().unwrap_or_else(|e| {
        log::warn!("Falling back to built-in rule tables: {}", e);
        RulesEngine::new()
    });
    let engine = &engine;

    run(service_fn(move |event: LambdaEvent<Value>| async move { handler(engine, event).await })).await
}
