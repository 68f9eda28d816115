use std::process;

use serde_json::Value;

/// Exits the program with an error message
pub fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exits the program with an error message and usage information
pub fn exit_with_usage_error(message: &str, usage: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!("{}", usage);
    process::exit(1);
}

/// Renders a parkingd error body for the terminal.
///
/// Bodies look like `{"error": "...", "kind": "...", "status": 400, "fields": {...}}`.
/// Field errors are listed one per line under the headline. Anything that is not such
/// a body is returned unchanged.
pub fn describe_error_body(body: &str) -> String {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return body.to_string(),
    };
    let message = match parsed.get("error").and_then(Value::as_str) {
        Some(message) => message,
        None => return body.to_string(),
    };

    let mut out = match parsed.get("kind").and_then(Value::as_str) {
        Some(kind) => format!("{} ({})", message, kind),
        None => message.to_string(),
    };
    if let Some(fields) = parsed.get("fields").and_then(Value::as_object) {
        for (field, messages) in fields {
            for text in messages.as_array().into_iter().flatten().filter_map(Value::as_str) {
                out.push_str(&format!("\n  {}: {}", field, text));
            }
        }
    }
    out
}

/// Prints formatted JSON with proper indentation
pub fn print_json<T>(value: &T) -> Result<(), serde_json::Error>
where
    T: serde::Serialize,
{
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints a formatted JSON value or exits with error
pub fn print_json_or_exit<T>(value: &T, context: &str)
where
    T: serde::Serialize,
{
    if let Err(e) = print_json(value) {
        exit_with_error(&format!("Failed to format {} JSON: {}", context, e));
    }
}
