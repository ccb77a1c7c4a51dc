//! JSON output formatting

use serde::Serialize;

/// Result object for operations that produce a single file.
#[derive(Serialize)]
pub struct FileResult {
    pub status: &'static str,
    pub input: String,
    pub output: String,
    pub processing_time_seconds: f64,
}

/// Result object for silence-splitting.
#[derive(Serialize)]
pub struct SplitResult {
    pub status: &'static str,
    pub input: String,
    pub outputs: Vec<String>,
    pub count: usize,
    pub processing_time_seconds: f64,
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing result: {}", e),
    }
}
