//! Output formatting for the CLI.

use clap::ValueEnum;
use hrm_document_store::{ErrorShape, Record, Response};
use serde::Serialize;
use serde_json::Value;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print `data` in the `{data, error}` envelope (json) or as text.
pub fn print_data<T: Serialize>(data: &T, format: OutputFormat, text: impl FnOnce(&T)) {
    match format {
        OutputFormat::Text => text(data),
        OutputFormat::Json => print_json(&Response::ok(data)),
    }
}

/// Print a list of records, one block per record.
pub fn print_records(records: &[Record], format: OutputFormat) {
    print_data(&records, format, |records| {
        if records.is_empty() {
            println!("No records.");
            return;
        }
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_record_rows(record);
        }
        print_divider();
        println!("{} record(s)", records.len());
    });
}

/// Print one record, or "nothing" for `None`.
pub fn print_optional_record(record: Option<&Record>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&Response {
            data: record,
            error: None,
        }),
        OutputFormat::Text => match record {
            Some(record) => print_record_rows(record),
            None => println!("No record."),
        },
    }
}

fn print_record_rows(record: &Record) {
    for (field, value) in record {
        print_row(field, &display_value(value));
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Print a success message.
pub fn print_success(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", message),
        OutputFormat::Json => print_json(&serde_json::json!({
            "data": {"status": "success", "message": message},
            "error": null,
        })),
    }
}

/// Print an error to stderr.
pub fn print_error(error: &ErrorShape, format: OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {}", error.message),
        OutputFormat::Json => {
            let response: Response<()> = Response {
                data: None,
                error: Some(error.clone()),
            };
            match serde_json::to_string_pretty(&response) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("Error: {}", error.message),
            }
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to encode output: {}", e),
    }
}

/// Print a table row.
pub fn print_row(label: &str, value: &str) {
    println!("  {:<20} {}", format!("{}:", label), value);
}

/// Print a divider line.
pub fn print_divider() {
    println!("{}", "-".repeat(50));
}

/// Print a heading.
pub fn print_heading(text: &str) {
    println!("\n{}", text);
    print_divider();
}
