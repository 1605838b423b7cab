use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate.
///
/// Analyzer payloads arrive as a `{ uiMode, response }` envelope; the
/// response body becomes the table and the uiMode tag is printed as a
/// footer line.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(response) = map.get("response") {
                print_response_table(response, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_response_table(response: &Value, envelope: &serde_json::Map<String, Value>) {
    match response {
        Value::Object(res_map) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in res_map {
                builder.push_record([key.as_str(), &format_value(val)]);
            }
            let table = Table::from(builder);
            println!("{}", table);
        }
        // Chat prompts carry a plain question string as the response.
        Value::String(s) => {
            println!("{}", s);
            if let Some(Value::String(field)) = envelope.get("pendingField") {
                println!("(answers field: {})", field);
            }
        }
        other => println!("{}", other),
    }

    if let Some(Value::String(mode)) = envelope.get("uiMode") {
        println!("\nCard: {}", mode);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(&row);
            }
        }

        let table = Table::from(builder);
        println!("{}", table);
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            if arr.iter().all(|v| v.is_string()) {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            } else {
                serde_json::to_string(value).unwrap_or_default()
            }
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
