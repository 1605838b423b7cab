use serde_json::Value;

/// Print just the headline number from the output.
///
/// Walks the response for well-known result fields in priority order,
/// then falls back to the first field. Scenario payloads nest their
/// headline a level or two down, so the lookup recurses.
pub fn print_minimal(value: &Value) {
    let response = value
        .as_object()
        .and_then(|m| m.get("response"))
        .unwrap_or(value);

    // The chat-prompt envelope carries a plain string response.
    if let Value::String(s) = response {
        println!("{}", s);
        return;
    }

    let priority_keys = [
        "roi_percent",
        "gross_profit",
        "dscr",
        "headline_apr",
        "total_out_of_pocket",
        "monthly_burn",
        "title",
        "question",
        "loan_amount",
    ];

    for key in &priority_keys {
        if let Some(val) = find_key(response, key) {
            if !val.is_null() {
                println!("{}", format_minimal(val));
                return;
            }
        }
    }

    if let Value::Object(map) = response {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(response));
}

/// Depth-first key lookup through nested response objects.
fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    if let Some(v) = map.get(key) {
        return Some(v);
    }
    map.values().find_map(|v| find_key(v, key))
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
