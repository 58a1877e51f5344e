use serde_json::Value;

use crate::Feature;

/// Renders a feature's geometry type and its properties as display text,
/// one `key: value` line per property in key order.
pub fn inspect(feature: &Feature) -> String {
    let kind = feature.geometry.as_ref().map_or("None", |g| g.kind());
    let mut out = format!("Type: {kind}\n");

    if feature.properties.is_empty() {
        out.push_str("No properties");
        return out;
    }

    let mut entries: Vec<_> = feature.properties.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    let lines = entries
        .into_iter()
        .map(|(key, value)| format!("{key}: {}", display_value(value)))
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str(&lines);
    out
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
