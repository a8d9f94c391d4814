//! Compact markdown for provider payloads.
//!
//! Repository search results and weather readings get a short bullet list;
//! anything else is shown as pretty-printed JSON.

use std::fmt;

use serde_json::Value;

/// Display wrapper for a step's data.
pub struct Payload<'a>(pub &'a Value);

impl fmt::Display for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(repos) = self.0.get("repositories").and_then(Value::as_array) {
            return fmt_repositories(f, self.0, repos);
        }
        if self.0.get("temperature").is_some() {
            return fmt_weather(f, self.0);
        }
        let pretty = serde_json::to_string_pretty(self.0).map_err(|_| fmt::Error)?;
        writeln!(f, "```json\n{pretty}\n```")
    }
}

fn text<'v>(value: &'v Value, key: &str) -> &'v str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

fn number(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::Number(n)) => n.to_string(),
        _ => "?".to_string(),
    }
}

fn fmt_repositories(f: &mut fmt::Formatter<'_>, data: &Value, repos: &[Value]) -> fmt::Result {
    writeln!(
        f,
        "Found {} repositories, showing {}:",
        number(data, "total_count"),
        repos.len()
    )?;
    writeln!(f)?;
    for repo in repos {
        writeln!(
            f,
            "- [{}]({}) ★ {} ({}): {}",
            text(repo, "full_name"),
            text(repo, "url"),
            number(repo, "stars"),
            text(repo, "language"),
            text(repo, "description"),
        )?;
    }
    Ok(())
}

fn fmt_weather(f: &mut fmt::Formatter<'_>, data: &Value) -> fmt::Result {
    let units = data.get("units").cloned().unwrap_or(Value::Null);
    let temp_unit = units.get("temperature").and_then(Value::as_str).unwrap_or("°C");
    let wind_unit = units.get("wind_speed").and_then(Value::as_str).unwrap_or("km/h");

    let country = text(data, "country");
    if country.is_empty() {
        writeln!(f, "- **City**: {}", text(data, "city"))?;
    } else {
        writeln!(f, "- **City**: {}, {country}", text(data, "city"))?;
    }
    writeln!(f, "- **Condition**: {}", text(data, "condition"))?;
    writeln!(
        f,
        "- **Temperature**: {}{temp_unit} (feels like {}{temp_unit})",
        number(data, "temperature"),
        number(data, "feels_like")
    )?;
    writeln!(f, "- **Humidity**: {}%", number(data, "humidity"))?;
    writeln!(f, "- **Wind**: {} {wind_unit}", number(data, "wind_speed"))
}
