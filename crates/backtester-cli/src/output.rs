use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(data: &Value, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(data)?
            } else {
                serde_json::to_string(data)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => {
            for line in table_lines(data)? {
                println!("{line}");
            }
        }
    }

    Ok(())
}

/// Scalars print as `key: value`; nested values print indented as JSON.
fn table_lines(data: &Value) -> Result<Vec<String>, CliError> {
    let Value::Object(fields) = data else {
        return Ok(serde_json::to_string_pretty(data)?
            .lines()
            .map(str::to_owned)
            .collect());
    };

    let width = fields.keys().map(String::len).max().unwrap_or(0);
    let mut lines = Vec::new();
    for (key, value) in fields {
        match value {
            Value::Object(_) | Value::Array(_) => {
                lines.push(format!("{key}:"));
                for line in serde_json::to_string_pretty(value)?.lines() {
                    lines.push(format!("  {line}"));
                }
            }
            Value::String(text) => lines.push(format!("{key:<width$}: {text}")),
            other => lines.push(format!("{key:<width$}: {other}")),
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn table_aligns_scalar_keys_and_indents_nested_values() {
        let lines = table_lines(&json!({
            "end": "2020-12-01",
            "observations": 12,
            "members": ["VTI"],
        }))
        .expect("renders");

        assert_eq!(lines[0], "end         : 2020-12-01");
        assert_eq!(lines[1], "members:");
        assert_eq!(lines[2], "  [");
        assert!(lines.contains(&String::from("observations: 12")));
    }
}
