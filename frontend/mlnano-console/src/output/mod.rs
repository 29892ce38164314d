use mlnano_models::DataSetRecord;
use serde_json::{Value, json};

pub use crate::types::OutputFormat;

/// Output formatting interface
pub trait Formatter {
    fn format(&self, data: &Value) -> anyhow::Result<String>;
}

pub struct JsonFormatter;
pub struct YamlFormatter;
pub struct TableFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, data: &Value) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

impl Formatter for YamlFormatter {
    fn format(&self, data: &Value) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(data)?)
    }
}

/// Columns shown by the table format, in order.
const TABLE_COLUMNS: [&str; 4] = ["id", "name", "key", "createdAt"];

impl Formatter for TableFormatter {
    fn format(&self, data: &Value) -> anyhow::Result<String> {
        let Value::Array(items) = data else {
            return Ok(data.to_string());
        };
        if items.is_empty() {
            return Ok("No data sets".to_string());
        }

        let rows: Vec<Vec<String>> = items
            .iter()
            .map(|item| {
                TABLE_COLUMNS
                    .iter()
                    .map(|column| format_value(item.get(*column).unwrap_or(&Value::Null)))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = TABLE_COLUMNS.iter().map(|c| c.len()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let render = |cells: Vec<&str>| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let header = render(TABLE_COLUMNS.to_vec());
        let mut table = String::new();
        table.push_str(&header);
        table.push('\n');
        table.push_str(&"-".repeat(header.len()));
        table.push('\n');
        for row in &rows {
            table.push_str(&render(row.iter().map(String::as_str).collect()));
            table.push('\n');
        }
        Ok(table)
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        _ => value.to_string(),
    }
}

/// Get formatter for the specified output format
pub fn get_formatter(format: &OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Yaml => Box::new(YamlFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}

/// Records as handed to a formatter. The table view flattens the file
/// reference down to its key.
pub fn data_sets_value(
    data_sets: &[DataSetRecord],
    format: &OutputFormat,
) -> anyhow::Result<Value> {
    match format {
        OutputFormat::Table => Ok(Value::Array(
            data_sets
                .iter()
                .map(|record| {
                    json!({
                        "id": record.id,
                        "name": record.name,
                        "key": record.file.key,
                        "createdAt": record.created_at.to_rfc3339(),
                    })
                })
                .collect(),
        )),
        _ => Ok(serde_json::to_value(data_sets)?),
    }
}

pub fn format_data_sets(
    data_sets: &[DataSetRecord],
    format: &OutputFormat,
) -> anyhow::Result<String> {
    let value = data_sets_value(data_sets, format)?;
    get_formatter(format).format(&value)
}

/// Global output arguments that can be added to any command
#[derive(clap::Args, Clone, Debug)]
pub struct OutputArgs {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mlnano_models::S3Object;

    fn record(id: &str, name: &str) -> DataSetRecord {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        DataSetRecord {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            file: S3Object {
                bucket: "b".to_string(),
                region: "r".to_string(),
                key: format!("{id}-data.csv"),
            },
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_table_flattens_file_key() {
        let out = format_data_sets(
            &[record("1", "iris"), record("22", "mnist")],
            &OutputFormat::Table,
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id | name  | key"));
        assert!(lines[2].contains("iris"));
        assert!(lines[2].contains("1-data.csv"));
        assert!(lines[3].contains("2024-01-02T03:04:05+00:00"));
    }

    #[test]
    fn test_table_empty() {
        let out = format_data_sets(&[], &OutputFormat::Table).unwrap();
        assert_eq!(out, "No data sets");
    }

    #[test]
    fn test_json_keeps_record_shape() {
        let out = format_data_sets(&[record("1", "iris")], &OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["file"]["key"], "1-data.csv");
        assert_eq!(value[0]["createdAt"], "2024-01-02T03:04:05Z");
    }

    #[test]
    fn test_yaml_output() {
        let out = format_data_sets(&[record("1", "iris")], &OutputFormat::Yaml).unwrap();
        assert!(out.contains("name: iris"));
    }
}
