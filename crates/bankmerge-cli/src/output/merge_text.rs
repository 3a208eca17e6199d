use std::io;

use serde_json::Value;

use super::format::{Align, Column, key_value_rows, render_table};

pub fn render_merge(data: &Value) -> io::Result<String> {
    let sources = data
        .get("sources")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("merge output requires sources"))?;
    let message = data
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("merge output requires message"))?;

    let rows_written = data.get("rows_written").and_then(Value::as_u64).unwrap_or(0);
    let mut lines = vec![
        format!(
            "Merged {} into {}.",
            plural(u64::try_from(sources.len()).unwrap_or(u64::MAX), "bank export", "bank exports"),
            plural(rows_written, "row", "rows")
        ),
        String::new(),
    ];
    lines.extend(key_value_rows(
        &[
            ("Directory", text_field(data, "work_dir")),
            ("Output", text_field(data, "output_path")),
            ("Format", text_field(data, "format")),
        ],
        2,
    ));

    if sources.is_empty() {
        lines.push(String::new());
        lines.push("No *.csv bank exports were found; the result holds only the header.".to_string());
    } else {
        let columns = [
            Column {
                name: "File",
                align: Align::Left,
            },
            Column {
                name: "Bank",
                align: Align::Left,
            },
            Column {
                name: "Date format",
                align: Align::Left,
            },
            Column {
                name: "Rows",
                align: Align::Right,
            },
        ];
        let rows = sources
            .iter()
            .map(|source| {
                vec![
                    text_field(source, "file_name"),
                    text_field(source, "bank"),
                    source
                        .get("date_format")
                        .and_then(Value::as_str)
                        .unwrap_or("(as read)")
                        .to_string(),
                    source
                        .get("rows_written")
                        .and_then(Value::as_u64)
                        .unwrap_or(0)
                        .to_string(),
                ]
            })
            .collect::<Vec<Vec<String>>>();

        lines.push(String::new());
        lines.push("Sources:".to_string());
        lines.extend(render_table(&columns, &rows));
    }

    lines.push(String::new());
    lines.push(message.to_string());
    Ok(lines.join("\n"))
}

fn text_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn plural(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
