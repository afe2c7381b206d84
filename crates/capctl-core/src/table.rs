use serde_json::Value;

/// Renders aligned plain-text tables for the common output format.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableGenerator {
    /// Insert a blank line between body rows.
    expanded: bool,
}

impl TableGenerator {
    pub fn new(expanded: bool) -> Self {
        Self { expanded }
    }

    /// Two-column field/value table for a single record, fields in the
    /// order given.
    pub fn build_table_from_item(&self, item: &Value, fields: &[String]) -> String {
        let rows: Vec<Vec<String>> = fields
            .iter()
            .map(|field| vec![field.clone(), field_text(item, field)])
            .collect();
        self.render(&[], &rows)
    }

    /// Header row plus one row per record, columns per named field. When
    /// `include_index` is set, a 1-based `#` column is prepended; the
    /// counter restarts on every call.
    pub fn build_table_from_list(
        &self,
        items: &[Value],
        fields: &[String],
        include_index: bool,
    ) -> String {
        let mut headers: Vec<String> = Vec::with_capacity(fields.len() + 1);
        if include_index {
            headers.push("#".to_string());
        }
        headers.extend(fields.iter().cloned());

        let rows: Vec<Vec<String>> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let mut row = Vec::with_capacity(headers.len());
                if include_index {
                    row.push((i + 1).to_string());
                }
                row.extend(fields.iter().map(|field| field_text(item, field)));
                row
            })
            .collect();
        self.render(&headers, &rows)
    }

    fn render(&self, headers: &[String], rows: &[Vec<String>]) -> String {
        // Calculate column widths across header and body.
        let columns = headers
            .len()
            .max(rows.iter().map(|r| r.len()).max().unwrap_or(0));
        let mut widths = vec![0usize; columns];
        for (i, header) in headers.iter().enumerate() {
            widths[i] = widths[i].max(header.chars().count());
        }
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut lines: Vec<String> = Vec::new();
        if !headers.is_empty() {
            lines.push(format_row(headers, &widths));
            let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
            lines.push(sep.join("  "));
        }
        for (i, row) in rows.iter().enumerate() {
            if self.expanded && i > 0 {
                lines.push(String::new());
            }
            lines.push(format_row(row, &widths));
        }
        lines.join("\n")
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let width = widths.get(i).copied().unwrap_or(0);
            format!("{cell:width$}")
        })
        .collect();
    padded.join("  ").trim_end().to_string()
}

/// Text rendering of one named field of a record. Strings print bare,
/// anything else as compact JSON, absent fields as empty.
pub(crate) fn field_text(item: &Value, field: &str) -> String {
    match item.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Value> {
        vec![
            json!({"name": "light", "ownerType": "user"}),
            json!({"name": "switch", "ownerType": "system"}),
        ]
    }

    #[test]
    fn list_table_aligns_columns() {
        let table = TableGenerator::new(false).build_table_from_list(
            &rows(),
            &["name".to_string(), "ownerType".to_string()],
            false,
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "name    ownerType");
        assert_eq!(lines[1], "------  ---------");
        assert_eq!(lines[2], "light   user");
        assert_eq!(lines[3], "switch  system");
    }

    #[test]
    fn index_column_is_one_based_and_per_call() {
        let generator = TableGenerator::new(false);
        let fields = vec!["name".to_string()];
        let first = generator.build_table_from_list(&rows(), &fields, true);
        assert!(first.contains("1  light"));
        assert!(first.contains("2  switch"));

        // A second call starts back at 1.
        let second = generator.build_table_from_list(&rows(), &fields, true);
        assert!(second.contains("1  light"));
        assert!(!second.contains('3'));
    }

    #[test]
    fn item_table_lists_fields_in_order() {
        let item = json!({"name": "light", "id": "ns.light", "version": 1});
        let table = TableGenerator::new(false).build_table_from_item(
            &item,
            &["name".to_string(), "id".to_string(), "version".to_string()],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("name"));
        assert!(lines[1].starts_with("id"));
        assert!(lines[2].starts_with("version"));
        assert!(lines[2].contains('1'));
    }

    #[test]
    fn expanded_mode_separates_body_rows() {
        let table = TableGenerator::new(true).build_table_from_list(
            &rows(),
            &["name".to_string()],
            false,
        );
        let lines: Vec<&str> = table.lines().collect();
        // header, separator, row, blank, row
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "");
    }

    #[test]
    fn missing_fields_render_empty() {
        let items = vec![json!({"name": "light"})];
        let table = TableGenerator::new(false).build_table_from_list(
            &items,
            &["name".to_string(), "ownerId".to_string()],
            false,
        );
        assert!(table.lines().last().unwrap().trim_end().ends_with("light"));
    }
}
