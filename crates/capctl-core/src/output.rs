//! Output formatters and the final writer: machine formats (JSON/YAML),
//! table formatters for the common format, generic sorting, and the
//! file-or-stdout write.

use crate::error::Result;
use crate::io::atomic_write;
use crate::table::{field_text, TableGenerator};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// Turns one value into final output text.
pub type OutputFormatter<T> = Box<dyn Fn(&T) -> Result<String>>;

// ---------------------------------------------------------------------------
// Machine formats
// ---------------------------------------------------------------------------

/// Pretty-printed JSON with an n-space indent.
pub fn json_formatter<T: Serialize>(indent: usize) -> OutputFormatter<T> {
    Box::new(move |data| {
        let indent_str = " ".repeat(indent);
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_str.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        data.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    })
}

/// YAML output. serde_yaml always emits a two-space indent; the parameter
/// exists for interface parity with the JSON side.
pub fn yaml_formatter<T: Serialize>(_indent: usize) -> OutputFormatter<T> {
    Box::new(move |data| Ok(serde_yaml::to_string(data)?))
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Stable sort by one or more field names, case-insensitive on each field's
/// string representation, ties broken by the following field names. Returns
/// a new sequence; the input is untouched.
pub fn sort<T: Serialize + Clone>(items: &[T], field_names: &[&str]) -> Vec<T> {
    let mut keyed: Vec<(Vec<String>, &T)> = items
        .iter()
        .map(|item| {
            let value = serde_json::to_value(item).unwrap_or(Value::Null);
            let keys = field_names
                .iter()
                .map(|field| field_text(&value, field).to_lowercase())
                .collect();
            (keys, item)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, item)| item.clone()).collect()
}

// ---------------------------------------------------------------------------
// Table formatters
// ---------------------------------------------------------------------------

/// How to name the items of a list in the empty-list message.
#[derive(Debug, Clone, Default)]
pub struct ItemNaming {
    pub singular: Option<String>,
    pub plural: Option<String>,
}

impl ItemNaming {
    pub fn singular(name: impl Into<String>) -> Self {
        Self {
            singular: Some(name.into()),
            plural: None,
        }
    }

    /// Plural name: explicit plural, else singular + `s`, else `items`.
    pub fn plural(&self) -> String {
        if let Some(plural) = &self.plural {
            plural.clone()
        } else if let Some(singular) = &self.singular {
            format!("{singular}s")
        } else {
            "items".to_string()
        }
    }
}

/// Common-format formatter for a single record using the named fields.
pub fn item_table_formatter<T: Serialize>(
    generator: TableGenerator,
    fields: Vec<String>,
) -> OutputFormatter<T> {
    Box::new(move |item| {
        let value = serde_json::to_value(item)?;
        Ok(generator.build_table_from_item(&value, &fields))
    })
}

/// Common-format formatter for a sequence of records. An empty sequence
/// yields a `no <items> found` message instead of a table.
pub fn list_table_formatter<T: Serialize>(
    generator: TableGenerator,
    fields: Vec<String>,
    include_index: bool,
    naming: ItemNaming,
) -> OutputFormatter<Vec<T>> {
    Box::new(move |items| {
        if items.is_empty() {
            return Ok(format!("no {} found", naming.plural()));
        }
        let values = items
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(generator.build_table_from_list(&values, &fields, include_index))
    })
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Write formatted output to `filename` verbatim, or to stdout with a
/// trailing newline appended only when one is missing. I/O failures
/// propagate; there is no retry.
pub fn write_output(data: &str, filename: Option<&Path>) -> Result<()> {
    match filename {
        Some(path) => atomic_write(path, data.as_bytes()),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_with_newline(&mut handle, data)
        }
    }
}

fn write_with_newline<W: Write>(writer: &mut W, data: &str) -> Result<()> {
    writer.write_all(data.as_bytes())?;
    if !data.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct SimpleType {
        str: String,
        num: i64,
    }

    fn st(s: &str) -> SimpleType {
        SimpleType {
            str: s.to_string(),
            num: 1,
        }
    }

    #[test]
    fn sort_handles_empty_input() {
        let input: Vec<SimpleType> = Vec::new();
        assert!(sort(&input, &["str"]).is_empty());
    }

    #[test]
    fn sort_is_case_insensitive_and_stable() {
        let input = vec![st("xyz"), st("abc"), st("ABC")];
        let result = sort(&input, &["str"]);
        // abc and ABC fold to the same key; original relative order holds.
        assert_eq!(result, vec![st("abc"), st("ABC"), st("xyz")]);
        // Input unmodified.
        assert_eq!(input[0], st("xyz"));
    }

    #[test]
    fn sort_is_idempotent() {
        let once = sort(&[st("xyz"), st("abc"), st("ABC")], &["str"]);
        let twice = sort(&once, &["str"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn sort_breaks_ties_with_later_fields() {
        let input = vec![
            SimpleType {
                str: "same".to_string(),
                num: 2,
            },
            SimpleType {
                str: "same".to_string(),
                num: 10,
            },
        ];
        let result = sort(&input, &["str", "num"]);
        // "10" < "2" on string representation.
        assert_eq!(result[0].num, 10);
        assert_eq!(result[1].num, 2);
    }

    #[test]
    fn empty_list_message_defaults_to_items() {
        let formatter = list_table_formatter::<SimpleType>(
            TableGenerator::default(),
            vec!["str".to_string()],
            false,
            ItemNaming::default(),
        );
        assert_eq!(formatter(&Vec::new()).unwrap(), "no items found");
    }

    #[test]
    fn empty_list_message_pluralizes_singular_name() {
        let formatter = list_table_formatter::<SimpleType>(
            TableGenerator::default(),
            vec!["str".to_string()],
            false,
            ItemNaming::singular("thing"),
        );
        assert_eq!(formatter(&Vec::new()).unwrap(), "no things found");
    }

    #[test]
    fn empty_list_message_uses_explicit_plural() {
        let naming = ItemNaming {
            singular: Some("candy".to_string()),
            plural: Some("candies".to_string()),
        };
        let formatter = list_table_formatter::<SimpleType>(
            TableGenerator::default(),
            vec!["str".to_string()],
            false,
            naming,
        );
        assert_eq!(formatter(&Vec::new()).unwrap(), "no candies found");
    }

    #[test]
    fn list_formatter_index_restarts_each_invocation() {
        let formatter = list_table_formatter::<SimpleType>(
            TableGenerator::default(),
            vec!["str".to_string()],
            true,
            ItemNaming::default(),
        );
        let list = vec![st("a"), st("b"), st("c")];
        let first = formatter(&list).unwrap();
        assert!(first.contains("1  a"));
        assert!(first.contains("3  c"));
        let second = formatter(&list).unwrap();
        assert!(second.contains("1  a"));
        assert!(!second.contains("4"));
    }

    #[test]
    fn item_formatter_uses_named_fields_only() {
        let formatter = item_table_formatter::<SimpleType>(
            TableGenerator::default(),
            vec!["str".to_string()],
        );
        let output = formatter(&st("value")).unwrap();
        assert!(output.contains("str"));
        assert!(output.contains("value"));
        assert!(!output.contains("num"));
    }

    #[test]
    fn json_formatter_honors_indent() {
        let formatter = json_formatter::<SimpleType>(2);
        let output = formatter(&st("a_val")).unwrap();
        assert!(output.contains("\n  \"str\": \"a_val\""));

        let wide = json_formatter::<SimpleType>(4);
        let output = wide(&st("a_val")).unwrap();
        assert!(output.contains("\n    \"str\": \"a_val\""));
    }

    #[test]
    fn yaml_formatter_emits_plain_scalars() {
        let formatter = yaml_formatter::<SimpleType>(2);
        let output = formatter(&st("a_val")).unwrap();
        assert!(output.contains("str: a_val"));
    }

    #[test]
    fn writer_appends_newline_when_missing() {
        let mut buf = Vec::new();
        write_with_newline(&mut buf, "data").unwrap();
        assert_eq!(buf, b"data\n");
    }

    #[test]
    fn writer_keeps_existing_newline() {
        let mut buf = Vec::new();
        write_with_newline(&mut buf, "data\n").unwrap();
        assert_eq!(buf, b"data\n");

        let mut buf = Vec::new();
        write_with_newline(&mut buf, "data\n\n").unwrap();
        assert_eq!(buf, b"data\n\n");
    }

    #[test]
    fn write_output_to_file_is_verbatim() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        write_output("data", Some(&path)).unwrap();
        // File writes do not get the stdout newline treatment.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data");
    }
}
