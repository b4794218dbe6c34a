use attrmap::{AttrKind, AttributeKey, AttributeMap, AttributeMapExt};
use colored::Colorize;
use std::io::IsTerminal;
use unicode_width::UnicodeWidthStr;

const SET_MARKER: &str = "*";
const EMPTY_SCHEMA: &str = "No attributes declared.";

struct Row {
    name: String,
    kind: AttrKind,
    value: String,
    is_set: bool,
}

fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

/// Renders the declared attributes with their defaults.
pub fn render_schema(keys: &[AttributeKey]) -> String {
    render_schema_internal(keys, use_color())
}

fn render_schema_internal(keys: &[AttributeKey], color: bool) -> String {
    if keys.is_empty() {
        return format!("{}\n", EMPTY_SCHEMA);
    }
    let rows: Vec<Row> = keys
        .iter()
        .map(|key| Row {
            name: key.name().to_string(),
            kind: key.kind(),
            value: key.default_value().to_string(),
            is_set: false,
        })
        .collect();
    render_rows(&rows, color)
}

/// Renders every declared attribute's effective value in `map`, marking the
/// ones that are explicitly bound.
pub fn render_map(map: &dyn AttributeMap, keys: &[AttributeKey]) -> String {
    render_map_internal(map, keys, use_color())
}

fn render_map_internal(map: &dyn AttributeMap, keys: &[AttributeKey], color: bool) -> String {
    let header = format!("{} map, {} bound", map.strategy(), map.len());
    let mut output = if color {
        format!("{}\n", header.bold())
    } else {
        format!("{}\n", header)
    };
    if keys.is_empty() {
        output.push_str(EMPTY_SCHEMA);
        output.push('\n');
        return output;
    }

    let rows: Vec<Row> = keys
        .iter()
        .map(|key| Row {
            name: key.name().to_string(),
            kind: key.kind(),
            value: map.effective_value(key).to_string(),
            is_set: map.contains_key(key),
        })
        .collect();
    output.push_str(&render_rows(&rows, color));
    output
}

fn render_rows(rows: &[Row], color: bool) -> String {
    let name_width = rows.iter().map(|r| r.name.width()).max().unwrap_or(0);
    let kind_width = rows.iter().map(|r| r.kind.as_str().len()).max().unwrap_or(0);

    let mut output = String::new();
    for row in rows {
        let marker = if row.is_set { SET_MARKER } else { " " };
        let name = pad_to_width(&row.name, name_width);
        let kind = pad_to_width(row.kind.as_str(), kind_width);
        let line = if color {
            let value = if row.is_set {
                row.value.normal()
            } else {
                row.value.dimmed()
            };
            format!(
                "{} {}  {}  {}",
                marker.green(),
                name.bold(),
                kind.cyan(),
                value
            )
        } else {
            format!("{} {}  {}  {}", marker, name, kind, row.value)
        };
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrmap::{
        Attributes, CharAttribute, DefaultAttributeMap, IntAttribute, ObjectAttribute,
    };

    fn keys() -> (IntAttribute, CharAttribute, ObjectAttribute<String>) {
        (
            IntAttribute::named("count", 1).unwrap(),
            CharAttribute::named("grade", 'C').unwrap(),
            ObjectAttribute::named("descripción", "none".to_string()).unwrap(),
        )
    }

    #[test]
    fn test_render_empty_schema() {
        assert_eq!(render_schema_internal(&[], false), "No attributes declared.\n");
    }

    #[test]
    fn test_render_schema_aligns_columns() {
        let (count, grade, label) = keys();
        let output = render_schema_internal(
            &[count.key().clone(), grade.key().clone(), label.key().clone()],
            false,
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  count        int     1");
        assert_eq!(lines[1], "  grade        char    C");
        assert_eq!(lines[2], "  descripción  object  \"none\"");
    }

    #[test]
    fn test_render_map_marks_bound_entries() {
        let (count, grade, _) = keys();
        let mut map = DefaultAttributeMap::new();
        map.put(&count, 7).unwrap();

        let output = render_map_internal(
            &map,
            &[count.key().clone(), grade.key().clone()],
            false,
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "default map, 1 bound");
        assert_eq!(lines[1], "* count  int   7");
        assert_eq!(lines[2], "  grade  char  C");
    }

    #[test]
    fn test_render_empty_map_without_schema() {
        let output = render_map_internal(Attributes::empty(), &[], false);
        assert_eq!(output, "empty map, 0 bound\nNo attributes declared.\n");
    }
}
