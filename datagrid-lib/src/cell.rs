//! Cell rendering policy.
//!
//! Turns a raw JSON value plus its column into something a renderer can
//! draw. With [`CellType::Auto`] the shape of the value decides, in order:
//!
//! 1. an array of `{id, name}` objects becomes a list of linked tags,
//! 2. an absolute URL becomes a hyperlink labeled by its basename,
//! 3. a 24-hex-character identifier becomes a link labeled by its last 7 characters,
//! 4. anything else is plain text or a number.

use serde::Serialize;
use serde_json::Number;
use serde_json::Value;
use url::Url;

use crate::model::CellType;
use crate::model::Column;
use crate::model::Record;

const OBJECT_ID_LEN: usize = 24;
const SHORT_ID_LEN: usize = 7;

/// A linked reference to another object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub href: String,
}

/// What a cell renders as.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Renderable {
    /// Linked reference tags.
    Tags { tags: Vec<Tag> },
    /// A hyperlink.
    Link { href: String, label: String },
    /// Plain text.
    Text { text: String },
    /// A number.
    Number { value: Number },
    /// No value.
    Empty,
}

impl Renderable {
    fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The visible text of the cell.
    pub fn label(&self) -> String {
        match self {
            Self::Tags { tags } => tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", "),
            Self::Link { label, .. } => label.clone(),
            Self::Text { text } => text.clone(),
            Self::Number { value } => value.to_string(),
            Self::Empty => String::new(),
        }
    }
}

/// Renders cell values according to their column's cell type.
///
/// # Example
///
/// ```
/// use datagrid_lib::cell::{CellRenderer, Renderable};
/// use datagrid_lib::model::Column;
/// use serde_json::json;
///
/// let renderer = CellRenderer::new("/materials/");
/// let column = Column::from_path("id").unwrap();
///
/// let cell = renderer.render(Some(&json!("5f3c1a2b9d8e7f6a5b4c3d2e")), &column);
/// assert_eq!(
///     cell,
///     Renderable::Link {
///         href: "/materials/5f3c1a2b9d8e7f6a5b4c3d2e".into(),
///         label: "b4c3d2e".into(),
///     }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRenderer {
    /// Prefix joined with an object id to build its link.
    link_prefix: String,
}

impl Default for CellRenderer {
    fn default() -> Self {
        Self::new("/")
    }
}

impl CellRenderer {
    /// Creates a renderer that links object ids below `link_prefix`.
    pub fn new(link_prefix: impl Into<String>) -> Self {
        Self {
            link_prefix: link_prefix.into(),
        }
    }

    /// Renders the value of `column` in `record`.
    pub fn render_cell(&self, record: &Record, column: &Column) -> Renderable {
        self.render(record.get(&column.id), column)
    }

    /// Renders a raw value.
    pub fn render(&self, value: Option<&Value>, column: &Column) -> Renderable {
        let Some(value) = value else {
            return Renderable::Empty;
        };

        let forced = match column.cell_type {
            CellType::Auto => None,
            CellType::Text => Some(self.plain(value, false)),
            CellType::Number => Some(self.plain(value, true)),
            CellType::Url => value.as_str().and_then(|s| self.url_link(s)),
            CellType::ObjectId => value.as_str().map(|s| self.object_link(s)),
            CellType::References => self.tags(value),
        };
        if let Some(rendered) = forced {
            return rendered;
        }

        self.tags(value)
            .or_else(|| value.as_str().and_then(|s| self.url_link(s)))
            .or_else(|| {
                value
                    .as_str()
                    .filter(|s| is_object_id(s))
                    .map(|s| self.object_link(s))
            })
            .unwrap_or_else(|| self.plain(value, true))
    }

    fn tags(&self, value: &Value) -> Option<Renderable> {
        let items = value.as_array()?;
        if items.is_empty() {
            return None;
        }
        let tags = items
            .iter()
            .map(|item| {
                let id = scalar_string(item.get("id")?)?;
                let name = scalar_string(item.get("name")?)?;
                Some(Tag {
                    href: self.href(&id),
                    id,
                    name,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Renderable::Tags { tags })
    }

    fn url_link(&self, s: &str) -> Option<Renderable> {
        let url = Url::parse(s).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        let label = url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .map(str::to_string)
            .or_else(|| url.host_str().map(str::to_string))
            .unwrap_or_else(|| s.to_string());
        Some(Renderable::Link {
            href: s.to_string(),
            label,
        })
    }

    fn object_link(&self, id: &str) -> Renderable {
        let start = id.len().saturating_sub(SHORT_ID_LEN);
        let label = id.get(start..).unwrap_or(id).to_string();
        Renderable::Link {
            href: self.href(id),
            label,
        }
    }

    fn plain(&self, value: &Value, numbers: bool) -> Renderable {
        match value {
            Value::Null => Renderable::Empty,
            Value::Number(n) if numbers => Renderable::Number { value: n.clone() },
            Value::String(s) => Renderable::text(s.as_str()),
            other => Renderable::text(other.to_string()),
        }
    }

    fn href(&self, id: &str) -> String {
        format!("{}{}", self.link_prefix, id)
    }
}

/// Returns `true` for 24-character hexadecimal identifiers.
pub fn is_object_id(s: &str) -> bool {
    s.len() == OBJECT_ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn auto() -> Column {
        Column::from_path("value").unwrap()
    }

    #[test]
    fn test_reference_tags() {
        let value = json!([{"id": "a1", "name": "Iron"}, {"id": 7, "name": "Oxygen"}]);
        let cell = CellRenderer::new("/refs/").render(Some(&value), &auto());
        let Renderable::Tags { tags } = cell else {
            panic!("expected tags");
        };
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].href, "/refs/a1");
        assert_eq!(tags[1].id, "7");
        assert_eq!(Renderable::Tags { tags }.label(), "Iron, Oxygen");
    }

    #[test]
    fn test_arrays_without_references_are_text() {
        let value = json!([1, 2]);
        assert_eq!(
            CellRenderer::default().render(Some(&value), &auto()),
            Renderable::text("[1,2]")
        );
    }

    #[test]
    fn test_url_basename() {
        let renderer = CellRenderer::default();
        let cell = renderer.render(Some(&json!("https://example.org/files/structure.cif")), &auto());
        assert_eq!(cell.label(), "structure.cif");

        let cell = renderer.render(Some(&json!("https://example.org/")), &auto());
        assert_eq!(cell.label(), "example.org");

        // Not absolute, so plain text.
        let cell = renderer.render(Some(&json!("files/structure.cif")), &auto());
        assert_eq!(cell, Renderable::text("files/structure.cif"));
    }

    #[test]
    fn test_object_id() {
        assert!(is_object_id("5f3c1a2b9d8e7f6a5b4c3d2e"));
        assert!(!is_object_id("5f3c1a2b9d8e7f6a5b4c3d2"));
        assert!(!is_object_id("zf3c1a2b9d8e7f6a5b4c3d2e"));
    }

    #[test]
    fn test_plain_values() {
        let renderer = CellRenderer::default();
        assert_eq!(
            renderer.render(Some(&json!(1.5)), &auto()),
            Renderable::Number { value: Number::from_f64(1.5).unwrap() }
        );
        assert_eq!(renderer.render(Some(&json!(true)), &auto()), Renderable::text("true"));
        assert_eq!(renderer.render(Some(&Value::Null), &auto()), Renderable::Empty);
        assert_eq!(renderer.render(None, &auto()), Renderable::Empty);
    }

    #[test]
    fn test_forced_cell_types() {
        let renderer = CellRenderer::default();
        let text = auto().with_cell_type(CellType::Text);
        assert_eq!(
            renderer.render(Some(&json!("https://example.org/a")), &text),
            Renderable::text("https://example.org/a")
        );
        assert_eq!(renderer.render(Some(&json!(3)), &text), Renderable::text("3"));

        let id = auto().with_cell_type(CellType::ObjectId);
        assert_eq!(renderer.render(Some(&json!("abc")), &id).label(), "abc");
    }

    #[test]
    fn test_render_cell_reads_nested_path() {
        let record = Record::from_value(json!({"data": {"energy": 2}})).unwrap();
        let column = Column::from_path("data.energy").unwrap();
        assert_eq!(
            CellRenderer::default().render_cell(&record, &column).label(),
            "2"
        );
    }
}
