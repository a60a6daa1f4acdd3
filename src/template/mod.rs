//! Template engine.
//!
//! A template turns the run snapshot into channel content. There are two
//! forms behind the one [`Template`] trait:
//! - [`TextTemplate`]: a constant string with `{{dotted.path}}` placeholders
//!   resolved against the snapshot's JSON view
//! - [`FnTemplate`]: a pure function of the snapshot
//!
//! Templates are stateless; rendering the same snapshot twice yields the same
//! output.

pub mod defaults;

use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};
use serde_json::Value as JsonValue;

use crate::error::AppResult;
use crate::models::NotificationData;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("placeholder pattern is valid"));

/// Renders a snapshot into a value of type `T`
///
/// `T` is `String` for text channels and `serde_json::Value` for structured
/// payload channels.
pub trait Template<T>: Send + Sync {
    fn render(&self, data: &NotificationData) -> AppResult<T>;

    /// Placeholder source, if this is a text template
    fn source(&self) -> Option<&str> {
        None
    }
}

/// Shared handle stored in channel template bundles
pub type TemplateDef<T = String> = Arc<dyn Template<T>>;

impl<T> fmt::Debug for dyn Template<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source() {
            Some(source) => f.debug_tuple("Template").field(&source).finish(),
            None => f.write_str("Template(<fn>)"),
        }
    }
}

/// Builds a placeholder template
pub fn text<T>(source: impl Into<String>) -> TemplateDef<T>
where
    TextTemplate: Template<T>,
    T: 'static,
{
    Arc::new(TextTemplate::new(source))
}

/// Builds a function template
pub fn func<T, F>(f: F) -> TemplateDef<T>
where
    F: Fn(&NotificationData) -> AppResult<T> + Send + Sync + 'static,
    T: 'static,
{
    Arc::new(FnTemplate(f))
}

// ============================================================================
// Text templates
// ============================================================================

/// Constant string with `{{path}}` placeholders
///
/// Missing paths and `null` values render as the empty string. There is no
/// escaping, nesting or conditional syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTemplate {
    source: String,
}

impl TextTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Substitutes every placeholder against an already-serialised snapshot
    pub fn interpolate(&self, root: &JsonValue) -> String {
        PLACEHOLDER
            .replace_all(&self.source, |caps: &Captures<'_>| {
                lookup(root, caps[1].trim())
                    .map(display_value)
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

impl Template<String> for TextTemplate {
    fn render(&self, data: &NotificationData) -> AppResult<String> {
        if !PLACEHOLDER.is_match(&self.source) {
            return Ok(self.source.clone());
        }
        Ok(self.interpolate(&data.to_json()?))
    }

    fn source(&self) -> Option<&str> {
        Some(&self.source)
    }
}

impl Template<JsonValue> for TextTemplate {
    fn render(&self, data: &NotificationData) -> AppResult<JsonValue> {
        <Self as Template<String>>::render(self, data).map(JsonValue::String)
    }

    fn source(&self) -> Option<&str> {
        Some(&self.source)
    }
}

/// Walks `path` segment by segment. Objects are indexed by key, arrays by
/// numeric segment; anything else ends the walk.
pub fn lookup<'a>(root: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path.split('.').try_fold(root, |current, segment| match current {
        JsonValue::Object(map) => map.get(segment),
        JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        JsonValue::Object(_) => value.to_string(),
    }
}

// ============================================================================
// Function templates
// ============================================================================

/// Pure function of the snapshot. An `Err` is reported by the dispatch loop
/// the same way as a failed send.
pub struct FnTemplate<F>(pub F);

impl<T, F> Template<T> for FnTemplate<F>
where
    F: Fn(&NotificationData) -> AppResult<T> + Send + Sync,
{
    fn render(&self, data: &NotificationData) -> AppResult<T> {
        (self.0)(data)
    }
}
