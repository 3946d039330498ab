//! The template service boundary.
//!
//! The core only needs `render(source, context) -> text`. Any engine can sit
//! behind [`TemplateEngine`]; [`PlaceholderEngine`] is the built-in one and
//! only substitutes `{{ dotted.path }}` tags.

use serde_json::Value;
use thiserror::Error;

/// Syntax or missing-variable failure reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

pub trait TemplateEngine {
    fn render(&self, source: &str, context: &Value) -> Result<String, EngineError>;
}

/// Substitutes `{{ path }}` tags with scalar values from the context.
///
/// Paths are dot-separated object keys; numeric segments index arrays.
/// Strings are inserted verbatim, numbers and booleans in their JSON form,
/// null as nothing. Objects and arrays cannot be inserted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderEngine;

impl TemplateEngine for PlaceholderEngine {
    fn render(&self, source: &str, context: &Value) -> Result<String, EngineError> {
        let mut out = String::with_capacity(source.len());
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let body = &rest[start + 2..];
            let end = body.find("}}").ok_or_else(|| {
                EngineError(format!("unterminated tag at byte {}", offset + start))
            })?;
            let path = body[..end].trim();
            if path.is_empty() {
                return Err(EngineError(format!("empty tag at byte {}", offset + start)));
            }

            match lookup(context, path) {
                Some(Value::String(s)) => out.push_str(s),
                Some(Value::Null) => {}
                Some(v @ (Value::Number(_) | Value::Bool(_))) => out.push_str(&v.to_string()),
                Some(_) => {
                    return Err(EngineError(format!(
                        "variable '{}' is not a scalar",
                        path
                    )))
                }
                None => return Err(EngineError(format!("missing variable '{}'", path))),
            }

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn lookup<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(root, |node, seg| match node {
        Value::Object(map) => map.get(seg),
        Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> Value {
        json!({
            "report": {"title": "10.2.0 value-only", "tag": "a-vs-b"},
            "runs": [{"tag": "a"}, {"tag": "b"}],
            "count": 3,
            "nothing": null,
            "nested": {"k": 1}
        })
    }

    #[test]
    fn substitutes_paths() {
        let out = PlaceholderEngine
            .render("# {{ report.title }} ({{report.tag}}) {{ runs.1.tag }} n={{count}}{{nothing}}", &ctx())
            .unwrap();
        assert_eq!(out, "# 10.2.0 value-only (a-vs-b) b n=3");
    }

    #[test]
    fn text_without_tags_passes_through() {
        let src = "\\begin{tabular}{lr}\n{single}\n";
        assert_eq!(PlaceholderEngine.render(src, &ctx()).unwrap(), src);
    }

    #[test]
    fn missing_variable_is_an_error() {
        let err = PlaceholderEngine
            .render("{{ report.author }}", &ctx())
            .unwrap_err();
        assert_eq!(err.0, "missing variable 'report.author'");
    }

    #[test]
    fn syntax_errors() {
        let err = PlaceholderEngine.render("ok {{ report.title", &ctx()).unwrap_err();
        assert_eq!(err.0, "unterminated tag at byte 3");

        let err = PlaceholderEngine.render("x{{  }}", &ctx()).unwrap_err();
        assert_eq!(err.0, "empty tag at byte 1");

        let err = PlaceholderEngine.render("{{ nested }}", &ctx()).unwrap_err();
        assert!(err.0.contains("not a scalar"));
    }
}
