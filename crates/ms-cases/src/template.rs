//! `{{ name }}` placeholder templates.
//!
//! Rendering can be staged: names listed as deferred are written back as
//! `{{name}}` so a later pass (e.g. mesh sizing inside the batch job) can
//! resolve them.

use crate::error::{CaseError, CaseResult};
use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Placeholder name to rendered text.
pub type TemplateValues = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    text: String,
}

impl Template {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn from_file(path: &Path) -> CaseResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CaseError::io(path, e))?;
        Ok(Self::new(path.display().to_string(), text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distinct placeholder names, sorted.
    pub fn placeholders(&self) -> BTreeSet<String> {
        PLACEHOLDER
            .captures_iter(&self.text)
            .map(|c| c[1].to_string())
            .collect()
    }

    /// Substitute `values`, keep `deferred` names as placeholders, and fail
    /// on anything else left over.
    pub fn render(&self, values: &TemplateValues, deferred: &[&str]) -> CaseResult<String> {
        let mut missing = BTreeSet::new();
        let rendered = PLACEHOLDER.replace_all(&self.text, |caps: &Captures| {
            let key = &caps[1];
            if let Some(value) = values.get(key) {
                value.clone()
            } else if deferred.contains(&key) {
                format!("{{{{{key}}}}}")
            } else {
                missing.insert(key.to_string());
                caps[0].to_string()
            }
        });

        if !missing.is_empty() {
            return Err(CaseError::TemplateRender {
                template: self.name.clone(),
                placeholders: missing.into_iter().collect(),
            });
        }
        Ok(rendered.into_owned())
    }
}

/// Render a float the same way every time: shortest round-trip form.
pub fn format_value(value: f64) -> String {
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> TemplateValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_with_and_without_spaces() {
        let t = Template::new("t", "a={{x}} b={{ y }}");
        let out = t.render(&values(&[("x", "1"), ("y", "2.5")]), &[]).unwrap();
        assert_eq!(out, "a=1 b=2.5");
    }

    #[test]
    fn deferred_names_survive_for_second_pass() {
        let t = Template::new("geo", "lc = {{ min_mesh_length }}; r = {{r}};");
        let first = t.render(&values(&[("r", "3")]), &["min_mesh_length"]).unwrap();
        assert_eq!(first, "lc = {{min_mesh_length}}; r = 3;");

        let second = Template::new("geo", first)
            .render(&values(&[("min_mesh_length", "0.003")]), &[])
            .unwrap();
        assert_eq!(second, "lc = 0.003; r = 3;");
    }

    #[test]
    fn unresolved_placeholders_are_reported() {
        let t = Template::new("prm", "{{viscosity}} {{ bogus }} {{other}}");
        let err = t.render(&values(&[("viscosity", "1")]), &[]).unwrap_err();
        match err {
            CaseError::TemplateRender {
                template,
                placeholders,
            } => {
                assert_eq!(template, "prm");
                assert_eq!(placeholders, vec!["bogus".to_string(), "other".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lists_placeholders() {
        let t = Template::new("t", "{{b}} {{a}} {{ b }}");
        let names: Vec<_> = t.placeholders().into_iter().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn floats_format_deterministically() {
        assert_eq!(format_value(0.0625), "0.0625");
        assert_eq!(format_value(2.0), "2");
        assert_eq!(format_value(1e-5), "0.00001");
    }
}
