//! URI template matching for resource templates.
//!
//! Templates use RFC 6570 placeholder syntax (`amp://providers/{provider}`).
//! Each placeholder matches one or more characters other than `/`; literal
//! text must match exactly. A template with unbalanced braces, or with a
//! placeholder whose name is empty or only whitespace (`{}`, `{ }`), is kept
//! but never matches anything.

use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed '{{' at byte {0}")]
    UnclosedBrace(usize),

    #[error("unexpected '}}' at byte {0}")]
    UnopenedBrace(usize),

    #[error("nested '{{' at byte {0}")]
    NestedBrace(usize),

    #[error("empty variable at byte {0}")]
    EmptyVariable(usize),

    #[error("pattern failed to compile: {0}")]
    Pattern(String),
}

/// A parsed resource URI template.
#[derive(Debug, Clone)]
pub struct UriTemplate {
    template: String,
    variables: Vec<String>,
    matcher: Result<Regex, TemplateError>,
}

impl UriTemplate {
    /// Parse `template`. Never fails: inspect [`UriTemplate::error`] to find
    /// out whether the template can match anything.
    pub fn parse(template: &str) -> Self {
        match compile(template) {
            Ok((matcher, variables)) => Self {
                template: template.to_string(),
                variables,
                matcher: Ok(matcher),
            },
            Err(err) => Self {
                template: template.to_string(),
                variables: Vec::new(),
                matcher: Err(err),
            },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Variable names in order of appearance.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn error(&self) -> Option<&TemplateError> {
        self.matcher.as_ref().err()
    }

    pub fn is_valid(&self) -> bool {
        self.matcher.is_ok()
    }

    pub fn is_match(&self, uri: &str) -> bool {
        match &self.matcher {
            Ok(re) => re.is_match(uri),
            Err(_) => false,
        }
    }

    /// Variable bindings for `uri`, or `None` when it does not match.
    ///
    /// A name repeated in the template keeps its last binding.
    pub fn captures(&self, uri: &str) -> Option<HashMap<String, String>> {
        let re = self.matcher.as_ref().ok()?;
        let caps = re.captures(uri)?;
        let mut bindings = HashMap::with_capacity(self.variables.len());
        for (index, name) in self.variables.iter().enumerate() {
            if let Some(value) = caps.get(index + 1) {
                bindings.insert(name.clone(), value.as_str().to_string());
            }
        }
        Some(bindings)
    }
}

/// Check if `uri` matches `template`; malformed templates match nothing.
pub fn matches_template(uri: &str, template: &str) -> bool {
    UriTemplate::parse(template).is_match(uri)
}

fn compile(template: &str) -> Result<(Regex, Vec<String>), TemplateError> {
    let mut pattern = String::with_capacity(template.len() + 8);
    let mut variables = Vec::new();
    let mut literal_start = 0;
    let mut open: Option<usize> = None;

    pattern.push('^');
    for (pos, ch) in template.char_indices() {
        match (ch, open) {
            ('{', None) => {
                pattern.push_str(&regex::escape(&template[literal_start..pos]));
                open = Some(pos);
            }
            ('{', Some(_)) => return Err(TemplateError::NestedBrace(pos)),
            ('}', None) => return Err(TemplateError::UnopenedBrace(pos)),
            ('}', Some(start)) => {
                let name = &template[start + 1..pos];
                if name.trim().is_empty() {
                    return Err(TemplateError::EmptyVariable(start));
                }
                variables.push(name.to_string());
                pattern.push_str("([^/]+)");
                open = None;
                literal_start = pos + 1;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        return Err(TemplateError::UnclosedBrace(start));
    }
    pattern.push_str(&regex::escape(&template[literal_start..]));
    pattern.push('$');

    let re = Regex::new(&pattern).map_err(|e| TemplateError::Pattern(e.to_string()))?;
    Ok((re, variables))
}
