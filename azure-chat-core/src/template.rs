//! Prompt templates with `{name}` placeholders.
//!
//! A template is parsed once into literal and variable segments. `{{` and `}}`
//! render as literal braces. Every placeholder must be supplied when the
//! template is formatted; a template is never rendered partially.

use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while parsing or formatting a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// One or more placeholders had no value.
    #[error("Missing template variables: [{}]", .0.join(", "))]
    MissingVariables(Vec<String>),

    /// A `{` was never closed.
    #[error("Unclosed placeholder starting at byte {0}")]
    UnclosedPlaceholder(usize),

    /// A `}` appeared outside a placeholder.
    #[error("Unmatched '}}' at byte {0}")]
    UnmatchedClosingBrace(usize),

    /// A placeholder had no name, as in `{}`.
    #[error("Empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),
}

impl TemplateError {
    /// Names of the missing variables, if this is a missing-variable error.
    #[must_use]
    pub fn missing_variables(&self) -> Option<&[String]> {
        match self {
            TemplateError::MissingVariables(names) => Some(names),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse a template string.
    pub fn parse(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let segments = parse_segments(&source)?;
        Ok(Self { source, segments })
    }

    /// The original template text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of first appearance.
    #[must_use]
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder from `variables`.
    ///
    /// Fails with [`TemplateError::MissingVariables`] listing every
    /// placeholder that has no entry. Unused entries are ignored.
    pub fn format(&self, variables: &HashMap<String, String>) -> Result<String, TemplateError> {
        let missing: Vec<String> = self
            .input_variables()
            .into_iter()
            .filter(|name| !variables.contains_key(*name))
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            return Err(TemplateError::MissingVariables(missing));
        }

        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    if let Some(value) = variables.get(name) {
                        out.push_str(value);
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Parse and format `template` in one step.
pub fn render(template: &str, variables: &HashMap<String, String>) -> Result<String, TemplateError> {
    PromptTemplate::parse(template)?.format(variables)
}

fn parse_segments(source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    literal.push('{');
                    continue;
                }

                let mut name = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    match inner {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(TemplateError::UnclosedPlaceholder(pos)),
                        other => name.push(other),
                    }
                }
                if !closed {
                    return Err(TemplateError::UnclosedPlaceholder(pos));
                }
                if name.is_empty() {
                    return Err(TemplateError::EmptyPlaceholder(pos));
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name));
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    literal.push('}');
                } else {
                    return Err(TemplateError::UnmatchedClosingBrace(pos));
                }
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
