//! Path templates with named variable segments.
//!
//! A template such as `/users/{user_id}/OS-OAUTH1/access_tokens` is parsed
//! into literal and variable segments at registration time. Matching is
//! segment-wise with no regex, so lookup cost is linear in path length and
//! the same input always produces the same result.

use std::collections::HashMap;

use thiserror::Error;

/// Problems detected while parsing a path template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Templates are absolute paths.
    #[error("path template `{0}` must start with '/'")]
    MissingLeadingSlash(String),

    /// Empty segments (`//` or a trailing `/`) are rejected.
    #[error("path template `{0}` contains an empty segment")]
    EmptySegment(String),

    /// A segment mixes braces and literals, or names an invalid variable.
    #[error("path template `{template}` has a malformed segment `{segment}`")]
    MalformedSegment { template: String, segment: String },

    /// The same variable cannot capture two segments.
    #[error("variable `{variable}` appears more than once in `{template}`")]
    DuplicateVariable { template: String, variable: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed path template, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template string into segments.
    ///
    /// A variable segment is a whole segment of the form `{name}` where
    /// `name` is `[A-Za-z0-9_]+`. Anything else is treated as a literal,
    /// except segments that merely contain braces, which are rejected.
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        if !raw.starts_with('/') {
            return Err(TemplateError::MissingLeadingSlash(raw.to_string()));
        }

        let mut segments = Vec::new();
        let mut seen = Vec::new();

        for piece in raw[1..].split('/') {
            if piece.is_empty() {
                return Err(TemplateError::EmptySegment(raw.to_string()));
            }

            if let Some(name) = piece.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                let valid = !name.is_empty()
                    && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
                if !valid {
                    return Err(TemplateError::MalformedSegment {
                        template: raw.to_string(),
                        segment: piece.to_string(),
                    });
                }
                if seen.contains(&name) {
                    return Err(TemplateError::DuplicateVariable {
                        template: raw.to_string(),
                        variable: name.to_string(),
                    });
                }
                seen.push(name);
                segments.push(Segment::Variable(name.to_string()));
            } else if piece.contains('{') || piece.contains('}') {
                return Err(TemplateError::MalformedSegment {
                    template: raw.to_string(),
                    segment: piece.to_string(),
                });
            } else {
                segments.push(Segment::Literal(piece.to_string()));
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The template exactly as it was declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Variable names in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Number of literal segments. Used to rank competing matches: a
    /// template with more fixed segments is the more specific one.
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Whether two templates collide structurally: equal length, equal
    /// literals, variables in the same positions. Templates that differ
    /// only in variable names still collide.
    pub fn same_shape(&self, other: &PathTemplate) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    (Segment::Variable(_), Segment::Variable(_)) => true,
                    _ => false,
                })
    }

    /// Match a concrete path against the template.
    ///
    /// Returns the captured variable values on a full match. Empty path
    /// segments never match a variable.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let path = path.strip_prefix('/')?;
        let pieces: Vec<&str> = path.split('/').collect();
        if pieces.len() != self.segments.len() {
            return None;
        }

        let mut captured = HashMap::new();
        for (segment, piece) in self.segments.iter().zip(&pieces) {
            match segment {
                Segment::Literal(expected) => {
                    if expected != piece {
                        return None;
                    }
                }
                Segment::Variable(name) => {
                    if piece.is_empty() {
                        return None;
                    }
                    captured.insert(name.clone(), (*piece).to_string());
                }
            }
        }
        Some(captured)
    }

    /// Substitute variables to produce a concrete path. Returns `None`
    /// when a variable is missing from the map.
    pub fn fill(&self, vars: &HashMap<String, String>) -> Option<String> {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Literal(lit) => out.push_str(lit),
                Segment::Variable(name) => out.push_str(vars.get(name)?),
            }
        }
        Some(out)
    }
}
