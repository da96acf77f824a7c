//! Path template compilation.
//!
//! Templates like `/users/{id:number}` are translated into anchored regular
//! expressions with named capture groups. Capture kinds are resolved before
//! the surrounding braces are emitted so a kind suffix can never leak into
//! the matched text:
//!
//! - `{name:number}` matches digits and `.` (`[0-9.]+`)
//! - `{name:string}` matches alphanumerics and `_` (`[0-9A-Za-z_]+`)
//! - `{name}` falls back to the `string` class
//!
//! Everything outside braces is escaped and matched verbatim. The resulting
//! expression is anchored at both ends, so a compiled pattern never matches
//! a prefix of a longer path. Translation is deterministic: the same
//! template always yields the same canonical expression.

use super::core::ParamVec;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Character class for `{name:number}` captures.
const NUMBER_CLASS: &str = "[0-9.]+";
/// Character class for `{name:string}` and untyped `{name}` captures.
const STRING_CLASS: &str = "[0-9A-Za-z_]+";

/// Error raised when a path template cannot be compiled.
///
/// Surfaced at registration time; a route with a malformed template is
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `{` without a matching `}`, or a stray `}` outside a capture.
    UnbalancedBrace { template: String },
    /// A capture with no name, e.g. `{}` or `{:number}`.
    EmptyCaptureName { template: String },
    /// A capture name with characters outside `[A-Za-z0-9_]`.
    InvalidCaptureName { template: String, name: String },
    /// The same capture name used twice in one template.
    DuplicateCaptureName { template: String, name: String },
    /// A kind suffix other than `number` or `string`.
    UnknownCaptureKind { template: String, kind: String },
    /// The substituted expression failed to compile.
    Regex { template: String, message: String },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::UnbalancedBrace { template } => {
                write!(f, "unbalanced brace in path template '{}'", template)
            }
            PatternError::EmptyCaptureName { template } => {
                write!(f, "empty capture name in path template '{}'", template)
            }
            PatternError::InvalidCaptureName { template, name } => {
                write!(
                    f,
                    "invalid capture name '{}' in path template '{}': expected [A-Za-z0-9_]+",
                    name, template
                )
            }
            PatternError::DuplicateCaptureName { template, name } => {
                write!(
                    f,
                    "duplicate capture name '{}' in path template '{}'",
                    name, template
                )
            }
            PatternError::UnknownCaptureKind { template, kind } => {
                write!(
                    f,
                    "unknown capture kind '{}' in path template '{}': expected 'number' or 'string'",
                    kind, template
                )
            }
            PatternError::Regex { template, message } => {
                write!(
                    f,
                    "path template '{}' produced an invalid expression: {}",
                    template, message
                )
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// A compiled path template.
///
/// Owns the anchored regex, its canonical source expression, and the ordered
/// capture names. The canonical form is the route table's uniqueness key:
/// two templates that translate to the same expression are the same route.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    canonical: String,
    param_names: Vec<Arc<str>>,
}

impl CompiledPattern {
    /// The anchored post-translation expression, e.g. `^/users/(?P<id>[0-9.]+)$`.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Capture names in template order.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    /// Test a concrete path against the whole pattern.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match a concrete path and extract named captures.
    ///
    /// Returns `None` when the path does not match. On a match every declared
    /// capture name is present; a name without a captured value maps to the
    /// empty string, so absence and an empty capture are indistinguishable.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(path)?;
        let mut params = ParamVec::new();
        for name in &self.param_names {
            let value = caps
                .name(name.as_ref())
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            params.push((Arc::clone(name), value));
        }
        Some(params)
    }
}

/// Compile a path template into a [`CompiledPattern`].
///
/// # Errors
///
/// Returns a [`PatternError`] for unbalanced braces, empty/invalid/duplicate
/// capture names, or an unknown capture kind.
pub fn compile(template: &str) -> Result<CompiledPattern, PatternError> {
    let mut canonical = String::with_capacity(template.len() + 16);
    canonical.push('^');
    let mut param_names: Vec<Arc<str>> = Vec::new();
    let mut literal = String::new();

    let mut chars = template.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                flush_literal(&mut canonical, &mut literal);
                let mut capture = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    if c == '{' {
                        return Err(PatternError::UnbalancedBrace {
                            template: template.to_string(),
                        });
                    }
                    capture.push(c);
                }
                if !closed {
                    return Err(PatternError::UnbalancedBrace {
                        template: template.to_string(),
                    });
                }
                // Resolve the kind suffix first, then emit the group.
                let (name, kind) = match capture.split_once(':') {
                    Some((name, kind)) => (name, Some(kind)),
                    None => (capture.as_str(), None),
                };
                if name.is_empty() {
                    return Err(PatternError::EmptyCaptureName {
                        template: template.to_string(),
                    });
                }
                if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(PatternError::InvalidCaptureName {
                        template: template.to_string(),
                        name: name.to_string(),
                    });
                }
                if param_names.iter().any(|n| n.as_ref() == name) {
                    return Err(PatternError::DuplicateCaptureName {
                        template: template.to_string(),
                        name: name.to_string(),
                    });
                }
                let class = match kind {
                    Some("number") => NUMBER_CLASS,
                    Some("string") | None => STRING_CLASS,
                    Some(other) => {
                        return Err(PatternError::UnknownCaptureKind {
                            template: template.to_string(),
                            kind: other.to_string(),
                        })
                    }
                };
                canonical.push_str("(?P<");
                canonical.push_str(name);
                canonical.push('>');
                canonical.push_str(class);
                canonical.push(')');
                param_names.push(Arc::from(name));
            }
            '}' => {
                return Err(PatternError::UnbalancedBrace {
                    template: template.to_string(),
                })
            }
            _ => literal.push(ch),
        }
    }
    flush_literal(&mut canonical, &mut literal);
    canonical.push('$');

    let regex = Regex::new(&canonical).map_err(|err| PatternError::Regex {
        template: template.to_string(),
        message: err.to_string(),
    })?;

    Ok(CompiledPattern {
        regex,
        canonical,
        param_names,
    })
}

fn flush_literal(canonical: &mut String, literal: &mut String) {
    if !literal.is_empty() {
        canonical.push_str(&regex::escape(literal));
        literal.clear();
    }
}
