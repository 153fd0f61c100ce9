//! Domain-spec model: literal text mixed with macro placeholders.

use std::fmt;

use crate::macros::Macro;
use crate::query::QueryContext;
use crate::SpfError;

/// Maximum length of an expanded domain, in octets (RFC 7208 Section 7.3).
pub const MAX_DOMAIN_LEN: usize = 253;

/// One piece of a domain-spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Literal text, stored unescaped.
    Literal(String),
    /// A `%{...}` placeholder, expanded per query.
    Macro(Macro),
}

impl From<Macro> for Fragment {
    fn from(m: Macro) -> Self {
        Fragment::Macro(m)
    }
}

impl From<&str> for Fragment {
    fn from(s: &str) -> Self {
        Fragment::Literal(s.to_string())
    }
}

/// An ordered sequence of fragments forming a domain-spec.
///
/// Rendering with `Display` produces the escaped record form; [`expand`]
/// produces the concrete domain for one query, capped at [`MAX_DOMAIN_LEN`]
/// octets by stripping whole leading labels.
///
/// [`expand`]: DomainSpec::expand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSpec {
    fragments: Vec<Fragment>,
}

impl DomainSpec {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// A domain-spec holding a single literal, the common case for
    /// `include:`/`redirect=` targets without macros.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            fragments: vec![Fragment::Literal(text.into())],
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Expand all fragments against `query` and apply the length cap:
    /// while the result exceeds 253 octets, drop the leading label up to and
    /// including its dot. A single over-long label cannot be reduced this
    /// way and yields `LengthOverflow`.
    pub fn expand(&self, query: &QueryContext) -> Result<String, SpfError> {
        let mut result = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Literal(text) => result.push_str(text),
                Fragment::Macro(m) => result.push_str(&m.expand(query)?),
            }
        }
        while result.len() > MAX_DOMAIN_LEN {
            match result.find('.') {
                Some(pos) => result.drain(..=pos),
                None => return Err(SpfError::LengthOverflow),
            };
        }
        Ok(result)
    }
}

/// Escape a literal fragment for the macro-string alphabet: `%` as `%%`,
/// space as `%_`. Single pass, so produced escapes are never re-escaped.
fn escape_literal(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        match c {
            '%' => write!(f, "%%")?,
            ' ' => write!(f, "%_")?,
            _ => write!(f, "{c}")?,
        }
    }
    Ok(())
}

impl fmt::Display for DomainSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in &self.fragments {
            match fragment {
                Fragment::Literal(text) => escape_literal(f, text)?,
                Fragment::Macro(m) => write!(f, "{m}")?,
            }
        }
        Ok(())
    }
}
