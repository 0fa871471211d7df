//! Selectors
//!
//! Comma-separated lists of compound selectors (`button.fav[data-key]`).
//! Combinators are not supported.

use crate::{DomError, ElementData};

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Attribute { name: String, value: Option<String> },
    Universal,
}

impl SimpleSelector {
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Class(class) => element.has_class(class),
            Self::Attribute { name, value: None } => element.attrs.contains(name),
            Self::Attribute { name, value: Some(value) } => element.get_attr(name) == Some(value.as_str()),
        }
    }
}

/// All parts must match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    parts: Vec<SimpleSelector>,
}

impl CompoundSelector {
    pub fn parse(s: &str) -> Result<Self, DomError> {
        let invalid = || DomError::InvalidSelector(s.to_string());
        let s = s.trim();
        if s.is_empty() || s.contains(char::is_whitespace) {
            return Err(invalid());
        }

        let mut parts = Vec::new();
        let mut rest = s;

        // Leading type selector
        let tag_end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
        let (tag, tail) = rest.split_at(tag_end);
        match tag {
            "" => {}
            "*" => parts.push(SimpleSelector::Universal),
            tag if is_ident(tag) => parts.push(SimpleSelector::Tag(tag.to_ascii_lowercase())),
            _ => return Err(invalid()),
        }
        rest = tail;

        while let Some(first) = rest.chars().next() {
            match first {
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body.find(['#', '.', '[']).unwrap_or(body.len());
                    let name = &body[..end];
                    if !is_ident(name) {
                        return Err(invalid());
                    }
                    parts.push(if first == '#' {
                        SimpleSelector::Id(name.to_string())
                    } else {
                        SimpleSelector::Class(name.to_string())
                    });
                    rest = &body[end..];
                }
                '[' => {
                    let close = rest.find(']').ok_or_else(invalid)?;
                    parts.push(parse_attribute(&rest[1..close]).ok_or_else(invalid)?);
                    rest = &rest[close + 1..];
                }
                _ => return Err(invalid()),
            }
        }

        Ok(Self { parts })
    }

    pub fn matches(&self, element: &ElementData) -> bool {
        self.parts.iter().all(|part| part.matches(element))
    }

    pub fn parts(&self) -> &[SimpleSelector] {
        &self.parts
    }
}

/// Any member may match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<CompoundSelector>,
}

impl SelectorList {
    /// Parse a selector list such as `"[tabindex], button, a, input"`
    pub fn parse(s: &str) -> Result<Self, DomError> {
        let selectors = s
            .split(',')
            .map(CompoundSelector::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    pub fn matches(&self, element: &ElementData) -> bool {
        self.selectors.iter().any(|sel| sel.matches(element))
    }
}

fn parse_attribute(body: &str) -> Option<SimpleSelector> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_string()))
        }
        None => (body.trim(), None),
    };
    is_ident(name).then(|| SimpleSelector::Attribute {
        name: name.to_ascii_lowercase(),
        value,
    })
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
