//! A small CSS selector engine for the headless surface
//!
//! Supports what the page hooks use: type, `#id`, `.class`, `*`, `[attr]`,
//! `[attr="v"]`, `[attr^="v"]`, the descendant combinator and comma lists.

use thiserror::Error;

use super::ElementId;

/// Selector text that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector `{selector}`: {reason}")]
pub struct SelectorError {
    /// The offending selector
    pub selector: String,
    /// What went wrong
    pub reason: &'static str,
}

/// Read access a DOM needs to provide for matching
pub trait SelectorTarget {
    /// Lowercase tag name
    fn tag_name(&self, el: ElementId) -> Option<&str>;
    /// Attribute value (`id` included, `class` excluded)
    fn attr(&self, el: ElementId, name: &str) -> Option<&str>;
    /// Class membership
    fn has_class_name(&self, el: ElementId, class: &str) -> bool;
    /// Parent element
    fn parent_of(&self, el: ElementId) -> Option<ElementId>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches<T: SelectorTarget + ?Sized>(&self, dom: &T, el: ElementId) -> bool {
        if let Some(tag) = &self.tag
            && dom.tag_name(el) != Some(tag.as_str())
        {
            return false;
        }
        if let Some(id) = &self.id
            && dom.attr(el, "id") != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| dom.has_class_name(el, c)) {
            return false;
        }
        self.attrs.iter().all(|a| {
            let value = dom.attr(el, &a.name);
            match &a.op {
                AttrOp::Exists => value.is_some(),
                AttrOp::Equals(want) => value == Some(want.as_str()),
                AttrOp::Prefix(want) => value.is_some_and(|v| v.starts_with(want.as_str())),
            }
        })
    }
}

/// A parsed, comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    /// Each entry is a descendant chain, outermost first
    alternatives: Vec<Vec<Compound>>,
}

impl SelectorList {
    /// Parse selector text
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] for empty input or unsupported syntax.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let fail = |reason| SelectorError {
            selector: input.to_string(),
            reason,
        };

        let mut alternatives = Vec::new();
        for part in input.split(',') {
            let mut chain = Vec::new();
            for word in part.split_whitespace() {
                chain.push(parse_compound(word).map_err(fail)?);
            }
            if chain.is_empty() {
                return Err(fail("empty selector"));
            }
            alternatives.push(chain);
        }
        Ok(Self { alternatives })
    }

    /// Whether `el` matches any alternative
    pub fn matches<T: SelectorTarget + ?Sized>(&self, dom: &T, el: ElementId) -> bool {
        self.alternatives
            .iter()
            .any(|chain| matches_chain(dom, el, chain))
    }
}

fn matches_chain<T: SelectorTarget + ?Sized>(dom: &T, el: ElementId, chain: &[Compound]) -> bool {
    let Some((last, mut remaining)) = chain.split_last() else {
        return false;
    };
    if !last.matches(dom, el) {
        return false;
    }

    // Descendant-only chains can be matched greedily from the right.
    let mut cursor = dom.parent_of(el);
    while let Some((want, before)) = remaining.split_last() {
        loop {
            let Some(node) = cursor else {
                return false;
            };
            cursor = dom.parent_of(node);
            if want.matches(dom, node) {
                remaining = before;
                break;
            }
        }
    }
    true
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], pos: &mut usize) -> Result<String, &'static str> {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    if *pos == start {
        return Err("expected identifier");
    }
    Ok(chars[start..*pos].iter().collect())
}

fn parse_compound(word: &str) -> Result<Compound, &'static str> {
    let chars: Vec<char> = word.chars().collect();
    let mut compound = Compound::default();
    let mut pos = 0;
    let mut universal = false;

    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                pos += 1;
                compound.id = Some(take_ident(&chars, &mut pos)?);
            }
            '.' => {
                pos += 1;
                compound.classes.push(take_ident(&chars, &mut pos)?);
            }
            '[' => {
                pos += 1;
                compound.attrs.push(parse_attr(&chars, &mut pos)?);
            }
            '*' if pos == 0 => {
                pos += 1;
                universal = true;
            }
            c if is_ident_char(c) && pos == 0 => {
                compound.tag = Some(take_ident(&chars, &mut pos)?.to_ascii_lowercase());
            }
            '>' | '+' | '~' => return Err("only the descendant combinator is supported"),
            _ => return Err("unexpected character"),
        }
    }

    if compound.is_empty() && !universal {
        return Err("empty compound selector");
    }
    Ok(compound)
}

fn parse_attr(chars: &[char], pos: &mut usize) -> Result<AttrMatch, &'static str> {
    let name = take_ident(chars, pos)?.to_ascii_lowercase();
    let prefix = match chars.get(*pos) {
        Some(']') => {
            *pos += 1;
            return Ok(AttrMatch {
                name,
                op: AttrOp::Exists,
            });
        }
        Some('=') => {
            *pos += 1;
            false
        }
        Some('^') if chars.get(*pos + 1) == Some(&'=') => {
            *pos += 2;
            true
        }
        _ => return Err("unsupported attribute operator"),
    };

    let value = match chars.get(*pos).copied() {
        Some(quote) if quote == '"' || quote == '\'' => {
            *pos += 1;
            let start = *pos;
            while *pos < chars.len() && chars[*pos] != quote {
                *pos += 1;
            }
            if *pos >= chars.len() {
                return Err("unterminated attribute value");
            }
            let value: String = chars[start..*pos].iter().collect();
            *pos += 1;
            value
        }
        _ => take_ident(chars, pos)?,
    };

    if chars.get(*pos) != Some(&']') {
        return Err("expected `]`");
    }
    *pos += 1;

    let op = if prefix {
        AttrOp::Prefix(value)
    } else {
        AttrOp::Equals(value)
    };
    Ok(AttrMatch { name, op })
}
