//! CSS selectors
//!
//! The subset page scripts use: type, universal, `#id`, `.class`,
//! attribute selectors (`[a]`, `=`, `^=`, `$=`, `*=`, `~=`), descendant and
//! child combinators, and comma-separated lists. Anything else is a syntax
//! error, as `querySelector` would throw.

use crate::{DomTree, NodeId};

/// Selector syntax error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected '{ch}' at {pos} in selector")]
    Unexpected { ch: char, pos: usize },

    #[error("expected identifier at {0} in selector")]
    ExpectedIdent(usize),

    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
}

/// Parsed selector list
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    groups: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttrSelector {
    name: String,
    op: AttrOp,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Prefix,
    Suffix,
    Contains,
    Includes,
}

impl Selector {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser { chars: input.chars().collect(), pos: 0 };
        let mut groups = vec![parser.complex()?];
        loop {
            parser.skip_ws();
            match parser.peek() {
                None => break,
                Some(',') => {
                    parser.pos += 1;
                    groups.push(parser.complex()?);
                }
                Some(ch) => return Err(SelectorError::Unexpected { ch, pos: parser.pos }),
            }
        }
        Ok(Self { groups })
    }

    /// Check whether an element matches any selector in the list
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.groups
            .iter()
            .any(|g| match_from(tree, node, &g.compounds, &g.combinators))
    }
}

fn match_from(
    tree: &DomTree,
    node: NodeId,
    compounds: &[Compound],
    combinators: &[Combinator],
) -> bool {
    let Some((last, head)) = compounds.split_last() else {
        return false;
    };
    if !last.matches(tree, node) {
        return false;
    }
    if head.is_empty() {
        return true;
    }
    let (comb, head_combinators) = (combinators[head.len() - 1], &combinators[..head.len() - 1]);
    match comb {
        Combinator::Child => tree
            .parent(node)
            .is_some_and(|p| match_from(tree, p, head, head_combinators)),
        Combinator::Descendant => {
            let mut current = tree.parent(node);
            while let Some(p) = current {
                if match_from(tree, p, head, head_combinators) {
                    return true;
                }
                current = tree.parent(p);
            }
            false
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(el) = tree.element(node) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if tag != "*" && *tag != el.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| el.classes.contains(c)) {
            return false;
        }
        self.attrs.iter().all(|attr| {
            let class_value;
            let actual = if attr.name == "class" {
                class_value = el.classes.value();
                Some(class_value.as_str())
            } else {
                el.get_attr(&attr.name)
            };
            let Some(actual) = actual else {
                return false;
            };
            match attr.op {
                AttrOp::Exists => true,
                AttrOp::Equals => actual == attr.value,
                AttrOp::Prefix => !attr.value.is_empty() && actual.starts_with(&attr.value),
                AttrOp::Suffix => !attr.value.is_empty() && actual.ends_with(&attr.value),
                AttrOp::Contains => !attr.value.is_empty() && actual.contains(&attr.value),
                AttrOp::Includes => actual.split_whitespace().any(|t| t == attr.value),
            }
        })
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_ws();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let comb = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(ch) => return Err(SelectorError::Unexpected { ch, pos: self.pos }),
            };
            combinators.push(comb);
            compounds.push(self.compound()?);
        }
        Ok(Complex { compounds, combinators })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                compound.tag = Some("*".into());
            }
            Some(ch) if is_ident_start(ch) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.attribute()?);
                }
                _ => break,
            }
        }
        if compound.is_empty() {
            return match self.peek() {
                None => Err(SelectorError::Empty),
                Some(ch) => Err(SelectorError::Unexpected { ch, pos: self.pos }),
            };
        }
        Ok(compound)
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        match self.peek() {
            Some(ch) if is_ident_start(ch) => {}
            _ => return Err(SelectorError::ExpectedIdent(start)),
        }
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> Result<AttrSelector, SelectorError> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrSelector { name, op: AttrOp::Exists, value: String::new() });
            }
            Some('=') => {
                self.pos += 1;
                AttrOp::Equals
            }
            Some(prefix @ ('^' | '$' | '*' | '~')) if self.chars.get(self.pos + 1) == Some(&'=') => {
                self.pos += 2;
                match prefix {
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    '*' => AttrOp::Contains,
                    _ => AttrOp::Includes,
                }
            }
            None => return Err(SelectorError::UnterminatedAttribute),
            Some(ch) => return Err(SelectorError::Unexpected { ch, pos: self.pos }),
        };
        self.skip_ws();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(SelectorError::UnterminatedAttribute);
                }
                let value = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                value
            }
            _ => self.ident()?,
        };
        self.skip_ws();
        match self.peek() {
            Some(']') => {
                self.pos += 1;
                Ok(AttrSelector { name, op, value })
            }
            None => Err(SelectorError::UnterminatedAttribute),
            Some(ch) => Err(SelectorError::Unexpected { ch, pos: self.pos }),
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '-' || !ch.is_ascii()
}

fn is_ident_char(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}
