//! Expressions referenced by the instruction stream.
//!
//! An expression is either a bare identifier (`user_id`) or a root
//! identifier followed by member and index steps (`user?.address.lines[0]`).
//! A `?` before a step makes it safe: an absent intermediate value makes the
//! whole access invalid instead of failing.

use std::fmt;

use serde::Deserialize;

use crate::ParseError;
use crate::instruction::ExprRef;

/// One access step of a path expression.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Member {
        #[serde(rename = "member")]
        property: String,
        #[serde(default)]
        safe: bool,
    },
    Index {
        #[serde(rename = "index")]
        position: usize,
        #[serde(default)]
        safe: bool,
    },
}

impl Step {
    pub fn is_safe(&self) -> bool {
        match self {
            Step::Member { safe, .. } | Step::Index { safe, .. } => *safe,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawExpression")]
pub enum Expression {
    /// A bare identifier that must already be bound in scope.
    Simple(String),
    Path { root: String, steps: Vec<Step> },
}

impl Expression {
    /// Parse the textual form: `root`, `root.a`, `root?.a`, `root[0]`, `root?[0]`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidExpression(text.to_string());
        let text = text.trim();
        let root_len = text
            .find(|c: char| !is_ident_char(c))
            .unwrap_or(text.len());
        let root = &text[..root_len];
        if root.is_empty() || root.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut steps = Vec::new();
        let mut rest = &text[root_len..];
        while !rest.is_empty() {
            let safe = rest.starts_with('?');
            if safe {
                rest = &rest[1..];
            }
            if let Some(after_dot) = rest.strip_prefix('.') {
                let len = after_dot
                    .find(|c: char| !is_ident_char(c))
                    .unwrap_or(after_dot.len());
                if len == 0 {
                    return Err(invalid());
                }
                steps.push(Step::Member {
                    property: after_dot[..len].to_string(),
                    safe,
                });
                rest = &after_dot[len..];
            } else if let Some(after_bracket) = rest.strip_prefix('[') {
                let close = after_bracket.find(']').ok_or_else(invalid)?;
                let position = after_bracket[..close]
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| invalid())?;
                steps.push(Step::Index { position, safe });
                rest = &after_bracket[close + 1..];
            } else {
                return Err(invalid());
            }
        }

        if steps.is_empty() {
            Ok(Expression::Simple(root.to_string()))
        } else {
            Ok(Expression::Path {
                root: root.to_string(),
                steps,
            })
        }
    }

    pub fn root(&self) -> &str {
        match self {
            Expression::Simple(name) => name,
            Expression::Path { root, .. } => root,
        }
    }

    pub fn steps(&self) -> &[Step] {
        match self {
            Expression::Simple(_) => &[],
            Expression::Path { steps, .. } => steps,
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root())?;
        for step in self.steps() {
            match step {
                Step::Member { property, safe } => {
                    write!(f, "{}.{}", if *safe { "?" } else { "" }, property)?
                }
                Step::Index { position, safe } => {
                    write!(f, "{}[{}]", if *safe { "?" } else { "" }, position)?
                }
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExpression {
    Text(String),
    Path { root: String, steps: Vec<Step> },
}

impl TryFrom<RawExpression> for Expression {
    type Error = ParseError;

    fn try_from(raw: RawExpression) -> Result<Self, Self::Error> {
        match raw {
            RawExpression::Text(text) => Expression::parse(&text),
            RawExpression::Path { root, steps } if steps.is_empty() => {
                Ok(Expression::Simple(root))
            }
            RawExpression::Path { root, steps } => Ok(Expression::Path { root, steps }),
        }
    }
}

/// Expressions of one unit, addressed by [`ExprRef`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ExpressionCatalog {
    exprs: Vec<Expression>,
}

impl ExpressionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an expression, returning its reference.
    pub fn push(&mut self, expr: Expression) -> ExprRef {
        let id = ExprRef(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    pub fn get(&self, id: ExprRef) -> Option<&Expression> {
        self.exprs.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExprRef, &Expression)> {
        self.exprs
            .iter()
            .enumerate()
            .map(|(i, e)| (ExprRef(i as u32), e))
    }
}

impl FromIterator<Expression> for ExpressionCatalog {
    fn from_iter<I: IntoIterator<Item = Expression>>(iter: I) -> Self {
        Self {
            exprs: iter.into_iter().collect(),
        }
    }
}
