use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::Serialize;

use crate::errors::PathError;
use crate::parser::{ParseError, Scanner};

/// One step of a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Map key or record field.
    Field { name: String },
    /// Position in a collection, reached through `base` first when present.
    Index { base: Option<String>, index: usize },
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field { name } => f.write_str(name),
            Segment::Index { base, index } => {
                write!(f, "{}[{}]", base.as_deref().unwrap_or(""), index)
            }
        }
    }
}

/// A parsed dot/bracket path such as `order.items[2].price`.
///
/// Field names cannot contain a literal `.`; only one index is allowed per
/// dot-separated token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathExpression {
    segments: Vec<Segment>,
}

impl PathExpression {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::malformed(path, "path is empty"));
        }
        let segments = path
            .split('.')
            .map(|token| {
                parse_token(token).map_err(|e| PathError::malformed(path, e.into_message()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a parsed expression.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.iter().join("."))
    }
}

impl FromStr for PathExpression {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_token(token: &str) -> Result<Segment, ParseError> {
    if token.is_empty() {
        return Err(ParseError::InvalidSyntax("empty segment".into()));
    }
    let Some(open) = token.find('[') else {
        if token.contains(']') {
            return Err(ParseError::InvalidSyntax(format!(
                "`]` without matching `[` in `{token}`"
            )));
        }
        return Ok(Segment::Field {
            name: token.to_string(),
        });
    };

    let base = &token[..open];
    if base.contains(']') {
        return Err(ParseError::InvalidSyntax(format!("`]` before `[` in `{token}`")));
    }

    let mut p = Scanner::new(&token[open..]);
    p.expect('[')?;
    let content = p.capture_until(']')?;
    p.expect(']')?;
    if !p.eof() {
        return Err(ParseError::InvalidSyntax(format!(
            "unexpected text after index in `{token}`"
        )));
    }

    let mut digits = Scanner::new(content);
    let index = digits.parse_index()?;
    if !digits.eof() {
        return Err(ParseError::InvalidSyntax(format!(
            "index must be a non-negative integer, found `{content}`"
        )));
    }

    Ok(Segment::Index {
        base: (!base.is_empty()).then(|| base.to_string()),
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(name: &str) -> Segment {
        Segment::Field { name: name.into() }
    }

    #[test]
    fn plain_name_is_single_field() {
        let p = PathExpression::parse("order").unwrap();
        assert_eq!(p.segments(), &[field("order")]);
        assert_eq!(p.len(), 1);
        assert!(!p.is_empty());
    }

    #[test]
    fn dotted_path_with_indices() {
        let p = PathExpression::parse("order.items[2].price").unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(
            p.segments(),
            &[
                field("order"),
                Segment::Index {
                    base: Some("items".into()),
                    index: 2
                },
                field("price"),
            ]
        );
        assert_eq!(p.to_string(), "order.items[2].price");
    }

    #[test]
    fn bare_index_has_no_base() {
        let p: PathExpression = "[10].name".parse().unwrap();
        assert_eq!(
            p.segments()[0],
            Segment::Index {
                base: None,
                index: 10
            }
        );
    }

    #[test]
    fn malformed_paths() {
        for bad in [
            "", "a..b", ".a", "a.", "a[-1]", "a[x]", "a[]", "a[1", "a]1[", "a]", "a[1]x",
            "a[0][1]", "a[ 1 ]", "a[1.5]",
        ] {
            match PathExpression::parse(bad) {
                Err(PathError::MalformedPath { path, .. }) => assert_eq!(path, bad),
                other => panic!("expected MalformedPath for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn field_names_keep_unusual_characters() {
        let p = PathExpression::parse("headers.content-type").unwrap();
        assert_eq!(p.segments()[1], field("content-type"));
    }
}
