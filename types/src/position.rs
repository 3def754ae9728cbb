//! Source positions and regions as hsdev reports them.

use std::fmt;

use serde_json::Value;

use crate::decode::{self, DecodeResult};

/// 1-based line/column position.
///
/// The service is 1-based; editor-facing consumers subtract 1 when converting
/// to 0-based coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    pub fn parse(value: &Value) -> DecodeResult<Self> {
        Ok(Self {
            line: decode::number(decode::field(value, "line")?, "position line")?,
            column: decode::number(decode::field(value, "column")?, "position column")?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.column == 0 {
            write!(f, "{}", self.line)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Half-open span between two positions, decoded from the wire's `from`/`to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Region {
    pub start: Position,
    pub end: Position,
}

impl Region {
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Region covering `length` characters on one line starting at `start`.
    #[must_use]
    pub fn word(start: Position, length: u32) -> Self {
        let end = Position::new(start.line, start.column + length);
        Self { start, end }
    }

    pub fn parse(value: &Value) -> DecodeResult<Self> {
        Ok(Self {
            start: Position::parse(decode::field(value, "from")?)?,
            end: Position::parse(decode::field(value, "to")?)?,
        })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_position_parse() {
        let pos = Position::parse(&json!({"line": 3, "column": 7})).unwrap();
        assert_eq!(pos, Position::new(3, 7));
    }

    #[test]
    fn test_position_parse_missing_column() {
        let err = Position::parse(&json!({"line": 3})).unwrap_err();
        assert!(err.message().contains("`column`"));
    }

    #[test]
    fn test_position_parse_non_numeric_line() {
        assert!(Position::parse(&json!({"line": "3", "column": 7})).is_err());
    }

    #[test]
    fn test_position_display_omits_zero_column() {
        assert_eq!(Position::new(12, 0).to_string(), "12");
        assert_eq!(Position::new(12, 4).to_string(), "12:4");
    }

    #[test]
    fn test_position_ordering_is_line_then_column() {
        let mut positions = vec![
            Position::new(2, 1),
            Position::new(1, 9),
            Position::new(1, 2),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                Position::new(1, 2),
                Position::new(1, 9),
                Position::new(2, 1),
            ]
        );
    }

    #[test]
    fn test_region_parse_maps_from_to() {
        let region = Region::parse(&json!({
            "from": {"line": 1, "column": 1},
            "to": {"line": 1, "column": 5}
        }))
        .unwrap();
        assert_eq!(region.start, Position::new(1, 1));
        assert_eq!(region.end, Position::new(1, 5));
    }

    #[test]
    fn test_region_parse_missing_to() {
        let err = Region::parse(&json!({"from": {"line": 1, "column": 1}})).unwrap_err();
        assert!(err.message().contains("`to`"));
    }

    #[test]
    fn test_region_word() {
        let region = Region::word(Position::new(4, 10), 3);
        assert_eq!(region.end, Position::new(4, 13));
        assert_eq!(region.to_string(), "4:10-4:13");
    }
}
