//! Query structures
//!
//! Criteria, sort, limit and join specifications accumulated by the
//! builder. Operator and sort-order tags are closed enums parsed from their
//! string forms.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::errors::QueryError;
use crate::collection::Record;

/// Separator between nested key segments
pub const KEY_SEPARATOR: char = '.';

/// Separator between a key path and its alias
pub const ALIAS_DELIMITER: &str = " as ";

/// Date format used when none is given
pub const DEFAULT_DATE_FORMAT: &str = "Y-m-d";

/// Criterion operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    NotEq,
    Contains,
    StartsWith,
    EndsWith,
    InArray,
    InArrayInversed,
    ArrayMatch,
    GtDate,
    GteDate,
    LtDate,
    LteDate,
    EqualsDate,
}

impl Operator {
    /// Every operator, in tag order
    pub const ALL: [Operator; 17] = [
        Operator::Eq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::NotEq,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::InArray,
        Operator::InArrayInversed,
        Operator::ArrayMatch,
        Operator::GtDate,
        Operator::GteDate,
        Operator::LtDate,
        Operator::LteDate,
        Operator::EqualsDate,
    ];

    /// Returns the operator tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::NotEq => "!=",
            Operator::Contains => "CONTAINS",
            Operator::StartsWith => "STARTS_WITH",
            Operator::EndsWith => "ENDS_WITH",
            Operator::InArray => "IN_ARRAY",
            Operator::InArrayInversed => "IN_ARRAY_INVERSED",
            Operator::ArrayMatch => "ARRAY_MATCH",
            Operator::GtDate => "GT_DATE",
            Operator::GteDate => "GTE_DATE",
            Operator::LtDate => "LT_DATE",
            Operator::LteDate => "LTE_DATE",
            Operator::EqualsDate => "EQUALS_DATE",
        }
    }

    /// Returns true if operands are compared as dates
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            Operator::GtDate
                | Operator::GteDate
                | Operator::LtDate
                | Operator::LteDate
                | Operator::EqualsDate
        )
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ARRAY and ARRAY_INVERSED are the older spellings
        match s {
            "ARRAY" => return Ok(Operator::InArray),
            "ARRAY_INVERSED" => return Ok(Operator::InArrayInversed),
            _ => {}
        }
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| QueryError::InvalidOperator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dotted key path with an optional alias: `"company.name as c"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    path: String,
    alias: Option<String>,
}

impl KeyPath {
    /// Parses a key expression. Everything after the first ` as ` is the alias.
    pub fn parse(expr: &str) -> Self {
        match expr.split_once(ALIAS_DELIMITER) {
            Some((path, alias)) => Self {
                path: path.trim().to_string(),
                alias: Some(alias.trim().to_string()),
            },
            None => Self {
                path: expr.to_string(),
                alias: None,
            },
        }
    }

    /// The dotted path without alias
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split(KEY_SEPARATOR)
    }

    /// First segment, the top-level field the path starts from
    pub fn root(&self) -> &str {
        self.segments().next().unwrap_or("")
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{}{}{}", self.path, ALIAS_DELIMITER, alias),
            None => f.write_str(&self.path),
        }
    }
}

impl From<&str> for KeyPath {
    fn from(s: &str) -> Self {
        KeyPath::parse(s)
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub key: KeyPath,
    pub operator: Operator,
    pub value: Value,
    pub date_format: Option<String>,
}

impl Criterion {
    pub fn new(key: &str, operator: Operator, value: Value) -> Self {
        Self {
            key: KeyPath::parse(key),
            operator,
            value,
            date_format: None,
        }
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }
}

/// Sort order tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
    DateAsc,
    DateDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
            SortOrder::DateAsc => "DATE_ASC",
            SortOrder::DateDesc => "DATE_DESC",
        }
    }

    /// True for orders that reverse the ascending pass
    pub fn is_descending(&self) -> bool {
        matches!(self, SortOrder::Desc | SortOrder::DateDesc)
    }

    pub fn is_date(&self) -> bool {
        matches!(self, SortOrder::DateAsc | SortOrder::DateDesc)
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            "DATE_ASC" => Ok(SortOrder::DateAsc),
            "DATE_DESC" => Ok(SortOrder::DateDesc),
            other => Err(QueryError::InvalidSortOrder(other.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort specification (at most one per query)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: KeyPath,
    pub order: SortOrder,
    pub date_format: Option<String>,
}

impl SortSpec {
    pub fn asc(key: &str) -> Self {
        Self {
            key: KeyPath::parse(key),
            order: SortOrder::Asc,
            date_format: None,
        }
    }

    pub fn desc(key: &str) -> Self {
        Self {
            key: KeyPath::parse(key),
            order: SortOrder::Desc,
            date_format: None,
        }
    }
}

/// Pagination window (at most one per query)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitSpec {
    pub offset: usize,
    pub length: usize,
}

/// One-to-one lookup join against a fixed side record
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    /// Record attached to every matching row
    pub side: Record,
    /// Field name the side record is attached under
    pub attach_as: String,
    /// Field on the main record
    pub parent_key: String,
    /// Field on the side record
    pub foreign_key: String,
}
