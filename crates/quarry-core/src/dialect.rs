//! Target SQL dialects and response affinity.

use std::fmt;
use std::str::FromStr;

use crate::ParseError;

/// Database dialect a unit is compiled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    MySql,
    MariaDb,
    Sqlite,
}

/// How positional parameters are written in SQL text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, ...
    Numbered,
    /// `?`
    Question,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Postgres,
        Dialect::MySql,
        Dialect::MariaDb,
        Dialect::Sqlite,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::MariaDb => "mariadb",
            Dialect::Sqlite => "sqlite",
        }
    }

    pub fn placeholder_style(self) -> PlaceholderStyle {
        match self {
            Dialect::Postgres => PlaceholderStyle::Numbered,
            Dialect::MySql | Dialect::MariaDb | Dialect::Sqlite => PlaceholderStyle::Question,
        }
    }

    /// Parse an optional, possibly blank dialect name.
    ///
    /// Blank input yields `Ok(None)` so callers can report a missing dialect
    /// separately from an unknown one.
    pub fn parse_optional(name: Option<&str>) -> Result<Option<Self>, ParseError> {
        match name.map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => name.parse().map(Some),
        }
    }
}

impl FromStr for Dialect {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" | "pgx" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            "mariadb" => Ok(Dialect::MariaDb),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            _ => Err(ParseError::UnknownDialect(s.to_string())),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Expected cardinality of a query's result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Affinity {
    /// Exactly one result object.
    One,
    #[default]
    Many,
    /// Statement without a result set.
    None,
}

impl Affinity {
    pub fn name(self) -> &'static str {
        match self {
            Affinity::One => "one",
            Affinity::Many => "many",
            Affinity::None => "none",
        }
    }
}

impl FromStr for Affinity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one" => Ok(Affinity::One),
            "many" => Ok(Affinity::Many),
            "none" => Ok(Affinity::None),
            _ => Err(ParseError::UnsupportedAffinity(s.to_string())),
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
