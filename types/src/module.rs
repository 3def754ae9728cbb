//! Module identities, imports and fully inspected modules.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

use crate::decode::{self, DecodeResult, decode_all};
use crate::location::Location;
use crate::position::Position;
use crate::symbol::Symbol;

/// Identity of a module: its name plus where it comes from.
///
/// Ordering and equality are defined over `(name, location)`; `exposed` is
/// metadata and never participates, so two ids for the same module compare
/// equal regardless of how they were obtained.
#[derive(Debug, Clone)]
pub struct ModuleId {
    pub name: String,
    pub location: Location,
    pub exposed: bool,
}

impl ModuleId {
    #[must_use]
    pub fn new(name: impl Into<String>, location: Location, exposed: bool) -> Self {
        Self {
            name: name.into(),
            location,
            exposed,
        }
    }

    pub fn parse(value: &Value) -> DecodeResult<Self> {
        Ok(Self {
            name: decode::string(decode::field(value, "name")?, "module name")?,
            location: Location::parse(decode::field(value, "location")?)?,
            // Absent means exposed; only hidden modules carry the member.
            exposed: match decode::opt_field(value, "exposed") {
                Some(v) => decode::boolean(v, "module exposed")?,
                None => true,
            },
        })
    }

    fn key(&self) -> (&str, &Location) {
        (&self.name, &self.location)
    }
}

impl PartialEq for ModuleId {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ModuleId {}

impl PartialOrd for ModuleId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.name, self.location)
    }
}

/// One import statement from a module's header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub module: String,
    pub qualified: bool,
    pub import_as: Option<String>,
    pub position: Position,
}

impl Import {
    /// Name the imported module goes by inside the importer.
    #[must_use]
    pub fn scope_name(&self) -> &str {
        self.import_as.as_deref().unwrap_or(&self.module)
    }

    pub fn parse(value: &Value) -> DecodeResult<Self> {
        Ok(Self {
            module: decode::string(decode::field(value, "name")?, "import name")?,
            qualified: match decode::opt_field(value, "qualified") {
                Some(v) => decode::boolean(v, "import qualified")?,
                None => false,
            },
            import_as: match decode::opt_field(value, "as") {
                Some(v) => Some(decode::string(v, "import alias")?),
                None => None,
            },
            position: Position::parse(decode::field(value, "pos")?)?,
        })
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import {}", self.module)
    }
}

/// Fully inspected module: identity plus exports and imports.
///
/// Exports arrive as full symbol objects; callers that only need identities
/// project through [`Symbol::id`](crate::Symbol). The service does not report
/// inspection times in module responses, so `last_inspection_time` stays
/// `None` after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: ModuleId,
    pub exports: Vec<Symbol>,
    pub imports: Vec<Import>,
    pub last_inspection_time: Option<String>,
}

impl Module {
    pub fn parse(value: &Value) -> DecodeResult<Self> {
        Ok(Self {
            id: ModuleId::parse(decode::field(value, "id")?)?,
            exports: match decode::opt_field(value, "exports") {
                Some(v) => decode_all(v, Symbol::parse)?,
                None => Vec::new(),
            },
            imports: match decode::opt_field(value, "imports") {
                Some(v) => decode_all(v, Import::parse)?,
                None => Vec::new(),
            },
            last_inspection_time: None,
        })
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} with {} exports, {} imports",
            self.id,
            self.exports.len(),
            self.imports.len()
        )
    }
}
