//! Symbols: the things modules export, resolve and complete.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

use crate::decode::{self, DecodeError, DecodeResult};
use crate::location::Location;
use crate::module::ModuleId;
use crate::position::{Position, Region};

/// The twelve kinds of top-level symbol the service distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolType {
    Function,
    Method,
    Selector,
    Constructor,
    Type,
    NewType,
    Data,
    Class,
    TypeFam,
    DataFam,
    PatConstructor,
    PatSelector,
}

impl SymbolType {
    /// Wire tag as it appears in a symbol's `info.what`.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Selector => "selector",
            Self::Constructor => "ctor",
            Self::Type => "type",
            Self::NewType => "newtype",
            Self::Data => "data",
            Self::Class => "class",
            Self::TypeFam => "type-family",
            Self::DataFam => "data-family",
            Self::PatConstructor => "pat-ctor",
            Self::PatSelector => "pat-selector",
        }
    }

    /// Inverse of [`wire_name`](Self::wire_name); unknown tags fail.
    pub fn parse_str(tag: &str) -> DecodeResult<Self> {
        match tag {
            "function" => Ok(Self::Function),
            "method" => Ok(Self::Method),
            "selector" => Ok(Self::Selector),
            "ctor" => Ok(Self::Constructor),
            "type" => Ok(Self::Type),
            "newtype" => Ok(Self::NewType),
            "data" => Ok(Self::Data),
            "class" => Ok(Self::Class),
            "type-family" => Ok(Self::TypeFam),
            "data-family" => Ok(Self::DataFam),
            "pat-ctor" => Ok(Self::PatConstructor),
            "pat-selector" => Ok(Self::PatSelector),
            _ => Err(DecodeError::new(format!("invalid symbol type: {tag}"))),
        }
    }

    pub fn parse(value: &Value) -> DecodeResult<Self> {
        Self::parse_str(&decode::string(value, "symbol type")?)
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Identity of a symbol: its name plus the module that defines it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SymbolId {
    pub name: String,
    pub module: ModuleId,
}

impl SymbolId {
    #[must_use]
    pub fn new(name: impl Into<String>, module: ModuleId) -> Self {
        Self {
            name: name.into(),
            module,
        }
    }

    pub fn parse(value: &Value) -> DecodeResult<Self> {
        Ok(Self {
            name: decode::string(decode::field(value, "name")?, "symbol name")?,
            module: ModuleId::parse(decode::field(value, "module")?)?,
        })
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.name, self.module)
    }
}

/// A resolved symbol with everything the service knows about it.
///
/// Ordering and equality use the key `(name, module, symbol_type)`; docs,
/// position and the type members never participate, so the same symbol
/// compares equal whichever response it was decoded from.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub id: SymbolId,
    pub symbol_type: SymbolType,
    pub docs: Option<String>,
    pub position: Option<Position>,
    pub qualifier: Option<String>,
    pub function_type: Option<String>,
    pub type_context: Option<Vec<String>>,
    pub type_args: Option<Vec<String>>,
}

impl Symbol {
    pub fn parse(value: &Value) -> DecodeResult<Self> {
        let info = decode::field(value, "info")?;
        Ok(Self {
            id: SymbolId::parse(decode::field(value, "id")?)?,
            symbol_type: SymbolType::parse(decode::field(info, "what")?)?,
            docs: decode::opt_field(value, "docs")
                .and_then(Value::as_str)
                .map(str::to_owned),
            position: match decode::opt_field(value, "pos") {
                Some(v) => Some(Position::parse(v)?),
                None => None,
            },
            qualifier: decode::opt_field(value, "qualifier")
                .and_then(Value::as_str)
                .map(str::to_owned),
            function_type: match decode::opt_field(info, "type") {
                Some(v) => Some(decode::string(v, "symbol type signature")?),
                None => None,
            },
            type_context: match decode::opt_field(info, "ctx") {
                Some(v) => Some(decode::string_list(v, "symbol type context")?),
                None => None,
            },
            type_args: match decode::opt_field(info, "args") {
                Some(v) => Some(decode::string_list(v, "symbol type argument")?),
                None => None,
            },
        })
    }

    /// One-line rendering suitable for completion lists and hovers.
    ///
    /// `short` drops the type context from type-like symbols.
    #[must_use]
    pub fn brief(&self, short: bool) -> String {
        match self.symbol_type {
            SymbolType::Function
            | SymbolType::Method
            | SymbolType::Selector
            | SymbolType::Constructor
            | SymbolType::PatSelector => match &self.function_type {
                Some(signature) => format!("{} :: {signature}", self.id.name),
                None => self.id.name.clone(),
            },
            SymbolType::Type => self.type_brief("type", short),
            SymbolType::NewType => self.type_brief("newtype", short),
            SymbolType::Data => self.type_brief("data", short),
            SymbolType::Class => self.type_brief("class", short),
            SymbolType::TypeFam | SymbolType::DataFam | SymbolType::PatConstructor => {
                self.id.name.clone()
            }
        }
    }

    fn type_brief(&self, keyword: &str, short: bool) -> String {
        let mut parts: Vec<String> = vec![keyword.to_owned()];
        if !short && let Some(context) = &self.type_context {
            parts.push(if context.len() == 1 {
                format!("{} =>", context[0])
            } else {
                format!("({}) =>", context.join(", "))
            });
        }
        parts.push(self.id.name.clone());
        if let Some(args) = &self.type_args {
            parts.extend(args.iter().cloned());
        }
        parts.join(" ")
    }

    /// Multi-line rendering with docs and the definition site.
    #[must_use]
    pub fn detailed(&self) -> String {
        let mut lines: Vec<String> = vec![self.brief(false)];
        if let Some(docs) = &self.docs {
            lines.push(String::new());
            lines.push(docs.clone());
        }
        lines.push(String::new());
        match (&self.position, &self.id.module.location) {
            (Some(position), Location::File { filename, .. }) => {
                lines.push(format!(
                    "Defined at: {filename}:{}:{}",
                    position.line, position.column
                ));
            }
            _ => {
                lines.push(format!("Defined in {}", self.id.module.name));
            }
        }
        lines.join("\n")
    }

    /// Name the symbol is referred to by in scope, honoring its qualifier.
    #[must_use]
    pub fn scope_name(&self) -> String {
        match &self.qualifier {
            Some(qualifier) => format!("{qualifier}.{}", self.id.name),
            None => self.id.name.clone(),
        }
    }

    fn key(&self) -> (&SymbolId, SymbolType) {
        (&self.id, self.symbol_type)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Symbol {}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol_type, self.id)
    }
}

/// One occurrence of a symbol in some module's source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolUsage {
    pub symbol: Symbol,
    pub qualifier: Option<String>,
    pub used_in: ModuleId,
    pub used_region: Region,
}

impl SymbolUsage {
    pub fn parse(value: &Value) -> DecodeResult<Self> {
        Ok(Self {
            symbol: Symbol::parse(decode::field(value, "symbol")?)?,
            qualifier: decode::opt_field(value, "qualifier")
                .and_then(Value::as_str)
                .map(str::to_owned),
            used_in: ModuleId::parse(decode::field(value, "in")?)?,
            used_region: Region::parse(decode::field(value, "at")?)?,
        })
    }
}

impl fmt::Display for SymbolUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {} at {}",
            self.symbol, self.used_in, self.used_region
        )
    }
}
