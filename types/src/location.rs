//! Module locations: where a module's definition comes from.

use std::fmt;

use serde_json::Value;

use crate::decode::{self, DecodeResult, first_ok};
use crate::package::Package;

/// Provenance of a module: a source file, a module inside an installed
/// package, or some other origin.
///
/// The wire only ever carries the first two shapes — `File` when a `file`
/// member is present, `Installed` when `name` and a nested `package` are.
/// `Other` exists for callers that need to label synthetic modules and is
/// never decoded.
///
/// Variant order is the comparison order: locations of different variants
/// compare by variant alone, so sorting mixed lists never inspects payloads
/// across variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Location {
    File {
        filename: String,
        project: Option<String>,
    },
    Installed {
        name: String,
        package: Package,
    },
    Other {
        source: String,
    },
}

impl Location {
    pub fn parse(value: &Value) -> DecodeResult<Self> {
        first_ok([Self::parse_file(value), Self::parse_installed(value)])
    }

    fn parse_file(value: &Value) -> DecodeResult<Self> {
        let filename = decode::string(decode::field(value, "file")?, "location file")?;
        let project = decode::opt_field(value, "project")
            .and_then(Value::as_str)
            .map(str::to_owned);
        Ok(Self::File { filename, project })
    }

    fn parse_installed(value: &Value) -> DecodeResult<Self> {
        Ok(Self::Installed {
            name: decode::string(decode::field(value, "name")?, "installed location name")?,
            package: Package::parse(decode::field(value, "package")?)?,
        })
    }

    /// Stable identity string used to group results by origin.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::File { filename, .. } => filename.clone(),
            Self::Installed { name, package } => format!("{name}:{}", package.package_id()),
            Self::Other { source } => source.clone(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { filename, .. } => write!(f, "{filename}"),
            Self::Installed { name, package } => write!(f, "{name} in {package}"),
            Self::Other { source } => write!(f, "{source}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_file_location() {
        let loc = Location::parse(&json!({"file": "A.hs"})).unwrap();
        assert_eq!(
            loc,
            Location::File {
                filename: "A.hs".to_owned(),
                project: None
            }
        );
    }

    #[test]
    fn test_parse_file_location_with_project() {
        let loc = Location::parse(&json!({"file": "src/A.hs", "project": "demo"})).unwrap();
        assert_eq!(
            loc,
            Location::File {
                filename: "src/A.hs".to_owned(),
                project: Some("demo".to_owned())
            }
        );
    }

    #[test]
    fn test_parse_installed_location() {
        let loc = Location::parse(&json!({"name": "Foo", "package": "base-4.12"})).unwrap();
        assert_eq!(
            loc,
            Location::Installed {
                name: "Foo".to_owned(),
                package: Package::new("base", Some("4.12".to_owned())),
            }
        );
    }

    #[test]
    fn test_parse_empty_object_fails_with_both_messages() {
        let err = Location::parse(&json!({})).unwrap_err();
        assert!(err.message().contains("`file`"));
        assert!(err.message().contains("`name`"));
    }

    #[test]
    fn test_file_wins_when_both_shapes_present() {
        // The file branch is tried first.
        let loc = Location::parse(&json!({
            "file": "A.hs",
            "name": "Foo",
            "package": "base"
        }))
        .unwrap();
        assert!(matches!(loc, Location::File { .. }));
    }

    #[test]
    fn test_cross_variant_ordering_by_variant() {
        let file = Location::File {
            filename: "z.hs".to_owned(),
            project: None,
        };
        let installed = Location::Installed {
            name: "A".to_owned(),
            package: Package::new("base", None),
        };
        let other = Location::Other {
            source: "a".to_owned(),
        };
        assert!(file < installed);
        assert!(installed < other);
    }

    #[test]
    fn test_within_variant_ordering() {
        let a = Location::File {
            filename: "A.hs".to_owned(),
            project: None,
        };
        let b = Location::File {
            filename: "B.hs".to_owned(),
            project: None,
        };
        assert!(a < b);
    }

    #[test]
    fn test_location_id() {
        let loc = Location::Installed {
            name: "Data.Map".to_owned(),
            package: Package::new("containers", Some("0.6".to_owned())),
        };
        assert_eq!(loc.id(), "Data.Map:containers-0.6");
    }

    #[test]
    fn test_display() {
        let loc = Location::Installed {
            name: "Data.Map".to_owned(),
            package: Package::new("containers", Some("0.6".to_owned())),
        };
        assert_eq!(loc.to_string(), "Data.Map in containers-0.6");
    }
}
