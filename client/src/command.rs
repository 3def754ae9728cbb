//! Typed commands: pure descriptors the connection serializes and whose
//! decoders turn raw response payloads into domain values.

use hsdev_types::decode::{self, DecodeResult, decode_all};
use hsdev_types::{Module, ModuleId, Package, PackageDb, Symbol, SymbolId, SymbolUsage};
use serde_json::{Map, Value, json};

use crate::types::LogLevel;

/// One request the hsdev server understands.
///
/// A command is a value: constructing one performs no IO. The connection
/// serializes [`params`](Self::params) under [`wire_name`](Self::wire_name)
/// and pipes the raw `result` payload of the matching response back through
/// [`decode`](Self::decode).
pub trait Command {
    type Output;

    /// Wire command name. May depend on the command's own data — scan
    /// targets select between `scan project`, `scan file` and
    /// `scan package-dbs`.
    fn wire_name(&self) -> String;

    /// Command-specific members of the request object.
    fn params(&self) -> Map<String, Value>;

    /// Decode the `result` payload of a successful response.
    fn decode(&self, result: &Value) -> DecodeResult<Self::Output>;
}

/// How a search query matches candidate names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    Exact,
    #[default]
    Prefix,
    Infix,
    Suffix,
}

impl SearchType {
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Prefix => "prefix",
            Self::Infix => "infix",
            Self::Suffix => "suffix",
        }
    }
}

/// Text query for symbol and module searches.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: String,
    pub search_type: SearchType,
}

impl SearchQuery {
    #[must_use]
    pub fn new(text: impl Into<String>, search_type: SearchType) -> Self {
        Self {
            text: text.into(),
            search_type,
        }
    }

    fn to_value(&self) -> Value {
        json!({"input": self.text, "type": self.search_type.wire_name()})
    }
}

/// Filter narrowing a symbol or module search.
///
/// Source kinds travel as bare strings, targeted kinds as single-member
/// objects; that difference in shape is how the wire tells them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    Installed,
    Sourced,
    Standalone,
    Project(String),
    File(String),
    Module(String),
    Package(String),
}

impl SearchFilter {
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Installed => json!("installed"),
            Self::Sourced => json!("sourced"),
            Self::Standalone => json!("standalone"),
            Self::Project(name) => json!({"project": name}),
            Self::File(name) => json!({"file": name}),
            Self::Module(name) => json!({"module": name}),
            Self::Package(name) => json!({"package": name}),
        }
    }

    pub fn parse(value: &Value) -> DecodeResult<Self> {
        if let Some(raw) = value.as_str() {
            return match raw {
                "installed" => Ok(Self::Installed),
                "sourced" => Ok(Self::Sourced),
                "standalone" => Ok(Self::Standalone),
                _ => Err(decode::DecodeError::new(format!(
                    "error parsing target source type: {raw}"
                ))),
            };
        }
        let Some(obj) = value.as_object() else {
            return Err(decode::DecodeError::new(format!(
                "search filter should be a string or an object, got: {value}"
            )));
        };
        if obj.len() != 1 {
            return Err(decode::DecodeError::new(format!(
                "search filter object should contain only one member: {value}"
            )));
        }
        let (key, raw) = decode::required(obj.iter().next(), "search filter member")?;
        let name = decode::string(raw, "search filter target name")?;
        match key.as_str() {
            "project" => Ok(Self::Project(name)),
            "file" => Ok(Self::File(name)),
            "module" => Ok(Self::Module(name)),
            "package" => Ok(Self::Package(name)),
            _ => Err(decode::DecodeError::new(format!(
                "error parsing target type: {key}"
            ))),
        }
    }
}

fn filters_value(filters: &[SearchFilter]) -> Value {
    Value::Array(filters.iter().map(SearchFilter::to_value).collect())
}

/// Build tool a scanned project is driven by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTool {
    Cabal,
    Stack,
}

impl BuildTool {
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Cabal => "cabal",
            Self::Stack => "stack",
        }
    }
}

/// What a [`Scan`] command should inspect.
#[derive(Debug, Clone)]
pub enum ScanTarget {
    Project {
        project: String,
        build_tool: BuildTool,
        scan_deps: bool,
    },
    File {
        file: String,
        build_tool: BuildTool,
        scan_project: bool,
        scan_deps: bool,
    },
    PackageDbs {
        stack: Vec<PackageDb>,
    },
}

impl ScanTarget {
    fn kind(&self) -> &'static str {
        match self {
            Self::Project { .. } => "project",
            Self::File { .. } => "file",
            Self::PackageDbs { .. } => "package-dbs",
        }
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        match self {
            Self::Project {
                project,
                build_tool,
                scan_deps,
            } => {
                params.insert("project".to_owned(), json!(project));
                params.insert("build-tool".to_owned(), json!(build_tool.wire_name()));
                params.insert("scan-deps".to_owned(), json!(scan_deps));
            }
            Self::File {
                file,
                build_tool,
                scan_project,
                scan_deps,
            } => {
                params.insert("file".to_owned(), json!(file));
                params.insert("build-tool".to_owned(), json!(build_tool.wire_name()));
                params.insert("scan-project".to_owned(), json!(scan_project));
                params.insert("scan-deps".to_owned(), json!(scan_deps));
            }
            Self::PackageDbs { stack } => {
                let rendered: Vec<String> = stack.iter().map(ToString::to_string).collect();
                params.insert("package-db-stack".to_owned(), json!(rendered.join("/")));
            }
        }
        params
    }
}

/// Liveness check.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ping;

impl Command for Ping {
    type Output = ();

    fn wire_name(&self) -> String {
        "ping".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        Map::new()
    }

    fn decode(&self, _result: &Value) -> DecodeResult<()> {
        Ok(())
    }
}

/// Change the server's own log verbosity.
#[derive(Debug, Clone, Copy)]
pub struct SetLogLevel {
    pub level: LogLevel,
}

impl Command for SetLogLevel {
    type Output = ();

    fn wire_name(&self) -> String {
        "set-log".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("level".to_owned(), json!(self.level.wire_name()));
        params
    }

    fn decode(&self, _result: &Value) -> DecodeResult<()> {
        Ok(())
    }
}

/// Inspect a project, a file or a stack of package databases.
#[derive(Debug, Clone)]
pub struct Scan {
    pub target: ScanTarget,
}

impl Command for Scan {
    type Output = ();

    fn wire_name(&self) -> String {
        format!("scan {}", self.target.kind())
    }

    fn params(&self) -> Map<String, Value> {
        self.target.params()
    }

    fn decode(&self, _result: &Value) -> DecodeResult<()> {
        Ok(())
    }
}

/// Override the server's view of a file with unsaved editor contents;
/// `None` reverts to the on-disk contents.
#[derive(Debug, Clone)]
pub struct SetFileContents {
    pub file: String,
    pub contents: Option<String>,
}

impl Command for SetFileContents {
    type Output = ();

    fn wire_name(&self) -> String {
        "set-file-contents".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("file".to_owned(), json!(self.file));
        params.insert("contents".to_owned(), json!(self.contents));
        params
    }

    fn decode(&self, _result: &Value) -> DecodeResult<()> {
        Ok(())
    }
}

/// Fetch haddock docs for already-scanned projects and files.
#[derive(Debug, Clone, Default)]
pub struct RefineDocs {
    pub projects: Vec<String>,
    pub files: Vec<String>,
}

impl Command for RefineDocs {
    type Output = ();

    fn wire_name(&self) -> String {
        "docs".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("projects".to_owned(), json!(self.projects));
        params.insert("files".to_owned(), json!(self.files));
        params
    }

    fn decode(&self, _result: &Value) -> DecodeResult<()> {
        Ok(())
    }
}

/// Infer missing type signatures for already-scanned projects and files.
#[derive(Debug, Clone, Default)]
pub struct InferTypes {
    pub projects: Vec<String>,
    pub files: Vec<String>,
}

impl Command for InferTypes {
    type Output = ();

    fn wire_name(&self) -> String {
        "infer".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("projects".to_owned(), json!(self.projects));
        params.insert("files".to_owned(), json!(self.files));
        params
    }

    fn decode(&self, _result: &Value) -> DecodeResult<()> {
        Ok(())
    }
}

/// Drop everything the server has scanned.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveAll;

impl Command for RemoveAll {
    type Output = ();

    fn wire_name(&self) -> String {
        "remove-all".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        Map::new()
    }

    fn decode(&self, _result: &Value) -> DecodeResult<()> {
        Ok(())
    }
}

/// List known packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoPackages;

impl Command for InfoPackages {
    type Output = Vec<Package>;

    fn wire_name(&self) -> String {
        "packages".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        Map::new()
    }

    fn decode(&self, result: &Value) -> DecodeResult<Vec<Package>> {
        decode_all(result, Package::parse)
    }
}

/// List known package databases.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoSandboxes;

impl Command for InfoSandboxes {
    type Output = Vec<PackageDb>;

    fn wire_name(&self) -> String {
        "sandboxes".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        Map::new()
    }

    fn decode(&self, result: &Value) -> DecodeResult<Vec<PackageDb>> {
        decode_all(result, PackageDb::parse)
    }
}

/// Symbol search result: identities only, or full symbols, per the command's
/// `header` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbols {
    Headers(Vec<SymbolId>),
    Details(Vec<Symbol>),
}

/// Module search result, shaped like [`Symbols`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modules {
    Headers(Vec<ModuleId>),
    Details(Vec<Module>),
}

/// Search symbols by name.
///
/// `header` is fixed at construction and selects the cheaper identity-only
/// decoder over the full one.
#[derive(Debug, Clone, Default)]
pub struct InfoSymbol {
    pub query: SearchQuery,
    pub filters: Vec<SearchFilter>,
    pub header: bool,
    pub locals: bool,
}

impl Command for InfoSymbol {
    type Output = Symbols;

    fn wire_name(&self) -> String {
        "symbol".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("query".to_owned(), self.query.to_value());
        params.insert("filters".to_owned(), filters_value(&self.filters));
        params.insert("header".to_owned(), json!(self.header));
        params.insert("locals".to_owned(), json!(self.locals));
        params
    }

    fn decode(&self, result: &Value) -> DecodeResult<Symbols> {
        if self.header {
            decode_all(result, SymbolId::parse).map(Symbols::Headers)
        } else {
            decode_all(result, Symbol::parse).map(Symbols::Details)
        }
    }
}

/// Search modules by name.
#[derive(Debug, Clone, Default)]
pub struct InfoModule {
    pub query: SearchQuery,
    pub filters: Vec<SearchFilter>,
    pub header: bool,
    pub inspection: bool,
}

impl Command for InfoModule {
    type Output = Modules;

    fn wire_name(&self) -> String {
        "module".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("query".to_owned(), self.query.to_value());
        params.insert("filters".to_owned(), filters_value(&self.filters));
        params.insert("header".to_owned(), json!(self.header));
        params.insert("inspection".to_owned(), json!(self.inspection));
        params
    }

    fn decode(&self, result: &Value) -> DecodeResult<Modules> {
        if self.header {
            decode_all(result, ModuleId::parse).map(Modules::Headers)
        } else {
            decode_all(result, Module::parse).map(Modules::Details)
        }
    }
}

/// Find symbols visible in a file under the given name.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub name: String,
    pub file: String,
}

impl Command for Lookup {
    type Output = Vec<Symbol>;

    fn wire_name(&self) -> String {
        "lookup".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("name".to_owned(), json!(self.name));
        params.insert("file".to_owned(), json!(self.file));
        params
    }

    fn decode(&self, result: &Value) -> DecodeResult<Vec<Symbol>> {
        decode_all(result, Symbol::parse)
    }
}

/// Resolve which symbol a name in a file refers to.
#[derive(Debug, Clone)]
pub struct Whois {
    pub name: String,
    pub file: String,
}

impl Command for Whois {
    type Output = Vec<Symbol>;

    fn wire_name(&self) -> String {
        "whois".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("name".to_owned(), json!(self.name));
        params.insert("file".to_owned(), json!(self.file));
        params
    }

    fn decode(&self, result: &Value) -> DecodeResult<Vec<Symbol>> {
        decode_all(result, Symbol::parse)
    }
}

/// Resolve the symbol at a source position.
#[derive(Debug, Clone)]
pub struct Whoat {
    pub line: u32,
    pub column: u32,
    pub file: String,
}

impl Command for Whoat {
    type Output = Vec<Symbol>;

    fn wire_name(&self) -> String {
        "whoat".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("line".to_owned(), json!(self.line));
        params.insert("column".to_owned(), json!(self.column));
        params.insert("file".to_owned(), json!(self.file));
        params
    }

    fn decode(&self, result: &Value) -> DecodeResult<Vec<Symbol>> {
        decode_all(result, Symbol::parse)
    }
}

/// List modules importable from a file, filtered by query.
#[derive(Debug, Clone)]
pub struct ResolveScopeModules {
    pub query: SearchQuery,
    pub file: String,
}

impl Command for ResolveScopeModules {
    type Output = Vec<ModuleId>;

    fn wire_name(&self) -> String {
        "scope modules".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("query".to_owned(), self.query.to_value());
        params.insert("file".to_owned(), json!(self.file));
        params
    }

    fn decode(&self, result: &Value) -> DecodeResult<Vec<ModuleId>> {
        decode_all(result, ModuleId::parse)
    }
}

/// List symbols in scope in a file, filtered by query.
#[derive(Debug, Clone)]
pub struct ResolveScope {
    pub query: SearchQuery,
    pub file: String,
}

impl Command for ResolveScope {
    type Output = Vec<SymbolId>;

    fn wire_name(&self) -> String {
        "scope".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("query".to_owned(), self.query.to_value());
        params.insert("file".to_owned(), json!(self.file));
        params
    }

    fn decode(&self, result: &Value) -> DecodeResult<Vec<SymbolId>> {
        decode_all(result, SymbolId::parse)
    }
}

/// Find usages of the symbol at a source position.
#[derive(Debug, Clone)]
pub struct FindUsages {
    pub line: u32,
    pub column: u32,
    pub file: String,
}

impl Command for FindUsages {
    type Output = Vec<SymbolUsage>;

    fn wire_name(&self) -> String {
        "usages".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("line".to_owned(), json!(self.line));
        params.insert("column".to_owned(), json!(self.column));
        params.insert("file".to_owned(), json!(self.file));
        params
    }

    fn decode(&self, result: &Value) -> DecodeResult<Vec<SymbolUsage>> {
        decode_all(result, SymbolUsage::parse)
    }
}

/// Complete a prefix in the context of a file.
#[derive(Debug, Clone)]
pub struct Complete {
    pub prefix: String,
    pub file: String,
    pub wide: bool,
}

impl Command for Complete {
    type Output = Vec<Symbol>;

    fn wire_name(&self) -> String {
        "complete".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("prefix".to_owned(), json!(self.prefix));
        params.insert("wide".to_owned(), json!(self.wide));
        params.insert("file".to_owned(), json!(self.file));
        params
    }

    fn decode(&self, result: &Value) -> DecodeResult<Vec<Symbol>> {
        decode_all(result, Symbol::parse)
    }
}

/// Check and lint files; notes come back as raw JSON for the diagnostics
/// consumer to interpret.
#[derive(Debug, Clone, Default)]
pub struct CheckLint {
    pub files: Vec<String>,
    pub ghc_opts: Vec<String>,
    pub lint_opts: Vec<String>,
    pub clear: bool,
}

impl Command for CheckLint {
    type Output = Vec<Value>;

    fn wire_name(&self) -> String {
        "check-lint".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        let files: Vec<Value> = self.files.iter().map(|f| json!({"file": f})).collect();
        let mut params = Map::new();
        params.insert("files".to_owned(), Value::Array(files));
        params.insert("ghc-opts".to_owned(), json!(self.ghc_opts));
        params.insert("lint-opts".to_owned(), json!(self.lint_opts));
        params.insert("clear".to_owned(), json!(self.clear));
        params
    }

    fn decode(&self, result: &Value) -> DecodeResult<Vec<Value>> {
        decode_all(result, |note| Ok(note.clone()))
    }
}

/// Ask the server to shut down.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exit;

impl Command for Exit {
    type Output = ();

    fn wire_name(&self) -> String {
        "exit".to_owned()
    }

    fn params(&self) -> Map<String, Value> {
        Map::new()
    }

    fn decode(&self, _result: &Value) -> DecodeResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ping_is_bare() {
        assert_eq!(Ping.wire_name(), "ping");
        assert!(Ping.params().is_empty());
        Ping.decode(&json!(null)).unwrap();
    }

    #[test]
    fn test_set_log_level_params() {
        let cmd = SetLogLevel {
            level: LogLevel::Debug,
        };
        assert_eq!(cmd.wire_name(), "set-log");
        assert_eq!(Value::Object(cmd.params()), json!({"level": "debug"}));
    }

    #[test]
    fn test_scan_project_wire_name_and_params() {
        let cmd = Scan {
            target: ScanTarget::Project {
                project: "/work/demo".to_owned(),
                build_tool: BuildTool::Stack,
                scan_deps: true,
            },
        };
        assert_eq!(cmd.wire_name(), "scan project");
        assert_eq!(
            Value::Object(cmd.params()),
            json!({"project": "/work/demo", "build-tool": "stack", "scan-deps": true})
        );
    }

    #[test]
    fn test_scan_file_wire_name_and_params() {
        let cmd = Scan {
            target: ScanTarget::File {
                file: "src/Lib.hs".to_owned(),
                build_tool: BuildTool::Cabal,
                scan_project: true,
                scan_deps: false,
            },
        };
        assert_eq!(cmd.wire_name(), "scan file");
        assert_eq!(
            Value::Object(cmd.params()),
            json!({
                "file": "src/Lib.hs",
                "build-tool": "cabal",
                "scan-project": true,
                "scan-deps": false
            })
        );
    }

    #[test]
    fn test_scan_package_dbs_joins_stack_with_slashes() {
        let cmd = Scan {
            target: ScanTarget::PackageDbs {
                stack: vec![
                    PackageDb::Global,
                    PackageDb::User,
                    PackageDb::Custom {
                        path: "/opt/pkgdb".to_owned(),
                    },
                ],
            },
        };
        assert_eq!(cmd.wire_name(), "scan package-dbs");
        assert_eq!(
            Value::Object(cmd.params()),
            json!({"package-db-stack": "global-db/user-db/package-db:/opt/pkgdb"})
        );
    }

    #[test]
    fn test_set_file_contents_null_reverts() {
        let cmd = SetFileContents {
            file: "src/Lib.hs".to_owned(),
            contents: None,
        };
        assert_eq!(
            Value::Object(cmd.params()),
            json!({"file": "src/Lib.hs", "contents": null})
        );
    }

    #[test]
    fn test_search_query_serializes_input_and_type() {
        let query = SearchQuery::new("map", SearchType::Infix);
        assert_eq!(query.to_value(), json!({"input": "map", "type": "infix"}));
    }

    #[test]
    fn test_search_query_default_is_prefix() {
        assert_eq!(SearchQuery::default().search_type, SearchType::Prefix);
    }

    #[test]
    fn test_search_filter_source_kinds_are_strings() {
        assert_eq!(SearchFilter::Installed.to_value(), json!("installed"));
        assert_eq!(SearchFilter::Sourced.to_value(), json!("sourced"));
        assert_eq!(SearchFilter::Standalone.to_value(), json!("standalone"));
    }

    #[test]
    fn test_search_filter_target_kinds_are_objects() {
        assert_eq!(
            SearchFilter::Project("demo".to_owned()).to_value(),
            json!({"project": "demo"})
        );
        assert_eq!(
            SearchFilter::Package("base".to_owned()).to_value(),
            json!({"package": "base"})
        );
    }

    #[test]
    fn test_search_filter_parse_round_trips() {
        for filter in [
            SearchFilter::Installed,
            SearchFilter::Sourced,
            SearchFilter::Standalone,
            SearchFilter::Project("demo".to_owned()),
            SearchFilter::File("A.hs".to_owned()),
            SearchFilter::Module("Data.Map".to_owned()),
            SearchFilter::Package("base".to_owned()),
        ] {
            assert_eq!(SearchFilter::parse(&filter.to_value()).unwrap(), filter);
        }
    }

    #[test]
    fn test_search_filter_parse_rejects_bad_shapes() {
        assert!(SearchFilter::parse(&json!("everywhere")).is_err());
        assert!(SearchFilter::parse(&json!({"project": "a", "file": "b"})).is_err());
        assert!(SearchFilter::parse(&json!({"sandbox": "x"})).is_err());
        assert!(SearchFilter::parse(&json!(3)).is_err());
    }

    #[test]
    fn test_info_symbol_params_shape() {
        let cmd = InfoSymbol {
            query: SearchQuery::new("foldr", SearchType::Exact),
            filters: vec![SearchFilter::Installed],
            header: true,
            locals: false,
        };
        assert_eq!(cmd.wire_name(), "symbol");
        assert_eq!(
            Value::Object(cmd.params()),
            json!({
                "query": {"input": "foldr", "type": "exact"},
                "filters": ["installed"],
                "header": true,
                "locals": false
            })
        );
    }

    #[test]
    fn test_info_symbol_header_selects_identity_decoder() {
        let module = json!({"name": "Lib", "location": {"file": "Lib.hs"}});
        let payload = json!([{
            "id": {"name": "run", "module": module},
            "info": {"what": "function"}
        }]);

        let headers = InfoSymbol {
            header: true,
            ..InfoSymbol::default()
        };
        // Header decoding only needs name+module, so the same payload decodes
        // differently under each flag.
        let full = InfoSymbol {
            header: false,
            ..InfoSymbol::default()
        };

        // The identity decoder expects bare {name, module} objects.
        assert!(headers.decode(&payload).is_err());
        match full.decode(&payload).unwrap() {
            Symbols::Details(symbols) => assert_eq!(symbols.len(), 1),
            Symbols::Headers(_) => panic!("expected full symbols"),
        }

        let header_payload = json!([{"name": "run", "module": module}]);
        match headers.decode(&header_payload).unwrap() {
            Symbols::Headers(ids) => assert_eq!(ids[0].name, "run"),
            Symbols::Details(_) => panic!("expected headers"),
        }
    }

    #[test]
    fn test_info_module_header_selects_identity_decoder() {
        let module = json!({"name": "Lib", "location": {"file": "Lib.hs"}});

        let headers = InfoModule {
            header: true,
            ..InfoModule::default()
        };
        match headers.decode(&json!([module])).unwrap() {
            Modules::Headers(ids) => assert_eq!(ids[0].name, "Lib"),
            Modules::Details(_) => panic!("expected headers"),
        }

        let full = InfoModule {
            header: false,
            ..InfoModule::default()
        };
        match full.decode(&json!([{"id": module}])).unwrap() {
            Modules::Details(modules) => assert!(modules[0].exports.is_empty()),
            Modules::Headers(_) => panic!("expected full modules"),
        }
    }

    #[test]
    fn test_whoat_params() {
        let cmd = Whoat {
            line: 10,
            column: 4,
            file: "src/Lib.hs".to_owned(),
        };
        assert_eq!(
            Value::Object(cmd.params()),
            json!({"line": 10, "column": 4, "file": "src/Lib.hs"})
        );
    }

    #[test]
    fn test_check_lint_params_use_kebab_members() {
        let cmd = CheckLint {
            files: vec!["A.hs".to_owned(), "B.hs".to_owned()],
            ghc_opts: vec!["-Wall".to_owned()],
            lint_opts: vec![],
            clear: true,
        };
        assert_eq!(
            Value::Object(cmd.params()),
            json!({
                "files": [{"file": "A.hs"}, {"file": "B.hs"}],
                "ghc-opts": ["-Wall"],
                "lint-opts": [],
                "clear": true
            })
        );
    }

    #[test]
    fn test_check_lint_decode_passes_notes_through() {
        let cmd = CheckLint::default();
        let notes = cmd
            .decode(&json!([{"note": {"message": "redundant import"}}]))
            .unwrap();
        assert_eq!(notes.len(), 1);
        assert!(cmd.decode(&json!({"not": "an array"})).is_err());
    }

    #[test]
    fn test_info_packages_decode() {
        let packages = InfoPackages.decode(&json!(["base-4.12", "text"])).unwrap();
        assert_eq!(packages[0].name, "base");
        assert_eq!(packages[1].version, None);
    }

    #[test]
    fn test_info_sandboxes_decode() {
        let dbs = InfoSandboxes
            .decode(&json!(["global-db", "package-db:/opt/pkgdb"]))
            .unwrap();
        assert_eq!(dbs[0], PackageDb::Global);
        assert!(InfoSandboxes.decode(&json!(["no-such-db"])).is_err());
    }

    #[test]
    fn test_resolve_scope_modules_params() {
        let cmd = ResolveScopeModules {
            query: SearchQuery::default(),
            file: "src/Lib.hs".to_owned(),
        };
        assert_eq!(cmd.wire_name(), "scope modules");
        let params = Value::Object(cmd.params());
        assert_eq!(params["file"], "src/Lib.hs");
        assert_eq!(params["query"]["type"], "prefix");
    }
}
