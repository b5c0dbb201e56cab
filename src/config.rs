//! Analysis configuration

/// Declarations under this prefix are treated as system headers
pub const DEFAULT_SYSTEM_PREFIX: &str = "/usr/";
/// Sub-prefix of [`DEFAULT_SYSTEM_PREFIX`] holding distribution debug sources
pub const DEFAULT_DEBUG_SOURCES_PREFIX: &str = "/usr/src/debug/";

/// Tunables for one analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Path prefix marking system headers
    pub system_prefix: String,
    /// Path prefix exempted from the system header filter
    pub debug_sources_prefix: String,
    /// Longest qualifier/typedef chain the type classifier follows
    pub max_type_depth: usize,
    /// Longest `abstract_origin`/`specification` chain the integrator follows
    pub max_origin_depth: usize,
    /// Deepest nesting of imported units the walker follows
    pub max_import_depth: usize,
}

impl AnalysisConfig {
    /// Whether a declaration in `path` comes from a system header
    pub fn is_system_header(&self, path: &str) -> bool {
        path.starts_with(&self.system_prefix) && !path.starts_with(&self.debug_sources_prefix)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            system_prefix: DEFAULT_SYSTEM_PREFIX.to_string(),
            debug_sources_prefix: DEFAULT_DEBUG_SOURCES_PREFIX.to_string(),
            max_type_depth: 64,
            max_origin_depth: 16,
            max_import_depth: 16,
        }
    }
}
