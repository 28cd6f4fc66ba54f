//! Scanning session configuration.

/// How the static import registry behaves when a new compilation unit is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaticImportPolicy {
    /// Keep entries from previously activated units; colliding short names are overwritten by the newer unit.
    #[default]
    Accumulate,
    /// Clear the registry before registering the new unit's static imports.
    ResetPerUnit,
}

/// Scanning configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Static import registry behavior on unit switch
    pub static_imports: StaticImportPolicy,
    /// Convert handler panics into internal-error diagnostics instead of unwinding the session
    pub catch_panics: bool,
    /// Log a dump of the scanning stack when an internal error is reported
    pub dump_stack_on_error: bool,
    /// Maximum number of characters of node text shown per stack dump line
    pub dump_text_width: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            static_imports: StaticImportPolicy::Accumulate,
            catch_panics: true,
            dump_stack_on_error: true,
            dump_text_width: 30,
        }
    }
}

impl ScanConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_static_imports(mut self, policy: StaticImportPolicy) -> Self {
        self.static_imports = policy;
        self
    }

    pub fn with_catch_panics(mut self, catch: bool) -> Self {
        self.catch_panics = catch;
        self
    }

    pub fn with_dump_stack_on_error(mut self, dump: bool) -> Self {
        self.dump_stack_on_error = dump;
        self
    }

    pub fn with_dump_text_width(mut self, width: usize) -> Self {
        self.dump_text_width = width;
        self
    }
}
