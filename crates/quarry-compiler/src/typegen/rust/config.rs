//! Configuration for Rust emission.

/// Configuration for Rust emission.
#[derive(Clone, Debug)]
pub struct EmitConfig {
    /// Whether generated items are `pub`
    pub(crate) export: bool,
    /// Whether to emit the `<fn>_iter` adapter
    pub(crate) iterator: bool,
    /// Path of the runtime crate in generated code
    pub(crate) runtime: String,
    /// First line of the output; empty for none
    pub(crate) header: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            export: true,
            iterator: false,
            runtime: "quarry_vm".to_string(),
            header: "// Generated by quarry. Do not edit.".to_string(),
        }
    }
}

impl EmitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether generated items are public.
    pub fn export(mut self, value: bool) -> Self {
        self.export = value;
        self
    }

    /// Set whether to emit the row iterator adapter.
    pub fn iterator(mut self, value: bool) -> Self {
        self.iterator = value;
        self
    }

    /// Set the runtime crate path (`quarry_vm`, `crate::rt`, ...).
    pub fn runtime(mut self, path: impl Into<String>) -> Self {
        self.runtime = path.into();
        self
    }

    pub fn header(mut self, text: impl Into<String>) -> Self {
        self.header = text.into();
        self
    }
}
