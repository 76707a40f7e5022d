use serde::Serialize;

/// One Gradle subproject as reported by the injected task.
///
/// `dependents` keeps the report's field-split semantics: a module nobody
/// depends on has `dependents == [""]`, not an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub name: String,
    pub path: String,
    pub dependents: Vec<String>,
}

impl Module {
    /// Dependent names with the empty placeholder filtered out.
    pub fn declared_dependents(&self) -> impl Iterator<Item = &str> {
        self.dependents
            .iter()
            .map(|d| d.as_str())
            .filter(|d| !d.is_empty())
    }
}

/// Result of a full run: what changed, the module graph, and what it touches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImpactReport {
    pub base: String,
    pub target: String,
    pub changed_files: Vec<String>,
    /// Changed files dropped by `[changes].exclude`.
    pub ignored_files: Vec<String>,
    /// Changed files outside every module (root build scripts, docs, ...).
    pub unowned_files: Vec<String>,
    pub modules: Vec<Module>,
    /// Affected module names in build order.
    pub affected_modules: Vec<String>,
}
