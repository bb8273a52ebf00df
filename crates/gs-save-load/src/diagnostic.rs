use thiserror::Error;

/// A recoverable problem found while encoding or decoding. None of these stop a pass; the piece
/// of state involved is skipped or left absent and the pass moves on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error("unknown entity '{name}' found in save data but not in the scene")]
    UnknownEntity { name: String },
    #[error("cannot find component of type '{component}' on entity '{entity}'")]
    MissingComponent { entity: String, component: String },
    #[error(
        "value found for field '{field}' that doesn't exist on the '{component}' component of \
         entity '{entity}'"
    )]
    UnknownField {
        entity: String,
        component: String,
        field: String,
    },
    #[error("cannot read {found} into '{path}' (expected {expected})")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error("unknown entity '{entity}' (looking for component '{component}')")]
    UnknownEntityOrComponent { entity: String, component: String },
    #[error("more than one entity is named '{name}'; only the last one is kept")]
    DuplicateEntityName { name: String },
    #[error("'{path}' is not valid in the save data: {reason}")]
    MalformedEntry { path: String, reason: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    UnknownEntity,
    MissingComponent,
    UnknownField,
    TypeMismatch,
    UnknownEntityOrComponent,
    DuplicateEntityName,
    MalformedEntry,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::UnknownEntity { .. } => DiagnosticKind::UnknownEntity,
            Diagnostic::MissingComponent { .. } => DiagnosticKind::MissingComponent,
            Diagnostic::UnknownField { .. } => DiagnosticKind::UnknownField,
            Diagnostic::TypeMismatch { .. } => DiagnosticKind::TypeMismatch,
            Diagnostic::UnknownEntityOrComponent { .. } => DiagnosticKind::UnknownEntityOrComponent,
            Diagnostic::DuplicateEntityName { .. } => DiagnosticKind::DuplicateEntityName,
            Diagnostic::MalformedEntry { .. } => DiagnosticKind::MalformedEntry,
        }
    }
}

/// Diagnostics collected over one encode or decode pass, in the order they were found.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind() == kind)
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind() == kind).count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Emits every diagnostic as a warning.
    pub fn log_all(&self) {
        for diagnostic in &self.entries {
            log::warn!("{diagnostic}");
        }
    }

    #[inline]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
