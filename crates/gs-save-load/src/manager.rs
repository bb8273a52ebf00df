use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{
    decode::decode_into,
    diagnostic::Diagnostics,
    document::Document,
    encode::encode_document,
    format::FormatError,
    graph::SceneGraph,
    settings::{DiagnosticPolicy, SaveSettings},
    storage::{FileStorage, Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum SaveLoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("{} problem(s) found while processing the save data", .0.len())]
    Rejected(Diagnostics),
}

/// Saves, loads and deletes the game state of a scene.
///
/// Saving writes the whole document in one go. Loading applies the document to the entities
/// already in the scene; it never creates or destroys anything. Problems with individual
/// entities, components or fields are logged and returned as [`Diagnostics`]. Only storage and
/// parse failures fail a call, and a failed load leaves the scene untouched.
pub struct GameStateManager<S: Storage = FileStorage> {
    storage: S,
    settings: SaveSettings,
}

impl GameStateManager<FileStorage> {
    /// A manager writing to the directory resolved from `settings`.
    pub fn with_file_storage(settings: SaveSettings) -> Self {
        let storage = FileStorage::new(settings.resolve_directory());
        Self::new(storage, settings)
    }

    /// Full path of the save file.
    pub fn file_path(&self) -> PathBuf {
        self.storage.path_of(self.settings.locator())
    }
}

impl<S: Storage> GameStateManager<S> {
    pub fn new(storage: S, settings: SaveSettings) -> Self {
        Self { storage, settings }
    }

    #[inline]
    pub fn settings(&self) -> &SaveSettings {
        &self.settings
    }

    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[inline]
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    #[inline]
    pub fn locator(&self) -> &Path {
        self.settings.locator()
    }

    #[inline]
    pub fn exists(&self) -> bool {
        self.storage.exists(self.locator())
    }

    pub fn save<G: SceneGraph + ?Sized>(&mut self, graph: &G) -> Result<Diagnostics, SaveLoadError> {
        let res = self.save_inner(graph);
        if let Err(err) = &res {
            log::warn!("Error writing game save: {err}");
        }
        res
    }

    pub fn load<G: SceneGraph + ?Sized>(&self, graph: &mut G) -> Result<Diagnostics, SaveLoadError> {
        let res = self
            .storage
            .read_text(self.locator())
            .map_err(SaveLoadError::from)
            .and_then(|text| self.decode_from_str(graph, &text));

        match &res {
            Ok(diagnostics) => log::info!(
                "Loaded game save from '{}' ({} problem(s))",
                self.locator().display(),
                diagnostics.len()
            ),
            Err(err) => log::warn!("Error reading game save: {err}"),
        }
        res
    }

    pub fn delete(&mut self) -> Result<(), SaveLoadError> {
        match self.storage.delete(self.settings.locator()) {
            Ok(()) => {
                log::info!("Deleted game save '{}'", self.locator().display());
                Ok(())
            }
            Err(err) => {
                log::warn!("Error deleting game save: {err}");
                Err(err.into())
            }
        }
    }

    /// Encodes `graph` with the configured format without touching storage.
    pub fn encode_to_string<G: SceneGraph + ?Sized>(
        &self,
        graph: &G,
    ) -> Result<(String, Diagnostics), SaveLoadError> {
        let mut diagnostics = Diagnostics::new();
        let document = encode_document(graph, &mut diagnostics);
        let text = self
            .settings
            .format
            .serialize(&document, self.settings.pretty)?;
        Ok((text, diagnostics))
    }

    /// Parses `text` with the configured format and applies it to `graph`. The graph is only
    /// touched once the whole text has parsed.
    pub fn decode_from_str<G: SceneGraph + ?Sized>(
        &self,
        graph: &mut G,
        text: &str,
    ) -> Result<Diagnostics, SaveLoadError> {
        let tree: serde_json::Value = self.settings.format.deserialize(text)?;

        let mut diagnostics = Diagnostics::new();
        let document = Document::from_tree(tree, &mut diagnostics)?;
        decode_into(graph, &document, &mut diagnostics);

        self.finish(diagnostics)
    }

    fn save_inner<G: SceneGraph + ?Sized>(&mut self, graph: &G) -> Result<Diagnostics, SaveLoadError> {
        let (text, diagnostics) = self.encode_to_string(graph)?;
        let diagnostics = self.finish(diagnostics)?;

        let locator = self.settings.locator().to_owned();
        self.storage.write_text(&locator, &text)?;

        log::info!("Game saved to '{}'", locator.display());
        Ok(diagnostics)
    }

    fn finish(&self, diagnostics: Diagnostics) -> Result<Diagnostics, SaveLoadError> {
        diagnostics.log_all();
        match self.settings.policy {
            DiagnosticPolicy::Strict if !diagnostics.is_empty() => {
                Err(SaveLoadError::Rejected(diagnostics))
            }
            _ => Ok(diagnostics),
        }
    }
}
