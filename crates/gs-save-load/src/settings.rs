use std::path::{Path, PathBuf};

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

use crate::format::FormatKind;

pub const DEFAULT_FILE_NAME: &str = "GameState.json";

/// What the manager does with diagnostics after a pass.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticPolicy {
    /// Log them and report success.
    #[default]
    Warn,
    /// Log them and fail the call.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSettings {
    /// Name of the save file inside the save directory.
    pub file_name: String,
    /// Overrides the per-user data directory.
    pub directory: Option<PathBuf>,
    /// Folder created under the per-user data directory.
    pub product_name: String,
    pub format: FormatKind,
    pub pretty: bool,
    pub policy: DiagnosticPolicy,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.into(),
            directory: None,
            product_name: "gamestate".into(),
            format: FormatKind::Json,
            pretty: true,
            policy: DiagnosticPolicy::Warn,
        }
    }
}

impl SaveSettings {
    /// Reads settings from a RON file. `None` if the file is missing or unreadable.
    pub fn load(path: impl AsRef<Path>) -> Option<Self> {
        let file = std::fs::File::open(path).ok()?;
        let reader = std::io::BufReader::new(file);
        ron::de::from_reader::<_, SaveSettings>(reader).ok()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let text = ron::ser::to_string_pretty(self, PrettyConfig::default())
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        std::fs::write(path, text)
    }

    /// The explicit directory if set, otherwise `<data dir>/<product name>`, otherwise `./saves`.
    pub fn resolve_directory(&self) -> PathBuf {
        if let Some(directory) = &self.directory {
            return directory.clone();
        }

        match dirs::data_dir() {
            Some(data) => data.join(&self.product_name),
            None => PathBuf::from("./saves"),
        }
    }

    #[inline]
    pub fn locator(&self) -> &Path {
        Path::new(&self.file_name)
    }
}
