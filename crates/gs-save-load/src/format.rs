use ron::ser::PrettyConfig;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unable to serialize save data: {0}")]
    Serialize(String),
    #[error("unable to parse save data: {0}")]
    Parse(String),
    #[error("malformed save data: {0}")]
    Malformed(String),
}

/// Text encoding of a saved document.
pub trait SaveFormat: Send + Sync {
    const EXTENSION: &'static str;

    fn serialize<T: Serialize>(object: &T, pretty: bool) -> Result<String, FormatError>;

    fn deserialize<T: DeserializeOwned>(text: &str) -> Result<T, FormatError>;
}

pub struct Json;

pub struct Ron;

impl SaveFormat for Json {
    const EXTENSION: &'static str = "json";

    fn serialize<T: Serialize>(object: &T, pretty: bool) -> Result<String, FormatError> {
        let res = if pretty {
            serde_json::to_string_pretty(object)
        } else {
            serde_json::to_string(object)
        };
        res.map_err(|err| FormatError::Serialize(err.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(text: &str) -> Result<T, FormatError> {
        serde_json::from_str(text).map_err(|err| FormatError::Parse(err.to_string()))
    }
}

impl SaveFormat for Ron {
    const EXTENSION: &'static str = "ron";

    fn serialize<T: Serialize>(object: &T, pretty: bool) -> Result<String, FormatError> {
        let res = if pretty {
            ron::ser::to_string_pretty(object, PrettyConfig::default())
        } else {
            ron::ser::to_string(object)
        };
        res.map_err(|err| FormatError::Serialize(err.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(text: &str) -> Result<T, FormatError> {
        ron::de::from_str(text).map_err(|err| FormatError::Parse(err.to_string()))
    }
}

/// Runtime choice of [`SaveFormat`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatKind {
    #[default]
    Json,
    Ron,
}

impl FormatKind {
    pub fn extension(self) -> &'static str {
        match self {
            FormatKind::Json => Json::EXTENSION,
            FormatKind::Ron => Ron::EXTENSION,
        }
    }

    pub fn serialize<T: Serialize>(self, object: &T, pretty: bool) -> Result<String, FormatError> {
        match self {
            FormatKind::Json => Json::serialize(object, pretty),
            FormatKind::Ron => Ron::serialize(object, pretty),
        }
    }

    pub fn deserialize<T: DeserializeOwned>(self, text: &str) -> Result<T, FormatError> {
        match self {
            FormatKind::Json => Json::deserialize(text),
            FormatKind::Ron => Ron::deserialize(text),
        }
    }
}
