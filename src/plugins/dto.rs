use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PublishError, Result};

/// A plugin source file as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArtifact {
    pub path: PathBuf,
    pub text: String,
}

impl SourceArtifact {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|e| PublishError::read_error(path, e))?;
        Ok(Self::new(path, text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Pipe,
    Filter,
    Tool,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Pipe => "pipe",
            ArtifactKind::Filter => "filter",
            ArtifactKind::Tool => "tool",
        }
    }

    /// Registry collection this kind is stored under. Pipes and filters are both
    /// "functions" on the registry side.
    pub fn collection(&self) -> &'static str {
        match self {
            ArtifactKind::Pipe | ArtifactKind::Filter => "/api/v1/functions",
            ArtifactKind::Tool => "/api/v1/tools",
        }
    }

    pub fn create_path(&self) -> String {
        format!("{}/create", self.collection())
    }

    pub fn update_path(&self, id: &str) -> String {
        format!("{}/id/{}/update", self.collection(), urlencoding::encode(id))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pipe" => Ok(ArtifactKind::Pipe),
            "filter" => Ok(ArtifactKind::Filter),
            "tool" => Ok(ArtifactKind::Tool),
            other => Err(format!("unknown artifact kind: {}", other)),
        }
    }
}

/// Wire record posted to the registry. Field order is the serialization order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentPayload {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    pub content: String,
    pub meta: PayloadMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadMeta {
    pub description: String,
}
