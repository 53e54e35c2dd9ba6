use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, info, warn};

use crate::error::{PublishError, Result};
use crate::plugins::{build_from_metadata, classify, extract};
use crate::plugins::{ArtifactKind, DeploymentPayload, SourceArtifact};
use crate::registry::RegistryClient;

/// Directories searched when no paths are given on the command line.
pub const DEFAULT_ROOTS: &[&str] = &["functions", "tools"];

const SOURCE_EXTENSION: &str = "py";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    Created,
    Updated,
    DryRun,
}

#[derive(Debug, Clone)]
pub struct Published {
    pub id: String,
    pub kind: ArtifactKind,
    pub action: PublishAction,
    /// Final registry status; `None` for dry runs.
    pub status: Option<u16>,
    pub payload: DeploymentPayload,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<Published>,
}

impl FileOutcome {
    /// One-line summary: `ok  <path> (<id> → <status>)` or `err <path>: <error>`.
    pub fn status_line(&self) -> String {
        match &self.result {
            Ok(published) => format!(
                "ok  {} ({} → {})",
                self.path.display(),
                published.id,
                published
                    .status
                    .map(|status| status.to_string())
                    .unwrap_or_else(|| "dry-run".to_string())
            ),
            Err(e) => format!("err {}: {}", self.path.display(), e),
        }
    }
}

#[derive(Debug, Default)]
pub struct PublishReport {
    pub outcomes: Vec<FileOutcome>,
}

impl PublishReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

pub struct Publisher {
    client: RegistryClient,
    kind_override: Option<ArtifactKind>,
    dry_run: bool,
}

impl Publisher {
    pub fn new(client: RegistryClient) -> Self {
        Self {
            client,
            kind_override: None,
            dry_run: false,
        }
    }

    pub fn with_kind_override(mut self, kind: Option<ArtifactKind>) -> Self {
        self.kind_override = kind;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Publishes every file in order. A failure is recorded against its file
    /// and never stops the remaining ones.
    pub async fn publish_all(&self, paths: &[PathBuf]) -> PublishReport {
        let mut report = PublishReport::default();
        for path in paths {
            let result = self.publish_file(path).await;
            match &result {
                Ok(published) => info!(
                    path = %path.display(),
                    id = %published.id,
                    kind = %published.kind,
                    status = ?published.status,
                    "Published"
                ),
                Err(e) => warn!(path = %path.display(), error = %e, "Publish failed"),
            }
            report.outcomes.push(FileOutcome {
                path: path.clone(),
                result,
            });
        }
        report
    }

    pub async fn publish_file(&self, path: &Path) -> Result<Published> {
        let artifact = SourceArtifact::load(path)?;
        self.publish_artifact(&artifact).await
    }

    pub async fn publish_artifact(&self, artifact: &SourceArtifact) -> Result<Published> {
        let metadata = extract(&artifact.text)?;
        let kind = classify(&artifact.path, self.kind_override)
            .ok_or_else(|| PublishError::classification_failure(&artifact.path))?;
        let payload = build_from_metadata(&metadata, kind, &artifact.text);

        if self.dry_run {
            return Ok(Published {
                id: metadata.id,
                kind,
                action: PublishAction::DryRun,
                status: None,
                payload,
            });
        }

        let status = self.client.publish(&kind.create_path(), &payload).await?;
        if is_success(status) {
            return Ok(Published {
                id: metadata.id,
                kind,
                action: PublishAction::Created,
                status: Some(status),
                payload,
            });
        }

        if !is_existing_id(status) {
            return Err(PublishError::RegistryRejected {
                id: metadata.id,
                status,
            });
        }

        // Create is refused when the id already exists; fall back to update.
        debug!(id = %metadata.id, status, "Create refused, trying update");
        let status = self
            .client
            .publish(&kind.update_path(&metadata.id), &payload)
            .await?;
        if is_success(status) {
            Ok(Published {
                id: metadata.id,
                kind,
                action: PublishAction::Updated,
                status: Some(status),
                payload,
            })
        } else {
            Err(PublishError::RegistryRejected {
                id: metadata.id,
                status,
            })
        }
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Statuses the registry uses to refuse a create for an id it already holds.
fn is_existing_id(status: u16) -> bool {
    matches!(status, 400 | 409)
}

/// Expands the given roots into a sorted, de-duplicated list of plugin sources.
/// Files are taken as-is; directories are walked for `.py` files.
pub fn discover(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in roots {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        if !root.is_dir() {
            return Err(PublishError::read_error(
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
            ));
        }

        for result in WalkBuilder::new(root).hidden(true).git_ignore(true).build() {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION)
            {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    debug!(count = files.len(), "Discovered plugin sources");
    Ok(files)
}

pub fn default_roots() -> Vec<PathBuf> {
    DEFAULT_ROOTS
        .iter()
        .map(PathBuf::from)
        .filter(|p| p.is_dir())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryTarget;
    use std::fs;

    fn dry_run_publisher() -> Publisher {
        let client = RegistryClient::new(RegistryTarget {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: "k".to_string(),
            timeout_secs: 1,
        });
        Publisher::new(client).with_dry_run(true)
    }

    #[test]
    fn discover_walks_directories_for_python_sources() {
        let dir = tempfile::tempdir().unwrap();
        let pipes = dir.path().join("functions/pipes");
        let filters = dir.path().join("functions/filters");
        fs::create_dir_all(&pipes).unwrap();
        fs::create_dir_all(&filters).unwrap();
        fs::write(pipes.join("b.py"), "id: b").unwrap();
        fs::write(filters.join("a.py"), "id: a").unwrap();
        fs::write(pipes.join("README.md"), "docs").unwrap();

        let files = discover(&[dir.path().join("functions")]).unwrap();
        assert_eq!(files, vec![filters.join("a.py"), pipes.join("b.py")]);
    }

    #[test]
    fn discover_keeps_explicit_files_and_dedups() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plugin.txt");
        fs::write(&file, "id: x").unwrap();

        let files = discover(&[file.clone(), file.clone()]).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn discover_rejects_missing_root() {
        let err = discover(&[PathBuf::from("no/such/root")]).unwrap_err();
        assert!(matches!(err, PublishError::ReadError { .. }));
    }

    #[tokio::test]
    async fn dry_run_builds_payload_without_http() {
        let artifact = SourceArtifact::new(
            "functions/pipes/chat.py",
            "\"\"\"\ntitle: Chat\nid: chat\n\"\"\"\n",
        );
        let published = dry_run_publisher()
            .publish_artifact(&artifact)
            .await
            .unwrap();
        assert_eq!(published.action, PublishAction::DryRun);
        assert_eq!(published.status, None);
        assert_eq!(published.kind, ArtifactKind::Pipe);
        assert_eq!(published.payload.name, "Chat");
        assert_eq!(published.payload.content, artifact.text);
    }

    #[test]
    fn status_lines_name_id_and_status() {
        let payload = crate::plugins::build("chat", ArtifactKind::Pipe, "code", "", "Chat");
        let ok = FileOutcome {
            path: PathBuf::from("functions/pipes/chat.py"),
            result: Ok(Published {
                id: "chat".to_string(),
                kind: ArtifactKind::Pipe,
                action: PublishAction::Updated,
                status: Some(200),
                payload,
            }),
        };
        assert_eq!(ok.status_line(), "ok  functions/pipes/chat.py (chat → 200)");

        let err = FileOutcome {
            path: PathBuf::from("misc/x.py"),
            result: Err(PublishError::RegistryRejected {
                id: "x".to_string(),
                status: 503,
            }),
        };
        assert_eq!(
            err.status_line(),
            "err misc/x.py: Registry rejected x with status 503"
        );
    }

    #[tokio::test]
    async fn unclassifiable_path_is_reported() {
        let artifact = SourceArtifact::new("misc/chat.py", "id: chat");
        let err = dry_run_publisher()
            .publish_artifact(&artifact)
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::ClassificationFailure { .. }));
    }

    #[tokio::test]
    async fn failures_do_not_stop_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let pipes = dir.path().join("pipes");
        fs::create_dir_all(&pipes).unwrap();
        let good = pipes.join("good.py");
        let bad = pipes.join("bad.py");
        fs::write(&good, "id: good").unwrap();
        fs::write(&bad, "title: no id here").unwrap();

        let report = dry_run_publisher()
            .publish_all(&[bad.clone(), good.clone()])
            .await;
        assert_eq!(report.outcomes.len(), 2);
        assert!(matches!(
            report.outcomes[0].result,
            Err(PublishError::MissingIdentifier)
        ));
        assert!(report.outcomes[1].result.is_ok());
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
    }
}
