use std::path::{Component, Path};

use super::dto::ArtifactKind;

const DIRECTORY_RULES: &[(&str, ArtifactKind)] = &[
    ("pipes", ArtifactKind::Pipe),
    ("filters", ArtifactKind::Filter),
    ("tools", ArtifactKind::Tool),
];

/// Resolves the artifact kind. An explicit override always wins; otherwise the
/// first path segment (from the root) naming a known directory decides.
/// `None` means the path is unclassifiable and the caller must not publish it.
pub fn classify(path: &Path, kind_override: Option<ArtifactKind>) -> Option<ArtifactKind> {
    if kind_override.is_some() {
        return kind_override;
    }

    path.components()
        .filter_map(|component| match component {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        })
        .find_map(|segment| {
            DIRECTORY_RULES
                .iter()
                .find(|(dir, _)| *dir == segment)
                .map(|(_, kind)| *kind)
        })
}
