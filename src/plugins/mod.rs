pub mod dto;
pub mod kind;
pub mod metadata;
pub mod payload;

pub use dto::{ArtifactKind, DeploymentPayload, Metadata, PayloadMeta, SourceArtifact};
pub use kind::classify;
pub use metadata::extract;
pub use payload::{build, build_from_metadata};
