use super::dto::{ArtifactKind, DeploymentPayload, Metadata, PayloadMeta};

/// Assembles the registry record. `content` is carried verbatim, header included.
pub fn build(
    id: &str,
    kind: ArtifactKind,
    content: &str,
    description: &str,
    title: &str,
) -> DeploymentPayload {
    DeploymentPayload {
        id: id.to_string(),
        name: title.to_string(),
        kind,
        content: content.to_string(),
        meta: PayloadMeta {
            description: description.to_string(),
        },
    }
}

pub fn build_from_metadata(
    metadata: &Metadata,
    kind: ArtifactKind,
    content: &str,
) -> DeploymentPayload {
    build(
        &metadata.id,
        kind,
        content,
        &metadata.description,
        &metadata.title,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_structure() {
        let payload = build("pid", ArtifactKind::Pipe, "code", "desc", "MyTitle");
        assert_eq!(payload.id, "pid");
        assert_eq!(payload.name, "MyTitle");
        assert_eq!(payload.kind, ArtifactKind::Pipe);
        assert_eq!(payload.content, "code");
        assert_eq!(payload.meta.description, "desc");
    }

    #[test]
    fn serializes_to_registry_shape() {
        let payload = build("pid", ArtifactKind::Filter, "code", "desc", "MyTitle");
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "pid",
                "name": "MyTitle",
                "type": "filter",
                "content": "code",
                "meta": { "description": "desc" }
            })
        );
    }

    #[test]
    fn identical_inputs_serialize_identically() {
        let a = build("pid", ArtifactKind::Tool, "x = 1\n", "d", "t");
        let b = build("pid", ArtifactKind::Tool, "x = 1\n", "d", "t");
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[test]
    fn content_is_verbatim() {
        let source = "\"\"\"\nid: pid\n\"\"\"\n\n  print('hi')  \n";
        let metadata = Metadata {
            id: "pid".into(),
            title: "pid".into(),
            description: String::new(),
        };
        let payload = build_from_metadata(&metadata, ArtifactKind::Pipe, source);
        assert_eq!(payload.content, source);
    }
}
