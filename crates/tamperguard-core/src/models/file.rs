use bytes::Bytes;

use crate::constants::ENCRYPTED_PREFIX;

/// A file as handed over by the picker, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub content: Bytes,
    pub mime_type: String,
}

impl FileCandidate {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<Bytes>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// A file accepted by the selection step.
///
/// Only [`crate::selection::validate_candidate`] builds one, so holding a
/// `SelectedFile` means the content type has already been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content: Bytes,
    mime_type: String,
}

impl SelectedFile {
    pub(crate) fn accepted(name: String, content: Bytes, mime_type: String) -> Self {
        Self {
            name,
            content,
            mime_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cheap clone of the file bytes.
    pub fn content(&self) -> Bytes {
        self.content.clone()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Name under which the service stores the processed artifact.
    pub fn encrypted_name(&self) -> String {
        format!("{}{}", ENCRYPTED_PREFIX, self.name)
    }
}
