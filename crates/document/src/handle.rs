//! Query-result wrapper pairing an identifier with its document.

use std::ops::Deref;

use schema::Document;

/// A document paired with the identifier it was stored under.
///
/// Storage carries no identifier inside the payload itself; `find`/`get`
/// attach it here as a separate attribute of the result rather than
/// forwarding attribute access onto the inner map at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentHandle {
    id: String,
    doc: Document,
}

impl DocumentHandle {
    pub(crate) fn new(id: String, doc: Document) -> Self {
        Self { id, doc }
    }

    /// The identifier this document was stored under.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The document's field map.
    #[must_use]
    pub fn payload(&self) -> &Document {
        &self.doc
    }

    /// Consumes the handle, returning the owned document.
    #[must_use]
    pub fn into_payload(self) -> Document {
        self.doc
    }
}

impl Deref for DocumentHandle {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.doc
    }
}
