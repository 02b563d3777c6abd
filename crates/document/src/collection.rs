//! A named, schema-validated namespace of documents over one shared engine.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use engine::{Engine, GetResult};
use schema::{CollectionLookup, Document, NoCollections, Schema};
use uuid::Uuid;

use crate::error::CollectionError;
use crate::filter::{self, Filter};
use crate::handle::DocumentHandle;
use crate::scan;

const NO_COLLECTIONS: NoCollections = NoCollections;

/// A name-to-collection lookup handed to `insert`/`update` for `ref` rules.
///
/// Borrowed, not owned: the caller assembles this from whichever sibling
/// collections a reference rule might need, once, before the call.
pub struct Collections<'a>(HashMap<&'a str, &'a Collection>);

impl<'a> Collections<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    #[must_use]
    pub fn with(mut self, name: &'a str, collection: &'a Collection) -> Self {
        self.0.insert(name, collection);
        self
    }
}

impl Default for Collections<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionLookup for Collections<'_> {
    fn exists(&self, name: &str, id: &str) -> bool {
        self.0
            .get(name)
            .is_some_and(|c| matches!(c.get(id), Ok(Some(_))))
    }
}

/// A named collection of schema-validated documents, namespaced under the
/// engine key prefix `<name>:`.
///
/// Interior mutability (the schema's uniqueness registry, the lazy-init
/// flag) lets `Store` hand out plain `&Collection` references — including
/// several at once, which `insert`/`update` need to resolve `ref` rules
/// against sibling collections while also touching their own registry.
pub struct Collection {
    name: String,
    prefix: String,
    engine: Rc<RefCell<Engine>>,
    schema: RefCell<Option<Schema>>,
    registry_initialized: Cell<bool>,
}

impl Collection {
    pub(crate) fn new(name: String, engine: Rc<RefCell<Engine>>, schema: Option<Schema>) -> Self {
        let prefix = format!("{name}:");
        Self {
            name,
            prefix,
            engine,
            schema: RefCell::new(schema),
            registry_initialized: Cell::new(false),
        }
    }

    /// This collection's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn key(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }

    /// Rebuilds the schema's uniqueness registry from a full scan, once per
    /// process lifetime, the first time a unique-constrained collection is
    /// touched by an insert or update.
    fn ensure_registry(&self) -> Result<(), CollectionError> {
        if self.registry_initialized.get() {
            return Ok(());
        }
        let needs_scan = self
            .schema
            .borrow()
            .as_ref()
            .is_some_and(Schema::has_unique_fields);
        if needs_scan {
            let docs = scan::scan_docs(&self.engine.borrow(), &self.prefix)?;
            if let Some(schema) = self.schema.borrow_mut().as_mut() {
                for (_, doc) in &docs {
                    schema.register(doc);
                }
            }
            tracing::debug!(collection = %self.name, records = docs.len(), "uniqueness registry rebuilt");
        }
        self.registry_initialized.set(true);
        Ok(())
    }

    /// Inserts a new document, generating a v4 UUID identifier when `id` is
    /// `None`. Validates against the schema (if any) before writing;
    /// gathers existing documents for uniqueness checks only when the
    /// schema declares at least one `unique` rule.
    pub fn insert(
        &self,
        doc: Document,
        id: Option<String>,
        collections: Option<&Collections<'_>>,
    ) -> Result<String, CollectionError> {
        self.ensure_registry()?;
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let schema_ref = self.schema.borrow();
        if let Some(schema) = schema_ref.as_ref() {
            let existing_owned = if schema.has_unique_fields() {
                scan::scan_docs(&self.engine.borrow(), &self.prefix)?
            } else {
                Vec::new()
            };
            let existing: Vec<&Document> = existing_owned.iter().map(|(_, d)| d).collect();
            let lookup: &dyn CollectionLookup = match collections {
                Some(c) => c,
                None => &NO_COLLECTIONS,
            };
            schema.validate(&doc, &existing, lookup, None)?;
        }
        drop(schema_ref);

        let payload = serde_json::to_string(&doc)?;
        self.engine.borrow_mut().put(&self.key(&id), &payload)?;

        if let Some(schema) = self.schema.borrow_mut().as_mut() {
            schema.register(&doc);
        }

        tracing::debug!(collection = %self.name, id = %id, "document inserted");
        Ok(id)
    }

    /// Fetches the live document at `id`, or `None` if absent or deleted.
    pub fn get(&self, id: &str) -> Result<Option<Document>, CollectionError> {
        match self.engine.borrow().get(&self.key(id))? {
            GetResult::Value(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            GetResult::Deleted | GetResult::NotFound => Ok(None),
        }
    }

    /// Merge-updates the document at `id`: `patch` fields overlay the
    /// current document's fields, the result is validated (with the
    /// document being updated excluded from the uniqueness source), then
    /// written and registered. Fails with [`CollectionError::NotFound`] if
    /// `id` has no live document.
    pub fn update(
        &self,
        id: &str,
        patch: Document,
        collections: Option<&Collections<'_>>,
    ) -> Result<(), CollectionError> {
        self.ensure_registry()?;
        let current = self
            .get(id)?
            .ok_or_else(|| CollectionError::NotFound { id: id.to_string() })?;

        let mut merged = current.clone();
        merged.extend(patch);

        let schema_ref = self.schema.borrow();
        if let Some(schema) = schema_ref.as_ref() {
            let existing_owned = if schema.has_unique_fields() {
                scan::scan_docs(&self.engine.borrow(), &self.prefix)?
                    .into_iter()
                    .filter(|(doc_id, _)| doc_id != id)
                    .collect::<Vec<_>>()
            } else {
                Vec::new()
            };
            let existing: Vec<&Document> = existing_owned.iter().map(|(_, d)| d).collect();
            let lookup: &dyn CollectionLookup = match collections {
                Some(c) => c,
                None => &NO_COLLECTIONS,
            };
            schema.validate(&merged, &existing, lookup, Some(&current))?;
        }
        drop(schema_ref);

        let payload = serde_json::to_string(&merged)?;
        self.engine.borrow_mut().put(&self.key(id), &payload)?;

        if let Some(schema) = self.schema.borrow_mut().as_mut() {
            schema.reregister(&current, &merged);
        }

        tracing::debug!(collection = %self.name, id = %id, "document updated");
        Ok(())
    }

    /// All live documents matching `filter`, stopping once `limit` results
    /// are collected (`None` or `Some(0)` is unbounded).
    pub fn find_all(
        &self,
        filter: Option<&Filter>,
        limit: Option<usize>,
    ) -> Result<Vec<DocumentHandle>, CollectionError> {
        let docs = scan::scan_docs(&self.engine.borrow(), &self.prefix)?;
        let mut results = Vec::new();
        for (id, doc) in docs {
            if filter::matches(&doc, filter) {
                results.push(DocumentHandle::new(id, doc));
                if let Some(limit) = limit {
                    if limit > 0 && results.len() >= limit {
                        break;
                    }
                }
            }
        }
        Ok(results)
    }

    /// The first live document matching `filter`, if any.
    pub fn find_one(&self, filter: Option<&Filter>) -> Result<Option<DocumentHandle>, CollectionError> {
        Ok(self.find_all(filter, Some(1))?.into_iter().next())
    }

    /// Alias for [`Collection::find_all`], matching the public API's naming.
    pub fn find(
        &self,
        filter: Option<&Filter>,
        limit: Option<usize>,
    ) -> Result<Vec<DocumentHandle>, CollectionError> {
        self.find_all(filter, limit)
    }
}
