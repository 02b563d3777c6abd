//! Owns the engine and the name-to-collection registry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use config::Config;
use engine::Engine;
use schema::Schema;

use crate::collection::Collection;
use crate::error::CollectionError;

/// The top-level handle: one engine, many named collections.
///
/// `collection` hands out `Rc<Collection>` rather than a borrowed reference
/// so a caller can hold several collections at once — needed to build a
/// [`crate::Collections`] lookup for `ref` validation while inserting into
/// a different collection.
pub struct Store {
    engine: Rc<RefCell<Engine>>,
    collections: RefCell<HashMap<String, Rc<Collection>>>,
}

impl Store {
    /// Opens (or creates) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>, config: Config) -> Result<Self, CollectionError> {
        let engine = Engine::open(dir.as_ref(), config)?;
        Ok(Self {
            engine: Rc::new(RefCell::new(engine)),
            collections: RefCell::new(HashMap::new()),
        })
    }

    /// Returns the named collection, creating it with `schema` if it
    /// doesn't exist yet. A schema passed on a later call for an
    /// already-constructed collection is ignored — the first caller's
    /// schema wins.
    ///
    /// Panics if `name` contains `:`, the reserved collection/identifier
    /// separator.
    pub fn collection(&self, name: &str, schema: Option<Schema>) -> Rc<Collection> {
        assert!(
            !name.contains(':'),
            "collection name '{name}' must not contain ':'"
        );
        let mut collections = self.collections.borrow_mut();
        Rc::clone(collections.entry(name.to_string()).or_insert_with(|| {
            Rc::new(Collection::new(name.to_string(), Rc::clone(&self.engine), schema))
        }))
    }

    /// Merges every SSTable into one, newest-wins, dropping tombstones.
    pub fn compact(&self) -> Result<(), CollectionError> {
        self.engine.borrow_mut().compact()?;
        Ok(())
    }

    /// Flushes any remaining memtable contents and closes the underlying
    /// engine, releasing its WAL handle.
    ///
    /// Fails with [`CollectionError::EngineBusy`] if a `Collection` handle
    /// from this store is still alive elsewhere, since that handle holds
    /// its own `Rc` clone of the engine.
    pub fn close(self) -> Result<(), CollectionError> {
        drop(self.collections);
        let engine = Rc::try_unwrap(self.engine)
            .map_err(|_| CollectionError::EngineBusy)?
            .into_inner();
        engine.close()?;
        Ok(())
    }
}
