//! # Document — collections, schema-validated documents, and the store
//!
//! Layers a key-namespacing scheme, a merged scan-with-shadowing iterator,
//! and declarative schema validation on top of the [`engine`] crate's plain
//! string-keyed LSM store. A [`Store`] owns one [`engine::Engine`] and a
//! registry of named [`Collection`]s; each collection sees only the keys
//! under its own `<name>:` prefix.
//!
//! ## Module responsibilities
//!
//! | Module       | Purpose                                               |
//! |--------------|--------------------------------------------------------|
//! | `error`      | `CollectionError`                                      |
//! | `handle`     | `DocumentHandle`, the query-result wrapper              |
//! | `filter`     | Flat conjunctive filter evaluation                      |
//! | `scan`       | Prefix-scoped, newest-wins scan over memtable + SSTables|
//! | `collection` | `Collection`: insert/get/update/find, `Collections`     |
//! | `store`      | `Store`: engine ownership, collection registry          |

mod collection;
mod error;
mod filter;
mod handle;
mod scan;
mod store;

pub use collection::{Collection, Collections};
pub use error::CollectionError;
pub use filter::{FieldFilter, Filter};
pub use handle::DocumentHandle;
pub use store::Store;

pub use schema::{
    Bound, CollectionLookup, Document, FieldRules, FieldValue, Schema, TypeRule, ValidationError,
};

#[cfg(test)]
mod tests;
