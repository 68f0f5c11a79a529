//! # formbind
//!
//! **formbind** binds multi-valued form/query data to plain Rust
//! structs and back, driven entirely by declarative `#[form("...")]`
//! field tags.
//!
//! ## Overview
//!
//! Given a [`Values`] map (field name → ordered list of string values,
//! the shape produced by parsing form-encoded or query-string data) and
//! a `#[derive(Bindable)]` struct, [`bind`] populates the struct's
//! fields according to their tags and [`encode`] performs the inverse.
//! The tag mini-language supports renaming, default values
//! (`default=v1;v2`), `omitempty`, and a `-` skip marker; nested
//! structs (and `Option<Box<Struct>>` fields) without a rename are
//! flattened into the parent, with outer fields shadowing inner ones on
//! name collisions.
//!
//! Schemas are discovered once per type and cached behind a lock-free
//! snapshot, so `bind`/`encode` are cheap and safe to call from any
//! number of threads. Types the built-in coercion engine does not know
//! bind through decoders registered on a [`Mapper`] instance.
//!
//! ## Architecture
//!
//! - **[`binder`]** - tag parsing, schema discovery and caching, value
//!   coercion, and the [`Mapper`] facade
//! - **[`values`]** - the multi-valued string map shared by the binder,
//!   URL handling, and callers
//! - **[`url`]** - a URL value object with query manipulation through
//!   [`Values`]
//! - **[`bufferpool`]** - byte-buffer recycling for surrounding I/O
//!   code
//! - **[`dump`]** - body drain-and-duplicate so a body can be parsed
//!   once and still forwarded unconsumed
//!
//! ## Example
//!
//! ```rust,ignore
//! use formbind::{bind, encode, Bindable, Values};
//!
//! #[derive(Default, Bindable)]
//! struct Human {
//!     #[form("name")]
//!     name: String,
//!     #[form("age,default=20")]
//!     age: i32,
//!     #[form("birthday")]
//!     birthday: String,
//! }
//!
//! let values = Values::parse_query("name=name6&birthday=2023-07-10");
//! let mut human = Human::default();
//! bind(&values, &mut human)?;
//! assert_eq!(human.age, 20);
//!
//! let encoded = encode(&human)?;
//! assert_eq!(encoded.get("name"), Some("name6"));
//! # Ok::<(), formbind::BindError>(())
//! ```

// Let the derive macro's `::formbind::` paths resolve inside this
// crate's own tests.
extern crate self as formbind;

pub mod binder;
pub mod bufferpool;
pub mod dump;
pub mod url;
pub mod values;

pub use binder::{bind, encode, BindError, BindField, Bindable, FieldKind, Mapper, ScalarKind};
pub use bufferpool::BufferPool;
pub use dump::{drain_body, Body};
pub use url::Url;
pub use values::Values;

/// Derives the [`Bindable`] field table from a struct's `#[form]` tags.
pub use formbind_macros::Bindable;
