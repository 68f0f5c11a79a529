//! # Binder Module
//!
//! Tag-driven data binding between multi-valued string maps (parsed
//! form or query parameters, see [`Values`](crate::values::Values)) and
//! plain Rust structs.
//!
//! ## Overview
//!
//! The binder is organized as a small pipeline:
//!
//! - [`tag`] parses each field's raw `#[form("...")]` string into a
//!   [`FieldDirective`] (rename, defaults, omit-empty, skip).
//! - [`field`] is the schema source replacing runtime reflection: every
//!   `#[derive(Bindable)]` type exposes a table of [`FieldSpec`]s with
//!   accessor function pointers and a [`FieldKind`] tag per field.
//! - [`schema`] flattens those tables breadth-first into one ordered
//!   [`Schema`] per type, resolving name collisions first-seen-wins and
//!   attaching custom decoders.
//! - `cache` keeps built schemas behind a lock-free snapshot so a
//!   schema is built at most once per type per mapper.
//! - `coerce` converts raw strings to typed values and back,
//!   dispatching on the kind tag.
//! - `mapper` is the facade: [`Mapper::bind`], [`Mapper::encode`],
//!   decoder registration, and the default-instance free functions.
//!
//! ## Example
//!
//! ```rust,ignore
//! use formbind::{bind, Bindable, Values};
//!
//! #[derive(Default, Bindable)]
//! struct Human {
//!     #[form("name")]
//!     name: String,
//!     #[form("age,default=20")]
//!     age: i32,
//! }
//!
//! let mut values = Values::new();
//! values.add("name", "name6");
//!
//! let mut human = Human::default();
//! bind(&values, &mut human)?;
//! assert_eq!(human.age, 20);
//! # Ok::<(), formbind::BindError>(())
//! ```

mod cache;
mod coerce;
mod error;
mod mapper;

pub mod field;
pub mod schema;
pub mod tag;

pub use error::BindError;
pub use field::{
    AccessFn, AccessMutFn, BindField, Bindable, FieldKind, FieldSpec, NestedSpec, ScalarKind,
    StoreFn,
};
pub use mapper::{bind, encode, Mapper};
pub use schema::{DecodeFn, FieldDescriptor, PathStep, Schema};
pub use tag::FieldDirective;
