//! Schema discovery.
//!
//! A schema is the flattened, ordered list of bound fields for one
//! target type. It is produced by a breadth-first walk over the type's
//! field table: a nested struct (or `Option<Box<Struct>>`) field whose
//! tag carries no rename is not bound itself; its members are promoted
//! into the enclosing schema as if declared directly on it. Because the
//! walk is breadth-first, a name declared on the outer type always wins
//! over the same name reached through deeper embedding (first-seen-wins
//! shadowing).
//!
//! Custom decoders are resolved here, once per field, from the owning
//! mapper's registry; a decoder registered after a type's schema has
//! been cached does not retroactively change that schema.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::field::{AccessFn, AccessMutFn, Bindable, FieldKind, FieldSpec, StoreFn};
use super::tag::FieldDirective;

/// Custom string-to-value decoder, registered per declared field type.
///
/// Receives the field's external name and the raw value list; the
/// produced box must hold the field's declared type.
pub type DecodeFn =
    Arc<dyn Fn(&str, &[String]) -> anyhow::Result<Box<dyn Any + Send>> + Send + Sync>;

/// One step on the accessor path from a root value to a field slot.
#[derive(Debug, Clone, Copy)]
pub struct PathStep {
    /// Parent struct to field slot (read).
    pub get: AccessFn,
    /// Parent struct to field slot (write).
    pub get_mut: AccessMutFn,
    /// Field slot to inner struct; set only on intermediate
    /// (flattened) steps.
    pub enter: Option<AccessFn>,
    /// As `enter`, allocating unset `Option<Box<_>>` links on the way.
    pub enter_mut: Option<AccessMutFn>,
}

/// One bound field of a schema.
#[derive(Clone)]
pub struct FieldDescriptor {
    /// External key looked up in the input map.
    pub name: String,
    /// Accessor steps from the root type to the field; longer than one
    /// step only when the field lives inside a flattened substructure.
    pub path: Vec<PathStep>,
    /// Defaults applied when the input has no entry for `name`.
    pub defaults: Vec<String>,
    /// Suppress the zero value from encoded output.
    pub omit_empty: bool,
    /// Kind tag driving coercion and encode dispatch.
    pub kind: FieldKind,
    /// Stores a decoder-produced boxed value into the field slot.
    pub store: StoreFn,
    /// Custom decoder resolved at build time, superseding built-in
    /// coercion for this field.
    pub decoder: Option<DecodeFn>,
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("path_len", &self.path.len())
            .field("defaults", &self.defaults)
            .field("omit_empty", &self.omit_empty)
            .field("kind", &self.kind)
            .field("has_decoder", &self.decoder.is_some())
            .finish()
    }
}

/// Immutable, flattened schema of one bindable type.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Type name, for diagnostics.
    pub type_name: &'static str,
    /// Bound fields in discovery order.
    pub fields: Vec<FieldDescriptor>,
}

/// Build the schema of `T` by breadth-first flattening.
pub(crate) fn build_schema<T: Bindable>(decoders: &HashMap<TypeId, DecodeFn>) -> Schema {
    let type_name = T::type_name();

    let mut queue: VecDeque<(fn() -> Vec<FieldSpec>, Vec<PathStep>)> = VecDeque::new();
    queue.push_back((T::fields, Vec::new()));

    let mut seen: HashSet<String> = HashSet::new();
    let mut fields: Vec<FieldDescriptor> = Vec::new();

    while let Some((table, prefix)) = queue.pop_front() {
        for spec in table() {
            let directive = FieldDirective::parse(spec.tag);
            if directive.skip {
                continue;
            }

            // No rename on a nested field: flatten its members into
            // this schema instead of binding the field itself.
            if directive.name.is_empty() {
                if let FieldKind::Nested(nested) = spec.kind {
                    let mut path = prefix.clone();
                    path.push(PathStep {
                        get: spec.get,
                        get_mut: spec.get_mut,
                        enter: Some(nested.enter),
                        enter_mut: Some(nested.enter_mut),
                    });
                    queue.push_back((nested.fields, path));
                    continue;
                }
            }

            let name = if directive.name.is_empty() {
                spec.ident.to_string()
            } else {
                directive.name
            };

            // First-seen-wins: a shallower field already claimed this
            // external name.
            if !seen.insert(name.clone()) {
                continue;
            }

            let mut path = prefix.clone();
            path.push(PathStep {
                get: spec.get,
                get_mut: spec.get_mut,
                enter: None,
                enter_mut: None,
            });

            fields.push(FieldDescriptor {
                name,
                path,
                defaults: directive.defaults,
                omit_empty: directive.omit_empty,
                kind: spec.kind,
                store: spec.store,
                decoder: decoders.get(&spec.type_id).cloned(),
            });
        }
    }

    debug!(type_name, field_count = fields.len(), "built binding schema");

    Schema { type_name, fields }
}
