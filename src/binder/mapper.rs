//! Binder facade.
//!
//! [`Mapper`] is the public surface of the binding engine: `bind`
//! populates a `#[derive(Bindable)]` struct from a [`Values`] map and
//! `encode` serializes one back. A mapper owns its schema cache and
//! decoder registry; both `bind` and `encode` are `&self` and safe to
//! call concurrently from any number of threads, including for the same
//! target type.
//!
//! Binding is not transactional: a bind that fails on one field leaves
//! the fields applied before it in place. Callers reusing a target
//! across multiple bind attempts must account for this.
//!
//! A process-wide default mapper backs the free [`bind`] and [`encode`]
//! functions for the common no-custom-decoder case.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::trace;

use super::cache::SchemaCache;
use super::coerce;
use super::error::BindError;
use super::field::{Bindable, FieldKind};
use super::schema::{self, DecodeFn, PathStep, Schema};
use crate::values::Values;

static DEFAULT_MAPPER: Lazy<Mapper> = Lazy::new(Mapper::new);

/// Bind `src` into `dst` using the process-wide default mapper.
pub fn bind<T: Bindable>(src: &Values, dst: &mut T) -> Result<(), BindError> {
    DEFAULT_MAPPER.bind(src, dst)
}

/// Encode `src` into a [`Values`] map using the process-wide default
/// mapper.
pub fn encode<T: Bindable>(src: &T) -> Result<Values, BindError> {
    DEFAULT_MAPPER.encode(src)
}

/// The binding engine: schema cache, decoder registry, and the
/// `bind`/`encode` entry points.
pub struct Mapper {
    cache: SchemaCache,
    decoders: HashMap<TypeId, DecodeFn>,
}

impl Mapper {
    pub fn new() -> Mapper {
        Mapper {
            cache: SchemaCache::new(),
            decoders: HashMap::new(),
        }
    }

    /// Register a custom decoder for fields of declared type `T`,
    /// superseding built-in coercion for those fields.
    ///
    /// Decoders are resolved into a type's schema when that schema is
    /// first built; register them before the first `bind`/`encode` of
    /// any type containing a `T` field. Registration after the fact
    /// does not change an already-cached schema (`use_decoder` takes
    /// `&mut self`, so a shared mapper can no longer be modified).
    pub fn use_decoder<T, F>(&mut self, decode: F)
    where
        T: Send + 'static,
        F: Fn(&str, &[String]) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.decoders.insert(
            TypeId::of::<T>(),
            Arc::new(move |name, values| {
                decode(name, values).map(|value| Box::new(value) as Box<dyn Any + Send>)
            }),
        );
    }

    /// The cached schema of `T`, building and publishing it on first
    /// use.
    pub fn schema_of<T: Bindable>(&self) -> Arc<Schema> {
        self.cache
            .get_or_build(TypeId::of::<T>(), || schema::build_schema::<T>(&self.decoders))
    }

    /// Populate `dst` from the multi-valued map `src`.
    ///
    /// For each schema field the external name is looked up in `src`;
    /// an absent key (or an explicitly present empty value list) falls
    /// back to the field's declared defaults, or leaves the field
    /// untouched when it has none. No field is ever required.
    ///
    /// Fails fast on the first coercion or decoder error;
    /// already-applied fields stay applied.
    pub fn bind<T: Bindable>(&self, src: &Values, dst: &mut T) -> Result<(), BindError> {
        let schema = self.schema_of::<T>();

        for desc in &schema.fields {
            let values: &[String] = match src.get_all(&desc.name) {
                Some(values) if !values.is_empty() => values,
                _ => {
                    if desc.defaults.is_empty() {
                        continue;
                    }
                    &desc.defaults
                }
            };

            let slot = resolve_mut(&mut *dst, &desc.path, schema.type_name)?;

            if let Some(decoder) = &desc.decoder {
                let decoded = decoder(&desc.name, values).map_err(|source| BindError::Decoder {
                    field: desc.name.clone(),
                    source,
                })?;
                if !(desc.store)(slot, decoded) {
                    return Err(BindError::Decoder {
                        field: desc.name.clone(),
                        source: anyhow::anyhow!("decoder produced a value of the wrong type"),
                    });
                }
                trace!(field = %desc.name, "applied custom decoder");
                continue;
            }

            coerce::assign(&desc.kind, schema.type_name, &desc.name, slot, values)?;
            trace!(field = %desc.name, "applied field");
        }

        Ok(())
    }

    /// Serialize `src` into a multi-valued map.
    ///
    /// Scalars render to their canonical decimal/boolean text; list
    /// fields append one entry per element under the same name,
    /// preserving order. `omitempty` fields contribute nothing when
    /// they hold their kind's zero value. An unset `Option<Box<_>>`
    /// substructure prunes its whole branch.
    pub fn encode<T: Bindable>(&self, src: &T) -> Result<Values, BindError> {
        let schema = self.schema_of::<T>();
        let mut out = Values::new();

        for desc in &schema.fields {
            let slot = match resolve_ref(src, &desc.path, schema.type_name)? {
                Some(slot) => slot,
                None => continue,
            };

            match desc.kind {
                FieldKind::Scalar(kind) => {
                    if let Some(rendered) = coerce::render_scalar(kind, slot, desc.omit_empty) {
                        out.add(&desc.name, rendered);
                    }
                }
                FieldKind::List(kind) => {
                    for rendered in coerce::render_list(kind, slot, desc.omit_empty) {
                        out.add(&desc.name, rendered);
                    }
                }
                // No built-in renderer; decoder-only and renamed nested
                // fields contribute nothing to encoded output.
                FieldKind::Nested(_) | FieldKind::Opaque => {}
            }
        }

        Ok(out)
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Mapper::new()
    }
}

/// Walk `path` down from `root`, allocating unset `Option<Box<_>>`
/// intermediates, and return the final field slot.
fn resolve_mut<'a>(
    root: &'a mut dyn Any,
    path: &[PathStep],
    type_name: &'static str,
) -> Result<&'a mut dyn Any, BindError> {
    let mut current = root;
    for (i, step) in path.iter().enumerate() {
        let slot = (step.get_mut)(current).ok_or(BindError::InvalidTarget { type_name })?;
        if i + 1 == path.len() {
            return Ok(slot);
        }
        let enter = step.enter_mut.ok_or(BindError::InvalidTarget { type_name })?;
        current = enter(slot).ok_or(BindError::InvalidTarget { type_name })?;
    }
    Err(BindError::InvalidTarget { type_name })
}

/// Walk `path` down from `root` read-only. `Ok(None)` means the branch
/// is pruned by an unset `Option<Box<_>>` link; a root that does not
/// match the schema at all is an [`BindError::InvalidSource`].
fn resolve_ref<'a>(
    root: &'a dyn Any,
    path: &[PathStep],
    type_name: &'static str,
) -> Result<Option<&'a dyn Any>, BindError> {
    let mut current = root;
    for (i, step) in path.iter().enumerate() {
        let slot = match (step.get)(current) {
            Some(slot) => slot,
            None if i == 0 => return Err(BindError::InvalidSource { type_name }),
            None => return Ok(None),
        };
        if i + 1 == path.len() {
            return Ok(Some(slot));
        }
        let enter = match step.enter {
            Some(enter) => enter,
            None => return Ok(None),
        };
        current = match enter(slot) {
            Some(inner) => inner,
            None => return Ok(None),
        };
    }
    Ok(None)
}
