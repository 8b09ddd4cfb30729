//! Base permission assembly.
//!
//! Turns discovered declaration documents into validated `PermissionEntry`
//! records: plain-string shorthand becomes a title, `permission_callbacks`
//! pull in permissions registered from code, each entry is attributed to the
//! module that provided it, and the result is checked against
//! `schema/permission_entry.schema.json`. Role defaults and token resolution
//! are left to the handler.

use crate::catalog::PermissionEntry;
use crate::discovery::{DiscoveredDocuments, RawDocument};
use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexMap;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Reserved top-level key listing callbacks that contribute permissions.
pub const PERMISSION_CALLBACKS_KEY: &str = "permission_callbacks";

const ENTRY_SCHEMA: &str = include_str!("../schema/permission_entry.schema.json");

/// Permissions contributed from code rather than a declaration file.
///
/// Values follow the file format, including the plain-string title shorthand.
pub trait PermissionSource: Send + Sync {
    fn permissions(&self) -> Result<RawDocument>;
}

impl<F> PermissionSource for F
where
    F: Fn() -> Result<RawDocument> + Send + Sync,
{
    fn permissions(&self) -> Result<RawDocument> {
        self()
    }
}

#[derive(Default)]
/// Named permission sources that declaration files can reference.
pub struct CallbackRegistry {
    sources: BTreeMap<String, Box<dyn PermissionSource>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S>(&mut self, name: &str, source: S)
    where
        S: PermissionSource + 'static,
    {
        self.sources.insert(name.to_string(), Box::new(source));
    }

    pub fn get(&self, name: &str) -> Option<&dyn PermissionSource> {
        self.sources.get(name).map(|source| source.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.sources.keys()).finish()
    }
}

/// Merges discovered documents and registered callbacks into entries.
pub struct PermissionAssembler {
    callbacks: CallbackRegistry,
    schema: JSONSchema,
}

impl fmt::Debug for PermissionAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionAssembler")
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

impl PermissionAssembler {
    pub fn new(callbacks: CallbackRegistry) -> Result<Self> {
        let raw: Value =
            serde_json::from_str(ENTRY_SCHEMA).context("parsing permission entry schema")?;
        let schema = JSONSchema::compile(&raw)
            .map_err(|err| anyhow!("compiling permission entry schema: {err}"))?;
        Ok(Self { callbacks, schema })
    }

    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    /// Build validated entries from every discovered document.
    ///
    /// Declared permissions merge last-writer-wins in module order. Callback
    /// permissions only fill names no file declared, and the first callback
    /// to contribute a name keeps it.
    pub fn assemble(
        &self,
        documents: &DiscoveredDocuments,
    ) -> Result<IndexMap<String, PermissionEntry>> {
        let mut declared: IndexMap<String, Value> = IndexMap::new();
        let mut from_callbacks: IndexMap<String, Value> = IndexMap::new();

        for (provider, document) in documents {
            for (name, value) in document {
                if name == PERMISSION_CALLBACKS_KEY {
                    for callback in callback_names(provider, value)? {
                        let source = self.callbacks.get(&callback).ok_or_else(|| {
                            anyhow!("{provider} references unknown permission callback '{callback}'")
                        })?;
                        let contributed = source.permissions().with_context(|| {
                            format!("running permission callback '{callback}' for {provider}")
                        })?;
                        debug!(
                            provider = %provider,
                            callback = %callback,
                            count = contributed.len(),
                            "collected callback permissions"
                        );
                        for (cb_name, cb_value) in contributed {
                            from_callbacks
                                .entry(cb_name)
                                .or_insert_with(|| normalize(cb_value, provider));
                        }
                    }
                    continue;
                }
                declared.insert(name.clone(), normalize(value.clone(), provider));
            }
        }

        for (name, value) in from_callbacks {
            declared.entry(name).or_insert(value);
        }

        let mut entries = IndexMap::with_capacity(declared.len());
        for (name, value) in declared {
            let entry = self.validate(&name, value)?;
            entries.insert(name, entry);
        }
        Ok(entries)
    }

    fn validate(&self, name: &str, value: Value) -> Result<PermissionEntry> {
        if let Err(errors) = self.schema.validate(&value) {
            let details = errors
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            let provider = value
                .get("provider")
                .and_then(Value::as_str)
                .unwrap_or("unknown provider");
            bail!("permission '{name}' from {provider} failed validation:\n{details}");
        }
        serde_json::from_value(value).with_context(|| format!("decoding permission '{name}'"))
    }
}

fn callback_names(provider: &str, value: &Value) -> Result<Vec<String>> {
    let Some(items) = value.as_array() else {
        bail!("{provider}: {PERMISSION_CALLBACKS_KEY} must be a list of callback names");
    };
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                anyhow!("{provider}: {PERMISSION_CALLBACKS_KEY} entries must be strings")
            })
        })
        .collect()
}

// Expands the title shorthand and attributes the entry. Non-mapping values are
// left for schema validation to reject.
fn normalize(value: Value, provider: &str) -> Value {
    let mut value = match value {
        Value::String(title) => {
            let mut map = serde_json::Map::new();
            map.insert("title".to_string(), Value::String(title));
            Value::Object(map)
        }
        other => other,
    };
    if let Value::Object(map) = &mut value {
        map.entry("description").or_insert(Value::Null);
        let has_provider = map
            .get("provider")
            .and_then(Value::as_str)
            .is_some_and(|p| !p.is_empty());
        if !has_provider {
            map.insert("provider".to_string(), Value::String(provider.to_string()));
        }
    }
    value
}
