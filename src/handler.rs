//! Group permission handler.
//!
//! `OgPermissionHandler` composes a discovery source, the base assembler, and
//! the module list. Building a catalog fills role defaults and swaps symbolic
//! role tokens for concrete role ids; discovery runs at most once per handler.

use crate::assembly::{CallbackRegistry, PermissionAssembler};
use crate::catalog::PermissionCatalog;
use crate::discovery::{DEFAULT_BASENAME, DiscoveredDocuments, Discovery, YamlDiscovery};
use crate::modules::ModuleList;
use anyhow::Result;
use std::sync::{Mutex, OnceLock};
use tracing::{debug, info};

/// Read access to a permission catalog.
pub trait PermissionHandler {
    /// Every permission, fully resolved, in display order.
    fn get_permissions(&self) -> Result<PermissionCatalog>;

    /// Whether any permission in the catalog was provided by `module`.
    fn module_provides_permissions(&self, module: &str) -> Result<bool> {
        Ok(self
            .get_permissions()?
            .iter()
            .any(|(_, permission)| permission.provider == module))
    }
}

#[derive(Debug)]
/// Group permission handler over any discovery source.
pub struct OgPermissionHandler<D> {
    discovery: D,
    assembler: PermissionAssembler,
    modules: ModuleList,
    documents: OnceLock<DiscoveredDocuments>,
    discovering: Mutex<()>,
}

impl OgPermissionHandler<YamlDiscovery> {
    /// Handler reading `<module>.og_permissions.yml` from every listed module.
    pub fn for_modules(modules: ModuleList, callbacks: CallbackRegistry) -> Result<Self> {
        Self::with_basename(modules, callbacks, DEFAULT_BASENAME)
    }

    pub fn with_basename(
        modules: ModuleList,
        callbacks: CallbackRegistry,
        basename: &str,
    ) -> Result<Self> {
        let discovery = YamlDiscovery::new(basename, modules.module_directories());
        Ok(Self::new(
            discovery,
            PermissionAssembler::new(callbacks)?,
            modules,
        ))
    }
}

impl<D: Discovery> OgPermissionHandler<D> {
    pub fn new(discovery: D, assembler: PermissionAssembler, modules: ModuleList) -> Self {
        Self {
            discovery,
            assembler,
            modules,
            documents: OnceLock::new(),
            discovering: Mutex::new(()),
        }
    }

    pub fn modules(&self) -> &ModuleList {
        &self.modules
    }

    /// Discovered documents, read on first use and kept for the handler's life.
    ///
    /// A failed discovery is not remembered, so a later call tries again.
    pub fn documents(&self) -> Result<&DiscoveredDocuments> {
        if let Some(documents) = self.documents.get() {
            return Ok(documents);
        }

        let _guard = self
            .discovering
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        if let Some(documents) = self.documents.get() {
            return Ok(documents);
        }

        let found = self.discovery.find_all()?;
        debug!(modules = found.len(), "permission discovery complete");
        Ok(self.documents.get_or_init(|| found))
    }

    /// Catalog in merge order with defaults applied and every role resolved.
    pub fn build_catalog(&self) -> Result<PermissionCatalog> {
        let documents = self.documents()?;
        let entries = self.assembler.assemble(documents)?;
        let catalog: PermissionCatalog = entries
            .into_iter()
            .map(|(name, entry)| (name, entry.resolve()))
            .collect();
        info!(permissions = catalog.len(), "built group permission catalog");
        Ok(catalog)
    }

    /// Catalog ordered by provider display name, then title.
    pub fn get_catalog(&self) -> Result<PermissionCatalog> {
        let mut catalog = self.build_catalog()?;
        self.sort_permissions(&mut catalog);
        Ok(catalog)
    }

    fn sort_permissions(&self, catalog: &mut PermissionCatalog) {
        catalog.sort_by(|a, b| {
            self.modules
                .display_name(&a.provider)
                .cmp(self.modules.display_name(&b.provider))
                .then_with(|| a.title.cmp(&b.title))
        });
    }
}

impl<D: Discovery> PermissionHandler for OgPermissionHandler<D> {
    fn get_permissions(&self) -> Result<PermissionCatalog> {
        self.get_catalog()
    }
}
