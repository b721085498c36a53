//! Namespace-style access to a [`Registry`].
//!
//! A namespace reads datasets the way one reads attributes of an object:
//! `namespace.attr("machines")` or, for namespaces generated by
//! [`define_datasets!`](crate::define_datasets), `namespace.machines()`.
//! Unknown names fail as missing attributes of the namespace.

use std::fmt;
use std::sync::Arc;

use crate::{DatasetSpec, NamespaceError, Registry, Table, TableLoader};

/// Core trait defining namespace behavior.
///
/// Provides default implementations for all lookups, requiring only
/// two accessor methods (`namespace` and `registry`) from the implementor.
pub trait DatasetNamespace {
    /// The name the namespace reports in errors.
    fn namespace(&self) -> &str;

    /// The registry holding the namespace's datasets.
    fn registry(&self) -> &Registry;

    /// The exported dataset names, in declaration order.
    fn names(&self) -> Vec<&'static str> {
        self.registry().names()
    }

    fn has_attr(&self, name: &str) -> bool {
        self.registry().contains(name)
    }

    /// Whether `name` has already been loaded. Never triggers a load.
    fn is_loaded(&self, name: &str) -> bool {
        self.registry().is_loaded(name)
    }

    /// Resolves `name` through the registry, loading it on first access.
    ///
    /// # Errors
    ///
    /// - [`NamespaceError::NoSuchAttribute`] when `name` is not exported
    /// - [`NamespaceError::Load`] when the loader fails; a later call retries
    fn attr(&self, name: &str) -> Result<Arc<Table>, NamespaceError> {
        self.registry()
            .get(name)
            .map_err(|err| NamespaceError::from_registry(self.namespace(), name, err))
    }
}

/// A namespace assembled at runtime.
///
/// Every lookup goes through [`DatasetNamespace::attr`] by name; there is no
/// per-dataset method.
///
/// # Examples
///
/// ```rust
/// use dataset_registry::{
///     DatasetError, DatasetNamespace, DatasetSpec, Namespace, NamespaceError, Table,
/// };
///
/// static CATALOG: &[DatasetSpec] = &[DatasetSpec::new("persons", "persons.csv")];
///
/// let ns = Namespace::new("people", CATALOG, |_: &str| -> Result<Table, DatasetError> {
///     Ok(vec![vec!["name".to_string()]])
/// });
///
/// assert_eq!(ns.attr("persons").unwrap().len(), 1);
/// assert!(matches!(ns.attr("vehicles"), Err(NamespaceError::NoSuchAttribute { .. })));
/// ```
pub struct Namespace {
    name: String,
    registry: Registry,
}

impl Namespace {
    pub fn new(
        name: impl Into<String>,
        catalog: &'static [DatasetSpec],
        loader: impl TableLoader + 'static,
    ) -> Self {
        Self::from_registry(name, Registry::new(catalog, loader))
    }

    pub fn from_registry(name: impl Into<String>, registry: Registry) -> Self {
        Self {
            name: name.into(),
            registry,
        }
    }
}

impl DatasetNamespace for Namespace {
    fn namespace(&self) -> &str {
        &self.name
    }

    fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("registry", &self.registry)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
