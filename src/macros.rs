//! Macros for declaring dataset namespaces.

/// Declares a dataset namespace with a single macro invocation.
///
/// The `{name => "source"}` list is the only place a dataset is declared. The
/// macro generates a module containing:
/// - `NAMESPACE`, `DATA_DIR` and `DATASETS` (the declared `DatasetSpec` table)
/// - `Datasets`, a struct with one accessor method per dataset that implements
///   `DatasetNamespace`
/// - `shared()`, a process-wide `Datasets` built on first use with a
///   `CsvLoader` over `DATA_DIR`
/// - free functions `names()`, `attr(name)` and one per dataset, all reading
///   from `shared()`
///
/// Dataset names must not collide with the generated items above.
///
/// # Examples
///
/// ```rust
/// use dataset_registry::{define_datasets, DatasetNamespace};
///
/// define_datasets! {
///     pub mod inventory {
///         data_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/data"),
///         datasets: {
///             machines => "machines.csv",
///             persons => "persons.csv",
///         }
///     }
/// }
///
/// // Free functions backed by the shared instance
/// let machines = inventory::machines().unwrap();
/// assert_eq!(machines[0][0], "id");
///
/// // Or an explicitly owned instance with its own cache
/// let owned = inventory::Datasets::new();
/// assert!(!owned.is_loaded("persons"));
/// assert_eq!(owned.names(), vec!["machines", "persons"]);
/// ```
///
/// # Custom loaders
///
/// ```rust
/// use dataset_registry::{define_datasets, DatasetError, Table};
///
/// define_datasets! {
///     mod fixtures {
///         data_dir: "unused",
///         datasets: {
///             colors => "colors.csv",
///         }
///     }
/// }
///
/// let ns = fixtures::Datasets::with_loader(|_: &str| -> Result<Table, DatasetError> {
///     Ok(vec![vec!["red".to_string()]])
/// });
/// assert_eq!(ns.colors().unwrap()[0][0], "red");
/// ```
#[macro_export]
macro_rules! define_datasets {
    (
        $(#[$meta:meta])*
        $vis:vis mod $name:ident {
            data_dir: $dir:expr,
            datasets: {
                $( $(#[$ds_meta:meta])* $ds:ident => $source:expr ),+ $(,)?
            } $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis mod $name {
            #![allow(dead_code)]

            use std::sync::{Arc, LazyLock};

            /// Name reported by this namespace in errors.
            pub const NAMESPACE: &str = stringify!($name);

            /// Directory the default loader reads from.
            pub const DATA_DIR: &str = $dir;

            /// The declared datasets, in declaration order.
            pub static DATASETS: &[$crate::DatasetSpec] = &[
                $( $crate::DatasetSpec::new(stringify!($ds), $source), )+
            ];

            /// Accessor with one method per declared dataset.
            ///
            /// Each instance owns its cache: two instances load independently.
            pub struct Datasets {
                registry: $crate::Registry,
            }

            impl Datasets {
                /// Creates an instance reading CSV files from `DATA_DIR`.
                pub fn new() -> Self {
                    Self::with_loader($crate::CsvLoader::new(DATA_DIR))
                }

                pub fn with_loader(loader: impl $crate::TableLoader + 'static) -> Self {
                    Self {
                        registry: $crate::Registry::new(DATASETS, loader),
                    }
                }

                $(
                    $(#[$ds_meta])*
                    pub fn $ds(&self) -> Result<Arc<$crate::Table>, $crate::NamespaceError> {
                        $crate::DatasetNamespace::attr(self, stringify!($ds))
                    }
                )+
            }

            impl Default for Datasets {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl $crate::DatasetNamespace for Datasets {
                fn namespace(&self) -> &str {
                    NAMESPACE
                }

                fn registry(&self) -> &$crate::Registry {
                    &self.registry
                }
            }

            impl std::fmt::Debug for Datasets {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.debug_struct("Datasets")
                        .field("namespace", &NAMESPACE)
                        .field("registry", &self.registry)
                        .finish()
                }
            }

            // Process-wide instance (module-private)
            static SHARED: LazyLock<Datasets> = LazyLock::new(Datasets::new);

            /// The process-wide instance, built on first use.
            pub fn shared() -> &'static Datasets {
                &SHARED
            }

            // Free functions for ergonomic usage - they delegate to SHARED

            /// The declared dataset names. Never triggers a load.
            pub fn names() -> Vec<&'static str> {
                DATASETS.iter().map(|spec| spec.name).collect()
            }

            /// Resolves a dataset by name on the shared instance.
            pub fn attr(name: &str) -> Result<Arc<$crate::Table>, $crate::NamespaceError> {
                $crate::DatasetNamespace::attr(shared(), name)
            }

            $(
                $(#[$ds_meta])*
                pub fn $ds() -> Result<Arc<$crate::Table>, $crate::NamespaceError> {
                    shared().$ds()
                }
            )+
        }
    };
}
