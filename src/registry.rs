//! A registry of lazily loaded, memoized datasets.
//!
//! Each declared dataset owns one slot. A slot starts empty, is filled by the
//! first successful [`Registry::get`], and is never emptied again. Failed loads
//! leave the slot empty so the next lookup retries.
//!
//! # Examples
//!
//! ```
//! use dataset_registry::{DatasetError, DatasetSpec, Registry, Table};
//!
//! static CATALOG: &[DatasetSpec] = &[DatasetSpec::new("machines", "machines.csv")];
//!
//! let registry = Registry::new(CATALOG, |source_id: &str| -> Result<Table, DatasetError> {
//!     Ok(vec![vec![source_id.to_string()]])
//! });
//!
//! assert!(!registry.is_loaded("machines"));
//! let machines = registry.get("machines").unwrap();
//! assert_eq!(machines[0][0], "machines.csv");
//! assert!(registry.is_loaded("machines"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use log::{debug, info, trace, warn};
use once_cell::sync::OnceCell;

use crate::{DatasetError, RegistryEvent, Table, TableLoader};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the registry is
/// interacted with. It must be thread-safe because a registry may be shared across threads.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// One declared dataset: its name and the source identifier handed to the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatasetSpec {
    pub name: &'static str,
    pub source: &'static str,
}

impl DatasetSpec {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }
}

struct Slot {
    spec: DatasetSpec,
    table: OnceCell<Arc<Table>>,
}

/// Write-once, read-many cache of datasets keyed by name.
///
/// The set of names is fixed at construction. The loader runs at most once per
/// name for the lifetime of the registry, also under concurrent first access:
/// other callers block until the first load finishes and then share its result.
pub struct Registry {
    slots: Vec<Slot>,
    index: HashMap<&'static str, usize>,
    loader: Box<dyn TableLoader>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl Registry {
    /// Creates a registry over `catalog`, loading through `loader`.
    ///
    /// Declaration order is kept. A name declared twice keeps its first source.
    pub fn new(catalog: &'static [DatasetSpec], loader: impl TableLoader + 'static) -> Self {
        let mut slots = Vec::with_capacity(catalog.len());
        let mut index = HashMap::with_capacity(catalog.len());

        for spec in catalog {
            if index.contains_key(spec.name) {
                warn!(
                    "event=dataset_declare module=registry status=duplicate name={} source={}",
                    spec.name, spec.source
                );
                continue;
            }
            index.insert(spec.name, slots.len());
            slots.push(Slot {
                spec: *spec,
                table: OnceCell::new(),
            });
        }

        Self {
            slots,
            index,
            loader: Box::new(loader),
            trace: Mutex::new(None),
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Sets a tracing callback that will be invoked on every lookup.
    ///
    /// The callback runs after the slot it reports on has been released, so it
    /// may read from this registry again, including the dataset being reported.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clears the tracing callback.
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    fn emit_event(&self, event: &RegistryEvent) {
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------------------------------

    /// The declared dataset names, in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.slots.iter().map(|slot| slot.spec.name).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The source identifier declared for `name`.
    pub fn source_of(&self, name: &str) -> Option<&'static str> {
        self.slot(name).map(|slot| slot.spec.source)
    }

    /// Whether `name` has been loaded. Never triggers a load.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|slot| slot.table.get().is_some())
    }

    /// Names whose slot is filled, in declaration order.
    pub fn loaded_names(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter(|slot| slot.table.get().is_some())
            .map(|slot| slot.spec.name)
            .collect()
    }

    fn slot(&self, name: &str) -> Option<&Slot> {
        self.index.get(name).map(|&i| &self.slots[i])
    }

    // -------------------------------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------------------------------

    /// Returns the table for `name`, loading it on first access.
    ///
    /// Every successful call for the same name returns the same `Arc`.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::UnknownDataset`] if `name` was not declared; the loader is not called
    /// - any error from the loader; the slot stays empty and the next call retries
    pub fn get(&self, name: &str) -> Result<Arc<Table>, DatasetError> {
        let Some(slot) = self.slot(name) else {
            debug!("event=dataset_lookup module=registry status=unknown name={name}");
            self.emit_event(&RegistryEvent::Unknown {
                name: name.to_string(),
            });
            return Err(DatasetError::UnknownDataset {
                name: name.to_string(),
            });
        };

        if let Some(table) = slot.table.get() {
            trace!("event=dataset_lookup module=registry status=hit name={name}");
            self.emit_event(&RegistryEvent::Hit {
                name: slot.spec.name,
            });
            return Ok(Arc::clone(table));
        }

        // Events for this load fire only after the slot is released, so a
        // callback may look the same name up again.
        let mut outcome = None;
        let result = slot
            .table
            .get_or_try_init(|| {
                let loaded = self.load(&slot.spec);
                outcome = Some(loaded.as_ref().map(|table| table.len()).map_err(|_| ()));
                loaded
            })
            .map(Arc::clone);

        if let Some(outcome) = outcome {
            self.emit_event(&RegistryEvent::Load {
                name: slot.spec.name,
                source_id: slot.spec.source,
            });
            match outcome {
                Ok(rows) => self.emit_event(&RegistryEvent::Loaded {
                    name: slot.spec.name,
                    rows,
                }),
                Err(()) => self.emit_event(&RegistryEvent::LoadFailed {
                    name: slot.spec.name,
                    source_id: slot.spec.source,
                }),
            }
        }

        result
    }

    /// Returns an owned copy of the table for `name`.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::get`].
    pub fn get_cloned(&self, name: &str) -> Result<Table, DatasetError> {
        let table = self.get(name)?;
        Ok((*table).clone())
    }

    fn load(&self, spec: &DatasetSpec) -> Result<Arc<Table>, DatasetError> {
        info!(
            "event=dataset_load module=registry status=start name={} source={}",
            spec.name, spec.source
        );

        match self.loader.load_table(spec.source) {
            Ok(table) => {
                info!(
                    "event=dataset_load module=registry status=ok name={} rows={}",
                    spec.name,
                    table.len()
                );
                Ok(Arc::new(table))
            }
            Err(err) => {
                warn!(
                    "event=dataset_load module=registry status=error name={} source={} error={}",
                    spec.name, spec.source, err
                );
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.names())
            .field("loaded", &self.loaded_names())
            .finish_non_exhaustive()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static CATALOG: &[DatasetSpec] = &[
        DatasetSpec::new("machines", "machines.csv"),
        DatasetSpec::new("persons", "persons.csv"),
    ];

    fn counting_registry() -> (Registry, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let registry = Registry::new(
            CATALOG,
            move |source_id: &str| -> Result<Table, DatasetError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(vec![vec![source_id.to_string()]])
            },
        );
        (registry, calls)
    }

    #[test]
    fn test_names_in_declaration_order() {
        let (registry, calls) = counting_registry();
        assert_eq!(registry.names(), vec!["machines", "persons"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_get_loads_once() -> Result<(), DatasetError> {
        let (registry, calls) = counting_registry();

        let first = registry.get("machines")?;
        let second = registry.get("machines")?;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[test]
    fn test_source_of() {
        let (registry, _) = counting_registry();
        assert_eq!(registry.source_of("persons"), Some("persons.csv"));
        assert_eq!(registry.source_of("vehicles"), None);
    }

    #[test]
    fn test_unknown_name_does_not_load() {
        let (registry, calls) = counting_registry();

        let err = registry.get("vehicles").unwrap_err();
        assert!(matches!(err, DatasetError::UnknownDataset { ref name } if name == "vehicles"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!registry.contains("vehicles"));
        assert!(registry.loaded_names().is_empty());
    }

    #[test]
    fn test_loaded_names_tracks_state() {
        let (registry, _) = counting_registry();
        assert!(registry.loaded_names().is_empty());

        registry.get("persons").unwrap();
        assert_eq!(registry.loaded_names(), vec!["persons"]);
        assert!(registry.is_loaded("persons"));
        assert!(!registry.is_loaded("machines"));
    }

    #[test]
    fn test_get_cloned() {
        let (registry, calls) = counting_registry();
        let owned = registry.get_cloned("machines").unwrap();
        assert_eq!(owned, vec![vec!["machines.csv".to_string()]]);
        registry.get_cloned("machines").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_declaration_keeps_first() {
        static DUPLICATED: &[DatasetSpec] = &[
            DatasetSpec::new("machines", "machines.csv"),
            DatasetSpec::new("machines", "other.csv"),
        ];
        let registry = Registry::new(
            DUPLICATED,
            |source_id: &str| -> Result<Table, DatasetError> {
                Ok(vec![vec![source_id.to_string()]])
            },
        );

        assert_eq!(registry.names(), vec!["machines"]);
        assert_eq!(registry.source_of("machines"), Some("machines.csv"));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let registry = Registry::new(
            CATALOG,
            move |source_id: &str| -> Result<Table, DatasetError> {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(DatasetError::ParseError {
                        source_id: source_id.to_string(),
                        line: 1,
                        detail: "broken".to_string(),
                    });
                }
                Ok(vec![vec!["ok".to_string()]])
            },
        );

        assert!(registry.get("machines").is_err());
        assert!(!registry.is_loaded("machines"));

        let table = registry.get("machines").unwrap();
        assert_eq!(table[0][0], "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        registry.get("machines").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_trace_events_for_load_and_hit() {
        let (registry, _) = counting_registry();
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        registry.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(e.to_string());
        });

        registry.get("machines").unwrap();
        registry.get("machines").unwrap();
        let _ = registry.get("vehicles");

        let captured = events.lock().unwrap();
        assert_eq!(
            *captured,
            vec![
                "load { name: machines, source: machines.csv }",
                "loaded { name: machines, rows: 1 }",
                "hit { name: machines }",
                "unknown { name: vehicles }",
            ]
        );
    }

    #[test]
    fn test_clear_trace_callback_stops_events() {
        let (registry, _) = counting_registry();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();

        registry.set_trace_callback(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        registry.get("persons").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);

        registry.clear_trace_callback();
        registry.get("persons").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_callback_can_get_the_dataset_it_reports() {
        let (registry, calls) = counting_registry();
        let registry = Arc::new(registry);
        let inner = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&registry);
        let inner_clone = inner.clone();
        registry.set_trace_callback(move |e| {
            if let RegistryEvent::Loaded { name, .. } = e {
                if let Some(registry) = weak.upgrade() {
                    inner_clone.lock().unwrap().push(registry.get(name).is_ok());
                }
            }
        });

        let (tx, rx) = std::sync::mpsc::channel();
        let worker = registry.clone();
        std::thread::spawn(move || {
            let _ = tx.send(worker.get("machines").is_ok());
        });

        let outer = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("get did not return while the callback read the same dataset");
        assert!(outer);
        assert_eq!(*inner.lock().unwrap(), vec![true]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_reports_load_then_failure() {
        let registry = Registry::new(
            CATALOG,
            |source_id: &str| -> Result<Table, DatasetError> {
                Err(DatasetError::ParseError {
                    source_id: source_id.to_string(),
                    line: 1,
                    detail: "broken".to_string(),
                })
            },
        );
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        registry.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(e.clone());
        });

        assert!(registry.get("persons").is_err());

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                RegistryEvent::Load {
                    name: "persons",
                    source_id: "persons.csv",
                },
                RegistryEvent::LoadFailed {
                    name: "persons",
                    source_id: "persons.csv",
                },
            ]
        );
    }

    #[test]
    fn test_debug_lists_state() {
        let (registry, _) = counting_registry();
        registry.get("machines").unwrap();
        let debug = format!("{:?}", registry);
        assert!(debug.contains("\"machines\", \"persons\""));
        assert!(debug.contains("loaded: [\"machines\"]"));
    }
}
