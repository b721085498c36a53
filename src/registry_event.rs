/// Events emitted by a registry during lookups.
///
/// These events are passed to the tracing callback set via
/// [`Registry::set_trace_callback`](crate::Registry::set_trace_callback).
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use dataset_registry::RegistryEvent;
///
/// let event = RegistryEvent::Hit { name: "machines" };
/// assert_eq!(event.to_string(), "hit { name: machines }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// The loader was invoked for an empty slot.
    ///
    /// Always followed by `Loaded` or `LoadFailed` for the same name.
    Load {
        /// The dataset being loaded
        name: &'static str,
        /// The source identifier handed to the loader
        source_id: &'static str,
    },

    /// The loader returned a table and the slot is now filled.
    Loaded {
        name: &'static str,
        /// Number of rows stored
        rows: usize,
    },

    /// The loader failed; the slot stays empty.
    LoadFailed {
        name: &'static str,
        source_id: &'static str,
    },

    /// A filled slot was read.
    Hit { name: &'static str },

    /// A name outside the declared set was requested.
    Unknown { name: String },
}

impl RegistryEvent {
    /// The dataset name the event refers to.
    pub fn name(&self) -> &str {
        match self {
            RegistryEvent::Load { name, .. }
            | RegistryEvent::Loaded { name, .. }
            | RegistryEvent::LoadFailed { name, .. }
            | RegistryEvent::Hit { name } => *name,
            RegistryEvent::Unknown { name } => name.as_str(),
        }
    }
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Load { name, source_id } => {
                write!(f, "load {{ name: {}, source: {} }}", name, source_id)
            }
            RegistryEvent::Loaded { name, rows } => {
                write!(f, "loaded {{ name: {}, rows: {} }}", name, rows)
            }
            RegistryEvent::LoadFailed { name, source_id } => {
                write!(f, "load failed {{ name: {}, source: {} }}", name, source_id)
            }
            RegistryEvent::Hit { name } => write!(f, "hit {{ name: {} }}", name),
            RegistryEvent::Unknown { name } => write!(f, "unknown {{ name: {} }}", name),
        }
    }
}
