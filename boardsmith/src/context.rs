//! Build context
//!
//! One [`BuildContext`] is created per top-level build and handed down the
//! builder tree by reference. It carries:
//! - the shared [`IdAllocator`]
//! - the project's [`UnitSystem`]
//! - fields a parent sets for its direct children (`pcb_component_id`,
//!   `board_thickness`)
//!
//! Parent-set fields are never written in place. A parent derives a child
//! context with [`BuildContext::with_pcb_component`] /
//! [`BuildContext::with_board_thickness`], so siblings never observe each
//! other's values.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::core::{BuildError, BuildOptions};
use crate::units::{Length, UnitSystem};

/// Per-category monotonic id counters.
///
/// `get_id("pcb_component")` yields `pcb_component_0`, `pcb_component_1`, ...
/// Categories are independent namespaces.
#[derive(Debug, Default)]
pub struct IdAllocator {
    counters: Mutex<HashMap<String, u64>>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_id(&self, category: &str) -> String {
        let mut counters = match self.counters.lock() {
            Ok(guard) => guard,
            // A panic while holding the lock cannot leave a counter half-written
            Err(poisoned) => poisoned.into_inner(),
        };
        let next = counters.entry(category.to_string()).or_insert(0);
        let id = format!("{}_{}", category, *next);
        *next += 1;
        id
    }

    /// Number of ids issued so far for `category`
    pub fn issued(&self, category: &str) -> u64 {
        match self.counters.lock() {
            Ok(guard) => guard.get(category).copied().unwrap_or(0),
            Err(poisoned) => poisoned.into_inner().get(category).copied().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildContext {
    ids: Arc<IdAllocator>,
    pub units: UnitSystem,
    pub default_trace_width: f64,
    pub default_board_thickness: f64,
    /// Set by a component for its footprint primitives
    pub pcb_component_id: Option<String>,
    /// Set by a board for everything below it
    pub board_thickness: Option<f64>,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new(&BuildOptions::default())
    }
}

impl BuildContext {
    /// Fresh context with a fresh allocator.
    pub fn new(options: &BuildOptions) -> Self {
        Self {
            ids: Arc::new(IdAllocator::new()),
            units: options.units,
            default_trace_width: options.default_trace_width,
            default_board_thickness: options.default_board_thickness,
            pcb_component_id: None,
            board_thickness: None,
        }
    }

    /// Context sharing an existing allocator, e.g. to keep ids unique across
    /// several builds.
    pub fn with_allocator(options: &BuildOptions, ids: Arc<IdAllocator>) -> Self {
        Self {
            ids,
            ..Self::new(options)
        }
    }

    pub fn get_id(&self, category: &str) -> String {
        self.ids.get_id(category)
    }

    pub fn allocator(&self) -> &Arc<IdAllocator> {
        &self.ids
    }

    pub fn convert(&self, length: &Length) -> Result<f64, BuildError> {
        self.units.convert(length)
    }

    pub fn convert_opt(&self, length: Option<&Length>, default: f64) -> Result<f64, BuildError> {
        match length {
            Some(l) => self.convert(l),
            None => Ok(default),
        }
    }

    /// Child context for the footprint of `pcb_component_id`
    pub fn with_pcb_component(&self, pcb_component_id: &str) -> Self {
        Self {
            pcb_component_id: Some(pcb_component_id.to_string()),
            ..self.clone()
        }
    }

    /// Child context for everything placed on a board
    pub fn with_board_thickness(&self, thickness: f64) -> Self {
        Self {
            board_thickness: Some(thickness),
            ..self.clone()
        }
    }

    /// The owning pcb component id, or `UnboundOwner` outside a component
    pub fn require_pcb_component(&self) -> Result<&str, BuildError> {
        self.pcb_component_id
            .as_deref()
            .ok_or_else(|| BuildError::UnboundOwner {
                missing: "pcb_component".to_string(),
            })
    }
}
