//! Core types shared by the builders and the CLI.
//! No I/O beyond the optional design-file helpers.

use serde::Serialize;

use crate::elements::Element;
use crate::units::UnitSystem;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("<{builder} /> \"{property}\" is not set")]
    MissingRequiredProperty { builder: String, property: String },
    #[error("No addable in {container} builder for builder_type: \"{kind}\"")]
    UnknownAddable { container: String, kind: String },
    #[error("{child} can't be added to a {parent} (try adding to a component)")]
    IllegalChild { parent: String, child: String },
    #[error("Port \"{name}\" is already registered on {owner}")]
    DuplicatePortName { owner: String, name: String },
    #[error("Port registry is not bound to a {missing} id")]
    UnboundOwner { missing: String },
    #[error("Could not resolve \"{selector}\": {reason}")]
    UnresolvedPort { selector: String, reason: String },
    #[error("Selector \"{selector}\" matched {matches} {what}")]
    AmbiguousPort {
        selector: String,
        matches: usize,
        what: String,
    },
    #[error("Invalid selector \"{0}\"")]
    InvalidSelector(String),
    #[error("Trace needs at least 2 connections, got {found}")]
    InsufficientConnections { found: usize },
    #[error("Invalid quantity \"{value}\": {reason}")]
    InvalidQuantity { value: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Design file error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    pub(crate) fn missing(builder: &str, property: &str) -> Self {
        BuildError::MissingRequiredProperty {
            builder: builder.to_string(),
            property: property.to_string(),
        }
    }
}

/// Options for a build run (library or CLI).
#[derive(Clone, Debug)]
pub struct BuildOptions {
    pub units: UnitSystem,
    /// Trace width (base unit) used when a trace sets no `thickness`.
    pub default_trace_width: f64,
    /// Board thickness (base unit) used when a board sets none.
    pub default_board_thickness: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            units: UnitSystem::default(),
            default_trace_width: 0.15,
            default_board_thickness: 1.2,
        }
    }
}

/// Result of a top-level build: the ordered element list plus counts.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutput {
    pub elements: Vec<Element>,
    pub stats: BuildStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub components: usize,
    pub ports: usize,
    pub traces: usize,
    pub nets: usize,
    pub pads: usize,
    pub boards: usize,
}

impl BuildOutput {
    pub fn new(elements: Vec<Element>) -> Self {
        let stats = elements_to_stats(&elements);
        Self { elements, stats }
    }

    pub fn total_elements(&self) -> usize {
        self.elements.len()
    }

    /// All elements whose `type` discriminant equals `element_type`.
    pub fn of_type<'a>(&'a self, element_type: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements
            .iter()
            .filter(move |e| e.element_type() == element_type)
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(&self.elements)?)
    }
}

fn elements_to_stats(elements: &[Element]) -> BuildStats {
    let mut stats = BuildStats::default();
    for e in elements {
        match e {
            Element::SourceComponent(_) => stats.components += 1,
            Element::SourcePort(_) => stats.ports += 1,
            Element::SourceTrace(_) => stats.traces += 1,
            Element::SourceNet(_) => stats.nets += 1,
            Element::PcbSmtpad(_) | Element::PcbPlatedHole(_) => stats.pads += 1,
            Element::PcbBoard(_) => stats.boards += 1,
            _ => {}
        }
    }
    stats
}
