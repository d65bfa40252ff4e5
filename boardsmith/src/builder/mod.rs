//! Builders
//!
//! A design is described as a tree of builders, accumulated synchronously
//! through a fluent API, then flattened into [`Element`]s by an async build.
//!
//! ```text
//! ProjectBuilder
//!   └── BoardBuilder ─────────────┐  (board props + pcb_board element)
//!         ├── GroupBuilder ...    │  built 1st
//!         ├── ComponentBuilder    │  built 2nd (also nets, trace hints)
//!         │     ├── PortsBuilder  │
//!         │     ├── SchematicSymbolBuilder
//!         │     └── FootprintBuilder
//!         └── TraceBuilder        │  built 3rd, against the elements above
//! ```
//!
//! Capabilities are split into small traits: [`Buildable`] for anything
//! that turns into elements on its own, [`HasPorts`] and [`HasFootprint`]
//! for components. Shared child bookkeeping for groups and boards lives in
//! [`group::Children`] behind the [`group::Container`] trait.

pub mod addables;
pub mod board;
pub mod component;
pub mod footprint;
pub mod group;
pub mod net;
pub mod ports;
pub mod project;
pub mod schematic;
pub mod selector;
pub mod trace;
pub mod trace_hint;

use async_trait::async_trait;
use std::fmt;

use crate::context::BuildContext;
use crate::core::BuildError;
use crate::elements::Element;

pub use addables::Addable;
pub use board::{BoardBuilder, BoardProps};
pub use component::{ComponentBuilder, ComponentKind, ComponentProps, SourceProps};
pub use footprint::{
    FootprintBuilder, HoleBuilder, PlatedHoleBuilder, SilkscreenLineBuilder,
    SilkscreenTextBuilder, SmtpadBuilder, ViaBuilder,
};
pub use group::{Container, GroupBuilder, GroupState};
pub use net::NetBuilder;
pub use ports::{PortSpec, PortsBuilder};
pub use project::ProjectBuilder;
pub use schematic::{
    SchematicBoxBuilder, SchematicLineBuilder, SchematicSymbolBuilder, SchematicTextBuilder,
};
pub use selector::{Endpoint, PortRef, PortSelector, Target};
pub use trace::TraceBuilder;
pub use trace_hint::TraceHintBuilder;

/// Anything that builds into elements without needing its siblings.
#[async_trait]
pub trait Buildable: Send + Sync {
    fn builder_type(&self) -> BuilderType;

    async fn build(&self, ctx: &BuildContext) -> Result<Vec<Element>, BuildError>;
}

/// Builders that own a port registry
pub trait HasPorts {
    fn declared_ports(&self) -> &[PortSpec];
}

/// Builders that own a footprint
pub trait HasFootprint {
    fn footprint(&self) -> &FootprintBuilder;
    fn footprint_mut(&mut self) -> &mut FootprintBuilder;
}

/// Closed set of builder kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuilderType {
    Project,
    Group,
    Board,
    Component(ComponentKind),
    Trace,
    TraceHint,
    Net,
    SchematicSymbol,
    SchematicBox,
    SchematicLine,
    SchematicText,
    Footprint,
    Smtpad,
    PlatedHole,
    Hole,
    Via,
    SilkscreenLine,
    SilkscreenText,
}

impl BuilderType {
    /// Schematic drawing primitives; these only live inside a component's symbol
    pub fn is_schematic_primitive(&self) -> bool {
        matches!(
            self,
            BuilderType::SchematicSymbol
                | BuilderType::SchematicBox
                | BuilderType::SchematicLine
                | BuilderType::SchematicText
        )
    }

    /// PCB footprint primitives; these only live inside a component's footprint
    pub fn is_footprint_primitive(&self) -> bool {
        matches!(
            self,
            BuilderType::Footprint
                | BuilderType::Smtpad
                | BuilderType::PlatedHole
                | BuilderType::Hole
                | BuilderType::Via
                | BuilderType::SilkscreenLine
                | BuilderType::SilkscreenText
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuilderType::Project => "project_builder",
            BuilderType::Group => "group_builder",
            BuilderType::Board => "board_builder",
            BuilderType::Component(kind) => kind.builder_type_name(),
            BuilderType::Trace => "trace_builder",
            BuilderType::TraceHint => "trace_hint_builder",
            BuilderType::Net => "net_builder",
            BuilderType::SchematicSymbol => "schematic_symbol_builder",
            BuilderType::SchematicBox => "schematic_box_builder",
            BuilderType::SchematicLine => "schematic_line_builder",
            BuilderType::SchematicText => "schematic_text_builder",
            BuilderType::Footprint => "footprint_builder",
            BuilderType::Smtpad => "smtpad_builder",
            BuilderType::PlatedHole => "plated_hole_builder",
            BuilderType::Hole => "hole_builder",
            BuilderType::Via => "via_primitive_builder",
            BuilderType::SilkscreenLine => "silkscreen_line_builder",
            BuilderType::SilkscreenText => "silkscreen_text_builder",
        }
    }
}

impl fmt::Display for BuilderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Any builder, as handed to `add(kind, ..)` callbacks and `append_child`.
#[derive(Debug)]
pub enum AnyBuilder {
    Group(GroupBuilder),
    Board(BoardBuilder),
    Component(ComponentBuilder),
    Trace(TraceBuilder),
    TraceHint(TraceHintBuilder),
    Net(NetBuilder),
    SchematicSymbol(SchematicSymbolBuilder),
    SchematicBox(SchematicBoxBuilder),
    SchematicLine(SchematicLineBuilder),
    SchematicText(SchematicTextBuilder),
    Footprint(FootprintBuilder),
    Smtpad(SmtpadBuilder),
    PlatedHole(PlatedHoleBuilder),
    Hole(HoleBuilder),
    Via(ViaBuilder),
    SilkscreenLine(SilkscreenLineBuilder),
    SilkscreenText(SilkscreenTextBuilder),
}

impl AnyBuilder {
    pub fn builder_type(&self) -> BuilderType {
        match self {
            AnyBuilder::Group(_) => BuilderType::Group,
            AnyBuilder::Board(_) => BuilderType::Board,
            AnyBuilder::Component(c) => BuilderType::Component(c.kind()),
            AnyBuilder::Trace(_) => BuilderType::Trace,
            AnyBuilder::TraceHint(_) => BuilderType::TraceHint,
            AnyBuilder::Net(_) => BuilderType::Net,
            AnyBuilder::SchematicSymbol(_) => BuilderType::SchematicSymbol,
            AnyBuilder::SchematicBox(_) => BuilderType::SchematicBox,
            AnyBuilder::SchematicLine(_) => BuilderType::SchematicLine,
            AnyBuilder::SchematicText(_) => BuilderType::SchematicText,
            AnyBuilder::Footprint(_) => BuilderType::Footprint,
            AnyBuilder::Smtpad(_) => BuilderType::Smtpad,
            AnyBuilder::PlatedHole(_) => BuilderType::PlatedHole,
            AnyBuilder::Hole(_) => BuilderType::Hole,
            AnyBuilder::Via(_) => BuilderType::Via,
            AnyBuilder::SilkscreenLine(_) => BuilderType::SilkscreenLine,
            AnyBuilder::SilkscreenText(_) => BuilderType::SilkscreenText,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut GroupBuilder> {
        match self {
            AnyBuilder::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_board_mut(&mut self) -> Option<&mut BoardBuilder> {
        match self {
            AnyBuilder::Board(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_component_mut(&mut self) -> Option<&mut ComponentBuilder> {
        match self {
            AnyBuilder::Component(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_trace_mut(&mut self) -> Option<&mut TraceBuilder> {
        match self {
            AnyBuilder::Trace(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_net_mut(&mut self) -> Option<&mut NetBuilder> {
        match self {
            AnyBuilder::Net(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_trace_hint_mut(&mut self) -> Option<&mut TraceHintBuilder> {
        match self {
            AnyBuilder::TraceHint(h) => Some(h),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_classification() {
        assert!(BuilderType::SchematicLine.is_schematic_primitive());
        assert!(BuilderType::SchematicSymbol.is_schematic_primitive());
        assert!(!BuilderType::Group.is_schematic_primitive());
        assert!(BuilderType::Smtpad.is_footprint_primitive());
        assert!(!BuilderType::Trace.is_footprint_primitive());
    }

    #[test]
    fn test_builder_type_names() {
        let resistor = AnyBuilder::Component(ComponentBuilder::new(ComponentKind::Resistor));
        assert_eq!(resistor.builder_type().as_str(), "resistor_builder");
        assert_eq!(BuilderType::Group.to_string(), "group_builder");
    }
}
