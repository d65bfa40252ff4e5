//! Design files
//!
//! A JSON description of one board and its children, loaded into a
//! [`ProjectBuilder`]. Every node names its builder through `kind`, which
//! goes through the same `add(kind, ..)` path as the fluent API, so a file
//! can only place children where the builders themselves allow them.
//!
//! ```json
//! {
//!   "units": "mm",
//!   "board": {
//!     "width": 20, "height": 10, "center_x": 0, "center_y": 0,
//!     "children": [
//!       { "kind": "resistor", "name": "R1", "resistance": "10k" },
//!       { "kind": "trace", "connections": [".R1 > .positive", "net.GND"] }
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::builder::{
    AnyBuilder, BoardBuilder, BoardProps, ComponentProps, Container, Endpoint, PortSpec,
    ProjectBuilder, SourceProps,
};
use crate::core::{BuildError, BuildOptions};
use crate::elements::{LayerRef, Point};
use crate::units::{Length, LengthPoint, LengthUnit, Quantity, UnitSystem};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignFile {
    #[serde(default)]
    pub name: Option<String>,
    /// Base unit for bare numbers; millimetres when absent
    #[serde(default)]
    pub units: Option<LengthUnit>,
    /// Trace width used when a trace sets no thickness
    #[serde(default)]
    pub default_trace_width: Option<f64>,
    pub board: BoardSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSpec {
    #[serde(default)]
    pub width: Option<Length>,
    #[serde(default)]
    pub height: Option<Length>,
    #[serde(default)]
    pub center: Option<LengthPoint>,
    #[serde(default)]
    pub center_x: Option<Length>,
    #[serde(default)]
    pub center_y: Option<Length>,
    #[serde(default)]
    pub board_thickness: Option<Length>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// One child node. Which fields matter depends on `kind`; the rest are
/// ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeSpec {
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,

    // components
    #[serde(default)]
    pub resistance: Option<Quantity>,
    #[serde(default)]
    pub capacitance: Option<Quantity>,
    #[serde(default)]
    pub inductance: Option<Quantity>,
    #[serde(default)]
    pub voltage: Option<Quantity>,
    #[serde(default)]
    pub net: Option<String>,
    #[serde(default)]
    pub port_labels: Option<BTreeMap<u32, String>>,
    #[serde(default)]
    pub manufacturer_part_number: Option<String>,
    #[serde(default)]
    pub schematic_center: Option<Point>,
    #[serde(default)]
    pub schematic_rotation: Option<f64>,
    #[serde(default)]
    pub pcb_center: Option<LengthPoint>,
    #[serde(default)]
    pub pcb_rotation: Option<f64>,
    #[serde(default)]
    pub pcb_layer: Option<LayerRef>,
    /// Standard footprint name, e.g. `0805`
    #[serde(default)]
    pub footprint: Option<String>,
    #[serde(default)]
    pub ports: Vec<PortSpec>,

    // traces
    #[serde(default)]
    pub connections: Vec<Endpoint>,
    #[serde(default)]
    pub thickness: Option<Length>,

    // trace hints
    #[serde(default)]
    pub for_port: Option<String>,
    #[serde(default)]
    pub offsets: Vec<LengthPoint>,

    // nets
    #[serde(default)]
    pub is_power: Option<bool>,
    #[serde(default)]
    pub is_ground: Option<bool>,

    // groups
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    fn component_props(&self) -> ComponentProps {
        ComponentProps {
            name: self.name.clone(),
            schematic_center: self.schematic_center,
            schematic_rotation: self.schematic_rotation,
            pcb_center: self.pcb_center.clone(),
            pcb_rotation: self.pcb_rotation,
            pcb_layer: self.pcb_layer,
            ..Default::default()
        }
    }

    fn source_props(&self) -> SourceProps {
        SourceProps {
            resistance: self.resistance.clone(),
            capacitance: self.capacitance.clone(),
            inductance: self.inductance.clone(),
            voltage: self.voltage.clone(),
            net: self.net.clone(),
            port_labels: self.port_labels.clone(),
            manufacturer_part_number: self.manufacturer_part_number.clone(),
        }
    }

    /// Apply this node's fields to a freshly constructed builder.
    fn configure(&self, builder: &mut AnyBuilder) -> Result<(), BuildError> {
        if !self.children.is_empty() && !matches!(builder, AnyBuilder::Group(_)) {
            tracing::warn!(kind = %self.kind, "Ignoring children of a non-group node");
        }
        match builder {
            AnyBuilder::Component(component) => {
                component
                    .set_props(self.component_props())
                    .set_source_properties(self.source_props());
                if let Some(footprint) = &self.footprint {
                    component.set_footprint(footprint.as_str());
                }
                for port in &self.ports {
                    component.add_port(port.clone());
                }
            }
            AnyBuilder::Group(group) => {
                if let Some(name) = &self.name {
                    group.set_name(name.as_str());
                }
                apply_children(group, &self.children)?;
            }
            AnyBuilder::Trace(trace) => {
                trace.add_connections(self.connections.iter().cloned());
                if let Some(thickness) = &self.thickness {
                    trace.set_thickness(thickness.clone());
                }
            }
            AnyBuilder::Net(net) => {
                if let Some(name) = &self.name {
                    net.set_name(name.as_str());
                }
                if let Some(is_power) = self.is_power {
                    net.set_is_power(is_power);
                }
                if let Some(is_ground) = self.is_ground {
                    net.set_is_ground(is_ground);
                }
            }
            AnyBuilder::TraceHint(hint) => {
                if let Some(for_port) = &self.for_port {
                    hint.set_for_port(for_port.as_str());
                }
                hint.set_offsets(self.offsets.clone());
            }
            other => {
                tracing::debug!(builder = %other.builder_type(), "No design fields for builder");
            }
        }
        Ok(())
    }
}

fn apply_children<C: Container>(container: &mut C, children: &[NodeSpec]) -> Result<(), BuildError> {
    for node in children {
        let mut configured = Ok(());
        container.add(&node.kind, |builder| configured = node.configure(builder))?;
        configured?;
    }
    Ok(())
}

impl DesignFile {
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BuildError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading design file");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn options(&self) -> BuildOptions {
        let mut options = BuildOptions::default();
        if let Some(units) = self.units {
            options.units = UnitSystem::new(units);
        }
        if let Some(width) = self.default_trace_width {
            options.default_trace_width = width;
        }
        options
    }

    /// Construct the builder tree described by this file.
    pub fn to_project(&self) -> Result<ProjectBuilder, BuildError> {
        self.to_project_with(self.options())
    }

    pub fn to_project_with(&self, options: BuildOptions) -> Result<ProjectBuilder, BuildError> {
        let spec = &self.board;
        let mut board = BoardBuilder::new();
        board.set_props(BoardProps {
            width: spec.width.clone(),
            height: spec.height.clone(),
            center: spec.center.clone(),
            center_x: spec.center_x.clone(),
            center_y: spec.center_y.clone(),
            board_thickness: spec.board_thickness.clone(),
        });
        apply_children(&mut board, &spec.children)?;

        let mut project = ProjectBuilder::new(options);
        project.append_child(AnyBuilder::Board(board))?;
        tracing::info!(
            name = self.name.as_deref().unwrap_or("unnamed"),
            children = spec.children.len(),
            "Loaded design"
        );
        Ok(project)
    }
}

/// Load a design file straight into a project builder.
pub fn load_design(path: impl AsRef<Path>) -> Result<ProjectBuilder, BuildError> {
    DesignFile::load(path)?.to_project()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, Ftype};

    const DIVIDER: &str = r#"{
        "name": "divider",
        "board": {
            "width": 20, "height": 10, "center_x": 0, "center_y": 0,
            "children": [
                { "kind": "power_source", "name": "V1", "voltage": "5V" },
                { "kind": "group", "name": "divider", "children": [
                    { "kind": "resistor", "name": "R1", "resistance": "10k", "footprint": "0805" },
                    { "kind": "resistor", "name": "R2", "resistance": 10000 },
                    { "kind": "trace", "connections": [".R1 > .negative", ".R2 > .positive"] }
                ]},
                { "kind": "trace", "connections": [".V1 > .positive", ".R1 > .positive"], "thickness": "0.3mm" }
            ]
        }
    }"#;

    #[tokio::test]
    async fn test_loads_and_builds() {
        let design = DesignFile::from_json(DIVIDER).unwrap();
        let output = design.to_project().unwrap().build().await.unwrap();
        assert_eq!(output.stats.components, 3);
        assert_eq!(output.stats.traces, 2);
        assert_eq!(output.stats.boards, 1);

        let resistors: Vec<_> = output
            .elements
            .iter()
            .filter_map(Element::as_source_component)
            .filter(|c| c.ftype == Ftype::SimpleResistor)
            .collect();
        assert_eq!(resistors.len(), 2);
        assert_eq!(resistors[0].resistance, Some(10_000.0));
    }

    #[test]
    fn test_unknown_kind() {
        let json = r#"{ "board": { "width": 1, "height": 1, "center_x": 0, "center_y": 0,
            "children": [ { "kind": "transistor" } ] } }"#;
        let err = DesignFile::from_json(json).unwrap().to_project().unwrap_err();
        assert_eq!(
            err.to_string(),
            "No addable in board builder for builder_type: \"transistor\""
        );
    }

    #[test]
    fn test_nested_unknown_kind_names_group() {
        let json = r#"{ "board": { "width": 1, "height": 1, "center_x": 0, "center_y": 0,
            "children": [ { "kind": "group", "children": [ { "kind": "led" } ] } ] } }"#;
        let err = DesignFile::from_json(json).unwrap().to_project().unwrap_err();
        assert!(matches!(err, BuildError::UnknownAddable { ref container, .. } if container == "group"));
    }

    #[test]
    fn test_options_from_file() {
        let json = r#"{ "units": "mil", "default_trace_width": 0.25, "board": {} }"#;
        let design = DesignFile::from_json(json).unwrap();
        let options = design.options();
        assert_eq!(options.units.base, LengthUnit::Mil);
        assert_eq!(options.default_trace_width, 0.25);
    }

    #[test]
    fn test_malformed_json() {
        let err = DesignFile::from_json("{ \"board\": ").unwrap_err();
        assert!(matches!(err, BuildError::Json(_)));
    }
}
