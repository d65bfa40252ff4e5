//! Design Elements
//!
//! The flat, typed records a build produces. Elements are plain data: they
//! never hold references to each other, only id strings, so an element list
//! serialises cleanly and compares byte-for-byte between builds of the same
//! tree.
//!
//! Three domains are represented:
//! - **source**: logical/electrical (components, ports, traces, nets)
//! - **schematic**: diagram placement (symbols, ports, primitives, wires)
//! - **pcb**: physical placement (footprints, pads, copper traces, board)

pub mod pcb;
pub mod schematic;
pub mod source;

use serde::{Deserialize, Serialize};

pub use pcb::*;
pub use schematic::*;
pub use source::*;

/// A 2D point in the base unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Copper layer reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerRef {
    Top,
    Bottom,
}

impl Default for LayerRef {
    fn default() -> Self {
        LayerRef::Top
    }
}

impl std::fmt::Display for LayerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerRef::Top => write!(f, "top"),
            LayerRef::Bottom => write!(f, "bottom"),
        }
    }
}

/// Any element a build can emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    SourceComponent(SourceComponent),
    SourcePort(SourcePort),
    SourceTrace(SourceTrace),
    SourceNet(SourceNet),
    SchematicComponent(SchematicComponent),
    SchematicPort(SchematicPort),
    SchematicLine(SchematicLine),
    SchematicBox(SchematicBox),
    SchematicText(SchematicText),
    SchematicTrace(SchematicTrace),
    PcbComponent(PcbComponent),
    PcbPort(PcbPort),
    PcbSmtpad(PcbSmtpad),
    PcbPlatedHole(PcbPlatedHole),
    PcbHole(PcbHole),
    PcbVia(PcbVia),
    PcbSilkscreenLine(PcbSilkscreenLine),
    PcbSilkscreenText(PcbSilkscreenText),
    PcbTrace(PcbTrace),
    PcbTraceHint(PcbTraceHint),
    PcbBoard(PcbBoard),
}

impl Element {
    /// The serialised `type` discriminant
    pub fn element_type(&self) -> &'static str {
        match self {
            Element::SourceComponent(_) => "source_component",
            Element::SourcePort(_) => "source_port",
            Element::SourceTrace(_) => "source_trace",
            Element::SourceNet(_) => "source_net",
            Element::SchematicComponent(_) => "schematic_component",
            Element::SchematicPort(_) => "schematic_port",
            Element::SchematicLine(_) => "schematic_line",
            Element::SchematicBox(_) => "schematic_box",
            Element::SchematicText(_) => "schematic_text",
            Element::SchematicTrace(_) => "schematic_trace",
            Element::PcbComponent(_) => "pcb_component",
            Element::PcbPort(_) => "pcb_port",
            Element::PcbSmtpad(_) => "pcb_smtpad",
            Element::PcbPlatedHole(_) => "pcb_plated_hole",
            Element::PcbHole(_) => "pcb_hole",
            Element::PcbVia(_) => "pcb_via",
            Element::PcbSilkscreenLine(_) => "pcb_silkscreen_line",
            Element::PcbSilkscreenText(_) => "pcb_silkscreen_text",
            Element::PcbTrace(_) => "pcb_trace",
            Element::PcbTraceHint(_) => "pcb_trace_hint",
            Element::PcbBoard(_) => "pcb_board",
        }
    }

    /// The element's own identifier as `(category, id)`.
    ///
    /// The category is the id namespace: two elements with the same
    /// category never share an id within one build.
    pub fn id(&self) -> (&'static str, &str) {
        match self {
            Element::SourceComponent(e) => ("source_component", &e.source_component_id),
            Element::SourcePort(e) => ("source_port", &e.source_port_id),
            Element::SourceTrace(e) => ("source_trace", &e.source_trace_id),
            Element::SourceNet(e) => ("source_net", &e.source_net_id),
            Element::SchematicComponent(e) => {
                ("schematic_component", &e.schematic_component_id)
            }
            Element::SchematicPort(e) => ("schematic_port", &e.schematic_port_id),
            Element::SchematicLine(e) => ("schematic_line", &e.schematic_line_id),
            Element::SchematicBox(e) => ("schematic_box", &e.schematic_box_id),
            Element::SchematicText(e) => ("schematic_text", &e.schematic_text_id),
            Element::SchematicTrace(e) => ("schematic_trace", &e.schematic_trace_id),
            Element::PcbComponent(e) => ("pcb_component", &e.pcb_component_id),
            Element::PcbPort(e) => ("pcb_port", &e.pcb_port_id),
            Element::PcbSmtpad(e) => ("pcb_smtpad", &e.pcb_smtpad_id),
            Element::PcbPlatedHole(e) => ("pcb_plated_hole", &e.pcb_plated_hole_id),
            Element::PcbHole(e) => ("pcb_hole", &e.pcb_hole_id),
            Element::PcbVia(e) => ("pcb_via", &e.pcb_via_id),
            Element::PcbSilkscreenLine(e) => {
                ("pcb_silkscreen_line", &e.pcb_silkscreen_line_id)
            }
            Element::PcbSilkscreenText(e) => {
                ("pcb_silkscreen_text", &e.pcb_silkscreen_text_id)
            }
            Element::PcbTrace(e) => ("pcb_trace", &e.pcb_trace_id),
            Element::PcbTraceHint(e) => ("pcb_trace_hint", &e.pcb_trace_hint_id),
            Element::PcbBoard(e) => ("pcb_board", &e.pcb_board_id),
        }
    }

    /// The owning source component, for elements that have one
    pub fn source_component_id(&self) -> Option<&str> {
        match self {
            Element::SourceComponent(e) => Some(&e.source_component_id),
            Element::SourcePort(e) => Some(&e.source_component_id),
            Element::SchematicComponent(e) => Some(&e.source_component_id),
            Element::PcbComponent(e) => Some(&e.source_component_id),
            _ => None,
        }
    }

    /// The owning pcb component, for pcb-domain footprint elements
    pub fn pcb_component_id(&self) -> Option<&str> {
        match self {
            Element::PcbComponent(e) => Some(&e.pcb_component_id),
            Element::PcbPort(e) => Some(&e.pcb_component_id),
            Element::PcbSmtpad(e) => Some(&e.pcb_component_id),
            Element::PcbPlatedHole(e) => Some(&e.pcb_component_id),
            Element::PcbHole(e) => Some(&e.pcb_component_id),
            Element::PcbVia(e) => Some(&e.pcb_component_id),
            Element::PcbSilkscreenLine(e) => Some(&e.pcb_component_id),
            Element::PcbSilkscreenText(e) => Some(&e.pcb_component_id),
            _ => None,
        }
    }

    /// Own id followed by the owning component ids, as `(category, id)`
    pub fn ids(&self) -> Vec<(&'static str, &str)> {
        let own = self.id();
        let mut ids = vec![own];
        if let Some(id) = self.source_component_id() {
            if own.0 != "source_component" {
                ids.push(("source_component", id));
            }
        }
        if let Some(id) = self.pcb_component_id() {
            if own.0 != "pcb_component" {
                ids.push(("pcb_component", id));
            }
        }
        ids
    }

    pub fn is_schematic(&self) -> bool {
        self.element_type().starts_with("schematic_")
    }

    pub fn is_pcb(&self) -> bool {
        self.element_type().starts_with("pcb_")
    }

    pub fn as_source_component(&self) -> Option<&SourceComponent> {
        match self {
            Element::SourceComponent(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_source_port(&self) -> Option<&SourcePort> {
        match self {
            Element::SourcePort(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_source_trace(&self) -> Option<&SourceTrace> {
        match self {
            Element::SourceTrace(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_source_net(&self) -> Option<&SourceNet> {
        match self {
            Element::SourceNet(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_schematic_port(&self) -> Option<&SchematicPort> {
        match self {
            Element::SchematicPort(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_pcb_port(&self) -> Option<&PcbPort> {
        match self {
            Element::PcbPort(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_pcb_trace_hint(&self) -> Option<&PcbTraceHint> {
        match self {
            Element::PcbTraceHint(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_discriminant_serialization() {
        let element = Element::PcbBoard(PcbBoard {
            pcb_board_id: "pcb_board_0".to_string(),
            center: Point::new(0.0, 0.0),
            width: 10.0,
            height: 20.0,
            thickness: 1.2,
        });
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["type"], "pcb_board");
        assert_eq!(json["width"], 10.0);
        assert_eq!(element.element_type(), "pcb_board");
    }

    #[test]
    fn test_smtpad_shape_is_flattened() {
        let pad = Element::PcbSmtpad(PcbSmtpad {
            pcb_smtpad_id: "pcb_smtpad_0".to_string(),
            pcb_component_id: "pcb_component_0".to_string(),
            x: 1.0,
            y: 2.0,
            layer: LayerRef::Top,
            shape: PadShape::Rect {
                width: 0.5,
                height: 0.6,
            },
            port_hints: vec!["1".to_string()],
        });
        let json = serde_json::to_value(&pad).unwrap();
        assert_eq!(json["shape"], "rect");
        assert_eq!(json["width"], 0.5);

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, pad);
    }

    #[test]
    fn test_id_categories() {
        let port = Element::SourcePort(SourcePort {
            source_port_id: "source_port_3".to_string(),
            source_component_id: "source_component_1".to_string(),
            name: "positive".to_string(),
            pin_number: Some(1),
        });
        assert_eq!(port.id(), ("source_port", "source_port_3"));
        assert_eq!(port.source_component_id(), Some("source_component_1"));
        assert!(!port.is_pcb());
        assert_eq!(
            port.ids(),
            vec![
                ("source_port", "source_port_3"),
                ("source_component", "source_component_1")
            ]
        );
    }
}
