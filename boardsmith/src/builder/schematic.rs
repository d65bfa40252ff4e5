//! Schematic symbol primitives
//!
//! Lines, boxes and text drawn in a component's local schematic frame. They
//! are only reachable through [`super::ComponentBuilder::schematic_symbol`];
//! groups and boards reject them as direct children.

use crate::context::BuildContext;
use crate::core::BuildError;
use crate::elements::{Element, Point, SchematicBox, SchematicLine, SchematicText, TextAnchor};

use super::{AnyBuilder, BuilderType};

#[derive(Debug, Clone, Default)]
pub struct SchematicLineBuilder {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl SchematicLineBuilder {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn build(&self, ctx: &BuildContext, schematic_component_id: &str) -> Element {
        Element::SchematicLine(SchematicLine {
            schematic_line_id: ctx.get_id("schematic_line"),
            schematic_component_id: schematic_component_id.to_string(),
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
        })
    }
}

/// Rectangle centred on `(x, y)`
#[derive(Debug, Clone, Default)]
pub struct SchematicBoxBuilder {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SchematicBoxBuilder {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn build(&self, ctx: &BuildContext, schematic_component_id: &str) -> Element {
        Element::SchematicBox(SchematicBox {
            schematic_box_id: ctx.get_id("schematic_box"),
            schematic_component_id: schematic_component_id.to_string(),
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchematicTextBuilder {
    pub text: String,
    pub position: Point,
    pub anchor: TextAnchor,
    pub rotation: f64,
}

impl SchematicTextBuilder {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            position: Point::new(x, y),
            ..Default::default()
        }
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    fn build(&self, ctx: &BuildContext, schematic_component_id: &str) -> Element {
        Element::SchematicText(SchematicText {
            schematic_text_id: ctx.get_id("schematic_text"),
            schematic_component_id: schematic_component_id.to_string(),
            text: self.text.clone(),
            position: self.position,
            anchor: self.anchor,
            rotation: self.rotation,
        })
    }
}

#[derive(Debug, Clone)]
enum SymbolPrimitive {
    Line(SchematicLineBuilder),
    Box(SchematicBoxBuilder),
    Text(SchematicTextBuilder),
}

/// Ordered collection of symbol primitives.
#[derive(Debug, Clone, Default)]
pub struct SchematicSymbolBuilder {
    primitives: Vec<SymbolPrimitive>,
}

impl SchematicSymbolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn add_line(&mut self, line: SchematicLineBuilder) -> &mut Self {
        self.primitives.push(SymbolPrimitive::Line(line));
        self
    }

    pub fn add_box(&mut self, rect: SchematicBoxBuilder) -> &mut Self {
        self.primitives.push(SymbolPrimitive::Box(rect));
        self
    }

    pub fn add_text(&mut self, text: SchematicTextBuilder) -> &mut Self {
        self.primitives.push(SymbolPrimitive::Text(text));
        self
    }

    pub fn append_child(&mut self, child: AnyBuilder) -> Result<&mut Self, BuildError> {
        let primitive = match child {
            AnyBuilder::SchematicLine(b) => SymbolPrimitive::Line(b),
            AnyBuilder::SchematicBox(b) => SymbolPrimitive::Box(b),
            AnyBuilder::SchematicText(b) => SymbolPrimitive::Text(b),
            AnyBuilder::SchematicSymbol(s) => {
                self.primitives.extend(s.primitives);
                return Ok(self);
            }
            other => {
                return Err(BuildError::IllegalChild {
                    parent: BuilderType::SchematicSymbol.to_string(),
                    child: other.builder_type().to_string(),
                })
            }
        };
        self.primitives.push(primitive);
        Ok(self)
    }

    /// Build in the component-local frame, in insertion order.
    pub fn build(&self, ctx: &BuildContext, schematic_component_id: &str) -> Vec<Element> {
        self.primitives
            .iter()
            .map(|p| match p {
                SymbolPrimitive::Line(b) => b.build(ctx, schematic_component_id),
                SymbolPrimitive::Box(b) => b.build(ctx, schematic_component_id),
                SymbolPrimitive::Text(b) => b.build(ctx, schematic_component_id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_preserves_order() {
        let mut symbol = SchematicSymbolBuilder::new();
        symbol
            .add_box(SchematicBoxBuilder::new(0.0, 0.0, 1.0, 2.0))
            .add_line(SchematicLineBuilder::new(0.0, -1.0, 0.0, -1.5))
            .add_text(SchematicTextBuilder::new("U1", 0.0, -1.2));
        let elements = symbol.build(&BuildContext::default(), "schematic_component_3");
        let types: Vec<_> = elements.iter().map(|e| e.element_type()).collect();
        assert_eq!(types, vec!["schematic_box", "schematic_line", "schematic_text"]);
        assert!(elements
            .iter()
            .all(|e| matches!(e, Element::SchematicBox(b) if b.schematic_component_id == "schematic_component_3")
                || matches!(e, Element::SchematicLine(l) if l.schematic_component_id == "schematic_component_3")
                || matches!(e, Element::SchematicText(t) if t.schematic_component_id == "schematic_component_3")));
    }

    #[test]
    fn test_append_child_rejects_groups() {
        let mut symbol = SchematicSymbolBuilder::new();
        let err = symbol
            .append_child(AnyBuilder::Group(crate::builder::GroupBuilder::new()))
            .unwrap_err();
        assert!(matches!(err, BuildError::IllegalChild { .. }));
        assert!(symbol.is_empty());
    }
}
