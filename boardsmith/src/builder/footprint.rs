//! Footprint Builder
//!
//! A component's copper and silkscreen, described in the component's local
//! pcb frame. Primitives are built synchronously by the owning component
//! with a context carrying its `pcb_component_id`.

use crate::context::BuildContext;
use crate::core::BuildError;
use crate::elements::{
    Element, LayerRef, PadShape, PcbHole, PcbPlatedHole, PcbSilkscreenLine, PcbSilkscreenText,
    PcbSmtpad, PcbVia,
};
use crate::units::Length;

use super::{AnyBuilder, BuilderType};

/// Pad width, pad height and centre-to-centre pitch (mm) of the standard
/// two-pad chip packages.
fn standard_chip_pads(standard: &str) -> Option<(f64, f64, f64)> {
    match standard {
        "0402" => Some((0.54, 0.64, 1.0)),
        "0603" => Some((0.8, 0.95, 1.6)),
        "0805" => Some((1.0, 1.45, 1.9)),
        "1206" => Some((1.15, 1.8, 3.2)),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PadShapeSpec {
    Rect { width: Length, height: Length },
    Circle { radius: Length },
}

#[derive(Debug, Clone)]
pub struct SmtpadBuilder {
    x: Length,
    y: Length,
    layer: LayerRef,
    shape: PadShapeSpec,
    port_hints: Vec<String>,
}

impl SmtpadBuilder {
    pub fn rect(width: impl Into<Length>, height: impl Into<Length>) -> Self {
        Self::with_shape(PadShapeSpec::Rect {
            width: width.into(),
            height: height.into(),
        })
    }

    pub fn circle(radius: impl Into<Length>) -> Self {
        Self::with_shape(PadShapeSpec::Circle {
            radius: radius.into(),
        })
    }

    fn with_shape(shape: PadShapeSpec) -> Self {
        Self {
            x: Length::Value(0.0),
            y: Length::Value(0.0),
            layer: LayerRef::Top,
            shape,
            port_hints: Vec::new(),
        }
    }

    pub fn at(mut self, x: impl Into<Length>, y: impl Into<Length>) -> Self {
        self.x = x.into();
        self.y = y.into();
        self
    }

    pub fn on_layer(mut self, layer: LayerRef) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_port_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.port_hints = hints.into_iter().map(Into::into).collect();
        self
    }

    fn build(&self, ctx: &BuildContext, pcb_component_id: &str) -> Result<Element, BuildError> {
        let shape = match &self.shape {
            PadShapeSpec::Rect { width, height } => PadShape::Rect {
                width: ctx.convert(width)?,
                height: ctx.convert(height)?,
            },
            PadShapeSpec::Circle { radius } => PadShape::Circle {
                radius: ctx.convert(radius)?,
            },
        };
        Ok(Element::PcbSmtpad(PcbSmtpad {
            pcb_smtpad_id: ctx.get_id("pcb_smtpad"),
            pcb_component_id: pcb_component_id.to_string(),
            x: ctx.convert(&self.x)?,
            y: ctx.convert(&self.y)?,
            layer: self.layer,
            shape,
            port_hints: self.port_hints.clone(),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct PlatedHoleBuilder {
    x: Length,
    y: Length,
    hole_diameter: Length,
    outer_diameter: Length,
    port_hints: Vec<String>,
}

impl PlatedHoleBuilder {
    pub fn new(hole_diameter: impl Into<Length>, outer_diameter: impl Into<Length>) -> Self {
        Self {
            x: Length::Value(0.0),
            y: Length::Value(0.0),
            hole_diameter: hole_diameter.into(),
            outer_diameter: outer_diameter.into(),
            port_hints: Vec::new(),
        }
    }

    pub fn at(mut self, x: impl Into<Length>, y: impl Into<Length>) -> Self {
        self.x = x.into();
        self.y = y.into();
        self
    }

    pub fn with_port_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.port_hints = hints.into_iter().map(Into::into).collect();
        self
    }

    fn build(&self, ctx: &BuildContext, pcb_component_id: &str) -> Result<Element, BuildError> {
        Ok(Element::PcbPlatedHole(PcbPlatedHole {
            pcb_plated_hole_id: ctx.get_id("pcb_plated_hole"),
            pcb_component_id: pcb_component_id.to_string(),
            x: ctx.convert(&self.x)?,
            y: ctx.convert(&self.y)?,
            hole_diameter: ctx.convert(&self.hole_diameter)?,
            outer_diameter: ctx.convert(&self.outer_diameter)?,
            layers: vec![LayerRef::Top, LayerRef::Bottom],
            port_hints: self.port_hints.clone(),
            drill_depth: ctx.board_thickness,
        }))
    }
}

/// Unplated mounting hole
#[derive(Debug, Clone)]
pub struct HoleBuilder {
    x: Length,
    y: Length,
    hole_diameter: Length,
}

impl HoleBuilder {
    pub fn new(hole_diameter: impl Into<Length>) -> Self {
        Self {
            x: Length::Value(0.0),
            y: Length::Value(0.0),
            hole_diameter: hole_diameter.into(),
        }
    }

    pub fn at(mut self, x: impl Into<Length>, y: impl Into<Length>) -> Self {
        self.x = x.into();
        self.y = y.into();
        self
    }

    fn build(&self, ctx: &BuildContext, pcb_component_id: &str) -> Result<Element, BuildError> {
        Ok(Element::PcbHole(PcbHole {
            pcb_hole_id: ctx.get_id("pcb_hole"),
            pcb_component_id: pcb_component_id.to_string(),
            x: ctx.convert(&self.x)?,
            y: ctx.convert(&self.y)?,
            hole_diameter: ctx.convert(&self.hole_diameter)?,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct ViaBuilder {
    x: Length,
    y: Length,
    hole_diameter: Length,
    outer_diameter: Length,
}

impl Default for ViaBuilder {
    fn default() -> Self {
        Self::new(0.3, 0.6)
    }
}

impl ViaBuilder {
    pub fn new(hole_diameter: impl Into<Length>, outer_diameter: impl Into<Length>) -> Self {
        Self {
            x: Length::Value(0.0),
            y: Length::Value(0.0),
            hole_diameter: hole_diameter.into(),
            outer_diameter: outer_diameter.into(),
        }
    }

    pub fn at(mut self, x: impl Into<Length>, y: impl Into<Length>) -> Self {
        self.x = x.into();
        self.y = y.into();
        self
    }

    fn build(&self, ctx: &BuildContext, pcb_component_id: &str) -> Result<Element, BuildError> {
        Ok(Element::PcbVia(PcbVia {
            pcb_via_id: ctx.get_id("pcb_via"),
            pcb_component_id: pcb_component_id.to_string(),
            x: ctx.convert(&self.x)?,
            y: ctx.convert(&self.y)?,
            hole_diameter: ctx.convert(&self.hole_diameter)?,
            outer_diameter: ctx.convert(&self.outer_diameter)?,
            layers: vec![LayerRef::Top, LayerRef::Bottom],
            drill_depth: ctx.board_thickness,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct SilkscreenLineBuilder {
    from: (Length, Length),
    to: (Length, Length),
    stroke_width: Length,
    layer: LayerRef,
}

impl SilkscreenLineBuilder {
    pub fn new(
        x1: impl Into<Length>,
        y1: impl Into<Length>,
        x2: impl Into<Length>,
        y2: impl Into<Length>,
    ) -> Self {
        Self {
            from: (x1.into(), y1.into()),
            to: (x2.into(), y2.into()),
            stroke_width: Length::Value(0.1),
            layer: LayerRef::Top,
        }
    }

    pub fn with_stroke_width(mut self, stroke_width: impl Into<Length>) -> Self {
        self.stroke_width = stroke_width.into();
        self
    }

    pub fn on_layer(mut self, layer: LayerRef) -> Self {
        self.layer = layer;
        self
    }

    fn build(&self, ctx: &BuildContext, pcb_component_id: &str) -> Result<Element, BuildError> {
        Ok(Element::PcbSilkscreenLine(PcbSilkscreenLine {
            pcb_silkscreen_line_id: ctx.get_id("pcb_silkscreen_line"),
            pcb_component_id: pcb_component_id.to_string(),
            layer: self.layer,
            x1: ctx.convert(&self.from.0)?,
            y1: ctx.convert(&self.from.1)?,
            x2: ctx.convert(&self.to.0)?,
            y2: ctx.convert(&self.to.1)?,
            stroke_width: ctx.convert(&self.stroke_width)?,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct SilkscreenTextBuilder {
    text: String,
    x: Length,
    y: Length,
    font_size: Length,
    layer: LayerRef,
}

impl SilkscreenTextBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: Length::Value(0.0),
            y: Length::Value(0.0),
            font_size: Length::Value(1.0),
            layer: LayerRef::Top,
        }
    }

    pub fn at(mut self, x: impl Into<Length>, y: impl Into<Length>) -> Self {
        self.x = x.into();
        self.y = y.into();
        self
    }

    pub fn with_font_size(mut self, font_size: impl Into<Length>) -> Self {
        self.font_size = font_size.into();
        self
    }

    fn build(&self, ctx: &BuildContext, pcb_component_id: &str) -> Result<Element, BuildError> {
        Ok(Element::PcbSilkscreenText(PcbSilkscreenText {
            pcb_silkscreen_text_id: ctx.get_id("pcb_silkscreen_text"),
            pcb_component_id: pcb_component_id.to_string(),
            layer: self.layer,
            text: self.text.clone(),
            x: ctx.convert(&self.x)?,
            y: ctx.convert(&self.y)?,
            font_size: ctx.convert(&self.font_size)?,
        }))
    }
}

#[derive(Debug, Clone)]
pub enum FootprintPrimitive {
    Smtpad(SmtpadBuilder),
    PlatedHole(PlatedHoleBuilder),
    Hole(HoleBuilder),
    Via(ViaBuilder),
    SilkscreenLine(SilkscreenLineBuilder),
    SilkscreenText(SilkscreenTextBuilder),
}

impl FootprintPrimitive {
    fn build(&self, ctx: &BuildContext, pcb_component_id: &str) -> Result<Element, BuildError> {
        match self {
            FootprintPrimitive::Smtpad(b) => b.build(ctx, pcb_component_id),
            FootprintPrimitive::PlatedHole(b) => b.build(ctx, pcb_component_id),
            FootprintPrimitive::Hole(b) => b.build(ctx, pcb_component_id),
            FootprintPrimitive::Via(b) => b.build(ctx, pcb_component_id),
            FootprintPrimitive::SilkscreenLine(b) => b.build(ctx, pcb_component_id),
            FootprintPrimitive::SilkscreenText(b) => b.build(ctx, pcb_component_id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FootprintBuilder {
    standard: Option<String>,
    primitives: Vec<FootprintPrimitive>,
}

impl FootprintBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a standard two-pad chip package (`0402`, `0603`, `0805`, `1206`).
    /// Its pads come before any explicitly added primitive.
    pub fn set_standard(&mut self, standard: impl Into<String>) -> &mut Self {
        self.standard = Some(standard.into());
        self
    }

    pub fn standard(&self) -> Option<&str> {
        self.standard.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.standard.is_none() && self.primitives.is_empty()
    }

    pub fn add_smtpad(&mut self, pad: SmtpadBuilder) -> &mut Self {
        self.primitives.push(FootprintPrimitive::Smtpad(pad));
        self
    }

    pub fn add_plated_hole(&mut self, hole: PlatedHoleBuilder) -> &mut Self {
        self.primitives.push(FootprintPrimitive::PlatedHole(hole));
        self
    }

    pub fn add_hole(&mut self, hole: HoleBuilder) -> &mut Self {
        self.primitives.push(FootprintPrimitive::Hole(hole));
        self
    }

    pub fn add_via(&mut self, via: ViaBuilder) -> &mut Self {
        self.primitives.push(FootprintPrimitive::Via(via));
        self
    }

    pub fn add_silkscreen_line(&mut self, line: SilkscreenLineBuilder) -> &mut Self {
        self.primitives.push(FootprintPrimitive::SilkscreenLine(line));
        self
    }

    pub fn add_silkscreen_text(&mut self, text: SilkscreenTextBuilder) -> &mut Self {
        self.primitives.push(FootprintPrimitive::SilkscreenText(text));
        self
    }

    /// Accepts footprint primitives (and whole footprints, merged in order).
    /// Anything else is rejected and the footprint is left unchanged.
    pub fn append_child(&mut self, child: AnyBuilder) -> Result<&mut Self, BuildError> {
        let primitive = match child {
            AnyBuilder::Smtpad(b) => FootprintPrimitive::Smtpad(b),
            AnyBuilder::PlatedHole(b) => FootprintPrimitive::PlatedHole(b),
            AnyBuilder::Hole(b) => FootprintPrimitive::Hole(b),
            AnyBuilder::Via(b) => FootprintPrimitive::Via(b),
            AnyBuilder::SilkscreenLine(b) => FootprintPrimitive::SilkscreenLine(b),
            AnyBuilder::SilkscreenText(b) => FootprintPrimitive::SilkscreenText(b),
            AnyBuilder::Footprint(f) => {
                self.primitives.extend(f.primitives);
                return Ok(self);
            }
            other => {
                return Err(BuildError::IllegalChild {
                    parent: BuilderType::Footprint.to_string(),
                    child: other.builder_type().to_string(),
                })
            }
        };
        self.primitives.push(primitive);
        Ok(self)
    }

    /// Build every primitive in the component-local frame. Requires
    /// `ctx.pcb_component_id`.
    pub fn build(&self, ctx: &BuildContext) -> Result<Vec<Element>, BuildError> {
        let pcb_component_id = ctx.require_pcb_component()?;
        let mut elements = Vec::with_capacity(self.primitives.len() + 2);

        if let Some(standard) = &self.standard {
            let (width, height, pitch) =
                standard_chip_pads(standard).ok_or_else(|| BuildError::InvalidQuantity {
                    value: standard.clone(),
                    reason: "unknown standard footprint".to_string(),
                })?;
            // Standard dimensions are millimetres regardless of the project unit
            let mm = |v: f64| Length::Text(format!("{}mm", v));
            let pads = [
                SmtpadBuilder::rect(mm(width), mm(height))
                    .at(mm(-pitch / 2.0), 0.0)
                    .with_port_hints(["1", "positive"]),
                SmtpadBuilder::rect(mm(width), mm(height))
                    .at(mm(pitch / 2.0), 0.0)
                    .with_port_hints(["2", "negative"]),
            ];
            for pad in &pads {
                elements.push(pad.build(ctx, pcb_component_id)?);
            }
        }

        for primitive in &self.primitives {
            elements.push(primitive.build(ctx, pcb_component_id)?);
        }
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ComponentBuilder, ComponentKind};

    fn ctx() -> BuildContext {
        BuildContext::default().with_pcb_component("pcb_component_0")
    }

    #[test]
    fn test_standard_0805_pads() {
        let mut fp = FootprintBuilder::new();
        fp.set_standard("0805");
        let elements = fp.build(&ctx()).unwrap();
        assert_eq!(elements.len(), 2);
        match &elements[0] {
            Element::PcbSmtpad(pad) => {
                assert!((pad.x + 0.95).abs() < 1e-9);
                assert_eq!(pad.port_hints, vec!["1", "positive"]);
                assert_eq!(pad.pcb_component_id, "pcb_component_0");
                assert_eq!(
                    pad.shape,
                    PadShape::Rect {
                        width: 1.0,
                        height: 1.45
                    }
                );
            }
            other => panic!("Expected smtpad, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_standard() {
        let mut fp = FootprintBuilder::new();
        fp.set_standard("9999");
        assert!(matches!(
            fp.build(&ctx()),
            Err(BuildError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_requires_pcb_component() {
        let mut fp = FootprintBuilder::new();
        fp.add_hole(HoleBuilder::new(3.2));
        assert!(matches!(
            fp.build(&BuildContext::default()),
            Err(BuildError::UnboundOwner { .. })
        ));
    }

    #[test]
    fn test_units_are_converted() {
        let mut fp = FootprintBuilder::new();
        fp.add_smtpad(SmtpadBuilder::circle("10mil").at("100mil", 0.0))
            .add_silkscreen_line(SilkscreenLineBuilder::new(0.0, 0.0, "1cm", 0.0));
        let elements = fp.build(&ctx()).unwrap();
        match (&elements[0], &elements[1]) {
            (Element::PcbSmtpad(pad), Element::PcbSilkscreenLine(line)) => {
                assert!((pad.x - 2.54).abs() < 1e-9);
                assert!(matches!(pad.shape, PadShape::Circle { radius } if (radius - 0.254).abs() < 1e-9));
                assert_eq!(line.x2, 10.0);
                assert_eq!(line.stroke_width, 0.1);
            }
            other => panic!("Unexpected elements: {:?}", other),
        }
    }

    #[test]
    fn test_append_child_rejects_components() {
        let mut fp = FootprintBuilder::new();
        let err = fp
            .append_child(AnyBuilder::Component(ComponentBuilder::new(
                ComponentKind::Resistor,
            )))
            .unwrap_err();
        assert!(matches!(err, BuildError::IllegalChild { .. }));
        assert!(fp.is_empty());

        fp.append_child(AnyBuilder::Via(ViaBuilder::default())).unwrap();
        assert!(!fp.is_empty());
    }

    #[test]
    fn test_drill_depth_unset_outside_board() {
        let mut fp = FootprintBuilder::new();
        fp.add_via(ViaBuilder::default())
            .add_plated_hole(PlatedHoleBuilder::new(0.8, 1.6));
        let elements = fp.build(&ctx()).unwrap();
        match (&elements[0], &elements[1]) {
            (Element::PcbVia(via), Element::PcbPlatedHole(hole)) => {
                assert_eq!(via.drill_depth, None);
                assert_eq!(hole.drill_depth, None);
            }
            other => panic!("Unexpected elements: {:?}", other),
        }

        let on_board = ctx().with_board_thickness(1.2);
        let elements = fp.build(&on_board).unwrap();
        match &elements[1] {
            Element::PcbPlatedHole(hole) => assert_eq!(hole.drill_depth, Some(1.2)),
            other => panic!("Expected pcb_plated_hole, got {:?}", other),
        }
    }
}
