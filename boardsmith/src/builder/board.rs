//! Board Builder
//!
//! A group with physical dimensions. Boards accept a wider set of children
//! than plain groups, validate their dimensions before building anything,
//! and append a single `pcb_board` after all child elements.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::BuildContext;
use crate::core::BuildError;
use crate::elements::{Element, PcbBoard, Point};
use crate::units::{Length, LengthPoint};

use super::addables::{Addable, BOARD_ADDABLES};
use super::component::{ComponentBuilder, ComponentKind};
use super::group::{Children, Container};
use super::{Buildable, BuilderType, NetBuilder, TraceHintBuilder};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardProps {
    #[serde(default)]
    pub width: Option<Length>,
    #[serde(default)]
    pub height: Option<Length>,
    /// Takes precedence over `center_x` / `center_y`
    #[serde(default)]
    pub center: Option<LengthPoint>,
    #[serde(default)]
    pub center_x: Option<Length>,
    #[serde(default)]
    pub center_y: Option<Length>,
    #[serde(default)]
    pub board_thickness: Option<Length>,
}

impl BoardProps {
    fn merge(&mut self, other: BoardProps) {
        if other.width.is_some() {
            self.width = other.width;
        }
        if other.height.is_some() {
            self.height = other.height;
        }
        if other.center.is_some() {
            self.center = other.center;
        }
        if other.center_x.is_some() {
            self.center_x = other.center_x;
        }
        if other.center_y.is_some() {
            self.center_y = other.center_y;
        }
        if other.board_thickness.is_some() {
            self.board_thickness = other.board_thickness;
        }
    }
}

fn required<'a>(value: &'a Option<Length>, property: &str) -> Result<&'a Length, BuildError> {
    value
        .as_ref()
        .ok_or_else(|| BuildError::missing("board", property))
}

/// Board dimensions after validation and unit conversion.
struct Outline {
    center: Point,
    width: f64,
    height: f64,
    thickness: f64,
}

#[derive(Debug, Default)]
pub struct BoardBuilder {
    props: BoardProps,
    children: Children,
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn props(&self) -> &BoardProps {
        &self.props
    }

    /// Merge `props` field-wise into the current props.
    pub fn set_props(&mut self, props: BoardProps) -> &mut Self {
        self.props.merge(props);
        self
    }

    pub fn set_size(&mut self, width: impl Into<Length>, height: impl Into<Length>) -> &mut Self {
        self.props.width = Some(width.into());
        self.props.height = Some(height.into());
        self
    }

    pub fn set_center(&mut self, x: impl Into<Length>, y: impl Into<Length>) -> &mut Self {
        self.props.center_x = Some(x.into());
        self.props.center_y = Some(y.into());
        self
    }

    pub fn set_thickness(&mut self, thickness: impl Into<Length>) -> &mut Self {
        self.props.board_thickness = Some(thickness.into());
        self
    }

    pub fn reset(&mut self) -> &mut Self {
        self.children.clear();
        self
    }

    pub fn add_led(&mut self, configure: impl FnOnce(&mut ComponentBuilder)) -> &mut Self {
        self.children.push_component(ComponentKind::Led, configure);
        self
    }

    pub fn add_via(&mut self, configure: impl FnOnce(&mut ComponentBuilder)) -> &mut Self {
        self.children.push_component(ComponentKind::Via, configure);
        self
    }

    pub fn add_net_alias(&mut self, configure: impl FnOnce(&mut ComponentBuilder)) -> &mut Self {
        self.children.push_component(ComponentKind::NetAlias, configure);
        self
    }

    pub fn add_net(&mut self, configure: impl FnOnce(&mut NetBuilder)) -> Result<&mut Self, BuildError> {
        let mut net = NetBuilder::new();
        configure(&mut net);
        self.append_child(super::AnyBuilder::Net(net))
    }

    pub fn add_trace_hint(
        &mut self,
        configure: impl FnOnce(&mut TraceHintBuilder),
    ) -> Result<&mut Self, BuildError> {
        let mut hint = TraceHintBuilder::new();
        configure(&mut hint);
        self.append_child(super::AnyBuilder::TraceHint(hint))
    }

    /// Check required props in a fixed order and convert them.
    fn outline(&self, ctx: &BuildContext) -> Result<Outline, BuildError> {
        let width = required(&self.props.width, "width")?;
        let height = required(&self.props.height, "height")?;
        let center = match &self.props.center {
            Some(center) => ctx.units.convert_point(center)?,
            None => {
                let x = required(&self.props.center_x, "center_x")?;
                let y = required(&self.props.center_y, "center_y")?;
                Point::new(ctx.convert(x)?, ctx.convert(y)?)
            }
        };
        Ok(Outline {
            center,
            width: ctx.convert(width)?,
            height: ctx.convert(height)?,
            thickness: ctx.convert_opt(
                self.props.board_thickness.as_ref(),
                ctx.default_board_thickness,
            )?,
        })
    }
}

impl Container for BoardBuilder {
    fn container_name(&self) -> &'static str {
        "board"
    }

    fn container_type(&self) -> BuilderType {
        BuilderType::Board
    }

    fn addables(&self) -> &'static [Addable] {
        BOARD_ADDABLES
    }

    fn children(&self) -> &Children {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Children {
        &mut self.children
    }
}

#[async_trait]
impl Buildable for BoardBuilder {
    fn builder_type(&self) -> BuilderType {
        BuilderType::Board
    }

    async fn build(&self, ctx: &BuildContext) -> Result<Vec<Element>, BuildError> {
        let outline = self.outline(ctx)?;
        tracing::info!(
            width = outline.width,
            height = outline.height,
            children = self.children.len(),
            "Building board"
        );
        let board_ctx = ctx.with_board_thickness(outline.thickness);
        let mut elements = self.children.build(&board_ctx).await?;
        elements.push(Element::PcbBoard(PcbBoard {
            pcb_board_id: ctx.get_id("pcb_board"),
            center: outline.center,
            width: outline.width,
            height: outline.height,
            thickness: outline.thickness,
        }));
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AnyBuilder;

    fn board() -> BoardBuilder {
        let mut board = BoardBuilder::new();
        board.set_size(20.0, 10.0).set_center(0.0, 0.0);
        board
    }

    #[tokio::test]
    async fn test_pcb_board_is_last() {
        let mut b = board();
        b.add_resistor(|r| {
            r.set_name("R1").set_resistance(1.0);
        })
        .add_led(|d| {
            d.set_name("D1");
        });
        let elements = b.build(&BuildContext::default()).await.unwrap();
        match elements.last() {
            Some(Element::PcbBoard(pcb)) => {
                assert_eq!(pcb.width, 20.0);
                assert_eq!(pcb.thickness, 1.2);
            }
            other => panic!("Expected pcb_board last, got {:?}", other),
        }
        assert_eq!(elements.iter().filter(|e| e.element_type() == "pcb_board").count(), 1);
    }

    #[tokio::test]
    async fn test_missing_height_builds_nothing() {
        let mut b = BoardBuilder::new();
        b.set_props(BoardProps {
            width: Some(10.0.into()),
            center_x: Some(0.0.into()),
            center_y: Some(0.0.into()),
            ..Default::default()
        })
        .add_resistor(|r| {
            r.set_resistance(1.0);
        });
        let ctx = BuildContext::default();
        let err = b.build(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "<board /> \"height\" is not set");
        assert_eq!(ctx.allocator().issued("source_component"), 0);
    }

    #[tokio::test]
    async fn test_center_point_and_units() {
        let mut b = BoardBuilder::new();
        b.set_props(BoardProps {
            width: Some("5cm".into()),
            height: Some("1in".into()),
            center: Some(LengthPoint::new("10mm", 5.0)),
            board_thickness: Some("1.6mm".into()),
            ..Default::default()
        });
        let elements = b.build(&BuildContext::default()).await.unwrap();
        match &elements[0] {
            Element::PcbBoard(pcb) => {
                assert_eq!(pcb.center, Point::new(10.0, 5.0));
                assert_eq!(pcb.width, 50.0);
                assert!((pcb.height - 25.4).abs() < 1e-9);
                assert_eq!(pcb.thickness, 1.6);
            }
            other => panic!("Expected pcb_board, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_vias_drill_through_board() {
        let mut b = board();
        b.set_thickness("1.6mm").add_via(|v| {
            v.set_name("VIA1");
        });
        let elements = b.build(&BuildContext::default()).await.unwrap();
        let via = elements
            .iter()
            .find_map(|e| match e {
                Element::PcbVia(via) => Some(via),
                _ => None,
            })
            .expect("Should emit a pcb_via");
        assert_eq!(via.drill_depth, Some(1.6));
    }

    #[test]
    fn test_board_only_addables() {
        let mut b = board();
        b.add("trace_hint", |h| {
            if let Some(h) = h.as_trace_hint_mut() {
                h.set_for_port(".R1 > .positive");
            }
        })
        .unwrap()
        .add("via", |_| {})
        .unwrap();
        assert_eq!(b.children().parts().len(), 2);

        let err = b.add("project", |_| {}).unwrap_err();
        assert!(matches!(err, BuildError::UnknownAddable { .. }));
        let err = b.append_child(AnyBuilder::Board(BoardBuilder::new())).unwrap_err();
        assert!(matches!(err, BuildError::IllegalChild { .. }));
    }
}
