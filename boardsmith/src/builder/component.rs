//! Component Builder
//!
//! One builder type covers every component kind. The kind fixes the
//! `ftype`, the default schematic size, the port layout and which source
//! properties are required; everything else is shared:
//!
//! 1. allocate `source_component`, `schematic_component` and `pcb_component` ids
//! 2. emit `source_component` and `schematic_component`
//! 3. register the kind's ports, build them with the symbol primitives, and
//!    place the result by the schematic center and rotation
//! 4. emit `pcb_component`, then the footprint and one `pcb_port` per port,
//!    placed by the pcb center and rotation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::context::BuildContext;
use crate::core::BuildError;
use crate::elements::{
    Element, FacingDirection, Ftype, LayerRef, PcbComponent, PcbPort, Point, SchematicComponent,
    Size, SourceComponent,
};
use crate::transform::{transform_pcb_elements, transform_schematic_elements, Matrix};
use crate::units::{Length, LengthPoint, Quantity};

use super::footprint::ViaBuilder;
use super::{
    AnyBuilder, Buildable, BuilderType, FootprintBuilder, HasFootprint, HasPorts, PortSpec,
    PortsBuilder, SchematicSymbolBuilder,
};

/// Spacing between DIP pins on a bug's schematic symbol
const BUG_PIN_PITCH: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Generic,
    Resistor,
    Capacitor,
    Diode,
    Led,
    PowerSource,
    Inductor,
    Ground,
    Bug,
    Via,
    NetAlias,
}

impl ComponentKind {
    pub fn ftype(self) -> Ftype {
        match self {
            ComponentKind::Generic => Ftype::SimpleComponent,
            ComponentKind::Resistor => Ftype::SimpleResistor,
            ComponentKind::Capacitor => Ftype::SimpleCapacitor,
            ComponentKind::Diode => Ftype::SimpleDiode,
            ComponentKind::Led => Ftype::SimpleLed,
            ComponentKind::PowerSource => Ftype::SimplePowerSource,
            ComponentKind::Inductor => Ftype::SimpleInductor,
            ComponentKind::Ground => Ftype::SimpleGround,
            ComponentKind::Bug => Ftype::SimpleBug,
            ComponentKind::Via => Ftype::SimpleVia,
            ComponentKind::NetAlias => Ftype::NetAlias,
        }
    }

    /// Tag name used in error messages, e.g. `<resistor />`
    pub fn tag(self) -> &'static str {
        match self {
            ComponentKind::Generic => "component",
            ComponentKind::Resistor => "resistor",
            ComponentKind::Capacitor => "capacitor",
            ComponentKind::Diode => "diode",
            ComponentKind::Led => "led",
            ComponentKind::PowerSource => "power_source",
            ComponentKind::Inductor => "inductor",
            ComponentKind::Ground => "ground",
            ComponentKind::Bug => "bug",
            ComponentKind::Via => "via",
            ComponentKind::NetAlias => "net_alias",
        }
    }

    pub fn builder_type_name(self) -> &'static str {
        match self {
            ComponentKind::Generic => "generic_component_builder",
            ComponentKind::Resistor => "resistor_builder",
            ComponentKind::Capacitor => "capacitor_builder",
            ComponentKind::Diode => "diode_builder",
            ComponentKind::Led => "led_builder",
            ComponentKind::PowerSource => "power_source_builder",
            ComponentKind::Inductor => "inductor_builder",
            ComponentKind::Ground => "ground_builder",
            ComponentKind::Bug => "bug_builder",
            ComponentKind::Via => "via_builder",
            ComponentKind::NetAlias => "net_alias_builder",
        }
    }

    pub fn default_schematic_size(self) -> Size {
        match self {
            ComponentKind::Resistor => Size::new(0.3, 1.0),
            ComponentKind::Capacitor
            | ComponentKind::Inductor
            | ComponentKind::Diode
            | ComponentKind::Led
            | ComponentKind::Ground => Size::new(0.5, 1.0),
            ComponentKind::PowerSource => Size::new(24.0 / 34.0, 1.0),
            ComponentKind::Via => Size::new(0.3, 0.3),
            ComponentKind::NetAlias => Size::new(0.5, 0.3),
            ComponentKind::Generic | ComponentKind::Bug => Size::new(1.0, 1.0),
        }
    }

    fn is_two_terminal(self) -> bool {
        matches!(
            self,
            ComponentKind::Resistor
                | ComponentKind::Capacitor
                | ComponentKind::Diode
                | ComponentKind::Led
                | ComponentKind::PowerSource
                | ComponentKind::Inductor
        )
    }

    /// Ports every component of this kind has. `None` for kinds whose ports
    /// come from the caller (generic, bug).
    pub fn fixed_ports(self) -> Option<Vec<PortSpec>> {
        if self.is_two_terminal() {
            return Some(vec![
                PortSpec::new("positive", 0.0, -0.5, FacingDirection::Up),
                PortSpec::new("negative", 0.0, 0.5, FacingDirection::Down),
            ]);
        }
        match self {
            ComponentKind::Ground => Some(vec![PortSpec::new("gnd", 0.0, -0.5, FacingDirection::Up)]),
            ComponentKind::NetAlias => Some(vec![PortSpec::new("main", 0.0, 0.0, FacingDirection::Up)]),
            ComponentKind::Via => Some(vec![PortSpec::new("via", 0.0, 0.0, FacingDirection::Up)]),
            _ => None,
        }
    }
}

/// Placement and naming props. [`ComponentBuilder::set_props`] merges
/// field-wise: unset fields leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentProps {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub schematic_center: Option<Point>,
    /// Degrees
    #[serde(default)]
    pub schematic_rotation: Option<f64>,
    #[serde(default)]
    pub schematic_size: Option<Size>,
    #[serde(default)]
    pub pcb_center: Option<LengthPoint>,
    /// Degrees
    #[serde(default)]
    pub pcb_rotation: Option<f64>,
    #[serde(default)]
    pub pcb_layer: Option<LayerRef>,
}

impl ComponentProps {
    fn merge(&mut self, other: ComponentProps) {
        if other.name.is_some() {
            self.name = other.name;
        }
        if other.schematic_center.is_some() {
            self.schematic_center = other.schematic_center;
        }
        if other.schematic_rotation.is_some() {
            self.schematic_rotation = other.schematic_rotation;
        }
        if other.schematic_size.is_some() {
            self.schematic_size = other.schematic_size;
        }
        if other.pcb_center.is_some() {
            self.pcb_center = other.pcb_center;
        }
        if other.pcb_rotation.is_some() {
            self.pcb_rotation = other.pcb_rotation;
        }
        if other.pcb_layer.is_some() {
            self.pcb_layer = other.pcb_layer;
        }
    }
}

/// Electrical properties carried into the `source_component`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceProps {
    #[serde(default)]
    pub resistance: Option<Quantity>,
    #[serde(default)]
    pub capacitance: Option<Quantity>,
    #[serde(default)]
    pub inductance: Option<Quantity>,
    #[serde(default)]
    pub voltage: Option<Quantity>,
    /// Net a net alias attaches to
    #[serde(default)]
    pub net: Option<String>,
    /// Bug pin labels keyed by pin number
    #[serde(default)]
    pub port_labels: Option<BTreeMap<u32, String>>,
    #[serde(default)]
    pub manufacturer_part_number: Option<String>,
}

impl SourceProps {
    fn merge(&mut self, other: SourceProps) {
        if other.resistance.is_some() {
            self.resistance = other.resistance;
        }
        if other.capacitance.is_some() {
            self.capacitance = other.capacitance;
        }
        if other.inductance.is_some() {
            self.inductance = other.inductance;
        }
        if other.voltage.is_some() {
            self.voltage = other.voltage;
        }
        if other.net.is_some() {
            self.net = other.net;
        }
        if other.port_labels.is_some() {
            self.port_labels = other.port_labels;
        }
        if other.manufacturer_part_number.is_some() {
            self.manufacturer_part_number = other.manufacturer_part_number;
        }
    }
}

/// Resolved electrical values, checked before any id is allocated.
struct SourceValues {
    resistance: Option<f64>,
    capacitance: Option<f64>,
    inductance: Option<f64>,
    voltage: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ComponentBuilder {
    kind: ComponentKind,
    props: ComponentProps,
    source: SourceProps,
    ports: Vec<PortSpec>,
    symbol: SchematicSymbolBuilder,
    footprint: FootprintBuilder,
}

impl ComponentBuilder {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            props: ComponentProps::default(),
            source: SourceProps::default(),
            ports: Vec::new(),
            symbol: SchematicSymbolBuilder::new(),
            footprint: FootprintBuilder::new(),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.props.name.as_deref()
    }

    pub fn props(&self) -> &ComponentProps {
        &self.props
    }

    pub fn source_props(&self) -> &SourceProps {
        &self.source
    }

    pub fn set_props(&mut self, props: ComponentProps) -> &mut Self {
        self.props.merge(props);
        self
    }

    pub fn set_source_properties(&mut self, source: SourceProps) -> &mut Self {
        self.source.merge(source);
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.props.name = Some(name.into());
        self
    }

    pub fn set_schematic_center(&mut self, x: f64, y: f64) -> &mut Self {
        self.props.schematic_center = Some(Point::new(x, y));
        self
    }

    pub fn set_schematic_rotation(&mut self, degrees: f64) -> &mut Self {
        self.props.schematic_rotation = Some(degrees);
        self
    }

    pub fn set_pcb_center(&mut self, x: impl Into<Length>, y: impl Into<Length>) -> &mut Self {
        self.props.pcb_center = Some(LengthPoint::new(x, y));
        self
    }

    pub fn set_pcb_rotation(&mut self, degrees: f64) -> &mut Self {
        self.props.pcb_rotation = Some(degrees);
        self
    }

    pub fn set_resistance(&mut self, resistance: impl Into<Quantity>) -> &mut Self {
        self.source.resistance = Some(resistance.into());
        self
    }

    pub fn set_capacitance(&mut self, capacitance: impl Into<Quantity>) -> &mut Self {
        self.source.capacitance = Some(capacitance.into());
        self
    }

    pub fn set_inductance(&mut self, inductance: impl Into<Quantity>) -> &mut Self {
        self.source.inductance = Some(inductance.into());
        self
    }

    pub fn set_voltage(&mut self, voltage: impl Into<Quantity>) -> &mut Self {
        self.source.voltage = Some(voltage.into());
        self
    }

    pub fn set_net(&mut self, net: impl Into<String>) -> &mut Self {
        self.source.net = Some(net.into());
        self
    }

    pub fn set_port_labels<I, S>(&mut self, labels: I) -> &mut Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        self.source.port_labels = Some(labels.into_iter().map(|(pin, l)| (pin, l.into())).collect());
        self
    }

    /// Declare a port on a generic component. Names are checked for
    /// uniqueness when the component is built.
    pub fn add_port(&mut self, port: PortSpec) -> &mut Self {
        self.ports.push(port);
        self
    }

    /// Shorthand for `footprint_mut().set_standard(..)`
    pub fn set_footprint(&mut self, standard: impl Into<String>) -> &mut Self {
        self.footprint.set_standard(standard);
        self
    }

    pub fn schematic_symbol(&mut self) -> &mut SchematicSymbolBuilder {
        &mut self.symbol
    }

    /// Route a schematic primitive into the symbol or a footprint primitive
    /// into the footprint. Anything else is an illegal child.
    pub fn append_child(&mut self, child: AnyBuilder) -> Result<&mut Self, BuildError> {
        let ty = child.builder_type();
        if ty.is_schematic_primitive() {
            self.symbol.append_child(child)?;
        } else if ty.is_footprint_primitive() {
            self.footprint.append_child(child)?;
        } else {
            return Err(BuildError::IllegalChild {
                parent: self.kind.builder_type_name().to_string(),
                child: ty.to_string(),
            });
        }
        Ok(self)
    }

    fn source_values(&self) -> Result<SourceValues, BuildError> {
        let tag = self.kind.tag();
        let required = |value: &Option<Quantity>, property: &str| -> Result<f64, BuildError> {
            value
                .as_ref()
                .ok_or_else(|| BuildError::missing(tag, property))?
                .resolve()
        };
        let optional = |value: &Option<Quantity>| value.as_ref().map(Quantity::resolve).transpose();

        match self.kind {
            ComponentKind::NetAlias if self.source.net.is_none() => {
                return Err(BuildError::missing(tag, "net"))
            }
            ComponentKind::Bug
                if self
                    .source
                    .port_labels
                    .as_ref()
                    .map_or(true, BTreeMap::is_empty) =>
            {
                return Err(BuildError::missing(tag, "port_labels"))
            }
            _ => {}
        }

        Ok(SourceValues {
            resistance: match self.kind {
                ComponentKind::Resistor => Some(required(&self.source.resistance, "resistance")?),
                _ => optional(&self.source.resistance)?,
            },
            capacitance: match self.kind {
                ComponentKind::Capacitor => Some(required(&self.source.capacitance, "capacitance")?),
                _ => optional(&self.source.capacitance)?,
            },
            inductance: match self.kind {
                ComponentKind::Inductor => Some(required(&self.source.inductance, "inductance")?),
                _ => optional(&self.source.inductance)?,
            },
            voltage: match self.kind {
                ComponentKind::PowerSource => Some(required(&self.source.voltage, "voltage")?),
                _ => optional(&self.source.voltage)?,
            },
        })
    }

    /// Ports to register, in registration order.
    fn port_layout(&self) -> Vec<PortSpec> {
        if let Some(fixed) = self.kind.fixed_ports() {
            if !self.ports.is_empty() {
                tracing::warn!(
                    kind = self.kind.tag(),
                    ignored = self.ports.len(),
                    "Ignoring declared ports on a component with a fixed port layout"
                );
            }
            return fixed;
        }
        match (&self.kind, &self.source.port_labels) {
            (ComponentKind::Bug, Some(labels)) => dip_layout(labels),
            _ => self.ports.clone(),
        }
    }

    fn schematic_size(&self) -> Size {
        if let Some(size) = self.props.schematic_size {
            return size;
        }
        match (&self.kind, &self.source.port_labels) {
            (ComponentKind::Bug, Some(labels)) => {
                let rows = (labels.len() + 1) / 2;
                Size::new(1.0, rows as f64 * BUG_PIN_PITCH + BUG_PIN_PITCH)
            }
            _ => self.kind.default_schematic_size(),
        }
    }

    fn build_elements(&self, ctx: &BuildContext) -> Result<Vec<Element>, BuildError> {
        let values = self.source_values()?;
        let pcb_center = match &self.props.pcb_center {
            Some(center) => ctx.units.convert_point(center)?,
            None => Point::default(),
        };
        let pcb_rotation = self.props.pcb_rotation.unwrap_or(0.0);
        let schematic_center = self.props.schematic_center.unwrap_or_default();
        let schematic_rotation = self.props.schematic_rotation.unwrap_or(0.0);

        let source_component_id = ctx.get_id("source_component");
        let schematic_component_id = ctx.get_id("schematic_component");
        let pcb_component_id = ctx.get_id("pcb_component");
        let name = self
            .props
            .name
            .clone()
            .unwrap_or_else(|| source_component_id.clone());

        tracing::debug!(kind = self.kind.tag(), name = %name, "Building component");

        let mut elements = vec![
            Element::SourceComponent(SourceComponent {
                source_component_id: source_component_id.clone(),
                ftype: self.kind.ftype(),
                name,
                resistance: values.resistance,
                capacitance: values.capacitance,
                inductance: values.inductance,
                voltage: values.voltage,
                net: self.source.net.clone(),
                manufacturer_part_number: self.source.manufacturer_part_number.clone(),
            }),
            Element::SchematicComponent(SchematicComponent {
                schematic_component_id: schematic_component_id.clone(),
                source_component_id: source_component_id.clone(),
                center: schematic_center,
                rotation: schematic_rotation,
                size: self.schematic_size(),
            }),
        ];

        let mut registry = PortsBuilder::new();
        registry
            .set_source_component(source_component_id.as_str())
            .set_schematic_component(schematic_component_id.as_str());
        for port in self.port_layout() {
            registry.add(port)?;
        }

        let mut schematic = registry.build(ctx)?;
        let source_port_ids: Vec<String> = schematic
            .iter()
            .filter_map(|e| e.as_source_port().map(|p| p.source_port_id.clone()))
            .collect();
        schematic.extend(self.symbol.build(ctx, &schematic_component_id));
        elements.extend(transform_schematic_elements(
            schematic,
            &Matrix::placement(schematic_center, schematic_rotation),
        ));

        elements.push(Element::PcbComponent(PcbComponent {
            pcb_component_id: pcb_component_id.clone(),
            source_component_id,
            center: pcb_center,
            rotation: pcb_rotation,
            layer: self.props.pcb_layer.unwrap_or_default(),
        }));

        let footprint_ctx = ctx.with_pcb_component(&pcb_component_id);
        let mut pcb = match (self.kind, self.footprint.is_empty()) {
            (ComponentKind::Via, true) => {
                let mut via = FootprintBuilder::new();
                via.add_via(ViaBuilder::default());
                via.build(&footprint_ctx)?
            }
            _ => self.footprint.build(&footprint_ctx)?,
        };
        let pcb_ports: Vec<Element> = registry
            .iter()
            .zip(source_port_ids)
            .map(|(port, source_port_id)| {
                let (at, layers) = pad_for_port(&pcb, port);
                Element::PcbPort(PcbPort {
                    pcb_port_id: ctx.get_id("pcb_port"),
                    source_port_id,
                    pcb_component_id: pcb_component_id.clone(),
                    x: at.x,
                    y: at.y,
                    layers,
                })
            })
            .collect();
        pcb.extend(pcb_ports);
        elements.extend(transform_pcb_elements(
            pcb,
            &Matrix::placement(pcb_center, pcb_rotation),
        ));

        Ok(elements)
    }
}

/// Position and layers of the first pad whose port hints name `port`, by
/// name or pin number. Ports without a pad sit at the component origin.
fn pad_for_port(footprint: &[Element], port: &PortSpec) -> (Point, Vec<LayerRef>) {
    let pin = port.pin_number.map(|p| p.to_string());
    let matches = |hints: &[String]| {
        hints
            .iter()
            .any(|h| *h == port.name || Some(h) == pin.as_ref())
    };
    for element in footprint {
        match element {
            Element::PcbSmtpad(pad) if matches(&pad.port_hints) => {
                return (Point::new(pad.x, pad.y), vec![pad.layer]);
            }
            Element::PcbPlatedHole(hole) if matches(&hole.port_hints) => {
                return (Point::new(hole.x, hole.y), hole.layers.clone());
            }
            Element::PcbVia(via) if port.name == "via" => {
                return (Point::new(via.x, via.y), via.layers.clone());
            }
            _ => {}
        }
    }
    (Point::default(), vec![LayerRef::Top])
}

/// Dual-inline arrangement: the first half of the pins down the left side,
/// the rest up the right side.
fn dip_layout(labels: &BTreeMap<u32, String>) -> Vec<PortSpec> {
    let rows = (labels.len() + 1) / 2;
    let top = -((rows as f64 - 1.0) * BUG_PIN_PITCH) / 2.0;
    labels
        .iter()
        .enumerate()
        .map(|(i, (pin, label))| {
            let (x, row, facing) = if i < rows {
                (-0.5, i, FacingDirection::Left)
            } else {
                (0.5, rows - 1 - (i - rows), FacingDirection::Right)
            };
            PortSpec::new(label.clone(), x, top + row as f64 * BUG_PIN_PITCH, facing)
                .with_pin_number(*pin)
        })
        .collect()
}

#[async_trait]
impl Buildable for ComponentBuilder {
    fn builder_type(&self) -> BuilderType {
        BuilderType::Component(self.kind)
    }

    async fn build(&self, ctx: &BuildContext) -> Result<Vec<Element>, BuildError> {
        self.build_elements(ctx)
    }
}

impl HasPorts for ComponentBuilder {
    fn declared_ports(&self) -> &[PortSpec] {
        &self.ports
    }
}

impl HasFootprint for ComponentBuilder {
    fn footprint(&self) -> &FootprintBuilder {
        &self.footprint
    }

    fn footprint_mut(&mut self) -> &mut FootprintBuilder {
        &mut self.footprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{SchematicLineBuilder, SmtpadBuilder};

    fn resistor() -> ComponentBuilder {
        let mut r = ComponentBuilder::new(ComponentKind::Resistor);
        r.set_name("R1").set_resistance("10k");
        r
    }

    fn schematic_ports(elements: &[Element]) -> Vec<(String, Point, FacingDirection)> {
        let names: BTreeMap<&str, &str> = elements
            .iter()
            .filter_map(Element::as_source_port)
            .map(|p| (p.source_port_id.as_str(), p.name.as_str()))
            .collect();
        elements
            .iter()
            .filter_map(Element::as_schematic_port)
            .map(|p| {
                (
                    names[p.source_port_id.as_str()].to_string(),
                    p.center,
                    p.facing_direction,
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_two_terminal_layout() {
        let elements = resistor().build(&BuildContext::default()).await.unwrap();
        let ports = schematic_ports(&elements);
        assert_eq!(
            ports,
            vec![
                ("positive".to_string(), Point::new(0.0, -0.5), FacingDirection::Up),
                ("negative".to_string(), Point::new(0.0, 0.5), FacingDirection::Down),
            ]
        );
        let source = elements[0].as_source_component().unwrap();
        assert_eq!(source.ftype, Ftype::SimpleResistor);
        assert_eq!(source.resistance, Some(10_000.0));
    }

    #[tokio::test]
    async fn test_element_order() {
        let mut r = resistor();
        r.set_footprint("0603");
        let elements = r.build(&BuildContext::default()).await.unwrap();
        let types: Vec<_> = elements.iter().map(Element::element_type).collect();
        assert_eq!(
            types,
            vec![
                "source_component",
                "schematic_component",
                "source_port",
                "schematic_port",
                "source_port",
                "schematic_port",
                "pcb_component",
                "pcb_smtpad",
                "pcb_smtpad",
                "pcb_port",
                "pcb_port",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_resistance() {
        let mut r = ComponentBuilder::new(ComponentKind::Resistor);
        r.set_name("R1");
        let ctx = BuildContext::default();
        let err = r.build(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "<resistor /> \"resistance\" is not set");
        assert_eq!(ctx.allocator().issued("source_component"), 0);
    }

    #[tokio::test]
    async fn test_inductor_keeps_its_own_ftype() {
        let mut l = ComponentBuilder::new(ComponentKind::Inductor);
        l.set_inductance("4.7uH");
        let elements = l.build(&BuildContext::default()).await.unwrap();
        let source = elements[0].as_source_component().unwrap();
        assert_eq!(source.ftype, Ftype::SimpleInductor);
        assert!((source.inductance.unwrap() - 4.7e-6).abs() < 1e-15);
        assert_eq!(source.name, source.source_component_id);
    }

    #[tokio::test]
    async fn test_schematic_rotation_moves_ports() {
        let mut r = resistor();
        r.set_schematic_center(2.0, 3.0).set_schematic_rotation(90.0);
        let elements = r.build(&BuildContext::default()).await.unwrap();
        let ports = schematic_ports(&elements);
        assert_eq!(ports[0].1, Point::new(2.5, 3.0));
        assert_eq!(ports[0].2, FacingDirection::Right);
        assert_eq!(ports[1].1, Point::new(1.5, 3.0));
    }

    #[tokio::test]
    async fn test_pcb_ports_follow_pads() {
        let mut r = resistor();
        r.set_footprint("0805").set_pcb_center(10.0, 5.0);
        let elements = r.build(&BuildContext::default()).await.unwrap();
        let pcb_ports: Vec<&PcbPort> = elements
            .iter()
            .filter_map(Element::as_pcb_port)
            .collect();
        assert_eq!(pcb_ports.len(), 2);
        assert!((pcb_ports[0].x - 9.05).abs() < 1e-9);
        assert!((pcb_ports[1].x - 10.95).abs() < 1e-9);
        assert_eq!(pcb_ports[0].y, 5.0);
    }

    #[tokio::test]
    async fn test_bug_dip_layout() {
        let mut u = ComponentBuilder::new(ComponentKind::Bug);
        u.set_name("U1")
            .set_port_labels([(1, "VCC"), (2, "IN"), (3, "OUT"), (4, "GND")]);
        let elements = u.build(&BuildContext::default()).await.unwrap();
        let ports = schematic_ports(&elements);
        let names: Vec<&str> = ports.iter().map(|p| p.0.as_str()).collect();
        assert_eq!(names, vec!["VCC", "IN", "OUT", "GND"]);
        // pin 1 top-left, pin 4 top-right
        assert_eq!(ports[0].2, FacingDirection::Left);
        assert_eq!(ports[3].2, FacingDirection::Right);
        assert!(ports[0].1.y < ports[1].1.y);
        assert_eq!(ports[0].1.y, ports[3].1.y);
        let pins: Vec<Option<u32>> = elements
            .iter()
            .filter_map(Element::as_source_port)
            .map(|p| p.pin_number)
            .collect();
        assert_eq!(pins, vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[tokio::test]
    async fn test_bug_requires_port_labels() {
        let u = ComponentBuilder::new(ComponentKind::Bug);
        let err = u.build(&BuildContext::default()).await.unwrap_err();
        assert!(matches!(err, BuildError::MissingRequiredProperty { ref property, .. } if property == "port_labels"));
    }

    #[tokio::test]
    async fn test_generic_duplicate_port() {
        let mut c = ComponentBuilder::new(ComponentKind::Generic);
        c.add_port(PortSpec::new("a", -0.5, 0.0, FacingDirection::Left))
            .add_port(PortSpec::new("a", 0.5, 0.0, FacingDirection::Right));
        let err = c.build(&BuildContext::default()).await.unwrap_err();
        assert!(matches!(err, BuildError::DuplicatePortName { .. }));
    }

    #[tokio::test]
    async fn test_via_default_footprint() {
        let mut v = ComponentBuilder::new(ComponentKind::Via);
        v.set_pcb_center(1.0, 1.0);
        let elements = v.build(&BuildContext::default()).await.unwrap();
        let via = elements
            .iter()
            .find_map(|e| match e {
                Element::PcbVia(v) => Some(v),
                _ => None,
            })
            .unwrap();
        assert_eq!((via.x, via.y), (1.0, 1.0));
        let port = elements.iter().find_map(Element::as_pcb_port).unwrap();
        assert_eq!(port.layers, vec![LayerRef::Top, LayerRef::Bottom]);
    }

    #[test]
    fn test_append_child_routing() {
        let mut c = ComponentBuilder::new(ComponentKind::Generic);
        c.append_child(AnyBuilder::SchematicLine(SchematicLineBuilder::new(
            0.0, 0.0, 1.0, 0.0,
        )))
        .unwrap();
        c.append_child(AnyBuilder::Smtpad(SmtpadBuilder::rect(1.0, 1.0)))
            .unwrap();
        assert_eq!(c.symbol.len(), 1);
        assert!(!c.footprint().is_empty());

        let err = c
            .append_child(AnyBuilder::Component(ComponentBuilder::new(
                ComponentKind::Resistor,
            )))
            .unwrap_err();
        assert!(matches!(err, BuildError::IllegalChild { .. }));
    }

    #[test]
    fn test_props_merge_field_wise() {
        let mut c = ComponentBuilder::new(ComponentKind::Capacitor);
        c.set_props(ComponentProps {
            name: Some("C1".into()),
            schematic_rotation: Some(90.0),
            ..Default::default()
        });
        c.set_props(ComponentProps {
            schematic_center: Some(Point::new(1.0, 1.0)),
            ..Default::default()
        });
        assert_eq!(c.name(), Some("C1"));
        assert_eq!(c.props().schematic_rotation, Some(90.0));
        assert_eq!(c.props().schematic_center, Some(Point::new(1.0, 1.0)));
    }
}
