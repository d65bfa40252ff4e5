//! Trace Builder
//!
//! A trace connects ports and nets by selector. Unlike other builders it
//! needs the elements its siblings already produced: selectors are resolved
//! against the `source_component` names, `source_port` names / pin numbers
//! and `source_net` names found there.

use crate::context::BuildContext;
use crate::core::BuildError;
use crate::elements::{
    Element, LayerRef, PcbRoutePoint, PcbTrace, Point, SchematicTrace, SchematicTraceEdge,
    SourceTrace,
};
use crate::units::Length;

use super::selector::{Endpoint, PortSelector, Target};
use super::BuilderType;

#[derive(Debug, Clone, Default)]
pub struct TraceBuilder {
    connections: Vec<Endpoint>,
    thickness: Option<Length>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder_type(&self) -> BuilderType {
        BuilderType::Trace
    }

    pub fn connections(&self) -> &[Endpoint] {
        &self.connections
    }

    pub fn add_connection(&mut self, endpoint: impl Into<Endpoint>) -> &mut Self {
        self.connections.push(endpoint.into());
        self
    }

    pub fn add_connections<I, E>(&mut self, endpoints: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Endpoint>,
    {
        self.connections
            .extend(endpoints.into_iter().map(Into::into));
        self
    }

    pub fn set_thickness(&mut self, thickness: impl Into<Length>) -> &mut Self {
        self.thickness = Some(thickness.into());
        self
    }

    /// Resolve every endpoint against `siblings` and emit the trace.
    ///
    /// Always emits a `source_trace`. When at least two endpoints are ports
    /// a `schematic_trace` and a `pcb_trace` follow.
    pub async fn build(
        &self,
        ctx: &BuildContext,
        siblings: &[Element],
    ) -> Result<Vec<Element>, BuildError> {
        if self.connections.len() < 2 {
            return Err(BuildError::InsufficientConnections {
                found: self.connections.len(),
            });
        }
        let targets = self
            .connections
            .iter()
            .map(Endpoint::parse)
            .collect::<Result<Vec<_>, _>>()?;
        let width = ctx.convert_opt(self.thickness.as_ref(), ctx.default_trace_width)?;

        let lookup = Lookup { elements: siblings };
        let mut ports = Vec::new();
        let mut net_ids = Vec::new();
        for target in &targets {
            match target {
                Target::Port { .. } => ports.push(lookup.port(target)?),
                Target::Net { name } => net_ids.push(lookup.net(target, name)?),
            }
        }

        let source_trace_id = ctx.get_id("source_trace");
        tracing::debug!(
            trace = %source_trace_id,
            ports = ports.len(),
            nets = net_ids.len(),
            "Resolved trace"
        );
        let mut elements = vec![Element::SourceTrace(SourceTrace {
            source_trace_id: source_trace_id.clone(),
            connected_source_port_ids: ports.iter().map(|p| p.source_port_id.clone()).collect(),
            connected_source_net_ids: net_ids,
        })];
        if ports.len() < 2 {
            return Ok(elements);
        }

        let edges = ports
            .windows(2)
            .map(|pair| SchematicTraceEdge {
                from: pair[0].schematic_center,
                to: pair[1].schematic_center,
                from_schematic_port_id: pair[0].schematic_port_id.clone(),
                to_schematic_port_id: pair[1].schematic_port_id.clone(),
            })
            .collect();
        elements.push(Element::SchematicTrace(SchematicTrace {
            schematic_trace_id: ctx.get_id("schematic_trace"),
            source_trace_id: source_trace_id.clone(),
            edges,
        }));

        let point = |at: Point, pcb_port_id: Option<String>| PcbRoutePoint {
            x: at.x,
            y: at.y,
            width,
            layer: LayerRef::Top,
            pcb_port_id,
        };
        let mut route = Vec::new();
        for (i, port) in ports.iter().enumerate() {
            let waypoints = lookup
                .hint_offsets(&port.source_port_id)
                .into_iter()
                .map(|o| point(Point::new(port.pcb_position.x + o.x, port.pcb_position.y + o.y), None));
            let landing = point(port.pcb_position, port.pcb_port_id.clone());
            if i == 0 {
                route.push(landing);
                route.extend(waypoints);
            } else {
                route.extend(waypoints);
                route.push(landing);
            }
        }
        elements.push(Element::PcbTrace(PcbTrace {
            pcb_trace_id: ctx.get_id("pcb_trace"),
            source_trace_id,
            route,
        }));
        Ok(elements)
    }
}

/// A port endpoint with everything routing needs.
struct ResolvedPort {
    source_port_id: String,
    schematic_port_id: Option<String>,
    schematic_center: Point,
    pcb_port_id: Option<String>,
    pcb_position: Point,
}

struct Lookup<'a> {
    elements: &'a [Element],
}

impl<'a> Lookup<'a> {
    fn port(&self, target: &Target) -> Result<ResolvedPort, BuildError> {
        let source_port_id = self.source_port_id(target)?;
        let schematic = self
            .elements
            .iter()
            .filter_map(Element::as_schematic_port)
            .find(|p| p.source_port_id == source_port_id);
        let pcb = self
            .elements
            .iter()
            .filter_map(Element::as_pcb_port)
            .find(|p| p.source_port_id == source_port_id);
        Ok(ResolvedPort {
            schematic_port_id: schematic.map(|p| p.schematic_port_id.clone()),
            schematic_center: schematic.map(|p| p.center).unwrap_or_default(),
            pcb_port_id: pcb.map(|p| p.pcb_port_id.clone()),
            pcb_position: pcb.map(|p| Point::new(p.x, p.y)).unwrap_or_default(),
            source_port_id,
        })
    }

    fn source_port_id(&self, target: &Target) -> Result<String, BuildError> {
        let (component, port) = match target {
            Target::Port { component, port } => (component, port),
            Target::Net { .. } => return Err(BuildError::InvalidSelector(target.to_string())),
        };
        let selector = target.to_string();

        let components: Vec<&str> = self
            .elements
            .iter()
            .filter_map(Element::as_source_component)
            .filter(|c| &c.name == component)
            .map(|c| c.source_component_id.as_str())
            .collect();
        let component_id = match components.as_slice() {
            [id] => *id,
            [] => {
                return Err(BuildError::UnresolvedPort {
                    selector,
                    reason: format!("no component named \"{}\"", component),
                })
            }
            many => {
                return Err(BuildError::AmbiguousPort {
                    selector,
                    matches: many.len(),
                    what: "components".to_string(),
                })
            }
        };

        let ports: Vec<&str> = self
            .elements
            .iter()
            .filter_map(Element::as_source_port)
            .filter(|p| p.source_component_id == component_id)
            .filter(|p| match port {
                PortSelector::Name(name) => &p.name == name,
                PortSelector::Index(pin) => p.pin_number == Some(*pin),
            })
            .map(|p| p.source_port_id.as_str())
            .collect();
        match ports.as_slice() {
            [id] => Ok(id.to_string()),
            [] => Err(BuildError::UnresolvedPort {
                selector,
                reason: format!("\"{}\" has no port \"{}\"", component, port),
            }),
            many => Err(BuildError::AmbiguousPort {
                selector,
                matches: many.len(),
                what: "ports".to_string(),
            }),
        }
    }

    fn net(&self, target: &Target, name: &str) -> Result<String, BuildError> {
        let nets: Vec<&str> = self
            .elements
            .iter()
            .filter_map(Element::as_source_net)
            .filter(|n| n.name == name)
            .map(|n| n.source_net_id.as_str())
            .collect();
        match nets.as_slice() {
            [id] => Ok(id.to_string()),
            [] => Err(BuildError::UnresolvedPort {
                selector: target.to_string(),
                reason: format!("no net named \"{}\"", name),
            }),
            many => Err(BuildError::AmbiguousPort {
                selector: target.to_string(),
                matches: many.len(),
                what: "nets".to_string(),
            }),
        }
    }

    /// Offsets of every sibling hint that resolves to `source_port_id`.
    fn hint_offsets(&self, source_port_id: &str) -> Vec<Point> {
        self.elements
            .iter()
            .filter_map(Element::as_pcb_trace_hint)
            .filter(|hint| {
                let resolved = hint
                    .for_port
                    .parse::<Target>()
                    .and_then(|t| self.source_port_id(&t));
                match resolved {
                    Ok(id) => id == source_port_id,
                    Err(e) => {
                        tracing::debug!(hint = %hint.pcb_trace_hint_id, error = %e, "Skipping unresolved trace hint");
                        false
                    }
                }
            })
            .flat_map(|hint| hint.offsets.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Buildable, ComponentBuilder, ComponentKind, NetBuilder, TraceHintBuilder};

    async fn resistors(ctx: &BuildContext, names: &[&str]) -> Vec<Element> {
        let mut elements = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let mut r = ComponentBuilder::new(ComponentKind::Resistor);
            r.set_name(*name)
                .set_resistance(1000.0)
                .set_footprint("0402")
                .set_pcb_center(i as f64 * 5.0, 0.0);
            elements.extend(r.build(ctx).await.unwrap());
        }
        elements
    }

    #[tokio::test]
    async fn test_connects_two_ports() {
        let ctx = BuildContext::default();
        let siblings = resistors(&ctx, &["R1", "R2"]).await;
        let mut trace = TraceBuilder::new();
        trace.add_connections([".R1 > .negative", "R2.positive"]);
        let elements = trace.build(&ctx, &siblings).await.unwrap();

        let types: Vec<_> = elements.iter().map(Element::element_type).collect();
        assert_eq!(types, vec!["source_trace", "schematic_trace", "pcb_trace"]);
        let source = elements[0].as_source_trace().unwrap();
        assert_eq!(source.connected_source_port_ids, vec!["source_port_1", "source_port_2"]);
        match &elements[2] {
            Element::PcbTrace(pcb) => {
                assert_eq!(pcb.route.len(), 2);
                assert_eq!(pcb.width(), Some(0.15));
                assert_eq!(pcb.route[0].pcb_port_id.as_deref(), Some("pcb_port_1"));
            }
            other => panic!("Expected pcb_trace, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_pin_number_and_thickness() {
        let ctx = BuildContext::default();
        let siblings = resistors(&ctx, &["R1", "R2"]).await;
        let mut trace = TraceBuilder::new();
        trace
            .add_connection(".R1 > .2")
            .add_connection(".R2 > .1")
            .set_thickness("0.5mm");
        let elements = trace.build(&ctx, &siblings).await.unwrap();
        let source = elements[0].as_source_trace().unwrap();
        assert_eq!(source.connected_source_port_ids, vec!["source_port_1", "source_port_2"]);
        match &elements[2] {
            Element::PcbTrace(pcb) => assert_eq!(pcb.width(), Some(0.5)),
            other => panic!("Expected pcb_trace, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unresolved_and_ambiguous() {
        let ctx = BuildContext::default();
        let siblings = resistors(&ctx, &["R1", "R1"]).await;

        let mut missing = TraceBuilder::new();
        missing.add_connections([".R9 > .positive", ".R1 > .negative"]);
        assert!(matches!(
            missing.build(&ctx, &siblings).await,
            Err(BuildError::UnresolvedPort { .. })
        ));

        let mut ambiguous = TraceBuilder::new();
        ambiguous.add_connections([".R1 > .positive", ".R1 > .negative"]);
        match ambiguous.build(&ctx, &siblings).await {
            Err(BuildError::AmbiguousPort { matches, what, .. }) => {
                assert_eq!(matches, 2);
                assert_eq!(what, "components");
            }
            other => panic!("Expected AmbiguousPort, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_needs_two_connections() {
        let mut trace = TraceBuilder::new();
        trace.add_connection(".R1 > .positive");
        assert!(matches!(
            trace.build(&BuildContext::default(), &[]).await,
            Err(BuildError::InsufficientConnections { found: 1 })
        ));
    }

    #[tokio::test]
    async fn test_port_to_net_emits_source_trace_only() {
        let ctx = BuildContext::default();
        let mut siblings = resistors(&ctx, &["R1"]).await;
        let mut gnd = NetBuilder::new();
        gnd.set_name("GND");
        siblings.extend(gnd.build(&ctx).await.unwrap());

        let mut trace = TraceBuilder::new();
        trace.add_connections([".R1 > .negative", "net.GND"]);
        let elements = trace.build(&ctx, &siblings).await.unwrap();
        assert_eq!(elements.len(), 1);
        let source = elements[0].as_source_trace().unwrap();
        assert_eq!(source.connected_source_net_ids, vec!["source_net_0"]);
    }

    #[tokio::test]
    async fn test_hint_waypoints() {
        let ctx = BuildContext::default();
        let mut siblings = resistors(&ctx, &["R1", "R2"]).await;
        let mut hint = TraceHintBuilder::new();
        hint.set_for_port(".R2 > .positive").add_offset(0.0, 2.0);
        siblings.extend(hint.build(&ctx).await.unwrap());

        let mut trace = TraceBuilder::new();
        trace.add_connections([".R1 > .negative", ".R2 > .positive"]);
        let elements = trace.build(&ctx, &siblings).await.unwrap();
        match &elements[2] {
            Element::PcbTrace(pcb) => {
                assert_eq!(pcb.route.len(), 3);
                let last = &pcb.route[2];
                let waypoint = &pcb.route[1];
                assert!(waypoint.pcb_port_id.is_none());
                assert_eq!(waypoint.x, last.x);
                assert!((waypoint.y - (last.y + 2.0)).abs() < 1e-9);
            }
            other => panic!("Expected pcb_trace, got {:?}", other),
        }
    }
}
