//! Port Registry
//!
//! Named connection points of one component. Positions are in the owning
//! component's local (unrotated) schematic frame; the component maps them
//! into place after it knows its center and rotation.

use serde::{Deserialize, Serialize};

use crate::context::BuildContext;
use crate::core::BuildError;
use crate::elements::{Element, FacingDirection, Point, SchematicPort, SourcePort};

use super::selector::PortSelector;

/// Declaration of a single port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSpec {
    pub name: String,
    pub center: Point,
    pub facing_direction: FacingDirection,
    /// 1-based pin number; defaults to registration order
    #[serde(default)]
    pub pin_number: Option<u32>,
}

impl PortSpec {
    pub fn new(name: impl Into<String>, x: f64, y: f64, facing_direction: FacingDirection) -> Self {
        Self {
            name: name.into(),
            center: Point::new(x, y),
            facing_direction,
            pin_number: None,
        }
    }

    pub fn with_pin_number(mut self, pin_number: u32) -> Self {
        self.pin_number = Some(pin_number);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct PortsBuilder {
    source_component_id: Option<String>,
    schematic_component_id: Option<String>,
    ports: Vec<PortSpec>,
}

impl PortsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_schematic_component(&mut self, schematic_component_id: impl Into<String>) -> &mut Self {
        self.schematic_component_id = Some(schematic_component_id.into());
        self
    }

    pub fn set_source_component(&mut self, source_component_id: impl Into<String>) -> &mut Self {
        self.source_component_id = Some(source_component_id.into());
        self
    }

    /// Register a port. Names are unique per registry.
    pub fn add(&mut self, mut spec: PortSpec) -> Result<&mut Self, BuildError> {
        if self.ports.iter().any(|p| p.name == spec.name) {
            return Err(BuildError::DuplicatePortName {
                owner: self
                    .source_component_id
                    .clone()
                    .unwrap_or_else(|| "unbound component".to_string()),
                name: spec.name,
            });
        }
        if spec.pin_number.is_none() {
            spec.pin_number = Some(self.ports.len() as u32 + 1);
        }
        self.ports.push(spec);
        Ok(self)
    }

    /// Find a port by name or by pin number.
    pub fn get(&self, selector: &PortSelector) -> Option<&PortSpec> {
        match selector {
            PortSelector::Name(name) => self.ports.iter().find(|p| &p.name == name),
            PortSelector::Index(pin) => self.ports.iter().find(|p| p.pin_number == Some(*pin)),
        }
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PortSpec> {
        self.ports.iter()
    }

    /// Emit a `source_port` and a `schematic_port` per registered port, in
    /// registration order.
    pub fn build(&self, ctx: &BuildContext) -> Result<Vec<Element>, BuildError> {
        let source_component_id = self
            .source_component_id
            .as_ref()
            .ok_or_else(|| BuildError::UnboundOwner {
                missing: "source_component".to_string(),
            })?;
        let schematic_component_id = self
            .schematic_component_id
            .as_ref()
            .ok_or_else(|| BuildError::UnboundOwner {
                missing: "schematic_component".to_string(),
            })?;

        let mut elements = Vec::with_capacity(self.ports.len() * 2);
        for port in &self.ports {
            let source_port_id = ctx.get_id("source_port");
            let schematic_port_id = ctx.get_id("schematic_port");
            elements.push(Element::SourcePort(SourcePort {
                source_port_id: source_port_id.clone(),
                source_component_id: source_component_id.clone(),
                name: port.name.clone(),
                pin_number: port.pin_number,
            }));
            elements.push(Element::SchematicPort(SchematicPort {
                schematic_port_id,
                source_port_id,
                schematic_component_id: schematic_component_id.clone(),
                center: port.center,
                facing_direction: port.facing_direction,
            }));
        }
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound() -> PortsBuilder {
        let mut ports = PortsBuilder::new();
        ports
            .set_source_component("source_component_0")
            .set_schematic_component("schematic_component_0");
        ports
    }

    #[test]
    fn test_duplicate_port_name() {
        let mut ports = bound();
        ports
            .add(PortSpec::new("positive", 0.0, -0.5, FacingDirection::Up))
            .unwrap();
        let err = ports
            .add(PortSpec::new("positive", 0.0, 0.5, FacingDirection::Down))
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicatePortName { ref name, .. } if name == "positive"));
        assert_eq!(ports.len(), 1);
    }

    #[test]
    fn test_unbound_owner() {
        let mut ports = PortsBuilder::new();
        ports.set_source_component("source_component_0");
        ports
            .add(PortSpec::new("a", 0.0, 0.0, FacingDirection::Left))
            .unwrap();
        let err = ports.build(&BuildContext::default()).unwrap_err();
        assert!(matches!(err, BuildError::UnboundOwner { ref missing } if missing == "schematic_component"));
    }

    #[test]
    fn test_resolve_by_name_or_pin() {
        let mut ports = bound();
        ports
            .add(PortSpec::new("positive", 0.0, -0.5, FacingDirection::Up))
            .unwrap()
            .add(PortSpec::new("negative", 0.0, 0.5, FacingDirection::Down))
            .unwrap();
        assert_eq!(ports.get(&PortSelector::Index(2)).unwrap().name, "negative");
        assert_eq!(
            ports.get(&PortSelector::Name("positive".into())).unwrap().pin_number,
            Some(1)
        );
        assert!(ports.get(&PortSelector::Index(3)).is_none());
    }

    #[test]
    fn test_build_emits_owner_ids() {
        let mut ports = bound();
        ports
            .add(PortSpec::new("gnd", 0.0, -0.5, FacingDirection::Up))
            .unwrap();
        let elements = ports.build(&BuildContext::default()).unwrap();
        assert_eq!(elements.len(), 2);
        match (&elements[0], &elements[1]) {
            (Element::SourcePort(source), Element::SchematicPort(schematic)) => {
                assert_eq!(source.source_component_id, "source_component_0");
                assert_eq!(schematic.schematic_component_id, "schematic_component_0");
                assert_eq!(schematic.source_port_id, source.source_port_id);
            }
            other => panic!("Unexpected elements: {:?}", other),
        }
    }
}
