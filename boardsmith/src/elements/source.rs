//! Source-domain elements: the logical/electrical view of a design.

use serde::{Deserialize, Serialize};

/// Functional type of a source component. Fixed by the component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ftype {
    SimpleComponent,
    SimpleResistor,
    SimpleCapacitor,
    SimpleDiode,
    SimpleLed,
    SimplePowerSource,
    SimpleInductor,
    SimpleGround,
    SimpleBug,
    SimpleVia,
    NetAlias,
}

impl std::fmt::Display for Ftype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Ftype::SimpleComponent => "simple_component",
            Ftype::SimpleResistor => "simple_resistor",
            Ftype::SimpleCapacitor => "simple_capacitor",
            Ftype::SimpleDiode => "simple_diode",
            Ftype::SimpleLed => "simple_led",
            Ftype::SimplePowerSource => "simple_power_source",
            Ftype::SimpleInductor => "simple_inductor",
            Ftype::SimpleGround => "simple_ground",
            Ftype::SimpleBug => "simple_bug",
            Ftype::SimpleVia => "simple_via",
            Ftype::NetAlias => "net_alias",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceComponent {
    pub source_component_id: String,
    pub ftype: Ftype,
    pub name: String,
    /// Ohms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
    /// Farads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacitance: Option<f64>,
    /// Henries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inductance: Option<f64>,
    /// Volts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    /// Net name a net alias attaches to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_part_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePort {
    pub source_port_id: String,
    pub source_component_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_number: Option<u32>,
}

/// Logical connectivity between ports and nets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTrace {
    pub source_trace_id: String,
    pub connected_source_port_ids: Vec<String>,
    pub connected_source_net_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceNet {
    pub source_net_id: String,
    pub name: String,
    pub is_power: bool,
    pub is_ground: bool,
}
