//! Gerber Output
//!
//! Converts a built element list into per-layer Gerber (RS-274X) command
//! lists and renders them as text:
//! - `F_Cu` / `B_Cu`: pads, plated holes, vias and traces
//! - `F_SilkScreen`: silkscreen lines
//! - `Edge_Cuts`: the board outline

pub mod apertures;
pub mod builder;
pub mod commands;
pub mod convert;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::elements::LayerRef;

pub use apertures::define_apertures_for_layer;
pub use builder::GerberBuilder;
pub use commands::{ApertureTemplateConfig, GerberCommand, GerberUnit, Polarity};
pub use convert::{convert_elements_to_gerber_commands, stringify_gerber_command_layers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GerberLayerName {
    #[serde(rename = "F_Cu")]
    FCu,
    #[serde(rename = "B_Cu")]
    BCu,
    #[serde(rename = "F_SilkScreen")]
    FSilkScreen,
    #[serde(rename = "Edge_Cuts")]
    EdgeCuts,
}

impl GerberLayerName {
    pub const ALL: [GerberLayerName; 4] = [
        GerberLayerName::FCu,
        GerberLayerName::BCu,
        GerberLayerName::FSilkScreen,
        GerberLayerName::EdgeCuts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GerberLayerName::FCu => "F_Cu",
            GerberLayerName::BCu => "B_Cu",
            GerberLayerName::FSilkScreen => "F_SilkScreen",
            GerberLayerName::EdgeCuts => "Edge_Cuts",
        }
    }

    /// Copper side the layer images, if it is a copper layer
    pub fn copper_layer(&self) -> Option<LayerRef> {
        match self {
            GerberLayerName::FCu => Some(LayerRef::Top),
            GerberLayerName::BCu => Some(LayerRef::Bottom),
            _ => None,
        }
    }

    /// Value of the `.FileFunction` file attribute
    pub fn file_function(&self) -> Vec<String> {
        let parts: &[&str] = match self {
            GerberLayerName::FCu => &["Copper", "L1", "Top"],
            GerberLayerName::BCu => &["Copper", "L2", "Bot"],
            GerberLayerName::FSilkScreen => &["Legend", "Top"],
            GerberLayerName::EdgeCuts => &["Profile", "NP"],
        };
        parts.iter().map(|s| s.to_string()).collect()
    }

    pub fn file_name(&self) -> String {
        format!("{}.gbr", self.as_str())
    }
}

impl fmt::Display for GerberLayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
