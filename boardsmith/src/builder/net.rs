//! Named nets (board-only)

use async_trait::async_trait;

use crate::context::BuildContext;
use crate::core::BuildError;
use crate::elements::{Element, SourceNet};

use super::{Buildable, BuilderType};

const GROUND_NAMES: &[&str] = &["GND", "AGND", "DGND", "VSS", "0V"];
const POWER_PREFIXES: &[&str] = &["VCC", "VDD", "VIN", "VBAT", "VBUS", "V+", "+"];

#[derive(Debug, Clone, Default)]
pub struct NetBuilder {
    name: Option<String>,
    is_power: Option<bool>,
    is_ground: Option<bool>,
}

impl NetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_is_power(&mut self, is_power: bool) -> &mut Self {
        self.is_power = Some(is_power);
        self
    }

    pub fn set_is_ground(&mut self, is_ground: bool) -> &mut Self {
        self.is_ground = Some(is_ground);
        self
    }
}

fn looks_like_ground(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    GROUND_NAMES.contains(&upper.as_str())
}

/// `VCC`, `VDD_3V3`, `+5V`, `3V3`, `12V`
fn looks_like_power(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    if POWER_PREFIXES.iter().any(|p| upper.starts_with(p)) {
        return true;
    }
    let digits = upper.trim_start_matches(|c: char| c.is_ascii_digit());
    digits.len() < upper.len() && digits.starts_with('V')
}

#[async_trait]
impl Buildable for NetBuilder {
    fn builder_type(&self) -> BuilderType {
        BuilderType::Net
    }

    async fn build(&self, ctx: &BuildContext) -> Result<Vec<Element>, BuildError> {
        let name = self
            .name
            .clone()
            .ok_or_else(|| BuildError::missing("net", "name"))?;
        let is_ground = self.is_ground.unwrap_or_else(|| looks_like_ground(&name));
        let is_power = self
            .is_power
            .unwrap_or_else(|| !is_ground && looks_like_power(&name));
        Ok(vec![Element::SourceNet(SourceNet {
            source_net_id: ctx.get_id("source_net"),
            name,
            is_power,
            is_ground,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn build_net(name: &str) -> SourceNet {
        let mut net = NetBuilder::new();
        net.set_name(name);
        let elements = net.build(&BuildContext::default()).await.unwrap();
        elements[0].as_source_net().unwrap().clone()
    }

    #[tokio::test]
    async fn test_inferred_flags() {
        let gnd = build_net("GND").await;
        assert!(gnd.is_ground && !gnd.is_power);
        assert!(build_net("VCC").await.is_power);
        assert!(build_net("3V3").await.is_power);
        assert!(build_net("+5V").await.is_power);
        let signal = build_net("SDA").await;
        assert!(!signal.is_ground && !signal.is_power);
    }

    #[tokio::test]
    async fn test_explicit_flags_win() {
        let mut net = NetBuilder::new();
        net.set_name("RETURN").set_is_ground(true);
        let elements = net.build(&BuildContext::default()).await.unwrap();
        assert!(elements[0].as_source_net().unwrap().is_ground);
    }

    #[tokio::test]
    async fn test_name_is_required() {
        let err = NetBuilder::new()
            .build(&BuildContext::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "<net /> \"name\" is not set");
    }
}
