//! Trace hints (board-only)
//!
//! A hint names a port by selector and lists waypoint offsets relative to
//! it. The hint itself is emitted unresolved; traces look hints up among
//! their siblings when they route.

use async_trait::async_trait;

use crate::context::BuildContext;
use crate::core::BuildError;
use crate::elements::{Element, PcbTraceHint};
use crate::units::{Length, LengthPoint};

use super::selector::Target;
use super::{Buildable, BuilderType};

#[derive(Debug, Clone, Default)]
pub struct TraceHintBuilder {
    for_port: Option<String>,
    offsets: Vec<LengthPoint>,
}

impl TraceHintBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_for_port(&mut self, selector: impl Into<String>) -> &mut Self {
        self.for_port = Some(selector.into());
        self
    }

    pub fn add_offset(&mut self, x: impl Into<Length>, y: impl Into<Length>) -> &mut Self {
        self.offsets.push(LengthPoint::new(x, y));
        self
    }

    pub fn set_offsets(&mut self, offsets: Vec<LengthPoint>) -> &mut Self {
        self.offsets = offsets;
        self
    }
}

#[async_trait]
impl Buildable for TraceHintBuilder {
    fn builder_type(&self) -> BuilderType {
        BuilderType::TraceHint
    }

    async fn build(&self, ctx: &BuildContext) -> Result<Vec<Element>, BuildError> {
        let for_port = self
            .for_port
            .clone()
            .ok_or_else(|| BuildError::missing("trace_hint", "for_port"))?;
        if let Target::Net { .. } = for_port.parse::<Target>()? {
            return Err(BuildError::InvalidSelector(for_port));
        }
        let offsets = self
            .offsets
            .iter()
            .map(|o| ctx.units.convert_point(o))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(vec![Element::PcbTraceHint(PcbTraceHint {
            pcb_trace_hint_id: ctx.get_id("pcb_trace_hint"),
            for_port,
            offsets,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Point;

    #[tokio::test]
    async fn test_hint_keeps_selector_and_converts_offsets() {
        let mut hint = TraceHintBuilder::new();
        hint.set_for_port(".R1 > .positive").add_offset("1cm", 0.0);
        let elements = hint.build(&BuildContext::default()).await.unwrap();
        let built = elements[0].as_pcb_trace_hint().unwrap();
        assert_eq!(built.for_port, ".R1 > .positive");
        assert_eq!(built.offsets, vec![Point::new(10.0, 0.0)]);
    }

    #[tokio::test]
    async fn test_hint_rejects_net_selector() {
        let mut hint = TraceHintBuilder::new();
        hint.set_for_port("net.GND");
        assert!(matches!(
            hint.build(&BuildContext::default()).await,
            Err(BuildError::InvalidSelector(_))
        ));
    }

    #[tokio::test]
    async fn test_hint_requires_port() {
        let err = TraceHintBuilder::new()
            .build(&BuildContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingRequiredProperty { .. }));
    }
}
