//! Addable kinds
//!
//! The closed set of kind strings accepted by `add(kind, callback)`, and the
//! per-container tables saying which kinds each container accepts.

use std::fmt;
use std::str::FromStr;

use super::component::{ComponentBuilder, ComponentKind};
use super::{AnyBuilder, BoardBuilder, GroupBuilder, NetBuilder, TraceBuilder, TraceHintBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Addable {
    GenericComponent,
    Component,
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
    Trace,
    Group,
    TraceHint,
    Net,
    Board,
}

/// Kinds a plain group accepts
pub const GROUP_ADDABLES: &[Addable] = &[
    Addable::GenericComponent,
    Addable::Resistor,
    Addable::Capacitor,
    Addable::Diode,
    Addable::PowerSource,
    Addable::Inductor,
    Addable::Ground,
    Addable::Bug,
    Addable::Trace,
    Addable::Group,
];

/// Kinds a board accepts: everything a group does plus board-only kinds
pub const BOARD_ADDABLES: &[Addable] = &[
    Addable::GenericComponent,
    Addable::Component,
    Addable::Resistor,
    Addable::NetAlias,
    Addable::Capacitor,
    Addable::Diode,
    Addable::Led,
    Addable::PowerSource,
    Addable::Inductor,
    Addable::Ground,
    Addable::Bug,
    Addable::Trace,
    Addable::Via,
    Addable::Group,
    Addable::TraceHint,
    Addable::Net,
];

pub const PROJECT_ADDABLES: &[Addable] = &[Addable::Board];

impl Addable {
    pub const ALL: &'static [Addable] = &[
        Addable::GenericComponent,
        Addable::Component,
        Addable::Resistor,
        Addable::Capacitor,
        Addable::Diode,
        Addable::Led,
        Addable::PowerSource,
        Addable::Inductor,
        Addable::Ground,
        Addable::Bug,
        Addable::Via,
        Addable::NetAlias,
        Addable::Trace,
        Addable::Group,
        Addable::TraceHint,
        Addable::Net,
        Addable::Board,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Addable::GenericComponent => "generic_component",
            Addable::Component => "component",
            Addable::Resistor => "resistor",
            Addable::Capacitor => "capacitor",
            Addable::Diode => "diode",
            Addable::Led => "led",
            Addable::PowerSource => "power_source",
            Addable::Inductor => "inductor",
            Addable::Ground => "ground",
            Addable::Bug => "bug",
            Addable::Via => "via",
            Addable::NetAlias => "net_alias",
            Addable::Trace => "trace",
            Addable::Group => "group",
            Addable::TraceHint => "trace_hint",
            Addable::Net => "net",
            Addable::Board => "board",
        }
    }

    /// Construct a fresh, unconfigured builder of this kind.
    pub fn construct(self) -> AnyBuilder {
        let component = |kind| AnyBuilder::Component(ComponentBuilder::new(kind));
        match self {
            Addable::GenericComponent | Addable::Component => component(ComponentKind::Generic),
            Addable::Resistor => component(ComponentKind::Resistor),
            Addable::Capacitor => component(ComponentKind::Capacitor),
            Addable::Diode => component(ComponentKind::Diode),
            Addable::Led => component(ComponentKind::Led),
            Addable::PowerSource => component(ComponentKind::PowerSource),
            Addable::Inductor => component(ComponentKind::Inductor),
            Addable::Ground => component(ComponentKind::Ground),
            Addable::Bug => component(ComponentKind::Bug),
            Addable::Via => component(ComponentKind::Via),
            Addable::NetAlias => component(ComponentKind::NetAlias),
            Addable::Trace => AnyBuilder::Trace(TraceBuilder::new()),
            Addable::Group => AnyBuilder::Group(GroupBuilder::new()),
            Addable::TraceHint => AnyBuilder::TraceHint(TraceHintBuilder::new()),
            Addable::Net => AnyBuilder::Net(NetBuilder::new()),
            Addable::Board => AnyBuilder::Board(BoardBuilder::new()),
        }
    }
}

impl FromStr for Addable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Addable::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for Addable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderType;

    #[test]
    fn test_every_addable_round_trips_its_name() {
        for addable in Addable::ALL {
            assert_eq!(addable.as_str().parse::<Addable>(), Ok(*addable));
        }
        assert!("schematic_line".parse::<Addable>().is_err());
    }

    #[test]
    fn test_every_addable_constructs() {
        for addable in Addable::ALL {
            let builder = addable.construct();
            let ty = builder.builder_type();
            assert!(!ty.is_schematic_primitive(), "{} built a primitive", addable);
            assert!(!ty.is_footprint_primitive(), "{} built a primitive", addable);
        }
    }

    #[test]
    fn test_inductor_is_its_own_kind() {
        let builder = Addable::Inductor.construct();
        assert_eq!(
            builder.builder_type(),
            BuilderType::Component(ComponentKind::Inductor)
        );
    }

    #[test]
    fn test_board_table_is_a_superset_of_group_table() {
        for addable in GROUP_ADDABLES {
            assert!(BOARD_ADDABLES.contains(addable), "board is missing {}", addable);
        }
        assert!(!GROUP_ADDABLES.contains(&Addable::TraceHint));
        assert!(!GROUP_ADDABLES.contains(&Addable::Net));
    }
}
