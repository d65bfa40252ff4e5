//! Group Builder
//!
//! Groups and boards share the same child bookkeeping ([`Children`]) and
//! the same fluent API ([`Container`]). Children are kept in three ordered
//! lists and built in three phases:
//!
//! 1. child groups, fanned out together
//! 2. parts (components, nets, trace hints), fanned out together
//! 3. traces, resolved against everything phases 1 and 2 produced
//!
//! The output is always `groups ++ parts ++ traces`, each in insertion
//! order. Ids are drawn before any await point, so the fan-out never
//! reorders them.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::context::BuildContext;
use crate::core::BuildError;
use crate::elements::Element;

use super::addables::{Addable, GROUP_ADDABLES};
use super::component::{ComponentBuilder, ComponentKind};
use super::{AnyBuilder, Buildable, BuilderType, Endpoint, NetBuilder, TraceBuilder, TraceHintBuilder};

/// Builders that build independently of their siblings.
#[derive(Debug)]
pub enum Part {
    Component(ComponentBuilder),
    Net(NetBuilder),
    TraceHint(TraceHintBuilder),
}

#[async_trait]
impl Buildable for Part {
    fn builder_type(&self) -> BuilderType {
        match self {
            Part::Component(c) => c.builder_type(),
            Part::Net(n) => n.builder_type(),
            Part::TraceHint(h) => h.builder_type(),
        }
    }

    async fn build(&self, ctx: &BuildContext) -> Result<Vec<Element>, BuildError> {
        match self {
            Part::Component(c) => c.build(ctx).await,
            Part::Net(n) => n.build(ctx).await,
            Part::TraceHint(h) => h.build(ctx).await,
        }
    }
}

fn addable_for(kind: ComponentKind) -> Addable {
    match kind {
        ComponentKind::Generic => Addable::GenericComponent,
        ComponentKind::Resistor => Addable::Resistor,
        ComponentKind::Capacitor => Addable::Capacitor,
        ComponentKind::Diode => Addable::Diode,
        ComponentKind::Led => Addable::Led,
        ComponentKind::PowerSource => Addable::PowerSource,
        ComponentKind::Inductor => Addable::Inductor,
        ComponentKind::Ground => Addable::Ground,
        ComponentKind::Bug => Addable::Bug,
        ComponentKind::Via => Addable::Via,
        ComponentKind::NetAlias => Addable::NetAlias,
    }
}

#[derive(Debug, Default)]
pub struct Children {
    groups: Vec<GroupBuilder>,
    parts: Vec<Part>,
    traces: Vec<TraceBuilder>,
}

impl Children {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.parts.is_empty() && self.traces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len() + self.parts.len() + self.traces.len()
    }

    pub fn groups(&self) -> &[GroupBuilder] {
        &self.groups
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn traces(&self) -> &[TraceBuilder] {
        &self.traces
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.parts.clear();
        self.traces.clear();
    }

    pub(crate) fn push_component(
        &mut self,
        kind: ComponentKind,
        configure: impl FnOnce(&mut ComponentBuilder),
    ) {
        let mut component = ComponentBuilder::new(kind);
        configure(&mut component);
        self.parts.push(Part::Component(component));
    }

    /// Route `child` into the right list. Nothing is modified on error.
    fn push(
        &mut self,
        child: AnyBuilder,
        parent: BuilderType,
        addables: &[Addable],
    ) -> Result<(), BuildError> {
        let illegal = |child: &AnyBuilder| BuildError::IllegalChild {
            parent: parent.to_string(),
            child: child.builder_type().to_string(),
        };
        let allowed = |addable: Addable| addables.contains(&addable);

        match child {
            AnyBuilder::Group(g) => self.groups.push(g),
            AnyBuilder::Trace(t) => self.traces.push(t),
            AnyBuilder::Component(c) if allowed(addable_for(c.kind())) => {
                self.parts.push(Part::Component(c))
            }
            AnyBuilder::Net(n) if allowed(Addable::Net) => self.parts.push(Part::Net(n)),
            AnyBuilder::TraceHint(h) if allowed(Addable::TraceHint) => {
                self.parts.push(Part::TraceHint(h))
            }
            other => return Err(illegal(&other)),
        }
        Ok(())
    }

    pub async fn build(&self, ctx: &BuildContext) -> Result<Vec<Element>, BuildError> {
        let groups = try_join_all(self.groups.iter().map(|g| g.build(ctx))).await?;
        let mut elements: Vec<Element> = groups.into_iter().flatten().collect();

        let parts = try_join_all(self.parts.iter().map(|p| p.build(ctx))).await?;
        elements.extend(parts.into_iter().flatten());

        let traces = try_join_all(self.traces.iter().map(|t| t.build(ctx, &elements))).await?;
        elements.extend(traces.into_iter().flatten());

        Ok(elements)
    }
}

/// Fluent child API shared by groups and boards.
pub trait Container {
    /// Name used in `UnknownAddable` messages, e.g. `group`
    fn container_name(&self) -> &'static str;
    fn container_type(&self) -> BuilderType;
    /// Kinds accepted by [`Container::add`]
    fn addables(&self) -> &'static [Addable];
    fn children(&self) -> &Children;
    fn children_mut(&mut self) -> &mut Children;

    /// Add a child by kind string. The callback configures the fresh
    /// builder before it is attached.
    fn add<F>(&mut self, kind: &str, configure: F) -> Result<&mut Self, BuildError>
    where
        F: FnOnce(&mut AnyBuilder),
    {
        let unknown = || BuildError::UnknownAddable {
            container: self.container_name().to_string(),
            kind: kind.to_string(),
        };
        let addable: Addable = kind.parse().map_err(|_| unknown())?;
        if !self.addables().contains(&addable) {
            return Err(unknown());
        }
        let mut child = addable.construct();
        configure(&mut child);
        self.append_child(child)
    }

    /// Attach an already configured builder. Schematic primitives, footprint
    /// primitives, boards and kinds outside this container's table are
    /// rejected, leaving the children unchanged.
    fn append_child(&mut self, child: AnyBuilder) -> Result<&mut Self, BuildError> {
        let parent = self.container_type();
        let addables = self.addables();
        self.children_mut().push(child, parent, addables)?;
        Ok(self)
    }

    fn add_group(&mut self, configure: impl FnOnce(&mut GroupBuilder)) -> &mut Self {
        let mut group = GroupBuilder::new();
        configure(&mut group);
        self.children_mut().groups.push(group);
        self
    }

    /// Add a generic component
    fn add_component(&mut self, configure: impl FnOnce(&mut ComponentBuilder)) -> &mut Self {
        self.children_mut()
            .push_component(ComponentKind::Generic, configure);
        self
    }

    fn add_resistor(&mut self, configure: impl FnOnce(&mut ComponentBuilder)) -> &mut Self {
        self.children_mut()
            .push_component(ComponentKind::Resistor, configure);
        self
    }

    fn add_capacitor(&mut self, configure: impl FnOnce(&mut ComponentBuilder)) -> &mut Self {
        self.children_mut()
            .push_component(ComponentKind::Capacitor, configure);
        self
    }

    fn add_diode(&mut self, configure: impl FnOnce(&mut ComponentBuilder)) -> &mut Self {
        self.children_mut()
            .push_component(ComponentKind::Diode, configure);
        self
    }

    fn add_power_source(&mut self, configure: impl FnOnce(&mut ComponentBuilder)) -> &mut Self {
        self.children_mut()
            .push_component(ComponentKind::PowerSource, configure);
        self
    }

    fn add_inductor(&mut self, configure: impl FnOnce(&mut ComponentBuilder)) -> &mut Self {
        self.children_mut()
            .push_component(ComponentKind::Inductor, configure);
        self
    }

    fn add_ground(&mut self, configure: impl FnOnce(&mut ComponentBuilder)) -> &mut Self {
        self.children_mut()
            .push_component(ComponentKind::Ground, configure);
        self
    }

    fn add_bug(&mut self, configure: impl FnOnce(&mut ComponentBuilder)) -> &mut Self {
        self.children_mut().push_component(ComponentKind::Bug, configure);
        self
    }

    fn add_trace(&mut self, configure: impl FnOnce(&mut TraceBuilder)) -> &mut Self {
        let mut trace = TraceBuilder::new();
        configure(&mut trace);
        self.children_mut().traces.push(trace);
        self
    }

    /// Shorthand for a trace between the given endpoints
    fn connect<I, E>(&mut self, endpoints: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Endpoint>,
    {
        self.add_trace(|t| {
            t.add_connections(endpoints);
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    Empty,
    Accumulating,
    Built,
}

#[derive(Debug, Default)]
pub struct GroupBuilder {
    name: Option<String>,
    children: Children,
    built: AtomicBool,
}

impl GroupBuilder {
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

    pub fn state(&self) -> GroupState {
        if self.built.load(Ordering::SeqCst) {
            GroupState::Built
        } else if self.children.is_empty() {
            GroupState::Empty
        } else {
            GroupState::Accumulating
        }
    }

    /// Drop every child and return to [`GroupState::Empty`].
    pub fn reset(&mut self) -> &mut Self {
        self.children.clear();
        *self.built.get_mut() = false;
        self
    }
}

impl Container for GroupBuilder {
    fn container_name(&self) -> &'static str {
        "group"
    }

    fn container_type(&self) -> BuilderType {
        BuilderType::Group
    }

    fn addables(&self) -> &'static [Addable] {
        GROUP_ADDABLES
    }

    fn children(&self) -> &Children {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Children {
        *self.built.get_mut() = false;
        &mut self.children
    }
}

#[async_trait]
impl Buildable for GroupBuilder {
    fn builder_type(&self) -> BuilderType {
        BuilderType::Group
    }

    async fn build(&self, ctx: &BuildContext) -> Result<Vec<Element>, BuildError> {
        tracing::debug!(
            group = self.name.as_deref().unwrap_or("<unnamed>"),
            children = self.children.len(),
            "Building group"
        );
        let elements = self.children.build(ctx).await?;
        self.built.store(true, Ordering::SeqCst);
        Ok(elements)
    }
}
