//! Connectivity analysis
//!
//! Builds an undirected graph over the ports and nets of a built design:
//! - one node per `source_port` and per `source_net`
//! - edges between the endpoints of each `source_trace`
//! - the port of a net alias joined to the net it names
//!
//! Connected sets of the graph are the design's electrical nets.

use petgraph::algo::has_path_connecting;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::elements::{Element, Ftype};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectivityNode {
    Port {
        source_port_id: String,
        component: String,
        name: String,
    },
    Net {
        /// `None` for a net only ever named by a net alias
        source_net_id: Option<String>,
        name: String,
    },
}

impl fmt::Display for ConnectivityNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityNode::Port {
                component, name, ..
            } => write!(f, "{}.{}", component, name),
            ConnectivityNode::Net { name, .. } => write!(f, "net.{}", name),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectivityMap {
    graph: UnGraph<ConnectivityNode, ()>,
    /// source_port_id -> node
    port_indices: HashMap<String, NodeIndex>,
    /// net name -> node
    net_indices: HashMap<String, NodeIndex>,
    /// source_net_id -> net name
    net_names: HashMap<String, String>,
}

impl ConnectivityMap {
    pub fn from_elements(elements: &[Element]) -> Self {
        let mut map = Self::default();

        let component_names: HashMap<&str, &str> = elements
            .iter()
            .filter_map(Element::as_source_component)
            .map(|c| (c.source_component_id.as_str(), c.name.as_str()))
            .collect();

        // Pass 1: nodes
        for element in elements {
            match element {
                Element::SourcePort(port) => {
                    let component = component_names
                        .get(port.source_component_id.as_str())
                        .copied()
                        .unwrap_or(port.source_component_id.as_str());
                    let idx = map.graph.add_node(ConnectivityNode::Port {
                        source_port_id: port.source_port_id.clone(),
                        component: component.to_string(),
                        name: port.name.clone(),
                    });
                    map.port_indices.insert(port.source_port_id.clone(), idx);
                }
                Element::SourceNet(net) => {
                    map.net_names
                        .insert(net.source_net_id.clone(), net.name.clone());
                    if !map.net_indices.contains_key(&net.name) {
                        let idx = map.graph.add_node(ConnectivityNode::Net {
                            source_net_id: Some(net.source_net_id.clone()),
                            name: net.name.clone(),
                        });
                        map.net_indices.insert(net.name.clone(), idx);
                    }
                }
                _ => {}
            }
        }

        // Pass 2: edges
        for element in elements {
            match element {
                Element::SourceTrace(trace) => {
                    let nodes: Vec<NodeIndex> = trace
                        .connected_source_port_ids
                        .iter()
                        .filter_map(|id| map.port_indices.get(id).copied())
                        .chain(trace.connected_source_net_ids.iter().filter_map(|id| {
                            map.net_names
                                .get(id)
                                .and_then(|name| map.net_indices.get(name))
                                .copied()
                        }))
                        .collect();
                    for pair in nodes.windows(2) {
                        map.graph.add_edge(pair[0], pair[1], ());
                    }
                }
                Element::SourceComponent(c) if c.ftype == Ftype::NetAlias => {
                    if let Some(net) = &c.net {
                        map.join_alias(elements, &c.source_component_id, net);
                    }
                }
                _ => {}
            }
        }

        map
    }

    fn join_alias(&mut self, elements: &[Element], source_component_id: &str, net: &str) {
        let net_idx = match self.net_indices.get(net) {
            Some(idx) => *idx,
            None => {
                let idx = self.graph.add_node(ConnectivityNode::Net {
                    source_net_id: None,
                    name: net.to_string(),
                });
                self.net_indices.insert(net.to_string(), idx);
                idx
            }
        };
        let ports: Vec<NodeIndex> = elements
            .iter()
            .filter_map(Element::as_source_port)
            .filter(|p| p.source_component_id == source_component_id)
            .filter_map(|p| self.port_indices.get(&p.source_port_id).copied())
            .collect();
        for port in ports {
            self.graph.add_edge(port, net_idx, ());
        }
    }

    pub fn port_count(&self) -> usize {
        self.port_indices.len()
    }

    pub fn net_count(&self) -> usize {
        self.net_indices.len()
    }

    /// Source port id of `component`'s port `name`
    pub fn find_port(&self, component: &str, name: &str) -> Option<&str> {
        self.graph.node_weights().find_map(|node| match node {
            ConnectivityNode::Port {
                source_port_id,
                component: c,
                name: n,
            } if c == component && n == name => Some(source_port_id.as_str()),
            _ => None,
        })
    }

    pub fn are_connected(&self, a: &str, b: &str) -> bool {
        match (self.port_indices.get(a), self.port_indices.get(b)) {
            (Some(&a), Some(&b)) => has_path_connecting(&self.graph, a, b, None),
            _ => false,
        }
    }

    /// Name of a net the port is connected to, if any. When several nets
    /// are shorted together the alphabetically first is returned.
    pub fn net_of(&self, source_port_id: &str) -> Option<&str> {
        let port = *self.port_indices.get(source_port_id)?;
        let mut names: Vec<&str> = self
            .net_indices
            .iter()
            .filter(|(_, net)| has_path_connecting(&self.graph, port, **net, None))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names.first().copied()
    }

    /// Every connected set with more than one member, as display labels
    /// (`R1.positive`, `net.GND`). Sorted for stable output.
    pub fn groups(&self) -> Vec<Vec<String>> {
        let mut sets = UnionFind::new(self.graph.node_count());
        for edge in self.graph.raw_edges() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut by_root: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for idx in self.graph.node_indices() {
            by_root
                .entry(sets.find(idx.index()))
                .or_default()
                .push(self.graph[idx].to_string());
        }

        let mut groups: Vec<Vec<String>> = by_root
            .into_values()
            .filter(|members| members.len() > 1)
            .map(|mut members| {
                members.sort();
                members
            })
            .collect();
        groups.sort();
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Container, ProjectBuilder};
    use crate::core::BuildOptions;

    async fn divider() -> Vec<Element> {
        let mut project = ProjectBuilder::new(BuildOptions::default());
        project.add_board(|b| {
            b.set_size(10.0, 10.0).set_center(0.0, 0.0);
            b.add_resistor(|r| {
                r.set_name("R1").set_resistance("10k");
            })
            .add_resistor(|r| {
                r.set_name("R2").set_resistance("10k");
            })
            .add_net_alias(|a| {
                a.set_name("A1").set_net("GND");
            })
            .connect([".R1 > .negative", ".R2 > .positive"])
            .connect([".R2 > .negative", ".A1 > .main"]);
            b.add_net(|n| {
                n.set_name("GND");
            })
            .unwrap();
        });
        project.build().await.unwrap().elements
    }

    #[tokio::test]
    async fn test_trace_connects_ports() {
        let map = ConnectivityMap::from_elements(&divider().await);
        let r1_neg = map.find_port("R1", "negative").unwrap().to_string();
        let r2_pos = map.find_port("R2", "positive").unwrap().to_string();
        let r1_pos = map.find_port("R1", "positive").unwrap().to_string();
        assert!(map.are_connected(&r1_neg, &r2_pos));
        assert!(!map.are_connected(&r1_pos, &r2_pos));
    }

    #[tokio::test]
    async fn test_net_alias_joins_named_net() {
        let map = ConnectivityMap::from_elements(&divider().await);
        let r2_neg = map.find_port("R2", "negative").unwrap();
        assert_eq!(map.net_of(r2_neg), Some("GND"));
        assert_eq!(map.net_count(), 1);
    }

    #[tokio::test]
    async fn test_groups() {
        let map = ConnectivityMap::from_elements(&divider().await);
        let groups = map.groups();
        assert_eq!(groups.len(), 2);
        assert!(groups.contains(&vec!["R1.negative".to_string(), "R2.positive".to_string()]));
        assert!(groups.contains(&vec![
            "A1.main".to_string(),
            "R2.negative".to_string(),
            "net.GND".to_string(),
        ]));
    }
}
