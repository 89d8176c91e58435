//! Wire-level connectivity graph.
//!
//! An undirected petgraph view over a circuit snapshot with one node per pin
//! and one node per distinct net name. Nets declared more than once under the
//! same name collapse into a single node, so reachability treats them as one
//! electrical net. Edges carry the originating wire id and neighbour queries
//! come back in wire insertion order.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::model::{Circuit, Joint, PinId, WireId};

/// Node payload of the connectivity graph.
#[derive(Debug, Clone, PartialEq, Eq)]
enum GraphNode {
    Pin(PinId),
    Net(String),
}

/// Undirected pin/net connectivity view over a circuit snapshot.
#[derive(Debug, Clone)]
pub struct CircuitGraph {
    graph: UnGraph<GraphNode, WireId>,
    pin_nodes: HashMap<PinId, NodeIndex>,
    net_nodes: HashMap<String, NodeIndex>,
}

impl CircuitGraph {
    /// Build the connectivity graph for `circuit`.
    pub fn build(circuit: &Circuit) -> Self {
        let mut graph = UnGraph::default();
        let mut pin_nodes = HashMap::new();
        let mut net_nodes: HashMap<String, NodeIndex> = HashMap::new();

        // Pass 1: one node per pin, one per distinct net name.
        for (pin_id, _) in circuit.pins() {
            let idx = graph.add_node(GraphNode::Pin(pin_id));
            pin_nodes.insert(pin_id, idx);
        }
        for (_, net) in circuit.nets() {
            net_nodes
                .entry(net.name.clone())
                .or_insert_with(|| graph.add_node(GraphNode::Net(net.name.clone())));
        }

        // Pass 2: one edge per wire, weighted by the wire id.
        for (wire_id, wire) in circuit.wires() {
            let source = joint_node(circuit, &pin_nodes, &net_nodes, wire.source);
            let target = joint_node(circuit, &pin_nodes, &net_nodes, wire.target);
            if let (Some(source), Some(target)) = (source, target) {
                graph.add_edge(source, target, wire_id);
            }
        }

        Self {
            graph,
            pin_nodes,
            net_nodes,
        }
    }

    /// Pins reachable from `pin` across a single wire, in wire insertion
    /// order. A pin wired to the same neighbour twice reports it twice, and a
    /// self-loop wire reports the pin itself once.
    pub fn wired_pins(&self, pin: PinId) -> Vec<PinId> {
        let Some(&idx) = self.pin_nodes.get(&pin) else {
            return Vec::new();
        };
        self.neighbour_pins(idx)
    }

    /// Pins wired directly to any net with the given name, in wire insertion
    /// order.
    pub fn pins_on_net(&self, net_name: &str) -> Vec<PinId> {
        let Some(&idx) = self.net_nodes.get(net_name) else {
            return Vec::new();
        };
        self.neighbour_pins(idx)
    }

    /// Number of graph nodes (pins plus distinct net names).
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of graph edges (wires with resolvable endpoints).
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn neighbour_pins(&self, idx: NodeIndex) -> Vec<PinId> {
        // petgraph walks incident edges most-recent first; sort by wire id to
        // restore insertion order.
        let mut hits: Vec<(WireId, PinId)> = self
            .graph
            .edges(idx)
            .filter_map(|edge| {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                match self.graph.node_weight(other) {
                    Some(GraphNode::Pin(pin)) => Some((*edge.weight(), *pin)),
                    _ => None,
                }
            })
            .collect();
        hits.sort_by_key(|&(wire, _)| wire);
        hits.into_iter().map(|(_, pin)| pin).collect()
    }
}

fn joint_node(
    circuit: &Circuit,
    pin_nodes: &HashMap<PinId, NodeIndex>,
    net_nodes: &HashMap<String, NodeIndex>,
    joint: Joint,
) -> Option<NodeIndex> {
    match joint {
        Joint::Pin(pin) => pin_nodes.get(&pin).copied(),
        Joint::Net(net) => net_nodes.get(&circuit.net(net).name).copied(),
    }
}
