//! Graph Query Primitives
//!
//! Pure, read-only lookups over a [`Circuit`], shared by every checker.
//! Lookup misses are answers, not errors: a missing pin counts as zero
//! connections and a missing port as not connected.

use crate::model::{Circuit, Joint, PartId, PinId, PortId, PortWiring};

/// First pin of `part` with the given name.
pub fn find_pin_by_name(circuit: &Circuit, part: PartId, name: &str) -> Option<PinId> {
    circuit
        .part(part)
        .pins()
        .iter()
        .copied()
        .find(|&pin| circuit.pin(pin).name == name)
}

/// First port of `part` with the given name.
pub fn find_port_by_name(circuit: &Circuit, part: PartId, name: &str) -> Option<PortId> {
    circuit
        .part(part)
        .ports()
        .iter()
        .copied()
        .find(|&port| circuit.port(port).name == name)
}

/// True iff no port connection in the circuit has `port` as source or target.
pub fn is_unconnected(circuit: &Circuit, port: PortId) -> bool {
    !circuit
        .connections()
        .iter()
        .any(|conn| conn.source == port || conn.target == port)
}

/// Whether `part` has a port with this name that takes part in at least one
/// port connection. False when no such port exists.
pub fn is_connected(circuit: &Circuit, part: PartId, port_name: &str) -> bool {
    match find_port_by_name(circuit, part, port_name) {
        Some(port) => !is_unconnected(circuit, port),
        None => false,
    }
}

/// Number of wires with the named pin as source or target; zero when the pin
/// does not exist.
pub fn count_pin_conns(circuit: &Circuit, part: PartId, pin_name: &str) -> usize {
    let pin = match find_pin_by_name(circuit, part, pin_name) {
        Some(pin) => pin,
        None => return 0,
    };
    circuit
        .wires()
        .filter(|(_, wire)| wire.source == Joint::Pin(pin) || wire.target == Joint::Pin(pin))
        .count()
}

/// All port wirings owned by `port`, in circuit wiring order.
pub fn wirings_for(circuit: &Circuit, port: PortId) -> Vec<&PortWiring> {
    circuit
        .wirings()
        .iter()
        .filter(|wiring| wiring.port == port)
        .collect()
}
