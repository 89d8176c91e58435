//! Circuit Document
//!
//! JSON interchange form for circuits (the `.ckt` format) and its resolution
//! into the arena [`Circuit`]. The document references entities by name
//! (`"part.pin"`, `"part.port"`, net names); resolution turns every reference
//! into a typed id and fails fast on anything dangling, so a materialized
//! circuit is structurally sound by construction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Circuit, Joint, NetId, PartId, PartKind, PinId, Polarity, PortId};

/// Errors raised while resolving a document into a circuit.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Duplicate part name: {0}")]
    DuplicatePart(String),

    #[error("Duplicate pin {1} on part {0}")]
    DuplicatePin(String, String),

    #[error("Duplicate port {1} on part {0}")]
    DuplicatePort(String, String),

    #[error("Malformed reference {0:?} (expected \"part.name\")")]
    MalformedRef(String),

    #[error("Unknown pin reference: {0}")]
    UnknownPin(String),

    #[error("Unknown port reference: {0}")]
    UnknownPort(String),

    #[error("Unknown pin {pin} wired to role {role} of port {port}")]
    UnknownWiringPin {
        port: String,
        role: String,
        pin: String,
    },
}

/// Document header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMeta {
    /// Circuit name.
    #[serde(default = "default_doc_name")]
    pub name: String,

    /// Tool that produced the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,

    /// When the document was saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,

    /// Format version for forward compatibility.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
}

fn default_doc_name() -> String {
    "untitled".to_string()
}

fn default_schema_version() -> String {
    "1".to_string()
}

impl Default for DocMeta {
    fn default() -> Self {
        Self {
            name: default_doc_name(),
            tool: None,
            saved_at: None,
            schema_version: default_schema_version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinDoc {
    pub name: String,
    /// Defaults to neutral when omitted.
    #[serde(default)]
    pub polarity: Polarity,
}

/// One role binding under a port. `pin` names a pin of the owning part;
/// `null` (or omitted) declares the role but leaves it unconnected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WiringDoc {
    pub role: String,
    #[serde(default)]
    pub pin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortDoc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default)]
    pub wiring: Vec<WiringDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartDoc {
    pub name: String,
    pub kind: PartKind,
    #[serde(default)]
    pub pins: Vec<PinDoc>,
    #[serde(default)]
    pub ports: Vec<PortDoc>,
}

/// A wire endpoint: `{"pin": "part.pin"}` or `{"net": "name"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointRef {
    Pin(String),
    Net(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDoc {
    pub source: JointRef,
    pub target: JointRef,
}

/// Endpoints are `"part.port"` references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortConnectionDoc {
    pub source: String,
    pub target: String,
}

/// Serialized circuit, as stored in `.ckt` files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CircuitDoc {
    #[serde(default)]
    pub meta: DocMeta,
    #[serde(default)]
    pub parts: Vec<PartDoc>,
    /// Optional pre-declared nets. Duplicate names create distinct net
    /// objects that flatten to one electrical node.
    #[serde(default)]
    pub nets: Vec<String>,
    #[serde(default)]
    pub wires: Vec<WireDoc>,
    #[serde(default)]
    pub port_connections: Vec<PortConnectionDoc>,
}

impl CircuitDoc {
    /// Materialize the arena circuit, failing on the first unresolvable or
    /// duplicate reference.
    pub fn resolve(&self) -> Result<Circuit, ModelError> {
        let mut circuit = Circuit::new(&self.meta.name);
        let mut part_ids: HashMap<String, PartId> = HashMap::new();
        // Qualified "part.pin" / "part.port" names, matching document refs.
        let mut pin_ids: HashMap<String, PinId> = HashMap::new();
        let mut port_ids: HashMap<String, PortId> = HashMap::new();
        let mut net_ids: HashMap<String, NetId> = HashMap::new();

        for part in &self.parts {
            if part_ids.contains_key(&part.name) {
                return Err(ModelError::DuplicatePart(part.name.clone()));
            }
            let part_id = circuit.add_part(&part.name, part.kind.clone());
            part_ids.insert(part.name.clone(), part_id);

            for pin in &part.pins {
                let qualified = format!("{}.{}", part.name, pin.name);
                if pin_ids.contains_key(&qualified) {
                    return Err(ModelError::DuplicatePin(
                        part.name.clone(),
                        pin.name.clone(),
                    ));
                }
                let pin_id = circuit.add_pin(part_id, &pin.name, pin.polarity);
                pin_ids.insert(qualified, pin_id);
            }

            for port in &part.ports {
                let qualified = format!("{}.{}", part.name, port.name);
                if port_ids.contains_key(&qualified) {
                    return Err(ModelError::DuplicatePort(
                        part.name.clone(),
                        port.name.clone(),
                    ));
                }
                let port_id = circuit.add_port(part_id, &port.name, port.protocol.as_deref());
                port_ids.insert(qualified.clone(), port_id);

                for wiring in &port.wiring {
                    let pin = match &wiring.pin {
                        Some(local) => {
                            let pin_ref = format!("{}.{}", part.name, local);
                            let id = pin_ids.get(&pin_ref).copied().ok_or_else(|| {
                                ModelError::UnknownWiringPin {
                                    port: qualified.clone(),
                                    role: wiring.role.clone(),
                                    pin: local.clone(),
                                }
                            })?;
                            Some(id)
                        }
                        None => None,
                    };
                    circuit.add_wiring(port_id, &wiring.role, pin);
                }
            }
        }

        for name in &self.nets {
            let id = circuit.add_net(name);
            // First declaration wins; later duplicates stay as distinct
            // objects reachable only through flattening.
            net_ids.entry(name.clone()).or_insert(id);
        }

        for wire in &self.wires {
            let source = resolve_joint(&mut circuit, &pin_ids, &mut net_ids, &wire.source)?;
            let target = resolve_joint(&mut circuit, &pin_ids, &mut net_ids, &wire.target)?;
            circuit.add_wire(source, target);
        }

        for conn in &self.port_connections {
            let source = lookup_port(&port_ids, &conn.source)?;
            let target = lookup_port(&port_ids, &conn.target)?;
            circuit.connect_ports(source, target);
        }

        let stats = circuit.stats();
        tracing::debug!(
            circuit = circuit.name(),
            parts = stats.parts,
            wires = stats.wires,
            "resolved circuit document"
        );
        Ok(circuit)
    }
}

fn resolve_joint(
    circuit: &mut Circuit,
    pin_ids: &HashMap<String, PinId>,
    net_ids: &mut HashMap<String, NetId>,
    joint: &JointRef,
) -> Result<Joint, ModelError> {
    match joint {
        JointRef::Pin(reference) => {
            if !reference.contains('.') {
                return Err(ModelError::MalformedRef(reference.clone()));
            }
            let id = pin_ids
                .get(reference)
                .copied()
                .ok_or_else(|| ModelError::UnknownPin(reference.clone()))?;
            Ok(Joint::Pin(id))
        }
        JointRef::Net(name) => {
            let id = match net_ids.get(name) {
                Some(&id) => id,
                None => {
                    let id = circuit.add_net(name);
                    net_ids.insert(name.clone(), id);
                    id
                }
            };
            Ok(Joint::Net(id))
        }
    }
}

fn lookup_port(port_ids: &HashMap<String, PortId>, reference: &str) -> Result<PortId, ModelError> {
    if !reference.contains('.') {
        return Err(ModelError::MalformedRef(reference.to_string()));
    }
    port_ids
        .get(reference)
        .copied()
        .ok_or_else(|| ModelError::UnknownPort(reference.to_string()))
}
