//! Circuit Model
//!
//! Arena-style schematic model: the [`Circuit`] owns every entity (parts,
//! pins, ports, nets, wires, port connections, port wirings) in flat storage,
//! and entities reference each other through typed index ids. Navigation
//! against the ownership direction (pin to owning part) goes through a stored
//! back-id resolved on the circuit, never through a container pointer.
//!
//! Ids are only meaningful for the circuit that minted them.

pub mod doc;

use serde::{Deserialize, Serialize};

pub use doc::{CircuitDoc, ModelError};

/// Polarity of a pin terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl Default for Polarity {
    fn default() -> Self {
        Polarity::Neutral
    }
}

impl Polarity {
    /// True for positive or negative pins.
    pub fn is_polarized(self) -> bool {
        !matches!(self, Polarity::Neutral)
    }

    /// True when both sides are polarized and the polarities differ.
    pub fn opposes(self, other: Polarity) -> bool {
        self.is_polarized() && other.is_polarized() && self != other
    }
}

/// Closed set of part kinds the checkers dispatch on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Led,
    RgLed,
    ElectrolyticCap,
    Resistor,
    Button,
    Switch,
    GenericMcu,
    /// A concrete microcontroller model, e.g. `"ATTiny2313"`.
    Mcu(String),
    PowerSupply,
    Other,
}

impl PartKind {
    /// Parts whose polarized pins the polarity detector guards. Power
    /// supplies are excluded so ordinary series battery wiring is not
    /// flagged.
    pub fn is_polarity_sensitive(&self) -> bool {
        matches!(
            self,
            PartKind::Led
                | PartKind::RgLed
                | PartKind::ElectrolyticCap
                | PartKind::GenericMcu
                | PartKind::Mcu(_)
        )
    }

    /// Two-pin parts that polarity reasoning can see through: a resistor,
    /// push-button or SPST switch between two points does not change the
    /// logical polarity relationship.
    pub fn is_serial_impedance(&self) -> bool {
        matches!(
            self,
            PartKind::Resistor | PartKind::Button | PartKind::Switch
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(u32);

/// Either endpoint of a wire: a concrete pin or a named net reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    Pin(PinId),
    Net(NetId),
}

/// A component instance.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub kind: PartKind,
    pins: Vec<PinId>,
    ports: Vec<PortId>,
}

impl Part {
    /// Pins in declaration order.
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    /// Ports in declaration order.
    pub fn ports(&self) -> &[PortId] {
        &self.ports
    }
}

/// A named, polarized terminal of a part.
#[derive(Debug, Clone)]
pub struct Pin {
    pub name: String,
    pub polarity: Polarity,
    part: PartId,
}

impl Pin {
    /// Owning part.
    pub fn part(&self) -> PartId {
        self.part
    }
}

/// A named, protocol-typed connection group on a part.
#[derive(Debug, Clone)]
pub struct Port {
    pub name: String,
    pub protocol: Option<String>,
    part: PartId,
}

impl Port {
    /// Owning part.
    pub fn part(&self) -> PartId {
        self.part
    }
}

/// A named logical connection point. Distinct nets sharing a name denote the
/// same electrical node.
#[derive(Debug, Clone)]
pub struct Net {
    pub name: String,
}

/// A wire between two joints.
#[derive(Debug, Clone)]
pub struct Wire {
    pub source: Joint,
    pub target: Joint,
}

/// A bus-level link between two ports, possibly on different parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConnection {
    pub source: PortId,
    pub target: PortId,
}

/// Binds one role of a port to a pin of the owning part. A wiring whose pin
/// is `None` declares the role but leaves it unconnected.
#[derive(Debug, Clone)]
pub struct PortWiring {
    pub port: PortId,
    pub role: String,
    pub pin: Option<PinId>,
}

/// Entity counts for one circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CircuitStats {
    pub parts: usize,
    pub pins: usize,
    pub ports: usize,
    pub nets: usize,
    pub wires: usize,
    pub port_connections: usize,
}

/// The schematic model one analysis run operates on.
///
/// Built either programmatically through the `add_*` methods or by resolving
/// a [`doc::CircuitDoc`]. Immutable for the duration of a run; the checkers
/// only read it.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    name: String,
    parts: Vec<Part>,
    pins: Vec<Pin>,
    ports: Vec<Port>,
    nets: Vec<Net>,
    wires: Vec<Wire>,
    connections: Vec<PortConnection>,
    wirings: Vec<PortWiring>,
}

impl Circuit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_part(&mut self, name: impl Into<String>, kind: PartKind) -> PartId {
        let id = PartId(self.parts.len() as u32);
        self.parts.push(Part {
            name: name.into(),
            kind,
            pins: Vec::new(),
            ports: Vec::new(),
        });
        id
    }

    pub fn add_pin(
        &mut self,
        part: PartId,
        name: impl Into<String>,
        polarity: Polarity,
    ) -> PinId {
        let id = PinId(self.pins.len() as u32);
        self.pins.push(Pin {
            name: name.into(),
            polarity,
            part,
        });
        self.parts[part.0 as usize].pins.push(id);
        id
    }

    pub fn add_port(
        &mut self,
        part: PartId,
        name: impl Into<String>,
        protocol: Option<&str>,
    ) -> PortId {
        let id = PortId(self.ports.len() as u32);
        self.ports.push(Port {
            name: name.into(),
            protocol: protocol.map(str::to_owned),
            part,
        });
        self.parts[part.0 as usize].ports.push(id);
        id
    }

    pub fn add_net(&mut self, name: impl Into<String>) -> NetId {
        let id = NetId(self.nets.len() as u32);
        self.nets.push(Net { name: name.into() });
        id
    }

    pub fn add_wire(&mut self, source: Joint, target: Joint) -> WireId {
        let id = WireId(self.wires.len() as u32);
        self.wires.push(Wire { source, target });
        id
    }

    pub fn connect_ports(&mut self, source: PortId, target: PortId) {
        self.connections.push(PortConnection { source, target });
    }

    pub fn add_wiring(&mut self, port: PortId, role: impl Into<String>, pin: Option<PinId>) {
        self.wirings.push(PortWiring {
            port,
            role: role.into(),
            pin,
        });
    }

    pub fn part(&self, id: PartId) -> &Part {
        &self.parts[id.0 as usize]
    }

    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.0 as usize]
    }

    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id.0 as usize]
    }

    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.0 as usize]
    }

    pub fn wire(&self, id: WireId) -> &Wire {
        &self.wires[id.0 as usize]
    }

    pub fn parts(&self) -> impl Iterator<Item = (PartId, &Part)> + '_ {
        self.parts
            .iter()
            .enumerate()
            .map(|(i, p)| (PartId(i as u32), p))
    }

    pub fn pins(&self) -> impl Iterator<Item = (PinId, &Pin)> + '_ {
        self.pins
            .iter()
            .enumerate()
            .map(|(i, p)| (PinId(i as u32), p))
    }

    pub fn nets(&self) -> impl Iterator<Item = (NetId, &Net)> + '_ {
        self.nets
            .iter()
            .enumerate()
            .map(|(i, n)| (NetId(i as u32), n))
    }

    /// Wires in insertion order, which is the circuit's wire order.
    pub fn wires(&self) -> impl Iterator<Item = (WireId, &Wire)> + '_ {
        self.wires
            .iter()
            .enumerate()
            .map(|(i, w)| (WireId(i as u32), w))
    }

    /// Port connections in insertion order.
    pub fn connections(&self) -> &[PortConnection] {
        &self.connections
    }

    /// Port wirings in insertion order, which is the circuit's wiring order.
    pub fn wirings(&self) -> &[PortWiring] {
        &self.wirings
    }

    /// First part with the given name.
    pub fn find_part(&self, name: &str) -> Option<PartId> {
        self.parts().find(|(_, p)| p.name == name).map(|(id, _)| id)
    }

    /// `part.pin` form used in finding locations.
    pub fn qualified_pin_name(&self, pin: PinId) -> String {
        let pin = self.pin(pin);
        format!("{}.{}", self.part(pin.part).name, pin.name)
    }

    /// `part.port` form used in finding locations.
    pub fn qualified_port_name(&self, port: PortId) -> String {
        let port = self.port(port);
        format!("{}.{}", self.part(port.part).name, port.name)
    }

    pub fn stats(&self) -> CircuitStats {
        CircuitStats {
            parts: self.parts.len(),
            pins: self.pins.len(),
            ports: self.ports.len(),
            nets: self.nets.len(),
            wires: self.wires.len(),
            port_connections: self.connections.len(),
        }
    }
}
