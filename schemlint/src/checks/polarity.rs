//! Polarity hazard detection.
//!
//! Flags wires through which a polarity-sensitive part's polarized pin may
//! reach a pin of the opposite polarity: directly, through one transparent
//! serial-impedance part (resistor, button, switch), or through a flattened
//! named net. Reachability is deliberately one hop deep; chains of resistors
//! or nets bridged by further nets are a documented limitation.

use crate::checks::{Check, FindingsSink, Severity};
use crate::graph::CircuitGraph;
use crate::model::{Circuit, Joint, PinId};

/// Flags possible reversed-polarity connections on polarity-sensitive parts.
pub struct PolarityCheck;

impl Check for PolarityCheck {
    fn id(&self) -> &str {
        "polarity"
    }

    fn name(&self) -> &str {
        "Polarity Hazard Check"
    }

    fn run(&self, circuit: &Circuit, sink: &mut dyn FindingsSink) {
        let graph = CircuitGraph::build(circuit);

        for (_, wire) in circuit.wires() {
            for (this, other) in [(wire.source, wire.target), (wire.target, wire.source)] {
                let Joint::Pin(pin_id) = this else {
                    continue;
                };
                let pin = circuit.pin(pin_id);
                if !pin.polarity.is_polarized() {
                    continue;
                }
                // Power supplies are exempt as subjects so that ordinary
                // series battery wiring is not flagged.
                if !circuit.part(pin.part()).kind.is_polarity_sensitive() {
                    continue;
                }

                match other {
                    Joint::Pin(other_id) => {
                        let other_pin = circuit.pin(other_id);
                        if other_pin.polarity.is_polarized() {
                            // Direct opposite-polarity connection.
                            if other_pin.polarity.opposes(pin.polarity) {
                                flag(circuit, sink, pin_id, &circuit.qualified_pin_name(other_id));
                            }
                        } else if circuit.part(other_pin.part()).kind.is_serial_impedance() {
                            // See through the serial-impedance part: check the
                            // pins beyond its other pin, and the pins sharing
                            // its near pin. The two scans run independently.
                            let target = circuit.qualified_pin_name(other_id);
                            if let Some(transitive) = transitive_pin(circuit, other_id) {
                                for candidate in graph.wired_pins(transitive) {
                                    if circuit.pin(candidate).polarity.opposes(pin.polarity) {
                                        flag(circuit, sink, pin_id, &target);
                                    }
                                }
                            }
                            for candidate in graph.wired_pins(other_id) {
                                if circuit.pin(candidate).polarity.opposes(pin.polarity) {
                                    flag(circuit, sink, pin_id, &target);
                                }
                            }
                        }
                    }
                    Joint::Net(net_id) => {
                        // Every pin on the flattened net, except the subject
                        // pin itself.
                        let net_name = &circuit.net(net_id).name;
                        for candidate in graph.pins_on_net(net_name) {
                            if candidate == pin_id {
                                continue;
                            }
                            if circuit.pin(candidate).polarity.opposes(pin.polarity) {
                                flag(circuit, sink, pin_id, net_name);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The first pin of `pin`'s part that is not `pin` itself.
fn transitive_pin(circuit: &Circuit, pin: PinId) -> Option<PinId> {
    circuit
        .part(circuit.pin(pin).part())
        .pins()
        .iter()
        .copied()
        .find(|&candidate| candidate != pin)
}

fn flag(circuit: &Circuit, sink: &mut dyn FindingsSink, pin: PinId, target: &str) {
    sink.report(
        &format!("{}->{}", circuit.qualified_pin_name(pin), target),
        &format!("Possible polarity issue with {}", circuit.pin(pin).name),
        Severity::Warning,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::FindingLog;
    use crate::model::{PartId, PartKind, Polarity};

    fn run_check(circuit: &Circuit) -> FindingLog {
        let check = PolarityCheck;
        let mut log = FindingLog::new(check.id());
        check.run(circuit, &mut log);
        log
    }

    fn led(circuit: &mut Circuit, name: &str) -> (PartId, PinId, PinId) {
        let part = circuit.add_part(name, PartKind::Led);
        let anode = circuit.add_pin(part, "anode", Polarity::Positive);
        let cathode = circuit.add_pin(part, "cathode", Polarity::Negative);
        (part, anode, cathode)
    }

    fn resistor(circuit: &mut Circuit, name: &str) -> (PinId, PinId) {
        let part = circuit.add_part(name, PartKind::Resistor);
        let a = circuit.add_pin(part, "a", Polarity::Neutral);
        let b = circuit.add_pin(part, "b", Polarity::Neutral);
        (a, b)
    }

    #[test]
    fn test_direct_opposite_connection_flags_both_subjects() {
        let mut circuit = Circuit::new("p");
        let (_, anode, _) = led(&mut circuit, "led1");
        let (_, _, cathode) = led(&mut circuit, "led2");
        circuit.add_wire(Joint::Pin(anode), Joint::Pin(cathode));

        let log = run_check(&circuit);
        let locations: Vec<&str> = log.findings().iter().map(|f| f.location.as_str()).collect();
        assert_eq!(
            locations,
            vec!["led1.anode->led2.cathode", "led2.cathode->led1.anode"]
        );
        assert!(log
            .findings()
            .iter()
            .all(|f| f.severity == Severity::Warning));
        assert_eq!(log.findings()[0].message, "Possible polarity issue with anode");
    }

    #[test]
    fn test_same_polarity_through_resistor_passes() {
        let mut circuit = Circuit::new("p");
        let (_, anode1, _) = led(&mut circuit, "led1");
        let (_, anode2, _) = led(&mut circuit, "led2");
        let (ra, rb) = resistor(&mut circuit, "r1");
        circuit.add_wire(Joint::Pin(anode1), Joint::Pin(ra));
        circuit.add_wire(Joint::Pin(rb), Joint::Pin(anode2));

        assert!(run_check(&circuit).is_empty());
    }

    #[test]
    fn test_opposite_polarity_through_resistor_flags() {
        let mut circuit = Circuit::new("p");
        let (_, anode, _) = led(&mut circuit, "led1");
        let (_, _, cathode) = led(&mut circuit, "led2");
        let (ra, rb) = resistor(&mut circuit, "r1");
        circuit.add_wire(Joint::Pin(anode), Joint::Pin(ra));
        circuit.add_wire(Joint::Pin(rb), Joint::Pin(cathode));

        let log = run_check(&circuit);
        let locations: Vec<&str> = log.findings().iter().map(|f| f.location.as_str()).collect();
        // led1 sees led2.cathode beyond r1.a's transitive pin; led2 sees
        // led1.anode beyond r1.b's transitive pin.
        assert_eq!(locations, vec!["led1.anode->r1.a", "led2.cathode->r1.b"]);
    }

    #[test]
    fn test_opposite_pin_sharing_the_near_resistor_pin_flags() {
        let mut circuit = Circuit::new("p");
        let (_, anode, _) = led(&mut circuit, "led1");
        let (_, _, cathode) = led(&mut circuit, "led2");
        let (ra, _) = resistor(&mut circuit, "r1");
        circuit.add_wire(Joint::Pin(anode), Joint::Pin(ra));
        circuit.add_wire(Joint::Pin(cathode), Joint::Pin(ra));

        let log = run_check(&circuit);
        let locations: Vec<&str> = log.findings().iter().map(|f| f.location.as_str()).collect();
        assert_eq!(locations, vec!["led1.anode->r1.a", "led2.cathode->r1.a"]);
    }

    #[test]
    fn test_flattened_net_flags_subject_but_not_power_supply() {
        let mut circuit = Circuit::new("p");
        let (_, anode, _) = led(&mut circuit, "led1");
        let psu = circuit.add_part("bat1", PartKind::PowerSupply);
        let neg = circuit.add_pin(psu, "neg", Polarity::Negative);
        // Two distinct net objects sharing one name act as one logical net.
        let gnd1 = circuit.add_net("GND");
        let gnd2 = circuit.add_net("GND");
        circuit.add_wire(Joint::Pin(anode), Joint::Net(gnd1));
        circuit.add_wire(Joint::Pin(neg), Joint::Net(gnd2));

        let log = run_check(&circuit);
        assert_eq!(log.len(), 1);
        let finding = &log.findings()[0];
        assert_eq!(finding.location, "led1.anode->GND");
        assert_eq!(finding.message, "Possible polarity issue with anode");
    }

    #[test]
    fn test_concrete_mcu_is_polarity_sensitive() {
        let mut circuit = Circuit::new("p");
        let mcu = circuit.add_part("u1", PartKind::Mcu("ATTiny85".to_string()));
        let vcc = circuit.add_pin(mcu, "vcc", Polarity::Positive);
        let (_, _, cathode) = led(&mut circuit, "led1");
        circuit.add_wire(Joint::Pin(vcc), Joint::Pin(cathode));

        let log = run_check(&circuit);
        let locations: Vec<&str> = log.findings().iter().map(|f| f.location.as_str()).collect();
        assert_eq!(locations, vec!["u1.vcc->led1.cathode", "led1.cathode->u1.vcc"]);
    }

    #[test]
    fn test_neutral_pins_are_ignored() {
        let mut circuit = Circuit::new("p");
        let (ra, _) = resistor(&mut circuit, "r1");
        let (rb, _) = resistor(&mut circuit, "r2");
        circuit.add_wire(Joint::Pin(ra), Joint::Pin(rb));

        assert!(run_check(&circuit).is_empty());
    }

    #[test]
    fn test_check_is_idempotent() {
        let mut circuit = Circuit::new("p");
        let (_, anode, _) = led(&mut circuit, "led1");
        let (_, _, cathode) = led(&mut circuit, "led2");
        circuit.add_wire(Joint::Pin(anode), Joint::Pin(cathode));

        let first = run_check(&circuit).into_findings();
        let second = run_check(&circuit).into_findings();
        assert_eq!(first, second);
    }
}
