//! Unused port detection.

use crate::checks::{Check, FindingsSink, Severity};
use crate::model::{Circuit, PartKind};
use crate::query::is_unconnected;

/// Warns about ports that take part in no port connection.
///
/// Generic microcontrollers are skipped; their dangling ports are the
/// refinement matcher's business, not a wiring mistake.
pub struct UnusedPortCheck;

impl Check for UnusedPortCheck {
    fn id(&self) -> &str {
        "unused_ports"
    }

    fn name(&self) -> &str {
        "Unused Port Check"
    }

    fn run(&self, circuit: &Circuit, sink: &mut dyn FindingsSink) {
        for (_, part) in circuit.parts() {
            if part.kind == PartKind::GenericMcu {
                continue;
            }
            for &port_id in part.ports() {
                if is_unconnected(circuit, port_id) {
                    sink.report(
                        &circuit.qualified_port_name(port_id),
                        &format!("Port {} is unused", circuit.port(port_id).name),
                        Severity::Warning,
                    );
                }
            }
        }
    }
}
