//! Port connection consistency check.
//!
//! For every port connection, verifies that the two ports agree on a protocol
//! and that both sides declare the same multiset of wiring roles, with every
//! role actually bound to a pin. All findings for a connection are reported;
//! one violation never hides another.

use crate::checks::{Check, FindingsSink, Severity};
use crate::model::Circuit;
use crate::query::wirings_for;

/// Checks protocol agreement and role completeness across port connections.
pub struct PortConnectionCheck;

impl Check for PortConnectionCheck {
    fn id(&self) -> &str {
        "port_connections"
    }

    fn name(&self) -> &str {
        "Port Connection Check"
    }

    fn run(&self, circuit: &Circuit, sink: &mut dyn FindingsSink) {
        for conn in circuit.connections() {
            let src = circuit.port(conn.source);
            let tgt = circuit.port(conn.target);

            // Protocol agreement. A connection where both ports leave the
            // protocol unset passes silently.
            match (&src.protocol, &tgt.protocol) {
                (Some(sp), Some(tp)) => {
                    if sp != tp {
                        sink.report(
                            &format!("{}->{}", src.name, tgt.name),
                            &format!("Protocol mismatch: {} vs {}", sp, tp),
                            Severity::Error,
                        );
                    }
                }
                (None, Some(_)) => {
                    sink.report(
                        &circuit.qualified_port_name(conn.source),
                        "Protocol must not be null",
                        Severity::Error,
                    );
                }
                (Some(_), None) => {
                    sink.report(
                        &circuit.qualified_port_name(conn.target),
                        "Protocol must not be null",
                        Severity::Error,
                    );
                }
                (None, None) => {}
            }

            // Role consistency. Collect the source side's role multiset, then
            // remove one occurrence per matching target role; whatever is left
            // exists on the source side only. A role on the target side with
            // no source counterpart is not flagged here.
            let mut roles: Vec<&str> = Vec::new();
            for wiring in wirings_for(circuit, conn.source) {
                if wiring.pin.is_none() {
                    sink.report(
                        &format!("{}::{}", circuit.qualified_port_name(conn.source), wiring.role),
                        &format!(
                            "Role {} on port {} must be connected to a pin",
                            wiring.role, src.name
                        ),
                        Severity::Error,
                    );
                }
                roles.push(wiring.role.as_str());
            }
            for wiring in wirings_for(circuit, conn.target) {
                if wiring.pin.is_none() {
                    sink.report(
                        &format!("{}::{}", circuit.qualified_port_name(conn.target), wiring.role),
                        &format!(
                            "Role {} on port {} must be connected to a pin",
                            wiring.role, tgt.name
                        ),
                        Severity::Error,
                    );
                }
                if let Some(pos) = roles.iter().position(|role| *role == wiring.role) {
                    roles.remove(pos);
                }
            }
            for role in roles {
                sink.report(
                    &format!("{}::{}", circuit.qualified_port_name(conn.source), role),
                    &format!("Role {} must also be declared on opposite port", role),
                    Severity::Error,
                );
            }
        }
    }
}
