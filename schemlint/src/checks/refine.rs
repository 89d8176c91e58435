//! Generic microcontroller refinement.
//!
//! Generic microcontroller parts follow a modelling convention: their pin
//! usage is expressed through pins named `digitalPin` / `analogPin` and their
//! protocol usage through ports named after the protocol. The matcher turns
//! that usage into a capability requirement and ranks a fixed catalog of
//! concrete models against it.

use serde::{Deserialize, Serialize};

use crate::catalog::{builtin_profiles, McuProfile};
use crate::checks::{Check, FindingsSink, Severity};
use crate::model::{Circuit, PartId, PartKind};
use crate::query::{count_pin_conns, is_connected};

/// Pin names that carry a generic microcontroller's pin usage.
pub const DIGITAL_PIN: &str = "digitalPin";
pub const ANALOG_PIN: &str = "analogPin";

/// Port names that carry a generic microcontroller's protocol usage.
pub const UART_PORT: &str = "UART";
pub const USART_PORT: &str = "USART";
pub const USI_PORT: &str = "USI";
pub const SPI_PORT: &str = "SPI";
pub const TWI_PORT: &str = "TWI";

/// Derive the capability requirement from a generic part's actual usage.
///
/// Wires on the conventional pins set the numeric capabilities; a connected
/// protocol port sets the matching flag. Missing pins and ports count as
/// unused, never as an error.
pub fn requirement_for(circuit: &Circuit, part: PartId) -> McuProfile {
    McuProfile {
        name: circuit.part(part).name.clone(),
        digital_pins: count_pin_conns(circuit, part, DIGITAL_PIN) as u32,
        analog_pins: count_pin_conns(circuit, part, ANALOG_PIN) as u32,
        has_uart: is_connected(circuit, part, UART_PORT),
        has_usart: is_connected(circuit, part, USART_PORT),
        has_usi: is_connected(circuit, part, USI_PORT),
        has_spi: is_connected(circuit, part, SPI_PORT),
        has_twi: is_connected(circuit, part, TWI_PORT),
    }
}

/// Refinement candidates for one generic microcontroller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementSuggestion {
    /// Name of the generic part.
    pub generic: String,
    /// The requirement derived from its usage.
    pub requirement: McuProfile,
    /// Names of every catalog model satisfying the requirement, in catalog
    /// order.
    pub candidates: Vec<String>,
}

/// Result of refining every generic microcontroller in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementReport {
    pub suggestions: Vec<RefinementSuggestion>,
}

impl RefinementReport {
    /// Total number of candidates across all generics.
    pub fn total_candidates(&self) -> usize {
        self.suggestions.iter().map(|s| s.candidates.len()).sum()
    }

    /// Human-readable rendering of the report.
    pub fn render(&self) -> String {
        if self.suggestions.is_empty() {
            return "The circuit has no generic microcontrollers to refine.\n".to_string();
        }
        if self.total_candidates() == 0 {
            return "No suitable refinements were found for the generic microcontrollers in the circuit.\n"
                .to_string();
        }

        let mut out = String::new();
        for suggestion in &self.suggestions {
            if suggestion.candidates.is_empty() {
                out.push_str(&format!(
                    "No suitable refinement found for {}.\n",
                    suggestion.generic
                ));
            } else {
                out.push_str(&format!("{} may be refined to:\n", suggestion.generic));
                for candidate in &suggestion.candidates {
                    out.push_str(&format!("  - {}\n", candidate));
                }
            }
        }
        out
    }
}

/// Matches generic microcontrollers against a catalog of concrete models.
pub struct McuRefiner {
    catalog: Vec<McuProfile>,
}

impl McuRefiner {
    /// Refiner over the embedded catalog.
    pub fn new() -> Self {
        Self::with_catalog(builtin_profiles())
    }

    /// Refiner over a caller-supplied catalog. The catalog is sorted by the
    /// presentation order (pins, then protocol presence) once, up front.
    pub fn with_catalog(mut catalog: Vec<McuProfile>) -> Self {
        catalog.sort_by_key(|profile| profile.sort_key());
        Self { catalog }
    }

    pub fn catalog(&self) -> &[McuProfile] {
        &self.catalog
    }

    /// Refine every generic microcontroller in the circuit.
    pub fn refine(&self, circuit: &Circuit) -> RefinementReport {
        let mut suggestions = Vec::new();
        for (part_id, part) in circuit.parts() {
            if part.kind != PartKind::GenericMcu {
                continue;
            }
            let requirement = requirement_for(circuit, part_id);
            let candidates = self
                .catalog
                .iter()
                .filter(|candidate| candidate.satisfies(&requirement))
                .map(|candidate| candidate.name.clone())
                .collect();
            suggestions.push(RefinementSuggestion {
                generic: part.name.clone(),
                requirement,
                candidates,
            });
        }
        RefinementReport { suggestions }
    }
}

impl Default for McuRefiner {
    fn default() -> Self {
        Self::new()
    }
}

/// Reports refinement candidates for generic microcontrollers as findings.
pub struct RefinementCheck {
    refiner: McuRefiner,
}

impl RefinementCheck {
    /// Check over the embedded catalog.
    pub fn new() -> Self {
        Self {
            refiner: McuRefiner::new(),
        }
    }

    /// Check over a caller-supplied refiner.
    pub fn with_refiner(refiner: McuRefiner) -> Self {
        Self { refiner }
    }
}

impl Default for RefinementCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for RefinementCheck {
    fn id(&self) -> &str {
        "refine_mcu"
    }

    fn name(&self) -> &str {
        "Microcontroller Refinement Check"
    }

    fn run(&self, circuit: &Circuit, sink: &mut dyn FindingsSink) {
        let report = self.refiner.refine(circuit);

        if report.suggestions.is_empty() {
            sink.report(
                circuit.name(),
                "The circuit has no generic microcontrollers to refine",
                Severity::Info,
            );
            return;
        }
        if report.total_candidates() == 0 {
            sink.report(
                circuit.name(),
                "No suitable refinements were found for the generic microcontrollers in the circuit",
                Severity::Warning,
            );
            return;
        }

        for suggestion in &report.suggestions {
            if suggestion.candidates.is_empty() {
                sink.report(
                    &suggestion.generic,
                    &format!("No suitable refinement found for {}", suggestion.generic),
                    Severity::Warning,
                );
                continue;
            }
            for candidate in &suggestion.candidates {
                sink.report(
                    &suggestion.generic,
                    &format!("{} is a suitable refinement", candidate),
                    Severity::Info,
                );
            }
        }
    }
}
