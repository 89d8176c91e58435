//! Microcontroller capability catalog.
//!
//! Profiles are loaded from JSON: either the embedded Atmel AVR catalog
//! compiled into the binary, or a user-supplied file with the same shape.
//! The catalog is read-only configuration; it is loaded once and handed to
//! the refinement matcher at construction.

use std::path::Path;

use serde::{Deserialize, Serialize};

// Embedded default catalog, compiled into the binary.
const EMBEDDED_ATMEL_AVR: &str = include_str!("../catalog/atmel_avr.json");

/// Capability profile of a microcontroller model.
///
/// The same shape describes both a concrete catalog entry and the requirement
/// derived from a generic microcontroller's actual usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McuProfile {
    pub name: String,
    pub digital_pins: u32,
    pub analog_pins: u32,
    pub has_uart: bool,
    pub has_usart: bool,
    pub has_usi: bool,
    pub has_spi: bool,
    pub has_twi: bool,
}

impl McuProfile {
    /// Whether this profile can stand in for `requirement`.
    ///
    /// Per-field dominance: numeric capabilities must meet the requirement,
    /// and every protocol the requirement uses must be present. A candidate
    /// offering protocols the requirement does not need still satisfies it.
    /// This is a partial order, so several incomparable candidates may all
    /// satisfy the same requirement.
    pub fn satisfies(&self, requirement: &McuProfile) -> bool {
        self.digital_pins >= requirement.digital_pins
            && self.analog_pins >= requirement.analog_pins
            && (!requirement.has_uart || self.has_uart)
            && (!requirement.has_usart || self.has_usart)
            && (!requirement.has_usi || self.has_usi)
            && (!requirement.has_spi || self.has_spi)
            && (!requirement.has_twi || self.has_twi)
    }

    /// Presentation sort key: digital pins, then analog pins, then protocol
    /// presence. Ordering never decides which candidates satisfy.
    pub(crate) fn sort_key(&self) -> (u32, u32, bool, bool, bool) {
        (
            self.digital_pins,
            self.analog_pins,
            self.has_uart,
            self.has_usart,
            self.has_usi,
        )
    }
}

/// The embedded catalog. Empty (with a warning) if the embedded JSON fails
/// to parse, which only happens on a broken build.
pub fn builtin_profiles() -> Vec<McuProfile> {
    match serde_json::from_str::<Vec<McuProfile>>(EMBEDDED_ATMEL_AVR) {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::warn!("Failed to parse embedded microcontroller catalog: {}", e);
            Vec::new()
        }
    }
}

/// Load a catalog from a JSON file with the same shape as the embedded one.
pub fn load_profiles_from_file(path: &Path) -> Result<Vec<McuProfile>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read catalog file: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse catalog JSON: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn profile(name: &str, digital: u32, analog: u32, protocols: [bool; 5]) -> McuProfile {
        McuProfile {
            name: name.to_string(),
            digital_pins: digital,
            analog_pins: analog,
            has_uart: protocols[0],
            has_usart: protocols[1],
            has_usi: protocols[2],
            has_spi: protocols[3],
            has_twi: protocols[4],
        }
    }

    #[test]
    fn test_embedded_catalog_parses() {
        let profiles = builtin_profiles();
        let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ATTiny85", "ATTiny2313", "ATMega328P"]);
        assert_eq!(profiles[0].digital_pins, 5);
        assert_eq!(profiles[2].analog_pins, 6);
        assert!(!profiles[1].has_twi);
    }

    #[test]
    fn test_satisfies_requires_numeric_dominance() {
        let requirement = profile("req", 4, 2, [false; 5]);
        assert!(profile("big", 5, 3, [false; 5]).satisfies(&requirement));
        assert!(profile("exact", 4, 2, [false; 5]).satisfies(&requirement));
        assert!(!profile("narrow", 3, 3, [false; 5]).satisfies(&requirement));
        assert!(!profile("shallow", 5, 1, [false; 5]).satisfies(&requirement));
    }

    #[test]
    fn test_satisfies_requires_used_protocols_only() {
        let requirement = profile("req", 0, 0, [true, false, false, false, false]);
        assert!(profile("uart", 0, 0, [true, false, false, false, false]).satisfies(&requirement));
        assert!(profile("all", 0, 0, [true; 5]).satisfies(&requirement));
        assert!(!profile("mute", 0, 0, [false; 5]).satisfies(&requirement));
        // An unneeded protocol on the candidate is fine.
        let loose = profile("req2", 0, 0, [false; 5]);
        assert!(profile("extra", 0, 0, [false, false, false, true, true]).satisfies(&loose));
    }

    #[test]
    fn test_sort_key_orders_by_pins_then_protocols() {
        let mut profiles = vec![
            profile("c", 8, 0, [true, false, false, false, false]),
            profile("a", 4, 2, [false; 5]),
            profile("b", 8, 0, [false; 5]),
        ];
        profiles.sort_by_key(|p| p.sort_key());
        let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_load_profiles_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name":"X1","digital_pins":2,"analog_pins":0,
                 "has_uart":false,"has_usart":false,"has_usi":false,
                 "has_spi":true,"has_twi":false}}]"#
        )
        .unwrap();

        let profiles = load_profiles_from_file(file.path()).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "X1");
        assert!(profiles[0].has_spi);
    }

    #[test]
    fn test_load_profiles_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_profiles_from_file(file.path()).is_err());
    }
}
