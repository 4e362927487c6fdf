//! Heuristic compatibility linter.
//!
//! Every rule pattern-matches free-text part names. This is not a certified
//! compatibility database: text without a recognizable vendor, memory
//! generation, or wattage token produces no warning, so false negatives are
//! expected. Rules never fail; they only emit warnings.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use crate::parts::{BuildState, ComponentCategory};

static INTEL: LazyLock<Regex> = LazyLock::new(|| token(r"intel"));
static AMD: LazyLock<Regex> = LazyLock::new(|| token(r"amd"));
static DDR4: LazyLock<Regex> = LazyLock::new(|| token(r"ddr4"));
static DDR5: LazyLock<Regex> = LazyLock::new(|| token(r"ddr5"));
static HIGH_END_GPU: LazyLock<Regex> = LazyLock::new(|| token(r"rtx (30|40)\d{2}|rx (6|7)\d{3}"));
static LOW_WATT_PSU: LazyLock<Regex> = LazyLock::new(|| token(r"550w|650w"));

fn token(pattern: &str) -> Regex {
    // Patterns are compile-time literals.
    Regex::new(&format!("(?i){pattern}")).unwrap_or_else(|e| panic!("bad rule pattern {pattern}: {e}"))
}

/// A single detected incompatibility or risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityWarning {
    pub rule: &'static str,
    pub message: String,
}

impl CompatibilityWarning {
    fn new(rule: &'static str, message: &str) -> Self {
        Self {
            rule,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for CompatibilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A pairwise check between two categories. `check` only runs when both
/// categories are set.
pub struct Rule {
    pub id: &'static str,
    pub left: ComponentCategory,
    pub right: ComponentCategory,
    pub check: fn(&str, &str) -> Vec<CompatibilityWarning>,
}

/// Evaluation order is fixed: vendor, memory generation, power headroom.
pub const RULES: &[Rule] = &[
    Rule {
        id: VENDOR_MISMATCH,
        left: ComponentCategory::Cpu,
        right: ComponentCategory::Motherboard,
        check: vendor_mismatch,
    },
    Rule {
        id: MEMORY_GENERATION,
        left: ComponentCategory::Ram,
        right: ComponentCategory::Motherboard,
        check: memory_generation,
    },
    Rule {
        id: POWER_HEADROOM,
        left: ComponentCategory::Gpu,
        right: ComponentCategory::Psu,
        check: power_headroom,
    },
];

pub const VENDOR_MISMATCH: &str = "vendor-mismatch";
pub const MEMORY_GENERATION: &str = "memory-generation";
pub const POWER_HEADROOM: &str = "power-headroom";

/// Run every rule against `build` and concatenate the results in rule order.
pub fn check_compatibility(build: &BuildState) -> Vec<CompatibilityWarning> {
    let mut warnings = Vec::new();
    for rule in RULES {
        let (Some(left), Some(right)) = (build.get(rule.left), build.get(rule.right)) else {
            continue;
        };
        let found = (rule.check)(left, right);
        if !found.is_empty() {
            tracing::debug!(rule = rule.id, count = found.len(), "compatibility rule fired");
        }
        warnings.extend(found);
    }
    warnings
}

/// CPU and motherboard from different vendors.
pub fn vendor_mismatch(cpu: &str, motherboard: &str) -> Vec<CompatibilityWarning> {
    let mut out = Vec::new();
    if INTEL.is_match(cpu) && AMD.is_match(motherboard) {
        out.push(CompatibilityWarning::new(
            VENDOR_MISMATCH,
            "Intel CPU is likely incompatible with an AMD motherboard chipset.",
        ));
    }
    if AMD.is_match(cpu) && INTEL.is_match(motherboard) {
        out.push(CompatibilityWarning::new(
            VENDOR_MISMATCH,
            "AMD CPU is likely incompatible with an Intel motherboard chipset.",
        ));
    }
    out
}

/// RAM and motherboard declaring different DDR generations.
pub fn memory_generation(ram: &str, motherboard: &str) -> Vec<CompatibilityWarning> {
    let mut out = Vec::new();
    if DDR5.is_match(ram) && DDR4.is_match(motherboard) {
        out.push(CompatibilityWarning::new(
            MEMORY_GENERATION,
            "DDR5 RAM is not compatible with a DDR4 motherboard.",
        ));
    }
    if DDR4.is_match(ram) && DDR5.is_match(motherboard) {
        out.push(CompatibilityWarning::new(
            MEMORY_GENERATION,
            "DDR4 RAM is not compatible with a DDR5 motherboard.",
        ));
    }
    out
}

/// High-end GPU paired with a low-wattage PSU.
pub fn power_headroom(gpu: &str, psu: &str) -> Vec<CompatibilityWarning> {
    if HIGH_END_GPU.is_match(gpu) && LOW_WATT_PSU.is_match(psu) {
        vec![CompatibilityWarning::new(
            POWER_HEADROOM,
            "A high-end GPU may require a higher wattage PSU (750W+) for stable performance.",
        )]
    } else {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(parts: &[(ComponentCategory, &str)]) -> BuildState {
        let mut b = BuildState::new();
        for (c, d) in parts {
            b.set_part(*c, d);
        }
        b
    }

    #[test]
    fn amd_cpu_on_intel_board_warns_once() {
        let b = build(&[
            (ComponentCategory::Cpu, "AMD Ryzen 7 5800X"),
            (ComponentCategory::Motherboard, "Intel Z-series Chipset (DDR5)"),
        ]);
        let warnings = check_compatibility(&b);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule, VENDOR_MISMATCH);
        assert!(warnings[0].message.contains("AMD"));
        assert!(warnings[0].message.contains("Intel"));
    }

    #[test]
    fn same_vendor_is_silent() {
        let b = build(&[
            (ComponentCategory::Cpu, "AMD Ryzen 7"),
            (ComponentCategory::Motherboard, "AMD X-series Chipset"),
        ]);
        assert!(check_compatibility(&b).is_empty());
    }

    #[test]
    fn undetectable_vendor_is_silent() {
        assert!(vendor_mismatch("Ryzen 7 5800X", "Intel B760").is_empty());
        assert!(vendor_mismatch("Core i9", "X670E board").is_empty());
    }

    #[test]
    fn vendor_match_is_case_insensitive() {
        assert_eq!(vendor_mismatch("intel core i5", "asus amd b650").len(), 1);
    }

    #[test]
    fn ddr5_ram_on_ddr4_board_warns() {
        let b = build(&[
            (ComponentCategory::Ram, "32GB DDR5"),
            (ComponentCategory::Motherboard, "Intel B-series Chipset (DDR4)"),
        ]);
        let warnings = check_compatibility(&b);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule, MEMORY_GENERATION);
        assert_eq!(warnings[0].to_string(), "DDR5 RAM is not compatible with a DDR4 motherboard.");
    }

    #[test]
    fn ddr4_ram_on_ddr5_board_warns() {
        assert_eq!(memory_generation("16gb ddr4", "B650 (DDR5)").len(), 1);
        assert!(memory_generation("16GB", "B650 (DDR5)").is_empty());
        assert!(memory_generation("32GB DDR5", "AMD X-series Chipset (DDR5)").is_empty());
    }

    #[test]
    fn rtx_4090_on_650w_warns() {
        let b = build(&[
            (ComponentCategory::Gpu, "NVIDIA GeForce RTX 4090"),
            (ComponentCategory::Psu, "650W PSU"),
        ]);
        let warnings = check_compatibility(&b);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule, POWER_HEADROOM);
    }

    #[test]
    fn rtx_4090_on_1000w_is_silent() {
        let b = build(&[
            (ComponentCategory::Gpu, "NVIDIA GeForce RTX 4090"),
            (ComponentCategory::Psu, "1000W Gold/Platinum PSU"),
        ]);
        assert!(check_compatibility(&b).is_empty());
    }

    #[test]
    fn radeon_7900_counts_as_high_end() {
        assert_eq!(power_headroom("AMD Radeon RX 7900 XTX", "550W PSU").len(), 1);
        assert!(power_headroom("NVIDIA GeForce GTX 1060", "550W PSU").is_empty());
    }

    #[test]
    fn missing_counterpart_skips_rule() {
        let b = build(&[
            (ComponentCategory::Cpu, "AMD Ryzen 7"),
            (ComponentCategory::Gpu, "RTX 4090"),
            (ComponentCategory::Ram, "DDR5"),
        ]);
        assert!(check_compatibility(&b).is_empty());
    }

    #[test]
    fn warnings_follow_rule_order() {
        let b = build(&[
            (ComponentCategory::Psu, "550W PSU"),
            (ComponentCategory::Gpu, "RTX 3080"),
            (ComponentCategory::Ram, "32GB DDR5"),
            (ComponentCategory::Motherboard, "Intel B-series Chipset (DDR4)"),
            (ComponentCategory::Cpu, "AMD Ryzen 5"),
        ]);
        let rules: Vec<_> = check_compatibility(&b).into_iter().map(|w| w.rule).collect();
        assert_eq!(rules, vec![VENDOR_MISMATCH, MEMORY_GENERATION, POWER_HEADROOM]);
    }
}
