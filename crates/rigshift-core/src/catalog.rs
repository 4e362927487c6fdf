//! Static option lists and glossary text shown when choosing parts.

use serde::Serialize;

use crate::parts::{BuildKind, ComponentCategory};

/// Predefined selectable options for a category. Current-build options skew
/// towards older hardware, new-build options towards recent generations.
pub fn options(kind: BuildKind, category: ComponentCategory) -> &'static [&'static str] {
    match kind {
        BuildKind::Current => current_options(category),
        BuildKind::New => new_options(category),
    }
}

fn current_options(category: ComponentCategory) -> &'static [&'static str] {
    match category {
        ComponentCategory::Cpu => &[
            "Intel Core i5 (8th-10th Gen)",
            "Intel Core i7 (8th-10th Gen)",
            "AMD Ryzen 5 (2000-3000 series)",
            "AMD Ryzen 7 (2000-3000 series)",
        ],
        ComponentCategory::Motherboard => &[
            "Intel B-series Chipset (DDR4)",
            "Intel Z-series Chipset (DDR4)",
            "AMD B-series Chipset (DDR4)",
            "AMD X-series Chipset (DDR4)",
        ],
        ComponentCategory::Ram => &["8GB DDR4", "16GB DDR4", "32GB DDR4"],
        ComponentCategory::Gpu => &[
            "NVIDIA GeForce GTX 10-series",
            "NVIDIA GeForce RTX 20-series",
            "AMD Radeon RX 500/5000-series",
        ],
        ComponentCategory::Storage => &["SATA SSD", "NVMe M.2 SSD", "Hard Disk Drive (HDD)"],
        ComponentCategory::Psu => &["550W PSU", "650W PSU", "750W PSU", "850W PSU"],
        ComponentCategory::Os => &[
            "Windows 10",
            "Windows 11",
            "Linux (e.g., Ubuntu)",
            "macOS (Hackintosh)",
        ],
    }
}

fn new_options(category: ComponentCategory) -> &'static [&'static str] {
    match category {
        ComponentCategory::Cpu => &[
            "Intel Core i5 (12th-14th Gen)",
            "Intel Core i7 (12th-14th Gen)",
            "Intel Core i9 (12th-14th Gen)",
            "AMD Ryzen 5 (5000-7000 series)",
            "AMD Ryzen 7 (5000-7000 series)",
            "AMD Ryzen 9 (5000-7000 series)",
        ],
        ComponentCategory::Motherboard => &[
            "Intel B-series Chipset (DDR5)",
            "Intel Z-series Chipset (DDR5)",
            "AMD B-series Chipset (DDR5)",
            "AMD X-series Chipset (DDR5)",
        ],
        ComponentCategory::Ram => &["16GB DDR5", "32GB DDR5", "64GB DDR5"],
        ComponentCategory::Gpu => &[
            "NVIDIA GeForce RTX 30-series",
            "NVIDIA GeForce RTX 40-series",
            "NVIDIA GeForce RTX 4080",
            "NVIDIA GeForce RTX 4090",
            "AMD Radeon RX 6000-series",
            "AMD Radeon RX 7000-series",
            "AMD Radeon RX 7900 XT",
            "AMD Radeon RX 7900 XTX",
        ],
        ComponentCategory::Storage => &[
            "1TB NVMe M.2 SSD",
            "2TB NVMe M.2 SSD",
            "4TB NVMe M.2 SSD",
            "High-Capacity SATA SSD (2TB+)",
        ],
        ComponentCategory::Psu => &[
            "750W Gold PSU",
            "850W Gold PSU",
            "1000W Gold/Platinum PSU",
            "1200W+ Platinum PSU",
        ],
        ComponentCategory::Os => &[
            "Windows 11 (Fresh Install)",
            "Linux (e.g., Ubuntu 24.04)",
            "Dual Boot Setup (Windows/Linux)",
        ],
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryEntry {
    pub category: ComponentCategory,
    pub name: &'static str,
    pub full_name: &'static str,
    pub description: &'static str,
    /// What the physical part looks like.
    pub appearance: &'static str,
}

pub fn glossary() -> Vec<GlossaryEntry> {
    ComponentCategory::ALL.into_iter().map(glossary_entry).collect()
}

pub fn glossary_entry(category: ComponentCategory) -> GlossaryEntry {
    let (name, full_name, description, appearance) = match category {
        ComponentCategory::Cpu => (
            "CPU",
            "Central Processing Unit",
            "The \"brain\" of the computer. It performs the calculations and instructions that make \
your computer work. A faster CPU runs programs and games more smoothly.",
            "A small, square chip, often with gold contacts or pins on the bottom. It sits in a \
special socket on the motherboard.",
        ),
        ComponentCategory::Gpu => (
            "GPU",
            "Graphics Processing Unit",
            "The \"artist\" of the computer. It creates the images, videos, and animations you see \
on your screen. A powerful GPU is essential for modern gaming and video editing.",
            "A large rectangular card with one or more cooling fans. It plugs into a long slot on \
the motherboard.",
        ),
        ComponentCategory::Ram => (
            "RAM",
            "Random Access Memory",
            "The computer's \"short-term memory\". It temporarily holds data your computer is \
actively using. More RAM lets you run more applications at once without slowdowns.",
            "Long, thin sticks with small black memory chips on them. They snap into long slots on \
the motherboard.",
        ),
        ComponentCategory::Motherboard => (
            "Motherboard",
            "",
            "The \"nervous system\" of the computer. A large circuit board that connects all the \
components so they can communicate and work as a single system.",
            "The largest circuit board in your PC case, with many slots, ports, and connectors for \
the other components.",
        ),
        ComponentCategory::Storage => (
            "Storage",
            "SSD or HDD",
            "The \"long-term memory\" of the computer. It keeps your files, applications, and the \
operating system, even when the power is off.",
            "A small flat rectangle (SATA SSD), a small stick mounted directly on the motherboard \
(NVMe SSD), or a thicker, heavier box (HDD).",
        ),
        ComponentCategory::Psu => (
            "PSU",
            "Power Supply Unit",
            "The \"heart\" of the computer. It takes electricity from the wall outlet and converts \
it into the voltages every component needs.",
            "A metal box at the bottom or top rear of the case, with a fan and a large bundle of \
cables coming out of it.",
        ),
        ComponentCategory::Os => (
            "OS",
            "Operating System",
            "The \"manager\" of the computer. The main software that runs the hardware and other \
software, and provides the interface you interact with.",
            "The software interface you see, like the Windows desktop with its Start Menu or the \
macOS desktop with its Dock.",
        ),
    };
    GlossaryEntry {
        category,
        name,
        full_name,
        description,
        appearance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_options_for_both_builds() {
        for category in ComponentCategory::ALL {
            assert!(!options(BuildKind::Current, category).is_empty());
            assert!(!options(BuildKind::New, category).is_empty());
        }
    }

    #[test]
    fn new_build_options_target_current_generation() {
        assert!(options(BuildKind::New, ComponentCategory::Ram)
            .iter()
            .all(|o| o.contains("DDR5")));
        assert!(options(BuildKind::Current, ComponentCategory::Ram)
            .iter()
            .all(|o| o.contains("DDR4")));
    }

    #[test]
    fn glossary_covers_all_categories_in_order() {
        let entries = glossary();
        let cats: Vec<_> = entries.iter().map(|e| e.category).collect();
        assert_eq!(cats, ComponentCategory::ALL.to_vec());
    }
}
