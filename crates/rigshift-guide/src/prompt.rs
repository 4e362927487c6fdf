use rigshift_core::{ComponentCategory, PcParts};

/// Prompt-facing names, in the order parts are listed to the model.
const PROMPT_ORDER: [(ComponentCategory, &str); 7] = [
    (ComponentCategory::Cpu, "CPU"),
    (ComponentCategory::Gpu, "GPU"),
    (ComponentCategory::Ram, "RAM"),
    (ComponentCategory::Motherboard, "Motherboard"),
    (ComponentCategory::Storage, "Storage"),
    (ComponentCategory::Psu, "PSU"),
    (ComponentCategory::Os, "OS"),
];

/// Categories whose new value is set and differs from the current one.
pub fn changed_categories(current: &PcParts, new: &PcParts) -> Vec<ComponentCategory> {
    PROMPT_ORDER
        .iter()
        .map(|(c, _)| *c)
        .filter(|c| {
            let n = new.get(*c).trim();
            !n.is_empty() && n != current.get(*c).trim()
        })
        .collect()
}

fn serialize_parts(out: &mut String, parts: &PcParts, empty: &str) {
    for (category, name) in PROMPT_ORDER {
        let value = parts.get(category).trim();
        out.push_str("- ");
        out.push_str(name);
        out.push_str(": ");
        out.push_str(if value.is_empty() { empty } else { value });
        out.push('\n');
    }
}

/// Deterministic instruction payload for one upgrade.
pub fn build_prompt(current: &PcParts, new: &PcParts) -> String {
    let changed = changed_categories(current, new)
        .iter()
        .map(|c| c.tag())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::with_capacity(4096);
    out.push_str(
        "You are an expert PC builder and technical writer. Your task is to generate a detailed, \
step-by-step guide for a user upgrading their PC. The user is upgrading the following components: ",
    );
    out.push_str(&changed);
    out.push_str(".\n\n**Current PC Components:**\n");
    serialize_parts(&mut out, current, "Not specified");
    out.push_str("\n**New PC Components:**\n");
    serialize_parts(&mut out, new, "Not changing");
    out.push('\n');
    out.push_str(RUBRIC);
    out
}

const RUBRIC: &str = "\
Based on this information, generate a clear, concise, and safe upgrade tutorial.\n\
\n\
**Instructions for the guide:**\n\
1. First, analyze the component list for any obvious compatibility issues (e.g., new AMD CPU on an \
old Intel motherboard, DDR5 RAM with a DDR4 motherboard, inadequate PSU wattage for a new high-end \
GPU). List these issues in the 'warnings' field. If there are no issues, return an empty 'warnings' array.\n\
2. The tutorial should start with a \"Preparation\" section covering necessary tools (like \
screwdrivers, zip ties, anti-static wrist strap) and safety precautions (unplugging the PC, \
grounding yourself).\n\
3. Provide a logical sequence of steps for removing the old components and installing the new ones. \
ONLY create steps for components that are being changed.\n\
4. If the operating system is being changed or upgraded (e.g., from Windows 10 to 11, or a fresh \
install), include critical steps for **backing up personal data**, creating a **bootable USB \
installation drive**, and guidance on the OS installation process after the hardware is assembled.\n\
5. If the motherboard is being replaced, explain that this is a major overhaul and requires \
disconnecting everything and rebuilding.\n\
6. If the CPU is being replaced, include instructions on cleaning the old thermal paste and \
applying new paste.\n\
7. If the PSU is being replaced, emphasize cable management and connecting all required power \
leads to the motherboard, CPU, GPU, and other peripherals.\n\
8. Mention important details like releasing the PCIe retention clip for the GPU, the RAM retention \
clips, and connecting all necessary power and data cables (24-pin motherboard, 8-pin CPU, PCIe \
power for GPU, SATA cables).\n\
9. End with a \"Final Checks\" section covering cable management, closing the case, and the first \
boot-up process (including entering the BIOS/UEFI if necessary).\n\
10. Keep the language clear and accessible for someone who may not be an expert.\n\
\n\
Return the entire guide in the specified JSON format.\n";

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(pairs: &[(ComponentCategory, &str)]) -> PcParts {
        let mut b = rigshift_core::BuildState::new();
        for (c, d) in pairs {
            b.set_part(*c, d);
        }
        b.to_pc_parts()
    }

    #[test]
    fn changed_skips_unset_and_identical() {
        let current = parts(&[(ComponentCategory::Cpu, "Intel Core i5"), (ComponentCategory::Os, "Windows 11")]);
        let new = parts(&[
            (ComponentCategory::Cpu, "AMD Ryzen 7"),
            (ComponentCategory::Os, "Windows 11"),
            (ComponentCategory::Psu, "850W Gold PSU"),
        ]);
        assert_eq!(
            changed_categories(&current, &new),
            vec![ComponentCategory::Cpu, ComponentCategory::Psu]
        );
    }

    #[test]
    fn prompt_lists_both_builds_with_placeholders() {
        let current = parts(&[(ComponentCategory::Gpu, "NVIDIA GeForce GTX 10-series")]);
        let new = parts(&[(ComponentCategory::Gpu, "NVIDIA GeForce RTX 4080")]);
        let prompt = build_prompt(&current, &new);
        assert!(prompt.contains("upgrading the following components: gpu."));
        assert!(prompt.contains("- GPU: NVIDIA GeForce GTX 10-series\n"));
        assert!(prompt.contains("- CPU: Not specified\n"));
        assert!(prompt.contains("- GPU: NVIDIA GeForce RTX 4080\n"));
        assert!(prompt.contains("- OS: Not changing\n"));
        assert!(prompt.contains("\"Final Checks\""));
        assert!(prompt.contains("thermal paste"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let current = parts(&[(ComponentCategory::Ram, "16GB DDR4")]);
        let new = parts(&[(ComponentCategory::Ram, "32GB DDR5")]);
        assert_eq!(build_prompt(&current, &new), build_prompt(&current, &new));
    }
}
