use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the seven fixed hardware/software roles in a build.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Cpu,
    Gpu,
    Ram,
    Motherboard,
    Storage,
    Psu,
    Os,
}

impl ComponentCategory {
    /// Canonical display order (matches the builder's slot layout).
    pub const ALL: [ComponentCategory; 7] = [
        ComponentCategory::Cpu,
        ComponentCategory::Motherboard,
        ComponentCategory::Ram,
        ComponentCategory::Gpu,
        ComponentCategory::Storage,
        ComponentCategory::Psu,
        ComponentCategory::Os,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ComponentCategory::Cpu => "cpu",
            ComponentCategory::Gpu => "gpu",
            ComponentCategory::Ram => "ram",
            ComponentCategory::Motherboard => "motherboard",
            ComponentCategory::Storage => "storage",
            ComponentCategory::Psu => "psu",
            ComponentCategory::Os => "os",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComponentCategory::Cpu => "CPU",
            ComponentCategory::Gpu => "GPU",
            ComponentCategory::Ram => "RAM",
            ComponentCategory::Motherboard => "Motherboard",
            ComponentCategory::Storage => "Storage",
            ComponentCategory::Psu => "PSU",
            ComponentCategory::Os => "Operating System",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ComponentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ComponentCategory::ALL
            .into_iter()
            .find(|c| c.tag() == lower)
            .ok_or_else(|| format!("unknown component category: {s}"))
    }
}

/// Which of the two builds an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BuildKind {
    Current,
    New,
}

impl fmt::Display for BuildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildKind::Current => "current",
            BuildKind::New => "new",
        })
    }
}

/// Free-text part choices, at most one per category.
///
/// Backed by a fixed array indexed by [`ComponentCategory`], so an unset
/// category is `None` rather than an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildState {
    parts: [Option<String>; 7],
}

impl BuildState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the part for `category`. A blank description
    /// unsets the category.
    pub fn set_part(&mut self, category: ComponentCategory, description: &str) {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            self.remove_part(category);
        } else {
            self.parts[category.slot()] = Some(trimmed.to_string());
        }
    }

    pub fn remove_part(&mut self, category: ComponentCategory) {
        self.parts[category.slot()] = None;
    }

    pub fn get(&self, category: ComponentCategory) -> Option<&str> {
        self.parts[category.slot()].as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(Option::is_none)
    }

    /// Set entries in canonical category order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (ComponentCategory, &str)> + '_ {
        ComponentCategory::ALL
            .into_iter()
            .filter_map(move |c| self.get(c).map(|d| (c, d)))
    }

    pub fn to_pc_parts(&self) -> PcParts {
        let field = |c| self.get(c).unwrap_or_default().to_string();
        PcParts {
            cpu: field(ComponentCategory::Cpu),
            gpu: field(ComponentCategory::Gpu),
            ram: field(ComponentCategory::Ram),
            motherboard: field(ComponentCategory::Motherboard),
            storage: field(ComponentCategory::Storage),
            psu: field(ComponentCategory::Psu),
            os: field(ComponentCategory::Os),
        }
    }
}

/// Fixed-shape projection of a build, empty string for unset categories.
/// This is the canonical shape sent to tutorial generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PcParts {
    pub cpu: String,
    pub gpu: String,
    pub ram: String,
    pub motherboard: String,
    pub storage: String,
    pub psu: String,
    pub os: String,
}

impl PcParts {
    pub fn get(&self, category: ComponentCategory) -> &str {
        match category {
            ComponentCategory::Cpu => &self.cpu,
            ComponentCategory::Gpu => &self.gpu,
            ComponentCategory::Ram => &self.ram,
            ComponentCategory::Motherboard => &self.motherboard,
            ComponentCategory::Storage => &self.storage,
            ComponentCategory::Psu => &self.psu,
            ComponentCategory::Os => &self.os,
        }
    }

    /// True when at least one field holds non-whitespace text.
    pub fn has_any(&self) -> bool {
        ComponentCategory::ALL
            .into_iter()
            .any(|c| !self.get(c).trim().is_empty())
    }
}
