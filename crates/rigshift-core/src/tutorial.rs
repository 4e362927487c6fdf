use serde::{Deserialize, Serialize};

/// One instruction in a generated upgrade guide. Step numbers normally
/// ascend from 1 but consumers must not rely on them being contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TutorialStep {
    pub step: u32,
    pub title: String,
    pub details: String,
}

/// The structured payload returned by tutorial generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TutorialResponse {
    #[serde(default)]
    pub warnings: Vec<String>,
    pub tutorial: Vec<TutorialStep>,
}
