use crate::error::{ExportError, StorageError};
use crate::export::{self, ExportFormat, ExportedDocument};
use crate::parts::{BuildKind, BuildState, ComponentCategory, PcParts};
use crate::rules::{self, CompatibilityWarning};
use crate::storage::{self, SlotStore};
use crate::tutorial::TutorialResponse;

/// Session state: the current and new builds plus the last generated
/// tutorial. Starts empty; nothing is durable unless explicitly saved.
#[derive(Debug, Clone, Default)]
pub struct Workbench {
    current: BuildState,
    new: BuildState,
    tutorial: Option<TutorialResponse>,
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&self, kind: BuildKind) -> &BuildState {
        match kind {
            BuildKind::Current => &self.current,
            BuildKind::New => &self.new,
        }
    }

    fn build_mut(&mut self, kind: BuildKind) -> &mut BuildState {
        match kind {
            BuildKind::Current => &mut self.current,
            BuildKind::New => &mut self.new,
        }
    }

    pub fn set_part(&mut self, kind: BuildKind, category: ComponentCategory, description: &str) {
        self.build_mut(kind).set_part(category, description);
    }

    pub fn remove_part(&mut self, kind: BuildKind, category: ComponentCategory) {
        self.build_mut(kind).remove_part(category);
    }

    /// Recomputed on every call.
    pub fn warnings(&self, kind: BuildKind) -> Vec<CompatibilityWarning> {
        rules::check_compatibility(self.build(kind))
    }

    /// `(current, new)` as captured for a generation request. Later edits do
    /// not affect an already-taken snapshot.
    pub fn snapshot(&self) -> (PcParts, PcParts) {
        (self.current.to_pc_parts(), self.new.to_pc_parts())
    }

    pub fn save(&self, store: &dyn SlotStore) -> Result<(), StorageError> {
        storage::save(store, &self.current, &self.new)
    }

    /// Replace both builds with the saved ones. Returns `false` and leaves
    /// the builds untouched when nothing (valid) is saved.
    pub fn load(&mut self, store: &dyn SlotStore) -> Result<bool, StorageError> {
        match storage::load(store)? {
            Some((current, new)) => {
                self.current = current;
                self.new = new;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn has_saved(&self, store: &dyn SlotStore) -> Result<bool, StorageError> {
        storage::has_saved(store)
    }

    pub fn tutorial(&self) -> Option<&TutorialResponse> {
        self.tutorial.as_ref()
    }

    pub fn set_tutorial(&mut self, tutorial: TutorialResponse) {
        self.tutorial = Some(tutorial);
    }

    pub fn export(&self, format: ExportFormat) -> Result<ExportedDocument, ExportError> {
        let tutorial = self.tutorial.as_ref().ok_or(ExportError::NoTutorial)?;
        Ok(export::export(tutorial, format))
    }
}
