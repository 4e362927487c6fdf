pub mod engine;
pub mod error;
mod parse;
mod prompt;
mod schema;

use std::sync::atomic::{AtomicBool, Ordering};

use rigshift_core::{PcParts, TutorialResponse};

pub use engine::{LlmBackend, TutorialBackend};
pub use error::GuideError;
pub use parse::parse_tutorial;
pub use prompt::{build_prompt, changed_categories};
pub use schema::response_schema;

/// Build the request, make one backend call, and validate the result.
///
/// Callers must ensure `new` has at least one part; [`TutorialService`]
/// does that before calling here.
pub async fn request_tutorial<B>(
    backend: &B,
    current: &PcParts,
    new: &PcParts,
) -> Result<TutorialResponse, GuideError>
where
    B: TutorialBackend + ?Sized,
{
    let prompt = prompt::build_prompt(current, new);
    let schema = schema::response_schema();

    let changed = prompt::changed_categories(current, new);
    tracing::info!(changed = changed.len(), "requesting upgrade tutorial");

    let raw = backend
        .complete(&prompt, &schema)
        .await
        .inspect_err(|e| tracing::error!("tutorial request failed: {e}"))?;
    tracing::debug!(bytes = raw.len(), "raw tutorial response received");

    let response = parse::parse_tutorial(&raw)
        .inspect_err(|e| tracing::error!("tutorial response rejected: {e}"))?;
    tracing::info!(
        steps = response.tutorial.len(),
        warnings = response.warnings.len(),
        "tutorial generated"
    );
    Ok(response)
}

/// Generation entry point with the empty-build check and a single-flight
/// gate: at most one request is outstanding at a time.
pub struct TutorialService<B> {
    backend: B,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B: TutorialBackend> TutorialService<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InFlight<'_>, GuideError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(&self.in_flight))
            .map_err(|_| GuideError::Busy)
    }

    /// Generate a tutorial for upgrading `current` to `new`.
    ///
    /// Fails with [`GuideError::NoNewParts`] without calling the backend when
    /// every new field is blank, and with [`GuideError::Busy`] while another
    /// call is pending.
    pub async fn generate(&self, current: &PcParts, new: &PcParts) -> Result<TutorialResponse, GuideError> {
        if !new.has_any() {
            tracing::warn!("generation rejected: new build is empty");
            return Err(GuideError::NoNewParts);
        }
        let _guard = self.begin().inspect_err(|_| {
            tracing::warn!("generation rejected: a request is already in flight");
        })?;
        request_tutorial(&self.backend, current, new).await
    }
}
