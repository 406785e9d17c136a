//! Shared application state.

use std::sync::Arc;

use diamondline_cards::application::dispatch::Dispatcher;
use diamondline_core::cancel::CancellationToken;
use diamondline_reconciliation::service::ReconciliationService;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReconciliationService>,
    /// Read access to tracked cards.
    pub dispatcher: Arc<dyn Dispatcher>,
    /// Raised on shutdown; every job observes it.
    pub cancel: CancellationToken,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        service: Arc<ReconciliationService>,
        dispatcher: Arc<dyn Dispatcher>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            service,
            dispatcher,
            cancel,
        }
    }
}
