//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{BookingLedger, MovieCatalog, ShowtimeSchedule};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalog: Arc<dyn MovieCatalog>,
    pub schedule: Arc<dyn ShowtimeSchedule>,
    pub ledger: Arc<dyn BookingLedger>,
}

impl HttpState {
    /// Bundle the three driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use cinema_backend::domain::{
    ///     BookingLedgerService, CatalogService, ShowtimeSchedulerService,
    /// };
    /// use cinema_backend::inbound::http::state::HttpState;
    /// use cinema_backend::outbound::memory::InMemoryStore;
    ///
    /// let store = InMemoryStore::new();
    /// let catalog = Arc::new(CatalogService::new(Arc::new(store.movies())));
    /// let schedule = Arc::new(ShowtimeSchedulerService::new(
    ///     Arc::new(store.showtimes()),
    ///     catalog.clone(),
    /// ));
    /// let ledger = Arc::new(BookingLedgerService::new(
    ///     Arc::new(store.bookings()),
    ///     schedule.clone(),
    /// ));
    /// let state = HttpState::new(catalog, schedule, ledger);
    /// let _catalog = state.catalog.clone();
    /// ```
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        schedule: Arc<dyn ShowtimeSchedule>,
        ledger: Arc<dyn BookingLedger>,
    ) -> Self {
        Self {
            catalog,
            schedule,
            ledger,
        }
    }
}
