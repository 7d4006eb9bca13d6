//! Application state for the web layer.

use std::sync::Arc;

use crate::catalog::{LinePolicy, StationCatalog};
use crate::schedule::ScheduleBackend;
use crate::transit::Transit;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Station catalog plus the schedule source
    pub transit: Arc<Transit<ScheduleBackend>>,
}

impl AppState {
    pub fn new(catalog: StationCatalog, backend: ScheduleBackend, policy: LinePolicy) -> Self {
        let transit = Transit::new(Arc::new(catalog), backend).with_policy(policy);
        Self {
            transit: Arc::new(transit),
        }
    }
}
