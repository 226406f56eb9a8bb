//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::RoutePlanner;

/// Shared application state.
///
/// Generic over the three sources so the same router serves live APIs
/// and fixtures.
pub struct AppState<T, S, V> {
    /// Route planner over the configured sources
    pub planner: Arc<RoutePlanner<T, S, V>>,
}

impl<T, S, V> AppState<T, S, V> {
    /// Create a new app state.
    pub fn new(planner: RoutePlanner<T, S, V>) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}

// Derive would demand `T: Clone` and so on; only the `Arc` is cloned.
impl<T, S, V> Clone for AppState<T, S, V> {
    fn clone(&self) -> Self {
        Self {
            planner: Arc::clone(&self.planner),
        }
    }
}
