//! Application state shared across handlers

use std::sync::Arc;

use crate::database::RoutineExecutor;

/// Built once at startup and cloned into every request; never mutated.
#[derive(Clone)]
pub struct AppState {
    routines: Arc<dyn RoutineExecutor>,
}

impl AppState {
    pub fn new(routines: Arc<dyn RoutineExecutor>) -> Self {
        Self { routines }
    }

    pub fn routines(&self) -> &dyn RoutineExecutor {
        self.routines.as_ref()
    }
}
