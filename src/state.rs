use crate::tracker::FitnessTracker;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handle shared by every request. All access to the tracker goes through
/// this lock.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Mutex<FitnessTracker>>,
}

impl AppState {
    pub fn new(tracker: FitnessTracker) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }
}
