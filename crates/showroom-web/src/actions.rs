//! User actions queued from DOM callbacks and the overlay

use bevy::prelude::*;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    ChangeVehicle,
    ResetView,
}

/// Shared queue between click listeners (outside the ECS) and the systems
/// that apply actions once per frame
#[derive(Resource, Clone, Default)]
pub struct ActionQueue {
    pending: Arc<Mutex<VecDeque<ViewerAction>>>,
}

impl ActionQueue {
    pub fn push(&self, action: ViewerAction) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push_back(action);
        }
    }

    /// Take every queued action, oldest first
    pub fn drain(&self) -> Vec<ViewerAction> {
        match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let queue = ActionQueue::default();
        let listener = queue.clone();
        listener.push(ViewerAction::ChangeVehicle);
        listener.push(ViewerAction::ResetView);
        listener.push(ViewerAction::ChangeVehicle);

        assert_eq!(
            queue.drain(),
            vec![
                ViewerAction::ChangeVehicle,
                ViewerAction::ResetView,
                ViewerAction::ChangeVehicle,
            ]
        );
        assert!(queue.drain().is_empty());
    }
}
