use crate::actions::{Action, LifecycleAction};
use crate::state::{LifecycleState, LifecycleStatus};

pub fn reduce(mut state: LifecycleState, action: &Action) -> LifecycleState {
    match action {
        Action::Lifecycle(LifecycleAction::EnterForegroundTriggered) => {
            state.status = LifecycleStatus::Foreground;
        }
        Action::Lifecycle(LifecycleAction::EnterBackgroundTriggered) => {
            state.status = LifecycleStatus::Background;
        }
        _ => {}
    }
    state
}
