#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleAction {
    EnterForegroundTriggered,
    EnterBackgroundTriggered,
}
