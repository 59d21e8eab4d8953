#[derive(Debug, Clone, PartialEq)]
pub enum NavigationAction {
    SetupLaunched,
    CallLaunched,
    Exit,
}
