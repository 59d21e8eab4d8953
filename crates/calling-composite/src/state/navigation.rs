#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Not launched yet
    #[default]
    None,
    Setup,
    Call,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub screen: Screen,
}
