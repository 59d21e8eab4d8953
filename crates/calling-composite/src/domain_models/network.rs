use strum::Display;

/// Network quality diagnostic reported by the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NetworkQuality {
    Good,
    Poor,
    Bad,
}
