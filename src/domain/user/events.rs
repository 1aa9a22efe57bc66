// ============================================================================
// User Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    PointsAwarded { points: u64, balance: u64 },
    PointsRedeemed { points: u64, balance: u64 },
}

impl UserEvent {
    /// Balance after the event is applied
    pub fn balance(&self) -> u64 {
        match self {
            UserEvent::PointsAwarded { balance, .. } | UserEvent::PointsRedeemed { balance, .. } => *balance,
        }
    }
}
