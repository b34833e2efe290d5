/// Monitor-enabled flag with an optimistic toggle.
///
/// `request` moves to `Pending` and the displayed value flips at once;
/// `settle` then lands on `Confirmed(enabled)` or `RolledBack(previous)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorFlag {
    Confirmed(bool),
    Pending { enabled: bool, previous: bool },
    RolledBack(bool),
}

impl Default for MonitorFlag {
    fn default() -> Self {
        MonitorFlag::Confirmed(false)
    }
}

impl MonitorFlag {
    /// Value the UI shows right now.
    pub fn displayed(self) -> bool {
        match self {
            MonitorFlag::Confirmed(value) | MonitorFlag::RolledBack(value) => value,
            MonitorFlag::Pending { enabled, .. } => enabled,
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, MonitorFlag::Pending { .. })
    }

    /// Starts a toggle. Refused while another toggle is pending or when the
    /// flag already shows `enabled`.
    pub fn request(&mut self, enabled: bool) -> bool {
        if self.is_pending() || self.displayed() == enabled {
            return false;
        }
        *self = MonitorFlag::Pending {
            enabled,
            previous: self.displayed(),
        };
        true
    }

    /// Resolves a pending toggle. No-op when nothing is pending.
    pub fn settle(&mut self, accepted: bool) {
        if let MonitorFlag::Pending { enabled, previous } = *self {
            *self = if accepted {
                MonitorFlag::Confirmed(enabled)
            } else {
                MonitorFlag::RolledBack(previous)
            };
        }
    }

    /// Adopts a server-loaded value unless a toggle is still in flight.
    pub fn load(&mut self, value: bool) {
        if !self.is_pending() {
            *self = MonitorFlag::Confirmed(value);
        }
    }
}
