use model::WaypointRole;

/// What the next map click will be interpreted as.
///
/// The machine is armed by a role selection and disarmed by the very next
/// map click; clicks arriving while idle are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    AwaitingPoint(WaypointRole),
}

impl InteractionState {
    /// Arms the machine for `role`. Always legal; a prior pending selection
    /// is overwritten, last writer wins.
    pub fn select_role(&mut self, role: WaypointRole) {
        *self = InteractionState::AwaitingPoint(role);
    }

    /// Consumes one map click. Returns the role the click was armed for and
    /// resets to `Idle`, or `None` when idle.
    pub fn consume_click(&mut self) -> Option<WaypointRole> {
        match *self {
            InteractionState::Idle => None,
            InteractionState::AwaitingPoint(role) => {
                *self = InteractionState::Idle;
                Some(role)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_ignores_clicks() {
        let mut state = InteractionState::default();
        assert_eq!(state.consume_click(), None);
        assert_eq!(state, InteractionState::Idle);
    }

    #[test]
    fn one_selection_arms_exactly_one_click() {
        let mut state = InteractionState::default();
        state.select_role(WaypointRole::Start);
        assert_eq!(state.consume_click(), Some(WaypointRole::Start));
        assert_eq!(state.consume_click(), None);
    }

    #[test]
    fn later_selection_overwrites_earlier_one() {
        let mut state = InteractionState::default();
        state.select_role(WaypointRole::Start);
        state.select_role(WaypointRole::End);
        assert_eq!(state.consume_click(), Some(WaypointRole::End));
    }
}
