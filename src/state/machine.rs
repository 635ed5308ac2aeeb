use super::error::{StateError, StateResult};
use super::{SessionEvent, SessionPhase, StateTransition};

#[derive(Debug)]
pub struct StateMachine {
    phase: SessionPhase,
    transition_history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn can_transition(&self, event: SessionEvent) -> bool {
        self.next_phase(event).is_some()
    }

    pub fn next_phase(&self, event: SessionEvent) -> Option<SessionPhase> {
        use SessionEvent::*;
        match (self.phase, event) {
            (SessionPhase::Idle, Open) => Some(SessionPhase::Active),
            (SessionPhase::Active, BeginSave) => Some(SessionPhase::Saving),
            (SessionPhase::Saving, SaveFailed) => Some(SessionPhase::Active),
            (SessionPhase::Saving, SaveSucceeded) => Some(SessionPhase::Closing),
            (SessionPhase::Active | SessionPhase::Saving | SessionPhase::Closing, Close) => {
                Some(SessionPhase::Idle)
            }
            _ => None,
        }
    }

    pub fn transition(&mut self, event: SessionEvent) -> StateResult<SessionPhase> {
        tracing::debug!(from = ?self.phase, event = ?event, "request session transition");
        let next = self.next_phase(event).ok_or_else(|| {
            let from = self.phase;
            tracing::warn!(from = ?from, event = ?event, "invalid session transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(self.phase, event, next);
        self.phase = next;
        self.transition_history.push(record);

        Ok(self.phase)
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionPhase::{:?}", self.phase)
    }
}
