use super::model::SessionPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Open,
    BeginSave,
    SaveSucceeded,
    SaveFailed,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: SessionPhase,
    pub event: SessionEvent,
    pub to: SessionPhase,
}

impl StateTransition {
    pub const fn new(from: SessionPhase, event: SessionEvent, to: SessionPhase) -> Self {
        Self { from, event, to }
    }
}
