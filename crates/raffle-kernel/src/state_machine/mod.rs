use crate::error::StateMachineError;
use crate::types::AppState;

/// Validates a phase transition.
///
/// Illegal transitions return an error so callers can treat them as no-ops.
/// The debug panic can be enabled with the `strict-debug` feature.
pub fn validate_transition(from: AppState, to: AppState) -> Result<(), StateMachineError> {
    if allowed(from, to) {
        Ok(())
    } else {
        #[cfg(feature = "strict-debug")]
        panic!("Illegal state transition attempted: {:?} -> {:?}", from, to);

        Err(StateMachineError::IllegalTransition { from, to })
    }
}

/// Phases reachable from `from` in one step.
pub fn allowed_transitions(from: AppState) -> Vec<AppState> {
    use AppState::*;
    match from {
        Setup => vec![Ready, Finished],
        Ready => vec![Drawing, Ready],
        Drawing => vec![Ready, Finished],
        Finished => vec![Ready],
    }
}

fn allowed(from: AppState, to: AppState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
