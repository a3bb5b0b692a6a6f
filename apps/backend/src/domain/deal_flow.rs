//! Deal lifecycle rules: which transitions exist and who may request them.
//!
//! Everything here is pure. The repo layer enforces the same status
//! precondition again with a conditional update, so a concurrent transition
//! that slips past this check still loses the race cleanly.

use crate::entities::deals::DealStatus;
use crate::errors::domain::{ConflictKind, DomainError, ForbiddenKind};

/// The four requestable lifecycle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealCommand {
    Accept,
    Reject,
    Cancel,
    Complete,
}

impl DealCommand {
    /// Status the deal must currently hold for this command to apply.
    pub fn required_status(self) -> DealStatus {
        match self {
            DealCommand::Accept | DealCommand::Reject | DealCommand::Cancel => DealStatus::Pending,
            DealCommand::Complete => DealStatus::Accepted,
        }
    }

    /// Status the deal moves to when the command succeeds.
    pub fn target_status(self) -> DealStatus {
        match self {
            DealCommand::Accept => DealStatus::Accepted,
            DealCommand::Reject => DealStatus::Rejected,
            DealCommand::Cancel => DealStatus::Cancelled,
            DealCommand::Complete => DealStatus::Completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DealCommand::Accept => "accept",
            DealCommand::Reject => "reject",
            DealCommand::Cancel => "cancel",
            DealCommand::Complete => "complete",
        }
    }
}

/// The two deal participants, as seen by the authorization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participants {
    pub proposer_id: i64,
    pub receiver_id: i64,
}

/// Check that `actor_id` is allowed to issue `command` on a deal between
/// these participants. Accept/reject belong to the receiver, cancel to the
/// proposer, complete to either side.
pub fn authorize(
    command: DealCommand,
    participants: Participants,
    actor_id: i64,
) -> Result<(), DomainError> {
    let Participants {
        proposer_id,
        receiver_id,
    } = participants;
    match command {
        DealCommand::Accept | DealCommand::Reject => {
            if actor_id != receiver_id {
                return Err(DomainError::forbidden(
                    ForbiddenKind::NotReceiver,
                    format!("only the receiver may {} a deal", command.as_str()),
                ));
            }
        }
        DealCommand::Cancel => {
            if actor_id != proposer_id {
                return Err(DomainError::forbidden(
                    ForbiddenKind::NotProposer,
                    "only the proposer may cancel a deal",
                ));
            }
        }
        DealCommand::Complete => {
            if actor_id != proposer_id && actor_id != receiver_id {
                return Err(DomainError::forbidden(
                    ForbiddenKind::NotParticipant,
                    "only a deal participant may complete it",
                ));
            }
        }
    }
    Ok(())
}

/// Check the status precondition for `command` against the observed status.
pub fn check_status(command: DealCommand, current: DealStatus) -> Result<(), DomainError> {
    let required = command.required_status();
    if current != required {
        return Err(DomainError::conflict(
            ConflictKind::DealStateChanged,
            format!(
                "cannot {} a deal in status {}, expected {}",
                command.as_str(),
                current.as_str(),
                required.as_str()
            ),
        ));
    }
    Ok(())
}

/// Full pure-side gate: authorization first, then the status precondition.
/// Order matters for error reporting: a non-participant poking at a settled
/// deal should see Forbidden, not Conflict.
pub fn authorize_transition(
    command: DealCommand,
    participants: Participants,
    actor_id: i64,
    current: DealStatus,
) -> Result<DealStatus, DomainError> {
    authorize(command, participants, actor_id)?;
    check_status(command, current)?;
    Ok(command.target_status())
}
