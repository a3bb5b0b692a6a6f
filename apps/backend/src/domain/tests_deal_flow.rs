use crate::domain::deal_flow::{authorize_transition, DealCommand, Participants};
use crate::entities::deals::DealStatus;
use crate::errors::domain::{ConflictKind, DomainError, ForbiddenKind};

const PROPOSER: i64 = 10;
const RECEIVER: i64 = 20;
const STRANGER: i64 = 99;

fn pair() -> Participants {
    Participants {
        proposer_id: PROPOSER,
        receiver_id: RECEIVER,
    }
}

#[test]
fn receiver_accepts_pending_deal() {
    let next = authorize_transition(DealCommand::Accept, pair(), RECEIVER, DealStatus::Pending)
        .expect("receiver may accept");
    assert_eq!(next, DealStatus::Accepted);
}

#[test]
fn receiver_rejects_pending_deal() {
    let next = authorize_transition(DealCommand::Reject, pair(), RECEIVER, DealStatus::Pending)
        .expect("receiver may reject");
    assert_eq!(next, DealStatus::Rejected);
}

#[test]
fn proposer_cannot_accept_own_deal() {
    let err = authorize_transition(DealCommand::Accept, pair(), PROPOSER, DealStatus::Pending)
        .expect_err("proposer must not accept");
    assert!(matches!(
        err,
        DomainError::Forbidden(ForbiddenKind::NotReceiver, _)
    ));
}

#[test]
fn proposer_cancels_pending_deal() {
    let next = authorize_transition(DealCommand::Cancel, pair(), PROPOSER, DealStatus::Pending)
        .expect("proposer may cancel");
    assert_eq!(next, DealStatus::Cancelled);
}

#[test]
fn receiver_cannot_cancel() {
    let err = authorize_transition(DealCommand::Cancel, pair(), RECEIVER, DealStatus::Pending)
        .expect_err("receiver must not cancel");
    assert!(matches!(
        err,
        DomainError::Forbidden(ForbiddenKind::NotProposer, _)
    ));
}

#[test]
fn either_participant_completes_accepted_deal() {
    for actor in [PROPOSER, RECEIVER] {
        let next =
            authorize_transition(DealCommand::Complete, pair(), actor, DealStatus::Accepted)
                .expect("participant may complete");
        assert_eq!(next, DealStatus::Completed);
    }
}

#[test]
fn stranger_cannot_complete() {
    let err = authorize_transition(DealCommand::Complete, pair(), STRANGER, DealStatus::Accepted)
        .expect_err("stranger must not complete");
    assert!(matches!(
        err,
        DomainError::Forbidden(ForbiddenKind::NotParticipant, _)
    ));
}

#[test]
fn accept_on_settled_deal_is_conflict() {
    for settled in [
        DealStatus::Accepted,
        DealStatus::Rejected,
        DealStatus::Cancelled,
        DealStatus::Completed,
    ] {
        let err = authorize_transition(DealCommand::Accept, pair(), RECEIVER, settled)
            .expect_err("accept requires pending");
        assert!(matches!(
            err,
            DomainError::Conflict(ConflictKind::DealStateChanged, _)
        ));
    }
}

#[test]
fn complete_requires_accepted() {
    let err = authorize_transition(DealCommand::Complete, pair(), RECEIVER, DealStatus::Pending)
        .expect_err("complete requires accepted");
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::DealStateChanged, _)
    ));
}

#[test]
fn forbidden_wins_over_conflict_for_outsiders() {
    // A non-participant on a completed deal sees Forbidden, not Conflict.
    let err = authorize_transition(DealCommand::Accept, pair(), STRANGER, DealStatus::Completed)
        .expect_err("stranger rejected first");
    assert!(matches!(err, DomainError::Forbidden(_, _)));
}

#[test]
fn terminal_statuses_are_marked_terminal() {
    assert!(!DealStatus::Pending.is_terminal());
    assert!(!DealStatus::Accepted.is_terminal());
    assert!(DealStatus::Rejected.is_terminal());
    assert!(DealStatus::Cancelled.is_terminal());
    assert!(DealStatus::Completed.is_terminal());
}
