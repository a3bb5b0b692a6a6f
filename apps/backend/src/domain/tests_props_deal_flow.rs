//! Property tests for the deal state machine (pure domain, no DB).

use proptest::prelude::*;

use crate::domain::deal_flow::{authorize_transition, DealCommand, Participants};
use crate::entities::deals::DealStatus;
use crate::errors::domain::DomainError;

fn any_status() -> impl Strategy<Value = DealStatus> {
    prop_oneof![
        Just(DealStatus::Pending),
        Just(DealStatus::Accepted),
        Just(DealStatus::Rejected),
        Just(DealStatus::Cancelled),
        Just(DealStatus::Completed),
    ]
}

fn any_command() -> impl Strategy<Value = DealCommand> {
    prop_oneof![
        Just(DealCommand::Accept),
        Just(DealCommand::Reject),
        Just(DealCommand::Cancel),
        Just(DealCommand::Complete),
    ]
}

proptest! {
    /// No command ever moves a deal out of a terminal status.
    #[test]
    fn prop_terminal_statuses_are_absorbing(
        command in any_command(),
        status in any_status().prop_filter("terminal only", |s| s.is_terminal()),
        actor in prop_oneof![Just(10i64), Just(20i64)],
    ) {
        let participants = Participants { proposer_id: 10, receiver_id: 20 };
        let result = authorize_transition(command, participants, actor, status);
        prop_assert!(result.is_err(), "terminal status must refuse {command:?}");
    }

    /// An authorized command succeeds exactly when the status matches its
    /// precondition, and the successor is the command's target.
    #[test]
    fn prop_success_iff_status_matches(
        command in any_command(),
        status in any_status(),
    ) {
        let participants = Participants { proposer_id: 10, receiver_id: 20 };
        // Pick an actor the command always authorizes.
        let actor = match command {
            DealCommand::Cancel => 10,
            _ => 20,
        };
        let result = authorize_transition(command, participants, actor, status);
        if status == command.required_status() {
            prop_assert_eq!(result.expect("precondition met"), command.target_status());
        } else {
            prop_assert!(matches!(result, Err(DomainError::Conflict(_, _))));
        }
    }

    /// Non-participants are always refused, regardless of command or status.
    #[test]
    fn prop_outsiders_always_forbidden(
        command in any_command(),
        status in any_status(),
        actor in 100i64..1_000,
    ) {
        let participants = Participants { proposer_id: 10, receiver_id: 20 };
        let result = authorize_transition(command, participants, actor, status);
        prop_assert!(matches!(result, Err(DomainError::Forbidden(_, _))));
    }
}
