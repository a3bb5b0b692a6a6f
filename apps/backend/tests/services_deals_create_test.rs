//! Mock-connection tests for deal creation: validation runs before any row
//! is written, and the deal plus its action rows land in one transaction.

use backend::domain::actions::{DealAction, PaymentCondition};
use backend::entities::deals::DealStatus;
use backend::entities::{deal_actions, deals, lobbies, lobby_players, players};
use backend::errors::domain::{DomainError, ValidationKind};
use backend::services::deals::{self as deals_service, DealProposal};
use sea_orm::{DatabaseBackend, MockDatabase, TransactionTrait};
use time::macros::datetime;

fn t0() -> time::OffsetDateTime {
    datetime!(2026-01-01 00:00:00 UTC)
}

fn payment() -> DealAction {
    DealAction::Payment {
        amount: 50,
        condition: PaymentCondition::OnCompletion,
    }
}

fn escort() -> DealAction {
    DealAction::Custom {
        text: "Escort the convoy".to_string(),
    }
}

fn proposal(receiver_id: i64) -> DealProposal {
    DealProposal {
        lobby_id: 10,
        receiver_id,
        proposer_actions: vec![payment()],
        receiver_actions: vec![escort()],
        notes: None,
        summary: Some("Payment for escort".to_string()),
    }
}

fn lobby_row() -> lobbies::Model {
    lobbies::Model {
        id: 10,
        name: "Trade table".to_string(),
        code: "ABC234".to_string(),
        host_id: 100,
        is_active: true,
        created_at: t0(),
        updated_at: t0(),
    }
}

fn member_row(id: i64, player_id: i64) -> lobby_players::Model {
    lobby_players::Model {
        id,
        lobby_id: 10,
        player_id,
        joined_at: t0(),
        is_active: true,
        updated_at: t0(),
    }
}

fn player_row(id: i64, name: &str) -> players::Model {
    players::Model {
        id,
        sub: format!("sub-{id}"),
        name: name.to_string(),
        last_active: t0(),
        created_at: t0(),
        updated_at: t0(),
    }
}

fn deal_row() -> deals::Model {
    deals::Model {
        id: 77,
        lobby_id: 10,
        proposer_id: 100,
        receiver_id: 200,
        notes: None,
        summary: Some("Payment for escort".to_string()),
        status: DealStatus::Pending,
        created_at: t0(),
        updated_at: t0(),
    }
}

fn action_row(id: i64, player_id: i64, action: &DealAction) -> deal_actions::Model {
    deal_actions::Model {
        id,
        deal_id: 77,
        player_id,
        kind: action.kind(),
        payload: serde_json::to_value(action).unwrap(),
        created_at: t0(),
    }
}

#[tokio::test]
async fn same_participant_is_rejected_before_any_statement() {
    // No results are queued, so any statement would surface as an error
    // instead of this validation failure.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let txn = db.begin().await.unwrap();

    let err = deals_service::create_deal(&txn, 5, proposal(5))
        .await
        .unwrap_err();
    match err {
        DomainError::Validation(ValidationKind::SameParticipant, _) => {}
        other => panic!("expected SameParticipant validation, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_action_lists_are_rejected_before_any_statement() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let txn = db.begin().await.unwrap();

    let mut empty = proposal(200);
    empty.proposer_actions.clear();
    empty.receiver_actions.clear();

    let err = deals_service::create_deal(&txn, 100, empty)
        .await
        .unwrap_err();
    match err {
        DomainError::Validation(ValidationKind::NoActions, _) => {}
        other => panic!("expected NoActions validation, got {other:?}"),
    }
}

#[tokio::test]
async fn deal_and_actions_commit_in_one_transaction() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![lobby_row()]])
        .append_query_results([vec![member_row(1, 100)], vec![member_row(2, 200)]])
        .append_query_results([vec![deal_row()]])
        .append_query_results([
            vec![action_row(1, 100, &payment())],
            vec![action_row(2, 200, &escort())],
            vec![action_row(1, 100, &payment()), action_row(2, 200, &escort())],
        ])
        .append_query_results([vec![player_row(100, "Ada")], vec![player_row(200, "Grace")]])
        .into_connection();

    let txn = db.begin().await.unwrap();
    let view = deals_service::create_deal(&txn, 100, proposal(200))
        .await
        .unwrap();
    txn.commit().await.unwrap();

    assert_eq!(view.id, 77);
    assert_eq!(view.status, DealStatus::Pending);
    assert_eq!(view.proposer_name, "Ada");
    assert_eq!(view.receiver_name, "Grace");
    assert_eq!(view.actions.len(), 2);
    assert_eq!(view.actions[0].player_id, 100);
    assert_eq!(view.actions[1].player_id, 200);

    // The deal insert and both action inserts share one transaction, so a
    // failure anywhere would have rolled all of them back.
    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1, "expected a single wrapping transaction");
}
