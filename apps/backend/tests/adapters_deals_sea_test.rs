//! Mock-connection tests for the conditional deal status update. The
//! interesting behavior is what happens when the guarded UPDATE matches no
//! rows: a lost race and a missing deal must come back as different errors.

use backend::adapters::deals_sea;
use backend::entities::deals::{self, DealStatus};
use backend::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use backend::infra::db_errors::map_db_err;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use time::macros::datetime;

fn deal_row(status: DealStatus) -> deals::Model {
    deals::Model {
        id: 1,
        lobby_id: 10,
        proposer_id: 100,
        receiver_id: 200,
        notes: None,
        summary: None,
        status,
        created_at: datetime!(2026-01-01 00:00:00 UTC),
        updated_at: datetime!(2026-01-01 00:00:00 UTC),
    }
}

#[tokio::test]
async fn transition_succeeds_when_row_matches_expected_status() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .append_query_results([vec![deal_row(DealStatus::Accepted)]])
        .into_connection();

    let deal = deals_sea::transition_status(&db, 1, DealStatus::Pending, DealStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(deal.status, DealStatus::Accepted);
}

#[tokio::test]
async fn lost_race_maps_to_state_changed_conflict() {
    // UPDATE matches nothing, refetch shows someone already rejected it.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .append_query_results([vec![deal_row(DealStatus::Rejected)]])
        .into_connection();

    let err = deals_sea::transition_status(&db, 1, DealStatus::Pending, DealStatus::Accepted)
        .await
        .unwrap_err();

    match map_db_err(err) {
        DomainError::Conflict(ConflictKind::DealStateChanged, detail) => {
            assert!(detail.contains("rejected"), "detail was: {detail}");
        }
        other => panic!("expected DealStateChanged conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn vanished_deal_maps_to_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .append_query_results([Vec::<deals::Model>::new()])
        .into_connection();

    let err = deals_sea::transition_status(&db, 1, DealStatus::Pending, DealStatus::Accepted)
        .await
        .unwrap_err();

    match map_db_err(err) {
        DomainError::NotFound(NotFoundKind::Deal, _) => {}
        other => panic!("expected Deal not found, got {other:?}"),
    }
}
