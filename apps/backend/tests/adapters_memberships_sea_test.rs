//! Mock-connection tests for the membership upsert: one row per
//! (lobby, player), and a rejoin flips the old row back on instead of
//! inserting a duplicate.

use backend::adapters::memberships_sea::{self, MembershipKey};
use backend::entities::lobby_players;
use sea_orm::{DatabaseBackend, MockDatabase, TransactionTrait};
use time::macros::datetime;

const KEY: MembershipKey = MembershipKey {
    lobby_id: 10,
    player_id: 100,
};

fn membership_row(is_active: bool) -> lobby_players::Model {
    lobby_players::Model {
        id: 7,
        lobby_id: 10,
        player_id: 100,
        joined_at: datetime!(2026-01-01 00:00:00 UTC),
        is_active,
        updated_at: datetime!(2026-01-01 00:00:00 UTC),
    }
}

#[tokio::test]
async fn joining_twice_issues_no_writes() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![membership_row(true)]])
        .into_connection();

    let txn = db.begin().await.unwrap();
    let membership = memberships_sea::upsert_membership(&txn, KEY).await.unwrap();
    txn.commit().await.unwrap();

    assert_eq!(membership.id, 7);
    assert!(membership.is_active);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(!log.contains("INSERT"), "unexpected insert: {log}");
    assert!(!log.contains("UPDATE"), "unexpected update: {log}");
}

#[tokio::test]
async fn rejoin_reactivates_the_existing_row() {
    let reactivated = lobby_players::Model {
        is_active: true,
        ..membership_row(false)
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![membership_row(false)]])
        .append_query_results([vec![reactivated]])
        .into_connection();

    let txn = db.begin().await.unwrap();
    let membership = memberships_sea::upsert_membership(&txn, KEY).await.unwrap();
    txn.commit().await.unwrap();

    // Same row, flipped back on; joined_at keeps the original join time.
    assert_eq!(membership.id, 7);
    assert!(membership.is_active);
    assert_eq!(
        membership.joined_at,
        datetime!(2026-01-01 00:00:00 UTC)
    );

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("UPDATE"), "expected an update: {log}");
    assert!(!log.contains("INSERT"), "unexpected insert: {log}");
}

#[tokio::test]
async fn first_join_inserts_an_active_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<lobby_players::Model>::new()])
        .append_query_results([vec![membership_row(true)]])
        .into_connection();

    let txn = db.begin().await.unwrap();
    let membership = memberships_sea::upsert_membership(&txn, KEY).await.unwrap();
    txn.commit().await.unwrap();

    assert!(membership.is_active);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("INSERT"), "expected an insert: {log}");
}
