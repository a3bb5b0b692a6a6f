use sea_orm::{ConnectionTrait, DatabaseTransaction};
use tracing::{info, warn};

use crate::errors::domain::{
    DomainError, ForbiddenKind, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::protocol::views::{LobbyDetailView, LobbyPlayerView, LobbyView};
use crate::repos::{deals, lobbies, memberships, players};
use crate::utils::join_code;

/// How many candidate codes to try before giving up. Collisions are rare at
/// realistic lobby counts, so exhausting this means something is wrong.
const CODE_ALLOCATION_ATTEMPTS: usize = 16;

/// Either side of the join endpoint's lobby reference: a numeric id or a
/// human-entered code.
#[derive(Debug, Clone)]
pub enum LobbyRef {
    Id(i64),
    Code(String),
}

async fn allocate_code(txn: &DatabaseTransaction) -> Result<String, DomainError> {
    for _ in 0..CODE_ALLOCATION_ATTEMPTS {
        let candidate = join_code::generate_join_code();
        if !lobbies::code_in_use(txn, &candidate).await? {
            return Ok(candidate);
        }
    }
    warn!(attempts = CODE_ALLOCATION_ATTEMPTS, "Join code allocation exhausted");
    Err(DomainError::infra(
        InfraErrorKind::CodesExhausted,
        "Could not allocate a unique lobby code; try again",
    ))
}

/// Create a lobby with the caller as host. The host's membership row is
/// written in the same transaction, keeping "host is always an active
/// member" true from the first commit.
pub async fn create_lobby(
    txn: &DatabaseTransaction,
    name: &str,
    host_id: i64,
) -> Result<LobbyView, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::MissingField,
            "lobby name must not be empty",
        ));
    }

    let code = allocate_code(txn).await?;
    let lobby = lobbies::create_lobby(txn, name, &code, host_id).await?;
    memberships::upsert_membership(txn, lobby.id, host_id).await?;

    info!(lobby_id = lobby.id, host_id, "Lobby created");
    Ok(LobbyView::from(&lobby))
}

/// Join by id or code. Rejoining after a leave reactivates the old row.
/// Returns the lobby with its resolved member list (the joiner included)
/// and the joiner's own entry for the broadcast.
pub async fn join_lobby(
    txn: &DatabaseTransaction,
    lobby_ref: LobbyRef,
    player_id: i64,
) -> Result<(LobbyDetailView, LobbyPlayerView), DomainError> {
    let lobby = match lobby_ref {
        LobbyRef::Id(id) => lobbies::require_active_lobby(txn, id).await?,
        LobbyRef::Code(ref code) => {
            if !join_code::is_valid_code(code) {
                return Err(DomainError::validation(
                    ValidationKind::Other("BadCode".into()),
                    "join code must be 6 characters from the code alphabet",
                ));
            }
            lobbies::find_active_by_code(txn, code).await?.ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Lobby, format!("No active lobby with code {code}"))
            })?
        }
    };

    let player = players::require_player(txn, player_id).await?;
    let membership = memberships::upsert_membership(txn, lobby.id, player_id).await?;

    info!(lobby_id = lobby.id, player_id, "Player joined lobby");
    let now = time::OffsetDateTime::now_utc();
    let entry = LobbyPlayerView::new(&player, &membership, lobby.host_id, now);
    let detail = detail_for(txn, &lobby).await?;
    Ok((detail, entry))
}

/// Leave a lobby. The host cannot leave, only dissolve.
pub async fn leave_lobby(
    txn: &DatabaseTransaction,
    lobby_id: i64,
    player_id: i64,
) -> Result<(), DomainError> {
    let lobby = lobbies::require_active_lobby(txn, lobby_id).await?;
    if lobby.host_id == player_id {
        return Err(DomainError::forbidden(
            ForbiddenKind::HostCannotLeave,
            "the host cannot leave; dissolve the lobby instead",
        ));
    }

    let membership = memberships::find_membership(txn, lobby_id, player_id)
        .await?
        .filter(|m| m.is_active)
        .ok_or_else(|| {
            DomainError::forbidden(
                ForbiddenKind::NotAMember,
                format!("Player {player_id} is not an active member of lobby {lobby_id}"),
            )
        })?;

    memberships::deactivate_membership(txn, membership.id).await?;
    info!(lobby_id, player_id, "Player left lobby");
    Ok(())
}

/// Dissolve a lobby: host only. Deactivates the lobby and every membership,
/// and cancels all still-pending deals. Accepted deals keep their status so
/// both sides retain the record of what was agreed.
pub async fn dissolve_lobby(
    txn: &DatabaseTransaction,
    lobby_id: i64,
    player_id: i64,
) -> Result<(), DomainError> {
    let lobby = lobbies::require_active_lobby(txn, lobby_id).await?;
    if lobby.host_id != player_id {
        return Err(DomainError::forbidden(
            ForbiddenKind::NotHost,
            "only the host may dissolve a lobby",
        ));
    }

    lobbies::deactivate_lobby(txn, lobby_id).await?;
    let members = memberships::deactivate_all_for_lobby(txn, lobby_id).await?;
    let cancelled = deals::cancel_pending_for_lobby(txn, lobby_id).await?;

    info!(lobby_id, members, cancelled, "Lobby dissolved");
    Ok(())
}

async fn detail_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    lobby: &lobbies::Lobby,
) -> Result<LobbyDetailView, DomainError> {
    let members = memberships::find_active_members(conn, lobby.id).await?;

    let now = time::OffsetDateTime::now_utc();
    let mut entries = Vec::with_capacity(members.len());
    for membership in &members {
        let player = players::require_player(conn, membership.player_id).await?;
        entries.push(LobbyPlayerView::new(&player, membership, lobby.host_id, now));
    }

    Ok(LobbyDetailView {
        lobby: LobbyView::from(lobby),
        players: entries,
    })
}

/// Lobby detail: the lobby row plus every active member with liveness.
pub async fn get_lobby<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    lobby_id: i64,
) -> Result<LobbyDetailView, DomainError> {
    let lobby = lobbies::require_active_lobby(conn, lobby_id).await?;
    detail_for(conn, &lobby).await
}

/// Lookup by join code, active lobbies only. Lets a client preview a lobby
/// before joining it.
pub async fn get_lobby_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<LobbyDetailView, DomainError> {
    if !join_code::is_valid_code(code) {
        return Err(DomainError::validation(
            ValidationKind::Other("BadCode".into()),
            "join code must be 6 characters from the code alphabet",
        ));
    }
    let lobby = lobbies::find_active_by_code(conn, code).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Lobby, format!("No active lobby with code {code}"))
    })?;
    detail_for(conn, &lobby).await
}

/// Active lobbies the player is currently a member of.
pub async fn list_lobbies_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Vec<LobbyView>, DomainError> {
    let lobbies = lobbies::find_active_for_player(conn, player_id).await?;
    Ok(lobbies.iter().map(LobbyView::from).collect())
}
