use tower_sessions::{session::Error as SessionError, Session};

pub const USER_ID_KEY: &str = "user_id";
pub const ADMIN_ID_KEY: &str = "admin_id";
pub const AUTH_TIMESTAMP_KEY: &str = "auth_timestamp";

/// Who is making a request, as far as the session tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(i64),
    Admin(i64),
}

pub async fn viewer(session: &Session) -> Result<Viewer, SessionError> {
    if let Some(admin_id) = session.get::<i64>(ADMIN_ID_KEY).await? {
        return Ok(Viewer::Admin(admin_id));
    }
    if let Some(user_id) = session.get::<i64>(USER_ID_KEY).await? {
        return Ok(Viewer::User(user_id));
    }
    Ok(Viewer::Anonymous)
}

/// Replaces whatever the session held with an advertiser login. The session
/// id is rotated.
pub async fn start_user_session(session: &Session, user_id: i64) -> Result<(), SessionError> {
    session.clear().await;
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await?;
    session
        .insert(AUTH_TIMESTAMP_KEY, chrono::Utc::now().timestamp())
        .await?;
    Ok(())
}

/// Same as [`start_user_session`] for the moderation account.
pub async fn start_admin_session(session: &Session, admin_id: i64) -> Result<(), SessionError> {
    session.clear().await;
    session.cycle_id().await?;
    session.insert(ADMIN_ID_KEY, admin_id).await?;
    session
        .insert(AUTH_TIMESTAMP_KEY, chrono::Utc::now().timestamp())
        .await?;
    Ok(())
}

pub async fn end_session(session: &Session) -> Result<(), SessionError> {
    session.flush().await
}
