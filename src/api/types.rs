//! Fixture handle types returned by the chat server's REST API

use serde::{Deserialize, Serialize};

/// A user created (or logged in) through the fixture API
///
/// The server never echoes passwords; the client fills `password` in after
/// creation/login so later identity switches can re-authenticate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(skip)]
    pub password: String,
}

/// A team scoping channel creation and navigation URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub display_name: String,
}

/// A channel within a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub team_id: String,
}

/// Error body shape for non-2xx fixture API responses
#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_password_never_read_from_wire() {
        let user: User = serde_json::from_str(
            r#"{"id": "u1", "username": "alice", "email": "alice@example.test", "password": "leaked"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.password, "");
    }

    #[test]
    fn test_channel_parses_server_shape() {
        let channel: Channel = serde_json::from_str(
            r#"{"id": "c1", "name": "channel-test", "display_name": "Channel", "team_id": "t1", "type": "O"}"#,
        )
        .unwrap();
        assert_eq!(channel.name, "channel-test");
        assert_eq!(channel.display_name, "Channel");
    }
}
