//! Once-per-run fixture bundle
//!
//! Fixture handles are ephemeral: the server owns the real records, and a
//! fresh uniquely-named set is created for every run.

use crate::api::types::{Channel, Team, User};
use crate::api::ApiClient;
use crate::common::config::ServerConfig;
use crate::common::Result;

/// URL name and display name of the channel the scenarios revolve around
pub const TEST_CHANNEL_NAME: &str = "channel-test";
pub const TEST_CHANNEL_DISPLAY: &str = "Channel";

/// Fixture handles shared by every scenario in a run
pub struct SuiteFixtures {
    /// Admin account (config updates, team/user creation)
    pub admin: User,
    /// Team scoping all channels and navigation URLs
    pub team: Team,
    /// Primary user: member of the team, creator of the test channel
    pub owner: User,
    /// Secondary user: plain team member, exercises the non-owner path
    pub member: User,
    /// Public channel created by the owner
    pub channel: Channel,
}

impl SuiteFixtures {
    /// Build the fixture set through the REST API
    ///
    /// Any failure here aborts the whole run; scenarios never start
    /// against a half-built world.
    pub async fn build(api: &mut ApiClient, server: &ServerConfig) -> Result<Self> {
        let admin = api.admin_login(server).await?;
        let (team, owner) = api.init_setup().await?;

        let member = api.create_user().await?;
        api.add_user_to_team(&team.id, &member.id).await?;

        api.login(&owner.username, &owner.password).await?;
        let channel = api
            .create_channel(&team.id, TEST_CHANNEL_NAME, TEST_CHANNEL_DISPLAY)
            .await?;

        Ok(Self {
            admin,
            team,
            owner,
            member,
            channel,
        })
    }
}
