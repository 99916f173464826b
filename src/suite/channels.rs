//! Channel discovery scenarios
//!
//! Two scenarios drive the "More Channels" modal: one checks that the
//! mode selector only exists while the archived-channels flag is on, the
//! other walks the full join → archive → rediscover flow.

use crate::browser::ui::{ChannelView, MoreChannelsModal, Sidebar};
use crate::common::{Error, Result};

use super::runner::ScenarioCx;

pub const MODAL_SELECTION: &str = "more-channels-modal";
pub const VIEW_ARCHIVED: &str = "view-archived-channels";

/// Banner shown when viewing an archived channel
pub const ARCHIVED_BANNER_TEXT: &str =
    "You are viewing an archived channel. New messages cannot be posted.";

/// Labels the mode selector cycles through
const LABEL_PUBLIC: &str = "Show: Public Channels";

/// The mode selector exists exactly when the flag is enabled, for admin
/// and regular users alike.
pub async fn modal_archived_selection(cx: &mut ScenarioCx<'_>) -> Result<()> {
    verify_modal_archived_selection(cx, false).await?;
    verify_modal_archived_selection(cx, true).await
}

/// Toggle the flag, then check the modal under both identities
async fn verify_modal_archived_selection(cx: &mut ScenarioCx<'_>, enabled: bool) -> Result<()> {
    cx.set_archived_flag(enabled).await?;
    cx.step(&format!("archived-channels flag set to {enabled}"));

    let admin = cx.fixtures.admin.clone();
    cx.browser_login(&admin).await?;
    cx.session.goto(&cx.channel_url("town-square")).await?;
    verify_more_channels_modal(cx, enabled).await?;
    cx.step("modal verified as admin");

    let owner = cx.fixtures.owner.clone();
    cx.browser_login(&owner).await?;
    cx.session.goto(&cx.channel_url("town-square")).await?;
    verify_more_channels_modal(cx, enabled).await?;
    cx.step("modal verified as regular user");

    Ok(())
}

/// Open the modal and check the mode selector against the flag state
async fn verify_more_channels_modal(cx: &ScenarioCx<'_>, enabled: bool) -> Result<()> {
    Sidebar::new(cx.session).open_more_channels().await?;
    let modal = MoreChannelsModal::new(cx.session);

    if enabled {
        modal.assert_dropdown_label(LABEL_PUBLIC).await
    } else if modal.dropdown_exists().await? {
        Err(Error::assertion(
            "mode selector",
            "absent while the flag is disabled",
            "present",
        ))
    } else {
        Ok(())
    }
}

/// Full flow: a member joins the channel through discovery, the owner
/// archives it, and the channel stays reachable only under the archived
/// filter, read-only.
pub async fn view_archived_channels(cx: &mut ScenarioCx<'_>) -> Result<()> {
    let team = cx.fixtures.team.clone();
    let channel = cx.fixtures.channel.clone();

    cx.set_archived_flag(true).await?;
    cx.step("archived-channels flag enabled");

    // Member discovers and joins the channel through the modal
    let member = cx.fixtures.member.clone();
    cx.browser_login(&member).await?;
    cx.session.goto(&cx.channel_url("town-square")).await?;

    Sidebar::new(cx.session).open_more_channels().await?;
    let modal = MoreChannelsModal::new(cx.session);
    modal.assert_dropdown_label(LABEL_PUBLIC).await?;
    modal.search(&channel.display_name).await?;
    assert_single_result(&modal, &channel.display_name).await?;
    modal.clear_search().await?;
    modal.click_channel(&channel.display_name).await?;

    modal.wait_closed().await?;
    cx.session
        .wait_url_contains(&format!("/{}/channels/{}", team.name, channel.name))
        .await?;
    cx.step("member joined the channel from the discovery modal");

    // Owner archives it through the channel menu
    let owner = cx.fixtures.owner.clone();
    cx.browser_login(&owner).await?;
    cx.session.goto(&cx.channel_url(&channel.name)).await?;

    let view = ChannelView::new(cx.session);
    view.open_header_menu(&channel.display_name).await?;
    view.archive_via_menu().await?;
    cx.step("owner archived the channel");

    // The channel is now only reachable under the archived filter
    Sidebar::new(cx.session).open_more_channels().await?;
    let modal = MoreChannelsModal::new(cx.session);
    modal.switch_to_archived().await?;
    modal.search(&channel.display_name).await?;
    assert_single_result(&modal, &channel.display_name).await?;
    modal.clear_search().await?;
    modal.click_channel(&channel.display_name).await?;
    modal.wait_closed().await?;
    cx.step("archived channel found under the archived filter");

    // Viewing is read-only: banner up, composer gone
    let view = ChannelView::new(cx.session);
    let banner = view.archived_banner_text().await?;
    if banner != ARCHIVED_BANNER_TEXT {
        return Err(Error::assertion(
            "archived banner",
            format!("'{ARCHIVED_BANNER_TEXT}'"),
            format!("'{banner}'"),
        ));
    }
    if view.composer_exists().await? {
        return Err(Error::assertion(
            "message composer",
            "absent on an archived channel",
            "present",
        ));
    }
    cx.step("archived channel is read-only");

    // And it is gone from the public sidebar group
    let sidebar = Sidebar::new(cx.session);
    sidebar.switch_to("town-square").await?;
    let list = sidebar.public_list_text().await?;
    if list.contains(&channel.display_name) {
        return Err(Error::assertion(
            "public sidebar list",
            format!("no '{}' entry", channel.display_name),
            "still listed",
        ));
    }
    cx.step("archived channel removed from the public sidebar list");

    Ok(())
}

/// Exactly one search result, named as expected
async fn assert_single_result(
    modal: &MoreChannelsModal<'_>,
    display_name: &str,
) -> Result<()> {
    let rows = modal.row_texts().await?;
    if rows.len() != 1 {
        return Err(Error::assertion(
            "search results",
            "exactly one channel",
            format!("{} ({:?})", rows.len(), rows),
        ));
    }
    if rows[0] != display_name {
        return Err(Error::assertion(
            "search result",
            format!("'{display_name}'"),
            format!("'{}'", rows[0]),
        ));
    }
    Ok(())
}
