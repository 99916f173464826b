//! Page objects for the channel discovery UI
//!
//! Every DOM region the suite touches is named here by a stable CSS
//! identifier, so scenarios read as user actions rather than selector
//! plumbing.

use crate::common::{Error, Result};

use super::session::Session;

pub mod selectors {
    //! Stable identifiers of the discovery UI

    /// Public-channel group in the left-hand sidebar
    pub const PUBLIC_CHANNEL_LIST: &str = "#publicChannelList";
    /// "More..." trigger under the public-channel group
    pub const MORE_CHANNELS_TRIGGER: &str = "#sidebarChannelsMore";
    /// Channel discovery modal
    pub const MORE_CHANNELS_MODAL: &str = "#moreChannelsModal";
    /// Mode selector inside the modal (only rendered when the
    /// archived-channels flag is enabled)
    pub const CHANNELS_MORE_DROPDOWN: &str = "#channelsMoreDropdown";
    /// Dropdown menu entries
    pub const DROPDOWN_PUBLIC_OPTION: &str = "#channelsMoreDropdownPublic";
    pub const DROPDOWN_ARCHIVED_OPTION: &str = "#channelsMoreDropdownArchived";
    /// Channel search box inside the modal
    pub const SEARCH_CHANNELS_TEXTBOX: &str = "#searchChannelsTextbox";
    /// Result list and its rows
    pub const MORE_CHANNELS_LIST: &str = "#moreChannelsList";
    pub const MORE_CHANNELS_ROW: &str = "#moreChannelsList .more-modal-row";
    /// Channel header title (opens the channel menu on click)
    pub const CHANNEL_HEADER_TITLE: &str = "#channelHeaderTitle";
    /// Channel menu and its archive entry
    pub const CHANNEL_MENU: &str = ".Menu__content";
    pub const ARCHIVE_CHANNEL_ITEM: &str = "#channelArchiveChannel";
    /// Archive confirmation dialog and its confirm button
    pub const DELETE_CHANNEL_MODAL: &str = "#deleteChannelModal";
    pub const DELETE_CHANNEL_CONFIRM: &str = "#deleteChannelModalDeleteButton";
    /// Read-only banner shown on archived channels
    pub const ARCHIVED_CHANNEL_BANNER: &str = "#channelArchivedMessage";
    /// Message composer input
    pub const POST_TEXTBOX: &str = "#post_textbox";

    /// Sidebar entry for a channel, by its URL name
    pub fn sidebar_item(channel_name: &str) -> String {
        format!("#sidebarItem_{channel_name}")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_sidebar_item_selector() {
            assert_eq!(sidebar_item("town-square"), "#sidebarItem_town-square");
            assert_eq!(sidebar_item("channel-test"), "#sidebarItem_channel-test");
        }
    }
}

use selectors::*;

/// Left-hand sidebar
pub struct Sidebar<'a> {
    session: &'a Session,
}

impl<'a> Sidebar<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Open the "More Channels" modal from the public-channel group
    pub async fn open_more_channels(&self) -> Result<()> {
        self.session.wait_for(PUBLIC_CHANNEL_LIST).await?;
        let trigger = self.session.wait_for(MORE_CHANNELS_TRIGGER).await?;
        self.session.click(&trigger).await?;
        self.session.wait_for(MORE_CHANNELS_MODAL).await?;
        Ok(())
    }

    /// Switch to a channel by clicking its sidebar entry
    pub async fn switch_to(&self, channel_name: &str) -> Result<()> {
        let item = self.session.wait_for(&sidebar_item(channel_name)).await?;
        self.session.click(&item).await?;
        self.session
            .wait_url_contains(&format!("/channels/{channel_name}"))
            .await
    }

    /// Rendered text of the public-channel group
    pub async fn public_list_text(&self) -> Result<String> {
        let list = self.session.wait_for(PUBLIC_CHANNEL_LIST).await?;
        self.session.text(&list).await
    }
}

/// The channel discovery modal
pub struct MoreChannelsModal<'a> {
    session: &'a Session,
}

impl<'a> MoreChannelsModal<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Whether the mode selector is in the DOM at all (no waiting)
    pub async fn dropdown_exists(&self) -> Result<bool> {
        self.session.exists(CHANNELS_MORE_DROPDOWN).await
    }

    /// Assert the mode selector is visible with exactly this label
    pub async fn assert_dropdown_label(&self, expected: &str) -> Result<()> {
        let dropdown = self.session.wait_for(CHANNELS_MORE_DROPDOWN).await?;
        if !self.session.is_displayed(&dropdown).await? {
            return Err(Error::assertion("mode selector", "visible", "hidden"));
        }
        let label = self.session.text(&dropdown).await?;
        if label != expected {
            return Err(Error::assertion(
                "mode selector label",
                format!("'{expected}'"),
                format!("'{label}'"),
            ));
        }
        Ok(())
    }

    /// Switch the selector to archived channels and wait for its label to
    /// reflect the new mode
    pub async fn switch_to_archived(&self) -> Result<()> {
        let dropdown = self.session.wait_for(CHANNELS_MORE_DROPDOWN).await?;
        self.session.click(&dropdown).await?;
        let option = self.session.wait_for(DROPDOWN_ARCHIVED_OPTION).await?;
        self.session.click(&option).await?;
        self.session
            .wait_for_text(CHANNELS_MORE_DROPDOWN, "Show: Archived Channels")
            .await?;
        Ok(())
    }

    /// Type into the channel search box and let results settle
    pub async fn search(&self, text: &str) -> Result<()> {
        let textbox = self.session.wait_for(SEARCH_CHANNELS_TEXTBOX).await?;
        self.session.send_keys(&textbox, text).await?;
        self.session.settle().await;
        Ok(())
    }

    /// Clear the channel search box
    pub async fn clear_search(&self) -> Result<()> {
        let textbox = self.session.wait_for(SEARCH_CHANNELS_TEXTBOX).await?;
        self.session.clear(&textbox).await?;
        self.session.settle().await;
        Ok(())
    }

    /// Display names currently listed in the result list
    pub async fn row_texts(&self) -> Result<Vec<String>> {
        self.session.wait_for(MORE_CHANNELS_LIST).await?;
        let rows = self.session.find_all(MORE_CHANNELS_ROW).await?;
        let mut texts = Vec::with_capacity(rows.len());
        for row in &rows {
            texts.push(self.session.text(row).await?);
        }
        Ok(texts)
    }

    /// Click the listed channel with this display name
    pub async fn click_channel(&self, display_name: &str) -> Result<()> {
        let rows = self.session.find_all(MORE_CHANNELS_ROW).await?;
        for row in &rows {
            if self.session.text(row).await? == display_name {
                self.session.click(row).await?;
                return Ok(());
            }
        }
        Err(Error::assertion(
            "discovery list",
            format!("a row named '{display_name}'"),
            format!("{} other rows", rows.len()),
        ))
    }

    /// Wait for the modal to close
    pub async fn wait_closed(&self) -> Result<()> {
        self.session.wait_gone(MORE_CHANNELS_MODAL).await
    }
}

/// The channel view behind the modal
pub struct ChannelView<'a> {
    session: &'a Session,
}

impl<'a> ChannelView<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Assert the header shows this channel, then open the channel menu
    pub async fn open_header_menu(&self, display_name: &str) -> Result<()> {
        let header = self
            .session
            .wait_for_text(CHANNEL_HEADER_TITLE, display_name)
            .await?;
        self.session.click(&header).await?;
        self.session.wait_for(CHANNEL_MENU).await?;
        Ok(())
    }

    /// Archive the channel through the menu and its confirmation dialog
    pub async fn archive_via_menu(&self) -> Result<()> {
        let item = self.session.wait_for(ARCHIVE_CHANNEL_ITEM).await?;
        self.session.click(&item).await?;
        self.session.wait_for(DELETE_CHANNEL_MODAL).await?;
        let confirm = self.session.wait_for(DELETE_CHANNEL_CONFIRM).await?;
        self.session.click(&confirm).await?;
        self.session.wait_gone(DELETE_CHANNEL_MODAL).await
    }

    /// Text of the archived-channel banner
    pub async fn archived_banner_text(&self) -> Result<String> {
        let banner = self.session.wait_for(ARCHIVED_CHANNEL_BANNER).await?;
        self.session.text(&banner).await
    }

    /// Whether the message composer is in the DOM (no waiting)
    pub async fn composer_exists(&self) -> Result<bool> {
        self.session.exists(POST_TEXTBOX).await
    }
}
