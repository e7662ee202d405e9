//! Query parameter extractors for list and prune endpoints.

use serde::Deserialize;

/// Query parameters for `GET /campaigns`.
#[derive(Debug, Deserialize, Default)]
pub struct CampaignListQuery {
    /// Narrow the listing to one caller-defined user tag.
    #[serde(rename = "userId")]
    pub user_tag: Option<String>,
}

/// Query parameters for the `/campaigns/{id}/chats` endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct TurnQuery {
    /// GET: cap on turns returned. DELETE: number of recent turns to remove.
    pub number: Option<u32>,
}
