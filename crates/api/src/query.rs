//! Query and body types shared by handlers.

use serde::Deserialize;

/// `?q=&club_id=` for event search. Both are optional.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub club_id: Option<String>,
}

/// Body of join and leave requests.
#[derive(Debug, Deserialize)]
pub struct ParticipantBody {
    pub user_id: String,
}
