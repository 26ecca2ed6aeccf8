use serde::Deserialize;
use serde_json::{Map, Value};

/// Raw payload of `GET /users/stats/{username}`.
///
/// Both halves are kept as untyped JSON objects so they can be shallow-merged
/// before any field is interpreted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsResponse {
    pub user: Map<String, Value>,
    pub stats: Map<String, Value>,
}

impl StatsResponse {
    /// Shallow-merge `user` then `stats` (stats keys win) and interpret the
    /// result as [`UserData`]. The page title keeps `user.name` even when
    /// `stats` overrides `name`.
    pub fn into_user_data(self) -> Result<UserData, serde_json::Error> {
        let user_name = self.user.get("name").and_then(Value::as_str).map(String::from);

        let mut merged = self.user;
        merged.extend(self.stats);
        let mut data: UserData = serde_json::from_value(Value::Object(merged))?;
        data.title_name = user_name.unwrap_or_else(|| data.name.clone());
        Ok(data)
    }
}

/// Merged profile + statistics for one user, as displayed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub avatar: Option<String>,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
    // Stat cells are shown as the backend sends them, whatever their JSON type.
    pub points: Value,
    #[serde(rename = "mergedPRs")]
    pub merged_prs: Value,
    pub repositories: Value,
    pub followers: Value,
    pub following: Value,
    pub prs: Vec<PullRequestSummary>,
    /// Name used for the page title, taken from the `user` half of the payload.
    #[serde(skip)]
    pub title_name: String,
}

impl UserData {
    /// The five statistics cells, in display order.
    pub fn stats_strip(&self) -> [(&'static str, String); 5] {
        [
            ("Points", stat_text(&self.points)),
            ("Merged PRs", stat_text(&self.merged_prs)),
            ("Repositories", stat_text(&self.repositories)),
            ("Followers", stat_text(&self.followers)),
            ("Following", stat_text(&self.following)),
        ]
    }

    /// Avatar fallback: the first character of the name.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}

fn stat_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// One entry of the user's recent pull requests.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequestSummary {
    pub title: String,
    pub url: String,
    pub state: PrState,
}

/// Lifecycle state of a pull request.
///
/// Values outside the three known ones are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PrState {
    Merged,
    Open,
    Closed,
    Other(String),
}

impl From<String> for PrState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "merged" => PrState::Merged,
            "open" => PrState::Open,
            "closed" => PrState::Closed,
            _ => PrState::Other(raw),
        }
    }
}

impl PrState {
    pub fn as_str(&self) -> &str {
        match self {
            PrState::Merged => "merged",
            PrState::Open => "open",
            PrState::Closed => "closed",
            PrState::Other(raw) => raw,
        }
    }
}
