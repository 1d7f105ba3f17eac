pub mod events;

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

impl Country {
    pub fn new<C, N>(code: C, name: N) -> Self
    where
        C: Into<String>,
        N: Into<String>,
    {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedalType {
    Gold,
    Silver,
    Bronze,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MedalCount {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalCount {
    pub fn get(&self, medal: MedalType) -> u32 {
        match medal {
            MedalType::Gold => self.gold,
            MedalType::Silver => self.silver,
            MedalType::Bronze => self.bronze,
        }
    }
}

/// One country's tally for a single update cycle.
///
/// Serialized flat, `{"code", "name", "medals": {...}}`, which is also the
/// on-disk snapshot format.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MedalTableEntry {
    #[serde(flatten)]
    pub country: Country,
    pub medals: MedalCount,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub manager_name: String,
    pub gold_country: Country,
    pub silver_country: Country,
    pub bronze_country: Country,
    /// Unique across the roster, lower wins a full tie.
    pub tiebreaker_rank: u32,
}

impl Team {
    pub fn pick(&self, medal: MedalType) -> &Country {
        match medal {
            MedalType::Gold => &self.gold_country,
            MedalType::Silver => &self.silver_country,
            MedalType::Bronze => &self.bronze_country,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamCountryMedals {
    pub country: Country,
    pub medal_type: MedalType,
    pub count: u32,
    /// Wide enough that no `u32` count can overflow it.
    pub points: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamScore {
    pub team: Team,
    pub total_points: u64,
    pub gold_country_medals: TeamCountryMedals,
    pub silver_country_medals: TeamCountryMedals,
    pub bronze_country_medals: TeamCountryMedals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardData {
    pub teams: Vec<TeamScore>,
    pub last_update: chrono::DateTime<chrono::Utc>,
    pub next_update: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub data: std::sync::Arc<ScoreboardData>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
