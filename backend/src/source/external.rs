use std::time::Duration;

use common::{Country, MedalCount, MedalTableEntry};
use serde::Deserialize;

use super::MedalSource;
use crate::error::FetchError;

pub const DEFAULT_URL: &str = "https://graphite.sports.yahoo.com/v1/query/shangrila/OlyMedalCount";

pub const QUERY: [(&str, &str); 6] = [
    ("lang", "en-US"),
    ("region", "US"),
    ("tz", "America/New_York"),
    ("ysp_platform", "next-app-sports"),
    ("season", "2026"),
    ("sortMethod", "GOLD"),
];

#[derive(Debug, Deserialize)]
struct Response {
    data: Option<Data>,
}

#[derive(Debug, Deserialize)]
struct Data {
    olympics: Option<Vec<Olympics>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Olympics {
    olympic_team: Option<Vec<OlympicTeam>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OlympicTeam {
    country_details: CountryDetails,
    gold: u32,
    silver: u32,
    bronze: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountryDetails {
    name: String,
    iso_code: String,
}

/// Medal table from the third-party sports API.
///
/// One GET per fetch; a failed request fails the fetch, there is no retry.
pub struct ExternalSource {
    http: reqwest::Client,
    url: String,
}

impl ExternalSource {
    pub fn new<IS>(url: IS, timeout: Duration) -> Result<Self, FetchError>
    where
        IS: Into<String>,
    {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait::async_trait]
impl MedalSource for ExternalSource {
    fn is_live(&self) -> bool {
        true
    }

    #[tracing::instrument(name = "ExternalSource::fetch", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<MedalTableEntry>, FetchError> {
        let response = self.http.get(&self.url).query(&QUERY).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Medal source rejected request");
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let table = parse_payload(&body)?;

        tracing::info!("Fetched medal data for {} countries", table.len());
        Ok(table)
    }
}

/// Maps a raw response body onto medal table entries.
pub fn parse_payload(body: &[u8]) -> Result<Vec<MedalTableEntry>, FetchError> {
    let response: Response = serde_json::from_slice(body)?;

    let teams = response
        .data
        .and_then(|data| data.olympics)
        .and_then(|olympics| olympics.into_iter().next())
        .and_then(|olympics| olympics.olympic_team)
        .ok_or(FetchError::MissingTeams)?;

    Ok(teams
        .into_iter()
        .map(|team| MedalTableEntry {
            country: Country::new(team.country_details.iso_code, team.country_details.name),
            medals: MedalCount {
                gold: team.gold,
                silver: team.silver,
                bronze: team.bronze,
            },
        })
        .collect())
}
