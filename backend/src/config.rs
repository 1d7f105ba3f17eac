use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[clap(about = "Live medal-count leaderboard server", version)]
pub struct Config {
    #[clap(long, env = "MEDALBOARD_LISTEN", default_value = "0.0.0.0:3001", help = "Address the HTTP/WebSocket server binds to.")]
    pub listen: SocketAddr,

    #[clap(long, env = "MEDALBOARD_TEAMS", default_value = "data/teams.json", help = "JSON file holding the team roster.")]
    pub teams: PathBuf,

    #[clap(long, env = "MEDALBOARD_SNAPSHOT", default_value = "data/medal-data.json", help = "Where the last real medal table is persisted.")]
    pub snapshot: PathBuf,

    #[clap(
        long,
        env = "MEDALBOARD_MOCK",
        default_value_t = true,
        action = clap::ArgAction::Set,
        help = "Generate random medal counts instead of querying the external source."
    )]
    pub mock: bool,

    #[clap(long, env = "MEDALBOARD_SOURCE_URL", default_value = crate::source::external::DEFAULT_URL, help = "External medal-count endpoint.")]
    pub source_url: String,

    #[clap(long, env = "MEDALBOARD_UPDATE_INTERVAL_SECS", default_value_t = 300, help = "Seconds between scheduled update cycles.")]
    pub update_interval_secs: u64,

    #[clap(long, env = "MEDALBOARD_FETCH_TIMEOUT_SECS", default_value_t = 10, help = "Timeout for a single request to the external source.")]
    pub fetch_timeout_secs: u64,
}

impl Config {
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs.max(1))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
