use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("requesting medal data: {0}")]
    Request(#[from] reqwest::Error),
    #[error("medal source responded with {0}")]
    Status(reqwest::StatusCode),
    #[error("decoding medal payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("medal payload has no data.olympics[0].olympicTeam")]
    MissingTeams,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("accessing snapshot {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("encoding snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("reading roster {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing roster: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("roster contains no teams")]
    EmptyRoster,
    #[error("team id {0:?} appears more than once")]
    DuplicateTeamId(String),
    #[error("tiebreaker rank {0} is assigned to more than one team")]
    DuplicateTiebreaker(u32),
}

/// Why a single update cycle was abandoned.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("building medal source client: {0}")]
    Client(#[from] FetchError),
    #[error("binding {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("serving http: {0}")]
    Serve(#[source] std::io::Error),
}
