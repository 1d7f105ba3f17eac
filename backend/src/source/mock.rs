use std::sync::{Mutex, PoisonError};

use common::{Country, MedalCount, MedalTableEntry};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::MedalSource;
use crate::error::FetchError;

pub const MOCK_COUNTRIES: [(&str, &str); 13] = [
    ("KOR", "South Korea"),
    ("LVA", "Latvia"),
    ("GBR", "Great Britain"),
    ("ESP", "Spain"),
    ("FIN", "Finland"),
    ("HUN", "Hungary"),
    ("SVN", "Slovenia"),
    ("POL", "Poland"),
    ("NZL", "New Zealand"),
    ("BEL", "Belgium"),
    ("AUS", "Australia"),
    ("CZE", "Czech Republic"),
    ("SVK", "Slovakia"),
];

pub const MAX_MOCK_MEDALS: u32 = 20;

/// Synthetic medal table. Every call draws fresh, independent counts.
pub struct MockSource<R = StdRng> {
    rng: Mutex<R>,
}

impl MockSource<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for MockSource<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> MockSource<R>
where
    R: Rng + Send,
{
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn generate(&self) -> Vec<MedalTableEntry> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        MOCK_COUNTRIES
            .iter()
            .map(|(code, name)| MedalTableEntry {
                country: Country::new(*code, *name),
                medals: MedalCount {
                    gold: rng.gen_range(0..=MAX_MOCK_MEDALS),
                    silver: rng.gen_range(0..=MAX_MOCK_MEDALS),
                    bronze: rng.gen_range(0..=MAX_MOCK_MEDALS),
                },
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl<R> MedalSource for MockSource<R>
where
    R: Rng + Send,
{
    fn is_live(&self) -> bool {
        false
    }

    async fn fetch(&self) -> Result<Vec<MedalTableEntry>, FetchError> {
        Ok(self.generate())
    }
}
