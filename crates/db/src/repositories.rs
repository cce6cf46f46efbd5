use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{CountryRow, CountryUpsert, LeaderboardEntry, TariffCreate, TariffRow};

#[async_trait]
pub trait CountryRepository: Send + Sync {
    async fn upsert(&self, country: CountryUpsert) -> Result<CountryRow>;
    async fn get_by_code(&self, code: &str) -> Result<Option<CountryRow>>;
    async fn list(&self) -> Result<Vec<CountryRow>>;
}

#[async_trait]
pub trait TariffRepository: Send + Sync {
    async fn insert(&self, tariff: TariffCreate) -> Result<TariffRow>;
    async fn list_between(&self, country_id: i64, target_country: i64) -> Result<Vec<TariffRow>>;
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>>;
}

pub trait Repositories: Send + Sync {
    fn countries(&self) -> &dyn CountryRepository;
    fn tariffs(&self) -> &dyn TariffRepository;
}
