use std::sync::Arc;

use async_trait::async_trait;
use common::config::CatalogSource;
use common::text::normalize_country_code;
use db::errors::Result;
use db::models::{CountryDetail, LeaderboardEntry};
use db::Repositories;
use tracing::instrument;

/// Country whose bilateral tariffs are reported on the country detail view.
pub const REFERENCE_COUNTRY_CODE: &str = "US";

/// Read side the handlers depend on.
#[async_trait]
pub trait TariffCatalog: Send + Sync {
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>>;
    /// `None` when the code is unknown.
    async fn country(&self, code: &str) -> Result<Option<CountryDetail>>;
}

pub fn catalog_for(
    source: CatalogSource,
    repositories: Arc<dyn Repositories>,
) -> Arc<dyn TariffCatalog> {
    match source {
        CatalogSource::Static => Arc::new(StaticCatalog),
        CatalogSource::Database => Arc::new(RepositoryCatalog::new(repositories)),
    }
}

/// Placeholder data served until ingestion populates the tables. Any code
/// resolves and is echoed back unchecked.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

#[async_trait]
impl TariffCatalog for StaticCatalog {
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        Ok(vec![LeaderboardEntry {
            country: "India".into(),
            country_code: "IN".into(),
            max_tariff: 72.0,
            direction: "retaliation".into(),
        }])
    }

    async fn country(&self, code: &str) -> Result<Option<CountryDetail>> {
        Ok(Some(CountryDetail {
            country: format!("Country {code}"),
            tariffs_from_country: Vec::new(),
            tariffs_from_us: Vec::new(),
        }))
    }
}

#[derive(Clone)]
pub struct RepositoryCatalog {
    repositories: Arc<dyn Repositories>,
}

impl RepositoryCatalog {
    pub fn new(repositories: Arc<dyn Repositories>) -> Self {
        Self { repositories }
    }
}

#[async_trait]
impl TariffCatalog for RepositoryCatalog {
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        self.repositories.tariffs().leaderboard().await
    }

    #[instrument(skip(self))]
    async fn country(&self, code: &str) -> Result<Option<CountryDetail>> {
        let Some(code) = normalize_country_code(code) else {
            return Ok(None);
        };
        let countries = self.repositories.countries();
        let Some(country) = countries.get_by_code(&code).await? else {
            return Ok(None);
        };

        let reference = if country.code == REFERENCE_COUNTRY_CODE {
            Some(country.clone())
        } else {
            countries.get_by_code(REFERENCE_COUNTRY_CODE).await?
        };

        let tariffs = self.repositories.tariffs();
        let (tariffs_from_country, tariffs_from_us) = match reference {
            Some(reference) => (
                tariffs.list_between(country.id, reference.id).await?,
                tariffs.list_between(reference.id, country.id).await?,
            ),
            None => (Vec::new(), Vec::new()),
        };

        Ok(Some(CountryDetail {
            country: country.name,
            tariffs_from_country,
            tariffs_from_us,
        }))
    }
}
