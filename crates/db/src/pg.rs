use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use common::config::DatabaseConfig;
use common::text::normalize_country_code;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::errors::{DbError, Result};
use crate::models::{CountryRow, CountryUpsert, LeaderboardEntry, TariffCreate, TariffRow};
use crate::repositories::{CountryRepository, Repositories, TariffRepository};

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(DbError::Migration)
}

/// Resolves connection options from `database.url` when present, otherwise
/// from the individual host/port/user/password/name/ssl_mode fields.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
    if let Some(url) = config.url.as_deref() {
        return PgConnectOptions::from_str(url).map_err(|err| DbError::Config(err.into()));
    }

    let ssl_mode = PgSslMode::from_str(&config.ssl_mode).map_err(|_| {
        DbError::Config(anyhow!("unsupported ssl mode: {}", config.ssl_mode))
    })?;

    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .database(&config.name)
        .ssl_mode(ssl_mode);
    if let Some(password) = config.password.as_deref() {
        options = options.password(password);
    }
    Ok(options)
}

#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
    country_repo: Arc<PgCountryRepository>,
    tariff_repo: Arc<PgTariffRepository>,
}

impl PgDatabase {
    /// Opens the pool and brings the schema up to date. A single attempt:
    /// callers decide what a failure means.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = connect_options(config)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(options)
            .await
            .map_err(DbError::Query)?;
        info!("database connected");

        run_migrations(&pool).await?;
        info!("database migrations completed");

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        let country_repo = Arc::new(PgCountryRepository { pool: pool.clone() });
        let tariff_repo = Arc::new(PgTariffRepository { pool: pool.clone() });

        Self {
            pool,
            country_repo,
            tariff_repo,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Repositories for PgDatabase {
    fn countries(&self) -> &dyn CountryRepository {
        &*self.country_repo
    }

    fn tariffs(&self) -> &dyn TariffRepository {
        &*self.tariff_repo
    }
}

#[derive(Clone)]
struct PgCountryRepository {
    pool: PgPool,
}

#[async_trait]
impl CountryRepository for PgCountryRepository {
    #[instrument(skip(self, country), fields(code = %country.code))]
    async fn upsert(&self, country: CountryUpsert) -> Result<CountryRow> {
        let code = normalize_country_code(&country.code).ok_or_else(|| {
            DbError::InvalidInput(format!("invalid country code: {:?}", country.code))
        })?;
        sqlx::query_as::<_, CountryRow>(
            r#"
            INSERT INTO countries (name, code, flag_url)
            VALUES ($1, $2, $3)
            ON CONFLICT (code) DO UPDATE
                SET name = EXCLUDED.name,
                    flag_url = EXCLUDED.flag_url
            RETURNING id, name, code, flag_url
            "#,
        )
        .bind(country.name)
        .bind(code)
        .bind(country.flag_url)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<CountryRow>> {
        sqlx::query_as::<_, CountryRow>(
            r#"
            SELECT id, name, code, flag_url
            FROM countries
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    async fn list(&self) -> Result<Vec<CountryRow>> {
        sqlx::query_as::<_, CountryRow>(
            r#"
            SELECT id, name, code, flag_url
            FROM countries
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }
}

#[derive(Clone)]
struct PgTariffRepository {
    pool: PgPool,
}

#[async_trait]
impl TariffRepository for PgTariffRepository {
    #[instrument(
        skip(self, tariff),
        fields(country_id = tariff.country_id, target_country = tariff.target_country)
    )]
    async fn insert(&self, tariff: TariffCreate) -> Result<TariffRow> {
        sqlx::query_as::<_, TariffRow>(
            r#"
            INSERT INTO tariffs (country_id, target_country, product, type, tariff, last_updated)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, country_id, target_country, product, type, tariff, last_updated
            "#,
        )
        .bind(tariff.country_id)
        .bind(tariff.target_country)
        .bind(tariff.product)
        .bind(tariff.tariff_type)
        .bind(tariff.tariff)
        .bind(tariff.last_updated)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    async fn list_between(&self, country_id: i64, target_country: i64) -> Result<Vec<TariffRow>> {
        sqlx::query_as::<_, TariffRow>(
            r#"
            SELECT id, country_id, target_country, product, type, tariff, last_updated
            FROM tariffs
            WHERE country_id = $1 AND target_country = $2
            ORDER BY tariff DESC, id
            "#,
        )
        .bind(country_id)
        .bind(target_country)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    #[instrument(skip(self))]
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT country, country_code, max_tariff, direction
            FROM (
                SELECT DISTINCT ON (c.id)
                    c.name AS country,
                    c.code AS country_code,
                    t.tariff AS max_tariff,
                    t.type AS direction
                FROM tariffs t
                JOIN countries c ON c.id = t.country_id
                ORDER BY c.id, t.tariff DESC, t.id
            ) AS best
            ORDER BY max_tariff DESC, country_code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }
}
