use serde::Serialize;

use db::models::{CountryDetail, LeaderboardEntry, TariffRow};

#[derive(Debug, Serialize)]
pub struct StatusDto {
    pub status: &'static str,
}

impl StatusDto {
    pub const fn new(status: &'static str) -> Self {
        Self { status }
    }
}

#[derive(Debug, Serialize)]
pub struct LeaderboardDto {
    pub country: String,
    pub country_code: String,
    pub max_tariff: f64,
    pub direction: String,
}

impl From<LeaderboardEntry> for LeaderboardDto {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            country: entry.country,
            country_code: entry.country_code,
            max_tariff: entry.max_tariff,
            direction: entry.direction,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TariffDto {
    pub id: i64,
    pub country_id: i64,
    pub target_country: i64,
    pub product: String,
    #[serde(rename = "type")]
    pub tariff_type: String,
    pub tariff: f64,
    pub last_updated: Option<String>,
}

impl From<TariffRow> for TariffDto {
    fn from(row: TariffRow) -> Self {
        Self {
            id: row.id,
            country_id: row.country_id,
            target_country: row.target_country,
            product: row.product,
            tariff_type: row.tariff_type,
            tariff: row.tariff,
            last_updated: row.last_updated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountryDto {
    pub country: String,
    pub tariffs_from_country: Vec<TariffDto>,
    pub tariffs_from_us: Vec<TariffDto>,
}

impl From<CountryDetail> for CountryDto {
    fn from(detail: CountryDetail) -> Self {
        Self {
            country: detail.country,
            tariffs_from_country: detail
                .tariffs_from_country
                .into_iter()
                .map(TariffDto::from)
                .collect(),
            tariffs_from_us: detail
                .tariffs_from_us
                .into_iter()
                .map(TariffDto::from)
                .collect(),
        }
    }
}
