use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CountryRow {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub flag_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TariffRow {
    pub id: i64,
    /// Country imposing the tariff.
    pub country_id: i64,
    /// Country the tariff applies to. Stored as a raw id, not a foreign key.
    pub target_country: i64,
    pub product: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub tariff_type: String,
    pub tariff: f64,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CountryUpsert {
    pub name: String,
    pub code: String,
    pub flag_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TariffCreate {
    pub country_id: i64,
    pub target_country: i64,
    pub product: String,
    pub tariff_type: String,
    pub tariff: f64,
    pub last_updated: Option<String>,
}

/// Highest tariff a country imposes, with that tariff's type as `direction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    pub country: String,
    pub country_code: String,
    pub max_tariff: f64,
    pub direction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryDetail {
    pub country: String,
    pub tariffs_from_country: Vec<TariffRow>,
    pub tariffs_from_us: Vec<TariffRow>,
}
