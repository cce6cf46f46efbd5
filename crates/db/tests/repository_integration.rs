use common::config::DatabaseConfig;
use db::{pg::PgDatabase, CountryUpsert, Repositories, TariffCreate};
use db_test_fixture::DbFixture;

fn config_for(url: &str) -> DatabaseConfig {
    DatabaseConfig {
        url: Some(url.to_string()),
        ..DatabaseConfig::default()
    }
}

fn country(name: &str, code: &str) -> CountryUpsert {
    CountryUpsert {
        name: name.into(),
        code: code.into(),
        flag_url: Some(format!("https://flags.example/{}.svg", code.to_lowercase())),
    }
}

fn tariff(
    country_id: i64,
    target_country: i64,
    product: &str,
    kind: &str,
    rate: f64,
) -> TariffCreate {
    TariffCreate {
        country_id,
        target_country,
        product: product.into(),
        tariff_type: kind.into(),
        tariff: rate,
        last_updated: Some("2025-04-02".into()),
    }
}

#[tokio::test]
async fn connect_creates_schema_and_is_repeatable() -> anyhow::Result<()> {
    let fixture = match DbFixture::from_env() {
        Ok(fixture) => fixture,
        Err(err) => {
            eprintln!("skipping connect_creates_schema_and_is_repeatable: {err}");
            return Ok(());
        }
    };
    let handle = fixture.create_unmigrated("schema_init").await?;
    let config = config_for(handle.database_url());

    let first = PgDatabase::connect(&config).await?;
    assert!(first.countries().list().await?.is_empty());
    assert!(first.tariffs().leaderboard().await?.is_empty());

    // Second start against an already migrated schema must not fail.
    let second = PgDatabase::connect(&config).await?;
    assert!(second.countries().list().await?.is_empty());

    drop(first);
    drop(second);
    handle.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn country_upsert_keeps_code_unique() -> anyhow::Result<()> {
    let fixture = match DbFixture::from_env() {
        Ok(fixture) => fixture,
        Err(err) => {
            eprintln!("skipping country_upsert_keeps_code_unique: {err}");
            return Ok(());
        }
    };
    let handle = fixture.create("country_upsert").await?;
    let database = PgDatabase::from_pool(handle.pool().clone());
    let countries = database.countries();

    let created = countries.upsert(country("India", "IN")).await?;
    let renamed = countries.upsert(country("Republic of India", "IN")).await?;
    assert_eq!(created.id, renamed.id);
    assert_eq!(renamed.name, "Republic of India");

    let fetched = countries.get_by_code("IN").await?.expect("country fetched");
    assert_eq!(fetched, renamed);

    // Lower-case input lands on the same canonical row.
    let lowered = countries.upsert(country("India", " in ")).await?;
    assert_eq!(lowered.id, created.id);
    assert_eq!(lowered.code, "IN");
    assert!(countries.get_by_code("ZZ").await?.is_none());
    assert_eq!(countries.list().await?.len(), 1);

    drop(database);
    handle.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn leaderboard_reports_highest_tariff_per_country() -> anyhow::Result<()> {
    let fixture = match DbFixture::from_env() {
        Ok(fixture) => fixture,
        Err(err) => {
            eprintln!("skipping leaderboard_reports_highest_tariff_per_country: {err}");
            return Ok(());
        }
    };
    let handle = fixture.create("leaderboard").await?;
    let database = PgDatabase::from_pool(handle.pool().clone());

    let us = database.countries().upsert(country("United States", "US")).await?;
    let india = database.countries().upsert(country("India", "IN")).await?;
    let china = database.countries().upsert(country("China", "CN")).await?;
    // Imposes nothing, so it must not appear.
    database.countries().upsert(country("Chile", "CL")).await?;

    let tariffs = database.tariffs();
    tariffs.insert(tariff(india.id, us.id, "almonds", "standard", 20.0)).await?;
    tariffs.insert(tariff(india.id, us.id, "motorcycles", "retaliation", 72.0)).await?;
    tariffs.insert(tariff(china.id, us.id, "soybeans", "retaliation", 34.0)).await?;
    tariffs.insert(tariff(us.id, china.id, "steel", "standard", 25.0)).await?;

    let board = tariffs.leaderboard().await?;
    let codes: Vec<&str> = board.iter().map(|e| e.country_code.as_str()).collect();
    assert_eq!(codes, ["IN", "CN", "US"]);
    assert_eq!(board[0].country, "India");
    assert_eq!(board[0].max_tariff, 72.0);
    assert_eq!(board[0].direction, "retaliation");
    assert_eq!(board[2].direction, "standard");

    let india_on_us = tariffs.list_between(india.id, us.id).await?;
    assert_eq!(india_on_us.len(), 2);
    assert_eq!(india_on_us[0].product, "motorcycles");
    assert_eq!(india_on_us[0].tariff_type, "retaliation");
    assert!(tariffs.list_between(us.id, india.id).await?.is_empty());

    drop(database);
    handle.cleanup().await?;
    Ok(())
}
