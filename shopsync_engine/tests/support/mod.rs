use log::*;
use shopsync_engine::SqliteDatabase;
use sqlx::{migrate::MigrateDatabase, Sqlite};

/// Creates a fresh, migrated throwaway database and returns a handle to it.
pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("Error dropping database {url}: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    db
}

pub fn random_db_path() -> String {
    format!("sqlite://../data/test_store_{}.db", rand::random::<u64>())
}
