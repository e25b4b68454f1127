//! PostgreSQL implementation of the ledger store traits, via diesel-async
//! with a deadpool connection pool.

pub mod error;
pub mod models;
pub mod schema;
pub mod store;

use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use error::DatabaseError;

pub use crate::store::PgStore;

pub fn get_database_connection(
    database_url: &str,
) -> Result<Pool<AsyncPgConnection>, DatabaseError> {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Ok(Pool::builder(config).build()?)
}

pub fn get_database_connection_from_env() -> Result<Pool<AsyncPgConnection>, DatabaseError> {
    let database_url = std::env::var("DATABASE_URL")?;
    get_database_connection(&database_url)
}
