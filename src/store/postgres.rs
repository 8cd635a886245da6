//! PostgreSQL backend and startup DDL. Tables live in the schema named by `DB_SCHEMA` (default `public`).

use super::{Store, StoreError};
use crate::model::{Location, Place, User, UserView};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    /// `schema` must be a plain identifier; `ServerConfig` checks this on load.
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgStore {
            pool,
            schema: schema.into(),
        }
    }

    fn table(&self, name: &str) -> String {
        qualified_table(&self.schema, name)
    }
}

/// Returns schema-qualified table name (e.g. `"public"."places"`).
fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// Create the schema if needed, then `users` and `places`. Idempotent.
pub async fn ensure_tables(pool: &PgPool, schema: &str) -> Result<(), StoreError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema)))
        .execute(pool)
        .await?;

    let users = qualified_table(schema, "users");
    let users_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            image TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        users
    );
    sqlx::query(&users_ddl).execute(pool).await?;

    let places = qualified_table(schema, "places");
    let places_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id UUID PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            address TEXT NOT NULL,
            lat DOUBLE PRECISION NOT NULL,
            lng DOUBLE PRECISION NOT NULL,
            image TEXT NOT NULL,
            creator UUID NOT NULL REFERENCES {}(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        places, users
    );
    sqlx::query(&places_ddl).execute(pool).await?;

    let index = format!(
        "CREATE INDEX IF NOT EXISTS places_creator_idx ON {} (creator, created_at)",
        places
    );
    sqlx::query(&index).execute(pool).await?;
    tracing::debug!(schema = %schema, "tables ready");
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| StoreError::InvalidUrl("no database path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn constraint_code(e: &sqlx::Error) -> Option<String> {
    e.as_database_error().and_then(|d| d.code()).map(|c| c.into_owned())
}

#[derive(sqlx::FromRow)]
struct PlaceRow {
    id: Uuid,
    title: String,
    description: String,
    address: String,
    lat: f64,
    lng: f64,
    image: String,
    creator: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PlaceRow> for Place {
    fn from(r: PlaceRow) -> Self {
        Place {
            id: r.id,
            title: r.title,
            description: r.description,
            address: r.address,
            location: Location { lat: r.lat, lng: r.lng },
            image: r.image,
            creator: r.creator,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    image: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            name: r.name,
            email: r.email,
            password_hash: r.password_hash,
            image: r.image,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserViewRow {
    id: Uuid,
    name: String,
    email: String,
    image: String,
    created_at: DateTime<Utc>,
    places: i64,
}

const PLACE_COLUMNS: &str = "id, title, description, address, lat, lng, image, creator, created_at, updated_at";
const USER_COLUMNS: &str = "id, name, email, password_hash, image, created_at";

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn find_place_by_id(&self, id: Uuid) -> Result<Option<Place>, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", PLACE_COLUMNS, self.table("places"));
        tracing::debug!(sql = %sql, %id, "query");
        let row = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Place::from))
    }

    async fn find_places_by_creator(&self, creator: Uuid) -> Result<Vec<Place>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE creator = $1 ORDER BY created_at, id",
            PLACE_COLUMNS,
            self.table("places")
        );
        tracing::debug!(sql = %sql, %creator, "query");
        let rows = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(creator)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Place::from).collect())
    }

    async fn save_place(&self, place: &Place) -> Result<(), StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {} ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                address = EXCLUDED.address,
                lat = EXCLUDED.lat,
                lng = EXCLUDED.lng,
                image = EXCLUDED.image,
                updated_at = EXCLUDED.updated_at
            "#,
            self.table("places"),
            PLACE_COLUMNS
        );
        tracing::debug!(sql = %sql, id = %place.id, "query");
        sqlx::query(&sql)
            .bind(place.id)
            .bind(&place.title)
            .bind(&place.description)
            .bind(&place.address)
            .bind(place.location.lat)
            .bind(place.location.lng)
            .bind(&place.image)
            .bind(place.creator)
            .bind(place.created_at)
            .bind(place.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match constraint_code(&e).as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => StoreError::UnknownCreator(place.creator),
                _ => StoreError::Db(e),
            })?;
        Ok(())
    }

    async fn update_place(&self, place: &Place) -> Result<bool, StoreError> {
        let sql = format!(
            "UPDATE {} SET title = $2, description = $3, updated_at = $4 WHERE id = $1",
            self.table("places")
        );
        tracing::debug!(sql = %sql, id = %place.id, "query");
        let done = sqlx::query(&sql)
            .bind(place.id)
            .bind(&place.title)
            .bind(&place.description)
            .bind(place.updated_at)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn remove_place(&self, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table("places"));
        tracing::debug!(sql = %sql, %id, "query");
        let done = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", USER_COLUMNS, self.table("users"));
        tracing::debug!(sql = %sql, %id, "query");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE email = $1", USER_COLUMNS, self.table("users"));
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {} ({})
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                image = EXCLUDED.image
            "#,
            self.table("users"),
            USER_COLUMNS
        );
        tracing::debug!(sql = %sql, id = %user.id, "query");
        sqlx::query(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.image)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match constraint_code(&e).as_deref() {
                Some(UNIQUE_VIOLATION) => StoreError::DuplicateEmail(user.email.clone()),
                _ => StoreError::Db(e),
            })?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserView>, StoreError> {
        let sql = format!(
            r#"
            SELECT u.id, u.name, u.email, u.image, u.created_at, COUNT(p.id) AS places
            FROM {} u
            LEFT JOIN {} p ON p.creator = u.id
            GROUP BY u.id
            ORDER BY u.created_at, u.id
            "#,
            self.table("users"),
            self.table("places")
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, UserViewRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|r| UserView {
                id: r.id,
                name: r.name,
                email: r.email,
                image: r.image,
                places: r.places.max(0) as u64,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn count_places_by_creator(&self, creator: Uuid) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE creator = $1", self.table("places"));
        tracing::debug!(sql = %sql, %creator, "query");
        let (count,): (i64,) = sqlx::query_as(&sql).bind(creator).fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }
}
