//! User Repository

use shared::models::{ProfileUpdate, Role, UserProfile};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, decode_enum};
use crate::util::normalize_email;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    role: String,
    password_hash: String,
    created_at: i64,
}

/// User plus credentials (never serialized)
pub struct UserWithHash {
    pub profile: UserProfile,
    pub password_hash: String,
}

const COLUMNS: &str = "id, name, email, phone, address, role, password_hash, created_at";

impl UserRow {
    fn into_user(self) -> RepoResult<UserWithHash> {
        Ok(UserWithHash {
            profile: UserProfile {
                role: decode_enum(&self.role, "role", Role::parse)?,
                id: self.id,
                name: self.name,
                email: self.email,
                phone: self.phone,
                address: self.address,
                created_at: self.created_at,
            },
            password_hash: self.password_hash,
        })
    }
}

pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub password_hash: &'a str,
    pub role: Role,
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<UserWithHash>> {
    let row: Option<UserRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE email = ?"))
            .bind(normalize_email(email))
            .fetch_optional(pool)
            .await?;
    row.map(UserRow::into_user).transpose()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<UserWithHash>> {
    let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(UserRow::into_user).transpose()
}

pub async fn get_profile(pool: &SqlitePool, id: i64) -> RepoResult<UserProfile> {
    find_by_id(pool, id)
        .await?
        .map(|u| u.profile)
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn create(pool: &SqlitePool, user: NewUser<'_>) -> RepoResult<UserProfile> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO users (id, name, email, phone, address, password_hash, role, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user.name.trim())
    .bind(normalize_email(user.email))
    .bind(user.phone)
    .bind(user.address)
    .bind(user.password_hash)
    .bind(user.role.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    get_profile(pool, id).await
}

/// `password_hash` is the already-hashed replacement, if any
pub async fn update_profile(
    pool: &SqlitePool,
    id: i64,
    data: &ProfileUpdate,
    password_hash: Option<&str>,
) -> RepoResult<UserProfile> {
    let rows = sqlx::query(
        "UPDATE users SET
            name = COALESCE(?1, name),
            phone = COALESCE(?2, phone),
            address = COALESCE(?3, address),
            password_hash = COALESCE(?4, password_hash),
            updated_at = ?5
         WHERE id = ?6",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.phone.as_deref())
    .bind(data.address.as_deref())
    .bind(password_hash)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    get_profile(pool, id).await
}

/// Create the configured admin if no user owns that email yet.
/// An existing account is promoted to admin but its password is left alone.
pub async fn ensure_admin(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
) -> RepoResult<UserProfile> {
    if let Some(existing) = find_by_email(pool, email).await? {
        if existing.profile.role != Role::Admin {
            sqlx::query("UPDATE users SET role = 'admin', updated_at = ? WHERE id = ?")
                .bind(now_millis())
                .bind(existing.profile.id)
                .execute(pool)
                .await?;
            tracing::warn!(email = %email, "Existing user promoted to admin");
        }
        return get_profile(pool, existing.profile.id).await;
    }
    let profile = create(
        pool,
        NewUser {
            name: "Administrador",
            email,
            phone: None,
            address: None,
            password_hash,
            role: Role::Admin,
        },
    )
    .await?;
    tracing::info!(email = %email, "Admin account seeded");
    Ok(profile)
}
