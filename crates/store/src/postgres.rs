//! Postgres-backed credential store.
//!
//! Role attachment is an explicit `LEFT JOIN` inside each user query; the
//! "always include role" contract lives in the SQL, not in a loader option.
//!
//! ## Error Mapping
//!
//! | Postgres error code | `AuthError` | Scenario |
//! |---------------------|-------------|----------|
//! | `23505` (unique violation) | `Conflict` | duplicate email / role name |
//! | anything else | `Storage` | backend failure |

use sqlx::{PgPool, Row, postgres::PgRow};
use std::future::Future;
use std::sync::Arc;
use tracing::instrument;

use taskforge_core::{RoleId, UserId};

use taskforge_auth::{
    AuthError, CredentialStore, PasswordHasher, PermissionMap, Role, User, UserWithRole,
};

const USER_WITH_ROLE_COLUMNS: &str = r#"
    u.id, u.email, u.password_hash, u.role_id, u.created_at, u.updated_at,
    r.id AS r_id, r.name AS r_name, r.permissions AS r_permissions,
    r.created_at AS r_created_at
"#;

/// Credential store on PostgreSQL.
///
/// Thread-safe via the SQLx connection pool. Uniqueness of emails and role
/// names is enforced by database constraints; the store maps constraint
/// violations to `Conflict`.
#[derive(Clone)]
pub struct PostgresCredentialStore {
    pool: Arc<PgPool>,
    hasher: PasswordHasher,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
            hasher: PasswordHasher::new(),
        }
    }

    /// Create the backing tables if they do not exist.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS roles (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                permissions JSONB NOT NULL DEFAULT '{}'::jsonb,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role_id UUID REFERENCES roles(id),
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn find_user_by_email_async(
        &self,
        email: &str,
    ) -> Result<Option<UserWithRole>, AuthError> {
        let sql = format!(
            "SELECT {USER_WITH_ROLE_COLUMNS} FROM users u \
             LEFT JOIN roles r ON r.id = u.role_id WHERE u.email = $1"
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&*self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(|r| user_with_role_from_row(&r)).transpose()
    }

    #[instrument(skip(self), err)]
    pub async fn find_user_by_id_async(
        &self,
        id: UserId,
    ) -> Result<Option<UserWithRole>, AuthError> {
        let sql = format!(
            "SELECT {USER_WITH_ROLE_COLUMNS} FROM users u \
             LEFT JOIN roles r ON r.id = u.role_id WHERE u.id = $1"
        );
        let row = sqlx::query(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(|r| user_with_role_from_row(&r)).transpose()
    }

    #[instrument(skip(self), err)]
    pub async fn list_users_async(&self) -> Result<Vec<UserWithRole>, AuthError> {
        let sql = format!(
            "SELECT {USER_WITH_ROLE_COLUMNS} FROM users u \
             LEFT JOIN roles r ON r.id = u.role_id ORDER BY u.created_at ASC"
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(user_with_role_from_row).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn delete_user_async(&self, id: UserId) -> Result<(), AuthError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(format!("user {id} not found")));
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn find_role_by_id_async(&self, id: RoleId) -> Result<Option<Role>, AuthError> {
        let row = sqlx::query(
            "SELECT id, name, permissions, created_at FROM roles WHERE id = $1",
        )
        .bind(*id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|r| role_from_row(&r, "id", "name", "permissions", "created_at"))
            .transpose()
    }

    #[instrument(skip(self), err)]
    pub async fn find_role_by_name_async(&self, name: &str) -> Result<Option<Role>, AuthError> {
        let row = sqlx::query(
            "SELECT id, name, permissions, created_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|r| role_from_row(&r, "id", "name", "permissions", "created_at"))
            .transpose()
    }

    #[instrument(skip(self), err)]
    pub async fn list_roles_async(&self) -> Result<Vec<Role>, AuthError> {
        let rows = sqlx::query(
            "SELECT id, name, permissions, created_at FROM roles ORDER BY name ASC",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|r| role_from_row(r, "id", "name", "permissions", "created_at"))
            .collect()
    }

    #[instrument(skip(self, user), fields(user_id = %user.id), err)]
    pub async fn save_user_async(&self, mut user: User) -> Result<User, AuthError> {
        // Guarded hash path; see `CredentialStore::save_user`.
        user.password_hash = self.hasher.hash(&user.password_hash)?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                role_id = EXCLUDED.role_id,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(*user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role_id.map(|r| *r.as_uuid()))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(user)
    }

    #[instrument(skip(self, role), fields(role_id = %role.id), err)]
    pub async fn save_role_async(&self, role: Role) -> Result<Role, AuthError> {
        let permissions = serde_json::to_value(&role.permissions)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO roles (id, name, permissions, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                permissions = EXCLUDED.permissions
            "#,
        )
        .bind(*role.id.as_uuid())
        .bind(&role.name)
        .bind(permissions)
        .bind(role.created_at)
        .execute(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(role)
    }
}

fn map_sqlx_error(e: sqlx::Error) -> AuthError {
    if let Some(db) = e.as_database_error() {
        if db.code().as_deref() == Some("23505") {
            return AuthError::Conflict(db.message().to_string());
        }
    }
    AuthError::Storage(e.to_string())
}

fn role_from_row(
    row: &PgRow,
    id: &str,
    name: &str,
    permissions: &str,
    created_at: &str,
) -> Result<Role, AuthError> {
    let permissions: PermissionMap =
        serde_json::from_value(row.try_get::<serde_json::Value, _>(permissions).map_err(map_sqlx_error)?)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(Role {
        id: RoleId::from_uuid(row.try_get(id).map_err(map_sqlx_error)?),
        name: row.try_get(name).map_err(map_sqlx_error)?,
        permissions,
        created_at: row.try_get(created_at).map_err(map_sqlx_error)?,
    })
}

fn user_with_role_from_row(row: &PgRow) -> Result<UserWithRole, AuthError> {
    let role = match row
        .try_get::<Option<uuid::Uuid>, _>("r_id")
        .map_err(map_sqlx_error)?
    {
        Some(_) => Some(role_from_row(row, "r_id", "r_name", "r_permissions", "r_created_at")?),
        None => None,
    };

    let user = User {
        id: UserId::from_uuid(row.try_get("id").map_err(map_sqlx_error)?),
        email: row.try_get("email").map_err(map_sqlx_error)?,
        password_hash: row.try_get("password_hash").map_err(map_sqlx_error)?,
        role_id: row
            .try_get::<Option<uuid::Uuid>, _>("role_id")
            .map_err(map_sqlx_error)?
            .map(RoleId::from_uuid),
        created_at: row.try_get("created_at").map_err(map_sqlx_error)?,
        updated_at: row.try_get("updated_at").map_err(map_sqlx_error)?,
    };

    Ok(UserWithRole { user, role })
}

/// Run an async store operation from the synchronous trait.
///
/// Works when called from within a tokio runtime on a thread that may block
/// (e.g. `spawn_blocking`), which is how the HTTP layer drives this store.
fn block_on<F, T>(fut: F) -> Result<T, AuthError>
where
    F: Future<Output = Result<T, AuthError>>,
{
    let handle = tokio::runtime::Handle::try_current().map_err(|_| {
        AuthError::Storage(
            "PostgresCredentialStore requires a tokio runtime context".to_string(),
        )
    })?;
    handle.block_on(fut)
}

impl CredentialStore for PostgresCredentialStore {
    fn find_user_by_email(&self, email: &str) -> Result<Option<UserWithRole>, AuthError> {
        block_on(self.find_user_by_email_async(email))
    }

    fn find_user_by_id(&self, id: UserId) -> Result<Option<UserWithRole>, AuthError> {
        block_on(self.find_user_by_id_async(id))
    }

    fn list_users(&self) -> Result<Vec<UserWithRole>, AuthError> {
        block_on(self.list_users_async())
    }

    fn delete_user(&self, id: UserId) -> Result<(), AuthError> {
        block_on(self.delete_user_async(id))
    }

    fn find_role_by_id(&self, id: RoleId) -> Result<Option<Role>, AuthError> {
        block_on(self.find_role_by_id_async(id))
    }

    fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AuthError> {
        block_on(self.find_role_by_name_async(name))
    }

    fn list_roles(&self) -> Result<Vec<Role>, AuthError> {
        block_on(self.list_roles_async())
    }

    fn save_user(&self, user: User) -> Result<User, AuthError> {
        block_on(self.save_user_async(user))
    }

    fn save_role(&self, role: Role) -> Result<Role, AuthError> {
        block_on(self.save_role_async(role))
    }
}
