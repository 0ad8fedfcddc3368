use super::sql::{sql_for_partial_update, FieldMap, UpdatableColumns, UpdateStatement};
use super::turso::{get_bool, get_integer, get_text, TursoClient};
use crate::types::{AppError, Result, User, UserCredentials, UserDetail};
use libsql::Row;
use serde_json::{json, Value};

/// Fields accepted by `PATCH /users/{username}`. Username and admin flag
/// are not updatable.
pub const USER_UPDATE_COLUMNS: UpdatableColumns = UpdatableColumns {
    allowed: &["firstName", "lastName", "email", "password"],
    aliases: &[("firstName", "first_name"), ("lastName", "last_name")],
};

const USER_COLUMNS: &str = "username, first_name, last_name, email, is_admin";

fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        username: get_text(row, 0)?,
        first_name: get_text(row, 1)?,
        last_name: get_text(row, 2)?,
        email: get_text(row, 3)?,
        is_admin: get_bool(row, 4)?,
    })
}

/// A user to insert; `password_hash` is already digested.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub is_admin: bool,
}

impl TursoClient {
    pub async fn create_user(&self, user: &NewUser<'_>) -> Result<User> {
        let exists = self
            .query_opt(
                "SELECT username FROM users WHERE username = $1",
                vec![json!(user.username)],
                |row| get_text(row, 0),
            )
            .await?;
        if exists.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Duplicate username: {}",
                user.username
            )));
        }

        self.query_opt(
            &format!(
                "INSERT INTO users (username, password, first_name, last_name, email, is_admin)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING {USER_COLUMNS}"
            ),
            vec![
                json!(user.username),
                json!(user.password_hash),
                json!(user.first_name),
                json!(user.last_name),
                json!(user.email),
                json!(user.is_admin),
            ],
            user_from_row,
        )
        .await?
        .ok_or_else(|| AppError::Database("Insert returned no user".to_string()))
    }

    /// Loads a user along with the stored password digest, for login.
    pub async fn get_user_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
        self.query_opt(
            &format!("SELECT {USER_COLUMNS}, password FROM users WHERE username = $1"),
            vec![json!(username)],
            |row| {
                Ok(UserCredentials {
                    user: user_from_row(row)?,
                    password_hash: get_text(row, 5)?,
                })
            },
        )
        .await
    }

    pub async fn find_users(&self) -> Result<Vec<User>> {
        self.query_map(
            &format!("SELECT {USER_COLUMNS} FROM users ORDER BY username"),
            Vec::new(),
            user_from_row,
        )
        .await
    }

    /// Fetches one user together with the ids of the jobs they applied to.
    pub async fn get_user(&self, username: &str) -> Result<UserDetail> {
        let user = self
            .query_opt(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"),
                vec![json!(username)],
                user_from_row,
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user: {}", username)))?;

        let applications = self
            .query_map(
                "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id",
                vec![json!(username)],
                |row| get_integer(row, 0),
            )
            .await?;

        Ok(UserDetail { user, applications })
    }

    /// Applies a partial update. Only fields in [`USER_UPDATE_COLUMNS`] are
    /// accepted; a `password` value must already be a digest.
    pub async fn update_user(&self, username: &str, fields: &FieldMap) -> Result<User> {
        let update = sql_for_partial_update(fields, &USER_UPDATE_COLUMNS)?;
        let statement = UpdateStatement::new(
            "users",
            update,
            "username",
            Value::from(username),
            USER_COLUMNS,
        );

        self.query_opt(&statement.sql, statement.values, user_from_row)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user: {}", username)))
    }

    pub async fn remove_user(&self, username: &str) -> Result<()> {
        let removed = self
            .execute("DELETE FROM users WHERE username = $1", vec![json!(username)])
            .await?;

        if removed == 0 {
            return Err(AppError::NotFound(format!("No user: {}", username)));
        }

        Ok(())
    }

    /// Records that `username` applied to job `job_id`.
    pub async fn apply_to_job(&self, username: &str, job_id: i64) -> Result<()> {
        let job = self
            .query_opt("SELECT id FROM jobs WHERE id = $1", vec![json!(job_id)], |row| {
                get_integer(row, 0)
            })
            .await?;
        if job.is_none() {
            return Err(AppError::NotFound(format!("No job: {}", job_id)));
        }

        let user = self
            .query_opt(
                "SELECT username FROM users WHERE username = $1",
                vec![json!(username)],
                |row| get_text(row, 0),
            )
            .await?;
        if user.is_none() {
            return Err(AppError::NotFound(format!("No username: {}", username)));
        }

        self.execute(
            "INSERT INTO applications (username, job_id) VALUES ($1, $2)",
            vec![json!(username), json!(job_id)],
        )
        .await?;

        Ok(())
    }
}
