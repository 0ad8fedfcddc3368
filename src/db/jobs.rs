use super::sql::{sql_for_partial_update, FieldMap, UpdatableColumns, UpdateStatement, WhereBuilder};
use super::turso::{get_integer, get_opt_integer, get_opt_real, get_text, TursoClient};
use crate::types::{AppError, Job, JobFilter, NewJob, Result};
use libsql::Row;
use serde_json::{json, Value};

/// Fields accepted by `PATCH /jobs/{id}`. A job never changes company.
pub const JOB_UPDATE_COLUMNS: UpdatableColumns = UpdatableColumns {
    allowed: &["title", "salary", "equity"],
    aliases: &[],
};

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

fn job_from_row(row: &Row) -> Result<Job> {
    Ok(Job {
        id: get_integer(row, 0)?,
        title: get_text(row, 1)?,
        salary: get_opt_integer(row, 2)?,
        equity: get_opt_real(row, 3)?,
        company_handle: get_text(row, 4)?,
    })
}

impl TursoClient {
    pub async fn create_job(&self, job: &NewJob) -> Result<Job> {
        let company = self
            .query_opt(
                "SELECT handle FROM companies WHERE handle = $1",
                vec![json!(job.company_handle)],
                |row| get_text(row, 0),
            )
            .await?;
        if company.is_none() {
            return Err(AppError::InvalidInput(format!(
                "No company: {}",
                job.company_handle
            )));
        }

        self.query_opt(
            &format!(
                "INSERT INTO jobs (title, salary, equity, company_handle)
                 VALUES ($1, $2, $3, $4)
                 RETURNING {JOB_COLUMNS}"
            ),
            vec![
                json!(job.title),
                json!(job.salary),
                json!(job.equity),
                json!(job.company_handle),
            ],
            job_from_row,
        )
        .await?
        .ok_or_else(|| AppError::Database("Insert returned no job".to_string()))
    }

    /// Lists jobs ordered by title, narrowed by the optional filters.
    pub async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let mut conditions = WhereBuilder::new();
        if let Some(title) = filter.title.as_deref().filter(|t| !t.is_empty()) {
            conditions.push("title LIKE $", format!("%{}%", title));
        }
        if let Some(min) = filter.min_salary {
            conditions.push("salary >= $", min);
        }
        if filter.has_equity == Some(true) {
            conditions.push_raw("equity > 0");
        }
        let (where_clause, values) = conditions.build();

        self.query_map(
            &format!("SELECT {JOB_COLUMNS} FROM jobs {where_clause} ORDER BY title, id"),
            values,
            job_from_row,
        )
        .await
    }

    pub async fn get_job(&self, id: i64) -> Result<Job> {
        self.query_opt(
            &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"),
            vec![json!(id)],
            job_from_row,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No job: {}", id)))
    }

    /// Applies a partial update. Only fields in [`JOB_UPDATE_COLUMNS`] are
    /// accepted.
    pub async fn update_job(&self, id: i64, fields: &FieldMap) -> Result<Job> {
        let update = sql_for_partial_update(fields, &JOB_UPDATE_COLUMNS)?;
        let statement = UpdateStatement::new("jobs", update, "id", Value::from(id), JOB_COLUMNS);

        self.query_opt(&statement.sql, statement.values, job_from_row)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No job: {}", id)))
    }

    pub async fn remove_job(&self, id: i64) -> Result<()> {
        let removed = self
            .execute("DELETE FROM jobs WHERE id = $1", vec![json!(id)])
            .await?;

        if removed == 0 {
            return Err(AppError::NotFound(format!("No job: {}", id)));
        }

        Ok(())
    }
}
