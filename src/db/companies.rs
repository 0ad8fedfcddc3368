use super::sql::{sql_for_partial_update, FieldMap, UpdatableColumns, UpdateStatement, WhereBuilder};
use super::turso::{get_opt_integer, get_opt_real, get_opt_text, get_integer, get_text, TursoClient};
use crate::types::{AppError, Company, CompanyDetail, CompanyFilter, JobSummary, NewCompany, Result};
use libsql::Row;
use serde_json::{json, Value};

/// Fields accepted by `PATCH /companies/{handle}`. The handle is immutable.
pub const COMPANY_UPDATE_COLUMNS: UpdatableColumns = UpdatableColumns {
    allowed: &["name", "description", "numEmployees", "logoUrl"],
    aliases: &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")],
};

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

fn company_from_row(row: &Row) -> Result<Company> {
    Ok(Company {
        handle: get_text(row, 0)?,
        name: get_text(row, 1)?,
        description: get_text(row, 2)?,
        num_employees: get_opt_integer(row, 3)?,
        logo_url: get_opt_text(row, 4)?,
    })
}

impl TursoClient {
    pub async fn create_company(&self, company: &NewCompany) -> Result<Company> {
        let exists = self
            .query_opt(
                "SELECT handle FROM companies WHERE handle = $1",
                vec![json!(company.handle)],
                |row| get_text(row, 0),
            )
            .await?;
        if exists.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Duplicate company: {}",
                company.handle
            )));
        }

        self.query_opt(
            &format!(
                "INSERT INTO companies ({COMPANY_COLUMNS})
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {COMPANY_COLUMNS}"
            ),
            vec![
                json!(company.handle),
                json!(company.name),
                json!(company.description),
                json!(company.num_employees),
                json!(company.logo_url),
            ],
            company_from_row,
        )
        .await?
        .ok_or_else(|| AppError::Database("Insert returned no company".to_string()))
    }

    /// Lists companies ordered by name, narrowed by the optional filters.
    pub async fn find_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>> {
        if let (Some(min), Some(max)) = (filter.min_employees, filter.max_employees) {
            if min > max {
                return Err(AppError::InvalidInput(
                    "minEmployees cannot be greater than maxEmployees".to_string(),
                ));
            }
        }

        let mut conditions = WhereBuilder::new();
        if let Some(min) = filter.min_employees {
            conditions.push("num_employees >= $", min);
        }
        if let Some(max) = filter.max_employees {
            conditions.push("num_employees <= $", max);
        }
        if let Some(name) = filter.name_like.as_deref().filter(|n| !n.is_empty()) {
            conditions.push("name LIKE $", format!("%{}%", name));
        }
        let (where_clause, values) = conditions.build();

        self.query_map(
            &format!("SELECT {COMPANY_COLUMNS} FROM companies {where_clause} ORDER BY name"),
            values,
            company_from_row,
        )
        .await
    }

    /// Fetches one company together with its jobs.
    pub async fn get_company(&self, handle: &str) -> Result<CompanyDetail> {
        let company = self
            .query_opt(
                &format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = $1"),
                vec![json!(handle)],
                company_from_row,
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No company: {}", handle)))?;

        let jobs = self
            .query_map(
                "SELECT id, title, salary, equity FROM jobs
                 WHERE company_handle = $1 ORDER BY id",
                vec![json!(handle)],
                |row| {
                    Ok(JobSummary {
                        id: get_integer(row, 0)?,
                        title: get_text(row, 1)?,
                        salary: get_opt_integer(row, 2)?,
                        equity: get_opt_real(row, 3)?,
                    })
                },
            )
            .await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Applies a partial update. Only fields in
    /// [`COMPANY_UPDATE_COLUMNS`] are accepted.
    pub async fn update_company(&self, handle: &str, fields: &FieldMap) -> Result<Company> {
        let update = sql_for_partial_update(fields, &COMPANY_UPDATE_COLUMNS)?;
        let statement = UpdateStatement::new(
            "companies",
            update,
            "handle",
            Value::from(handle),
            COMPANY_COLUMNS,
        );

        self.query_opt(&statement.sql, statement.values, company_from_row)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No company: {}", handle)))
    }

    pub async fn remove_company(&self, handle: &str) -> Result<()> {
        let removed = self
            .execute("DELETE FROM companies WHERE handle = $1", vec![json!(handle)])
            .await?;

        if removed == 0 {
            return Err(AppError::NotFound(format!("No company: {}", handle)));
        }

        Ok(())
    }
}
