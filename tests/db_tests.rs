//! Database integration tests
//!
//! These tests verify the TursoClient functionality using in-memory SQLite.

use jobly::{
    db::{FieldMap, NewUser, TursoClient},
    types::{AppError, CompanyFilter, JobFilter, NewCompany, NewJob},
};
use serde_json::json;

/// Test helper to create a TursoClient with in-memory database
async fn create_test_client() -> TursoClient {
    TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database")
}

fn company(handle: &str, employees: Option<i64>) -> NewCompany {
    NewCompany {
        handle: handle.to_string(),
        name: format!("Company {}", handle),
        description: "Desc".to_string(),
        num_employees: employees,
        logo_url: None,
    }
}

fn user<'a>(username: &'a str) -> NewUser<'a> {
    NewUser {
        username,
        password_hash: "$argon2id$placeholder",
        first_name: "First",
        last_name: "Last",
        email: "user@example.com",
        is_admin: false,
    }
}

fn fields(value: serde_json::Value) -> FieldMap {
    value.as_object().cloned().expect("object literal")
}

#[tokio::test]
async fn test_create_memory_client() {
    let client = create_test_client().await;
    assert!(client.connection().is_ok());
}

#[tokio::test]
async fn test_memory_database_persists_across_calls() {
    let client = create_test_client().await;

    client.create_company(&company("acme", Some(5))).await.unwrap();
    let found = client.get_company("acme").await.unwrap();

    assert_eq!(found.company.num_employees, Some(5));
    assert!(found.jobs.is_empty());
}

#[tokio::test]
async fn test_create_duplicate_company_fails() {
    let client = create_test_client().await;

    client.create_company(&company("acme", None)).await.unwrap();
    let result = client.create_company(&company("acme", None)).await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_find_companies_filters() {
    let client = create_test_client().await;
    for (handle, n) in [("a", 1), ("b", 50), ("c", 500)] {
        client.create_company(&company(handle, Some(n))).await.unwrap();
    }

    let all = client.find_companies(&CompanyFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let mid = client
        .find_companies(&CompanyFilter {
            min_employees: Some(10),
            max_employees: Some(100),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(mid.len(), 1);
    assert_eq!(mid[0].handle, "b");

    let by_name = client
        .find_companies(&CompanyFilter {
            name_like: Some("company C".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
}

#[tokio::test]
async fn test_find_companies_inverted_range() {
    let client = create_test_client().await;

    let result = client
        .find_companies(&CompanyFilter {
            min_employees: Some(10),
            max_employees: Some(1),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_name_filter_is_parameterized() {
    let client = create_test_client().await;
    client.create_company(&company("acme", None)).await.unwrap();

    let found = client
        .find_companies(&CompanyFilter {
            name_like: Some("' OR 1=1 --".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(found.is_empty());
}

#[tokio::test]
async fn test_update_company_partial() {
    let client = create_test_client().await;
    client.create_company(&company("acme", Some(5))).await.unwrap();

    let updated = client
        .update_company("acme", &fields(json!({"numEmployees": 7, "logoUrl": "http://x"})))
        .await
        .unwrap();

    assert_eq!(updated.num_employees, Some(7));
    assert_eq!(updated.logo_url.as_deref(), Some("http://x"));
    assert_eq!(updated.name, "Company acme");
}

#[tokio::test]
async fn test_update_company_null_clears_column() {
    let client = create_test_client().await;
    client.create_company(&company("acme", Some(5))).await.unwrap();

    let updated = client
        .update_company("acme", &fields(json!({"numEmployees": null})))
        .await
        .unwrap();

    assert_eq!(updated.num_employees, None);
}

#[tokio::test]
async fn test_update_company_rejects_unknown_field() {
    let client = create_test_client().await;
    client.create_company(&company("acme", None)).await.unwrap();

    let result = client
        .update_company("acme", &fields(json!({"handle": "other"})))
        .await;

    assert!(matches!(result, Err(AppError::Contract(_))));
}

#[tokio::test]
async fn test_update_job_null_title_is_invalid_input() {
    let client = create_test_client().await;
    client.create_company(&company("acme", None)).await.unwrap();
    let job = client
        .create_job(&NewJob {
            title: "Dev".to_string(),
            salary: None,
            equity: None,
            company_handle: "acme".to_string(),
        })
        .await
        .unwrap();

    let result = client.update_job(job.id, &fields(json!({"title": null}))).await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_update_missing_company() {
    let client = create_test_client().await;

    let result = client
        .update_company("ghost", &fields(json!({"name": "Ghost"})))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_remove_company_cascades() {
    let client = create_test_client().await;
    client.create_company(&company("acme", None)).await.unwrap();
    let job = client
        .create_job(&NewJob {
            title: "Engineer".to_string(),
            salary: Some(100),
            equity: None,
            company_handle: "acme".to_string(),
        })
        .await
        .unwrap();

    client.remove_company("acme").await.unwrap();

    assert!(matches!(client.get_job(job.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        client.remove_company("acme").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_jobs_filters_and_update() {
    let client = create_test_client().await;
    client.create_company(&company("acme", None)).await.unwrap();
    for (title, salary, equity) in [("Dev", 100, Some(0.05)), ("Ops", 50, None)] {
        client
            .create_job(&NewJob {
                title: title.to_string(),
                salary: Some(salary),
                equity,
                company_handle: "acme".to_string(),
            })
            .await
            .unwrap();
    }

    let equity = client
        .find_jobs(&JobFilter {
            has_equity: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(equity.len(), 1);
    assert_eq!(equity[0].title, "Dev");

    let titled = client
        .find_jobs(&JobFilter {
            title: Some("op".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titled.len(), 1);

    let updated = client
        .update_job(equity[0].id, &fields(json!({"salary": 150})))
        .await
        .unwrap();
    assert_eq!(updated.salary, Some(150));
    assert_eq!(updated.title, "Dev");
}

#[tokio::test]
async fn test_create_job_unknown_company() {
    let client = create_test_client().await;

    let result = client
        .create_job(&NewJob {
            title: "Dev".to_string(),
            salary: None,
            equity: None,
            company_handle: "ghost".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_create_user_and_credentials() {
    let client = create_test_client().await;

    let created = client.create_user(&user("alice")).await.unwrap();
    assert_eq!(created.username, "alice");
    assert!(!created.is_admin);

    let credentials = client
        .get_user_credentials("alice")
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(credentials.password_hash, "$argon2id$placeholder");

    assert!(client.get_user_credentials("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_duplicate_user_fails() {
    let client = create_test_client().await;

    client.create_user(&user("alice")).await.unwrap();
    let result = client.create_user(&user("alice")).await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_update_user_uses_column_aliases() {
    let client = create_test_client().await;
    client.create_user(&user("alice")).await.unwrap();

    let updated = client
        .update_user(
            "alice",
            &fields(json!({"firstName": "Alicia", "email": "alicia@example.com"})),
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Alicia");
    assert_eq!(updated.email, "alicia@example.com");
    assert_eq!(updated.last_name, "Last");
}

#[tokio::test]
async fn test_update_user_rejects_admin_flag() {
    let client = create_test_client().await;
    client.create_user(&user("alice")).await.unwrap();

    let result = client
        .update_user("alice", &fields(json!({"isAdmin": true})))
        .await;

    assert!(matches!(result, Err(AppError::Contract(_))));
}

#[tokio::test]
async fn test_applications() {
    let client = create_test_client().await;
    client.create_company(&company("acme", None)).await.unwrap();
    client.create_user(&user("alice")).await.unwrap();
    let job = client
        .create_job(&NewJob {
            title: "Dev".to_string(),
            salary: None,
            equity: None,
            company_handle: "acme".to_string(),
        })
        .await
        .unwrap();

    client.apply_to_job("alice", job.id).await.unwrap();

    let detail = client.get_user("alice").await.unwrap();
    assert_eq!(detail.applications, vec![job.id]);

    assert!(matches!(
        client.apply_to_job("alice", 9999).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        client.apply_to_job("ghost", job.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_remove_user() {
    let client = create_test_client().await;
    client.create_user(&user("alice")).await.unwrap();

    client.remove_user("alice").await.unwrap();

    assert!(matches!(client.get_user("alice").await, Err(AppError::NotFound(_))));
}
