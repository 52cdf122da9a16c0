//! Repository coverage against a live Postgres. Run with
//! `TEST_POSTGRES_URL=postgres://... cargo test -- --ignored`.

use chrono::{Duration, Utc};
use school_admin::domain::models::user::{NewUserParams, UniqueField, User};
use school_admin::domain::ports::{RoleRepository, UserRepository};
use school_admin::error::AppError;
use school_admin::infra::factory::{seed_roles, POSTGRES_MIGRATOR};
use school_admin::infra::repositories::{
    postgres_role_repo::PostgresRoleRepo, postgres_user_repo::PostgresUserRepo,
};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

const ROLES: [&str; 3] = ["admin", "guru", "operator"];

async fn repos() -> Option<(PostgresUserRepo, PostgresRoleRepo)> {
    let url = match std::env::var("TEST_POSTGRES_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_POSTGRES_URL not set, skipping");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to Postgres");
    POSTGRES_MIGRATOR.run(&pool).await.expect("Failed to migrate Postgres");

    let roles = PostgresRoleRepo::new(pool.clone());
    let names: Vec<String> = ROLES.iter().map(|r| r.to_string()).collect();
    seed_roles(&roles, &names).await.expect("Failed to seed roles");

    Some((PostgresUserRepo::new(pool), roles))
}

/// Every run uses fresh unique values since the database is shared.
fn new_user(tag: &str, name: &str) -> User {
    let token = Uuid::new_v4().simple().to_string();
    User::new(NewUserParams {
        nik: token[..16].to_string(),
        username: format!("{}_{}", tag, token),
        name: name.to_string(),
        email: format!("{}_{}@sekolah.test", tag, token),
        phone: "0800".to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
    })
}

async fn role_ids(roles: &PostgresRoleRepo, names: &[&str]) -> Vec<String> {
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    roles.find_by_names(&names).await.unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect()
}

async fn role_names_of(roles: &PostgresRoleRepo, user_id: &str) -> Vec<String> {
    let mut by_user = roles.roles_for_users(&[user_id.to_string()]).await.unwrap();
    by_user.remove(user_id).unwrap_or_default()
        .into_iter()
        .map(|r| r.name)
        .collect()
}

#[tokio::test]
#[ignore]
async fn test_postgres_role_lookup_assign_and_sync() {
    let Some((users, roles)) = repos().await else { return };

    let found = roles.find_by_names(&["guru".to_string(), "missing".to_string()]).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "guru");

    let again = roles.ensure("guru").await.unwrap();
    assert_eq!(again.id, found[0].id);

    let user = users.create(&new_user("pg_sync", "Pg Sync")).await.unwrap();

    roles.assign(&user.id, &role_ids(&roles, &["guru"]).await).await.unwrap();
    roles.assign(&user.id, &role_ids(&roles, &["admin", "guru"]).await).await.unwrap();
    assert_eq!(role_names_of(&roles, &user.id).await, vec!["admin", "guru"]);

    roles.sync(&user.id, &role_ids(&roles, &["guru", "operator"]).await).await.unwrap();
    assert_eq!(role_names_of(&roles, &user.id).await, vec!["guru", "operator"]);

    roles.sync(&user.id, &[]).await.unwrap();
    assert!(role_names_of(&roles, &user.id).await.is_empty());

    assert!(users.delete(&user.id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_postgres_roles_for_users_groups_by_user() {
    let Some((users, roles)) = repos().await else { return };

    let first = users.create(&new_user("pg_group_a", "Group A")).await.unwrap();
    let second = users.create(&new_user("pg_group_b", "Group B")).await.unwrap();
    roles.assign(&first.id, &role_ids(&roles, &["admin"]).await).await.unwrap();
    roles.assign(&second.id, &role_ids(&roles, &["guru", "operator"]).await).await.unwrap();

    let by_user = roles.roles_for_users(&[first.id.clone(), second.id.clone()]).await.unwrap();
    let names = |id: &str| -> Vec<String> {
        by_user[id].iter().map(|r| r.name.clone()).collect()
    };
    assert_eq!(names(&first.id), vec!["admin"]);
    assert_eq!(names(&second.id), vec!["guru", "operator"]);

    assert!(roles.roles_for_users(&[]).await.unwrap().is_empty());

    users.delete(&first.id).await.unwrap();
    users.delete(&second.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_postgres_paginate_filters_and_uniqueness() {
    let Some((users, _roles)) = repos().await else { return };

    let marker = format!("Pg{}", &Uuid::new_v4().simple().to_string()[..8]);
    let mut created = Vec::new();
    for i in 0..7 {
        let mut user = new_user("pg_page", &format!("{} {}", marker, i));
        user.created_at = Utc::now() - Duration::seconds(100 - i);
        created.push(users.create(&user).await.unwrap());
    }

    let (first_page, total) = users.paginate(Some(&marker), 1, 5).await.unwrap();
    assert_eq!(total, 7);
    assert_eq!(first_page.len(), 5);
    assert_eq!(first_page[0].name, format!("{} 6", marker));

    let (second_page, _) = users.paginate(Some(&marker), 2, 5).await.unwrap();
    let names: Vec<String> = second_page.into_iter().map(|u| u.name).collect();
    assert_eq!(names, vec![format!("{} 1", marker), format!("{} 0", marker)]);

    let existing = &created[0];
    assert!(users.exists_by(UniqueField::Email, &existing.email, None).await.unwrap());
    assert!(!users.exists_by(UniqueField::Email, &existing.email, Some(existing.id.as_str())).await.unwrap());

    let mut clash = new_user("pg_clash", "Clash");
    clash.username = existing.username.clone();
    match users.create(&clash).await {
        Err(AppError::Validation(errors)) => assert!(errors.contains("username")),
        other => panic!("expected username validation error, got {:?}", other.map(|u| u.id)),
    }

    for user in created {
        users.delete(&user.id).await.unwrap();
    }
}
