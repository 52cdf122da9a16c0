use std::sync::Arc;
use chrono::Utc;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};
use validator::Validate;

use crate::domain::models::{
    context::RequestContext,
    pagination::{normalize_page, Page},
    role::Role,
    user::{NewUserParams, UniqueField, User, UserWithRoles},
};
use crate::domain::ports::{RoleRepository, UserRepository};
use crate::domain::services::password::hash_password;
use crate::error::{taken_message, AppError, FieldErrors};

pub const USERS_PER_PAGE: u32 = 5;

/// An explicit `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StoreUserInput {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, max = 16))]
    pub nik: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1), must_match(other = "password_confirmation"))]
    pub password: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub password_confirmation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

impl StoreUserInput {
    /// Surrounding whitespace is dropped everywhere except in passwords.
    fn trimmed(mut self) -> Self {
        for field in [&mut self.nik, &mut self.username, &mut self.name, &mut self.email, &mut self.phone] {
            *field = field.trim().to_string();
        }
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_confirmation: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

impl UpdateUserInput {
    fn trimmed(mut self) -> Self {
        for field in [&mut self.name, &mut self.phone, &mut self.email] {
            *field = field.trim().to_string();
        }
        self
    }

    /// The replacement password, if one was actually typed in.
    fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug)]
pub struct EditForm {
    pub user: UserWithRoles,
    pub roles: Vec<Role>,
}

pub struct UserAdminService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl UserAdminService {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { users, roles }
    }

    pub async fn list(&self, ctx: &RequestContext, q: Option<&str>, page: Option<u32>) -> Result<Page<UserWithRoles>, AppError> {
        let q = q.map(str::trim).filter(|q| !q.is_empty());
        let page = normalize_page(page);

        let (users, total) = self.users.paginate(q, page, USERS_PER_PAGE).await?;
        let data = self.attach_roles(users).await?;

        debug!(request_id = %ctx.request_id, total, page, "Listed users");
        Ok(Page::new(data, page, USERS_PER_PAGE, total))
    }

    pub async fn create_form(&self, _ctx: &RequestContext) -> Result<Vec<Role>, AppError> {
        self.roles.list_all().await
    }

    pub async fn store(&self, ctx: &RequestContext, input: StoreUserInput) -> Result<UserWithRoles, AppError> {
        let input = input.trimmed();
        let mut errors = structural_errors(&input);

        for (field, value) in [
            (UniqueField::Nik, &input.nik),
            (UniqueField::Username, &input.username),
            (UniqueField::Email, &input.email),
        ] {
            if value.is_empty() || errors.contains(field.column()) {
                continue;
            }
            if self.users.exists_by(field, value, None).await? {
                errors.add(field.column(), taken_message(field.column()));
            }
        }

        let roles = self.resolve_roles(&input.roles, &mut errors).await?;
        errors.into_result()?;

        let password_hash = hash_password(&input.password)?;
        let user = User::new(NewUserParams {
            nik: input.nik,
            username: input.username,
            name: input.name,
            email: input.email,
            phone: input.phone,
            password_hash,
        });

        let created = self.users.create(&user).await?;
        let role_ids: Vec<String> = roles.iter().map(|r| r.id.clone()).collect();
        self.roles.assign(&created.id, &role_ids).await?;

        info!(request_id = %ctx.request_id, user_id = %created.id, roles = role_ids.len(), "Created user");
        Ok(UserWithRoles { user: created, roles })
    }

    pub async fn edit_form(&self, _ctx: &RequestContext, id: &str) -> Result<EditForm, AppError> {
        let user = self.find_or_fail(id).await?;
        let mut by_user = self.roles.roles_for_users(std::slice::from_ref(&user.id)).await?;
        let user_roles = by_user.remove(&user.id).unwrap_or_default();

        Ok(EditForm {
            user: UserWithRoles { user, roles: user_roles },
            roles: self.roles.list_all().await?,
        })
    }

    pub async fn update(&self, ctx: &RequestContext, id: &str, input: UpdateUserInput) -> Result<UserWithRoles, AppError> {
        let mut user = self.find_or_fail(id).await?;
        let input = input.trimmed();
        let mut errors = structural_errors(&input);

        if !input.email.is_empty()
            && !errors.contains("email")
            && self.users.exists_by(UniqueField::Email, &input.email, Some(user.id.as_str())).await?
        {
            errors.add("email", taken_message("email"));
        }

        if let Some(password) = input.new_password() {
            if input.password_confirmation.as_deref() != Some(password) {
                errors.add("password", "The password confirmation does not match.");
            }
        }

        let roles = self.resolve_roles(&input.roles, &mut errors).await?;
        errors.into_result()?;

        if let Some(password) = input.new_password() {
            user.password_hash = hash_password(password)?;
        }
        user.name = input.name;
        user.email = input.email;
        user.phone = input.phone;
        user.updated_at = Utc::now();

        let updated = self.users.update(&user).await?;
        let role_ids: Vec<String> = roles.iter().map(|r| r.id.clone()).collect();
        self.roles.sync(&updated.id, &role_ids).await?;

        info!(request_id = %ctx.request_id, user_id = %updated.id, roles = role_ids.len(), "Updated user");
        Ok(UserWithRoles { user: updated, roles })
    }

    pub async fn destroy(&self, ctx: &RequestContext, id: &str) -> Result<(), AppError> {
        let user = self.find_or_fail(id).await?;

        if !self.users.delete(&user.id).await? {
            return Err(AppError::NotFound("User not found".into()));
        }

        info!(request_id = %ctx.request_id, user_id = %user.id, "Deleted user");
        Ok(())
    }

    async fn find_or_fail(&self, id: &str) -> Result<User, AppError> {
        self.users.find_by_id(id).await?
            .ok_or(AppError::NotFound("User not found".into()))
    }

    async fn attach_roles(&self, users: Vec<User>) -> Result<Vec<UserWithRoles>, AppError> {
        let ids: Vec<String> = users.iter().map(|u| u.id.clone()).collect();
        let mut by_user = self.roles.roles_for_users(&ids).await?;

        Ok(users.into_iter().map(|user| {
            let roles = by_user.remove(&user.id).unwrap_or_default();
            UserWithRoles { user, roles }
        }).collect())
    }

    /// Resolves submitted role names against the catalog. Unknown names are
    /// reported on `roles` and leave the returned list short.
    async fn resolve_roles(&self, names: &[String], errors: &mut FieldErrors) -> Result<Vec<Role>, AppError> {
        let mut wanted: Vec<String> = Vec::new();
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            if !wanted.iter().any(|w| w == name) {
                wanted.push(name.to_string());
            }
        }

        let found = self.roles.find_by_names(&wanted).await?;
        for name in &wanted {
            if !found.iter().any(|r| &r.name == name) {
                errors.add("roles", format!("The selected role {} is invalid.", name));
            }
        }
        Ok(found)
    }
}

fn structural_errors(input: &impl Validate) -> FieldErrors {
    match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => e.into(),
    }
}
