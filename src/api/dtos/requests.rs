use serde::Deserialize;

#[derive(Deserialize, Default)]
pub struct ListUsersQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
}
