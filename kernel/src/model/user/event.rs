use crate::model::{id::UserId, role::Role};
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, new)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct UpdateUser {
    pub user_id: UserId,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}
