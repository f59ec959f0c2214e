use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{
        event::{CreateUser, LoginUser, UpdateUser},
        User,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Visitor,
    User,
    Admin,
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Visitor => Self::Visitor,
            Role::User => Self::User,
            Role::Admin => Self::Admin,
        }
    }
}

impl From<RoleName> for Role {
    fn from(value: RoleName) -> Self {
        match value {
            RoleName::Visitor => Self::Visitor,
            RoleName::User => Self::User,
            RoleName::Admin => Self::Admin,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub items: Vec<UserResponse>,
}

impl From<Vec<User>> for UsersResponse {
    fn from(value: Vec<User>) -> Self {
        Self {
            items: value.into_iter().map(UserResponse::from).collect(),
        }
    }
}

// パスワードはレスポンスに含めない
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: RoleName,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            email,
            name,
            role,
            created_at,
        } = value;
        Self {
            id: user_id,
            email,
            name,
            role: RoleName::from(role),
            created_at,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[garde(email)]
    email: String,
    #[garde(length(min = 1))]
    password: String,
    #[garde(length(min = 1, max = 255))]
    name: String,
    #[garde(skip)]
    #[serde(default)]
    role: Option<RoleName>,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(value: CreateUserRequest) -> Self {
        let CreateUserRequest {
            email,
            password,
            name,
            role,
        } = value;
        Self {
            email,
            name,
            password,
            role: role.map(Role::from).unwrap_or_default(),
        }
    }
}

// 入力の不足もフィールド単位では返さず、認証失敗として扱う
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[garde(skip)]
    #[serde(default)]
    email: String,
    #[garde(skip)]
    #[serde(default)]
    password: String,
}

impl LoginRequest {
    pub fn is_incomplete(&self) -> bool {
        self.email.trim().is_empty() || self.password.is_empty()
    }
}

impl From<LoginRequest> for LoginUser {
    fn from(value: LoginRequest) -> Self {
        let LoginRequest { email, password } = value;
        Self { email, password }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[garde(length(min = 1, max = 255))]
    name: Option<String>,
    #[garde(skip)]
    role: Option<RoleName>,
    #[garde(length(min = 1))]
    password: Option<String>,
}

#[derive(new)]
pub struct UpdateUserRequestWithUserId(UserId, UpdateUserRequest);
impl From<UpdateUserRequestWithUserId> for UpdateUser {
    fn from(value: UpdateUserRequestWithUserId) -> Self {
        let UpdateUserRequestWithUserId(
            user_id,
            UpdateUserRequest {
                name,
                role,
                password,
            },
        ) = value;
        Self {
            user_id,
            name,
            role: role.map(Role::from),
            password,
        }
    }
}
