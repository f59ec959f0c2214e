use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Visitor,
    #[default]
    User,
    Admin,
}

impl Role {
    // visitor は閲覧のみ
    pub fn can_reserve(self) -> bool {
        matches!(self, Role::User | Role::Admin)
    }
}
