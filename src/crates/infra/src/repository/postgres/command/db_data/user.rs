//! `SeaORM` Entity for User

use domain::user::{User, UserStatus};
use domain::value::UserId;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Default)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[sea_orm(column_type = "BigInteger")]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub password: String,
    pub last_login_at: DateTime,
    pub status: i32,
    #[sea_orm(column_type = "BigInteger")]
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    #[allow(dead_code)]
    None,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            id: Set(user.id.as_i64()),
            username: Set(user.username.clone()),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            is_admin: Set(user.is_admin),
            password: Set(user.password.clone()),
            last_login_at: Set(user.last_login_at),
            status: Set(user.status.clone().into()),
            version: Set(user.version),
        }
    }
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: UserId::from(model.id),
            username: model.username,
            name: model.name,
            email: model.email,
            is_admin: model.is_admin,
            password: model.password,
            last_login_at: model.last_login_at,
            status: UserStatus::try_from(model.status).unwrap_or(UserStatus::New),
            version: model.version,
        }
    }
}
