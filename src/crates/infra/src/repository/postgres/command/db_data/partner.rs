//! `SeaORM` Entity for Partner

use domain::partner::{BusinessStatus, CapacityType, CooperationStatus, Partner};
use domain::value::PartnerId;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Default)]
#[sea_orm(table_name = "partner")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[sea_orm(column_type = "BigInteger")]
    pub id: i64,
    #[sea_orm(unique)]
    pub partner_code: String,
    pub name: String,
    pub city: String,
    pub region: Option<String>,
    pub business_status: i32,
    pub cooperation_status: i32,
    pub capacity_type: i32,
    pub car_target: i32,
    pub bike_target: i32,
    pub total_target: i32,
    pub email: Option<String>,
    pub secondary_email: Option<String>,
    pub phone: Option<String>,
    pub manager_ids: Option<String>,
    pub is_active: bool,
    #[sea_orm(column_type = "BigInteger")]
    pub version: i64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
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

impl From<&Partner> for ActiveModel {
    fn from(partner: &Partner) -> Self {
        Self {
            id: Set(partner.id.as_i64()),
            partner_code: Set(partner.partner_code.clone()),
            name: Set(partner.name.clone()),
            city: Set(partner.city.clone()),
            region: Set(partner.region.clone()),
            business_status: Set(partner.business_status.into()),
            cooperation_status: Set(partner.cooperation_status.into()),
            capacity_type: Set(partner.capacity_type.into()),
            car_target: Set(partner.car_target),
            bike_target: Set(partner.bike_target),
            total_target: Set(partner.total_target),
            email: Set(partner.email.clone()),
            secondary_email: Set(partner.secondary_email.clone()),
            phone: Set(partner.phone.clone()),
            manager_ids: Set(partner.manager_ids.clone()),
            is_active: Set(partner.is_active),
            version: Set(partner.version),
            created_at: Set(partner.created_at),
            updated_at: Set(partner.updated_at),
        }
    }
}

impl From<Model> for Partner {
    fn from(model: Model) -> Self {
        Partner {
            id: PartnerId::from(model.id),
            partner_code: model.partner_code,
            name: model.name,
            city: model.city,
            region: model.region,
            // 库里出现未知枚举值时回落到保守档
            business_status: BusinessStatus::try_from(model.business_status)
                .unwrap_or(BusinessStatus::Close),
            cooperation_status: CooperationStatus::try_from(model.cooperation_status)
                .unwrap_or(CooperationStatus::Pending),
            capacity_type: CapacityType::try_from(model.capacity_type)
                .unwrap_or(CapacityType::Mixed),
            car_target: model.car_target,
            bike_target: model.bike_target,
            total_target: model.total_target,
            email: model.email,
            secondary_email: model.secondary_email,
            phone: model.phone,
            manager_ids: model.manager_ids,
            is_active: model.is_active,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
