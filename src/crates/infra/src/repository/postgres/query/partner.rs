use crate::repository::postgres::command::db_data::partner as db_partner;
use application::query::dao::{PartnerDao, PartnerFilter};
use application::query::QueryError;
use async_trait::async_trait;
use domain::partner::{BusinessStatus, CapacityType, CooperationStatus};
use model::partner::{PartnerPage, PartnerRecord};
use sea_orm::*;

pub struct PartnerDaoImpl {
    db: DatabaseConnection,
}

impl PartnerDaoImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_record(model: db_partner::Model) -> PartnerRecord {
        PartnerRecord {
            id: model.id,
            partner_code: model.partner_code,
            name: model.name,
            city: model.city,
            region: model.region,
            business_status: BusinessStatus::try_from(model.business_status)
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|_| model.business_status.to_string()),
            cooperation_status: CooperationStatus::try_from(model.cooperation_status)
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|_| model.cooperation_status.to_string()),
            capacity_type: CapacityType::try_from(model.capacity_type)
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|_| model.capacity_type.to_string()),
            car_target: model.car_target,
            bike_target: model.bike_target,
            total_target: model.total_target,
            email: model.email,
            secondary_email: model.secondary_email,
            phone: model.phone,
            manager_ids: model.manager_ids,
            is_active: model.is_active,
            updated_at: model.updated_at,
        }
    }

    fn build_condition(filter: &PartnerFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(region) = &filter.region {
            condition = condition.add(db_partner::Column::Region.eq(region.clone()));
        }
        if let Some(status) = filter.cooperation_status {
            condition = condition.add(db_partner::Column::CooperationStatus.eq(status));
        }
        if let Some(status) = filter.business_status {
            condition = condition.add(db_partner::Column::BusinessStatus.eq(status));
        }
        if let Some(is_active) = filter.is_active {
            condition = condition.add(db_partner::Column::IsActive.eq(is_active));
        }
        if let Some(q) = &filter.q {
            let pattern = format!("%{}%", q);
            condition = condition.add(
                Condition::any()
                    .add(db_partner::Column::Name.like(pattern.as_str()))
                    .add(db_partner::Column::City.like(pattern.as_str()))
                    .add(db_partner::Column::PartnerCode.like(pattern.as_str())),
            );
        }
        condition
    }
}

#[async_trait]
impl PartnerDao for PartnerDaoImpl {
    async fn get_by_id(&self, id: i64) -> Result<Option<PartnerRecord>, QueryError> {
        let model = db_partner::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(model.map(Self::to_record))
    }

    async fn list(
        &self,
        filter: &PartnerFilter,
        page_size: u64,
        page_num: u64,
    ) -> Result<PartnerPage, QueryError> {
        let paginator = db_partner::Entity::find()
            .filter(Self::build_condition(filter))
            .order_by_asc(db_partner::Column::Name)
            .paginate(&self.db, page_size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| QueryError::DbError(e.to_string()))?;
        let items = paginator
            .fetch_page(page_num)
            .await
            .map_err(|e| QueryError::DbError(e.to_string()))?
            .into_iter()
            .map(Self::to_record)
            .collect();

        Ok(PartnerPage {
            items,
            total,
            page_num,
            page_size,
        })
    }

    async fn get_all(&self) -> Result<Vec<PartnerRecord>, QueryError> {
        let models = db_partner::Entity::find()
            .order_by_asc(db_partner::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(models.into_iter().map(Self::to_record).collect())
    }
}
