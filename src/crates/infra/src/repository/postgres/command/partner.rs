use super::db_data::partner::{self, ActiveModel, Column, Entity};
use async_trait::async_trait;
use domain::partner::{Partner, PartnerError, PartnerRepository};
use domain::value::PartnerId;
use sea_orm::*;

#[derive(Clone)]
pub struct PartnerRepositoryImpl {
    db: DatabaseConnection,
}

impl PartnerRepositoryImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PartnerRepository for PartnerRepositoryImpl {
    async fn count(&self) -> Result<u64, PartnerError> {
        let count = partner::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| PartnerError::DbErr(e.to_string()))?;
        Ok(count)
    }

    async fn find_by_id(&self, id: PartnerId) -> Result<Option<Partner>, PartnerError> {
        let result = partner::Entity::find_by_id(id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| PartnerError::DbErr(e.to_string()))?;
        Ok(result.map(|model| model.into()))
    }

    async fn find_by_code<'a>(&'a self, code: &'a str) -> Result<Option<Partner>, PartnerError> {
        let result = partner::Entity::find()
            .filter(partner::Column::PartnerCode.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| PartnerError::DbErr(e.to_string()))?;
        Ok(result.map(|model| model.into()))
    }

    async fn find_by_name<'a>(&'a self, name: &'a str) -> Result<Option<Partner>, PartnerError> {
        let result = partner::Entity::find()
            .filter(partner::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| PartnerError::DbErr(e.to_string()))?;
        Ok(result.map(|model| model.into()))
    }

    async fn save(&self, agg: &Partner) -> Result<(), PartnerError> {
        let mut active_model: ActiveModel = agg.into();
        let existing = partner::Entity::find_by_id(agg.id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| PartnerError::DbErr(e.to_string()))?;
        if let Some(existing) = existing {
            active_model.version = Set(existing.version + 1);
            let update_condition = Condition::all()
                .add(partner::Column::Id.eq(agg.id.as_i64()))
                .add(partner::Column::Version.lt(agg.version + 1));
            let result = Entity::update_many()
                .set(active_model)
                .filter(update_condition)
                .exec(&self.db)
                .await
                .map_err(|e| PartnerError::DbErr(e.to_string()))?;
            if result.rows_affected == 0 {
                return Err(PartnerError::VersionConflictErr(agg.version));
            }
            Ok(())
        } else {
            active_model.version = Set(1);
            Entity::insert(active_model)
                .exec(&self.db)
                .await
                .map_err(|e| PartnerError::DbErr(e.to_string()))?;
            Ok(())
        }
    }

    async fn delete(&self, id: PartnerId) -> Result<(), PartnerError> {
        let result = Entity::delete_many()
            .filter(Column::Id.eq(id.as_i64()))
            .exec(&self.db)
            .await
            .map_err(|e| PartnerError::DbErr(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(PartnerError::PartnerNotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, PartnerError> {
        let result = Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| PartnerError::DbErr(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
