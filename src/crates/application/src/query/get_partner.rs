use crate::query::dao::PartnerDao;
use crate::query::QueryError;
use model::partner::PartnerRecord;
use std::sync::Arc;

#[derive(Clone)]
pub struct GetPartner {
    dao: Arc<dyn PartnerDao>,
}

impl GetPartner {
    pub fn new(dao: Arc<dyn PartnerDao>) -> Self {
        Self { dao }
    }

    pub async fn handle(&self, id: i64) -> Result<PartnerRecord, QueryError> {
        self.dao
            .get_by_id(id)
            .await?
            .ok_or_else(|| QueryError::NotFound(format!("partner {}", id)))
    }
}
