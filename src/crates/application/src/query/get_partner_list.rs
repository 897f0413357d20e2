use crate::query::dao::{PartnerDao, PartnerFilter};
use crate::query::QueryError;
use model::partner::PartnerPage;
use std::sync::Arc;

/// 单页最大行数，超出按上限截断
const MAX_PAGE_SIZE: u64 = 200;

#[derive(Clone)]
pub struct GetPartnerList {
    dao: Arc<dyn PartnerDao>,
}

impl GetPartnerList {
    pub fn new(dao: Arc<dyn PartnerDao>) -> Self {
        Self { dao }
    }

    pub async fn handle(
        &self,
        filter: PartnerFilter,
        page_size: u64,
        page_num: u64,
    ) -> Result<PartnerPage, QueryError> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self.dao.list(&filter, page_size, page_num).await
    }
}
