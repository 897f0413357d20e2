use super::db_data::partner_stats::{RegionCountModel, StatsTotalsModel};
use application::query::dao::PartnerStatsDao;
use application::query::QueryError;
use async_trait::async_trait;
use model::partner_stats::DashboardStats;
use sea_orm::*;

pub struct PartnerStatsDaoImpl {
    db: DatabaseConnection,
}

impl PartnerStatsDaoImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PartnerStatsDao for PartnerStatsDaoImpl {
    async fn get_stats(&self) -> Result<DashboardStats, QueryError> {
        // 状态枚举的数值映射与 domain::partner 保持一致
        let totals: Option<StatsTotalsModel> =
            StatsTotalsModel::find_by_statement(Statement::from_string(
                DbBackend::Postgres,
                r#"select
                     count(*)::bigint as total_partners,
                     count(*) filter (where business_status = 1)::bigint as open_count,
                     count(*) filter (where business_status = 2)::bigint as closed_count,
                     count(*) filter (where cooperation_status = 1)::bigint as active_count,
                     count(*) filter (where cooperation_status = 2)::bigint as inactive_count,
                     count(*) filter (where cooperation_status = 3)::bigint as pending_count,
                     count(*) filter (where cooperation_status = 4)::bigint as suspended_count,
                     count(*) filter (where is_active)::bigint as enabled_count,
                     coalesce(sum(car_target), 0)::bigint as car_target_sum,
                     coalesce(sum(bike_target), 0)::bigint as bike_target_sum,
                     coalesce(sum(total_target), 0)::bigint as total_target_sum
                   from partner"#,
            ))
            .one(&self.db)
            .await
            .map_err(|e| QueryError::DbError(e.to_string()))?;

        let totals = totals
            .ok_or_else(|| QueryError::ExecutionError("stats query returned no row".to_string()))?;

        let regions: Vec<RegionCountModel> =
            RegionCountModel::find_by_statement(Statement::from_string(
                DbBackend::Postgres,
                r#"select region, count(*)::bigint as partner_count
                   from partner
                   where region is not null
                   group by region
                   order by region"#,
            ))
            .all(&self.db)
            .await
            .map_err(|e| QueryError::DbError(e.to_string()))?;

        Ok(DashboardStats {
            total_partners: totals.total_partners,
            open_count: totals.open_count,
            closed_count: totals.closed_count,
            active_count: totals.active_count,
            inactive_count: totals.inactive_count,
            pending_count: totals.pending_count,
            suspended_count: totals.suspended_count,
            enabled_count: totals.enabled_count,
            car_target_sum: totals.car_target_sum,
            bike_target_sum: totals.bike_target_sum,
            total_target_sum: totals.total_target_sum,
            regions: regions.into_iter().map(|r| r.into()).collect(),
        })
    }
}
