use crate::error::AppError;
use domain::partner::{Partner, PartnerPatch, PartnerRepository};
use domain::value::PartnerId;
use log::info;
use std::sync::Arc;

/// 创建合作伙伴命令
pub struct CreatePartnerCmd {
    pub partner_code: String,
    pub name: String,
    pub city: String,
    pub patch: PartnerPatch, // 其余可选字段
}

/// 更新合作伙伴命令
pub struct UpdatePartnerCmd {
    pub id: i64,
    pub patch: PartnerPatch,
}

/// 删除合作伙伴命令
pub struct DeletePartnerCmd {
    pub id: i64,
}

/// 清空合作伙伴命令
///
/// 破坏性操作，必须原样输入配置里的确认短语才会执行。
pub struct DeleteAllPartnersCmd {
    pub confirmation: String,
}

/// 合作伙伴应用服务
pub struct PartnerAppService {
    partner_repo: Arc<dyn PartnerRepository>,
    id_generator: Arc<dyn crate::command::shared::IdGenerator>,
    delete_all_phrase: String,
}

impl PartnerAppService {
    pub fn new(
        partner_repo: Arc<dyn PartnerRepository>,
        id_generator: Arc<dyn crate::command::shared::IdGenerator>,
        delete_all_phrase: &str,
    ) -> Self {
        Self {
            partner_repo,
            id_generator,
            delete_all_phrase: delete_all_phrase.to_string(),
        }
    }

    /// 创建新的合作伙伴
    pub async fn create_partner(&self, cmd: CreatePartnerCmd) -> Result<i64, AppError> {
        // 业务键查重
        let existing = self.partner_repo.find_by_code(&cmd.partner_code).await?;
        if existing.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Partner code '{}' already exists",
                cmd.partner_code
            )));
        }

        let partner_id = PartnerId::from(self.id_generator.next_id().await?);
        let mut partner = Partner::new(partner_id.clone(), &cmd.partner_code, &cmd.name, &cmd.city);
        partner.apply_patch(&cmd.patch);

        self.partner_repo.save(&partner).await?;
        Ok(partner_id.as_i64())
    }

    /// 更新合作伙伴
    pub async fn update_partner(&self, cmd: UpdatePartnerCmd) -> Result<(), AppError> {
        let mut partner = self
            .partner_repo
            .find_by_id(PartnerId::from(cmd.id))
            .await?
            .ok_or_else(|| {
                AppError::AggregateNotFound("Partner".to_string(), cmd.id.to_string())
            })?;

        partner.apply_patch(&cmd.patch);
        self.partner_repo.save(&partner).await?;
        Ok(())
    }

    /// 删除单个合作伙伴
    pub async fn delete_partner(&self, cmd: DeletePartnerCmd) -> Result<(), AppError> {
        self.partner_repo.delete(PartnerId::from(cmd.id)).await?;
        Ok(())
    }

    /// 清空所有合作伙伴
    ///
    /// 确认短语逐字节比较，不做大小写折叠。
    pub async fn delete_all_partners(&self, cmd: DeleteAllPartnersCmd) -> Result<u64, AppError> {
        if cmd.confirmation != self.delete_all_phrase {
            return Err(AppError::ConfirmationMismatch);
        }
        let deleted = self.partner_repo.delete_all().await?;
        info!("delete_all_partners removed {} rows", deleted);
        Ok(deleted)
    }
}
