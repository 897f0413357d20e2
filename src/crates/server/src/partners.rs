use crate::{consts, AppState};
use actix_web::{http::StatusCode, web, web::Json, web::Path, HttpResponse};
use application::command::partner::{
    CreatePartnerCmd, DeleteAllPartnersCmd, DeletePartnerCmd, PartnerAppService, UpdatePartnerCmd,
};
use application::error::AppError;
use application::import::reconcile::PartnerImportService;
use application::query::dao::PartnerFilter;
use application::query::get_dashboard_stats::GetDashboardStats;
use application::query::get_partner::GetPartner;
use application::query::get_partner_list::GetPartnerList;
use application::query::QueryError;
use domain::partner::{BusinessStatus, CapacityType, CooperationStatus, PartnerError, PartnerPatch};
use domain::user::UserError;
use infra::repository::postgres::command::partner::PartnerRepositoryImpl;
use infra::repository::postgres::query::partner::PartnerDaoImpl;
use infra::repository::postgres::query::partner_stats::PartnerStatsDaoImpl;
use infra::spreadsheet;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// 上传表格的大小上限
const IMPORT_PAYLOAD_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    ResourceNotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Unknown(String),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::AggregateNotFound(kind, id) => {
                ApiError::ResourceNotFound(format!("{} {} not found", kind, id))
            }
            AppError::InvalidInput(msg) => ApiError::BadRequest(msg),
            AppError::ImportError(msg) => ApiError::BadRequest(msg),
            AppError::ConfirmationMismatch => {
                ApiError::BadRequest("confirmation phrase does not match".to_string())
            }
            AppError::PartnerError(PartnerError::VersionConflictErr(v)) => {
                ApiError::Conflict(format!("version conflict at {}", v))
            }
            AppError::PartnerError(PartnerError::PartnerNotFound(id)) => {
                ApiError::ResourceNotFound(format!("Partner {} not found", id))
            }
            AppError::UserError(UserError::UserNotFound(name)) => {
                ApiError::ResourceNotFound(format!("User {} not found", name))
            }
            AppError::AuthError(msg) => ApiError::Unauthorized(msg),
            other => ApiError::Unknown(other.to_string()),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NotFound(msg) => ApiError::ResourceNotFound(msg),
            QueryError::InvalidInput(msg) | QueryError::InvalidParameter(msg) => {
                ApiError::BadRequest(msg)
            }
            other => ApiError::Unknown(other.to_string()),
        }
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

/// 创建/更新共用的请求体，状态字段用文本表示
#[derive(Debug, Deserialize)]
pub struct PartnerBody {
    pub partner_code: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub business_status: Option<String>,
    pub cooperation_status: Option<String>,
    pub capacity_type: Option<String>,
    pub car_target: Option<i32>,
    pub bike_target: Option<i32>,
    pub total_target: Option<i32>,
    pub email: Option<String>,
    pub secondary_email: Option<String>,
    pub phone: Option<String>,
    pub manager_ids: Option<String>,
    pub is_active: Option<bool>,
}

impl PartnerBody {
    fn to_patch(&self) -> Result<PartnerPatch, ApiError> {
        Ok(PartnerPatch {
            name: self.name.clone(),
            city: self.city.clone(),
            region: self.region.clone(),
            business_status: parse_enum(&self.business_status, BusinessStatus::parse)?,
            cooperation_status: parse_enum(&self.cooperation_status, CooperationStatus::parse)?,
            capacity_type: parse_enum(&self.capacity_type, CapacityType::parse)?,
            car_target: self.car_target,
            bike_target: self.bike_target,
            total_target: self.total_target,
            email: self.email.clone(),
            secondary_email: self.secondary_email.clone(),
            phone: self.phone.clone(),
            manager_ids: self.manager_ids.clone(),
            is_active: self.is_active,
        })
    }
}

fn parse_enum<T>(
    raw: &Option<String>,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, ApiError> {
    match raw {
        None => Ok(None),
        Some(text) => parse(text)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("invalid status value: {}", text))),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page_size: Option<u64>,
    pub page_num: Option<u64>,
    pub region: Option<String>,
    pub cooperation_status: Option<String>,
    pub business_status: Option<String>,
    pub is_active: Option<bool>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAllRequest {
    pub confirmation: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

fn command_service(state: &AppState) -> PartnerAppService {
    PartnerAppService::new(
        Arc::new(PartnerRepositoryImpl::new(state.db.clone())),
        state.id_generator.clone(),
        &state.app_cfg.import().delete_all_phrase,
    )
}

async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = PartnerFilter {
        region: query.region.clone(),
        cooperation_status: parse_enum(&query.cooperation_status, CooperationStatus::parse)?
            .map(i32::from),
        business_status: parse_enum(&query.business_status, BusinessStatus::parse)?
            .map(i32::from),
        is_active: query.is_active,
        q: query.q.clone(),
    };
    let svc = GetPartnerList::new(Arc::new(PartnerDaoImpl::new(state.db.clone())));
    let page = svc
        .handle(
            filter,
            query.page_size.unwrap_or(20),
            query.page_num.unwrap_or(0),
        )
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

async fn retrieve(
    state: web::Data<AppState>,
    path: Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let svc = GetPartner::new(Arc::new(PartnerDaoImpl::new(state.db.clone())));
    let record = svc.handle(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

async fn create(
    state: web::Data<AppState>,
    Json(body): Json<PartnerBody>,
) -> Result<HttpResponse, ApiError> {
    let partner_code = body
        .partner_code
        .clone()
        .ok_or_else(|| ApiError::BadRequest("partner_code is required".to_string()))?;
    let name = body
        .name
        .clone()
        .ok_or_else(|| ApiError::BadRequest("name is required".to_string()))?;
    let city = body
        .city
        .clone()
        .ok_or_else(|| ApiError::BadRequest("city is required".to_string()))?;

    let cmd = CreatePartnerCmd {
        partner_code,
        name,
        city,
        patch: body.to_patch()?,
    };
    let id = command_service(&state).create_partner(cmd).await?;
    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

async fn update(
    state: web::Data<AppState>,
    path: Path<i64>,
    Json(body): Json<PartnerBody>,
) -> Result<HttpResponse, ApiError> {
    let cmd = UpdatePartnerCmd {
        id: path.into_inner(),
        patch: body.to_patch()?,
    };
    command_service(&state).update_partner(cmd).await?;
    Ok(HttpResponse::Ok().finish())
}

async fn delete(
    state: web::Data<AppState>,
    path: Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let cmd = DeletePartnerCmd {
        id: path.into_inner(),
    };
    command_service(&state).delete_partner(cmd).await?;
    Ok(HttpResponse::Ok().finish())
}

async fn delete_all(
    state: web::Data<AppState>,
    Json(body): Json<DeleteAllRequest>,
) -> Result<HttpResponse, ApiError> {
    let cmd = DeleteAllPartnersCmd {
        confirmation: body.confirmation,
    };
    let deleted = command_service(&state).delete_all_partners(cmd).await?;
    Ok(HttpResponse::Ok().json(DeleteAllResponse { deleted }))
}

/// 表格导入：请求体为 CSV/XLSX 原始字节
async fn import(
    state: web::Data<AppState>,
    bytes: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let rows = spreadsheet::read_rows(&bytes)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    info!("partner import received {} rows", rows.len());

    let svc = PartnerImportService::new(
        Arc::new(PartnerRepositoryImpl::new(state.db.clone())),
        state.id_generator.clone(),
        state.app_cfg.import().max_rows,
    );
    state.import_cancel.reset();
    let summary = svc.import(&rows, &state.import_cancel).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// 取消当前导入批次：标记在行间生效
async fn cancel_import(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    state.import_cancel.cancel();
    Ok(HttpResponse::Accepted().finish())
}

async fn dashboard_stats(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let svc = GetDashboardStats::new(
        Arc::new(PartnerStatsDaoImpl::new(state.db.clone())),
        Arc::new(PartnerDaoImpl::new(state.db.clone())),
    );
    let stats = svc.handle().await?;
    Ok(HttpResponse::Ok().json(stats))
}

pub fn configure_service(svc: &mut web::ServiceConfig) {
    svc.service(
        web::scope(consts::URL_PATH_NATIVE_API)
            .app_data(web::PayloadConfig::new(IMPORT_PAYLOAD_LIMIT))
            .service(
                web::scope("/partner")
                    .service(
                        web::resource("/import")
                            .route(web::post().to(import)),
                    )
                    .service(
                        web::resource("/import/cancel")
                            .route(web::post().to(cancel_import)),
                    )
                    .service(
                        web::resource("/delete-all")
                            .route(web::post().to(delete_all)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(retrieve))
                            .route(web::put().to(update))
                            .route(web::delete().to(delete)),
                    )
                    .service(
                        web::resource("")
                            .route(web::get().to(list))
                            .route(web::post().to(create)),
                    ),
            )
            .service(
                web::scope("/dashboard")
                    .service(web::resource("/stats").route(web::get().to(dashboard_stats))),
            )
            .service(crate::users::scope()),
    );
}
