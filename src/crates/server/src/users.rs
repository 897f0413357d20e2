use crate::partners::ApiError;
use crate::AppState;
use actix_web::{web, web::Json, web::Path, HttpResponse};
use application::command::user::{CreateUserCmd, DeleteUserCmd, UpdateUserCmd, UserAppService};
use application::auth::PasswordHasher;
use infra::auth::{AuthConfig, BcryptPasswordHasher};
use infra::repository::postgres::command::user::UserRepositoryImpl;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub password: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

fn user_service(state: &AppState) -> UserAppService {
    UserAppService::new(
        Arc::new(UserRepositoryImpl::new(state.db.clone())),
        state.id_generator.clone(),
    )
}

fn hash_password(state: &AppState, plain: &str) -> Result<String, ApiError> {
    let hasher = BcryptPasswordHasher::new(state.app_cfg.salt_cost());
    hasher
        .hash(plain)
        .map_err(|e| ApiError::Unknown(e.to_string()))
}

async fn create(
    state: web::Data<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let cmd = CreateUserCmd {
        username: body.username,
        password: hash_password(&state, &body.password)?,
        email: body.email.unwrap_or_default(),
        is_admin: body.is_admin.unwrap_or(false),
    };
    user_service(&state).create_user(cmd).await?;
    Ok(HttpResponse::Created().finish())
}

async fn update(
    state: web::Data<AppState>,
    path: Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let password = match &body.password {
        Some(plain) => Some(hash_password(&state, plain)?),
        None => None,
    };
    let cmd = UpdateUserCmd {
        username: path.into_inner(),
        password,
        email: body.email,
        is_admin: body.is_admin,
    };
    user_service(&state).update_user(cmd).await?;
    Ok(HttpResponse::Ok().finish())
}

async fn delete(
    state: web::Data<AppState>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let cmd = DeleteUserCmd {
        username: path.into_inner(),
    };
    user_service(&state).delete_user(cmd).await?;
    Ok(HttpResponse::Ok().finish())
}

pub fn scope() -> actix_web::Scope {
    web::scope("/user")
        .service(
            web::resource("/{username}")
                .route(web::put().to(update))
                .route(web::delete().to(delete)),
        )
        .service(web::resource("").route(web::post().to(create)))
}
