use crate::consts;
use actix_cors::Cors;

use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::HeaderName,
    middleware::Next,
};

pub async fn auth_header_mapper(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    // pre-processing
    if let Some(auth_header) = req.headers().get(consts::UI_AUTHORIZATION_HEADER) {
        let auth_header_cloned = auth_header.clone();
        req.headers_mut().insert(
            HeaderName::from_bytes(b"Authorization").unwrap(),
            auth_header_cloned,
        );
    };
    next.call(req).await
    // post-processing
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PATCH", "PUT", "DELETE", "HEAD"])
        .allow_any_header()
        .max_age(3600)
}
