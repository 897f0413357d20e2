/// 管理 API 统一前缀
pub const URL_PATH_NATIVE_API: &str = "/api";

/// 前端携带令牌的自定义头，经 auth_header_mapper 映射为 Authorization
pub const UI_AUTHORIZATION_HEADER: &str = "x-ui-authorization";
