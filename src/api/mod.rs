pub mod auth;
pub mod entity;

pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

pub const MIME_JSON: &str = "application/json";

pub const LOGIN_PATH: &str = "/auth/login";
pub const USER_PATH: &str = "/user";
