pub mod api;
pub mod captcha;
pub mod tokener;
