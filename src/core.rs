pub mod authorizer;
pub mod board;
pub mod captcha;
pub mod filter;
pub mod models;
pub mod ports;
pub mod review;
pub mod services;
pub mod tokener;
pub mod validate;
