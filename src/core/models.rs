pub mod application;
pub mod audit;
pub mod bos;
pub mod club_member;
pub mod collaboration;
pub mod common;
pub mod event;
pub mod recruiter;
pub mod resource;
pub mod team;
