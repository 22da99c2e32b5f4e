pub mod application_dto;
pub mod category_dto;
pub mod comment_dto;
pub mod common;
pub mod job_dto;
pub mod like_dto;
pub mod profile_dto;
