pub mod application;
pub mod category;
pub mod comment;
pub mod job;
pub mod like;
pub mod user;
