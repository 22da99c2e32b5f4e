pub mod application_service;
pub mod category_service;
pub mod comment_service;
pub mod interaction_service;
pub mod job_service;
pub mod like_service;
pub mod user_service;
