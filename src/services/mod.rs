pub mod model_service;
pub mod quiz_attempt_service;
pub mod quiz_cache;
pub mod quiz_generator;
pub mod quiz_service;
pub mod report_service;
