pub mod chart_service;
pub mod ping_service;
pub mod query_service;
pub mod rates_service;
pub mod session_service;
