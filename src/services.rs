pub mod catalog_service;
pub mod movement_service;
pub mod onboarding_service;
pub mod stock_query_service;
