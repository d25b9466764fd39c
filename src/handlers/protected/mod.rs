// handlers/protected/mod.rs - Resource routers behind the principal middleware
//
// Each handler extracts the `Principal`, hands the request to its service
// and lets `ApiError` shape failures.

pub mod items;
pub mod line_items;
pub mod projects;
pub mod users;
