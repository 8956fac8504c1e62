//! HTTP handlers for REST API endpoints

pub mod candidates;
pub mod colleges;
pub mod health;
pub mod session;

pub use candidates::{my_college, submit_candidate, InsertResponse, MyCollegeQuery};
pub use colleges::{best_colleges, get_college, list_colleges, BestCollegesQuery};
pub use health::{readiness_handler, root_handler, HealthResponse};
pub use session::{issue_token, TokenResponse};
