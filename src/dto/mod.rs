pub mod auth_request;
pub mod auth_response;
pub mod chat_request;
pub mod generation_report;
pub mod profile;
pub mod result_update;
pub mod score_request;
pub mod tournament_request;
pub mod tournament_snapshot;
pub mod tournament_summary;
