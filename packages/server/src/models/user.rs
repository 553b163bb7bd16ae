use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserCountResponse {
    /// Users registered in the current round.
    #[schema(example = 123)]
    pub count: u64,
    /// Cap for the current round.
    #[schema(example = 500)]
    pub max_users: u64,
}
