pub mod championships;
pub mod health;
pub mod matches;
pub mod rounds;
pub mod standings;
pub mod teams;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Championship, ChampionshipId};

/// Fetch a fresh snapshot from the backend. Nothing is cached between requests.
pub(crate) async fn load_championship(
    state: &AppState,
    id: &str,
) -> Result<Championship, ApiError> {
    let id = ChampionshipId::new(id);
    Ok(state.backend.fetch_championship(&id).await?)
}
