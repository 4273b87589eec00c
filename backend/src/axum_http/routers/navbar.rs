use std::sync::Arc;

use axum::{Router, extract::State, routing::get};
use crates::domain::value_objects::navbar::NavMenuModel;

use crate::{
    auth::OptionalAuthUser, axum_http::error_responses::ApiResponse,
    usecases::navbar::NavbarUseCase,
};

pub fn routes() -> Router {
    Router::new()
        .route("/menu", get(menu))
        .with_state(Arc::new(NavbarUseCase::new()))
}

pub async fn menu(
    State(navbar_usecase): State<Arc<NavbarUseCase>>,
    caller: OptionalAuthUser,
) -> ApiResponse<NavMenuModel> {
    ApiResponse::ok(navbar_usecase.menu(&caller))
}
