pub mod attributes;
pub mod recipes;
pub mod user;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::models::{Ingredient, Tag};
use crate::state::SharedState;

pub fn api_routes(max_body_size: usize) -> Router<SharedState> {
    Router::new()
        // User
        .route("/api/user/create", post(user::create))
        .route("/api/user/token", post(user::token))
        .route("/api/user/logout", post(user::logout))
        .route(
            "/api/user/me",
            get(user::me).put(user::update_me).patch(user::partial_update_me),
        )
        // Recipes
        .route("/api/recipe/recipes", get(recipes::list).post(recipes::create))
        .route(
            "/api/recipe/recipes/{id}",
            get(recipes::retrieve)
                .put(recipes::update)
                .patch(recipes::partial_update)
                .delete(recipes::delete),
        )
        .route(
            "/api/recipe/recipes/{id}/upload-image",
            post(recipes::upload_image).layer(DefaultBodyLimit::max(max_body_size)),
        )
        // Tags
        .route(
            "/api/recipe/tags",
            get(attributes::list::<Tag>).post(attributes::create::<Tag>),
        )
        .route(
            "/api/recipe/tags/{id}",
            get(attributes::retrieve::<Tag>)
                .put(attributes::update::<Tag>)
                .patch(attributes::partial_update::<Tag>)
                .delete(attributes::delete::<Tag>),
        )
        // Ingredients
        .route(
            "/api/recipe/ingredients",
            get(attributes::list::<Ingredient>).post(attributes::create::<Ingredient>),
        )
        .route(
            "/api/recipe/ingredients/{id}",
            get(attributes::retrieve::<Ingredient>)
                .put(attributes::update::<Ingredient>)
                .patch(attributes::partial_update::<Ingredient>)
                .delete(attributes::delete::<Ingredient>),
        )
}
