//! HTTP handlers and the route table that binds them to their guards.

pub mod auth;
pub mod comments;
pub mod favorites;
pub mod offers;
pub mod system;

use std::sync::Arc;

use crate::api::dto::{CreateCommentDto, CreateOfferDto, CreateUserDto, LoginUserDto, UpdateOfferDto};
use crate::middleware::{DocumentExistsGuard, DocumentModifyGuard, PrivateRoute, ValidateDto, ValidateId};
use crate::routing::Route;
use crate::state::AppState;

const OFFER_ID: &str = "offerId";
const USER_ID: &str = "userId";

/// Every route the API serves, with its guards in execution order.
pub fn routes(state: &AppState) -> Vec<Route> {
    let offer_service = Arc::new(state.offers.clone());
    let user_service = Arc::new(state.users.clone());

    let offer_exists = || DocumentExistsGuard::new(offer_service.clone(), "Offer", OFFER_ID);
    let offer_owner = || DocumentModifyGuard::new(offer_service.clone(), "Offer", OFFER_ID);
    let user_exists = || DocumentExistsGuard::new(user_service.clone(), "User", USER_ID);
    let user_owner = || DocumentModifyGuard::new(user_service.clone(), "User", USER_ID);

    vec![
        Route::get("/", system::root),
        Route::get("/health", system::health),
        // Users
        Route::post("/auth/register", auth::register).guard(ValidateDto::<CreateUserDto>::new()),
        Route::post("/auth/login", auth::login).guard(ValidateDto::<LoginUserDto>::new()),
        Route::get("/auth/login", auth::check).guard(PrivateRoute),
        Route::delete("/auth/logout", auth::logout).guard(PrivateRoute),
        // Offers
        Route::get("/offers", offers::index),
        Route::post("/offers", offers::create)
            .guard(PrivateRoute)
            .guard(ValidateDto::<CreateOfferDto>::new()),
        Route::get("/offers/:offerId", offers::show)
            .guard(ValidateId::new(OFFER_ID))
            .guard(offer_exists()),
        Route::patch("/offers/:offerId", offers::update)
            .guard(PrivateRoute)
            .guard(ValidateId::new(OFFER_ID))
            .guard(ValidateDto::<UpdateOfferDto>::new())
            .guard(offer_exists())
            .guard(offer_owner()),
        Route::delete("/offers/:offerId", offers::delete)
            .guard(PrivateRoute)
            .guard(ValidateId::new(OFFER_ID))
            .guard(offer_exists())
            .guard(offer_owner()),
        // Comments
        Route::get("/offers/:offerId/comments", comments::index)
            .guard(ValidateId::new(OFFER_ID))
            .guard(offer_exists()),
        Route::post("/offers/:offerId/comments", comments::create)
            .guard(PrivateRoute)
            .guard(ValidateId::new(OFFER_ID))
            .guard(ValidateDto::<CreateCommentDto>::new())
            .guard(offer_exists()),
        // Favorites
        Route::get("/users/:userId/favorites", favorites::index)
            .guard(PrivateRoute)
            .guard(ValidateId::new(USER_ID))
            .guard(user_exists())
            .guard(user_owner()),
        Route::put("/users/:userId/favorites/:offerId", favorites::update)
            .guard(PrivateRoute)
            .guard(ValidateId::new(USER_ID))
            .guard(ValidateId::new(OFFER_ID))
            .guard(user_exists())
            .guard(offer_exists())
            .guard(user_owner()),
    ]
}
