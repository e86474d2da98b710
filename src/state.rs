use std::sync::Arc;

use crate::config::JwtConfig;
use crate::database::DocumentStore;
use crate::models::{Recipe, User};
use crate::services::RecipeLocator;
use crate::storage::ObjectStore;

/// Collaborators shared by every request. Created once at startup; holds no per-request state.
pub struct AppState {
    pub recipes: Arc<dyn DocumentStore<Recipe>>,
    pub users: Arc<dyn DocumentStore<User>>,
    pub images: Arc<dyn ObjectStore>,
    pub locator: RecipeLocator,
    pub jwt: JwtConfig,
}

impl AppState {
    pub fn new(
        recipes: Arc<dyn DocumentStore<Recipe>>,
        users: Arc<dyn DocumentStore<User>>,
        images: Arc<dyn ObjectStore>,
        jwt: JwtConfig,
    ) -> Self {
        Self {
            locator: RecipeLocator::new(recipes.clone()),
            recipes,
            users,
            images,
            jwt,
        }
    }
}
