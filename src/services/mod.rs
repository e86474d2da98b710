pub mod auth_service;
pub mod image_service;
pub mod recipe_locator;

pub use recipe_locator::RecipeLocator;
