use serde::{Deserialize, Serialize};

/// Canonical partition for recipe documents.
pub const RECIPES_PARTITION: &str = "recipes";

/// Recipe document as stored in the recipes container.
///
/// `pk` is optional because older records were written without it (or with `""`);
/// which partition actually holds a record is resolved by the recipe locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Blob URL, an external http(s) URL, or empty
    #[serde(default)]
    pub image_url: String,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,

    #[serde(default)]
    pub created_by: String,
}

/// Request para criar receita
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    /// `data:image/...;base64,...` payload or an http(s) URL
    pub image_url: Option<String>,
    pub created_at: Option<String>,
}

/// Request para atualizar receita; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
}

impl Recipe {
    pub fn apply_update(&mut self, update: &UpdateRecipeRequest, now: String) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(ingredients) = &update.ingredients {
            self.ingredients = ingredients.clone();
        }
        self.updated_at = now;
    }
}
