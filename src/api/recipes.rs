use actix_web::{web, HttpResponse};

use crate::database::{Query, SortOrder};
use crate::models::{CreateRecipeRequest, Recipe, UpdateRecipeRequest, RECIPES_PARTITION};
use crate::services::auth_service::Claims;
use crate::services::image_service;
use crate::state::AppState;
use crate::utils::{now_iso, AppError};

const ANONYMOUS_AUTHOR: &str = "public";

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "Recipes",
    responses(
        (status = 200, description = "Recipes in the canonical partition, newest first", body = [Recipe])
    )
)]
pub async fn list_recipes(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /api/recipes");

    let query = Query::new()
        .field_eq("pk", RECIPES_PARTITION)
        .order_by("createdAt", SortOrder::Descending);

    let recipes = state
        .recipes
        .query(&query)
        .await
        .inspect_err(|e| log::error!("❌ Failed to list recipes: {}", e))?;

    Ok(HttpResponse::Ok().json(recipes))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "Recipes",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe found", body = Recipe),
        (status = 404, description = "No recipe with this id in any partition")
    )
)]
pub async fn get_recipe(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("🔎 GET /api/recipes/{}", id);

    let located = state
        .locator
        .locate(&id)
        .await
        .inspect_err(|e| log::warn!("❌ Recipe {} unavailable: {}", id, e))?;

    log::debug!("   Recipe {} served from partition {:?}", id, located.partition_key);
    Ok(HttpResponse::Ok().json(located.document))
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "Recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Missing title/description or bad image payload")
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn create_recipe(
    state: web::Data<AppState>,
    claims: Option<web::ReqData<Claims>>,
    body: web::Json<CreateRecipeRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    let title = request.title.as_deref().map(str::trim).unwrap_or_default();
    let description = request.description.as_deref().map(str::trim).unwrap_or_default();

    log::info!("📝 POST /api/recipes - title: {}", title);

    if title.is_empty() || description.is_empty() {
        return Err(AppError::InvalidRequest(
            "title and description are required".to_string(),
        ));
    }

    let image_url =
        image_service::resolve_image_url(state.images.as_ref(), request.image_url.as_deref())
            .await
            .inspect_err(|e| log::error!("❌ Image upload failed: {}", e))?;

    let now = now_iso();
    let recipe = Recipe {
        id: uuid::Uuid::new_v4().simple().to_string(),
        pk: Some(RECIPES_PARTITION.to_string()),
        title: title.to_string(),
        description: description.to_string(),
        ingredients: request.ingredients.unwrap_or_default(),
        image_url,
        created_at: request.created_at.unwrap_or_else(|| now.clone()),
        updated_at: now,
        created_by: claims
            .map(|c| c.sub.clone())
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
    };

    state
        .recipes
        .create(&recipe)
        .await
        .inspect_err(|e| log::error!("❌ Failed to create recipe: {}", e))?;

    log::info!("✅ Recipe created: {}", recipe.id);
    Ok(HttpResponse::Created().json(recipe))
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "Recipes",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = Recipe),
        (status = 404, description = "No partition accepted the update")
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn update_recipe(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateRecipeRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("✏️  PUT /api/recipes/{}", id);

    let target = state
        .locator
        .resolve_for_mutation(&id)
        .await
        .inspect_err(|e| log::warn!("❌ Recipe {} not updatable: {}", id, e))?;
    log::debug!("   Recipe {} carries pk {:?}", id, target.partition_key);

    let mut recipe = target.document.clone();
    recipe.apply_update(&body, now_iso());

    let saved = state
        .locator
        .replace(&target, &recipe)
        .await
        .inspect_err(|e| log::warn!("❌ Update of {} failed: {}", id, e))?;

    log::info!("✅ Recipe updated: {}", id);
    Ok(HttpResponse::Ok().json(saved))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "Recipes",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe deleted"),
        (status = 404, description = "No partition accepted the delete")
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn delete_recipe(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("🗑️ DELETE /api/recipes/{}", id);

    let target = state
        .locator
        .resolve_for_mutation(&id)
        .await
        .inspect_err(|e| log::warn!("❌ Recipe {} not deletable: {}", id, e))?;
    log::debug!("   Recipe {} carries pk {:?}", id, target.partition_key);

    state
        .locator
        .delete(&target)
        .await
        .inspect_err(|e| log::warn!("❌ Delete of {} failed: {}", id, e))?;

    log::info!("✅ Recipe deleted: {}", id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Deleted" })))
}
