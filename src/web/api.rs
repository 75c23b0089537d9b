//! JSON endpoints mirroring the HTML screens

use super::error::ApiError;
use super::handlers::ListQuery;
use super::screens::{load_profile_screen, load_role_listing, ProfileResponse, RoleListing};
use crate::directory::{IdentityProviderStore, ProfileStore, SchemaProvider};
use crate::docs::{load_help_panel, IDP_EDIT_OVERVIEW_DOCS_KEY};
use crate::idp::{
    IdentityProvider, IdentityProviderPage, IdentityProviderUpdate, IDENTITY_PROVIDERS_PATH,
};
use crate::profile::{
    required_field_error, FieldError, FlatProfileView, PatchRequest, ProfileSchema,
};
use crate::roles::RoleKind;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let screen = load_profile_screen(&*state.directory, &user_id).await?;
    Ok(Json(screen.into()))
}

/// Required fields that were submitted but are blank
fn blank_required_fields(schema: &ProfileSchema, edited: &FlatProfileView) -> Vec<FieldError> {
    schema
        .descriptors()
        .iter()
        .filter(|d| d.required && d.is_patchable())
        .filter(|d| edited.get(&d.name).is_some_and(|value| !value.is_truthy()))
        .map(required_field_error)
        .collect()
}

/// Apply edited flat values; answers with the patch that was sent
pub async fn patch_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(edited): Json<FlatProfileView>,
) -> Result<Json<PatchRequest>, ApiError> {
    let schema = ProfileSchema::new(state.directory.profile_schemas().await?);

    let errors = blank_required_fields(&schema, &edited);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let patch = schema.build_patch(&edited);
    if patch.is_empty() {
        return Err(ApiError::BadRequest(
            "No editable profile values were supplied".to_string(),
        ));
    }

    state.directory.apply_patch(&user_id, &patch).await?;
    tracing::info!(
        user_id = %user_id,
        operations = patch.operations.len(),
        "Profile patched via API"
    );

    Ok(Json(patch))
}

pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<RoleListing>, ApiError> {
    let listing = load_role_listing(&*state.directory, RoleKind::Role, query.search).await?;
    Ok(Json(listing))
}

pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<RoleListing>, ApiError> {
    let listing = load_role_listing(&*state.directory, RoleKind::Group, query.search).await?;
    Ok(Json(listing))
}

/// Provider details plus help panel; unlike the HTML page a missing provider is a 404
pub async fn get_identity_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<IdentityProviderPage>, ApiError> {
    let docs = &state.config.docs;
    let (identity_provider, help_panel) = tokio::join!(
        state.directory.identity_provider(&id),
        load_help_panel(
            &*state.docs,
            &docs.structure,
            IDP_EDIT_OVERVIEW_DOCS_KEY,
            docs.image_prefix_url.as_deref()
        )
    );

    Ok(Json(IdentityProviderPage {
        identity_provider: identity_provider?,
        help_panel,
        alert: None,
        back_path: IDENTITY_PROVIDERS_PATH.to_string(),
    }))
}

/// Replace the general settings; answers with the provider as re-read
pub async fn update_identity_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<IdentityProviderUpdate>,
) -> Result<Json<IdentityProvider>, ApiError> {
    let update = update.normalized();
    update.validate().map_err(ApiError::Validation)?;

    state.directory.update_identity_provider(&id, &update).await?;
    tracing::info!(id = %id, "Identity provider updated via API");

    Ok(Json(state.directory.identity_provider(&id).await?))
}

pub async fn delete_identity_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.directory.delete_identity_provider(&id).await?;
    tracing::info!(id = %id, "Identity provider deleted via API");
    Ok(StatusCode::NO_CONTENT)
}
