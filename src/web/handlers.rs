use super::error::directory_status;
use super::screens::{load_profile_screen, load_role_listing, ProfileScreen};
use super::templates::{
    ErrorTemplate, IdentityProviderTemplate, PlaceholderView, ProfileTemplate, RoleListTemplate,
    RoleRow,
};
use crate::alerts::Alert;
use crate::confirm::DeleteConfirmation;
use crate::directory::{DirectoryError, IdentityProviderStore, ProfileStore, RoleDirectory};
use crate::profile::{edited_values, FieldError};
use crate::roles::RoleKind;
use crate::idp::{IdentityProviderPage, IdentityProviderUpdate, IDENTITY_PROVIDERS_PATH};
use crate::{idp, AppState};
use askama::Template;
use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

const GENERIC_ERROR: &str = "An unexpected error occurred. Please try again later.";

/// Liveness check - always returns OK if the process is running
pub async fn healthz_handler() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn index_handler() -> Redirect {
    Redirect::to("/roles")
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

/// Typed delete confirmation
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub assertion: String,
}

fn render<T: Template>(template: T, status: StatusCode) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(error) => {
            tracing::error!(error = %error, "Template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

fn error_page(error: &DirectoryError, message: &str) -> Response {
    let alert = Alert::from_directory_error(error, message, GENERIC_ERROR);
    render(
        ErrorTemplate { alert: Some(alert) },
        directory_status(error),
    )
}

fn profile_template(
    screen: &ProfileScreen,
    errors: Vec<FieldError>,
    alert: Option<Alert>,
) -> ProfileTemplate {
    ProfileTemplate {
        user_id: screen.user_id.clone(),
        user_name: screen.user_name.clone(),
        profile_url: screen.profile_url(),
        fields: screen.fields(),
        errors,
        alert,
        confirmation: DeleteConfirmation::for_user(&screen.user_name),
    }
}

pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Response {
    match load_profile_screen(&*state.directory, &user_id).await {
        Ok(screen) => render(profile_template(&screen, Vec::new(), None), StatusCode::OK),
        Err(error) => {
            tracing::warn!(user_id = %user_id, error = %error, "Failed to load profile");
            error_page(&error, "Profile retrieval error")
        }
    }
}

pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Form(submitted): Form<HashMap<String, String>>,
) -> Response {
    let screen = match load_profile_screen(&*state.directory, &user_id).await {
        Ok(screen) => screen,
        Err(error) => return error_page(&error, "Profile retrieval error"),
    };

    let edited = match edited_values(screen.schema.descriptors(), &submitted) {
        Ok(edited) => edited,
        Err(errors) => {
            tracing::debug!(user_id = %user_id, invalid = errors.len(), "Profile form rejected");
            let alert = Alert::warning(
                "Invalid profile details",
                "Please fill in every required field.",
            );
            return render(
                profile_template(&screen, errors, Some(alert)),
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };

    let patch = screen.schema.build_patch(&edited);
    if let Err(error) = state.directory.apply_patch(&user_id, &patch).await {
        tracing::error!(user_id = %user_id, error = %error, "Failed to update profile");
        let alert = Alert::from_directory_error(
            &error,
            "Something went wrong",
            "An error occurred while updating the profile details.",
        );
        return render(
            profile_template(&screen, Vec::new(), Some(alert)),
            directory_status(&error),
        );
    }

    tracing::info!(
        user_id = %user_id,
        operations = patch.operations.len(),
        "Profile updated"
    );

    // Re-read so the form shows what the directory stored
    match load_profile_screen(&*state.directory, &user_id).await {
        Ok(updated) => {
            let alert = Alert::success(
                "Profile updated successfully",
                "The required user profile details were updated successfully.",
            );
            render(profile_template(&updated, Vec::new(), Some(alert)), StatusCode::OK)
        }
        Err(error) => error_page(&error, "Profile retrieval error"),
    }
}

pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let screen = match load_profile_screen(&*state.directory, &user_id).await {
        Ok(screen) => screen,
        Err(error) => return error_page(&error, "Profile retrieval error"),
    };

    let confirmation = DeleteConfirmation::for_user(&screen.user_name);
    if !confirmation.is_confirmed_by(&form.assertion) {
        let alert = Alert::warning("Confirmation failed", confirmation.hint());
        return render(
            profile_template(&screen, Vec::new(), Some(alert)),
            StatusCode::BAD_REQUEST,
        );
    }

    match state.directory.delete_user(&user_id).await {
        Ok(()) => {
            tracing::info!(user_id = %user_id, "User deleted");
            Redirect::to("/").into_response()
        }
        Err(error) => {
            tracing::error!(user_id = %user_id, error = %error, "Failed to delete user");
            let alert = Alert::from_directory_error(
                &error,
                "Something went wrong",
                "An error occurred while deleting the user.",
            );
            render(
                profile_template(&screen, Vec::new(), Some(alert)),
                directory_status(&error),
            )
        }
    }
}

async fn role_list_page(
    state: &AppState,
    kind: RoleKind,
    search: Option<String>,
    alert: Option<Alert>,
    status: StatusCode,
) -> Response {
    let listing = match load_role_listing(&*state.directory, kind, search).await {
        Ok(listing) => listing,
        Err(error) => {
            tracing::warn!(kind = %kind, error = %error, "Failed to list roles");
            return error_page(&error, &format!("{} retrieval error", kind.title()));
        }
    };

    let base_path = format!("/{}", kind.plural());
    let template = RoleListTemplate {
        title: RoleListTemplate::title_for(kind),
        kind_title: kind.title(),
        placeholder: listing
            .placeholder
            .as_ref()
            .map(|placeholder| PlaceholderView::new(placeholder, &base_path)),
        base_path,
        search: listing.search.unwrap_or_default(),
        rows: listing
            .items
            .into_iter()
            .map(|item| RoleRow {
                confirmation: DeleteConfirmation::for_role(kind, &item.display_name),
                item,
            })
            .collect(),
        alert,
    };

    render(template, status)
}

pub async fn roles_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    role_list_page(&state, RoleKind::Role, query.search, None, StatusCode::OK).await
}

pub async fn groups_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    role_list_page(&state, RoleKind::Group, query.search, None, StatusCode::OK).await
}

async fn delete_role_page(state: &AppState, kind: RoleKind, id: &str, assertion: &str) -> Response {
    let roles = match state.directory.list_roles(kind, None).await {
        Ok(roles) => roles,
        Err(error) => return error_page(&error, &format!("{} retrieval error", kind.title())),
    };

    let Some(role) = roles.into_iter().find(|role| role.id == id) else {
        let error = DirectoryError::NotFound(format!("{} {}", kind, id));
        return error_page(&error, &format!("{} retrieval error", kind.title()));
    };

    let confirmation = DeleteConfirmation::for_role(kind, &role.display_name);
    if !confirmation.is_confirmed_by(assertion) {
        let alert = Alert::warning("Confirmation failed", confirmation.hint());
        return role_list_page(state, kind, None, Some(alert), StatusCode::BAD_REQUEST).await;
    }

    let (alert, status) = match state.directory.delete_role(kind, id).await {
        Ok(()) => {
            tracing::info!(kind = %kind, id = %id, "Deleted {}", kind);
            (
                Alert::success(
                    format!("{} deleted successfully", kind.title()),
                    format!("{} {} was deleted.", kind.title(), role.display_name),
                ),
                StatusCode::OK,
            )
        }
        Err(error) => {
            tracing::error!(kind = %kind, id = %id, error = %error, "Failed to delete {}", kind);
            (
                Alert::from_directory_error(
                    &error,
                    "Something went wrong",
                    &format!("An error occurred while deleting the {}.", kind.noun()),
                ),
                directory_status(&error),
            )
        }
    };

    role_list_page(state, kind, None, Some(alert), status).await
}

pub async fn delete_role_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    delete_role_page(&state, RoleKind::Role, &id, &form.assertion).await
}

pub async fn delete_group_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    delete_role_page(&state, RoleKind::Group, &id, &form.assertion).await
}

/// Identity provider edit form; unchecked boxes are absent
#[derive(Debug, Deserialize)]
pub struct IdentityProviderForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub home_realm_identifier: String,
    pub is_enabled: Option<String>,
    pub is_primary: Option<String>,
}

impl From<IdentityProviderForm> for IdentityProviderUpdate {
    fn from(form: IdentityProviderForm) -> Self {
        IdentityProviderUpdate {
            name: form.name,
            description: form.description,
            image: Some(form.image),
            home_realm_identifier: form.home_realm_identifier,
            is_enabled: form.is_enabled.is_some(),
            is_primary: form.is_primary.is_some(),
        }
        .normalized()
    }
}

async fn identity_provider_page(state: &AppState, id: &str) -> IdentityProviderPage {
    idp::load_page(
        &*state.directory,
        &*state.docs,
        &state.config.docs.structure,
        state.config.docs.image_prefix_url.as_deref(),
        id,
    )
    .await
}

fn identity_provider_response(
    mut page: IdentityProviderPage,
    errors: Vec<FieldError>,
    alert: Option<Alert>,
    status: StatusCode,
) -> Response {
    // A retrieval error from the page load takes precedence
    if page.alert.is_none() {
        page.alert = alert;
    }
    render(IdentityProviderTemplate::new(page, errors), status)
}

pub async fn identity_provider_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let page = identity_provider_page(&state, &id).await;

    // The page still renders with the empty provider when loading failed
    identity_provider_response(page, Vec::new(), None, StatusCode::OK)
}

pub async fn update_identity_provider_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<IdentityProviderForm>,
) -> Response {
    let update = IdentityProviderUpdate::from(form);

    if let Err(errors) = update.validate() {
        tracing::debug!(id = %id, "Identity provider form rejected");
        let page = identity_provider_page(&state, &id).await;
        let alert = Alert::warning("Invalid identity provider details", "Please provide a name.");
        return identity_provider_response(
            page,
            errors,
            Some(alert),
            StatusCode::UNPROCESSABLE_ENTITY,
        );
    }

    if let Err(error) = state.directory.update_identity_provider(&id, &update).await {
        tracing::error!(id = %id, error = %error, "Failed to update identity provider");
        let page = identity_provider_page(&state, &id).await;
        let alert = Alert::from_directory_error(
            &error,
            "Something went wrong",
            "An error occurred while updating the identity provider details.",
        );
        return identity_provider_response(
            page,
            Vec::new(),
            Some(alert),
            directory_status(&error),
        );
    }

    tracing::info!(id = %id, "Identity provider updated");

    // Re-read so the form shows what the directory stored
    let page = identity_provider_page(&state, &id).await;
    let alert = Alert::success(
        "Identity provider updated successfully",
        "The identity provider details were updated successfully.",
    );
    identity_provider_response(page, Vec::new(), Some(alert), StatusCode::OK)
}

pub async fn delete_identity_provider_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let identity_provider = match state.directory.identity_provider(&id).await {
        Ok(identity_provider) => identity_provider,
        Err(error) => return error_page(&error, "Retrieval error"),
    };

    let confirmation = DeleteConfirmation::for_identity_provider(&identity_provider.name);
    if !confirmation.is_confirmed_by(&form.assertion) {
        let page = identity_provider_page(&state, &id).await;
        let alert = Alert::warning("Confirmation failed", confirmation.hint());
        return identity_provider_response(page, Vec::new(), Some(alert), StatusCode::BAD_REQUEST);
    }

    match state.directory.delete_identity_provider(&id).await {
        Ok(()) => {
            tracing::info!(id = %id, "Identity provider deleted");
            Redirect::to(IDENTITY_PROVIDERS_PATH).into_response()
        }
        Err(error) => {
            tracing::error!(id = %id, error = %error, "Failed to delete identity provider");
            let page = identity_provider_page(&state, &id).await;
            let alert = Alert::from_directory_error(
                &error,
                "Something went wrong",
                "An error occurred while deleting the identity provider.",
            );
            identity_provider_response(page, Vec::new(), Some(alert), directory_status(&error))
        }
    }
}
