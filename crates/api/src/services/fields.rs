use kickoff_core::errors::{KickoffError, KickoffResult};
use kickoff_core::models::{
    field::{
        CreateFieldRequest, FieldProfile, FieldSearch, FieldSearchQuery, FieldStatus,
        UpdateFieldRequest, UpdateFieldStatusRequest,
    },
    identity::{Caller, UserRole},
    MessageResponse,
};

use crate::middleware::auth::require_role;
use crate::ApiState;

pub async fn create_field(
    state: &ApiState,
    caller: &Caller,
    request: CreateFieldRequest,
) -> KickoffResult<FieldProfile> {
    require_role(caller, UserRole::FieldOwner)?;
    request.validate()?;

    let field = state.store.create_field(caller.user_id, request).await?;
    tracing::info!(field_id = field.field_id, owner_id = field.owner_id, "Field created");
    Ok(field)
}

pub async fn get_field(state: &ApiState, field_id: i64) -> KickoffResult<FieldProfile> {
    state
        .store
        .get_field(field_id)
        .await?
        .ok_or_else(|| KickoffError::not_found("Field", field_id))
}

/// Loads a field and checks that `caller` owns it.
pub async fn get_owned_field(
    state: &ApiState,
    caller: &Caller,
    field_id: i64,
) -> KickoffResult<FieldProfile> {
    let field = get_field(state, field_id).await?;
    if !field.is_owned_by(caller.user_id) {
        return Err(KickoffError::Forbidden(format!(
            "User {} does not own field {}",
            caller.user_id, field_id
        )));
    }
    Ok(field)
}

pub async fn update_field_status(
    state: &ApiState,
    caller: &Caller,
    field_id: i64,
    mut update: UpdateFieldStatusRequest,
) -> KickoffResult<FieldProfile> {
    require_role(caller, UserRole::Moderator)?;

    if update.status == FieldStatus::Rejected {
        let has_reason = update
            .rejection_reason
            .as_deref()
            .is_some_and(|reason| !reason.trim().is_empty());
        if !has_reason {
            return Err(KickoffError::Validation(
                "A rejection reason is required when rejecting a field".to_string(),
            ));
        }
    } else {
        update.rejection_reason = None;
    }

    let status = update.status;
    let field = state
        .store
        .update_field_status(field_id, update)
        .await?
        .ok_or_else(|| KickoffError::not_found("Field", field_id))?;

    tracing::info!(field_id, %status, moderator_id = caller.user_id, "Field status updated");
    Ok(field)
}

pub async fn list_my_fields(
    state: &ApiState,
    caller: &Caller,
) -> KickoffResult<Vec<FieldProfile>> {
    state.store.list_fields_by_owner(caller.user_id).await
}

pub async fn update_field(
    state: &ApiState,
    caller: &Caller,
    field_id: i64,
    update: UpdateFieldRequest,
) -> KickoffResult<FieldProfile> {
    get_owned_field(state, caller, field_id).await?;
    update.validate()?;

    let field = state
        .store
        .update_field(field_id, update)
        .await?
        .ok_or_else(|| KickoffError::not_found("Field", field_id))?;

    tracing::info!(field_id, owner_id = caller.user_id, "Field updated");
    Ok(field)
}

/// Deletes an owned field together with its calendar, bookings, pricing
/// rules and cancellation policy.
pub async fn delete_field(
    state: &ApiState,
    caller: &Caller,
    field_id: i64,
) -> KickoffResult<MessageResponse> {
    get_owned_field(state, caller, field_id).await?;

    if !state.store.delete_field(field_id).await? {
        return Err(KickoffError::not_found("Field", field_id));
    }

    tracing::info!(field_id, owner_id = caller.user_id, "Field deleted");
    Ok(MessageResponse::new(format!("Field {} deleted", field_id)))
}

pub async fn search_fields(
    state: &ApiState,
    query: FieldSearchQuery,
) -> KickoffResult<Vec<FieldProfile>> {
    let search = FieldSearch::try_from(query)?;
    state.store.search_fields(search).await
}
