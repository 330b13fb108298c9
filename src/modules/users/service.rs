use tracing::{info, warn};
use welding_admin_core::AppError;
use welding_admin_firebase::provider::MAX_LIST_PAGE;
use welding_admin_firebase::{Provider, ProviderError, UserRecord, UserUpdate};
use welding_admin_observability::track_user_admin_operation;

use crate::modules::users::model::{
    CreateUserDto, DeleteTarget, DeleteUserDto, UID_REQUIRED, UpdateEmailDto, UpdatePasswordDto,
};

/// Records the outcome for metrics and turns provider failures into 400s.
fn finish<T>(operation: &'static str, result: Result<T, ProviderError>) -> Result<T, AppError> {
    track_user_admin_operation(operation, result.is_ok());
    result.map_err(|err| {
        warn!(operation, error = %err, "Provider call failed");
        AppError::from(err)
    })
}

pub struct UserService;

impl UserService {
    /// Returns up to one provider page of accounts.
    pub async fn list_users(provider: &Provider) -> Result<Vec<UserRecord>, AppError> {
        let result = provider
            .call(provider.identity().list_users(MAX_LIST_PAGE))
            .await;
        finish("list", result)
    }

    pub async fn create_user(provider: &Provider, dto: CreateUserDto) -> Result<String, AppError> {
        let result = provider
            .call(provider.identity().create_user(&dto.email, &dto.password))
            .await;
        let user = finish("create", result)?;

        info!(uid = %user.uid, email = %dto.email, "Created account");
        Ok(user.uid)
    }

    pub async fn update_email(provider: &Provider, dto: UpdateEmailDto) -> Result<(), AppError> {
        let result = provider
            .call(
                provider
                    .identity()
                    .update_user(&dto.uid, UserUpdate::Email(dto.email.clone())),
            )
            .await;
        finish("update_email", result)?;

        info!(uid = %dto.uid, "Updated account email");
        Ok(())
    }

    pub async fn update_password(
        provider: &Provider,
        dto: UpdatePasswordDto,
    ) -> Result<(), AppError> {
        let result = provider
            .call(
                provider
                    .identity()
                    .update_user(&dto.uid, UserUpdate::Password(dto.password)),
            )
            .await;
        finish("update_password", result)?;

        info!(uid = %dto.uid, "Updated account password");
        Ok(())
    }

    /// Removes the role record, then the account. A missing role record is
    /// not an error; a missing account is.
    pub async fn delete_user(provider: &Provider, dto: DeleteUserDto) -> Result<String, AppError> {
        let Some(target) = dto.target() else {
            return Err(AppError::bad_request(anyhow::anyhow!(UID_REQUIRED)));
        };

        let result = Self::delete_target(provider, target).await;
        let uid = finish("delete", result)?;

        info!(uid = %uid, "Deleted account and role record");
        Ok(uid)
    }

    async fn delete_target(provider: &Provider, target: DeleteTarget) -> Result<String, ProviderError> {
        let uid = match target {
            DeleteTarget::Uid(uid) => uid,
            DeleteTarget::Email(email) => {
                provider
                    .call(provider.identity().get_user_by_email(&email))
                    .await?
                    .uid
            }
        };

        provider
            .call(provider.roles().remove_role_record(&uid))
            .await?;
        provider.call(provider.identity().delete_user(&uid)).await?;
        Ok(uid)
    }
}
