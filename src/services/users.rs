//! Profile reads and updates.

use crate::domain::user::{SUPPORTED_LANGUAGES, UpdateProfile, User};
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

pub fn get_profile<R>(repo: &R, user_id: i32) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    repo.get_user_by_id(user_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Applies profile changes after validating the requested language.
pub fn update_profile<R>(repo: &R, user_id: i32, updates: UpdateProfile) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    if let Some(language) = &updates.language {
        if !SUPPORTED_LANGUAGES.contains(&language.as_str()) {
            return Err(ServiceError::Validation(format!(
                "unsupported language: {language}"
            )));
        }
    }

    repo.update_user(user_id, &updates)
        .map_err(ServiceError::from)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;

    #[test]
    fn update_profile_rejects_unknown_language() {
        let repo = MockRepository::new();
        let updates = UpdateProfile::new(None, Some("fr".to_string()), None);

        let result = update_profile(&repo, 1, updates);

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn update_profile_passes_changes_through() {
        let mut repo = MockRepository::new();
        repo.expect_update_user()
            .times(1)
            .withf(|user_id, updates| *user_id == 1 && updates.language.as_deref() == Some("ru"))
            .returning(|_, _| Err(crate::repository::errors::RepositoryError::NotFound));

        let updates = UpdateProfile::new(None, Some("ru".to_string()), None);
        let result = update_profile(&repo, 1, updates);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
