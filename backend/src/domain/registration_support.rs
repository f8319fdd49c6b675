//! Helpers shared by the user and admin services.

use super::credentials::{PasswordHash, PlainPassword};
use super::ports::{PasswordHasher, StoreError};
use super::Error;

/// Message returned when an email is already registered.
pub(crate) const EMAIL_IN_USE: &str = "Email already in use";

#[track_caller]
pub(crate) fn require_password(plain: &PlainPassword) -> Result<(), Error> {
    if plain.is_empty() {
        return Err(Error::invalid("Password is required"));
    }
    Ok(())
}

/// Hash `plain`, rejecting an empty password before it reaches the hasher.
pub(crate) async fn hash_password(
    hasher: &dyn PasswordHasher,
    plain: &PlainPassword,
) -> Result<PasswordHash, Error> {
    require_password(plain)?;
    hasher
        .hash_password(plain.expose())
        .await
        .map_err(|err| Error::internal(format!("Error hashing password: {err}")))
}

/// Classify a store failure raised while doing `context`.
///
/// Unique violations surface as a conflict on the email; everything else is
/// internal and carries the driver message for operators.
#[track_caller]
pub(crate) fn storage_failure(context: &str, err: StoreError) -> Error {
    match err {
        StoreError::UniqueViolation { .. } => Error::conflict(EMAIL_IN_USE),
        other => Error::internal(format!("{context}: {other}")),
    }
}

/// Conflict unless every id in `holders` is `owner`.
#[track_caller]
pub(crate) fn ensure_unclaimed(
    holders: impl IntoIterator<Item = i64>,
    owner: Option<i64>,
) -> Result<(), Error> {
    if holders.into_iter().any(|id| Some(id) != owner) {
        return Err(Error::conflict(EMAIL_IN_USE));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::domain::ports::{HashError, MockPasswordHasher};
    use rstest::rstest;

    #[tokio::test]
    async fn empty_password_never_reaches_the_hasher() {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash_password().never();
        let err = hash_password(&hasher, &PlainPassword::default())
            .await
            .expect_err("empty password");
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert_eq!(err.message(), "Password is required");
    }

    #[tokio::test]
    async fn hasher_failure_is_internal() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash_password()
            .times(1)
            .returning(|_| Err(HashError::hash("output too short")));
        let err = hash_password(&hasher, &PlainPassword::from("pw"))
            .await
            .expect_err("hash fails");
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.message().starts_with("Error hashing password"));
    }

    #[rstest]
    #[case(StoreError::unique_violation("users_email_key"), ErrorKind::Conflict)]
    #[case(StoreError::query("syntax error"), ErrorKind::Internal)]
    #[case(StoreError::connection("broken pipe"), ErrorKind::Internal)]
    #[case(
        StoreError::query("canceling statement due to user request"),
        ErrorKind::Canceled
    )]
    fn storage_failures_are_classified(#[case] err: StoreError, #[case] kind: ErrorKind) {
        assert_eq!(storage_failure("Error querying users", err).kind(), kind);
    }

    #[rstest]
    #[case(vec![], None, true)]
    #[case(vec![4], None, false)]
    #[case(vec![4], Some(4), true)]
    #[case(vec![4], Some(5), false)]
    fn uniqueness_ignores_the_owner(
        #[case] holders: Vec<i64>,
        #[case] owner: Option<i64>,
        #[case] free: bool,
    ) {
        assert_eq!(ensure_unclaimed(holders, owner).is_ok(), free);
    }
}
