//! Authenticated Caller
//!
//! The auth middleware resolves the session cookie and inserts a
//! [`CurrentUser`] into the request extensions. Other contexts only read it.

use crate::id::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    /// `person` or `organization`
    pub user_type: &'static str,
}

#[cfg(feature = "axum")]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = crate::error::app_error::AppError;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().copied().ok_or_else(|| {
            crate::error::app_error::AppError::unauthorized("Authentication required")
                .with_code("unAuthorized")
        })
    }
}

#[cfg(feature = "axum")]
impl<S> axum::extract::OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().copied())
    }
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;

    #[tokio::test]
    async fn test_extract_present_and_missing() {
        let user = CurrentUser {
            user_id: UserId::new(),
            user_type: "person",
        };

        let (mut parts, _) = http::Request::builder()
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(user);
        let extracted = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, user);

        let (mut parts, _) = http::Request::builder()
            .body(())
            .unwrap()
            .into_parts();
        let err = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
    }
}
