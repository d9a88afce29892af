//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::CustomerNotFound
            | Self::OrderNotFound
            | Self::CartNotFound
            | Self::CartItemNotFound
            | Self::PaymentNotFound
            | Self::SaleNotFound
            | Self::ProductNotFound
            | Self::VariantNotFound
            | Self::NotificationNotFound
            | Self::EventNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::EmailAlreadyRegistered
            | Self::CustomerPhoneExists
            | Self::CustomerHasBalance
            | Self::OrderAlreadyPaid
            | Self::OrderCancelled
            | Self::InvalidStatusTransition
            | Self::CartCheckedOut
            | Self::PaymentAlreadyFinal
            | Self::CreditAlreadySettled
            | Self::ProductSkuExists
            | Self::VariantNameExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled
            | Self::InvalidGatewaySignature => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::OwnerRequired | Self::PlanLimitReached => {
                StatusCode::FORBIDDEN
            }

            // 413 Payload Too Large
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::GatewayUnavailable | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::ImageProcessingFailed
            | Self::FileStorageFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::CartItemNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::SaleNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::EmailAlreadyRegistered.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::CartCheckedOut.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::CreditAlreadySettled.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_auth_statuses() {
        assert_eq!(ErrorCode::TokenExpired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::InvalidGatewaySignature.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::PlanLimitReached.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_bad_request_default() {
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::PaymentExceedsBalance.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ProductOutOfStock.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_server_side_statuses() {
        assert_eq!(ErrorCode::DatabaseError.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorCode::GatewayUnavailable.http_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ErrorCode::FileTooLarge.http_status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
