//! Unified error codes for the shop backend
//!
//! This module defines all error codes returned by shop-server and understood
//! by the mobile client. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Customer and membership errors
//! - 4xxx: Order and cart errors
//! - 5xxx: Payment, sale and credit errors
//! - 6xxx: Product and upload errors
//! - 7xxx: Notification and event errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values. On the wire they travel as
/// the `resultCode` string of the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,
    /// Email is already registered
    EmailAlreadyRegistered = 1008,
    /// Password too short
    PasswordTooShort = 1009,
    /// Current password does not match
    PasswordMismatch = 1010,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Shop owner role required
    OwnerRequired = 2002,

    // ==================== 3xxx: Customer / Membership ====================
    /// Customer not found
    CustomerNotFound = 3001,
    /// Customer phone already used in this shop
    CustomerPhoneExists = 3002,
    /// Customer still owes money
    CustomerHasBalance = 3003,
    /// Membership plan limit reached
    PlanLimitReached = 3101,
    /// Unknown membership plan
    InvalidPlan = 3102,
    /// Membership duration out of range
    InvalidMembershipDuration = 3103,

    // ==================== 4xxx: Order / Cart ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been paid
    OrderAlreadyPaid = 4002,
    /// Order has been cancelled
    OrderCancelled = 4003,
    /// Order status transition not allowed
    InvalidStatusTransition = 4004,
    /// Order is empty
    OrderEmpty = 4005,
    /// Cart not found
    CartNotFound = 4101,
    /// Cart item not found
    CartItemNotFound = 4102,
    /// Cart has already been checked out
    CartCheckedOut = 4103,
    /// Cart is empty
    CartEmpty = 4104,
    /// Quantity must be positive
    InvalidQuantity = 4105,

    // ==================== 5xxx: Payment / Sale / Credit ====================
    /// Payment not found
    PaymentNotFound = 5001,
    /// Payment exceeds what the order still owes
    PaymentExceedsOrderBalance = 5002,
    /// Invalid payment method
    PaymentInvalidMethod = 5003,
    /// Payment is already succeeded or failed
    PaymentAlreadyFinal = 5004,
    /// Callback amount does not match the payment
    PaymentAmountMismatch = 5005,
    /// Gateway signature check failed
    InvalidGatewaySignature = 5006,
    /// Payment gateway unavailable
    GatewayUnavailable = 5007,
    /// Sale not found
    SaleNotFound = 5100,
    /// Credit sale needs a customer
    CreditRequiresCustomer = 5101,
    /// Credit sale is already settled
    CreditAlreadySettled = 5102,
    /// Payment exceeds outstanding credit
    PaymentExceedsBalance = 5103,
    /// Customer has no outstanding credit
    NoOutstandingCredit = 5104,
    /// Amount paid exceeds the sale total
    SaleOverpaid = 5105,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Product is out of stock
    ProductOutOfStock = 6003,
    /// Product SKU already exists
    ProductSkuExists = 6004,
    /// Product is inactive
    ProductInactive = 6005,
    /// Variant not found
    VariantNotFound = 6201,
    /// Variant name already used on this product
    VariantNameExists = 6202,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid/corrupted image file
    InvalidImageFile = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Empty file provided
    EmptyFile = 6505,
    /// No filename provided
    NoFilename = 6506,
    /// Invalid file extension
    InvalidFileExtension = 6507,
    /// Image processing failed
    ImageProcessingFailed = 6508,
    /// File storage failed
    FileStorageFailed = 6509,

    // ==================== 7xxx: Notification / Event ====================
    /// Notification not found
    NotificationNotFound = 7001,
    /// Event not found
    EventNotFound = 7101,
    /// Event ends before it starts
    EventInvalidRange = 7102,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric value of this error code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// `resultCode` string as it appears in the response envelope
    pub fn result_code(&self) -> String {
        self.code().to_string()
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",
            ErrorCode::PasswordMismatch => "Current password is incorrect",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::OwnerRequired => "Shop owner role is required",

            // Customer / Membership
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CustomerPhoneExists => "Customer phone already exists",
            ErrorCode::CustomerHasBalance => "Customer has an outstanding balance",
            ErrorCode::PlanLimitReached => "Membership plan limit reached",
            ErrorCode::InvalidPlan => "Invalid membership plan",
            ErrorCode::InvalidMembershipDuration => "Membership duration must be 1 to 24 months",

            // Order / Cart
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::OrderCancelled => "Order has been cancelled",
            ErrorCode::InvalidStatusTransition => "Order status change is not allowed",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::CartNotFound => "Cart not found",
            ErrorCode::CartItemNotFound => "Cart item not found",
            ErrorCode::CartCheckedOut => "Cart has already been checked out",
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::InvalidQuantity => "Quantity is out of range",

            // Payment / Sale / Credit
            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::PaymentExceedsOrderBalance => "Payment exceeds the order balance",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::PaymentAlreadyFinal => "Payment has already been processed",
            ErrorCode::PaymentAmountMismatch => "Payment amount does not match",
            ErrorCode::InvalidGatewaySignature => "Invalid payment gateway signature",
            ErrorCode::GatewayUnavailable => "Payment gateway is unavailable",
            ErrorCode::SaleNotFound => "Sale not found",
            ErrorCode::CreditRequiresCustomer => "Credit sales require a customer",
            ErrorCode::CreditAlreadySettled => "Credit has already been settled",
            ErrorCode::PaymentExceedsBalance => "Payment exceeds the outstanding balance",
            ErrorCode::NoOutstandingCredit => "Customer has no outstanding credit",
            ErrorCode::SaleOverpaid => "Amount paid exceeds the sale total",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::ProductSkuExists => "Product SKU already exists",
            ErrorCode::ProductInactive => "Product is not available",
            ErrorCode::VariantNotFound => "Variant not found",
            ErrorCode::VariantNameExists => "Variant name already exists",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::InvalidFileExtension => "Invalid file extension",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",

            // Notification / Event
            ErrorCode::NotificationNotFound => "Notification not found",
            ErrorCode::EventNotFound => "Event not found",
            ErrorCode::EventInvalidRange => "Event cannot end before it starts",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::EmailAlreadyRegistered),
            1009 => Ok(ErrorCode::PasswordTooShort),
            1010 => Ok(ErrorCode::PasswordMismatch),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::OwnerRequired),

            // Customer / Membership
            3001 => Ok(ErrorCode::CustomerNotFound),
            3002 => Ok(ErrorCode::CustomerPhoneExists),
            3003 => Ok(ErrorCode::CustomerHasBalance),
            3101 => Ok(ErrorCode::PlanLimitReached),
            3102 => Ok(ErrorCode::InvalidPlan),
            3103 => Ok(ErrorCode::InvalidMembershipDuration),

            // Order / Cart
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyPaid),
            4003 => Ok(ErrorCode::OrderCancelled),
            4004 => Ok(ErrorCode::InvalidStatusTransition),
            4005 => Ok(ErrorCode::OrderEmpty),
            4101 => Ok(ErrorCode::CartNotFound),
            4102 => Ok(ErrorCode::CartItemNotFound),
            4103 => Ok(ErrorCode::CartCheckedOut),
            4104 => Ok(ErrorCode::CartEmpty),
            4105 => Ok(ErrorCode::InvalidQuantity),

            // Payment / Sale / Credit
            5001 => Ok(ErrorCode::PaymentNotFound),
            5002 => Ok(ErrorCode::PaymentExceedsOrderBalance),
            5003 => Ok(ErrorCode::PaymentInvalidMethod),
            5004 => Ok(ErrorCode::PaymentAlreadyFinal),
            5005 => Ok(ErrorCode::PaymentAmountMismatch),
            5006 => Ok(ErrorCode::InvalidGatewaySignature),
            5007 => Ok(ErrorCode::GatewayUnavailable),
            5100 => Ok(ErrorCode::SaleNotFound),
            5101 => Ok(ErrorCode::CreditRequiresCustomer),
            5102 => Ok(ErrorCode::CreditAlreadySettled),
            5103 => Ok(ErrorCode::PaymentExceedsBalance),
            5104 => Ok(ErrorCode::NoOutstandingCredit),
            5105 => Ok(ErrorCode::SaleOverpaid),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductOutOfStock),
            6004 => Ok(ErrorCode::ProductSkuExists),
            6005 => Ok(ErrorCode::ProductInactive),
            6201 => Ok(ErrorCode::VariantNotFound),
            6202 => Ok(ErrorCode::VariantNameExists),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6506 => Ok(ErrorCode::NoFilename),
            6507 => Ok(ErrorCode::InvalidFileExtension),
            6508 => Ok(ErrorCode::ImageProcessingFailed),
            6509 => Ok(ErrorCode::FileStorageFailed),

            // Notification / Event
            7001 => Ok(ErrorCode::NotificationNotFound),
            7101 => Ok(ErrorCode::EventNotFound),
            7102 => Ok(ErrorCode::EventInvalidRange),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
