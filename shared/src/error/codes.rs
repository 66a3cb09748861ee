//! Unified error codes for Forno
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Store (status / layout) errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors
//! - 7xxx: Review errors
//! - 9xxx: System errors
//!
//! Each code also has a stable SCREAMING_SNAKE key (`STORE_CLOSED`, ...) that the
//! browser pages branch on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
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

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Too many requests from the same address
    TooManyRequests = 1005,
    /// Email already registered
    EmailAlreadyRegistered = 1006,
    /// Password too short
    PasswordTooShort = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 3xxx: Store ====================
    /// Store is closed (manual closure or outside opening hours)
    StoreClosed = 3001,
    /// Store hours are malformed
    InvalidStoreHours = 3002,
    /// Layout settings are invalid
    InvalidLayout = 3003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Status change not allowed from the current status
    InvalidStatusTransition = 4003,
    /// Order can no longer be cancelled by the customer
    OrderNotCancellable = 4004,
    /// Order intent not found
    IntentNotFound = 4005,
    /// Order intent has expired
    IntentExpired = 4006,
    /// Item quantity out of range
    InvalidQuantity = 4007,
    /// Order intent already settled
    IntentAlreadySettled = 4008,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Webhook signature or token rejected
    WebhookUnauthorized = 5002,
    /// Webhook amount differs from the intent total
    PaymentAmountMismatch = 5003,
    /// Payment method not accepted for this operation
    PaymentInvalidMethod = 5004,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is inactive
    ProductUnavailable = 6002,
    /// Product has invalid price
    ProductInvalidPrice = 6003,
    /// Size is not offered for this product
    ProductSizeNotFound = 6004,

    // ==================== 7xxx: Review ====================
    /// Order already reviewed
    ReviewAlreadyExists = 7001,
    /// Order cannot be reviewed yet
    ReviewNotAllowed = 7002,
    /// Rating outside 1..=5
    InvalidRating = 7003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Receipt rendering failed
    ReceiptRenderFailed = 9201,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Stable string key sent as `codigo` in the JSON envelope
    pub const fn key(&self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::Unknown => "UNKNOWN",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",

            ErrorCode::NotAuthenticated => "NOT_AUTHENTICATED",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::TokenInvalid => "TOKEN_INVALID",
            ErrorCode::TooManyRequests => "TOO_MANY_REQUESTS",
            ErrorCode::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            ErrorCode::PasswordTooShort => "PASSWORD_TOO_SHORT",

            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::AdminRequired => "ADMIN_REQUIRED",

            ErrorCode::StoreClosed => "STORE_CLOSED",
            ErrorCode::InvalidStoreHours => "INVALID_STORE_HOURS",
            ErrorCode::InvalidLayout => "INVALID_LAYOUT",

            ErrorCode::OrderNotFound => "ORDER_NOT_FOUND",
            ErrorCode::OrderEmpty => "ORDER_EMPTY",
            ErrorCode::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            ErrorCode::OrderNotCancellable => "ORDER_NOT_CANCELLABLE",
            ErrorCode::IntentNotFound => "INTENT_NOT_FOUND",
            ErrorCode::IntentExpired => "INTENT_EXPIRED",
            ErrorCode::InvalidQuantity => "INVALID_QUANTITY",
            ErrorCode::IntentAlreadySettled => "INTENT_ALREADY_SETTLED",

            ErrorCode::PaymentFailed => "PAYMENT_FAILED",
            ErrorCode::WebhookUnauthorized => "WEBHOOK_UNAUTHORIZED",
            ErrorCode::PaymentAmountMismatch => "PAYMENT_AMOUNT_MISMATCH",
            ErrorCode::PaymentInvalidMethod => "PAYMENT_INVALID_METHOD",

            ErrorCode::ProductNotFound => "PRODUCT_NOT_FOUND",
            ErrorCode::ProductUnavailable => "PRODUCT_UNAVAILABLE",
            ErrorCode::ProductInvalidPrice => "PRODUCT_INVALID_PRICE",
            ErrorCode::ProductSizeNotFound => "PRODUCT_SIZE_NOT_FOUND",

            ErrorCode::ReviewAlreadyExists => "REVIEW_ALREADY_EXISTS",
            ErrorCode::ReviewNotAllowed => "REVIEW_NOT_ALLOWED",
            ErrorCode::InvalidRating => "INVALID_RATING",

            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::ReceiptRenderFailed => "RECEIPT_RENDER_FAILED",
        }
    }

    /// Get the customer-facing (pt-BR) message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operação realizada com sucesso",
            ErrorCode::Unknown => "Erro desconhecido",
            ErrorCode::ValidationFailed => "Dados inválidos",
            ErrorCode::NotFound => "Recurso não encontrado",
            ErrorCode::AlreadyExists => "Recurso já existe",
            ErrorCode::InvalidRequest => "Requisição inválida",

            // Auth
            ErrorCode::NotAuthenticated => "Autenticação necessária",
            ErrorCode::InvalidCredentials => "E-mail ou senha inválidos",
            ErrorCode::TokenExpired => "Sessão expirada, faça login novamente",
            ErrorCode::TokenInvalid => "Token inválido",
            ErrorCode::TooManyRequests => "Muitas tentativas, aguarde um momento",
            ErrorCode::EmailAlreadyRegistered => "E-mail já cadastrado",
            ErrorCode::PasswordTooShort => "A senha deve ter pelo menos 6 caracteres",

            // Permission
            ErrorCode::PermissionDenied => "Acesso negado",
            ErrorCode::AdminRequired => "Acesso restrito ao administrador",

            // Store
            ErrorCode::StoreClosed => "A loja está fechada no momento",
            ErrorCode::InvalidStoreHours => "Horário de funcionamento inválido",
            ErrorCode::InvalidLayout => "Configuração de layout inválida",

            // Order
            ErrorCode::OrderNotFound => "Pedido não encontrado",
            ErrorCode::OrderEmpty => "O carrinho está vazio",
            ErrorCode::InvalidStatusTransition => "Alteração de status não permitida",
            ErrorCode::OrderNotCancellable => "O pedido não pode mais ser cancelado",
            ErrorCode::IntentNotFound => "Intenção de pedido não encontrada",
            ErrorCode::IntentExpired => "Intenção de pedido expirada",
            ErrorCode::InvalidQuantity => "Quantidade inválida",
            ErrorCode::IntentAlreadySettled => "Intenção de pedido já processada",

            // Payment
            ErrorCode::PaymentFailed => "Falha no pagamento",
            ErrorCode::WebhookUnauthorized => "Assinatura do webhook inválida",
            ErrorCode::PaymentAmountMismatch => "Valor do pagamento não confere",
            ErrorCode::PaymentInvalidMethod => "Forma de pagamento inválida",

            // Product
            ErrorCode::ProductNotFound => "Produto não encontrado",
            ErrorCode::ProductUnavailable => "Produto indisponível",
            ErrorCode::ProductInvalidPrice => "Preço inválido",
            ErrorCode::ProductSizeNotFound => "Tamanho não disponível para o produto",

            // Review
            ErrorCode::ReviewAlreadyExists => "Este pedido já foi avaliado",
            ErrorCode::ReviewNotAllowed => "Só é possível avaliar pedidos entregues",
            ErrorCode::InvalidRating => "A nota deve ser entre 1 e 5",

            // System
            ErrorCode::InternalError => "Erro interno do servidor",
            ErrorCode::DatabaseError => "Erro no banco de dados",
            ErrorCode::ConfigError => "Erro de configuração",
            ErrorCode::ReceiptRenderFailed => "Falha ao gerar o comprovante",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a u16 doesn't match any [`ErrorCode`]
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

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::TooManyRequests),
            1006 => Ok(ErrorCode::EmailAlreadyRegistered),
            1007 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),

            // Store
            3001 => Ok(ErrorCode::StoreClosed),
            3002 => Ok(ErrorCode::InvalidStoreHours),
            3003 => Ok(ErrorCode::InvalidLayout),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::InvalidStatusTransition),
            4004 => Ok(ErrorCode::OrderNotCancellable),
            4005 => Ok(ErrorCode::IntentNotFound),
            4006 => Ok(ErrorCode::IntentExpired),
            4007 => Ok(ErrorCode::InvalidQuantity),
            4008 => Ok(ErrorCode::IntentAlreadySettled),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::WebhookUnauthorized),
            5003 => Ok(ErrorCode::PaymentAmountMismatch),
            5004 => Ok(ErrorCode::PaymentInvalidMethod),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductUnavailable),
            6003 => Ok(ErrorCode::ProductInvalidPrice),
            6004 => Ok(ErrorCode::ProductSizeNotFound),

            // Review
            7001 => Ok(ErrorCode::ReviewAlreadyExists),
            7002 => Ok(ErrorCode::ReviewNotAllowed),
            7003 => Ok(ErrorCode::InvalidRating),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9201 => Ok(ErrorCode::ReceiptRenderFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
