//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Document Types
// =============================================================================

/// Cédula de Ciudadanía (national ID)
pub const DOCUMENT_TYPE_NATIONAL_ID: &str = "CC";

/// Tarjeta de Identidad (minor's ID)
pub const DOCUMENT_TYPE_MINOR_ID: &str = "TI";

/// Cédula de Extranjería (foreign ID)
pub const DOCUMENT_TYPE_FOREIGN_ID: &str = "CE";

/// All valid document type codes
pub const VALID_DOCUMENT_TYPES: &[&str] = &[
    DOCUMENT_TYPE_NATIONAL_ID,
    DOCUMENT_TYPE_MINOR_ID,
    DOCUMENT_TYPE_FOREIGN_ID,
];

// =============================================================================
// Validation
// =============================================================================

/// Document numbers are digits only, between 5 and 15 of them
pub const DOCUMENT_ID_PATTERN: &str = r"^[0-9]{5,15}$";
