//! Error classification: turn a raw wallet, transport, or contract failure
//! into the one sentence a user sees.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. Contract revert with a reason string: `"Contract Error: <reason>"`.
//! 2. Contract revert with a named custom error: a plain-language sentence for
//!    known names, otherwise `"Error: <name>"`.
//! 3. User declined the signature or transaction.
//! 4. Transport failure (case-insensitive `"network"` in the message).
//! 5. Fallback: the short message, else the message. Anything longer than
//!    [`MAX_DISPLAY_LEN`] characters is replaced by [`GENERIC_FAILURE`].

use std::fmt;

/// Longest raw message shown to the user verbatim.
pub const MAX_DISPLAY_LEN: usize = 100;

pub const GENERIC_FAILURE: &str = "Transaction failed. Please check your wallet for details.";
pub const USER_DECLINED: &str = "You cancelled the request.";
pub const NETWORK_FAILURE: &str = "Network error. Please check your connection.";
pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";
pub const NO_MESSAGE: &str = "Something went wrong.";

/// Error name wallets use for a declined request.
pub const USER_REJECTED_NAME: &str = "UserRejectedRequestError";

/// Custom contract errors with a dedicated sentence.
const KNOWN_ERRORS: &[(&str, &str)] = &[("AlreadyVoted", "You have already voted!")];

/// Decoded revert payload found anywhere in a failure's cause chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Revert {
    /// `Error(string)` revert.
    Reason(String),
    /// Custom error, identified by name.
    Named(String),
    /// Revert data that could not be decoded.
    Opaque,
}

/// A failure as reported by the wallet, the transport, or the contract.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawError {
    /// Error class name, e.g. `UserRejectedRequestError`.
    pub name: Option<String>,
    /// Full message, often including a technical payload.
    pub message: Option<String>,
    /// One-line summary, when the source provides one.
    pub short_message: Option<String>,
    pub revert: Option<Revert>,
}

impl RawError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn user_rejected() -> Self {
        Self {
            name: Some(USER_REJECTED_NAME.to_string()),
            message: Some("User rejected the request.".to_string()),
            ..Self::default()
        }
    }

    pub fn revert_reason(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            message: Some(format!("execution reverted: {reason}")),
            revert: Some(Revert::Reason(reason)),
            ..Self::default()
        }
    }

    pub fn revert_named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            message: Some(format!("execution reverted with custom error {name}()")),
            revert: Some(Revert::Named(name)),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_short_message(mut self, short_message: impl Into<String>) -> Self {
        self.short_message = Some(short_message.into());
        self
    }

    pub fn with_revert(mut self, revert: Revert) -> Self {
        self.revert = Some(revert);
        self
    }
}

impl fmt::Display for RawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.message) {
            (Some(name), Some(message)) => write!(f, "{name}: {message}"),
            (None, Some(message)) => f.write_str(message),
            (Some(name), None) => f.write_str(name),
            (None, None) => f.write_str("unknown error"),
        }
    }
}

impl std::error::Error for RawError {}

/// User-facing failure category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    ContractRevertWithReason(String),
    ContractRevertNamed(String),
    UserDeclined,
    NetworkFailure,
    /// Message short enough to show as-is.
    UnclassifiedShort(String),
    /// Message replaced by the generic sentence.
    UnclassifiedLong,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContractRevertWithReason(reason) => write!(f, "Contract Error: {reason}"),
            Self::ContractRevertNamed(name) => {
                match KNOWN_ERRORS.iter().find(|(known, _)| *known == name.as_str()) {
                    Some((_, sentence)) => f.write_str(sentence),
                    None => write!(f, "Error: {name}"),
                }
            }
            Self::UserDeclined => f.write_str(USER_DECLINED),
            Self::NetworkFailure => f.write_str(NETWORK_FAILURE),
            Self::UnclassifiedShort(message) => f.write_str(message),
            Self::UnclassifiedLong => f.write_str(GENERIC_FAILURE),
        }
    }
}

/// Classify a raw failure. Total: every input maps to a category.
pub fn classify(error: &RawError) -> ErrorCategory {
    match &error.revert {
        Some(Revert::Reason(reason)) if !reason.is_empty() => {
            return ErrorCategory::ContractRevertWithReason(reason.clone());
        }
        Some(Revert::Named(name)) if !name.is_empty() => {
            return ErrorCategory::ContractRevertNamed(name.clone());
        }
        _ => {}
    }

    let message = error.message.as_deref().unwrap_or_default();

    if message.contains("User rejected") || error.name.as_deref() == Some(USER_REJECTED_NAME) {
        return ErrorCategory::UserDeclined;
    }

    if message.to_lowercase().contains("network") {
        return ErrorCategory::NetworkFailure;
    }

    let text = error
        .short_message
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(error.message.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or(NO_MESSAGE);

    if text.chars().count() > MAX_DISPLAY_LEN {
        ErrorCategory::UnclassifiedLong
    } else {
        ErrorCategory::UnclassifiedShort(text.to_string())
    }
}

/// The sentence shown for an optional failure.
pub fn user_message(error: Option<&RawError>) -> String {
    match error {
        Some(error) => classify(error).to_string(),
        None => UNKNOWN_ERROR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revert_reason() {
        let err = RawError::revert_reason("insufficient weight");
        assert_eq!(
            classify(&err),
            ErrorCategory::ContractRevertWithReason("insufficient weight".into())
        );
        assert_eq!(
            user_message(Some(&err)),
            "Contract Error: insufficient weight"
        );
    }

    #[test]
    fn test_known_named_error() {
        let err = RawError::revert_named("AlreadyVoted");
        assert_eq!(user_message(Some(&err)), "You have already voted!");
    }

    #[test]
    fn test_unknown_named_error() {
        let err = RawError::revert_named("DelegationLoop");
        assert_eq!(user_message(Some(&err)), "Error: DelegationLoop");
    }

    #[test]
    fn test_empty_reason_falls_through() {
        let err = RawError::new("execution reverted")
            .with_revert(Revert::Reason(String::new()));
        assert_eq!(user_message(Some(&err)), "execution reverted");
    }

    #[test]
    fn test_opaque_revert_falls_through() {
        let err = RawError::new("User rejected the request.").with_revert(Revert::Opaque);
        assert_eq!(classify(&err), ErrorCategory::UserDeclined);
    }

    #[test]
    fn test_revert_beats_user_rejection() {
        let err = RawError::user_rejected().with_revert(Revert::Reason("Already voted.".into()));
        assert_eq!(user_message(Some(&err)), "Contract Error: Already voted.");
    }

    #[test]
    fn test_user_rejected_by_message_or_name() {
        assert_eq!(
            user_message(Some(&RawError::new("User rejected the request."))),
            USER_DECLINED
        );
        assert_eq!(
            user_message(Some(&RawError::default().with_name(USER_REJECTED_NAME))),
            USER_DECLINED
        );
    }

    #[test]
    fn test_user_rejection_beats_network() {
        let err = RawError::new("User rejected the request on network 8453");
        assert_eq!(classify(&err), ErrorCategory::UserDeclined);
    }

    #[test]
    fn test_network_match_is_case_insensitive() {
        for msg in ["Network request failed", "network down", "NETWORK unreachable"] {
            assert_eq!(classify(&RawError::new(msg)), ErrorCategory::NetworkFailure);
        }
    }

    #[test]
    fn test_short_message_preferred() {
        let err = RawError::new("x".repeat(300)).with_short_message("Gas estimation failed.");
        assert_eq!(user_message(Some(&err)), "Gas estimation failed.");
    }

    #[test]
    fn test_length_boundary() {
        let exactly = "a".repeat(MAX_DISPLAY_LEN);
        assert_eq!(user_message(Some(&RawError::new(exactly.clone()))), exactly);

        let over = "a".repeat(MAX_DISPLAY_LEN + 1);
        assert_eq!(user_message(Some(&RawError::new(over))), GENERIC_FAILURE);
    }

    #[test]
    fn test_eighty_and_one_fifty_chars() {
        let eighty = "b".repeat(80);
        assert_eq!(user_message(Some(&RawError::new(eighty.clone()))), eighty);
        assert_eq!(
            user_message(Some(&RawError::new("c".repeat(150)))),
            GENERIC_FAILURE
        );
    }

    #[test]
    fn test_length_counts_characters() {
        let accented = "é".repeat(MAX_DISPLAY_LEN);
        assert_eq!(user_message(Some(&RawError::new(accented.clone()))), accented);
    }

    #[test]
    fn test_no_message() {
        assert_eq!(user_message(Some(&RawError::default())), NO_MESSAGE);
        assert_eq!(user_message(None), UNKNOWN_ERROR);
    }
}
