//! # Purchase Admission
//!
//! Decides whether a submitted purchase may be stored, and with which status.
//!
//! ## Admission Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PurchaseSubmission { code, value, date, reseller, status? }            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. value > 0 ?                 ── no ──► InvalidValue                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. reseller exists ?           ── no ──► NotFound                      │
//! │     reseller.user_id == caller? ── no ──► Forbidden (authorization)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. code unused ?               ── no ──► DuplicateCode                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. status = cpf == auto-approved ? Approved : PendingValidation        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NewPurchase (ready to insert)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first failing check wins. Every check here is pure: the caller looks
//! up the reseller and the code beforehand and passes the answers in. The
//! code check is advisory, the database `UNIQUE` constraint has the final
//! word.

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::cpf::strip_non_digits;
use crate::error::AdmissionError;
use crate::money::Money;
use crate::period::Period;
use crate::types::{Identity, NewPurchase, PurchaseStatus, Reseller};
use crate::DEFAULT_AUTO_APPROVED_CPF;

// =============================================================================
// Policy
// =============================================================================

/// Deployment-level knobs of the cashback rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashbackPolicy {
    /// Digits of the CPF whose purchases skip manual validation.
    /// `None` disables auto-approval.
    pub auto_approved_cpf: Option<String>,

    /// Period listed when a request does not name one.
    pub default_period: Period,
}

impl Default for CashbackPolicy {
    fn default() -> Self {
        CashbackPolicy {
            auto_approved_cpf: Some(DEFAULT_AUTO_APPROVED_CPF.to_string()),
            default_period: Period::default_listing(),
        }
    }
}

impl CashbackPolicy {
    /// Sets the auto-approved CPF; punctuation is stripped, blank disables.
    pub fn with_auto_approved_cpf(mut self, cpf: Option<&str>) -> Self {
        self.auto_approved_cpf = cpf.map(strip_non_digits).filter(|d| !d.is_empty());
        self
    }

    pub fn with_default_period(mut self, period: Period) -> Self {
        self.default_period = period;
        self
    }
}

// =============================================================================
// Submission
// =============================================================================

/// A purchase as submitted by a reseller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PurchaseSubmission {
    pub code: i64,

    /// Amount in reais on the wire (`135.9`).
    #[serde(with = "crate::money::decimal")]
    pub value: Money,

    pub date: NaiveDate,

    /// Declared owner (a user id).
    #[serde(alias = "reseller")]
    pub reseller_id: String,

    /// Accepted so old clients can keep sending it; never honored.
    ///
    /// Names (`"approved"`) and legacy codes (`2`) are recognized; anything
    /// else reads as `None` instead of failing the submission.
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<PurchaseStatus>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Code(i64),
    Name(String),
    Other(IgnoredAny),
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<PurchaseStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let status = match Option::<RawStatus>::deserialize(deserializer)? {
        Some(RawStatus::Code(code)) => u8::try_from(code)
            .ok()
            .and_then(PurchaseStatus::from_code),
        Some(RawStatus::Name(name)) => match name.trim() {
            "pending_validation" => Some(PurchaseStatus::PendingValidation),
            "approved" => Some(PurchaseStatus::Approved),
            "rejected" => Some(PurchaseStatus::Rejected),
            _ => None,
        },
        Some(RawStatus::Other(_)) | None => None,
    };
    Ok(status)
}

// =============================================================================
// Rules
// =============================================================================

/// Rejects zero and negative values.
pub fn validate_value(value: Money) -> Result<(), AdmissionError> {
    if !value.is_positive() {
        return Err(AdmissionError::InvalidValue);
    }
    Ok(())
}

/// Checks that the declared reseller exists and belongs to the caller.
pub fn check_ownership<'a>(
    declared_id: &str,
    reseller: Option<&'a Reseller>,
    caller: &Identity,
) -> Result<&'a Reseller, AdmissionError> {
    let reseller = reseller.ok_or_else(|| AdmissionError::NotFound {
        reseller_id: declared_id.to_string(),
    })?;

    if reseller.user_id != caller.user_id {
        return Err(AdmissionError::Forbidden {
            reseller_id: declared_id.to_string(),
        });
    }

    Ok(reseller)
}

/// Status a purchase starts in, given its reseller's CPF.
///
/// ## Example
/// ```rust
/// use cashback_core::admission::{initial_status, CashbackPolicy};
/// use cashback_core::PurchaseStatus;
///
/// let policy = CashbackPolicy::default();
/// assert_eq!(initial_status("153.509.460-56", &policy), PurchaseStatus::Approved);
/// assert_eq!(initial_status("945.086.080-78", &policy), PurchaseStatus::PendingValidation);
/// ```
pub fn initial_status(cpf: &str, policy: &CashbackPolicy) -> PurchaseStatus {
    match &policy.auto_approved_cpf {
        Some(approved) if strip_non_digits(cpf) == *approved => PurchaseStatus::Approved,
        _ => PurchaseStatus::PendingValidation,
    }
}

/// Runs the full admission pipeline.
///
/// ## Arguments
/// * `reseller` - the reseller found under `submission.reseller_id`, if any
/// * `code_taken` - whether a purchase with `submission.code` already exists
pub fn admit(
    submission: PurchaseSubmission,
    reseller: Option<&Reseller>,
    caller: &Identity,
    code_taken: bool,
    policy: &CashbackPolicy,
) -> Result<NewPurchase, AdmissionError> {
    validate_value(submission.value)?;

    let reseller = check_ownership(&submission.reseller_id, reseller, caller)?;

    if code_taken {
        return Err(AdmissionError::DuplicateCode {
            code: submission.code,
        });
    }

    Ok(NewPurchase {
        code: submission.code,
        value: submission.value,
        date: submission.date,
        reseller_id: reseller.user_id.clone(),
        status: initial_status(reseller.cpf.digits(), policy),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpf::Cpf;

    fn reseller(user_id: &str, cpf: &str) -> Reseller {
        Reseller {
            user_id: user_id.to_string(),
            cpf: Cpf::parse(cpf).unwrap(),
            name: "Revendedor".to_string(),
        }
    }

    fn submission(code: i64, cents: i64, reseller_id: &str) -> PurchaseSubmission {
        PurchaseSubmission {
            code,
            value: Money::from_cents(cents),
            date: NaiveDate::from_ymd_opt(2021, 10, 5).unwrap(),
            reseller_id: reseller_id.to_string(),
            status: None,
        }
    }

    #[test]
    fn test_admit_pending() {
        let owner = reseller("u-1", "945.086.080-78");
        let caller = Identity::new("u-1");

        let purchase = admit(
            submission(10, 5_000, "u-1"),
            Some(&owner),
            &caller,
            false,
            &CashbackPolicy::default(),
        )
        .unwrap();

        assert_eq!(purchase.code, 10);
        assert_eq!(purchase.reseller_id, "u-1");
        assert_eq!(purchase.status, PurchaseStatus::PendingValidation);
    }

    #[test]
    fn test_admit_auto_approved_cpf() {
        let owner = reseller("u-2", "153.509.460-56");
        let caller = Identity::new("u-2");

        let purchase = admit(
            submission(11, 100, "u-2"),
            Some(&owner),
            &caller,
            false,
            &CashbackPolicy::default(),
        )
        .unwrap();

        assert_eq!(purchase.status, PurchaseStatus::Approved);
    }

    #[test]
    fn test_client_status_ignored() {
        let owner = reseller("u-1", "945.086.080-78");
        let mut sub = submission(12, 100, "u-1");
        sub.status = Some(PurchaseStatus::Approved);

        let purchase = admit(
            sub,
            Some(&owner),
            &Identity::new("u-1"),
            false,
            &CashbackPolicy::default(),
        )
        .unwrap();

        assert_eq!(purchase.status, PurchaseStatus::PendingValidation);
    }

    #[test]
    fn test_non_positive_value_rejected_first() {
        let owner = reseller("u-1", "945.086.080-78");

        // Even with a foreign reseller and a taken code, value is reported first
        for cents in [0, -1] {
            let err = admit(
                submission(1, cents, "u-1"),
                Some(&owner),
                &Identity::new("someone-else"),
                true,
                &CashbackPolicy::default(),
            )
            .unwrap_err();
            assert_eq!(err, AdmissionError::InvalidValue);
        }
    }

    #[test]
    fn test_missing_reseller() {
        let err = admit(
            submission(1, 100, "ghost"),
            None,
            &Identity::new("u-1"),
            false,
            &CashbackPolicy::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AdmissionError::NotFound {
                reseller_id: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_foreign_reseller_forbidden_before_duplicate() {
        let owner = reseller("u-b", "945.086.080-78");
        let err = admit(
            submission(1, 100, "u-b"),
            Some(&owner),
            &Identity::new("u-a"),
            true,
            &CashbackPolicy::default(),
        )
        .unwrap_err();
        assert!(err.is_authorization());
    }

    #[test]
    fn test_duplicate_code() {
        let owner = reseller("u-1", "945.086.080-78");
        let err = admit(
            submission(77, 100, "u-1"),
            Some(&owner),
            &Identity::new("u-1"),
            true,
            &CashbackPolicy::default(),
        )
        .unwrap_err();
        assert_eq!(err, AdmissionError::DuplicateCode { code: 77 });
    }

    #[test]
    fn test_policy_overrides() {
        let disabled = CashbackPolicy::default().with_auto_approved_cpf(Some("  "));
        assert_eq!(disabled.auto_approved_cpf, None);
        assert_eq!(
            initial_status("15350946056", &disabled),
            PurchaseStatus::PendingValidation
        );

        let custom = CashbackPolicy::default().with_auto_approved_cpf(Some("945.086.080-78"));
        assert_eq!(initial_status("94508608078", &custom), PurchaseStatus::Approved);
    }

    fn parse(extra: &str) -> PurchaseSubmission {
        let json = format!(
            r#"{{"code": 5, "value": 135.9, "date": "2021-10-01", "reseller": "u-1"{extra}}}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_submission_deserialize() {
        let sub = parse(r#", "status": "approved""#);
        assert_eq!(sub.reseller_id, "u-1");
        assert_eq!(sub.value.cents(), 13_590);
        assert_eq!(sub.status, Some(PurchaseStatus::Approved));

        let sub = parse("");
        assert_eq!(sub.status, None);
    }

    #[test]
    fn test_submission_value_in_reais() {
        let json = r#"{"code": 5, "value": 100, "date": "2021-10-01", "reseller_id": "u-1"}"#;
        let sub: PurchaseSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(sub.value, Money::from_cents(10_000));

        let json = r#"{"code": 5, "value": "1000.01", "date": "2021-10-01", "reseller_id": "u-1"}"#;
        let sub: PurchaseSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(sub.value, Money::from_cents(100_001));
    }

    #[test]
    fn test_any_client_status_is_accepted_and_ignored() {
        assert_eq!(parse(r#", "status": 2"#).status, Some(PurchaseStatus::Approved));

        for extra in [
            r#", "status": "bogus""#,
            r#", "status": 9"#,
            r#", "status": -1"#,
            r#", "status": null"#,
            r#", "status": {"id": 2}"#,
        ] {
            assert_eq!(parse(extra).status, None, "{extra}");
        }

        let policy = CashbackPolicy::default();
        let owner = reseller("u-1", "945.086.080-78");
        for extra in [r#", "status": 2"#, r#", "status": "bogus""#] {
            let admitted = admit(
                parse(extra),
                Some(&owner),
                &Identity::new("u-1"),
                false,
                &policy,
            )
            .unwrap();
            assert_eq!(admitted.status, PurchaseStatus::PendingValidation);
        }
    }
}
