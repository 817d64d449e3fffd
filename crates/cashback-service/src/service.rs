//! # Cashback Service
//!
//! Request-scoped operations of the cashback program. Each call validates
//! with cashback-core, talks to the store, and returns domain values or a
//! [`ServiceError`].
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CashbackService<S: CashbackStore>                                     │
//! │                                                                         │
//! │  Purchases                          Accounts                            │
//! │  ─────────                          ────────                            │
//! │  admit_purchase(submission, caller) register_reseller(request)          │
//! │  list_purchases(caller, year, month) authenticate(email, password)      │
//! │  list_all_purchases(caller)         profile(caller)                     │
//! │                                     update_profile(caller, update)      │
//! │                                     update_account(caller, update)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cashback is never stored: listings read the monthly total and derive the
//! tier on every call.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use cashback_core::admission::{self, CashbackPolicy, PurchaseSubmission};
use cashback_core::registration::{self, RegistrationRequest};
use cashback_core::validation::{validate_email, validate_name, validate_password};
use cashback_core::{
    AccountUpdate, AdmissionError, Identity, Money, NewUser, Period, ProfileUpdate, Purchase,
    PurchaseView, RegistrationError, Reseller, User, MIN_PASSWORD_LENGTH,
};

use crate::error::{ServiceError, ServiceResult};
use crate::password::{hash_password, verify_password};
use crate::store::CashbackStore;

/// Orchestrates the cashback rules over a store.
pub struct CashbackService<S> {
    store: S,
    policy: CashbackPolicy,
}

impl<S: CashbackStore> CashbackService<S> {
    /// Creates a service over `store` with the given rule settings.
    pub fn new(store: S, policy: CashbackPolicy) -> Self {
        CashbackService { store, policy }
    }

    pub fn policy(&self) -> &CashbackPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    /// Admits and stores a purchase.
    ///
    /// ## Flow
    /// ```text
    /// value > 0 ?                        → InvalidValue (no store access)
    /// store.find_reseller_by_user(decl)  → NotFound / Forbidden
    /// store.exists_purchase_with_code    → DuplicateCode
    /// admission::admit (status rule)
    /// store.create_purchase              → UNIQUE(code) race → DuplicateCode
    /// ```
    pub async fn admit_purchase(
        &self,
        submission: PurchaseSubmission,
        caller: &Identity,
    ) -> ServiceResult<Purchase> {
        admission::validate_value(submission.value)?;

        let reseller = self
            .store
            .find_reseller_by_user(&submission.reseller_id)
            .await?;

        if let Err(err) = admission::check_ownership(&submission.reseller_id, reseller.as_ref(), caller)
        {
            if err.is_authorization() {
                warn!(
                    caller = %caller.user_id,
                    reseller_id = %submission.reseller_id,
                    "Purchase submitted for a reseller the caller does not own"
                );
            }
            return Err(err.into());
        }

        let code = submission.code;
        let code_taken = self.store.exists_purchase_with_code(code).await?;

        let purchase = admission::admit(
            submission,
            reseller.as_ref(),
            caller,
            code_taken,
            &self.policy,
        )?;

        // The existence check above is advisory; the constraint decides
        let created = self
            .store
            .create_purchase(purchase)
            .await
            .map_err(|err| match err.unique_field() {
                Some("purchases.code") => AdmissionError::DuplicateCode { code }.into(),
                _ => ServiceError::from(err),
            })?;

        info!(
            purchase_id = %created.id,
            code = created.code,
            reseller_id = %created.reseller_id,
            status = ?created.status,
            "Purchase admitted"
        );

        Ok(created)
    }

    /// Lists the caller's purchases of one month, with cashback.
    ///
    /// Unless both `year` and `month` are given, the configured default
    /// period is listed. A caller without a reseller gets `NotFound`.
    pub async fn list_purchases(
        &self,
        caller: &Identity,
        year: Option<&str>,
        month: Option<&str>,
    ) -> ServiceResult<Vec<PurchaseView>> {
        let reseller = self.profile(caller).await?;
        let period = Period::from_query(year, month, self.policy.default_period)?;
        let reseller_id = reseller.user_id.as_str();

        let total = self.store.sum_purchase_values(reseller_id, period).await?;
        let purchases = self.store.list_purchases(reseller_id, Some(period)).await?;

        debug!(
            reseller_id = %reseller_id,
            period = %period,
            total = %total,
            count = purchases.len(),
            "Listing purchases"
        );

        Ok(purchases
            .into_iter()
            .map(|purchase| PurchaseView::new(purchase, total))
            .collect())
    }

    /// Lists every purchase of the caller; each uses its own month's total.
    pub async fn list_all_purchases(&self, caller: &Identity) -> ServiceResult<Vec<PurchaseView>> {
        let reseller = self.profile(caller).await?;
        let reseller_id = reseller.user_id.as_str();
        let purchases = self.store.list_purchases(reseller_id, None).await?;

        let mut totals: BTreeMap<Period, Money> = BTreeMap::new();
        let mut views = Vec::with_capacity(purchases.len());

        for purchase in purchases {
            let period = Period::of(purchase.date);
            let total = match totals.get(&period) {
                Some(total) => *total,
                None => {
                    let total = self.store.sum_purchase_values(reseller_id, period).await?;
                    totals.insert(period, total);
                    total
                }
            };
            views.push(PurchaseView::new(purchase, total));
        }

        Ok(views)
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Registers a user and its reseller in one transaction.
    pub async fn register_reseller(&self, request: RegistrationRequest) -> ServiceResult<Reseller> {
        let valid = registration::validate(request, MIN_PASSWORD_LENGTH)?;

        let email = valid.email;
        let cpf = valid.reseller.cpf.digits().to_string();
        let password_hash = hash_in_background(valid.password).await?;

        let reseller = self
            .store
            .create_user_and_reseller(
                NewUser {
                    email: email.clone(),
                    password_hash,
                },
                valid.reseller,
            )
            .await
            .map_err(|err| match err.unique_field() {
                Some("users.email") => RegistrationError::DuplicateEmail { email }.into(),
                Some("resellers.cpf") => RegistrationError::DuplicateCpf { cpf }.into(),
                _ => ServiceError::from(err),
            })?;

        info!(user_id = %reseller.user_id, "Reseller registered");
        Ok(reseller)
    }

    /// Checks a login. Every failure looks the same to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let email = validate_email(email).map_err(|_| ServiceError::InvalidCredentials)?;

        let user = match self.store.find_user_by_email(&email).await? {
            Some(user) if user.is_active => user,
            Some(user) => {
                debug!(user_id = %user.id, "Login refused for inactive user");
                return Err(ServiceError::InvalidCredentials);
            }
            None => return Err(ServiceError::InvalidCredentials),
        };

        let password = password.to_string();
        let hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        if !verified {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// The caller's reseller profile.
    pub async fn profile(&self, caller: &Identity) -> ServiceResult<Reseller> {
        self.store
            .find_reseller_by_user(&caller.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Reseller", &caller.user_id))
    }

    /// Updates the caller's profile. Only the name may change.
    pub async fn update_profile(
        &self,
        caller: &Identity,
        update: ProfileUpdate,
    ) -> ServiceResult<Reseller> {
        // Blank values count as absent
        if update.cpf.as_deref().is_some_and(|cpf| !cpf.is_empty()) {
            return Err(ServiceError::immutable("cpf"));
        }

        let current = self.profile(caller).await?;

        match update.name {
            None => Ok(current),
            Some(name) => {
                let name = validate_name(&name)?;
                let updated = self
                    .store
                    .update_reseller_name(&caller.user_id, &name)
                    .await?;
                info!(user_id = %caller.user_id, "Reseller profile updated");
                Ok(updated)
            }
        }
    }

    /// Updates the caller's account. Only the password may change.
    pub async fn update_account(&self, caller: &Identity, update: AccountUpdate) -> ServiceResult<()> {
        if update.email.as_deref().is_some_and(|email| !email.is_empty()) {
            return Err(ServiceError::immutable("email"));
        }

        let user = self
            .store
            .find_user(&caller.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &caller.user_id))?;

        if let Some(password) = update.password {
            validate_password(&password, MIN_PASSWORD_LENGTH)?;
            let password_hash = hash_in_background(password).await?;
            self.store
                .update_user_password(&user.id, &password_hash)
                .await?;
            info!(user_id = %user.id, "Password changed");
        }

        Ok(())
    }
}

/// Runs argon2 off the async worker threads.
async fn hash_in_background(password: String) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))?
}

// =============================================================================
// Unit Tests
// =============================================================================
