//! Role- and feature-driven view filtering.
//!
//! Applied after the merge step: hides stored rows a non-admin must not
//! see, removes the check-in category when its enabling flags are off,
//! and drops categories owned by payment methods blacklisted for an
//! organization.

use crate::keys::SettingCategory;
use crate::path::{ConfigurationEntry, PathLevel};
use crate::resolution::SettingsView;

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;

/// Whether a stored row may appear in a view at `level` for this caller.
///
/// Admins see every row. Non-admins see a row only when its key is
/// flagged visible and is actually settable at the view's level. Rows
/// with unknown key tokens are rejected here and reported by the
/// grouping step.
pub fn retains_entry(is_admin: bool, level: PathLevel, entry: &ConfigurationEntry) -> bool {
    if is_admin {
        return true;
    }
    entry
        .configuration_key()
        .is_some_and(|key| key.is_user_visible() && key.supports(level))
}

/// A payment method selectable by organizers, with the setting
/// categories that belong exclusively to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Stripe,
    Paypal,
    Offline,
    OnSite,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [Self::Stripe, Self::Paypal, Self::Offline, Self::OnSite];

    /// Token used in the stored blacklist.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Stripe => "STRIPE",
            Self::Paypal => "PAYPAL",
            Self::Offline => "OFFLINE",
            Self::OnSite => "ON_SITE",
        }
    }

    /// Setting categories that exist only for this method.
    pub const fn setting_categories(&self) -> &'static [SettingCategory] {
        match self {
            Self::Stripe => &[SettingCategory::PaymentStripe],
            Self::Paypal => &[SettingCategory::PaymentPaypal],
            Self::Offline => &[SettingCategory::PaymentOffline],
            Self::OnSite => &[],
        }
    }
}

/// Setting categories to hide given a stored blacklist value.
///
/// The blacklist is a comma separated list of method tokens; membership
/// is an exact, case-insensitive comparison per element, so a token that
/// happens to be a substring of another can never match by accident.
pub fn blacklisted_categories(blacklist: &str) -> Vec<SettingCategory> {
    let tokens: Vec<&str> = blacklist
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();
    PaymentMethod::ALL
        .iter()
        .filter(|method| tokens.iter().any(|t| t.eq_ignore_ascii_case(method.key())))
        .flat_map(|method| method.setting_categories().iter().copied())
        .collect()
}

/// Removes the given categories from a view.
pub fn remove_categories(mut view: SettingsView, categories: &[SettingCategory]) -> SettingsView {
    for category in categories {
        view.remove(category);
    }
    view
}

/// Removes the check-in station category unless the integration is
/// enabled for the event in question.
pub fn remove_check_in_settings_if_disabled(enabled: bool, view: SettingsView) -> SettingsView {
    if enabled {
        view
    } else {
        remove_categories(view, &[SettingCategory::CheckInStation])
    }
}
