//! The key catalog: every configurable key known to the platform.
//!
//! The catalog is process-wide, immutable data. Each [`ConfigurationKey`]
//! variant carries a static descriptor (storage token, category, value
//! kind, minimum level, visibility flags) resolved through a compile-time
//! `match`, so there is no runtime registration step and no global
//! mutable state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;
use crate::path::PathLevel;

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;

/// Value kind of a configuration key.
///
/// Boolean keys have three-state semantics on write: a blank value means
/// "unset" and removes the stored row instead of storing `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Text,
    Boolean,
}

/// Semantic group a key belongs to.
///
/// Grouped views map each category to the ordered list of entries in it.
/// The derived `Ord` keeps view output deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SettingCategory {
    General,
    Mail,
    Invoice,
    Payment,
    PaymentStripe,
    PaymentPaypal,
    PaymentOffline,
    CheckInStation,
}

/// Static metadata for a single catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct KeyDescriptor {
    /// Storage token, also the wire identifier used by API layers.
    pub token: &'static str,
    /// Human readable description, stamped into newly inserted rows.
    pub description: &'static str,
    pub category: SettingCategory,
    pub component_type: ComponentType,
    /// Broadest level at which the key may be set. The key may also be
    /// overridden at any more specific level.
    pub minimum_level: PathLevel,
    /// Internal keys never appear in any view.
    pub internal: bool,
    /// Whether the key is shown to non-admin callers.
    pub visible: bool,
}

const fn descriptor(
    token: &'static str,
    description: &'static str,
    category: SettingCategory,
    component_type: ComponentType,
    minimum_level: PathLevel,
    internal: bool,
    visible: bool,
) -> KeyDescriptor {
    KeyDescriptor {
        token,
        description,
        category,
        component_type,
        minimum_level,
        internal,
        visible,
    }
}

/// A key in the configuration catalog.
///
/// # Examples
///
/// ```
/// use settings_manager::{ConfigurationKey, PathLevel};
///
/// let key = ConfigurationKey::SmtpHost;
/// assert_eq!(key.value(), "SMTP_HOST");
/// assert!(key.supports(PathLevel::Organization));
/// assert_eq!("SMTP_HOST".parse::<ConfigurationKey>().unwrap(), key);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigurationKey {
    // General
    BaseUrl,
    SupportedLanguages,
    MapsClientApiKey,
    RecaptchaApiKey,
    EnableCaptchaForOfflinePayments,
    PartialReservationIdLength,
    MaxAmountOfTicketsByReservation,
    AssignmentReminderStart,
    EnablePreRegistration,
    EnableWaitingQueue,
    AllowFreeTicketsCancellation,
    CheckInStationEnabled,
    OfflineCheckInEnabled,
    // Mail
    SmtpHost,
    SmtpPort,
    SmtpUsername,
    SmtpPassword,
    MailReplyTo,
    MailFooter,
    // Invoice
    InvoiceAddress,
    VatNr,
    InvoiceNumberPattern,
    // Payment
    PaymentMethodsBlacklist,
    OfflinePaymentDays,
    BankAccountNr,
    BankAccountOwner,
    StripeSecretKey,
    StripePublicKey,
    PaypalClientId,
    PaypalClientSecret,
    // Check-in station
    CheckInStationSslCert,
    CheckInStationLabelLayout,
    LabelPrintingEnabled,
}

impl ConfigurationKey {
    /// Every key in the catalog, in declaration order.
    pub const ALL: [ConfigurationKey; 33] = [
        Self::BaseUrl,
        Self::SupportedLanguages,
        Self::MapsClientApiKey,
        Self::RecaptchaApiKey,
        Self::EnableCaptchaForOfflinePayments,
        Self::PartialReservationIdLength,
        Self::MaxAmountOfTicketsByReservation,
        Self::AssignmentReminderStart,
        Self::EnablePreRegistration,
        Self::EnableWaitingQueue,
        Self::AllowFreeTicketsCancellation,
        Self::CheckInStationEnabled,
        Self::OfflineCheckInEnabled,
        Self::SmtpHost,
        Self::SmtpPort,
        Self::SmtpUsername,
        Self::SmtpPassword,
        Self::MailReplyTo,
        Self::MailFooter,
        Self::InvoiceAddress,
        Self::VatNr,
        Self::InvoiceNumberPattern,
        Self::PaymentMethodsBlacklist,
        Self::OfflinePaymentDays,
        Self::BankAccountNr,
        Self::BankAccountOwner,
        Self::StripeSecretKey,
        Self::StripePublicKey,
        Self::PaypalClientId,
        Self::PaypalClientSecret,
        Self::CheckInStationSslCert,
        Self::CheckInStationLabelLayout,
        Self::LabelPrintingEnabled,
    ];

    /// The static descriptor for this key.
    pub const fn descriptor(&self) -> KeyDescriptor {
        use ComponentType::{Boolean, Text};
        use PathLevel::{Event, Organization, System, TicketCategory};
        use SettingCategory::*;

        match self {
            Self::BaseUrl => descriptor(
                "BASE_URL",
                "Base application URL",
                General,
                Text,
                System,
                false,
                false,
            ),
            Self::SupportedLanguages => descriptor(
                "SUPPORTED_LANGUAGES",
                "Languages offered on public pages",
                General,
                Text,
                System,
                false,
                false,
            ),
            Self::MapsClientApiKey => descriptor(
                "MAPS_CLIENT_API_KEY",
                "Maps API key used to render venue locations",
                General,
                Text,
                System,
                false,
                false,
            ),
            Self::RecaptchaApiKey => descriptor(
                "RECAPTCHA_API_KEY",
                "CAPTCHA verification API key",
                General,
                Text,
                System,
                false,
                false,
            ),
            Self::EnableCaptchaForOfflinePayments => descriptor(
                "ENABLE_CAPTCHA_FOR_OFFLINE_PAYMENTS",
                "Require a CAPTCHA when reserving with offline payment",
                General,
                Boolean,
                System,
                false,
                true,
            ),
            Self::PartialReservationIdLength => descriptor(
                "PARTIAL_RESERVATION_ID_LENGTH",
                "Length of the short reservation identifier",
                General,
                Text,
                System,
                false,
                false,
            ),
            Self::MaxAmountOfTicketsByReservation => descriptor(
                "MAX_AMOUNT_OF_TICKETS_BY_RESERVATION",
                "Maximum number of tickets in a single reservation",
                General,
                Text,
                Organization,
                false,
                true,
            ),
            Self::AssignmentReminderStart => descriptor(
                "ASSIGNMENT_REMINDER_START",
                "Days before the event when assignment reminders start",
                General,
                Text,
                Event,
                false,
                true,
            ),
            Self::EnablePreRegistration => descriptor(
                "ENABLE_PRE_REGISTRATION",
                "Enable pre-registration before tickets go on sale",
                General,
                Boolean,
                Event,
                false,
                true,
            ),
            Self::EnableWaitingQueue => descriptor(
                "ENABLE_WAITING_QUEUE",
                "Enable the waiting queue once the event is sold out",
                General,
                Boolean,
                Event,
                false,
                true,
            ),
            Self::AllowFreeTicketsCancellation => descriptor(
                "ALLOW_FREE_TICKETS_CANCELLATION",
                "Allow holders of free tickets to cancel them",
                General,
                Boolean,
                TicketCategory,
                false,
                true,
            ),
            Self::CheckInStationEnabled => descriptor(
                "CHECK_IN_STATION_ENABLED",
                "Enable the check-in station integration",
                General,
                Boolean,
                Event,
                false,
                true,
            ),
            Self::OfflineCheckInEnabled => descriptor(
                "OFFLINE_CHECK_IN_ENABLED",
                "Allow check-in while the station is offline",
                General,
                Boolean,
                Event,
                false,
                true,
            ),
            Self::SmtpHost => descriptor(
                "SMTP_HOST",
                "SMTP server host",
                Mail,
                Text,
                System,
                false,
                true,
            ),
            Self::SmtpPort => descriptor(
                "SMTP_PORT",
                "SMTP server port",
                Mail,
                Text,
                System,
                false,
                true,
            ),
            Self::SmtpUsername => descriptor(
                "SMTP_USERNAME",
                "Username for the SMTP server",
                Mail,
                Text,
                System,
                false,
                false,
            ),
            Self::SmtpPassword => descriptor(
                "SMTP_PASSWORD",
                "Password for the SMTP server",
                Mail,
                Text,
                System,
                false,
                false,
            ),
            Self::MailReplyTo => descriptor(
                "MAIL_REPLY_TO",
                "Reply-to address for outgoing mail",
                Mail,
                Text,
                Organization,
                false,
                true,
            ),
            Self::MailFooter => descriptor(
                "MAIL_FOOTER",
                "Footer appended to outgoing mail",
                Mail,
                Text,
                Organization,
                false,
                true,
            ),
            Self::InvoiceAddress => descriptor(
                "INVOICE_ADDRESS",
                "Address printed on invoices",
                Invoice,
                Text,
                Organization,
                false,
                true,
            ),
            Self::VatNr => descriptor(
                "VAT_NR",
                "VAT number printed on invoices",
                Invoice,
                Text,
                Organization,
                false,
                true,
            ),
            Self::InvoiceNumberPattern => descriptor(
                "INVOICE_NUMBER_PATTERN",
                "Pattern used to generate invoice numbers",
                Invoice,
                Text,
                Organization,
                false,
                true,
            ),
            Self::PaymentMethodsBlacklist => descriptor(
                "PAYMENT_METHODS_BLACKLIST",
                "Comma separated list of payment methods disabled for the organization",
                Payment,
                Text,
                Organization,
                true,
                false,
            ),
            Self::OfflinePaymentDays => descriptor(
                "OFFLINE_PAYMENT_DAYS",
                "Days an offline payment may stay pending",
                PaymentOffline,
                Text,
                Event,
                false,
                true,
            ),
            Self::BankAccountNr => descriptor(
                "BANK_ACCOUNT_NR",
                "Bank account number shown for offline payments",
                PaymentOffline,
                Text,
                Organization,
                false,
                true,
            ),
            Self::BankAccountOwner => descriptor(
                "BANK_ACCOUNT_OWNER",
                "Bank account owner shown for offline payments",
                PaymentOffline,
                Text,
                Organization,
                false,
                true,
            ),
            Self::StripeSecretKey => descriptor(
                "STRIPE_SECRET_KEY",
                "Stripe secret API key",
                PaymentStripe,
                Text,
                Organization,
                false,
                true,
            ),
            Self::StripePublicKey => descriptor(
                "STRIPE_PUBLIC_KEY",
                "Stripe publishable API key",
                PaymentStripe,
                Text,
                Organization,
                false,
                true,
            ),
            Self::PaypalClientId => descriptor(
                "PAYPAL_CLIENT_ID",
                "PayPal REST client id",
                PaymentPaypal,
                Text,
                Organization,
                false,
                true,
            ),
            Self::PaypalClientSecret => descriptor(
                "PAYPAL_CLIENT_SECRET",
                "PayPal REST client secret",
                PaymentPaypal,
                Text,
                Organization,
                false,
                true,
            ),
            Self::CheckInStationSslCert => descriptor(
                "CHECK_IN_STATION_SSL_CERT",
                "SSL certificate accepted by the check-in station",
                CheckInStation,
                Text,
                Event,
                false,
                true,
            ),
            Self::CheckInStationLabelLayout => descriptor(
                "CHECK_IN_STATION_LABEL_LAYOUT",
                "Badge label layout used by the check-in station",
                CheckInStation,
                Text,
                Event,
                false,
                true,
            ),
            Self::LabelPrintingEnabled => descriptor(
                "LABEL_PRINTING_ENABLED",
                "Print badge labels at check-in",
                CheckInStation,
                Boolean,
                Event,
                false,
                true,
            ),
        }
    }

    /// Storage token of the key.
    pub const fn value(&self) -> &'static str {
        self.descriptor().token
    }

    pub const fn description(&self) -> &'static str {
        self.descriptor().description
    }

    pub const fn category(&self) -> SettingCategory {
        self.descriptor().category
    }

    pub const fn component_type(&self) -> ComponentType {
        self.descriptor().component_type
    }

    pub const fn minimum_level(&self) -> PathLevel {
        self.descriptor().minimum_level
    }

    /// Internal keys are read and written by the platform itself and are
    /// excluded from every view, admin or not.
    pub const fn is_internal(&self) -> bool {
        self.descriptor().internal
    }

    /// Whether non-admin callers may see this key.
    pub const fn is_user_visible(&self) -> bool {
        self.descriptor().visible
    }

    pub const fn is_boolean(&self) -> bool {
        matches!(self.component_type(), ComponentType::Boolean)
    }

    /// True when the key may be set at `level`, i.e. `level` is at least
    /// as specific as the key's minimum level.
    pub fn supports(&self, level: PathLevel) -> bool {
        self.minimum_level() <= level
    }

    /// Non-internal keys settable at `level`, in catalog order.
    pub fn settable_at(level: PathLevel) -> Vec<ConfigurationKey> {
        Self::ALL
            .iter()
            .copied()
            .filter(|k| !k.is_internal() && k.supports(level))
            .collect()
    }

    /// All non-internal keys; the slice shown in the system view.
    pub fn ui_visible() -> Vec<ConfigurationKey> {
        Self::ALL
            .iter()
            .copied()
            .filter(|k| !k.is_internal())
            .collect()
    }

    /// Keys that must be configured before the platform is usable.
    pub const fn basic() -> [ConfigurationKey; 3] {
        [Self::BaseUrl, Self::MapsClientApiKey, Self::SmtpHost]
    }
}

impl FromStr for ConfigurationKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.value() == s)
            .ok_or_else(|| SettingsError::UnknownKey { key: s.to_string() })
    }
}

impl std::fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}
