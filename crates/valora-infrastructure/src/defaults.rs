//! Default values shared by the migration steps and the initial state.
//!
//! Several steps seed a field with the remote-config default of the day; the
//! same default is what a fresh install starts with.

/// Daily send limit in cUSD.
pub const DEFAULT_DAILY_PAYMENT_LIMIT_CUSD: i64 = 1000;

pub const DEFAULT_SENTRY_TRACES_SAMPLE_RATE: f64 = 0.2;

pub const DEFAULT_SENTRY_NETWORK_ERRORS: &[&str] =
    &["network request failed", "The network connection was lost"];

/// `SuperchargeButtonType.PillRewards`
pub const SUPERCHARGE_BUTTON_PILL_REWARDS: &str = "PillRewards";

pub const DEFAULT_SUPERCHARGE_APY: i64 = 12;

pub const DEFAULT_SHOW_PRICE_CHANGE_INDICATOR_IN_BALANCES: bool = false;

pub const DEFAULT_SKIP_PROFILE_PICTURE: bool = false;

/// Comma separated, as served by remote config.
pub const DEFAULT_FINCLUSIVE_UNSUPPORTED_STATES: &str = "NY,TX";

pub const DEFAULT_CELO_WITHDRAWAL_ENABLED_IN_EXCHANGE: bool = true;

/// `PaymentDeepLinkHandler.Disabled`
pub const PAYMENT_DEEP_LINK_HANDLER_DISABLED: &str = "";

/// `FinclusiveKycStatus.NotSubmitted`
pub const FINCLUSIVE_KYC_NOT_SUBMITTED: i64 = 0;

/// `VerificationStatus.Stopped`
pub const VERIFICATION_STATUS_STOPPED: i64 = 0;

/// Fiat providers, by their stored identifier.
pub const FIAT_PROVIDERS: &[&str] = &["Moonpay", "Ramp", "Simplex", "Transak", "Xanpool"];

/// Exchange rate history granularity, in minutes.
pub const EXCHANGE_HISTORY_GRANULARITY: i64 = 60;

/// Exchange rate history range: 30 days in milliseconds.
pub const EXCHANGE_HISTORY_RANGE_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Splits the remote-config state list into its entries.
pub fn finclusive_unsupported_states() -> Vec<String> {
    DEFAULT_FINCLUSIVE_UNSUPPORTED_STATES
        .split(',')
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_states_split() {
        assert_eq!(finclusive_unsupported_states(), vec!["NY", "TX"]);
    }

    #[test]
    fn test_history_range_is_thirty_days() {
        assert_eq!(EXCHANGE_HISTORY_RANGE_MS, 2_592_000_000);
    }
}
