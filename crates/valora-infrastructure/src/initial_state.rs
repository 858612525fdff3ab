//! State a fresh install starts with, at the latest schema version.
//!
//! Also the fallback every failed hydration resets to, and the base the
//! reconciler merges stored slices onto.

use crate::defaults::{
    DEFAULT_CELO_WITHDRAWAL_ENABLED_IN_EXCHANGE, DEFAULT_DAILY_PAYMENT_LIMIT_CUSD,
    DEFAULT_SENTRY_NETWORK_ERRORS, DEFAULT_SENTRY_TRACES_SAMPLE_RATE,
    DEFAULT_SHOW_PRICE_CHANGE_INDICATOR_IN_BALANCES, DEFAULT_SKIP_PROFILE_PICTURE,
    DEFAULT_SUPERCHARGE_APY, EXCHANGE_HISTORY_GRANULARITY, EXCHANGE_HISTORY_RANGE_MS,
    FINCLUSIVE_KYC_NOT_SUBMITTED, PAYMENT_DEEP_LINK_HANDLER_DISABLED,
    SUPERCHARGE_BUTTON_PILL_REWARDS, VERIFICATION_STATUS_STOPPED, finclusive_unsupported_states,
};
use crate::migration::ROOT_STATE_LATEST_VERSION;
use serde_json::{Value, json};
use valora_core::state::{PersistMeta, PersistedState};

/// Empty exchange rate history.
pub fn exchange_history_initial_state() -> Value {
    json!({
        "celoGoldExchangeRates": [],
        "aggregatedExchangeRates": [],
        "granularity": EXCHANGE_HISTORY_GRANULARITY,
        "range": EXCHANGE_HISTORY_RANGE_MS,
        "lastTimeUpdated": 0,
    })
}

/// The full initial tree, stamped `{version: latest, rehydrated: false}`.
pub fn initial_root_state() -> PersistedState {
    let mut state = PersistedState::new();
    for (name, slice) in initial_slices() {
        state.set_slice(name, slice);
    }
    state.set_meta(PersistMeta::new(ROOT_STATE_LATEST_VERSION));
    state
}

fn initial_slices() -> Vec<(&'static str, Value)> {
    vec![
        (
            "account",
            json!({
                "name": "",
                "e164PhoneNumber": null,
                "defaultCountryCode": null,
                "contactDetails": { "contactId": null, "thumbnailPath": null },
                "devModeActive": false,
                "devModeClickCount": 0,
                "photosNUXClicked": false,
                "pincodeType": "Unset",
                "accountCreationTime": 99999999999999_i64,
                "backupCompleted": false,
                "dismissedGetVerified": false,
                "dismissedGoldEducation": false,
                "promptFornoIfNeeded": false,
                "acceptedTerms": false,
                "retryVerificationWithForno": true,
                "hasMigratedToNewBip39": false,
                "choseToRestoreAccount": false,
                "dailyLimitCusd": DEFAULT_DAILY_PAYMENT_LIMIT_CUSD,
                "recoveringFromStoreWipe": false,
                "accountToRecoverFromStoreWipe": null,
                "hasLinkedBankAccount": false,
                "finclusiveKycStatus": FINCLUSIVE_KYC_NOT_SUBMITTED,
                "finclusiveRegionSupported": false,
                "dismissedKeepSupercharging": false,
                "dismissedStartSupercharging": false,
            }),
        ),
        (
            "app",
            json!({
                "loggedIn": false,
                "numberVerified": false,
                "analyticsEnabled": true,
                "requirePinOnAppOpen": false,
                "appState": "Active",
                "locked": false,
                "lastTimeBackgrounded": 0,
                "sessionId": "",
                "minVersion": null,
                "celoEducationUri": null,
                "activeScreen": "Main",
                "hideVerification": false,
                "showRaiseDailyLimitTarget": null,
                "walletConnectV1Enabled": false,
                "rampCashInButtonExpEnabled": false,
                "sentryTracesSampleRate": DEFAULT_SENTRY_TRACES_SAMPLE_RATE,
                "sentryNetworkErrors": DEFAULT_SENTRY_NETWORK_ERRORS,
                "superchargeButtonType": SUPERCHARGE_BUTTON_PILL_REWARDS,
                "dappListApiUrl": null,
                "biometryEnabled": false,
                "supportedBiometryType": null,
                "ranVerificationMigrationAt": null,
                "superchargeApy": DEFAULT_SUPERCHARGE_APY,
                "superchargeTokens": [],
                "maxNumRecentDapps": 0,
                "recentDapps": [],
                "showPriceChangeIndicatorInBalances": DEFAULT_SHOW_PRICE_CHANGE_INDICATOR_IN_BALANCES,
                "skipVerification": false,
                "paymentDeepLinkHandler": PAYMENT_DEEP_LINK_HANDLER_DISABLED,
                "dappsWebViewEnabled": false,
                "skipProfilePicture": DEFAULT_SKIP_PROFILE_PICTURE,
                "activeDapp": null,
                "finclusiveUnsupportedStates": finclusive_unsupported_states(),
                "celoWithdrawalEnabledInExchange": DEFAULT_CELO_WITHDRAWAL_ENABLED_IN_EXCHANGE,
            }),
        ),
        (
            "escrow",
            json!({ "isReclaiming": false, "sentEscrowedPayments": [] }),
        ),
        (
            "exchange",
            json!({
                "history": exchange_history_initial_state(),
                "tobinTax": "0",
                "isLoading": false,
            }),
        ),
        ("fiatExchanges", json!({ "txHashToProvider": {} })),
        (
            "geth",
            json!({
                "initialized": "NOT_YET",
                "connected": false,
                "gethStartedThisSession": false,
                "chainHead": null,
            }),
        ),
        (
            "goldToken",
            json!({ "balance": null, "educationCompleted": false, "lastFetch": null }),
        ),
        ("home", json!({ "loading": false, "notifications": {} })),
        (
            "i18n",
            json!({
                "language": null,
                "allowOtaTranslations": false,
                "otaTranslationsLastUpdate": 0,
                "otaTranslationsAppVersion": "0",
                "otaTranslationsLanguage": "",
            }),
        ),
        (
            "identity",
            json!({
                "attestationCodes": [],
                "acceptedAttestationCodes": [],
                "attestationInputStatus": ["Inputting", "Disabled", "Disabled"],
                "numCompleteAttestations": 0,
                "verificationStatus": VERIFICATION_STATUS_STOPPED,
                "hasSeenVerificationNux": false,
                "lastRevealAttempt": null,
                "addressToE164Number": {},
                "e164NumberToAddress": {},
                "e164NumberToSalt": {},
                "addressToDataEncryptionKey": {},
                "addressToDisplayName": {},
                "askedContactsPermission": false,
                "importContactsProgress": { "status": 0, "current": 0, "total": 0 },
                "matchedContacts": {},
                "secureSendPhoneNumberMapping": {},
            }),
        ),
        ("imports", json!({ "isImportingWallet": false })),
        (
            "localCurrency",
            json!({
                "isLoading": false,
                "preferredCurrencyCode": null,
                "fetchedCurrencyCode": null,
                "exchangeRates": { "cUSD": null, "cEUR": null, "cGLD": null },
            }),
        ),
        (
            "networkInfo",
            json!({
                "connected": true,
                "rehydrated": true,
                "userLocationData": {
                    "countryCodeAlpha2": null,
                    "region": null,
                    "ipAddress": null,
                },
            }),
        ),
        (
            "paymentRequest",
            json!({ "incomingPaymentRequests": [], "outgoingPaymentRequests": [] }),
        ),
        ("recipients", json!({ "phoneRecipientCache": {} })),
        (
            "send",
            json!({ "isSending": false, "recentRecipients": [], "recentPayments": [] }),
        ),
        (
            "stableToken",
            json!({
                "balances": { "cUSD": null, "cEUR": null },
                "educationCompleted": false,
                "lastFetch": null,
            }),
        ),
        (
            "supercharge",
            json!({
                "loading": false,
                "error": false,
                "fetchAvailableRewardsLoading": false,
                "fetchAvailableRewardsError": false,
                "availableRewards": [],
            }),
        ),
        (
            "tokens",
            json!({ "tokenBalances": {}, "loading": false, "error": false }),
        ),
        (
            "transactions",
            json!({
                "standbyTransactions": [],
                "knownFeedTransactions": {},
                "recentTxRecipientsCache": {},
                "inviteTransactions": {},
            }),
        ),
        ("verify", json!({ "withoutRevealing": false, "retries": 0 })),
        (
            "walletConnect",
            json!({ "pendingActions": [], "sessions": [], "pendingSessions": [] }),
        ),
        (
            "web3",
            json!({
                "syncProgress": { "startingBlock": 0, "currentBlock": 0, "highestBlock": 0 },
                "latestBlockNumber": 0,
                "account": null,
                "accountInWeb3Keystore": null,
                "mtwAddress": null,
                "dataEncryptionKey": null,
                "isDekRegistered": false,
                "fornoMode": true,
                "hadFornoDisabled": false,
            }),
        ),
    ]
}
