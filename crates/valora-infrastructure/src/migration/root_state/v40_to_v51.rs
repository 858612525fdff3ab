//! Steps 40 through 51.
//!
//! Step 40 is the large cleanup of fields left behind by removed features.

use super::{Step, unchanged};
use crate::defaults::{
    DEFAULT_CELO_WITHDRAWAL_ENABLED_IN_EXCHANGE, DEFAULT_SKIP_PROFILE_PICTURE,
    finclusive_unsupported_states,
};
use crate::migration::context::MigrationContext;
use serde_json::{Map, Value, json};
use valora_core::error::Result;
use valora_core::state::PersistedState;

pub(super) const STEPS: &[Step] = &[
    Step {
        to: 40,
        description: "Drop fields and slices left behind by removed features",
        apply: drop_stale_fields,
    },
    Step {
        to: 41,
        description: "No persisted shape change",
        apply: unchanged,
    },
    Step {
        to: 42,
        description: "Add app.skipProfilePicture",
        apply: add_skip_profile_picture,
    },
    Step {
        to: 43,
        description: "No persisted shape change",
        apply: unchanged,
    },
    Step {
        to: 44,
        description: "Add finclusive region support flags",
        apply: add_finclusive_region_flags,
    },
    Step {
        to: 45,
        description: "No persisted shape change",
        apply: unchanged,
    },
    Step {
        to: 46,
        description: "Drop the cloudFunctionsApi slice",
        apply: drop_cloud_functions_api,
    },
    Step {
        to: 47,
        description: "Drop multi-token rollout flags from app",
        apply: drop_multi_token_flags,
    },
    Step {
        to: 48,
        description: "Reset supercharge reward fetching state",
        apply: reset_supercharge_rewards,
    },
    Step {
        to: 49,
        description: "Add supercharge dismissal flags to account",
        apply: add_supercharge_dismissals,
    },
    Step {
        to: 50,
        description: "Drop walletConnect.v2",
        apply: drop_wallet_connect_v2,
    },
    Step {
        to: 51,
        description: "Add app.celoWithdrawalEnabledInExchange",
        apply: add_celo_withdrawal_flag,
    },
];

/// Fields removed from each slice by step 40.
const STALE_FIELDS: &[(&str, &[&str])] = &[
    (
        "account",
        &[
            "pincodeSet",
            "isSettingPin",
            "backupDelayedTime",
            "socialBackupCompleted",
            "incomingPaymentRequests",
            "outgoingPaymentRequests",
            "dismissedInviteFriends",
            "dismissedEarnRewards",
        ],
    ),
    (
        "app",
        &[
            "loading",
            "inviteCodeEntered",
            "error",
            "dismissErrorAfter",
            "language",
            "doingBackupFlow",
            "message",
            "dismissMessageAfter",
            "lockWithPinEnabled",
            "rewardsPercent",
            "rewardsStartDate",
            "rewardsMax",
            "rewardsMin",
            "rewardsABTestThreshold",
            "shortVerificationCodesEnabled",
            "walletConnectEnabled",
        ],
    ),
    ("escrow", &["suggestedFee"]),
    ("exchange", &["exchangeRatePair"]),
    (
        "identity",
        &[
            "verificationFailed",
            "startedVerification",
            "isLoadingImportContacts",
            "contactMappingProgress",
            "attestationsCode",
        ],
    ),
    ("localCurrency", &["exchangeRate", "fetchRateFailed"]),
    ("recipients", &["recipientCache"]),
    ("send", &["recipientCache"]),
    ("stableToken", &["balance"]),
    ("tokens", &["lastSuccessfulFetch"]),
    ("web3", &["commentKey", "gasPriceLastUpdated", "contractKitReady"]),
];

fn drop_stale_fields(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.remove_slice("medianator");
    state.remove_slice("invite");

    for (slice, fields) in STALE_FIELDS {
        state.remove_fields(slice, fields);
    }

    let exchange = state.slice_mut("exchange");
    let mut history = match exchange.remove("history") {
        Some(Value::Object(history)) => history,
        _ => Map::new(),
    };
    history.remove("isLoading");
    exchange.insert("history".into(), Value::Object(history));

    let home = state.slice_mut("home");
    if home.get("notifications").is_some_and(Value::is_array) {
        home.insert("notifications".into(), json!({}));
    }

    if state.pointer("/walletConnect/v2/sessions").is_none() {
        state.remove_fields("walletConnect", &["v2"]);
    } else {
        state.slice_mut("walletConnect");
    }
    Ok(())
}

fn add_skip_profile_picture(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.set_field("app", "skipProfilePicture", DEFAULT_SKIP_PROFILE_PICTURE);
    Ok(())
}

fn add_finclusive_region_flags(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    state.set_field("account", "finclusiveRegionSupported", false);
    state.set_field(
        "app",
        "finclusiveUnsupportedStates",
        finclusive_unsupported_states(),
    );
    Ok(())
}

fn drop_cloud_functions_api(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.remove_slice("cloudFunctionsApi");
    Ok(())
}

fn drop_multi_token_flags(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.remove_fields(
        "app",
        &[
            "multiTokenUseSendFlow",
            "multiTokenUseUpdatedFeed",
            "multiTokenShowHomeBalances",
        ],
    );
    Ok(())
}

fn reset_supercharge_rewards(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    state.remove_slice("cloudFunctionsApi");
    let supercharge = state.slice_mut("supercharge");
    supercharge.insert("fetchAvailableRewardsLoading".into(), Value::Bool(false));
    supercharge.insert("fetchAvailableRewardsError".into(), Value::Bool(false));
    supercharge.insert("availableRewards".into(), json!([]));
    Ok(())
}

fn add_supercharge_dismissals(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    let account = state.slice_mut("account");
    account.insert("dismissedKeepSupercharging".into(), Value::Bool(false));
    account.insert("dismissedStartSupercharging".into(), Value::Bool(false));
    Ok(())
}

fn drop_wallet_connect_v2(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.remove_fields("walletConnect", &["v2"]);
    Ok(())
}

fn add_celo_withdrawal_flag(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.set_field(
        "app",
        "celoWithdrawalEnabledInExchange",
        DEFAULT_CELO_WITHDRAWAL_ENABLED_IN_EXCHANGE,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::root_state::apply_step;

    fn migrate(to: i32, value: Value) -> PersistedState {
        let state = PersistedState::from_value(value).unwrap();
        apply_step(to, state, &MigrationContext::current()).unwrap()
    }

    #[test]
    fn test_v40_drops_stale_fields() {
        let migrated = migrate(
            40,
            json!({
                "medianator": { "exchangeRate": "1" },
                "account": { "pincodeSet": true, "name": "Test" },
                "app": { "loading": false, "language": "en-US", "numberVerified": true },
                "exchange": {
                    "exchangeRatePair": null,
                    "history": { "isLoading": true, "granularity": 60 }
                },
                "home": { "notifications": [] },
                "web3": { "account": "0xabc", "commentKey": "0x1", "contractKitReady": true },
                "walletConnect": { "v2": { "pendingActions": [] } }
            }),
        );

        assert!(!migrated.contains_slice("medianator"));
        assert_eq!(migrated.slice_value("account"), Some(&json!({ "name": "Test" })));
        assert_eq!(migrated.slice_value("app"), Some(&json!({ "numberVerified": true })));
        assert_eq!(
            migrated.slice_value("exchange"),
            Some(&json!({ "history": { "granularity": 60 } }))
        );
        assert_eq!(migrated.field("home", "notifications"), Some(&json!({})));
        assert_eq!(migrated.slice_value("web3"), Some(&json!({ "account": "0xabc" })));
        assert_eq!(migrated.slice_value("walletConnect"), Some(&json!({})));
    }

    #[test]
    fn test_v40_keeps_notifications_map_and_live_v2_sessions() {
        let migrated = migrate(
            40,
            json!({
                "home": { "notifications": { "a": { "priority": 1 } } },
                "walletConnect": { "v2": { "sessions": [] } }
            }),
        );
        assert_eq!(
            migrated.field("home", "notifications"),
            Some(&json!({ "a": { "priority": 1 } }))
        );
        assert_eq!(
            migrated.slice_value("walletConnect"),
            Some(&json!({ "v2": { "sessions": [] } }))
        );
    }

    #[test]
    fn test_v44_adds_region_flags() {
        let migrated = migrate(44, json!({}));
        assert_eq!(
            migrated.field("account", "finclusiveRegionSupported"),
            Some(&json!(false))
        );
        assert_eq!(
            migrated.field("app", "finclusiveUnsupportedStates"),
            Some(&json!(["NY", "TX"]))
        );
    }

    #[test]
    fn test_v42_adds_skip_profile_picture() {
        let migrated = migrate(42, json!({ "app": { "skipVerification": true } }));
        assert_eq!(
            migrated.slice_value("app"),
            Some(&json!({ "skipVerification": true, "skipProfilePicture": false }))
        );
    }

    #[test]
    fn test_v46_drops_cloud_functions_api() {
        let migrated = migrate(
            46,
            json!({ "cloudFunctionsApi": { "loading": true }, "app": { "locked": false } }),
        );
        assert_eq!(migrated.into_value(), json!({ "app": { "locked": false } }));
    }

    #[test]
    fn test_v47_drops_multi_token_flags() {
        let migrated = migrate(
            47,
            json!({
                "app": {
                    "multiTokenUseSendFlow": true,
                    "multiTokenUseUpdatedFeed": true,
                    "multiTokenShowHomeBalances": false,
                    "superchargeApy": 12
                }
            }),
        );
        assert_eq!(migrated.slice_value("app"), Some(&json!({ "superchargeApy": 12 })));
    }

    #[test]
    fn test_v48_resets_supercharge_and_drops_cloud_functions() {
        let migrated = migrate(
            48,
            json!({ "cloudFunctionsApi": {}, "supercharge": { "loading": false } }),
        );
        assert!(!migrated.contains_slice("cloudFunctionsApi"));
        assert_eq!(
            migrated.slice_value("supercharge"),
            Some(&json!({
                "loading": false,
                "fetchAvailableRewardsLoading": false,
                "fetchAvailableRewardsError": false,
                "availableRewards": []
            }))
        );
    }

    #[test]
    fn test_v49_adds_supercharge_dismissals() {
        let migrated = migrate(49, json!({ "account": { "dismissedKeepSupercharging": true } }));
        assert_eq!(
            migrated.slice_value("account"),
            Some(&json!({
                "dismissedKeepSupercharging": false,
                "dismissedStartSupercharging": false
            }))
        );
    }

    #[test]
    fn test_v50_drops_v2_keeps_the_rest() {
        let migrated = migrate(
            50,
            json!({ "walletConnect": { "v2": { "sessions": [] }, "v1": { "sessions": [] } } }),
        );
        assert_eq!(
            migrated.slice_value("walletConnect"),
            Some(&json!({ "v1": { "sessions": [] } }))
        );
    }

    #[test]
    fn test_v51_enables_celo_withdrawal() {
        let migrated = migrate(51, json!({ "app": {} }));
        assert_eq!(
            migrated.field("app", "celoWithdrawalEnabledInExchange"),
            Some(&json!(true))
        );
    }
}
