//! Steps 20 through 39: mostly new app flags seeded from remote-config defaults.

use super::{Step, set_or_remove, unchanged};
use crate::defaults::{
    DEFAULT_SENTRY_NETWORK_ERRORS, DEFAULT_SENTRY_TRACES_SAMPLE_RATE,
    DEFAULT_SHOW_PRICE_CHANGE_INDICATOR_IN_BALANCES, DEFAULT_SUPERCHARGE_APY,
    FINCLUSIVE_KYC_NOT_SUBMITTED, PAYMENT_DEEP_LINK_HANDLER_DISABLED,
    SUPERCHARGE_BUTTON_PILL_REWARDS,
};
use crate::migration::context::MigrationContext;
use serde_json::{Value, json};
use valora_core::error::Result;
use valora_core::state::PersistedState;

pub(super) const STEPS: &[Step] = &[
    Step {
        to: 20,
        description: "No persisted shape change",
        apply: unchanged,
    },
    Step {
        to: 21,
        description: "No persisted shape change",
        apply: unchanged,
    },
    Step {
        to: 22,
        description: "Move app.language into a new i18n slice",
        apply: move_language_to_i18n,
    },
    Step {
        to: 23,
        description: "No persisted shape change",
        apply: unchanged,
    },
    Step {
        to: 24,
        description: "Drop the invite slice",
        apply: drop_invite,
    },
    Step {
        to: 25,
        description: "Add app.sentryTracesSampleRate",
        apply: add_sentry_traces_sample_rate,
    },
    Step {
        to: 26,
        description: "Add app.rampCashInButtonExpEnabled",
        apply: add_ramp_cash_in_flag,
    },
    Step {
        to: 27,
        description: "Add app.superchargeButtonType",
        apply: add_supercharge_button_type,
    },
    Step {
        to: 28,
        description: "Add app.dappListApiUrl",
        apply: add_dapp_list_api_url,
    },
    Step {
        to: 29,
        description: "Force forno mode, remember whether it was disabled",
        apply: force_forno_mode,
    },
    Step {
        to: 30,
        description: "Add app.sentryNetworkErrors",
        apply: add_sentry_network_errors,
    },
    Step {
        to: 31,
        description: "Add biometry flags, drop account.isSettingPin",
        apply: add_biometry_flags,
    },
    Step {
        to: 32,
        description: "Add account.hasLinkedBankAccount",
        apply: add_linked_bank_account,
    },
    Step {
        to: 33,
        description: "Add app.ranVerificationMigrationAt",
        apply: add_ran_verification_migration_at,
    },
    Step {
        to: 34,
        description: "Replace rewards settings with supercharge settings",
        apply: replace_rewards_with_supercharge,
    },
    Step {
        to: 35,
        description: "No persisted shape change",
        apply: unchanged,
    },
    Step {
        to: 36,
        description: "Add finclusive KYC status and recent dapps",
        apply: add_kyc_status_and_recent_dapps,
    },
    Step {
        to: 37,
        description: "Add app.showPriceChangeIndicatorInBalances",
        apply: add_price_change_indicator,
    },
    Step {
        to: 38,
        description: "Add app.skipVerification",
        apply: add_skip_verification,
    },
    Step {
        to: 39,
        description: "Add app.paymentDeepLinkHandler",
        apply: add_payment_deep_link_handler,
    },
];

fn move_language_to_i18n(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    let language = state.remove_field("app", "language");

    state.set_slice(
        "i18n",
        json!({
            "allowOtaTranslations": false,
            "otaTranslationsLastUpdate": 0,
            "otaTranslationsAppVersion": "0",
            "otaTranslationsLanguage": "",
        }),
    );
    set_or_remove(state, "i18n", "language", language);
    Ok(())
}

fn drop_invite(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.remove_slice("invite");
    Ok(())
}

fn add_sentry_traces_sample_rate(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    state.set_field(
        "app",
        "sentryTracesSampleRate",
        DEFAULT_SENTRY_TRACES_SAMPLE_RATE,
    );
    Ok(())
}

fn add_ramp_cash_in_flag(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.set_field("app", "rampCashInButtonExpEnabled", false);
    Ok(())
}

fn add_supercharge_button_type(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    state.set_field("app", "superchargeButtonType", SUPERCHARGE_BUTTON_PILL_REWARDS);
    Ok(())
}

fn add_dapp_list_api_url(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.set_field("app", "dappListApiUrl", Value::Null);
    Ok(())
}

fn force_forno_mode(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    // Strict comparison: an absent flag does not count as disabled
    let had_forno_disabled = state.field("web3", "fornoMode") == Some(&Value::Bool(false));

    let web3 = state.slice_mut("web3");
    web3.insert("fornoMode".into(), Value::Bool(true));
    web3.insert("hadFornoDisabled".into(), Value::Bool(had_forno_disabled));
    Ok(())
}

fn add_sentry_network_errors(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    state.set_field("app", "sentryNetworkErrors", json!(DEFAULT_SENTRY_NETWORK_ERRORS));
    Ok(())
}

fn add_biometry_flags(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    let app = state.slice_mut("app");
    app.insert("biometryEnabled".into(), Value::Bool(false));
    app.insert("supportedBiometryType".into(), Value::Null);
    state.remove_fields("account", &["isSettingPin"]);
    Ok(())
}

fn add_linked_bank_account(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.set_field("account", "hasLinkedBankAccount", false);
    Ok(())
}

fn add_ran_verification_migration_at(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    state.set_field("app", "ranVerificationMigrationAt", Value::Null);
    Ok(())
}

fn replace_rewards_with_supercharge(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    let app = state.slice_mut("app");
    app.insert("superchargeApy".into(), json!(DEFAULT_SUPERCHARGE_APY));
    app.insert("superchargeTokens".into(), json!([]));
    for retired in [
        "rewardsPercent",
        "rewardsStartDate",
        "rewardsMax",
        "rewardsMin",
        "rewardsABTestThreshold",
    ] {
        app.remove(retired);
    }
    Ok(())
}

fn add_kyc_status_and_recent_dapps(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    state.set_field("account", "finclusiveKycStatus", FINCLUSIVE_KYC_NOT_SUBMITTED);
    let app = state.slice_mut("app");
    app.insert("maxNumRecentDapps".into(), json!(0));
    app.insert("recentDapps".into(), json!([]));
    Ok(())
}

fn add_price_change_indicator(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    state.set_field(
        "app",
        "showPriceChangeIndicatorInBalances",
        DEFAULT_SHOW_PRICE_CHANGE_INDICATOR_IN_BALANCES,
    );
    Ok(())
}

fn add_skip_verification(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.set_field("app", "skipVerification", false);
    Ok(())
}

fn add_payment_deep_link_handler(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    state.set_field(
        "app",
        "paymentDeepLinkHandler",
        PAYMENT_DEEP_LINK_HANDLER_DISABLED,
    );
    Ok(())
}
