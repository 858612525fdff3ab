//! Steps 0 through 19: identity, invite and verification reshuffles.

use super::{Step, is_truthy, or_empty_array, set_or_remove};
use crate::defaults::{
    DEFAULT_DAILY_PAYMENT_LIMIT_CUSD, FIAT_PROVIDERS, VERIFICATION_STATUS_STOPPED,
};
use crate::initial_state::exchange_history_initial_state;
use crate::migration::context::MigrationContext;
use serde_json::{Map, Value, json};
use valora_core::error::{Result, StateError};
use valora_core::state::{PersistedState, json_type_name};

pub(super) const STEPS: &[Step] = &[
    Step {
        to: 0,
        description: "Promote identity.e164NumberToAddress values to address lists",
        apply: promote_phone_addresses_to_lists,
    },
    Step {
        to: 1,
        description: "Expand invite.invitees map into invite records",
        apply: expand_invitees,
    },
    Step {
        to: 2,
        description: "Reset app.numberVerified",
        apply: reset_number_verified,
    },
    Step {
        to: 3,
        description: "Reset send.recentPayments, add account.hasMigratedToNewBip39",
        apply: reset_recent_payments,
    },
    Step {
        to: 4,
        description: "Reset identity.acceptedAttestationCodes",
        apply: reset_accepted_attestation_codes,
    },
    Step {
        to: 5,
        description: "Move payment requests to paymentRequest, rename web3.commentKey to dataEncryptionKey",
        apply: split_payment_requests,
    },
    Step {
        to: 6,
        description: "Derive invite.redeemComplete from web3.account",
        apply: derive_redeem_complete,
    },
    Step {
        to: 7,
        description: "Turn identity.addressToDisplayName values into {name, imageUrl}",
        apply: expand_display_names,
    },
    Step {
        to: 8,
        description: "Store fiatExchanges.lastUsedProvider as a provider key",
        apply: last_used_provider_to_key,
    },
    Step {
        to: 9,
        description: "Raise account.dailyLimitCusd to the default limit",
        apply: raise_daily_limit,
    },
    Step {
        to: 10,
        description: "Drop feeless verification fields from identity",
        apply: drop_feeless_verification,
    },
    Step {
        to: 11,
        description: "Drop retired cash-out flags from app",
        apply: drop_retired_cash_out_flags,
    },
    Step {
        to: 12,
        description: "Reset exchange.history",
        apply: reset_exchange_history,
    },
    Step {
        to: 13,
        description: "Move verification progress from identity to verify",
        apply: move_verification_to_verify,
    },
    Step {
        to: 14,
        description: "Add networkInfo.userLocationData",
        apply: add_user_location_data,
    },
    Step {
        to: 15,
        description: "Move verification progress back to identity",
        apply: move_verification_to_identity,
    },
    Step {
        to: 16,
        description: "Per-currency exchange rates and balances, reset escrow",
        apply: per_currency_rates_and_balances,
    },
    Step {
        to: 17,
        description: "Drop fiatExchanges.lastUsedProvider",
        apply: drop_last_used_provider,
    },
    Step {
        to: 18,
        description: "Nest walletConnect state under v2",
        apply: nest_wallet_connect_v2,
    },
    Step {
        to: 19,
        description: "Drop walletConnect.v2 left empty by step 18",
        apply: repair_empty_wallet_connect_v2,
    },
];

fn promote_phone_addresses_to_lists(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    let mapping = match state.remove_field("identity", "e164NumberToAddress") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(old)) => old
            .into_iter()
            .map(|(e164, address)| (e164, Value::Array(vec![address])))
            .collect(),
        Some(other) => {
            return Err(StateError::migration(
                0,
                format!(
                    "identity.e164NumberToAddress must be an object, found {}",
                    json_type_name(&other)
                ),
            ));
        }
    };
    state.set_field("identity", "e164NumberToAddress", Value::Object(mapping));
    Ok(())
}

fn expand_invitees(state: &mut PersistedState, context: &MigrationContext) -> Result<()> {
    let invitees = match state.remove_field("invite", "invitees") {
        None | Some(Value::Null) => Value::Array(Vec::new()),
        // Already a list of records
        Some(list @ Value::Array(_)) => list,
        Some(Value::Object(by_address)) => Value::Array(
            by_address
                .into_iter()
                .map(|(address, e164_number)| {
                    json!({
                        "timestamp": context.now_millis(),
                        "e164Number": e164_number,
                        "tempWalletAddress": address,
                        "tempWalletPrivateKey": "fakePrivateKey",
                        "tempWalletRedeemed": false,
                        "inviteCode": "fakeInviteCode",
                        "inviteLink": "fakeInviteLink",
                    })
                })
                .collect(),
        ),
        Some(other) => {
            return Err(StateError::migration(
                1,
                format!("invite.invitees must be an object, found {}", json_type_name(&other)),
            ));
        }
    };
    state.set_field("invite", "invitees", invitees);
    Ok(())
}

fn reset_number_verified(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.set_field("app", "numberVerified", false);
    Ok(())
}

fn reset_recent_payments(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.set_field("send", "recentPayments", json!([]));
    state.set_field("account", "hasMigratedToNewBip39", false);
    Ok(())
}

fn reset_accepted_attestation_codes(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    state.set_field("identity", "acceptedAttestationCodes", json!([]));
    Ok(())
}

fn split_payment_requests(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    let incoming = state.remove_field("account", "incomingPaymentRequests");
    let outgoing = state.remove_field("account", "outgoingPaymentRequests");
    state.set_slice(
        "paymentRequest",
        json!({
            "incomingPaymentRequests": or_empty_array(incoming),
            "outgoingPaymentRequests": or_empty_array(outgoing),
        }),
    );

    let comment_key = state.remove_field("web3", "commentKey");
    set_or_remove(state, "web3", "dataEncryptionKey", comment_key);
    Ok(())
}

fn derive_redeem_complete(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    let has_account = is_truthy(state.field("web3", "account"));
    state.set_field("invite", "redeemComplete", has_account);
    Ok(())
}

fn expand_display_names(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    let old = state.remove_field("identity", "addressToDisplayName");
    let expanded = match old {
        Some(v) if !is_truthy(Some(&v)) => Map::new(),
        None => Map::new(),
        Some(Value::Object(by_address)) => by_address
            .into_iter()
            .map(|(address, name)| (address, json!({ "name": name, "imageUrl": null })))
            .collect(),
        Some(other) => {
            return Err(StateError::migration(
                7,
                format!(
                    "identity.addressToDisplayName must be an object, found {}",
                    json_type_name(&other)
                ),
            ));
        }
    };
    state.set_field("identity", "addressToDisplayName", Value::Object(expanded));
    Ok(())
}

fn last_used_provider_to_key(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    let Some(provider) = state.field("fiatExchanges", "lastUsedProvider") else {
        return Ok(());
    };
    if !is_truthy(Some(provider)) {
        return Ok(());
    }
    let name = provider.get("name");
    if !is_truthy(name) {
        return Ok(());
    }
    let name = name.and_then(Value::as_str).ok_or_else(|| {
        StateError::migration(8, "fiatExchanges.lastUsedProvider.name must be a string")
    })?;

    let key = FIAT_PROVIDERS
        .iter()
        .find(|known| known.to_lowercase() == name.to_lowercase())
        .map(|known| Value::String(known.to_string()))
        .unwrap_or(Value::Null);
    state.set_field("fiatExchanges", "lastUsedProvider", key);
    Ok(())
}

fn raise_daily_limit(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    let current = state
        .field("account", "dailyLimitCusd")
        .and_then(|limit| match limit {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        });
    if current.is_some_and(|limit| limit >= DEFAULT_DAILY_PAYMENT_LIMIT_CUSD as f64) {
        return Ok(());
    }
    state.set_field("account", "dailyLimitCusd", DEFAULT_DAILY_PAYMENT_LIMIT_CUSD);
    Ok(())
}

fn drop_feeless_verification(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    state.remove_fields(
        "identity",
        &[
            "feelessAttestationCodes",
            "feelessProcessingInputCode",
            "feelessAcceptedAttestationCodes",
            "feelessNumCompleteAttestations",
            "feelessVerificationStatus",
            "verificationState",
            "feelessVerificationState",
            "feelessLastRevealAttempt",
        ],
    );
    Ok(())
}

fn drop_retired_cash_out_flags(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    state.remove_fields(
        "app",
        &["pontoEnabled", "kotaniEnabled", "bitfyUrl", "flowBtcUrl"],
    );
    Ok(())
}

fn reset_exchange_history(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    // Rate history was likely duplicated many times over
    state.set_field("exchange", "history", exchange_history_initial_state());
    Ok(())
}

fn move_verification_to_verify(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    let seen_nux = state
        .field("identity", "hasSeenVerificationNux")
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Bool(false));

    state.remove_fields(
        "identity",
        &[
            "attestationCodes",
            "acceptedAttestationCodes",
            "attestationInputStatus",
            "numCompleteAttestations",
            "verificationStatus",
            "hasSeenVerificationNux",
            "lastRevealAttempt",
        ],
    );
    state.remove_fields(
        "verify",
        &[
            "TEMPORARY_override_withoutVerification",
            "withoutRevealing",
            "retries",
        ],
    );
    state.set_field("verify", "seenVerificationNux", seen_nux);
    Ok(())
}

fn add_user_location_data(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.set_field(
        "networkInfo",
        "userLocationData",
        json!({
            "countryCodeAlpha2": null,
            "region": null,
            "ipAddress": null,
        }),
    );
    Ok(())
}

fn move_verification_to_identity(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    let seen_nux = state.field("verify", "seenVerificationNux").cloned();

    let identity = state.slice_mut("identity");
    identity.insert("attestationsCode".into(), json!([]));
    identity.insert("acceptedAttestationCodes".into(), json!([]));
    identity.insert(
        "attestationInputStatus".into(),
        json!(["Inputting", "Disabled", "Disabled"]),
    );
    identity.insert("numCompleteAttestations".into(), json!(0));
    identity.insert(
        "verificationStatus".into(),
        json!(VERIFICATION_STATUS_STOPPED),
    );
    identity.insert("lastRevealAttempt".into(), Value::Null);
    set_or_remove(state, "identity", "hasSeenVerificationNux", seen_nux);

    state.remove_fields(
        "verify",
        &[
            "seenVerificationNux",
            "revealStatuses",
            "attestationCodes",
            "lastRevealAttempt",
            "acceptedAttestationCodes",
            "attestationInputStatus",
            "TEMPORARY_override_withoutVerification",
        ],
    );
    state.set_field("verify", "withoutRevealing", false);
    state.set_field("verify", "retries", 0);
    Ok(())
}

fn per_currency_rates_and_balances(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    let mut exchange_rates = Map::new();
    if let Some(rate) = state.remove_field("localCurrency", "exchangeRate") {
        exchange_rates.insert("cUSD".into(), rate);
    }
    exchange_rates.insert("cEUR".into(), Value::Null);
    exchange_rates.insert("cGLD".into(), Value::Null);
    state.set_field("localCurrency", "exchangeRates", Value::Object(exchange_rates));

    let mut balances = Map::new();
    if let Some(balance) = state.remove_field("stableToken", "balance") {
        balances.insert("cUSD".into(), balance);
    }
    balances.insert("cEUR".into(), Value::Null);
    state.set_field("stableToken", "balances", Value::Object(balances));

    state.set_slice(
        "escrow",
        json!({
            "isReclaiming": false,
            "sentEscrowedPayments": [],
        }),
    );
    Ok(())
}

fn drop_last_used_provider(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    state.remove_fields("fiatExchanges", &["lastUsedProvider"]);
    Ok(())
}

fn nest_wallet_connect_v2(state: &mut PersistedState, _context: &MigrationContext) -> Result<()> {
    let mut v2 = match state.remove_slice("walletConnect") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    v2.remove("pairings");
    state.set_slice("walletConnect", json!({ "v2": v2 }));
    Ok(())
}

fn repair_empty_wallet_connect_v2(
    state: &mut PersistedState,
    _context: &MigrationContext,
) -> Result<()> {
    if state.pointer("/walletConnect/v2/sessions").is_none() {
        state.remove_field("walletConnect", "v2");
    }
    Ok(())
}
