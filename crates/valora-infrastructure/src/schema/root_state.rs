//! Shape of the root state at the latest version.
//!
//! Closed at the root: an unknown slice means the tree did not come out of
//! the migration chain. Each slice stays open so reducer-owned extras survive,
//! but the fields below must be present with the listed types.

use serde_json::{Value, json};

fn of(json_type: &str) -> Value {
    json!({ "type": json_type })
}

fn nullable(json_type: &str) -> Value {
    json!({ "type": [json_type, "null"] })
}

fn strings() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

fn map_of(values: Value) -> Value {
    json!({ "type": "object", "additionalProperties": values })
}

/// Object requiring every listed property except `optional`.
fn object_except(properties: Value, optional: &[&str]) -> Value {
    let required: Vec<String> = properties
        .as_object()
        .into_iter()
        .flat_map(|props| props.keys())
        .filter(|key| !optional.contains(&key.as_str()))
        .cloned()
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

fn object(properties: Value) -> Value {
    object_except(properties, &[])
}

fn account() -> Value {
    object(json!({
        "name": nullable("string"),
        "e164PhoneNumber": nullable("string"),
        "defaultCountryCode": nullable("string"),
        "contactDetails": of("object"),
        "devModeActive": of("boolean"),
        "pincodeType": { "enum": ["Unset", "PhoneAuth", "CustomPin"] },
        "accountCreationTime": of("number"),
        "backupCompleted": of("boolean"),
        "acceptedTerms": of("boolean"),
        "hasMigratedToNewBip39": of("boolean"),
        "choseToRestoreAccount": of("boolean"),
        "dailyLimitCusd": of("number"),
        "recoveringFromStoreWipe": of("boolean"),
        "accountToRecoverFromStoreWipe": nullable("string"),
        "hasLinkedBankAccount": of("boolean"),
        "finclusiveKycStatus": { "enum": [0, 1, 2, 3, 4] },
        "finclusiveRegionSupported": of("boolean"),
        "dismissedKeepSupercharging": of("boolean"),
        "dismissedStartSupercharging": of("boolean")
    }))
}

fn app() -> Value {
    object(json!({
        "loggedIn": of("boolean"),
        "numberVerified": of("boolean"),
        "analyticsEnabled": of("boolean"),
        "appState": { "enum": ["Active", "Background", "Inactive"] },
        "locked": of("boolean"),
        "lastTimeBackgrounded": of("number"),
        "rampCashInButtonExpEnabled": of("boolean"),
        "sentryTracesSampleRate": of("number"),
        "sentryNetworkErrors": strings(),
        "superchargeButtonType": of("string"),
        "dappListApiUrl": nullable("string"),
        "biometryEnabled": of("boolean"),
        "supportedBiometryType": nullable("string"),
        "ranVerificationMigrationAt": nullable("number"),
        "superchargeApy": of("number"),
        "superchargeTokens": of("array"),
        "maxNumRecentDapps": of("integer"),
        "recentDapps": of("array"),
        "showPriceChangeIndicatorInBalances": of("boolean"),
        "skipVerification": of("boolean"),
        "paymentDeepLinkHandler": { "enum": ["", "merchant"] },
        "skipProfilePicture": of("boolean"),
        "finclusiveUnsupportedStates": strings(),
        "celoWithdrawalEnabledInExchange": of("boolean")
    }))
}

fn identity() -> Value {
    object(json!({
        "acceptedAttestationCodes": of("array"),
        "attestationInputStatus": strings(),
        "numCompleteAttestations": of("integer"),
        "verificationStatus": of("integer"),
        "hasSeenVerificationNux": of("boolean"),
        "lastRevealAttempt": nullable("number"),
        "addressToE164Number": of("object"),
        "e164NumberToAddress": map_of(strings()),
        "e164NumberToSalt": of("object"),
        "addressToDisplayName": of("object"),
        "askedContactsPermission": of("boolean")
    }))
}

fn web3() -> Value {
    object(json!({
        "account": nullable("string"),
        "accountInWeb3Keystore": nullable("string"),
        "dataEncryptionKey": nullable("string"),
        "isDekRegistered": of("boolean"),
        "fornoMode": of("boolean"),
        "hadFornoDisabled": of("boolean"),
        "latestBlockNumber": of("number")
    }))
}

/// Latest-version root-state schema as a JSON Schema document.
pub fn root_state_schema() -> Value {
    let mut root = object_except(
        json!({
            "_persist": object_except(
                json!({ "version": of("integer"), "rehydrated": of("boolean") }),
                &["rehydrated"],
            ),
            "account": account(),
            "app": app(),
            "escrow": object(json!({
                "isReclaiming": of("boolean"),
                "sentEscrowedPayments": of("array")
            })),
            "exchange": object(json!({
                "history": object(json!({
                    "celoGoldExchangeRates": of("array"),
                    "aggregatedExchangeRates": of("array"),
                    "granularity": of("number"),
                    "range": of("number"),
                    "lastTimeUpdated": of("number")
                }))
            })),
            "fiatExchanges": object(json!({ "txHashToProvider": of("object") })),
            "geth": object(json!({
                "initialized": of("string"),
                "connected": of("boolean")
            })),
            "goldToken": object(json!({
                "balance": nullable("string"),
                "educationCompleted": of("boolean")
            })),
            "home": object(json!({
                "loading": of("boolean"),
                "notifications": of("object")
            })),
            "i18n": object(json!({
                "language": nullable("string"),
                "allowOtaTranslations": of("boolean"),
                "otaTranslationsLastUpdate": of("number"),
                "otaTranslationsAppVersion": of("string"),
                "otaTranslationsLanguage": of("string")
            })),
            "identity": identity(),
            "imports": object(json!({ "isImportingWallet": of("boolean") })),
            "localCurrency": object(json!({
                "isLoading": of("boolean"),
                "preferredCurrencyCode": nullable("string"),
                "fetchedCurrencyCode": nullable("string"),
                "exchangeRates": map_of(nullable("string"))
            })),
            "networkInfo": object(json!({
                "connected": of("boolean"),
                "userLocationData": of("object")
            })),
            "paymentRequest": object(json!({
                "incomingPaymentRequests": of("array"),
                "outgoingPaymentRequests": of("array")
            })),
            "recipients": object(json!({ "phoneRecipientCache": of("object") })),
            "send": object(json!({
                "isSending": of("boolean"),
                "recentRecipients": of("array"),
                "recentPayments": of("array")
            })),
            "stableToken": object(json!({
                "balances": map_of(nullable("string")),
                "educationCompleted": of("boolean"),
                "lastFetch": nullable("number")
            })),
            "supercharge": object(json!({
                "fetchAvailableRewardsLoading": of("boolean"),
                "fetchAvailableRewardsError": of("boolean"),
                "availableRewards": of("array")
            })),
            "tokens": object(json!({
                "tokenBalances": of("object"),
                "loading": of("boolean"),
                "error": of("boolean")
            })),
            "transactions": object(json!({
                "standbyTransactions": of("array"),
                "knownFeedTransactions": of("object")
            })),
            "verify": object(json!({
                "withoutRevealing": of("boolean"),
                "retries": of("integer")
            })),
            "walletConnect": object(json!({
                "pendingActions": of("array"),
                "sessions": of("array"),
                "pendingSessions": of("array")
            })),
            "web3": web3()
        }),
        // Blacklisted by default, so usually absent
        &["imports", "networkInfo"],
    );
    root["additionalProperties"] = json!(false);
    root
}
