//! Currency Provider - fixed-rate currency conversion
//!
//! Provides the `currency_converter` tool. Rates are a process-lifetime
//! constant, expressed in units of currency per 1 USD.

use crate::agent::provider::{FailurePolicy, ToolProvider};
use crate::llm::ToolDefinition;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Fixed conversion rates, units of currency per 1 USD
const RATES: &[(&str, f64)] = &[("USD", 1.0), ("EUR", 0.92), ("RUB", 100.0)];

fn rate_for(code: &str) -> Option<f64> {
    RATES.iter().find(|(c, _)| *c == code).map(|(_, r)| *r)
}

/// Arguments for `currency_converter` tool
#[derive(Debug, Deserialize)]
struct ConvertArgs {
    amount: f64,
    from_currency: String,
    to_currency: String,
}

/// Convert an amount between two supported currencies.
///
/// Currency codes are case-insensitive. Unsupported codes produce a
/// human-readable error string; the source currency is checked first.
fn convert(amount: f64, from_currency: &str, to_currency: &str) -> String {
    let from = from_currency.to_uppercase();
    let to = to_currency.to_uppercase();

    let Some(from_rate) = rate_for(&from) else {
        return format!("Неизвестная исходная валюта: {from}");
    };
    let Some(to_rate) = rate_for(&to) else {
        return format!("Неизвестная целевая валюта: {to}");
    };

    // USD is the intermediate base currency
    let amount_in_usd = amount / from_rate;
    let converted = amount_in_usd * to_rate;

    format!("{amount:.2} {from} = {converted:.2} {to}")
}

/// Provider for the fixed-rate currency converter
pub struct CurrencyProvider;

#[async_trait]
impl ToolProvider for CurrencyProvider {
    fn name(&self) -> &'static str {
        "currency"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: "currency_converter".to_string(),
            description: "Convert an amount from one currency to another. Supported currencies: USD, EUR, RUB. Returns the conversion result as a string.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "amount": {
                        "type": "number",
                        "description": "The amount to convert"
                    },
                    "from_currency": {
                        "type": "string",
                        "description": "Source currency code (USD, EUR, RUB)"
                    },
                    "to_currency": {
                        "type": "string",
                        "description": "Target currency code (USD, EUR, RUB)"
                    }
                },
                "required": ["amount", "from_currency", "to_currency"]
            }),
        }]
    }

    fn can_handle(&self, tool_name: &str) -> bool {
        tool_name == "currency_converter"
    }

    fn failure_policy(&self, _tool_name: &str) -> FailurePolicy {
        FailurePolicy::FailSoft
    }

    fn fallback_output(&self, _tool_name: &str) -> String {
        "Ошибка конвертации валюты".to_string()
    }

    async fn execute(&self, tool_name: &str, arguments: &str) -> Result<String> {
        debug!(tool = tool_name, "Executing currency tool");

        match tool_name {
            "currency_converter" => {
                let args: ConvertArgs = serde_json::from_str(arguments)?;
                Ok(convert(args.amount, &args.from_currency, &args.to_currency))
            }
            _ => anyhow::bail!("Unknown currency tool: {tool_name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_usd_to_eur() {
        assert_eq!(convert(100.0, "usd", "EUR"), "100.00 USD = 92.00 EUR");
    }

    #[test]
    fn test_eur_to_rub() {
        assert_eq!(convert(50.0, "EUR", "RUB"), "50.00 EUR = 5434.78 RUB");
    }

    #[test]
    fn test_identity_conversion() {
        assert_eq!(convert(10.0, "rub", "rub"), "10.00 RUB = 10.00 RUB");
    }

    #[test]
    fn test_unknown_source_currency() {
        let result = convert(10.0, "XXX", "USD");
        assert!(result.contains("XXX"));
        assert!(result.contains("Неизвестная исходная валюта"));
    }

    #[test]
    fn test_unknown_target_currency() {
        let result = convert(10.0, "USD", "GBP");
        assert!(result.contains("GBP"));
        assert!(result.contains("Неизвестная целевая валюта"));
    }

    #[test]
    fn test_source_error_takes_precedence() {
        let result = convert(10.0, "XXX", "YYY");
        assert!(result.contains("Неизвестная исходная валюта: XXX"));
    }

    #[tokio::test]
    async fn test_execute_parses_arguments() {
        let provider = CurrencyProvider;
        let output = provider
            .execute(
                "currency_converter",
                "{\"amount\": 100, \"from_currency\": \"usd\", \"to_currency\": \"eur\"}",
            )
            .await
            .expect("conversion should succeed");
        assert_eq!(output, "100.00 USD = 92.00 EUR");
    }

    proptest! {
        // Round trip X -> Y -> X stays within rounding tolerance of the
        // original amount.
        #[test]
        fn test_round_trip_within_tolerance(
            amount in 0.01f64..1_000_000.0f64,
            from_idx in 0usize..3,
            to_idx in 0usize..3,
        ) {
            let (_, from_rate) = RATES[from_idx];
            let (_, to_rate) = RATES[to_idx];

            let there = amount / from_rate * to_rate;
            let back = there / to_rate * from_rate;

            prop_assert!((back - amount).abs() <= 0.01);
        }
    }
}
