use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{InvalidAmount, UnknownTag};

macro_rules! wire_tag {
    (
        $(#[$attr:meta])*
        $name:ident, $kind:literal, {
            $( $(#[$variant_attr:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_attr])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownTag;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|tag| tag.as_str().eq_ignore_ascii_case(value.trim()))
                    .ok_or_else(|| UnknownTag::new($kind, value))
            }
        }
    };
}

// Wire spellings are what the generation backend expects, typos included.
wire_tag!(#[derive(Default)] ContractType, "contract type", {
    #[default]
    Default => "default",
    Defi => "defi",
    Nft => "nft",
    Dao => "dao",
    Marketplace => "marketplace",
    VotingSystem => "votingsystem",
    Crowdfunding => "crowfunding",
    SupplyChain => "supplychain",
    IdentityManagement => "identitymanagement",
    Dapp => "dapp",
    Gaming => "gaming",
});

wire_tag!(#[derive(Default)] ShardTarget, "shard target", {
    #[default]
    Single => "single",
    Multi => "multi",
});

wire_tag!(FunctionalRequirement, "functional requirement", {
    TokenMinting => "Token minting",
    TokenBurning => "Token burning",
    P2pTransfers => "P2P transfers",
    Staking => "Staking",
    LendingAndBorrowing => "Lending and borrowing",
    AutomatedMarketMaking => "Automated market-making",
    Auctions => "Auctions",
    EscrowServices => "Escrow services",
});

/// Decimal amount as reported by the balance service, kept in its textual form.
///
/// Numeric JSON is read with `arbitrary_precision`, so integers wider than
/// `u64` keep every digit instead of passing through `f64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "String")]
pub struct Amount(String);

impl Amount {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Amount {
    type Err = InvalidAmount;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (digits, None),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        let valid = !whole.is_empty()
            && all_digits(whole)
            && fraction.map_or(true, |f| !f.is_empty() && all_digits(f));
        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InvalidAmount(value.to_string()))
        }
    }
}

impl TryFrom<serde_json::Value> for Amount {
    type Error = InvalidAmount;

    fn try_from(raw: serde_json::Value) -> Result<Self, Self::Error> {
        match raw {
            serde_json::Value::Number(number) => number.to_string().parse(),
            serde_json::Value::String(text) => text.parse(),
            other => Err(InvalidAmount(other.to_string())),
        }
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub amount: Amount,
    pub currency: String,
}

impl Balance {
    pub fn new(amount: Amount, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_type_keeps_backend_spelling() {
        assert_eq!(ContractType::Crowdfunding.as_str(), "crowfunding");
        assert_eq!(
            serde_json::to_string(&ContractType::VotingSystem).expect("serialize"),
            "\"votingsystem\""
        );
        assert_eq!("NFT".parse::<ContractType>(), Ok(ContractType::Nft));
    }

    #[test]
    fn unknown_tag_reports_kind() {
        let err = "triple".parse::<ShardTarget>().expect_err("unknown");
        assert_eq!(err.kind, "shard target");
        assert_eq!(err.value, "triple");
    }

    #[test]
    fn functional_requirement_round_trips_label() {
        let parsed: FunctionalRequirement =
            serde_json::from_str("\"Automated market-making\"").expect("deserialize");
        assert_eq!(parsed, FunctionalRequirement::AutomatedMarketMaking);
    }

    #[test]
    fn amount_accepts_numbers_and_decimal_strings() {
        let from_number: Amount = serde_json::from_str("42").expect("number");
        assert_eq!(from_number.as_str(), "42");

        let from_text: Amount = serde_json::from_str("\"1000000000000000000\"").expect("text");
        assert_eq!(from_text.as_str(), "1000000000000000000");

        let fractional: Amount = serde_json::from_str("\"0.25\"").expect("fraction");
        assert_eq!(fractional.to_string(), "0.25");
    }

    #[test]
    fn wide_numeric_amount_keeps_every_digit() {
        let twenty_egld: Amount = serde_json::from_str("20000000000000000000").expect("number");
        assert_eq!(twenty_egld.as_str(), "20000000000000000000");

        let wide: Amount = serde_json::from_str("12345678901234567890123").expect("number");
        assert_eq!(wide.as_str(), "12345678901234567890123");

        let encoded = serde_json::to_string(&wide).expect("serialize");
        assert_eq!(encoded, "\"12345678901234567890123\"");
        let reread: Amount = serde_json::from_str(&encoded).expect("re-read own encoding");
        assert_eq!(reread, wide);
    }

    #[test]
    fn amount_rejects_non_numeric_json() {
        assert!(serde_json::from_str::<Amount>("true").is_err());
        assert!(serde_json::from_str::<Amount>("null").is_err());
    }

    #[test]
    fn wire_tags_default_to_first_form_choice() {
        assert_eq!(ContractType::default(), ContractType::Default);
        assert_eq!(ShardTarget::default(), ShardTarget::Single);
    }

    #[test]
    fn amount_rejects_non_decimal_text() {
        assert!(serde_json::from_str::<Amount>("\"12abc\"").is_err());
        assert!("1.".parse::<Amount>().is_err());
        assert!("".parse::<Amount>().is_err());
    }

    #[test]
    fn balance_displays_with_currency_suffix() {
        let balance = Balance::new("12.5".parse().expect("amount"), "EGLD");
        assert_eq!(balance.to_string(), "12.5 EGLD");
    }
}
