use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tier::Tier;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Persisted customer record. The tier is intentionally absent here: it is a
/// derived value and only ever lives on [`CustomerProfile`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub annual_spend: Option<Decimal>,
    pub last_purchase_date: Option<DateTime<Utc>>,
}

impl Customer {
    /// Full-replace mutation: every mutable field is overwritten from the
    /// draft, including optional fields the draft leaves absent. There is no
    /// partial-patch path.
    pub fn replace_with(&mut self, draft: CustomerDraft) {
        self.name = draft.name;
        self.email = draft.email;
        self.annual_spend = draft.annual_spend;
        self.last_purchase_date = draft.last_purchase_date;
    }
}

/// Inbound create/update payload. A client-supplied `tier` field is silently
/// dropped at deserialization, so the derived value can never be forged.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub annual_spend: Option<Decimal>,
    #[serde(default)]
    pub last_purchase_date: Option<DateTime<Utc>>,
}

/// Outward-facing representation: the stored fields plus the tier computed at
/// conversion time. Built fresh on every read and never written back.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub annual_spend: Option<Decimal>,
    pub last_purchase_date: Option<DateTime<Utc>>,
    pub tier: Tier,
}

impl CustomerProfile {
    pub fn from_record(customer: &Customer, now: DateTime<Utc>) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.clone(),
            annual_spend: customer.annual_spend,
            last_purchase_date: customer.last_purchase_date,
            tier: Tier::classify(customer.annual_spend, customer.last_purchase_date, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Months, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::{Customer, CustomerDraft, CustomerId, CustomerProfile};
    use crate::tier::Tier;

    fn record() -> Customer {
        Customer {
            id: CustomerId(Uuid::new_v4()),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            annual_spend: Some(Decimal::new(12_000, 0)),
            last_purchase_date: Utc::now().checked_sub_months(Months::new(2)),
        }
    }

    #[test]
    fn profile_attaches_computed_tier() {
        let profile = CustomerProfile::from_record(&record(), Utc::now());
        assert_eq!(profile.tier, Tier::Platinum);
        assert_eq!(profile.name, "Ada Lovelace");
    }

    #[test]
    fn replace_overwrites_optionals_with_absence() {
        let mut customer = record();
        let id = customer.id;
        customer.replace_with(CustomerDraft {
            name: "Ada King".to_string(),
            email: "ada.king@example.com".to_string(),
            annual_spend: None,
            last_purchase_date: None,
        });

        assert_eq!(customer.id, id);
        assert_eq!(customer.name, "Ada King");
        assert_eq!(customer.annual_spend, None);
        assert_eq!(customer.last_purchase_date, None);
    }

    #[test]
    fn draft_ignores_client_supplied_tier() {
        let draft: CustomerDraft = serde_json::from_value(serde_json::json!({
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "annualSpend": 250.0,
            "tier": "PLATINUM",
        }))
        .expect("deserialize draft");

        assert_eq!(draft.annual_spend, Some(Decimal::new(250, 0)));
        assert_eq!(draft.last_purchase_date, None);
    }

    #[test]
    fn profile_serializes_wire_field_names() {
        let profile = CustomerProfile::from_record(&record(), Utc::now());
        let value = serde_json::to_value(&profile).expect("serialize profile");

        assert!(value.get("annualSpend").is_some());
        assert!(value.get("lastPurchaseDate").is_some());
        assert_eq!(value["tier"], "PLATINUM");
    }
}
