//! Loyalty customer endpoints
//!
//! Customer lookup and registration, loyalty programs, cards and wallet
//! operations (hold, top up, charge off).

use super::Caller;
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::Outcome;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Customers API interface
#[derive(Clone, Debug)]
pub struct CustomersApi {
    caller: Caller,
}

impl CustomersApi {
    pub(crate) fn new(client: IikoClient) -> Self {
        Self {
            caller: Caller::new(client),
        }
    }

    /// Override the vendor `Timeout` for calls made through this interface
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.caller.set_timeout(timeout);
        self
    }

    /// Look a customer up by phone, card, email or ID
    ///
    /// POST /api/1/loyalty/iiko/customer/info
    pub async fn info(
        &self,
        organization_id: &str,
        identifier: &CustomerIdentifier,
    ) -> ApiResult<Outcome<CustomerInfo>> {
        self.caller
            .call(
                "/api/1/loyalty/iiko/customer/info",
                &identifier.request_body(organization_id),
            )
            .await
    }

    /// Register a customer or update an existing one
    ///
    /// POST /api/1/loyalty/iiko/customer/create_or_update
    pub async fn create_or_update(
        &self,
        params: &CustomerUpsert,
    ) -> ApiResult<Outcome<CustomerIdResponse>> {
        self.caller
            .call("/api/1/loyalty/iiko/customer/create_or_update", params)
            .await
    }

    /// Enroll a customer in a loyalty program
    ///
    /// POST /api/1/loyalty/iiko/customer/program/add
    pub async fn add_program(
        &self,
        organization_id: &str,
        customer_id: &str,
        program_id: &str,
    ) -> ApiResult<Outcome<ProgramAdded>> {
        self.caller
            .call(
                "/api/1/loyalty/iiko/customer/program/add",
                &ProgramRequest {
                    customer_id,
                    program_id,
                    organization_id,
                },
            )
            .await
    }

    /// Attach a card to a customer
    ///
    /// POST /api/1/loyalty/iiko/customer/card/add
    pub async fn add_card(
        &self,
        organization_id: &str,
        customer_id: &str,
        card_track: &str,
        card_number: &str,
    ) -> ApiResult<Outcome<Value>> {
        self.caller
            .call(
                "/api/1/loyalty/iiko/customer/card/add",
                &CardRequest {
                    customer_id,
                    card_track,
                    card_number: Some(card_number),
                    organization_id,
                },
            )
            .await
    }

    /// Detach a card from a customer
    ///
    /// POST /api/1/loyalty/iiko/customer/card/remove
    pub async fn remove_card(
        &self,
        organization_id: &str,
        customer_id: &str,
        card_track: &str,
    ) -> ApiResult<Outcome<Value>> {
        self.caller
            .call(
                "/api/1/loyalty/iiko/customer/card/remove",
                &CardRequest {
                    customer_id,
                    card_track,
                    card_number: None,
                    organization_id,
                },
            )
            .await
    }

    /// Reserve part of a wallet balance
    ///
    /// POST /api/1/loyalty/iiko/customer/wallet/hold
    pub async fn hold(&self, params: &WalletOperation) -> ApiResult<Outcome<WalletHoldResponse>> {
        self.caller
            .call("/api/1/loyalty/iiko/customer/wallet/hold", params)
            .await
    }

    /// Release a reservation made by `hold`
    ///
    /// POST /api/1/loyalty/iiko/customer/wallet/cancel_hold
    pub async fn cancel_hold(
        &self,
        organization_id: &str,
        transaction_id: &str,
    ) -> ApiResult<Outcome<Value>> {
        self.caller
            .call(
                "/api/1/loyalty/iiko/customer/wallet/cancel_hold",
                &CancelHoldRequest {
                    organization_id,
                    transaction_id,
                },
            )
            .await
    }

    /// Add to a wallet balance
    ///
    /// POST /api/1/loyalty/iiko/customer/wallet/topup
    pub async fn top_up(&self, params: &WalletOperation) -> ApiResult<Outcome<Value>> {
        self.caller
            .call("/api/1/loyalty/iiko/customer/wallet/topup", params)
            .await
    }

    /// Withdraw from a wallet balance
    ///
    /// POST /api/1/loyalty/iiko/customer/wallet/chargeoff
    pub async fn charge_off(&self, params: &WalletOperation) -> ApiResult<Outcome<Value>> {
        self.caller
            .call("/api/1/loyalty/iiko/customer/wallet/chargeoff", params)
            .await
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// How a customer is looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerIdentifier {
    /// Phone number
    Phone(String),
    /// Magnetic card track
    CardTrack(String),
    /// Card number
    CardNumber(String),
    /// Email
    Email(String),
    /// Customer ID
    Id(String),
}

impl CustomerIdentifier {
    /// Lookup type as iiko names it; also the body key carrying the value
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Phone(_) => "phone",
            Self::CardTrack(_) => "cardTrack",
            Self::CardNumber(_) => "cardNumber",
            Self::Email(_) => "email",
            Self::Id(_) => "id",
        }
    }

    /// The identifier value
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Phone(v)
            | Self::CardTrack(v)
            | Self::CardNumber(v)
            | Self::Email(v)
            | Self::Id(v) => v,
        }
    }

    fn request_body(&self, organization_id: &str) -> Value {
        let mut body = Map::new();
        body.insert("organizationId".to_string(), Value::from(organization_id));
        body.insert("type".to_string(), Value::from(self.kind()));
        body.insert(self.kind().to_string(), Value::from(self.value()));
        Value::Object(body)
    }
}

/// Customer fields for `create_or_update`; unset fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpsert {
    /// Organization ID
    pub organization_id: String,
    /// Customer ID, set to update an existing customer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Phone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Card track
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_track: Option<String>,
    /// Card number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    /// Name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Middle name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// Surname
    #[serde(rename = "surName", skip_serializing_if = "Option::is_none")]
    pub sur_name: Option<String>,
    /// Birthday, `yyyy-MM-dd HH:mm:ss.fff`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    /// Email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 0 not specified, 1 male, 2 female
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<i32>,
    /// 0 unknown, 1 given, 2 revoked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_status: Option<i32>,
    /// Receive promo messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_receive_promo_actions_info: Option<bool>,
    /// Referrer customer ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer_id: Option<String>,
    /// Free-form data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

impl CustomerUpsert {
    /// Customer of the given organization
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            ..Self::default()
        }
    }

    /// Update the customer with this ID
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the phone number
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgramRequest<'a> {
    customer_id: &'a str,
    program_id: &'a str,
    organization_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardRequest<'a> {
    customer_id: &'a str,
    card_track: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_number: Option<&'a str>,
    organization_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelHoldRequest<'a> {
    organization_id: &'a str,
    transaction_id: &'a str,
}

/// A wallet balance change: hold, top up or charge off
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletOperation {
    /// Customer ID
    pub customer_id: String,
    /// Wallet ID
    pub wallet_id: String,
    /// Amount
    pub sum: f64,
    /// Organization ID
    pub organization_id: String,
    /// Transaction ID for a hold; iiko generates one when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl WalletOperation {
    /// Change `sum` on a customer's wallet
    pub fn new(
        organization_id: impl Into<String>,
        customer_id: impl Into<String>,
        wallet_id: impl Into<String>,
        sum: f64,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            wallet_id: wallet_id.into(),
            sum,
            organization_id: organization_id.into(),
            transaction_id: None,
            comment: None,
        }
    }

    /// Attach a comment
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Use a caller-chosen transaction ID
    #[must_use]
    pub fn with_transaction_id(mut self, id: impl Into<String>) -> Self {
        self.transaction_id = Some(id.into());
        self
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// A loyalty card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCard {
    /// Card ID
    pub id: String,
    /// Track
    pub track: Option<String>,
    /// Number
    pub number: Option<String>,
    /// Expiry date
    pub valid_to_date: Option<String>,
}

/// A customer category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCategory {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Active
    #[serde(default)]
    pub is_active: bool,
    /// Assigned to new guests
    #[serde(default)]
    pub is_default_for_new_guests: bool,
}

/// A wallet balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    /// Wallet ID
    pub id: String,
    /// Program name
    pub name: String,
    /// Wallet type
    #[serde(rename = "type")]
    pub wallet_type: i32,
    /// Balance
    pub balance: f64,
}

/// A loyalty customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    /// Customer ID
    pub id: String,
    /// Referrer customer ID
    pub referrer_id: Option<String>,
    /// Name
    pub name: Option<String>,
    /// Surname
    pub surname: Option<String>,
    /// Middle name
    pub middle_name: Option<String>,
    /// Comment
    pub comment: Option<String>,
    /// Phone
    pub phone: Option<String>,
    /// Culture name
    pub culture_name: Option<String>,
    /// Birthday
    pub birthday: Option<String>,
    /// Email
    pub email: Option<String>,
    /// 0 not specified, 1 male, 2 female
    #[serde(default)]
    pub sex: i32,
    /// 0 unknown, 1 given, 2 revoked
    #[serde(default)]
    pub consent_status: i32,
    /// Personal data removed
    #[serde(default)]
    pub anonymized: bool,
    /// Cards
    #[serde(default)]
    pub cards: Vec<CustomerCard>,
    /// Categories
    #[serde(default)]
    pub categories: Vec<CustomerCategory>,
    /// Wallet balances
    #[serde(default)]
    pub wallet_balances: Vec<WalletBalance>,
    /// Free-form data
    pub user_data: Option<String>,
    /// Receive promo messages
    pub should_receive_promo_actions_info: Option<bool>,
    /// Receive loyalty messages
    pub should_receive_loyalty_info: Option<bool>,
    /// Receive order status messages
    pub should_receive_order_status_info: Option<bool>,
    /// Personal data consent start
    pub personal_data_consent_from: Option<String>,
    /// Personal data consent end
    pub personal_data_consent_to: Option<String>,
    /// Personal data processing start
    pub personal_data_processing_from: Option<String>,
    /// Personal data processing end
    pub personal_data_processing_to: Option<String>,
    /// Deleted
    pub is_deleted: Option<bool>,
}

impl CustomerInfo {
    /// Balance of the wallet with this ID
    #[must_use]
    pub fn wallet_balance(&self, wallet_id: &str) -> Option<f64> {
        self.wallet_balances
            .iter()
            .find(|w| w.id == wallet_id)
            .map(|w| w.balance)
    }
}

/// Response of `create_or_update`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerIdResponse {
    /// Customer ID
    pub id: String,
}

/// Response of `add_program`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramAdded {
    /// Wallet created for the program
    pub user_wallet_id: String,
}

/// Response of `hold`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletHoldResponse {
    /// Transaction to pass to `cancel_hold`
    pub transaction_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_key_follows_type() {
        let cases = [
            (CustomerIdentifier::Phone("+79990000000".into()), "phone"),
            (CustomerIdentifier::CardTrack("track".into()), "cardTrack"),
            (CustomerIdentifier::CardNumber("0001".into()), "cardNumber"),
            (CustomerIdentifier::Email("a@b.c".into()), "email"),
            (CustomerIdentifier::Id("cust".into()), "id"),
        ];
        for (identifier, key) in cases {
            let body = identifier.request_body("org");
            assert_eq!(body["organizationId"], "org");
            assert_eq!(body["type"], key);
            assert_eq!(body[key], identifier.value());
            assert_eq!(body.as_object().map(Map::len), Some(3));
        }
    }

    #[test]
    fn test_upsert_skips_unset_fields() {
        let params = CustomerUpsert::new("org").with_phone("+70000000000").with_name("Olga");
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"organizationId": "org", "phone": "+70000000000", "name": "Olga"})
        );
    }

    #[test]
    fn test_wallet_operation_shape() {
        let op = WalletOperation::new("org", "cust", "wallet", 150.0).with_comment("bonus");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({
                "customerId": "cust",
                "walletId": "wallet",
                "sum": 150.0,
                "organizationId": "org",
                "comment": "bonus"
            })
        );
    }

    #[test]
    fn test_customer_info_parse() {
        let info: CustomerInfo = serde_json::from_value(json!({
            "id": "cust",
            "name": "Olga",
            "sex": 2,
            "consentStatus": 1,
            "anonymized": false,
            "cards": [{"id": "card", "track": "t", "number": "n"}],
            "walletBalances": [{"id": "w1", "name": "Bonus", "type": 1, "balance": 320.5}]
        }))
        .unwrap();
        assert_eq!(info.wallet_balance("w1"), Some(320.5));
        assert_eq!(info.wallet_balance("w2"), None);
        assert_eq!(info.cards.len(), 1);
    }
}
