//! Application models exchanged with the admin backend
//!
//! Field names follow the backend's camelCase JSON.

use serde::{Deserialize, Serialize};

/// Identity returned for the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub public_id: String,
    pub profile: ProfileDetails,
}

impl UserProfile {
    pub fn role(&self) -> &str {
        &self.profile.settings.role
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDetails {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub profile_picture: String,
    pub created_on: String,
    pub settings: ProfileSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSettings {
    pub role: String,
    pub is_email_verified: bool,
}

/// Permissions granted to a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrivilege {
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Gaming operator with its aggregate stake figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorData {
    pub id: i64,
    pub public_id: String,
    pub registration_number: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub lga: String,
    pub contact_person: String,
    pub contact_person_phone: String,
    pub contact_person_email: String,
    pub status: String,
    pub total_stake_amount_by_operator: f64,
    pub total_unique_games_played_by_operator: i64,
    pub total_stake_winning_amount_by_operator: f64,
    pub total_unique_players_by_operator: i64,
    /// Milliseconds since the Unix epoch
    pub created_on: i64,
}

/// Platform-wide or per-operator totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorSummary {
    pub total_operators: i64,
    pub total_stakes_amount: f64,
    pub total_stakes: i64,
    pub total_winning_amount: f64,
    pub total_winnings: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StakeOperator {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StakeCustomer {
    pub name: String,
    pub game_played: String,
    pub game_code: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StakeLocation {
    pub address: String,
    pub lga_code: String,
    pub lga_name: String,
    pub state_code: String,
    pub state_name: String,
    pub country_code: String,
}

/// A registered stake
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StakeData {
    pub reference_number: String,
    pub stake_reference: String,
    pub operator: StakeOperator,
    pub customer: StakeCustomer,
    pub location: StakeLocation,
    pub terminal_id: String,
    pub client_id: String,
    pub created_on: String,
}

/// A winning transaction paid against a stake
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionData {
    pub transaction_reference: String,
    pub reference_number: String,
    pub stake_registration: StakeData,
    pub amount_won: f64,
    pub client_id: String,
    pub transaction_date: String,
    pub created_on: i64,
}

/// One month of a metric series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyData {
    pub month_label: String,
    pub values: Vec<f64>,
}

/// Named month-wise metric series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyType {
    pub name: String,
    pub data: Vec<MonthlyData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitConfig {
    pub remaining_tokens: i64,
    pub capacity: i64,
    pub refill_period: String,
    pub refill_time_unit: String,
}

/// API key issued to an operator's integration client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiKeyData {
    pub public_id: Option<String>,
    pub name: String,
    pub api_key: String,
    pub role: String,
    pub rate_limit_config: RateLimitConfig,
    pub revoked: bool,
    pub created_on: i64,
}

/// Request body for creating an API-key client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientApiKeyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Spring-style page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

/// Listing filter, sent as query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub page: u32,
    pub size: u32,
    pub public_id: Option<String>,
    pub name: Option<String>,
    pub search: Option<String>,
    pub lga: Option<String>,
    pub operator_public_id: Option<String>,
    pub status: Option<String>,
    pub state_code: Option<String>,
    pub sort: Option<String>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<u32>,
}

impl FilterRequest {
    pub fn page(page: u32, size: u32) -> Self {
        Self { page, size, ..Default::default() }
    }

    /// Query pairs in a stable order; unset and blank fields are skipped
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ];
        let optional = [
            ("publicId", &self.public_id),
            ("name", &self.name),
            ("search", &self.search),
            ("lga", &self.lga),
            ("operatorPublicId", &self.operator_public_id),
            ("status", &self.status),
            ("stateCode", &self.state_code),
            ("sort", &self.sort),
            ("createdFrom", &self.created_from),
            ("createdTo", &self.created_to),
            ("startDate", &self.start_date),
            ("endDate", &self.end_date),
            ("from", &self.from),
            ("to", &self.to),
        ];
        for (key, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                query.push((key.to_string(), value.to_string()));
            }
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        query
    }
}

/// Report filter for a single metric
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterReportRequest {
    pub metric: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub operator_id: Option<String>,
}

impl FilterReportRequest {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![("metric".to_string(), self.metric.clone())];
        for (key, value) in
            [("from", &self.from), ("to", &self.to), ("operatorId", &self.operator_id)]
        {
            if let Some(value) = value {
                query.push((key.to_string(), value.clone()));
            }
        }
        query
    }
}
