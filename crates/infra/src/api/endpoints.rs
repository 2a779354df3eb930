//! Backend endpoint paths

// Operators (api)
pub const OPERATORS: &str = "/operators";
pub const OPERATOR_BY_TOKEN: &str = "/operators/me";

pub fn operator_metrics(operator_id: &str) -> String {
    format!("/operators/{}/metrics", urlencoding::encode(operator_id))
}

// Reports (api)
pub const WINNING_TRANSACTIONS: &str = "/transactions/winnings";
pub const MONTHLY_METRICS: &str = "/reports/monthly";

// API-key clients (api)
pub const API_CLIENTS: &str = "/api-clients";

pub fn api_client(public_id: &str) -> String {
    format!("{API_CLIENTS}/{}", urlencoding::encode(public_id))
}

pub fn api_client_rotation(public_id: &str) -> String {
    format!("{}/rotate", api_client(public_id))
}

// Users (apiV1)
pub const USER_PROFILE: &str = "/users/me";
pub const USER_PERMISSIONS: &str = "/users/permissions";

// Authorization server (auth)
pub const AUTHORIZER_URL: &str = "/oauth2/authorizer-url";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_path_encoded() {
        assert_eq!(operator_metrics("op 1/x"), "/operators/op%201%2Fx/metrics");
        assert_eq!(api_client_rotation("k1"), "/api-clients/k1/rotate");
    }
}
