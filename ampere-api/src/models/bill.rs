use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRequest {
    /// Cumulative energy of the session in Wh
    pub power_used: f64,
    /// Cumulative cost of the session
    pub price: f64,
    /// Identifier of the submitting client run
    pub session_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyQuery {
    /// Calendar month, 1-12
    pub month: u8,
    /// Calendar year
    pub year: i32,
}

impl MonthlyQuery {
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyUsage {
    /// Summed energy in Wh
    pub power_used: f64,
    /// Summed cost
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_request_uses_camel_case() {
        let request = BillRequest {
            power_used: 1.5,
            price: 0.012,
            session_id: String::from("session-1"),
        };

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["powerUsed"], 1.5);
        assert_eq!(value["sessionId"], "session-1");
    }

    #[test]
    fn test_monthly_query_validation() {
        assert!(MonthlyQuery { month: 1, year: 2024 }.is_valid());
        assert!(MonthlyQuery { month: 12, year: 2024 }.is_valid());
        assert!(!MonthlyQuery { month: 0, year: 2024 }.is_valid());
        assert!(!MonthlyQuery { month: 13, year: 2024 }.is_valid());
    }
}
