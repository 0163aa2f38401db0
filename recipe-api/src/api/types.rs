use serde::{Deserialize, Serialize};

/// Wire shape for mutation acknowledgments.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
}

impl MessageResponse {
    pub fn updated() -> Self {
        MessageResponse {
            status_code: 200,
            message: "Recipe has been updated!".to_string(),
        }
    }

    pub fn deleted(count: u64) -> Self {
        MessageResponse {
            status_code: 200,
            message: format!("Deleted {} recipe!", count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_reports_the_count() {
        assert_eq!(MessageResponse::deleted(1).message, "Deleted 1 recipe!");
        assert_eq!(MessageResponse::deleted(0).message, "Deleted 0 recipe!");
    }
}
