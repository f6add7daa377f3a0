//! HTTP client wrapper - downloads and decodes the product collection

use std::time::Duration;

use crate::messages::FetchError;
use crate::models::Product;

/// Map a transport-level reqwest error onto a fetch failure
fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_decode() {
        FetchError::Decode(error.to_string())
    } else {
        FetchError::Transport(error.to_string())
    }
}

/// Download the full collection. Any non-2xx status or undecodable body is a failure.
pub async fn fetch_catalog(client: &reqwest::Client, url: &str) -> Result<Vec<Product>, FetchError> {
    let resp = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(classify)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = resp.text().await.map_err(classify)?;
    parse_catalog(&body)
}

/// Decode a JSON array of products, rejecting invalid prices
pub fn parse_catalog(body: &str) -> Result<Vec<Product>, FetchError> {
    let products: Vec<Product> =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    if let Some(bad) = products.iter().find(|p| !p.has_valid_price()) {
        return Err(FetchError::Decode(format!(
            "product {} has invalid price {}",
            bad.id, bad.price
        )));
    }

    Ok(products)
}

/// Create an HTTP client. `None` leaves requests without a timeout.
pub fn create_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("catalog-tui/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Falling back to default HTTP client");
        reqwest::Client::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_array() {
        let body = r#"[
            {"id": 1, "title": "A", "price": 1.5, "image": "a.png"},
            {"id": "2", "title": "B", "price": 0, "image": "b.png"}
        ]"#;
        let products = parse_catalog(body).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].id.to_string(), "2");
    }

    #[test]
    fn test_parse_catalog_rejects_object_payload() {
        let err = parse_catalog(r#"{"products": []}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_parse_catalog_rejects_missing_fields() {
        let err = parse_catalog(r#"[{"id": 1, "title": "A"}]"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_parse_catalog_rejects_negative_price() {
        let err = parse_catalog(r#"[{"id": 9, "title": "A", "price": -3, "image": "a"}]"#).unwrap_err();
        assert_eq!(err, FetchError::Decode("product 9 has invalid price -3".into()));
    }
}
