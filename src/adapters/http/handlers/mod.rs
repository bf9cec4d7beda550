pub mod auth;
pub mod oauth;

use actix_web::HttpRequest;
use std::net::IpAddr;

/// Extract the client IP address from the socket peer
///
/// Forwarded / X-Forwarded-For are client-controlled and not trusted.
pub(crate) fn extract_ip_address(req: &HttpRequest) -> Option<IpAddr> {
  req.peer_addr().map(|addr| addr.ip())
}

/// Extract user agent from the request
pub(crate) fn extract_user_agent(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get("User-Agent")
    .and_then(|h| h.to_str().ok())
    .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn test_extract_ip_address_uses_peer() {
    let req = TestRequest::default()
      .peer_addr("10.1.2.3:4567".parse().unwrap())
      .to_http_request();
    assert_eq!(extract_ip_address(&req), Some("10.1.2.3".parse().unwrap()));

    let req = TestRequest::default()
      .peer_addr("[2001:db8::1]:443".parse().unwrap())
      .to_http_request();
    assert_eq!(extract_ip_address(&req), Some("2001:db8::1".parse().unwrap()));
  }

  #[test]
  fn test_extract_ip_address_ignores_forwarded_headers() {
    let req = TestRequest::default()
      .peer_addr("10.1.2.3:4567".parse().unwrap())
      .insert_header(("X-Forwarded-For", "203.0.113.7"))
      .insert_header(("Forwarded", "for=198.51.100.9"))
      .to_http_request();
    assert_eq!(extract_ip_address(&req), Some("10.1.2.3".parse().unwrap()));

    let req = TestRequest::default()
      .insert_header(("X-Forwarded-For", "203.0.113.7"))
      .to_http_request();
    assert_eq!(extract_ip_address(&req), None);
  }

  #[test]
  fn test_extract_user_agent() {
    let req = TestRequest::default()
      .insert_header(("User-Agent", "curl/8.0"))
      .to_http_request();
    assert_eq!(extract_user_agent(&req).as_deref(), Some("curl/8.0"));
  }
}
