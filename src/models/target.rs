//! Broadcast destinations addressed by URL.
//!
//! The URL scheme selects the wire format:
//! - `http://` / `https://`: JSON `{title, body}` POST to the URL itself
//! - `bark://DEVICE_KEY@HOST[:PORT]`: Bark push to `https://HOST[:PORT]/push`

use reqwest::Url;

use crate::error::{AppError, AppResult};

/// A parsed broadcast destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastTarget {
    Json { url: String },
    Bark { server: String, device_key: String },
}

impl BroadcastTarget {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let url = Url::parse(raw)
            .map_err(|e| AppError::validation("urls", format!("Invalid URL '{}': {}", raw, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(BroadcastTarget::Json {
                url: raw.to_string(),
            }),
            "bark" => {
                let host = url.host_str().ok_or_else(|| {
                    AppError::validation("urls", format!("Missing bark server in '{}'", raw))
                })?;
                if url.username().is_empty() {
                    return Err(AppError::validation(
                        "urls",
                        format!("Missing bark device key in '{}'", raw),
                    ));
                }
                let server = match url.port() {
                    Some(port) => format!("https://{}:{}", host, port),
                    None => format!("https://{}", host),
                };
                Ok(BroadcastTarget::Bark {
                    server,
                    device_key: url.username().to_string(),
                })
            }
            other => Err(AppError::validation(
                "urls",
                format!("Unsupported notification scheme '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_target() {
        assert_eq!(
            BroadcastTarget::parse("https://hooks.example.com/a?b=c").unwrap(),
            BroadcastTarget::Json {
                url: "https://hooks.example.com/a?b=c".to_string()
            }
        );
    }

    #[test]
    fn test_parse_bark_target() {
        assert_eq!(
            BroadcastTarget::parse("bark://abc123@bark.example.com:8443").unwrap(),
            BroadcastTarget::Bark {
                server: "https://bark.example.com:8443".to_string(),
                device_key: "abc123".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_targets() {
        assert!(BroadcastTarget::parse("not a url").is_err());
        assert!(BroadcastTarget::parse("bark://bark.example.com").is_err());
        assert!(BroadcastTarget::parse("smtp://mail.example.com").is_err());
    }
}
