//! Client for the mood server that publishes the desired light state.

use std::future::Future;
use std::time::Duration;

use log::debug;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use strum_macros::{Display, IntoStaticStr};

use crate::errors::Error;
use crate::types::{Brightness, Color, Kelvin, LightParameters, Mode, PowerIntent, Tint};

type Result<T> = std::result::Result<T, Error>;

/// Read endpoints exposed by the mood server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum Endpoint {
    #[strum(serialize = "search_light")]
    SearchStatus,
    #[strum(serialize = "light_power")]
    Power,
    #[strum(serialize = "light_info")]
    LightInfo,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        (*self).into()
    }
}

/// Answer of the search status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SearchStatus {
    #[serde(rename = "status")]
    pub mode: Mode,
    /// Switch the bound light off when releasing it.
    #[serde(default = "default_light_off")]
    pub light_off: bool,
}

fn default_light_off() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct PowerResponse {
    power: PowerIntent,
}

#[derive(Debug, Default, Deserialize)]
struct LightInfoResponse {
    brightness: Option<u8>,
    r: Option<u8>,
    g: Option<u8>,
    b: Option<u8>,
    colortemp: Option<u32>,
}

impl LightInfoResponse {
    /// RGB wins over the color temperature when both are present.
    fn into_parameters(self) -> Result<LightParameters> {
        let tint = match (self.r, self.g, self.b) {
            (Some(r), Some(g), Some(b)) => Some(Tint::Rgb(Color::rgb(r, g, b))),
            (Some(_), _, _) => {
                return Err(Error::IncompleteColor {
                    endpoint: Endpoint::LightInfo,
                });
            }
            _ => self.colortemp.map(|k| Tint::Temperature(Kelvin::clamped(k))),
        };
        Ok(LightParameters {
            brightness: self.brightness.map(Brightness::new).unwrap_or_default(),
            tint,
        })
    }
}

/// Source of the desired light state.
///
/// Each call is a single attempt; the caller decides what a failure means for
/// the current cycle.
pub trait RemoteState: Send + Sync {
    fn fetch_search_status(&self) -> impl Future<Output = Result<SearchStatus>> + Send;

    fn fetch_power(&self) -> impl Future<Output = Result<PowerIntent>> + Send;

    fn fetch_light_info(&self) -> impl Future<Output = Result<LightParameters>> + Send;
}

/// HTTP client for the mood server.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: String,
}

impl RemoteClient {
    const API_KEY_HEADER: &'static str = "x-api-key";

    /// Builds a client sending `api_key` with every request.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key).map_err(|_| Error::InvalidApiKey)?;
        key.set_sensitive(true);
        headers.insert(Self::API_KEY_HEADER, key);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(Error::HttpClient)?;

        Ok(RemoteClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| Error::Request { endpoint, err })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(Error::Status { endpoint, status });
        }

        let text = response
            .text()
            .await
            .map_err(|err| Error::Request { endpoint, err })?;
        debug!("{} -> {}", endpoint, text);

        serde_json::from_str(&text).map_err(|err| Error::Payload { endpoint, err })
    }
}

impl RemoteState for RemoteClient {
    async fn fetch_search_status(&self) -> Result<SearchStatus> {
        self.get(Endpoint::SearchStatus).await
    }

    async fn fetch_power(&self) -> Result<PowerIntent> {
        let response: PowerResponse = self.get(Endpoint::Power).await?;
        Ok(response.power)
    }

    async fn fetch_light_info(&self) -> Result<LightParameters> {
        let response: LightInfoResponse = self.get(Endpoint::LightInfo).await?;
        response.into_parameters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one HTTP response and hands back the raw request head.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/api", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            String::from_utf8(request).unwrap()
        });
        (base_url, handle)
    }

    fn client(base_url: &str) -> RemoteClient {
        RemoteClient::new(base_url, "test-key", Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_light_info_rgb_wins() {
        let info: LightInfoResponse =
            serde_json::from_str(r#"{"brightness":100,"r":10,"g":20,"b":30,"colortemp":4000}"#)
                .unwrap();
        let params = info.into_parameters().unwrap();
        assert_eq!(params.brightness, Brightness::new(100));
        assert_eq!(params.tint, Some(Tint::Rgb(Color::rgb(10, 20, 30))));
    }

    #[test]
    fn test_light_info_defaults() {
        let params = LightInfoResponse::default().into_parameters().unwrap();
        assert_eq!(params.brightness, Brightness::FULL);
        assert_eq!(params.tint, None);

        let info: LightInfoResponse = serde_json::from_str(r#"{"colortemp":2700}"#).unwrap();
        let params = info.into_parameters().unwrap();
        assert_eq!(params.tint, Some(Tint::Temperature(Kelvin::clamped(2700))));
    }

    #[test]
    fn test_light_info_incomplete_rgb() {
        let info: LightInfoResponse = serde_json::from_str(r#"{"r":10,"colortemp":2700}"#).unwrap();
        let err = info.into_parameters().unwrap_err();
        assert_eq!(err.endpoint(), Some(Endpoint::LightInfo));
    }

    #[test]
    fn test_light_info_out_of_range() {
        assert!(serde_json::from_str::<LightInfoResponse>(r#"{"brightness":300}"#).is_err());
        assert!(serde_json::from_str::<LightInfoResponse>(r#"{"r":-1,"g":0,"b":0}"#).is_err());
    }

    #[test]
    fn test_search_status_light_off_default() {
        let status: SearchStatus = serde_json::from_str(r#"{"status":"wait"}"#).unwrap();
        assert_eq!(status.mode, Mode::Waiting);
        assert!(status.light_off);

        let status: SearchStatus =
            serde_json::from_str(r#"{"status":"search","light_off":false}"#).unwrap();
        assert_eq!(status.mode, Mode::Searching);
        assert!(!status.light_off);
    }

    #[tokio::test]
    async fn test_fetch_search_status_sends_api_key() {
        let (base_url, server) = serve_once("200 OK", r#"{"status":"search","light_off":false}"#).await;

        let status = client(&base_url).fetch_search_status().await.unwrap();
        assert_eq!(status.mode, Mode::Searching);

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /api/search_light "));
        assert!(request.contains("x-api-key: test-key"));
    }

    #[tokio::test]
    async fn test_fetch_light_info() {
        let (base_url, server) =
            serve_once("200 OK", r#"{"brightness":100,"r":10,"g":20,"b":30}"#).await;

        let params = client(&base_url).fetch_light_info().await.unwrap();
        assert_eq!(params, LightParameters {
            brightness: Brightness::new(100),
            tint: Some(Tint::Rgb(Color::rgb(10, 20, 30))),
        });
        assert!(server.await.unwrap().starts_with("GET /api/light_info "));
    }

    #[tokio::test]
    async fn test_non_200_is_status_error() {
        let (base_url, _server) = serve_once("503 Service Unavailable", "{}").await;

        let err = client(&base_url).fetch_power().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Status {
                endpoint: Endpoint::Power,
                status: 503
            }
        ));
    }

    #[tokio::test]
    async fn test_unknown_power_is_payload_error() {
        let (base_url, _server) = serve_once("200 OK", r#"{"power":"dim"}"#).await;

        let err = client(&base_url).fetch_power().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Payload {
                endpoint: Endpoint::Power,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = client(&base_url).fetch_search_status().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Request {
                endpoint: Endpoint::SearchStatus,
                ..
            }
        ));
    }
}
