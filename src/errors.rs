use std::path::PathBuf;
use std::string::FromUtf8Error;

use crate::remote::Endpoint;

/// All error types that can occur while bridging the remote server and a Wiz light.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize a bulb reply.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// A network socket operation failed while communicating with a bulb.
    #[error("socket {action} error: {err:?}")]
    Socket { action: String, err: std::io::Error },

    /// The UDP response from a bulb contained invalid UTF-8.
    #[error("utf8 decoding error: {0:?}")]
    Utf8Decode(FromUtf8Error),

    /// The bulb answered a command with an error object.
    #[error("bulb rejected command (code {code}): {message}")]
    Rejected { code: i64, message: String },

    /// The request to the remote server could not be completed.
    #[error("request to {endpoint} failed: {err}")]
    Request {
        endpoint: Endpoint,
        err: reqwest::Error,
    },

    /// The remote server answered with a non-success status code.
    #[error("{endpoint} answered with status {status}")]
    Status { endpoint: Endpoint, status: u16 },

    /// The remote server answered with a body that does not match the expected shape.
    #[error("malformed {endpoint} payload: {err}")]
    Payload {
        endpoint: Endpoint,
        err: serde_json::Error,
    },

    /// The light info carried a red component without green and blue.
    #[error("{endpoint} payload has an incomplete rgb triple")]
    IncompleteColor { endpoint: Endpoint },

    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    HttpClient(reqwest::Error),

    /// The configuration file could not be read.
    #[error("failed to read config {path:?}: {err}")]
    ConfigRead { path: PathBuf, err: std::io::Error },

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("failed to parse config: {0}")]
    ConfigParse(toml::de::Error),

    /// No API key was configured.
    #[error("no api key configured; set remote.api_key, --api-key or WIZ_BRIDGE_API_KEY")]
    MissingApiKey,

    /// The API key cannot be sent as an HTTP header value.
    #[error("api key contains characters not allowed in an http header")]
    InvalidApiKey,
}

impl Error {
    /// Create a new socket error
    pub fn socket(action: &str, err: std::io::Error) -> Self {
        Error::Socket {
            action: action.to_string(),
            err,
        }
    }

    /// The remote endpoint this error came from, if it is a remote fetch failure.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Error::Request { endpoint, .. }
            | Error::Status { endpoint, .. }
            | Error::Payload { endpoint, .. }
            | Error::IncompleteColor { endpoint } => Some(*endpoint),
            _ => None,
        }
    }
}
