// WAPI HTTP client
//
// Wraps `reqwest::Client` with WAPI URL construction, basic auth, query
// shaping, and envelope unwrapping. Object-specific knowledge (which type
// string, which return fields) lives in the caller; this module only knows
// how to move JSON to and from the appliance.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::query::QueryParams;
use crate::response::{GetResponse, ListResponse};
use crate::transport::TransportConfig;

// ── Error response shape from the appliance ──────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default, rename = "Error")]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

struct BasicAuth {
    username: String,
    password: SecretString,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the NIOS WAPI.
///
/// Every path is relative to `/wapi/v{version}/`: object types
/// (`bfdtemplate`, `threatprotection:profile`) for create and search,
/// references (`bfdtemplate/ZG5z...:name`) for read, update and delete.
pub struct WapiClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Option<BasicAuth>,
}

impl WapiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client that authenticates every request with HTTP basic auth.
    ///
    /// A cookie jar is added when the transport config has none, so the
    /// appliance's session cookie is reused across calls.
    pub fn new(
        base_url: &str,
        wapi_version: &str,
        username: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        let base_url = Self::normalize_base_url(base_url, wapi_version)?;

        Ok(Self {
            http,
            base_url,
            auth: Some(BasicAuth {
                username: username.to_owned(),
                password: password.clone(),
            }),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth).
    pub fn from_reqwest(
        base_url: &str,
        wapi_version: &str,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url, wapi_version)?;
        Ok(Self {
            http,
            base_url,
            auth: None,
        })
    }

    /// Build the base URL ending in `/wapi/v{version}/`.
    ///
    /// A URL that already carries a `/wapi/v...` path is kept as is.
    fn normalize_base_url(raw: &str, wapi_version: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        let has_wapi = path
            .rsplit('/')
            .next()
            .is_some_and(|last| last.starts_with('v'))
            && path.contains("/wapi/");

        if has_wapi {
            url.set_path(&format!("{path}/"));
        } else {
            let version = wapi_version.trim_start_matches('v');
            url.set_path(&format!("{path}/wapi/v{version}/"));
        }

        Ok(url)
    }

    /// The resolved `/wapi/v{version}/` base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append an object type or reference to the base URL.
    ///
    /// The path is appended rather than joined: object types such as
    /// `dtc:topology` would otherwise parse as a URL scheme. References
    /// arrive already escaped (`ZG5z:my%20tmpl`) and are kept as is.
    fn url(&self, path: &str) -> Result<Url, Error> {
        if self.base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        let mut url = self.base_url.clone();
        url.set_path(&format!(
            "{}{}",
            self.base_url.path(),
            path.trim_start_matches('/')
        ));
        Ok(url)
    }

    // ── HTTP plumbing ────────────────────────────────────────────────

    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<&B>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.url(path)?;
        let params = query.to_pairs();
        debug!("{method} {url} params={params:?}");

        let mut request = self.http.request(method, url).query(&params);
        if let Some(ref auth) = self.auth {
            request = request.basic_auth(&auth.username, Some(auth.password.expose_secret()));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    async fn handle_response<T: DeserializeOwned>(
        path: &str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(path, status, resp).await)
        }
    }

    async fn parse_error(path: &str, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: if raw.is_empty() {
                    "credentials rejected by the appliance".into()
                } else {
                    raw
                },
            };
        }

        let (message, code) = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(err) if err.text.is_some() || err.error.is_some() => {
                (err.text.or(err.error).unwrap_or_default(), err.code)
            }
            _ if raw.is_empty() => (status.to_string(), None),
            _ => (raw, None),
        };

        if status == reqwest::StatusCode::NOT_FOUND {
            return Error::NotFound {
                reference: path.to_owned(),
                message,
            };
        }

        Error::Wapi {
            status: status.as_u16(),
            message,
            code,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `POST {object_type}`: create an object and return it as the
    /// appliance stored it (shape controlled by `query`).
    pub async fn create<T, B>(
        &self,
        object_type: &str,
        body: &B,
        query: &QueryParams,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let resp = self.send(Method::POST, object_type, query, Some(body)).await?;
        let parsed: GetResponse<T> = Self::handle_response(object_type, resp).await?;
        Ok(parsed.into_inner())
    }

    /// `GET {reference}`: read a single object.
    pub async fn get<T: DeserializeOwned>(
        &self,
        reference: &str,
        query: &QueryParams,
    ) -> Result<T, Error> {
        let resp = self
            .send::<()>(Method::GET, reference, query, None)
            .await?;
        let parsed: GetResponse<T> = Self::handle_response(reference, resp).await?;
        Ok(parsed.into_inner())
    }

    /// `GET {object_type}`: one search/list call (a single page when
    /// `query` asks for paging).
    pub async fn list<T: DeserializeOwned>(
        &self,
        object_type: &str,
        query: &QueryParams,
    ) -> Result<ListResponse<T>, Error> {
        let resp = self
            .send::<()>(Method::GET, object_type, query, None)
            .await?;
        Self::handle_response(object_type, resp).await
    }

    /// Collect every page of a search into a single `Vec<T>`.
    ///
    /// Paging on the appliance requires `_return_as_object=1`, which is
    /// forced here.
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        object_type: &str,
        query: &QueryParams,
        page_size: u32,
    ) -> Result<Vec<T>, Error> {
        let first = query.clone().return_as_object().paging(page_size);
        let mut all = Vec::new();
        let mut page_query = first.clone();

        loop {
            let page: ListResponse<T> = self.list(object_type, &page_query).await?;
            let next = page.next_page_id().map(ToOwned::to_owned);
            let received = page.len();
            all.extend(page.into_items());

            match next {
                Some(page_id) if received > 0 => {
                    page_query = first.clone().page_id(page_id);
                }
                _ => break,
            }
        }

        debug!(object_type, count = all.len(), "collected all pages");
        Ok(all)
    }

    /// `PUT {reference}`: update an object and return the stored result.
    pub async fn update<T, B>(
        &self,
        reference: &str,
        body: &B,
        query: &QueryParams,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let resp = self.send(Method::PUT, reference, query, Some(body)).await?;
        let parsed: GetResponse<T> = Self::handle_response(reference, resp).await?;
        Ok(parsed.into_inner())
    }

    /// `DELETE {reference}`: returns the reference of the deleted object.
    pub async fn delete(&self, reference: &str) -> Result<String, Error> {
        let resp = self
            .send::<()>(Method::DELETE, reference, &QueryParams::new(), None)
            .await?;
        let parsed: GetResponse<String> = Self::handle_response(reference, resp).await?;
        Ok(parsed.into_inner())
    }
}
