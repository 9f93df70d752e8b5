use crate::{
    error::{
        Error,
        Result,
    },
    model::{
        Datacenter,
        Group,
        Link,
        Scope,
        ServerId,
        ServerRecord,
    },
    provider::Provider,
};
use async_trait::async_trait;
use reqwest::{
    RequestBuilder,
    Response,
};
use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.ctl.io/v2/";

/// HTTP client for the CLC v2 API.
///
/// `reqwest::Client` is a handle to a shared connection pool; clones are
/// cheap and requests issued from different tasks do not share any state.
#[derive(Debug, Clone)]
pub struct ClcClient {
    http: reqwest::Client,
    base_url: Url,
    bearer_token: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Response of `POST authentication/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    #[serde(default)]
    pub user_name: String,
    pub account_alias: Scope,
    #[serde(default)]
    pub location_alias: Option<String>,
    pub bearer_token: String,
}

#[derive(Deserialize)]
struct DatacenterGroupLinks {
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

impl ClcClient {
    pub fn new(mut base_url: Url) -> Self {
        // directory form, `endpoint` pops the trailing empty segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            bearer_token: None,
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// Exchange username and password for a bearer token.
    ///
    /// The returned client is authenticated; [`Login::account_alias`] is the
    /// account the credentials belong to.
    #[instrument(level = "debug", skip(self, password))]
    pub async fn login(self, username: &str, password: &str) -> Result<(Self, Login)> {
        let url = self.endpoint(&["authentication", "login"])?;
        let response = self
            .http
            .post(url.clone())
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let login: Login = decode(&url, response).await?;
        info!(user = %login.user_name, alias = %login.account_alias, "logged in to CLC");
        let client = self.with_bearer_token(login.bearer_token.clone());
        Ok((client, login))
    }

    /// Appends `segments` to the base URL. Each segment is percent-encoded,
    /// so an id containing `/`, `?` or `#` stays a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::provider(format!("{} cannot be used as API base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        trace!(%url, "GET");
        let response = self.authorize(self.http.get(url.clone())).send().await?;
        decode(&url, response).await
    }
}

async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ApiMessage>(&body)
            .map(|m| m.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
        debug!(%url, %status, %message, "CLC API request failed");
        return Err(Error::ApiFailure {
            status: status.as_u16(),
            message,
        });
    }
    serde_json::from_slice(&body).map_err(|err| Error::MalformedRecord(format!("{url}: {err}")))
}

#[async_trait]
impl Provider for ClcClient {
    async fn list_datacenters(&self, scope: &Scope) -> Result<Vec<Datacenter>> {
        self.get(self.endpoint(&["datacenters", scope.as_str()])?).await
    }

    async fn list_top_groups(&self, scope: &Scope, datacenter: &Datacenter) -> Result<Vec<Group>> {
        let mut url = self.endpoint(&["datacenters", scope.as_str(), datacenter.id.as_str()])?;
        url.query_pairs_mut().append_pair("groupLinks", "true");
        let datacenter_links: DatacenterGroupLinks = self.get(url).await?;

        let root_id = datacenter_links
            .links
            .iter()
            .find(|link| link.rel == "group")
            .and_then(|link| link.id.as_deref())
            .ok_or_else(|| Error::provider(format!("datacenter {datacenter} has no root group")))?;

        let root: Group = self.get(self.endpoint(&["groups", scope.as_str(), root_id])?).await?;
        debug!(%datacenter, root = %root.name, children = root.groups.len(), "fetched root group");
        Ok(root.groups)
    }

    async fn fetch_server_detail(&self, scope: &Scope, server: &ServerId) -> Result<ServerRecord> {
        self.get(self.endpoint(&["servers", scope.as_str(), server.as_str()])?).await
    }
}
