use thiserror::Error;
use url::Url;

use crate::Endpoint;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("no page url to resolve the refresh endpoint against")]
    MissingPageUrl,
    #[error("invalid refresh endpoint {endpoint:?}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

/// The bare query parameter the server looks for, e.g. `refresh-live`.
pub fn refresh_param(refresh_type: &str) -> String {
    format!("refresh-{refresh_type}")
}

/// Resolve the request URL for one click. The query is replaced by the refresh parameter.
pub fn build_request_url(
    page_url: &Url,
    endpoint: &Endpoint,
    refresh_type: &str,
) -> Result<Url, RequestError> {
    let mut url = match endpoint {
        Endpoint::CurrentPath => page_url.clone(),
        Endpoint::Relative(path) => {
            page_url
                .join(path)
                .map_err(|err| RequestError::InvalidEndpoint {
                    endpoint: path.clone(),
                    message: err.to_string(),
                })?
        }
    };
    url.set_fragment(None);
    url.set_query(Some(&refresh_param(refresh_type)));
    Ok(url)
}
