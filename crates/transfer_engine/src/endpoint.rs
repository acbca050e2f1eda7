use url::Url;

use crate::{FailureKind, TransportError};

pub const DEFAULT_ACTION: &str = "adminapi:transfer";
pub const STATUS_METHOD: &str = "getSyncProgress";
pub const RUN_METHOD: &str = "run";
pub const ABORT_METHOD: &str = "abortQueue";

/// Builds `{webroot}/{action}/{method}/{k1}/{v1}/.../` with a trailing slash.
///
/// Segments are percent-encoded where needed; `/` inside a value cannot split it.
pub fn ajax_url(
    webroot: &str,
    action: &str,
    method: &str,
    attributes: &[(&str, &str)],
) -> Result<Url, TransportError> {
    let mut url = Url::parse(webroot)
        .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))?;
    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            TransportError::new(FailureKind::InvalidUrl, format!("{webroot} cannot be a base"))
        })?;
        segments.pop_if_empty().push(action).push(method);
        for (key, value) in attributes {
            segments.push(key).push(value);
        }
        segments.push("");
    }
    Ok(url)
}

/// The three backend calls the poller and controller need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub status: Url,
    pub run: Url,
    pub abort: Url,
}

impl Endpoints {
    pub fn new(webroot: &str, action: &str) -> Result<Self, TransportError> {
        Ok(Self {
            status: ajax_url(webroot, action, STATUS_METHOD, &[])?,
            run: ajax_url(webroot, action, RUN_METHOD, &[])?,
            abort: ajax_url(webroot, action, ABORT_METHOD, &[])?,
        })
    }

    pub fn with_default_action(webroot: &str) -> Result<Self, TransportError> {
        Self::new(webroot, DEFAULT_ACTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_action_and_method_path() {
        let url = ajax_url("http://localhost:8080/app", DEFAULT_ACTION, RUN_METHOD, &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/app/adminapi:transfer/run/");
    }

    #[test]
    fn trailing_slash_on_webroot_is_not_doubled() {
        let url = ajax_url("http://localhost/", "admin", "status", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost/admin/status/");
    }

    #[test]
    fn attributes_become_key_value_segments() {
        let url = ajax_url(
            "https://example.com",
            DEFAULT_ACTION,
            STATUS_METHOD,
            &[("job", "7"), ("mode", "full sync")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/adminapi:transfer/getSyncProgress/job/7/mode/full%20sync/"
        );
    }

    #[test]
    fn relative_webroot_is_rejected() {
        let err = ajax_url("/app", DEFAULT_ACTION, RUN_METHOD, &[]).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);

        let err = ajax_url("mailto:ops@example.com", DEFAULT_ACTION, RUN_METHOD, &[]).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }

    #[test]
    fn endpoints_cover_all_methods() {
        let endpoints = Endpoints::with_default_action("http://h").unwrap();
        assert!(endpoints.status.path().ends_with("/getSyncProgress/"));
        assert!(endpoints.run.path().ends_with("/run/"));
        assert!(endpoints.abort.path().ends_with("/abortQueue/"));
    }
}
