use crate::{error::Error, util};
use hyper::HeaderMap;

/// What to do when a scenario sends a second request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RedispatchPolicy {
    /// Send it and replace the captured response, logging a warning.
    Overwrite,
    /// Fail the step with [`Error::AlreadyDispatched`].
    Reject,
}

impl Default for RedispatchPolicy {
    fn default() -> Self {
        RedispatchPolicy::Overwrite
    }
}

#[derive(Debug, Clone)]
pub struct FeatureConfiguration {
    domain_name: Option<String>,
    default_headers: HeaderMap,
    default_cookie_path: String,
    redispatch_policy: RedispatchPolicy,
}

impl FeatureConfiguration {
    pub fn new() -> Self {
        Self {
            domain_name: None,
            default_headers: HeaderMap::new(),
            default_cookie_path: String::from("/"),
            redispatch_policy: RedispatchPolicy::default(),
        }
    }

    /// Prefix for request urls that carry no scheme, e.g. `http://localhost`.
    pub fn set_domain_name<S: Into<String>>(&mut self, domain_name: S) {
        self.domain_name = Some(domain_name.into());
    }

    pub fn domain_name(&self) -> Option<&String> {
        self.domain_name.as_ref()
    }

    /// Adds a header sent with every request of a scenario that sets no
    /// request headers of its own.
    pub fn add_default_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.default_headers
            .append(util::header_name(name)?, util::header_value(name, value)?);
        Ok(())
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn set_default_cookie_path<S: Into<String>>(&mut self, path: S) {
        self.default_cookie_path = path.into();
    }

    pub fn default_cookie_path(&self) -> &str {
        &self.default_cookie_path
    }

    pub fn set_redispatch_policy(&mut self, policy: RedispatchPolicy) {
        self.redispatch_policy = policy;
    }

    pub fn redispatch_policy(&self) -> RedispatchPolicy {
        self.redispatch_policy
    }
}

impl Default for FeatureConfiguration {
    fn default() -> Self {
        Self::new()
    }
}
