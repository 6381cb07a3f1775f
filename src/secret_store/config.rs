use http::Uri;
use std::env;
use std::env::VarError;
use std::fmt::Display;

const AWS_REGION_ENV_NAME: &str = "AWS_REGION";
const AWS_DEFAULT_REGION_ENV_NAME: &str = "AWS_DEFAULT_REGION";

#[derive(thiserror::Error, Debug)]
pub enum StoreConfigError {
    #[error("invalid endpoint url `{0}`: `{1}`")]
    InvalidEndpointUrl(String, String),
    #[error("invalid region `{0}`")]
    InvalidRegion(String),
}

/// Type to represent an endpoint Url overriding the default Parameter Store endpoint.
/// It allows representing empty urls and perform basic uri validations.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct EndpointUrl(Option<Uri>);

impl TryFrom<&str> for EndpointUrl {
    type Error = StoreConfigError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if s.is_empty() {
            return Ok(Self(None));
        }
        let uri = s
            .parse::<Uri>()
            .map_err(|err| StoreConfigError::InvalidEndpointUrl(s.to_string(), err.to_string()))?;
        if uri.scheme().is_none() || uri.host().is_none() {
            return Err(StoreConfigError::InvalidEndpointUrl(
                s.to_string(),
                String::from("scheme and host are required"),
            ));
        }
        Ok(Self(Some(uri)))
    }
}

impl Display for EndpointUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(url) => write!(f, "{url}"),
            None => write!(f, ""),
        }
    }
}

impl EndpointUrl {
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Connection settings for the Parameter Store client.
///
/// Anything left unset is resolved by the AWS default provider chain (shared config files,
/// instance metadata, ...).
#[derive(Debug, PartialEq, Clone, Default)]
pub struct StoreConfig {
    region: Option<String>,
    endpoint_url: EndpointUrl,
    profile: Option<String>,
}

impl StoreConfig {
    pub fn new(
        region: Option<String>,
        endpoint_url: Option<String>,
        profile: Option<String>,
    ) -> Result<Self, StoreConfigError> {
        let region = region.filter(|r| !r.is_empty());
        if let Some(region) = &region {
            validate_region(region)?;
        }
        let endpoint_url = EndpointUrl::try_from(endpoint_url.unwrap_or_default().as_str())?;
        Ok(Self {
            region,
            endpoint_url,
            profile: profile.filter(|p| !p.is_empty()),
        })
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn endpoint_url(&self) -> Option<String> {
        (!self.endpoint_url.is_empty())
            .then(|| self.endpoint_url.to_string().trim_end_matches('/').to_string())
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Returns a new instance whose region is taken from the standard environment variables if needed.
    pub fn try_with_region_from_env(self) -> Result<Self, StoreConfigError> {
        self.with_env_aware_region(env::var)
    }

    /// Returns a new instance setting up the region using the provided `env_var` function to get
    /// it from the environment if required. It fails if the region from the environment is not valid.
    fn with_env_aware_region<F>(self, env_var: F) -> Result<Self, StoreConfigError>
    where
        F: Fn(&'static str) -> Result<String, VarError>,
    {
        if self.region.is_some() {
            return Ok(self);
        }
        let region = env_var(AWS_REGION_ENV_NAME)
            .ok()
            .filter(|r| !r.is_empty())
            .or_else(|| {
                env_var(AWS_DEFAULT_REGION_ENV_NAME)
                    .ok()
                    .filter(|r| !r.is_empty())
            });
        if let Some(region) = &region {
            validate_region(region)?;
        }
        Ok(StoreConfig { region, ..self })
    }
}

fn validate_region(region: &str) -> Result<(), StoreConfigError> {
    if region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        Ok(())
    } else {
        Err(StoreConfigError::InvalidRegion(region.to_string()))
    }
}
