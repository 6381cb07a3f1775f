use aws_config::{BehaviorVersion, ConfigLoader, Region};
use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::types::ParameterType;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use super::config::StoreConfig;
use super::{SecretStore, SecretStoreError};

/// Secret store backed by AWS Systems Manager Parameter Store.
///
/// The SDK is asynchronous, so the store owns a current-thread runtime and blocks on every call.
pub struct ParameterStore {
    client: Client,
    runtime: Runtime,
}

impl ParameterStore {
    pub fn try_new(config: &StoreConfig) -> Result<Self, SecretStoreError> {
        Self::try_from_loader(config_loader(config))
    }

    fn try_from_loader(loader: ConfigLoader) -> Result<Self, SecretStoreError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SecretStoreError::ClientBuilder(e.to_string()))?;
        let sdk_config = runtime.block_on(loader.load());

        if sdk_config.region().is_none() {
            return Err(SecretStoreError::ClientBuilder(String::from(
                "no region configured, use --region or set AWS_REGION",
            )));
        }
        debug!(region = ?sdk_config.region(), "parameter store client ready");

        Ok(Self {
            client: Client::new(&sdk_config),
            runtime,
        })
    }
}

/// Loader for the SDK configuration, unset values are left to the default provider chain.
fn config_loader(config: &StoreConfig) -> ConfigLoader {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = config.region() {
        loader = loader.region(Region::new(region.to_string()));
    }
    if let Some(endpoint_url) = config.endpoint_url() {
        loader = loader.endpoint_url(endpoint_url);
    }
    if let Some(profile) = config.profile() {
        loader = loader.profile_name(profile);
    }
    loader
}

impl SecretStore for ParameterStore {
    fn put_secret(&self, name: &str, value: &str) -> Result<(), SecretStoreError> {
        let request = self
            .client
            .put_parameter()
            .name(name)
            .value(value)
            .r#type(ParameterType::SecureString)
            .overwrite(true)
            .send();

        let output = self.runtime.block_on(request).map_err(|e| {
            SecretStoreError::Write(name.to_string(), DisplayErrorContext(e).to_string())
        })?;
        debug!(name, version = output.version(), "parameter written");
        Ok(())
    }

    fn get_secret(&self, name: &str) -> Result<String, SecretStoreError> {
        let request = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send();

        let output = self.runtime.block_on(request).map_err(|e| {
            SecretStoreError::Read(name.to_string(), DisplayErrorContext(e).to_string())
        })?;
        debug!(name, "parameter read");

        output
            .parameter()
            .and_then(|parameter| parameter.value())
            .map(str::to_string)
            .ok_or_else(|| SecretStoreError::MissingValue(name.to_string()))
    }
}
