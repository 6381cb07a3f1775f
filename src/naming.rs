use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Suffix appended to a key name to build the public key artifact name.
pub const PUBLIC_KEY_NAME_SUFFIX: &str = "_pub.pem";
/// Suffix appended to a key name to build the private key artifact name.
pub const PRIVATE_KEY_NAME_SUFFIX: &str = "_priv.pem";

/// Parameter Store names can't exceed 2048 characters.
pub const MAX_NAME_LENGTH: usize = 2048;

pub const NAMING_REQUIREMENTS: &str = "the name must start with a letter or a number, can only \
include alphanumeric characters, hyphens (-), underscores (_) and forward slashes (/), and must \
not exceed 2048 characters in length";

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_\-/]*$").expect("constant valid regex")
});

/// Checks if a string is a valid Parameter Store name.
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name) && name.len() <= MAX_NAME_LENGTH
}

pub fn public_artifact_name(name: &str) -> String {
    format!("{name}{PUBLIC_KEY_NAME_SUFFIX}")
}

pub fn private_artifact_name(name: &str) -> String {
    format!("{name}{PRIVATE_KEY_NAME_SUFFIX}")
}

/// Returns the last `/` delimited segment of a store path, which is the name used on disk.
///
/// Paths that are empty or end with a slash yield an empty string.
pub fn local_file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}

#[derive(Error, Debug, PartialEq)]
#[error(
    "invalid parameter store name `{0}`: {requirements}",
    requirements = NAMING_REQUIREMENTS
)]
pub struct KeyNameError(pub String);

/// A validated key name prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyName(String);

impl TryFrom<String> for KeyName {
    type Error = KeyNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if !is_valid_name(&value) {
            return Err(KeyNameError(value));
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for KeyName {
    type Error = KeyNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_string())
    }
}

impl AsRef<str> for KeyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a key inside a key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    Public,
    Private,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::Public => write!(f, "public"),
            KeyRole::Private => write!(f, "private"),
        }
    }
}

/// Public and private artifact names derived from a single key name.
///
/// These are used both as the remote parameter names and, through [local_file_name], as the
/// local file names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactNames {
    pub public: String,
    pub private: String,
}

impl ArtifactNames {
    pub fn name(&self, role: KeyRole) -> &str {
        match role {
            KeyRole::Public => &self.public,
            KeyRole::Private => &self.private,
        }
    }

    pub fn local_file_name(&self, role: KeyRole) -> &str {
        local_file_name(self.name(role))
    }
}

impl From<&KeyName> for ArtifactNames {
    fn from(name: &KeyName) -> Self {
        Self {
            public: public_artifact_name(name.as_ref()),
            private: private_artifact_name(name.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::nested_path("myapp/secrets/api_key", true)]
    #[case::plain("validName", true)]
    #[case::digits_only("123", true)]
    #[case::single_char("a", true)]
    #[case::hyphens_and_underscores("my-key_name", true)]
    #[case::trailing_slashes("a//", true)]
    #[case::max_length(&"a".repeat(2048), true)]
    #[case::below_max_length(&"a".repeat(2045), true)]
    #[case::empty("", false)]
    #[case::leading_slash("/myapp/key", false)]
    #[case::leading_underscore("_key", false)]
    #[case::leading_hyphen("-key", false)]
    #[case::space("my key", false)]
    #[case::dot("my.key", false)]
    #[case::unicode("clé", false)]
    #[case::too_long(&"a".repeat(2051), false)]
    #[case::just_too_long(&"a".repeat(2049), false)]
    fn test_is_valid_name(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_valid_name(name), expected);
    }

    #[test]
    fn test_artifact_names() {
        assert_eq!(public_artifact_name("myKey"), "myKey_pub.pem");
        assert_eq!(private_artifact_name("myKey"), "myKey_priv.pem");
        assert_eq!(public_artifact_name(""), "_pub.pem");
        assert_eq!(private_artifact_name(""), "_priv.pem");
    }

    #[rstest]
    #[case("secret", "secret")]
    #[case("/myapp/secrets/api_key", "api_key")]
    #[case("myapp/key_pub.pem", "key_pub.pem")]
    #[case("/", "")]
    #[case("///", "")]
    #[case("myparam/", "")]
    #[case("", "")]
    fn test_local_file_name(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(local_file_name(path), expected);
    }

    #[test]
    fn test_artifact_names_from_key_name() {
        let name = KeyName::try_from("myapp/secrets/api").unwrap();
        let names = ArtifactNames::from(&name);

        assert_eq!(names.public, "myapp/secrets/api_pub.pem");
        assert_eq!(names.private, "myapp/secrets/api_priv.pem");
        assert_eq!(names.local_file_name(KeyRole::Public), "api_pub.pem");
        assert_eq!(names.local_file_name(KeyRole::Private), "api_priv.pem");
    }

    #[test]
    fn test_invalid_key_name() {
        let err = KeyName::try_from("bad name").unwrap_err();
        assert_matches!(err, KeyNameError(name) => {
            assert_eq!(name, "bad name");
        });
        assert!(
            KeyName::try_from("")
                .unwrap_err()
                .to_string()
                .starts_with("invalid parameter store name ``")
        );
    }
}
