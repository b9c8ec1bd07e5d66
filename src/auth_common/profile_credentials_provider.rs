//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::{
    credentials_error, Credentials, CredentialsProvider,
};
use crate::auth_common::file_utils::expand_user_home;
use crate::error::DynamoError;
use ini::Ini;
use std::sync::OnceLock;

pub(crate) const DEFAULT_CREDENTIALS_FILE_PATH: &str = "~/.aws/credentials";
pub(crate) const DEFAULT_CONFIG_FILE_PATH: &str = "~/.aws/config";
pub(crate) const DEFAULT_PROFILE: &str = "default";
const ACCESS_KEY_ID: &str = "aws_access_key_id";
const SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
const SESSION_TOKEN: &str = "aws_session_token";
const REGION: &str = "region";

/// A credentials provider that reads a named profile from the shared AWS
/// credentials and config files.
///
/// Keys are looked up first in the credentials file (section `[name]`), then in
/// the config file (section `[profile name]`, or `[default]`). The files are read
/// once, on first use.
#[derive(Debug, Clone)]
pub struct ProfileCredentialsProvider {
    credentials_file: String,
    config_file: String,
    profile: String,
    loaded: OnceLock<Result<ProfileData, DynamoError>>,
}

#[derive(Debug, Clone, Default)]
struct ProfileData {
    credentials: Option<Credentials>,
    region: Option<String>,
}

fn get_section_variable(props: &ini::Properties, var: &str) -> Option<String> {
    props
        .get(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ProfileCredentialsProvider {
    /// Creates a provider for the given profile using the default file locations
    /// (`~/.aws/credentials` and `~/.aws/config`).
    pub fn new(profile: &str) -> Self {
        Self::new_from_files(DEFAULT_CREDENTIALS_FILE_PATH, DEFAULT_CONFIG_FILE_PATH, profile)
    }

    /// Creates a provider for the given profile using specific file locations.
    ///
    /// Either file may be missing, as long as one of them holds the profile's keys.
    pub fn new_from_files(credentials_file: &str, config_file: &str, profile: &str) -> Self {
        ProfileCredentialsProvider {
            credentials_file: credentials_file.to_string(),
            config_file: config_file.to_string(),
            profile: profile.to_string(),
            loaded: OnceLock::new(),
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// The `region` configured for this profile in the config file, if any.
    pub fn region(&self) -> Option<String> {
        match self.load() {
            Ok(d) => d.region.clone(),
            Err(_) => None,
        }
    }

    fn load(&self) -> &Result<ProfileData, DynamoError> {
        self.loaded.get_or_init(|| self.read_files())
    }

    fn read_files(&self) -> Result<ProfileData, DynamoError> {
        tracing::debug!(
            "Reading profile '{}' from {} and {}",
            self.profile,
            self.credentials_file,
            self.config_file
        );
        let mut data = ProfileData::default();
        let mut akid: Option<String> = None;
        let mut secret: Option<String> = None;
        let mut token: Option<String> = None;

        if let Some(creds) = self.load_ini(&self.credentials_file)? {
            if let Some(props) = creds.section(Some(self.profile.as_str())) {
                akid = get_section_variable(props, ACCESS_KEY_ID);
                secret = get_section_variable(props, SECRET_ACCESS_KEY);
                token = get_section_variable(props, SESSION_TOKEN);
            }
        }
        if let Some(config) = self.load_ini(&self.config_file)? {
            let section_name = if self.profile == DEFAULT_PROFILE {
                DEFAULT_PROFILE.to_string()
            } else {
                format!("profile {}", self.profile)
            };
            if let Some(props) = config.section(Some(section_name.as_str())) {
                data.region = get_section_variable(props, REGION);
                if akid.is_none() {
                    akid = get_section_variable(props, ACCESS_KEY_ID);
                    secret = get_section_variable(props, SECRET_ACCESS_KEY);
                    token = get_section_variable(props, SESSION_TOKEN);
                }
            }
        }
        if let (Some(a), Some(s)) = (akid, secret) {
            data.credentials = Some(Credentials {
                access_key_id: a,
                secret_access_key: s,
                session_token: token,
            });
        }
        Ok(data)
    }

    // A missing file is not an error; an unreadable or malformed one is.
    fn load_ini(&self, file: &str) -> Result<Option<Ini>, DynamoError> {
        let path = expand_user_home(file);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(credentials_error(
                    self.name(),
                    &format!("error reading file '{}': {}", path, e),
                ))
            }
        };
        match Ini::load_from_str(&content) {
            Ok(i) => Ok(Some(i)),
            Err(e) => Err(credentials_error(
                self.name(),
                &format!("error parsing file '{}': {}", path, e),
            )),
        }
    }
}

impl CredentialsProvider for ProfileCredentialsProvider {
    fn credentials(&self) -> Result<Credentials, DynamoError> {
        match self.load() {
            Ok(ProfileData {
                credentials: Some(c),
                ..
            }) => Ok(c.clone()),
            Ok(_) => Err(credentials_error(
                self.name(),
                &format!(
                    "profile '{}' has no {}/{} in {} or {}",
                    self.profile,
                    ACCESS_KEY_ID,
                    SECRET_ACCESS_KEY,
                    self.credentials_file,
                    self.config_file
                ),
            )),
            Err(e) => Err(e.clone()),
        }
    }
    fn name(&self) -> &'static str {
        "profile"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path.display().to_string()
    }

    #[test]
    fn reads_credentials_and_region() {
        let dir = tempfile::tempdir().unwrap();
        let creds = write_file(
            &dir,
            "credentials",
            "[default]\naws_access_key_id = AKID1\naws_secret_access_key = SECRET1\n\n\
             [dev]\naws_access_key_id=AKID2\naws_secret_access_key=SECRET2\naws_session_token=TOK2\n",
        );
        let config = write_file(
            &dir,
            "config",
            "[default]\nregion = us-west-2\n\n[profile dev]\nregion = eu-central-1\n",
        );

        let p = ProfileCredentialsProvider::new_from_files(&creds, &config, "default");
        let c = p.credentials().unwrap();
        assert_eq!(c.access_key_id(), "AKID1");
        assert_eq!(c.session_token(), None);
        assert_eq!(p.region().as_deref(), Some("us-west-2"));

        let p = ProfileCredentialsProvider::new_from_files(&creds, &config, "dev");
        let c = p.credentials().unwrap();
        assert_eq!(c.access_key_id(), "AKID2");
        assert_eq!(c.secret_access_key(), "SECRET2");
        assert_eq!(c.session_token(), Some("TOK2"));
        assert_eq!(p.region().as_deref(), Some("eu-central-1"));
    }

    #[test]
    fn keys_in_config_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_file(
            &dir,
            "config",
            "[profile ci]\naws_access_key_id=AKID3\naws_secret_access_key=SECRET3\n",
        );
        let missing = dir.path().join("nope").display().to_string();
        let p = ProfileCredentialsProvider::new_from_files(&missing, &config, "ci");
        assert_eq!(p.credentials().unwrap().access_key_id(), "AKID3");
        assert_eq!(p.region(), None);
    }

    #[test]
    fn missing_profile_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let creds = write_file(&dir, "credentials", "[default]\naws_access_key_id=A\n");
        let missing = dir.path().join("nope").display().to_string();
        let p = ProfileCredentialsProvider::new_from_files(&creds, &missing, "other");
        let e = p.credentials().unwrap_err();
        assert_eq!(e.code, crate::error::ErrorCode::CredentialsError);
        assert!(e.message.contains("'other'"));
        // a profile with only half a key pair is no better
        let p = ProfileCredentialsProvider::new_from_files(&creds, &missing, "default");
        assert!(p.credentials().is_err());
    }
}
