//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{ia_err, DynamoError};
use dirs;
use std::path::PathBuf;

/// Generates the absolute file path of the path provided based on the underlying platform
///
/// # Arguments
///
/// * `file_path`: The file path that needs to be corrected
///
/// # Returns
///
/// The absolute file path to be used based on the platform being used. If the
/// home directory cannot be determined the path is returned unchanged.
///
pub(crate) fn expand_user_home(file_path: &str) -> String {
    if file_path.starts_with("~/") || file_path.starts_with("~\\") {
        if let Some(home_dir) = dirs::home_dir() {
            let full_path = home_dir.join(PathBuf::from(correct_path(&file_path[2..])));
            return format!("{}", full_path.display());
        }
    }
    String::from(file_path)
}

/// Generates the correct file path based on the platform
fn correct_path(file_path: &str) -> String {
    if cfg!(target_os = "windows") {
        file_path.replace('/', "\\")
    } else {
        String::from(file_path)
    }
}

/// Read a whole file (with `~` expanded) into a string.
pub(crate) fn file_to_string(filename: &str) -> Result<String, DynamoError> {
    let path = expand_user_home(filename);
    match std::fs::read_to_string(&path) {
        Ok(s) => Ok(s),
        Err(e) => ia_err!("error reading file '{}': {}", path, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_only_leading_tilde() {
        assert_eq!(expand_user_home("/etc/x"), "/etc/x");
        assert_eq!(expand_user_home("a/~/b"), "a/~/b");
        if let Some(home) = dirs::home_dir() {
            let p = expand_user_home("~/.aws/credentials");
            assert!(p.starts_with(&format!("{}", home.display())));
            assert!(p.ends_with("credentials"));
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(file_to_string("/definitely/not/here.pem").is_err());
    }
}
