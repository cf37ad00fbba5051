use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Fully-resolved secrets for both external APIs.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub serp_username: String,
    pub serp_password: String,
    pub profile_username: String,
    pub profile_password: String,
}

/// Secrets supplied on the command line. Any missing field falls back to the
/// credential file, then to an interactive prompt.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub serp_username: Option<String>,
    pub serp_password: Option<String>,
    pub profile_username: Option<String>,
    pub profile_password: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(default)]
    serp_username: Option<String>,
    #[serde(default)]
    serp_password: Option<String>,
    #[serde(default)]
    profile_username: Option<String>,
    #[serde(default)]
    profile_password: Option<String>,
}

impl StoredCredentials {
    fn load(path: &Path) -> Self {
        if !path.exists() {
            return StoredCredentials::default();
        }
        let mut file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to open credential file: {}", e);
                return StoredCredentials::default();
            }
        };
        let mut content = String::new();
        if let Err(e) = file.read_to_string(&mut content) {
            error!("Failed to read credential file: {}", e);
            return StoredCredentials::default();
        }
        match serde_json::from_str::<StoredCredentials>(&content) {
            Ok(stored) => stored,
            Err(e) => {
                error!("Failed to parse credential file: {}. Ignoring it.", e);
                StoredCredentials::default()
            }
        }
    }

    fn save(&self, path: &Path) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(j) => j,
            Err(e) => {
                error!("Failed to serialize credentials: {}", e);
                return;
            }
        };

        let mut file = match OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
        {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to open credential file for writing: {}", e);
                return;
            }
        };

        if let Err(e) = file.write_all(json.as_bytes()) {
            error!("Failed to write credential file: {}", e);
        } else {
            info!("Saved credentials to {:?}", path);
        }
    }
}

/// Resolves all four secrets, flag over file over prompt, and persists any
/// prompted value back to the credential file.
pub fn resolve(overrides: CredentialOverrides, path: &Path) -> Result<Credentials> {
    let mut stored = StoredCredentials::load(path);
    let mut prompted = false;

    let serp_username = pick(
        overrides.serp_username,
        &mut stored.serp_username,
        "Enter Oxylabs username: ",
        &mut prompted,
    )?;
    let serp_password = pick(
        overrides.serp_password,
        &mut stored.serp_password,
        "Enter Oxylabs password: ",
        &mut prompted,
    )?;
    let profile_username = pick(
        overrides.profile_username,
        &mut stored.profile_username,
        "Enter LinkedIn username: ",
        &mut prompted,
    )?;
    let profile_password = pick(
        overrides.profile_password,
        &mut stored.profile_password,
        "Enter LinkedIn password: ",
        &mut prompted,
    )?;

    if prompted {
        stored.save(path);
    }

    Ok(Credentials {
        serp_username,
        serp_password,
        profile_username,
        profile_password,
    })
}

fn pick(
    override_value: Option<String>,
    stored: &mut Option<String>,
    prompt_label: &str,
    prompted: &mut bool,
) -> Result<String> {
    if let Some(value) = override_value {
        return Ok(value);
    }
    if let Some(value) = stored.as_deref() {
        if !value.is_empty() {
            return Ok(value.to_string());
        }
    }
    let value = prompt_line(prompt_label)?;
    *stored = Some(value.clone());
    *prompted = true;
    Ok(value)
}

pub fn prompt_line(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
