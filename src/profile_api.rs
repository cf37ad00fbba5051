use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use log::{info, warn};
use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, ScraperError};

const BASE_URL: &str = "https://www.linkedin.com";

/// Contact details resolved for one profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactRecord {
    pub profile: String,
    pub email: Option<String>,
    pub websites: Vec<String>,
    pub social_handles: BTreeMap<String, String>,
    pub phone_numbers: Vec<String>,
}

impl ContactRecord {
    pub fn has_data(&self) -> bool {
        self.email.is_some()
            || !self.websites.is_empty()
            || !self.social_handles.is_empty()
            || !self.phone_numbers.is_empty()
    }
}

pub trait ProfileApi {
    /// Looks up contact details for a profile. `Ok(None)` means the profile
    /// could not be resolved; `Err` is reserved for transport failures.
    /// Either way the caller skips the profile.
    fn contact_info(&self, profile: &str) -> Result<Option<ContactRecord>>;
}

/// Resolves each profile in turn, skipping any that fail or come back empty.
/// A single bad lookup never aborts the batch.
pub fn enrich(profiles: &[String], api: &dyn ProfileApi) -> Vec<ContactRecord> {
    let mut records = Vec::new();
    for profile in profiles {
        match api.contact_info(profile) {
            Ok(Some(record)) if record.has_data() => {
                info!("Resolved contact info for {}", profile);
                records.push(record);
            }
            Ok(_) => info!("No contact info for {}, skipping.", profile),
            Err(e) => warn!("Lookup failed for {}: {}", profile, e),
        }
    }
    records
}

#[derive(Debug, Default, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    login_result: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContactPayload {
    #[serde(default, rename = "emailAddress")]
    email_address: Option<String>,
    #[serde(default)]
    websites: Vec<WebsiteEntry>,
    #[serde(default, rename = "twitterHandles")]
    twitter_handles: Vec<TwitterHandle>,
    #[serde(default, rename = "instantMessengers")]
    instant_messengers: Vec<MessengerEntry>,
    #[serde(default, rename = "phoneNumbers")]
    phone_numbers: Vec<PhoneEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct WebsiteEntry {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TwitterHandle {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MessengerEntry {
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PhoneEntry {
    #[serde(default)]
    number: Option<String>,
}

impl ContactPayload {
    fn into_record(self, profile: &str) -> ContactRecord {
        let mut social_handles = BTreeMap::new();
        for handle in self.twitter_handles {
            if let Some(name) = handle.name {
                social_handles.insert("twitter".to_string(), name);
            }
        }
        for messenger in self.instant_messengers {
            if let (Some(provider), Some(username)) = (messenger.provider, messenger.username) {
                social_handles.insert(provider, username);
            }
        }

        ContactRecord {
            profile: profile.to_string(),
            email: self.email_address,
            websites: self
                .websites
                .into_iter()
                .filter_map(|site| site.url)
                .filter(|raw| Url::parse(raw).is_ok())
                .collect(),
            social_handles,
            phone_numbers: self
                .phone_numbers
                .into_iter()
                .filter_map(|phone| phone.number)
                .collect(),
        }
    }
}

/// Authenticated session against the LinkedIn contact-info API. One session
/// is held for the whole enrichment phase and torn down with `logout`.
pub struct LinkedInClient {
    client: Client,
    csrf_token: String,
}

impl LinkedInClient {
    pub fn login(username: &str, password: &str) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .cookie_provider(jar.clone())
            .build()
            .expect("Failed to build profile client");

        // Seed an anonymous session; the JSESSIONID cookie doubles as the
        // CSRF token for every later call.
        let auth_url = format!("{}/uas/authenticate", BASE_URL);
        let seed = client.get(&auth_url).send()?;
        if !seed.status().is_success() {
            return Err(ScraperError::Login {
                reason: format!("session seed returned HTTP {}", seed.status()),
            });
        }
        let csrf_token = session_token(jar.as_ref()).ok_or_else(|| ScraperError::Login {
            reason: "no session cookie issued".to_string(),
        })?;

        let response = client
            .post(&auth_url)
            .header("csrf-token", &csrf_token)
            .form(&[
                ("session_key", username),
                ("session_password", password),
                ("JSESSIONID", csrf_token.as_str()),
            ])
            .send()?;
        if !response.status().is_success() {
            return Err(ScraperError::Login {
                reason: format!("authentication returned HTTP {}", response.status()),
            });
        }
        let outcome: AuthResponse = response.json()?;
        if outcome.login_result.as_deref() != Some("PASS") {
            return Err(ScraperError::Login {
                reason: outcome
                    .login_result
                    .unwrap_or_else(|| "no login result in response".to_string()),
            });
        }

        // The session cookie rotates on successful authentication.
        let csrf_token = session_token(jar.as_ref()).unwrap_or(csrf_token);
        Ok(LinkedInClient { client, csrf_token })
    }

    /// Best-effort session teardown.
    pub fn logout(&self) {
        let endpoint = format!("{}/uas/logout", BASE_URL);
        if let Err(e) = self
            .client
            .get(&endpoint)
            .header("csrf-token", &self.csrf_token)
            .send()
        {
            warn!("Logout request failed: {}", e);
        }
    }
}

impl ProfileApi for LinkedInClient {
    fn contact_info(&self, profile: &str) -> Result<Option<ContactRecord>> {
        let endpoint = format!(
            "{}/voyager/api/identity/profiles/{}/profileContactInfo",
            BASE_URL, profile
        );
        let response = self
            .client
            .get(&endpoint)
            .header("csrf-token", &self.csrf_token)
            .send()?;

        // Missing, private and throttled profiles are all skips.
        if !response.status().is_success() {
            return Ok(None);
        }

        let payload: ContactPayload = response.json()?;
        Ok(Some(payload.into_record(profile)))
    }
}

fn session_token(jar: &Jar) -> Option<String> {
    let base = Url::parse(BASE_URL).expect("base URL is valid");
    let header = jar.cookies(&base)?;
    let cookies = header.to_str().ok()?;
    cookies.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        if name == "JSESSIONID" {
            Some(value.trim_matches('"').to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedProfiles;

    impl ProfileApi for CannedProfiles {
        fn contact_info(&self, profile: &str) -> Result<Option<ContactRecord>> {
            match profile {
                "jane-doe-123" => Ok(Some(ContactRecord {
                    profile: profile.to_string(),
                    email: Some("j@x.com".to_string()),
                    ..Default::default()
                })),
                "broken-lookup" => Err(ScraperError::BadResponse {
                    status: 429,
                    body: "rate limited".to_string(),
                }),
                "empty-payload" => Ok(Some(ContactRecord {
                    profile: profile.to_string(),
                    ..Default::default()
                })),
                _ => Ok(None),
            }
        }
    }

    #[test]
    fn test_enrich_skips_failures_and_empty_payloads() {
        let profiles = vec![
            "jane-doe-123".to_string(),
            "broken-lookup".to_string(),
            "empty-payload".to_string(),
            "not-found".to_string(),
        ];
        let records = enrich(&profiles, &CannedProfiles);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].profile, "jane-doe-123");
        assert_eq!(records[0].email.as_deref(), Some("j@x.com"));
        assert!(records[0].websites.is_empty());
        assert!(records[0].social_handles.is_empty());
        assert!(records[0].phone_numbers.is_empty());
    }

    #[test]
    fn test_payload_maps_into_record() {
        let payload: ContactPayload = serde_json::from_str(
            r#"{
                "emailAddress": "jane@example.com",
                "websites": [
                    {"url": "https://janedoe.example.com"},
                    {"url": "not a url"},
                    {}
                ],
                "twitterHandles": [{"name": "janedoe"}],
                "instantMessengers": [{"provider": "skype", "username": "jane.doe"}],
                "phoneNumbers": [{"number": "+1 555 0100"}, {}]
            }"#,
        )
        .expect("payload parses");

        let record = payload.into_record("jane-doe-123");
        assert_eq!(record.profile, "jane-doe-123");
        assert_eq!(record.email.as_deref(), Some("jane@example.com"));
        assert_eq!(record.websites, vec!["https://janedoe.example.com"]);
        assert_eq!(record.social_handles["twitter"], "janedoe");
        assert_eq!(record.social_handles["skype"], "jane.doe");
        assert_eq!(record.phone_numbers, vec!["+1 555 0100"]);
        assert!(record.has_data());
    }

    #[test]
    fn test_empty_payload_has_no_data() {
        let payload: ContactPayload = serde_json::from_str("{}").expect("payload parses");
        let record = payload.into_record("jane-doe-123");
        assert!(!record.has_data());
    }
}
