use regex::Regex;
use std::collections::HashSet;

use crate::search_api::PageResult;

pub struct Extractor {
    profile_regex: Regex,
    slug_filter: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            // Canonical person-path on linkedin.com. The slug runs until
            // whitespace or the next path segment; scheme and www. are optional.
            profile_regex: Regex::new(r"(?i)\b(?:https?://)?(?:www\.)?linkedin\.com/in/([^\s/]+)")
                .unwrap(),
            slug_filter: Regex::new(r"[^a-zA-Z0-9_-]").unwrap(),
        }
    }

    /// Reduces a URL to its canonical profile slug, or `None` for anything
    /// that is not a profile page.
    pub fn normalize(&self, url: &str) -> Option<String> {
        let captures = self.profile_regex.captures(url)?;
        let raw_slug = captures.get(1)?.as_str();
        let slug = self.slug_filter.replace_all(raw_slug, "");
        if slug.is_empty() {
            None
        } else {
            Some(slug.into_owned())
        }
    }

    /// Collects the profile slugs found on one SERP page, first sighting
    /// first. Entries without a URL are skipped.
    pub fn extract_page(&self, page: &PageResult) -> Vec<String> {
        let mut profiles = Vec::new();
        let mut seen = HashSet::new();
        for result in &page.content.results.organic {
            let url = match &result.url {
                Some(u) => u,
                None => continue,
            };
            if let Some(profile) = self.normalize(url) {
                if seen.insert(profile.clone()) {
                    profiles.push(profile);
                }
            }
        }
        profiles
    }
}
