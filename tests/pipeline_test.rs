use std::cell::RefCell;

use profile_scraper_lib::error::{Result, ScraperError};
use profile_scraper_lib::search_api::QueryResponse;
use profile_scraper_lib::{
    enrich, ContactRecord, HarvestParams, Harvester, ProfileApi, SearchApi, SerpRequest,
};

struct CannedSearch {
    responses: RefCell<Vec<&'static str>>,
    requested_pages: RefCell<Vec<u32>>,
}

impl CannedSearch {
    fn new(responses: Vec<&'static str>) -> Self {
        CannedSearch {
            responses: RefCell::new(responses),
            requested_pages: RefCell::new(Vec::new()),
        }
    }
}

impl SearchApi for CannedSearch {
    fn run_query(&self, request: &SerpRequest) -> Result<QueryResponse> {
        self.requested_pages.borrow_mut().push(request.start_page);
        let json = self.responses.borrow_mut().remove(0);
        Ok(serde_json::from_str(json).expect("canned response parses"))
    }
}

struct CannedProfiles;

impl ProfileApi for CannedProfiles {
    fn contact_info(&self, profile: &str) -> Result<Option<ContactRecord>> {
        match profile {
            "jane-doe-123" => Ok(Some(ContactRecord {
                profile: profile.to_string(),
                email: Some("j@x.com".to_string()),
                ..Default::default()
            })),
            "john-q-public" => Err(ScraperError::BadResponse {
                status: 429,
                body: "rate limited".to_string(),
            }),
            _ => Ok(None),
        }
    }
}

#[test]
fn test_harvest_and_enrich_end_to_end() {
    let run_one = r#"{"results":[{"content":{"results":{"organic":[
        {"url":"https://www.linkedin.com/in/jane-doe-123"},
        {"url":"https://linkedin.com/in/jane-doe-123/"}
    ]}}}]}"#;
    let run_two = r#"{"results":[{"content":{"results":{"organic":[
        {"url":"https://linkedin.com/in/john-q-public"}
    ]}}}]}"#;

    let search = CannedSearch::new(vec![run_one, run_two]);
    let harvester = Harvester::new();
    let params = HarvestParams {
        query: "site:example.com mayor".to_string(),
        start_page: 1,
        pages_per_run: 1,
        runs: 2,
    };

    let profiles = harvester.harvest(&params, &search).expect("harvest succeeds");

    // Two sequential requests with advancing page cursors, and the two
    // jane-doe URL variants collapse into one identifier.
    assert_eq!(*search.requested_pages.borrow(), vec![1, 2]);
    assert_eq!(profiles, vec!["jane-doe-123", "john-q-public"]);

    let records = enrich(&profiles, &CannedProfiles);

    // john-q-public's lookup failed, so only jane-doe-123 is reported.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].profile, "jane-doe-123");
    assert_eq!(records[0].email.as_deref(), Some("j@x.com"));
    assert!(records[0].websites.is_empty());
    assert!(records[0].social_handles.is_empty());
    assert!(records[0].phone_numbers.is_empty());
}
