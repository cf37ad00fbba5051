use profile_scraper_lib::{credentials, logger};
use profile_scraper_lib::{
    enrich, ContactRecord, CredentialOverrides, HarvestParams, Harvester, LinkedInClient,
    OxylabsClient, Result,
};

use std::fs::OpenOptions;
use std::path::Path;
use clap::Parser;
use log::{error, info};
use chrono::Local;

mod args;
use args::Args;

fn main() {
    logger::init();
    let args = Args::parse();

    // A user-requested stop is not an error; no partial results are flushed.
    ctrlc::set_handler(|| {
        println!("\nCaught interrupt, ending search.");
        std::process::exit(0);
    })
    .expect("Failed to set interrupt handler");

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let overrides = CredentialOverrides {
        serp_username: args.serp_username.clone(),
        serp_password: args.serp_password.clone(),
        profile_username: args.profile_username.clone(),
        profile_password: args.profile_password.clone(),
    };
    let creds = credentials::resolve(overrides, Path::new(credentials::CREDENTIALS_FILE))?;

    let query = match args.query.clone() {
        Some(q) => q,
        None => credentials::prompt_line("Enter search query: ")?,
    };

    // A failed profile login must abort before any harvesting starts.
    let profile_client = LinkedInClient::login(&creds.profile_username, &creds.profile_password)?;
    info!("Profile session established.");

    let search_client = OxylabsClient::new(&creds.serp_username, &creds.serp_password);
    let params = HarvestParams {
        query,
        start_page: args.start_page,
        pages_per_run: args.pages,
        runs: args.runs,
    };

    let harvester = Harvester::new();
    let profiles = harvester.harvest(&params, &search_client)?;

    let records = enrich(&profiles, &profile_client);
    profile_client.logout();

    for record in &records {
        println!(
            "{}, email: {}, websites: {}, handles: {}, phones: {}",
            record.profile,
            record.email.as_deref().unwrap_or("-"),
            record.websites.join("; "),
            record
                .social_handles
                .iter()
                .map(|(platform, handle)| format!("{}:{}", platform, handle))
                .collect::<Vec<_>>()
                .join("; "),
            record.phone_numbers.join("; "),
        );
    }

    write_report(&records, Path::new(&args.output))?;
    info!(
        "Done. {} of {} profiles yielded contact info; report written to {}",
        records.len(),
        profiles.len(),
        args.output
    );
    Ok(())
}

fn write_report(records: &[ContactRecord], path: &Path) -> Result<()> {
    let file_exists = path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if !file_exists {
        csv_writer.write_record([
            "profile",
            "email",
            "websites",
            "social_handles",
            "phone_numbers",
            "timestamp",
        ])?;
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    for record in records {
        let handles = record
            .social_handles
            .iter()
            .map(|(platform, handle)| format!("{}:{}", platform, handle))
            .collect::<Vec<_>>()
            .join("; ");
        csv_writer.write_record([
            record.profile.as_str(),
            record.email.as_deref().unwrap_or(""),
            &record.websites.join("; "),
            &handles,
            &record.phone_numbers.join("; "),
            &timestamp,
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}
