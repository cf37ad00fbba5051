use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "profile-scraper")]
#[command(about = "LinkedIn contact scraper driven by the Oxylabs SERP API")]
#[command(version)]
pub struct Args {
    /// Search query, e.g. "site:linkedin.com ohio mayor" (prompted if omitted)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Oxylabs username
    #[arg(long)]
    pub serp_username: Option<String>,

    /// Oxylabs password
    #[arg(long)]
    pub serp_password: Option<String>,

    /// LinkedIn username
    #[arg(long)]
    pub profile_username: Option<String>,

    /// LinkedIn password
    #[arg(long)]
    pub profile_password: Option<String>,

    /// Number of search runs
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub runs: u32,

    /// Pages fetched per run
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Page the first run starts from
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub start_page: u32,

    /// CSV file the contact report is appended to
    #[arg(long, default_value = "contacts.csv")]
    pub output: String,
}
