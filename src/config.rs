use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,

    // Spreadsheet backend
    pub spreadsheet_id: String,
    pub google_client_email: String,
    pub google_private_key: String,
    pub attendance_sheet: String,
    pub site_visit_sheet: String,

    // Rate limiting
    pub rate_submit_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            spreadsheet_id: env::var("SPREADSHEET_ID").expect("SPREADSHEET_ID must be set"),
            google_client_email: env::var("GOOGLE_CLIENT_EMAIL")
                .expect("GOOGLE_CLIENT_EMAIL must be set"),
            // .env files carry the PEM with literal \n escapes
            google_private_key: env::var("GOOGLE_PRIVATE_KEY")
                .expect("GOOGLE_PRIVATE_KEY must be set")
                .replace("\\n", "\n"),
            attendance_sheet: env::var("ATTENDANCE_SHEET")
                .unwrap_or_else(|_| "Sheet1".to_string()),
            site_visit_sheet: env::var("SITE_VISIT_SHEET")
                .unwrap_or_else(|_| "Site Visits".to_string()),

            rate_submit_per_min: env::var("RATE_SUBMIT_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }
}
