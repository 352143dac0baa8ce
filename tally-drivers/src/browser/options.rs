/// How the WebDriver session is launched.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Running chromedriver (or compatible) endpoint.
    pub webdriver_url: String,
    pub headless: bool,
    pub user_agent: String,
    /// Accept-Language list handed to the browser, most preferred first.
    pub languages: Vec<String>,
    pub viewport: (u32, u32),
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
            user_agent:
                "Mozilla/5.0 (X11; Linux x86_64; rv:91.0) Gecko/20100101 Firefox/91.0".to_string(),
            languages: vec!["de-DE".to_string(), "de".to_string()],
            viewport: (1280, 900),
        }
    }
}

/// Construct Chrome command-line arguments for the session.
pub fn chrome_arguments(options: &BrowserOptions) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        format!("--user-agent={}", options.user_agent),
        format!("--window-size={},{}", options.viewport.0, options.viewport.1),
    ];
    if !options.languages.is_empty() {
        args.push(format!("--lang={}", options.languages.join(",")));
    }
    if options.headless {
        args.push("--headless".to_string());
        args.push("--disable-gpu".to_string());
    }
    args
}
