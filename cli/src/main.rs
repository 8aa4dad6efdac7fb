mod wizard;

use std::io::{self, BufRead, Write};

use clap::{Args, Parser, Subcommand};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::wizard::{RatingWizard, Step};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing admin token; run `login` and pass --token or set OEH_TOKEN")]
    MissingToken,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("HTTP {status}: {detail}")]
    Server { status: u16, detail: String },
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("knowledge base: {0}")]
    Knowledge(#[from] oehli::KnowledgeError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("aborted")]
    Aborted,
}

#[derive(Parser, Debug)]
#[command(name = "oeh-cli", about = "ÖH Wirtschaft API client")]
struct Cli {
    #[arg(long, env = "OEH_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    #[arg(long, env = "OEH_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    token: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    /// Sign in and print the bearer token.
    Login {
        username: String,
        #[arg(long, env = "OEH_PASSWORD")]
        password: String,
    },
    /// Published news.
    News,
    Lvas(LvaArgs),
    /// Rate an LVA interactively: email, code, effort, difficulty, review.
    Rate { lva_id: i64 },
    /// Ask ÖHli. Answers locally unless --remote is set.
    Ask {
        #[arg(long, default_value_t = false)]
        remote: bool,
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    Admin(AdminCommand),
}

#[derive(Args, Debug)]
struct LvaArgs {
    #[arg(long)]
    search: Option<String>,
    /// Show the best rated LVAs instead of the full list.
    #[arg(long)]
    top: Option<i64>,
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    Me,
    Stats,
    Activity {
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
    /// Insert the built-in LVA catalogue.
    ImportLvas,
    Codes(CodesCommand),
    SetContactEmails {
        /// Comma separated recipients.
        emails: String,
    },
}

#[derive(Args, Debug)]
struct CodesCommand {
    #[command(subcommand)]
    command: CodesSubcommand,
}

#[derive(Subcommand, Debug)]
enum CodesSubcommand {
    List,
    Create {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value_t = 1)]
        max_uses: i32,
        #[arg(long, default_value_t = 30)]
        expires_in_days: i64,
    },
    Delete {
        code_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url, token: cli.token };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Login { username, password } => run_login(&ctx, &username, &password).await,
        Command::News => print_json(&public_request(&ctx, reqwest::Method::GET, "/api/news", None).await?),
        Command::Lvas(args) => run_lvas(&ctx, args).await,
        Command::Rate { lva_id } => run_rate(&ctx, lva_id).await,
        Command::Ask { remote, query } => run_ask(&ctx, remote, &query.join(" ")).await,
        Command::Admin(admin) => run_admin(&ctx, admin).await,
    }
}

async fn run_ping(cli: &CliContext) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}/healthz", cli.base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Server { status: status.as_u16(), detail: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_login(cli: &CliContext, username: &str, password: &str) -> Result<(), CliError> {
    let body = serde_json::json!({ "username": username, "password": password });
    let json = public_request(cli, reqwest::Method::POST, "/api/auth/login", Some(body)).await?;
    let token = json
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or(CliError::MissingField("access_token"))?;
    println!("{token}");
    Ok(())
}

async fn run_lvas(cli: &CliContext, args: LvaArgs) -> Result<(), CliError> {
    let path = match (args.top, args.search) {
        (Some(limit), _) => format!("/api/lvas/top?limit={limit}"),
        (None, Some(search)) => format!("/api/lvas?search={}", encode_query(&search)),
        (None, None) => "/api/lvas".to_owned(),
    };
    print_json(&public_request(cli, reqwest::Method::GET, &path, None).await?)
}

async fn run_ask(cli: &CliContext, remote: bool, query: &str) -> Result<(), CliError> {
    let reply = if remote {
        let body = serde_json::json!({ "query": query });
        public_request(cli, reqwest::Method::POST, "/api/oehli/ask", Some(body)).await?
    } else {
        let matcher = oehli::Matcher::embedded()?;
        match matcher.find_response(query) {
            Some(reply) => serde_json::to_value(reply)?,
            None => serde_json::to_value(matcher.greeting())?,
        }
    };

    if let Some(text) = reply.get("text").and_then(Value::as_str) {
        println!("{text}");
    }
    for button in reply.get("buttons").and_then(Value::as_array).into_iter().flatten() {
        let label = button.get("label").and_then(Value::as_str).unwrap_or_default();
        match (button.get("query").and_then(Value::as_str), button.get("link").and_then(Value::as_str)) {
            (Some(q), _) => println!("  [{label}] -> frag: {q}"),
            (None, Some(link)) => println!("  [{label}] -> {link}"),
            (None, None) => println!("  [{label}]"),
        }
    }
    Ok(())
}

async fn run_admin(cli: &CliContext, admin: AdminCommand) -> Result<(), CliError> {
    use reqwest::Method;

    let json = match admin.command {
        AdminSubcommand::Me => api_request(cli, Method::GET, "/api/auth/me", None).await?,
        AdminSubcommand::Stats => api_request(cli, Method::GET, "/api/stats", None).await?,
        AdminSubcommand::Activity { limit } => {
            api_request(cli, Method::GET, &format!("/api/activity?limit={limit}"), None).await?
        }
        AdminSubcommand::ImportLvas => api_request(cli, Method::POST, "/api/admin/lvas/import", None).await?,
        AdminSubcommand::Codes(codes) => match codes.command {
            CodesSubcommand::List => api_request(cli, Method::GET, "/api/admin/codes", None).await?,
            CodesSubcommand::Create { name, max_uses, expires_in_days } => {
                let body = serde_json::json!({
                    "name": name,
                    "max_uses": max_uses,
                    "expires_in_days": expires_in_days,
                });
                api_request(cli, Method::POST, "/api/admin/codes", Some(body)).await?
            }
            CodesSubcommand::Delete { code_id } => {
                api_request(cli, Method::DELETE, &format!("/api/admin/codes/{code_id}"), None).await?
            }
        },
        AdminSubcommand::SetContactEmails { emails } => {
            let body = serde_json::json!({ "value": emails });
            api_request(cli, Method::POST, "/api/admin/settings/contact_emails", Some(body)).await?
        }
    };
    print_json(&json)
}

// =============================================================================
// RATING
// =============================================================================

async fn run_rate(cli: &CliContext, lva_id: i64) -> Result<(), CliError> {
    use reqwest::Method;

    let lva = public_request(cli, Method::GET, &format!("/api/lvas/{lva_id}"), None).await?;
    if let Some(name) = lva.get("name").and_then(Value::as_str) {
        println!("Bewertung für: {name}");
    }
    println!("Eingabe `<` geht einen Schritt zurück, `q` bricht ab.");

    let mut wizard = RatingWizard::new(lva_id);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while wizard.step() != Step::Submitted {
        let label = match wizard.step() {
            Step::Email => "Studierenden-E-Mail",
            Step::Code => "Code aus der E-Mail",
            Step::Effort => "Aufwand (1 = gering, 5 = sehr hoch)",
            Step::Difficulty => "Schwierigkeit (1 = leicht, 5 = sehr schwer)",
            Step::Review => "Absenden? (j/n)",
            Step::Submitted => break,
        };
        let input = prompt(&mut lines, label)?;
        match input.as_str() {
            "q" => return Err(CliError::Aborted),
            "<" => {
                wizard.back();
                continue;
            }
            _ => {}
        }

        let result = match wizard.step() {
            Step::Email => match wizard.enter_email(&input) {
                Ok(()) => {
                    let body = serde_json::json!({ "email": wizard.email(), "lva_id": wizard.lva_id() });
                    match public_request(cli, Method::POST, "/api/lva/request-code", Some(body)).await {
                        Ok(json) => report(&json),
                        Err(e) => {
                            wizard.back();
                            eprintln!("{e}");
                        }
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Step::Code => match wizard.enter_code(&input) {
                Ok(()) => {
                    let body = serde_json::json!({ "email": wizard.email(), "code": wizard.code(), "lva_id": wizard.lva_id() });
                    if let Err(e) = public_request(cli, Method::POST, "/api/lva/verify-code", Some(body)).await {
                        wizard.back();
                        eprintln!("{e}");
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Step::Effort => parse_rating(&input).and_then(|v| wizard.rate_effort(v)),
            Step::Difficulty => parse_rating(&input).and_then(|v| wizard.rate_difficulty(v)),
            Step::Review => {
                if input.eq_ignore_ascii_case("j") {
                    let payload = wizard.payload().ok_or(CliError::MissingField("rating"))?;
                    let body = serde_json::to_value(payload)?;
                    match public_request(cli, Method::POST, "/api/lva/submit-rating", Some(body)).await {
                        Ok(json) => {
                            report(&json);
                            wizard.mark_submitted()
                        }
                        Err(e) => {
                            eprintln!("{e}");
                            Ok(())
                        }
                    }
                } else {
                    wizard.back();
                    Ok(())
                }
            }
            Step::Submitted => Ok(()),
        };
        if let Err(e) = result {
            eprintln!("{e}");
        }
        if wizard.step() == Step::Review {
            if let Some(payload) = wizard.payload() {
                println!("Aufwand {} / Schwierigkeit {}", payload.effort_rating, payload.difficulty_rating);
            }
        }
    }
    Ok(())
}

fn parse_rating(input: &str) -> Result<i32, wizard::WizardError> {
    input.parse::<i32>().map_err(|_| wizard::WizardError::RatingOutOfRange)
}

fn prompt<B: BufRead>(lines: &mut io::Lines<B>, label: &str) -> Result<String, CliError> {
    print!("{label}: ");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?.trim().to_owned()),
        None => Err(CliError::Aborted),
    }
}

fn report(json: &Value) {
    if let Some(message) = json.get("message").and_then(Value::as_str) {
        println!("{message}");
    }
}

// =============================================================================
// HTTP
// =============================================================================

async fn api_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let token = cli.token.as_deref().ok_or(CliError::MissingToken)?;
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
    send(cli, headers, method, path, body).await
}

async fn public_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    send(cli, HeaderMap::new(), method, path, body).await
}

async fn send(
    cli: &CliContext,
    headers: HeaderMap,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let client = reqwest::Client::builder().default_headers(headers).build()?;
    let url = format!("{}{}", cli.base_url.trim_end_matches('/'), path);

    let request = client.request(method, &url);
    let request = if let Some(json) = body { request.json(&json) } else { request };

    let response = request.send().await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);

    if !status.is_success() {
        let detail = value
            .get("detail")
            .and_then(Value::as_str)
            .map_or_else(|| value.to_string(), ToOwned::to_owned);
        return Err(CliError::Server { status: status.as_u16(), detail });
    }

    Ok(value)
}

fn encode_query(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
