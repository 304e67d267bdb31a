//! Command-line front end for the notes application.
//!
//! # Responsibility
//! - Load settings, open the database and drive the in-process client.
//! - Print page contexts as JSON so output stays scriptable.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use notes_core::{
    form_data, init_logging, load_settings, reverse, Client, FormData, Method, NotesApp, Response,
};

/// notes - personal notes with per-author access
#[derive(Parser, Debug)]
#[command(name = "notes")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Username to log in as before running the command
    #[arg(short, long, env = "NOTES_USER")]
    user: Option<String>,

    /// Password for --user
    #[arg(short, long, env = "NOTES_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a new account
    Signup {
        username: String,
        password: String,
    },

    /// Create a note (slug is derived from the title when omitted)
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        slug: Option<String>,
    },

    /// List your notes
    #[command(alias = "ls")]
    List,

    /// Show one of your notes
    Show { slug: String },

    /// Replace title, text and slug of one of your notes
    Edit {
        slug: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: String,
        /// New slug; derived from the new title when omitted
        #[arg(long)]
        new_slug: Option<String>,
    },

    /// Delete one of your notes
    #[command(alias = "rm")]
    Delete { slug: String },

    /// Send a raw request, e.g. `request GET /notes/`
    Request {
        method: Method,
        path: String,
        /// Form field as key=value; repeatable
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(log_dir) = settings.log_dir.as_deref() {
        init_logging(&settings.log_level, log_dir).context("failed to initialize logging")?;
    }

    let app = NotesApp::open(&settings).context("failed to open database")?;
    let mut client = Client::new(&app);

    if let Some(username) = cli.user.as_deref() {
        let password = cli.password.as_deref().unwrap_or_default();
        if !client.login(username, password) {
            return Err(anyhow!("login failed for user `{username}`"));
        }
    }

    let response = run(&mut client, cli.command)?;
    print_response(&response, client.session().is_some())?;

    Ok(if response.status() >= 400 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run(client: &mut Client<'_>, command: Commands) -> Result<Response> {
    let response = match command {
        Commands::Signup { username, password } => client.post(
            &route("signup", None)?,
            form_data(&[
                ("username", username.as_str()),
                ("password1", password.as_str()),
                ("password2", password.as_str()),
            ]),
        ),
        Commands::Add { title, text, slug } => client.post(
            &route("add", None)?,
            note_fields(&title, &text, slug.as_deref()),
        ),
        Commands::List => client.get(&route("list", None)?),
        Commands::Show { slug } => client.get(&route("detail", Some(slug.as_str()))?),
        Commands::Edit {
            slug,
            title,
            text,
            new_slug,
        } => client.post(
            &route("edit", Some(slug.as_str()))?,
            note_fields(&title, &text, new_slug.as_deref()),
        ),
        Commands::Delete { slug } => {
            client.post(&route("delete", Some(slug.as_str()))?, FormData::new())
        }
        Commands::Request {
            method,
            path,
            fields,
        } => client.request(method, &path, fields.into_iter().collect()),
    };
    Ok(response)
}

fn route(name: &str, slug: Option<&str>) -> Result<String> {
    reverse(name, slug).ok_or_else(|| anyhow!("unknown route `{name}`"))
}

fn note_fields(title: &str, text: &str, slug: Option<&str>) -> FormData {
    form_data(&[("title", title), ("text", text), ("slug", slug.unwrap_or(""))])
}

fn parse_field(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{value}`"))
}

fn print_response(response: &Response, authenticated: bool) -> Result<()> {
    let mut body = match response {
        Response::Ok(page) => serde_json::json!({ "status": 200, "page": page }),
        Response::Redirect { location, .. } => {
            serde_json::json!({ "status": 302, "location": location })
        }
        other => serde_json::json!({ "status": other.status() }),
    };
    body["authenticated"] = serde_json::Value::Bool(authenticated);
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
