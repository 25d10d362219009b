//! Command-line front end for the CodeKeep API.

use anyhow::{anyhow, bail, Context};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use codekeep_client::{
    spawn_backend, ClientApp, Highlighter, HttpSnippetApi, SnippetForm, ToastKind,
};
use codekeep_core::models::snippet::Snippet;
use codekeep_core::{ALL_TAGS, DEFAULT_SERVER_URL};
use serde_json::json;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ck", about = "CodeKeep CLI", version)]
struct Cli {
    /// Server URL (can also be set via CODEKEEP_SERVER env var)
    #[arg(short, long, env = "CODEKEEP_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// List snippets, favorites first
    List {
        /// Case-insensitive substring over title, description, and tags
        #[arg(short, long)]
        search: Option<String>,
        /// Only snippets carrying this tag ("All" for no filter)
        #[arg(long, default_value = ALL_TAGS)]
        tag: String,
    },
    /// Print the tag vocabulary of all snippets
    Tags,
    /// Print one snippet with syntax highlighting
    Show {
        id: String,
        /// Print code without colors
        #[arg(long)]
        plain: bool,
    },
    /// Create a snippet; code is read from --file or stdin
    New {
        #[arg(long)]
        title: String,
        /// Tag to attach (repeatable, commas split)
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Read code from this file ("-" for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Edit a snippet; omitted fields keep their values
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// Replace the tags (repeatable, commas split)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Remove every tag
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
        /// New description (empty string clears it)
        #[arg(short, long)]
        description: Option<String>,
        /// Replace code from this file ("-" for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Toggle the favorite flag
    Fav { id: String },
    /// Delete a snippet after confirmation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

const NO_DESCRIPTION: &str = "No description.";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Wait for every outstanding reply and turn the first error toast into an error.
fn settle(app: &mut ClientApp, wait: Duration) -> anyhow::Result<()> {
    if !app.settle(wait) {
        bail!("Timed out waiting for the server");
    }
    let first_error = app
        .notifications_mut()
        .drain()
        .into_iter()
        .find(|toast| toast.kind == ToastKind::Error);
    match first_error {
        Some(toast) => Err(anyhow!(toast.text)),
        None => Ok(()),
    }
}

fn load_selected(app: &mut ClientApp, id: &str, wait: Duration) -> anyhow::Result<Snippet> {
    app.load(id);
    settle(app, wait)?;
    app.cache()
        .selected()
        .filter(|snippet| snippet.id == id)
        .cloned()
        .ok_or_else(|| anyhow!("Snippet not found"))
}

fn read_code(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn add_tag_args(form: &mut SnippetForm, tags: &[String]) {
    for tag in tags {
        form.set_tag_input(tag);
        form.commit_tag_input();
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("response encoding error")
}

fn format_list_output(snippets: &[&Snippet], json: bool) -> anyhow::Result<String> {
    if json {
        return to_json(snippets);
    }
    let rows: Vec<String> = snippets
        .iter()
        .map(|snippet| {
            let star = if snippet.is_favorite { '*' } else { ' ' };
            format!(
                "{} {:<36} {:<30} {}",
                star,
                snippet.id,
                snippet.title,
                snippet.tags.join(", ")
            )
        })
        .collect();
    Ok(rows.join("\n"))
}

fn format_tags_output(vocabulary: &[String], json: bool) -> anyhow::Result<String> {
    if json {
        return to_json(vocabulary);
    }
    Ok(vocabulary.join("\n"))
}

fn format_summary_line(action: &str, snippet: &Snippet, json: bool) -> anyhow::Result<String> {
    if json {
        return to_json(snippet);
    }
    Ok(format!("{}: {} ({})", action, snippet.title, snippet.id))
}

fn format_show_output(
    snippet: &Snippet,
    json: bool,
    highlighter: Option<&Highlighter>,
) -> anyhow::Result<String> {
    if json {
        return to_json(snippet);
    }

    let mut out = String::new();
    let star = if snippet.is_favorite { " *" } else { "" };
    out.push_str(&format!("{}{}\n", snippet.title, star));
    if !snippet.tags.is_empty() {
        out.push_str(&format!("tags: {}\n", snippet.tags.join(", ")));
    }
    let description = snippet.description.as_deref().unwrap_or(NO_DESCRIPTION);
    out.push_str(&format!("{}\n", description));
    out.push('\n');
    match highlighter {
        Some(highlighter) => out.push_str(
            &highlighter
                .highlight_for_terminal(&snippet.code, &snippet.tags)
                .context("highlighting failed")?,
        ),
        None => out.push_str(&snippet.code),
    }
    Ok(out)
}

/// Ask a y/N question; anything other than `y`/`yes` declines.
fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn print_nonempty(output: &str) {
    if !output.is_empty() {
        println!("{}", output);
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let Cli {
        server,
        json,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let timeout = Duration::from_secs(timeout);
    let api = HttpSnippetApi::new(&server, timeout)?;
    debug!("using server {}", api.base_url());
    let mut app = ClientApp::new(spawn_backend(api)?);
    let wait = timeout + Duration::from_secs(1);

    match command {
        Commands::Completions { .. } => unreachable!("completions handled before client setup"),
        Commands::List { search, tag } => {
            app.set_filters(search.unwrap_or_default(), &tag);
            settle(&mut app, wait)?;
            print_nonempty(&format_list_output(&app.cache().display_order(), json)?);
        }
        Commands::Tags => {
            app.refresh();
            settle(&mut app, wait)?;
            print_nonempty(&format_tags_output(&app.cache().tag_vocabulary(), json)?);
        }
        Commands::Show { id, plain } => {
            let snippet = load_selected(&mut app, &id, wait)?;
            let highlighter =
                (!plain && io::stdout().is_terminal()).then(Highlighter::default);
            println!(
                "{}",
                format_show_output(&snippet, json, highlighter.as_ref())?
            );
        }
        Commands::New {
            title,
            tags,
            description,
            file,
        } => {
            let code = read_code(file.as_deref()).context("failed to read code")?;
            let form = app.open_create_form();
            form.title = title;
            form.description = description.unwrap_or_default();
            form.code = code;
            add_tag_args(form, &tags);
            app.submit_form()?;
            settle(&mut app, wait)?;
            let created = app
                .cache()
                .selected()
                .ok_or_else(|| anyhow!("Create failed: no snippet returned"))?;
            println!("{}", format_summary_line("Created", created, json)?);
        }
        Commands::Edit {
            id,
            title,
            tags,
            clear_tags,
            description,
            file,
        } => {
            let code = match file.as_deref() {
                Some(path) => Some(read_code(Some(path)).context("failed to read code")?),
                None => None,
            };
            load_selected(&mut app, &id, wait)?;
            let form = app
                .open_edit_form(&id)
                .ok_or_else(|| anyhow!("Snippet not found"))?;
            if let Some(title) = title {
                form.title = title;
            }
            if clear_tags || !tags.is_empty() {
                while form.remove_tag(0).is_some() {}
                add_tag_args(form, &tags);
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(code) = code {
                form.code = code;
            }
            app.submit_form()?;
            settle(&mut app, wait)?;
            let updated = app
                .cache()
                .selected()
                .ok_or_else(|| anyhow!("Update failed: no snippet returned"))?;
            println!("{}", format_summary_line("Updated", updated, json)?);
        }
        Commands::Fav { id } => {
            load_selected(&mut app, &id, wait)?;
            app.toggle_favorite(&id);
            settle(&mut app, wait)?;
            let toggled = app
                .cache()
                .selected()
                .ok_or_else(|| anyhow!("Favorite failed: no snippet returned"))?;
            let action = if toggled.is_favorite {
                "Favorited"
            } else {
                "Unfavorited"
            };
            println!("{}", format_summary_line(action, toggled, json)?);
        }
        Commands::Delete { id, yes } => {
            let snippet = load_selected(&mut app, &id, wait)?;
            app.request_delete(&id);
            let prompt = format!("Delete \"{}\" ({})?", snippet.title, snippet.id);
            if !yes && !confirm(&mut io::stdin().lock(), &mut io::stderr(), &prompt)? {
                app.cancel_delete();
                eprintln!("Delete cancelled");
                return Ok(());
            }
            app.confirm_delete();
            settle(&mut app, wait)?;
            if json {
                println!("{}", to_json(&json!({ "id": id, "deleted": true }))?);
            } else {
                println!("Deleted snippet: {}", id);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
