//! Postdesk - blog admin components in the terminal.
//!
//! # Usage
//!
//! ```bash
//! postdesk edit --draft draft.json --publish-button
//! postdesk posts posts.json
//! postdesk login
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use postdesk::app::{App, Screen};
use postdesk::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use postdesk::editor::{DEFAULT_DEBOUNCE_MS, EditableDocument, EditorOptions};
use postdesk::highlight::{HighlightBackground, set_background_mode};
use postdesk::posts::load_posts;

/// Blog admin components in the terminal
#[derive(Parser, Debug)]
#[command(name = "postdesk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quiet period in milliseconds before edits are reported
    #[arg(long, global = true, value_name = "N")]
    debounce_ms: Option<u64>,

    /// Show the Publish action
    #[arg(long, global = true)]
    publish_button: bool,

    /// Show the Delete action
    #[arg(long, global = true)]
    delete_button: bool,

    /// Open the editor read-only
    #[arg(long, global = true)]
    disabled: bool,

    /// Force syntax highlight theme background (light or dark)
    #[arg(long, global = true, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Write debug logs to a file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write or edit a post (default)
    Edit {
        /// JSON draft with `title` and `content`
        #[arg(long, value_name = "FILE")]
        draft: Option<PathBuf>,
    },
    /// Browse a JSON array of posts
    Posts {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Show the admin login form
    Login,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
            )
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn load_draft(path: &Path) -> Result<EditableDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid draft {}", path.display()))
}

fn editor_options(flags: &ConfigFlags, draft: Option<EditableDocument>) -> EditorOptions {
    let mut options = EditorOptions::default()
        .with_publish_button(flags.publish_button)
        .with_delete_button(flags.delete_button)
        .with_disabled(flags.disabled)
        .with_debounce_ms(flags.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS));
    if let Some(draft) = draft {
        options = options.with_initial_data(draft);
    }
    options
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;

    match effective.theme.unwrap_or(ThemeMode::Auto) {
        ThemeMode::Auto => set_background_mode(None),
        ThemeMode::Light => set_background_mode(Some(HighlightBackground::Light)),
        ThemeMode::Dark => set_background_mode(Some(HighlightBackground::Dark)),
    }

    let (screen, draft, posts) = match cli.command.unwrap_or(Command::Edit { draft: None }) {
        Command::Edit { draft } => {
            let draft = draft.as_deref().map(load_draft).transpose()?;
            (Screen::Editor, draft, Vec::new())
        }
        Command::Posts { file } => {
            let posts = load_posts(&file).context("Failed to load posts")?;
            (Screen::Posts, None, posts)
        }
        Command::Login => (Screen::Login, None, Vec::new()),
    };
    tracing::debug!(screen = screen.label(), posts = posts.len(), "starting");

    let mut app = App::new(screen)
        .with_editor_options(editor_options(&effective, draft))
        .with_posts(posts)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    let outcome = app.run().context("Application error")?;
    if let Some(outcome) = outcome {
        println!("{}", serde_json::to_string(&outcome)?);
    }
    Ok(())
}
