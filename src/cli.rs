//! Command-line interface implementation.

use crate::error::{ArchiveError, Result};
use crate::export::ExportFormat;
use crate::media::human_size;
use crate::query::{EntryFilter, SearchFilters, SortKey};
use crate::service::{ArchiveService, SubmissionForm};
use crate::services::{self, GlossaryTranslator};
use crate::utils::{display_date, success, truncate_text, warning};
use crate::vocab;
use clap::{Parser, Subcommand};
use colored::*;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use zeroize::Zeroize;

/// How long a collaborator call may run before it is abandoned.
const SERVICE_TIMEOUT: Duration = Duration::from_secs(10);

/// Community archive for multilingual farming knowledge.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Data directory holding entries.json, users.json and media/
    #[arg(
        short = 'd',
        long,
        global = true,
        env = "FIELDLORE_DATA",
        help = "Data directory (default: platform data dir)"
    )]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new contributor account
    Register {
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        full_name: String,

        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Submit a new knowledge entry
    Submit {
        /// Contributor username
        #[arg(short, long)]
        user: String,

        #[arg(long)]
        password_stdin: bool,

        #[arg(short, long)]
        title: String,

        #[arg(long)]
        description: String,

        #[arg(short, long)]
        language: String,

        #[arg(short, long)]
        category: String,

        /// Free-text place name
        #[arg(long, default_value = "")]
        location: String,

        #[arg(long)]
        latitude: Option<f64>,

        #[arg(long)]
        longitude: Option<f64>,

        /// Attach an image file
        #[arg(long)]
        image: Option<PathBuf>,

        /// Attach an audio file
        #[arg(long)]
        audio: Option<PathBuf>,
    },

    /// Browse entries with filters and sorting
    List {
        #[arg(short, long)]
        language: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long, value_enum, default_value = "newest-first")]
        sort: SortKey,
    },

    /// Free-text search over titles and descriptions
    Search {
        query: String,

        #[arg(short, long)]
        language: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// Only entries with an image or audio attachment
        #[arg(long)]
        has_media: bool,

        /// Only entries with both coordinates
        #[arg(long)]
        has_location: bool,
    },

    /// Export entries for research and analysis
    Export {
        #[arg(short, long, value_enum, default_value = "jsonl")]
        format: ExportFormat,

        /// Write to this path instead of a time-stamped filename
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the payload to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,

        #[arg(long)]
        no_media: bool,

        #[arg(long)]
        no_coordinates: bool,

        #[arg(short, long)]
        language: Option<String>,

        #[arg(short, long)]
        category: Option<String>,
    },

    /// Translate a farming term between languages
    Translate {
        text: String,

        #[arg(short, long)]
        target: String,

        #[arg(short, long)]
        source: Option<String>,
    },

    /// Detect the language of a text
    Detect { text: String },

    /// Show a contributor profile and their entries
    Profile { username: String },

    /// Archive-wide statistics
    Stats,

    /// List supported languages and categories
    Vocab,

    /// Remove media files no entry references
    CleanupMedia,

    /// Clear all entries (administrative reset)
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Resolve the data directory: flag/env, then the platform data dir,
    /// then ./data_entries.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_local_dir()
            .map(|d| d.join("fieldlore"))
            .unwrap_or_else(|| PathBuf::from("data_entries"))
    }

    /// Execute the CLI command.
    pub async fn execute(&self) -> Result<()> {
        let service = ArchiveService::new(&self.resolve_data_dir());

        match &self.command {
            Commands::Register {
                username,
                email,
                full_name,
                password_stdin,
            } => self.register(&service, username, email, full_name, *password_stdin),
            Commands::Submit {
                user,
                password_stdin,
                title,
                description,
                language,
                category,
                location,
                latitude,
                longitude,
                image,
                audio,
            } => {
                let form = SubmissionForm {
                    title: title.clone(),
                    description: description.clone(),
                    language: language.clone(),
                    category: category.clone(),
                    location_name: location.clone(),
                    latitude: *latitude,
                    longitude: *longitude,
                    image: image.clone(),
                    audio: audio.clone(),
                };
                self.submit(&service, user, *password_stdin, form)
            }
            Commands::List {
                language,
                category,
                sort,
            } => {
                let filter = EntryFilter {
                    language: language.clone(),
                    category: category.clone(),
                };
                self.list(&service, &filter, *sort)
            }
            Commands::Search {
                query,
                language,
                category,
                has_media,
                has_location,
            } => {
                let filters = SearchFilters {
                    language: language.clone(),
                    category: category.clone(),
                    has_media: *has_media,
                    has_location: *has_location,
                };
                self.search(&service, query, &filters)
            }
            Commands::Export {
                format,
                output,
                stdout,
                no_media,
                no_coordinates,
                language,
                category,
            } => {
                let filter = EntryFilter {
                    language: language.clone(),
                    category: category.clone(),
                };
                self.export(
                    &service,
                    *format,
                    &filter,
                    output.clone(),
                    *stdout,
                    !*no_media,
                    !*no_coordinates,
                )
            }
            Commands::Translate {
                text,
                target,
                source,
            } => self.translate(text, source.as_deref(), target).await,
            Commands::Detect { text } => self.detect(text).await,
            Commands::Profile { username } => self.profile(&service, username),
            Commands::Stats => self.stats(&service),
            Commands::Vocab => self.vocab(),
            Commands::CleanupMedia => self.cleanup_media(&service),
            Commands::Clear { yes } => self.clear(&service, *yes),
        }
    }

    fn register(
        &self,
        service: &ArchiveService,
        username: &str,
        email: &str,
        full_name: &str,
        password_stdin: bool,
    ) -> Result<()> {
        let mut password = read_password(password_stdin, true)?;
        let result = service.register(username, email, &password, full_name);
        password.zeroize();
        result?;
        success(&format!("Registered {username}. You can now submit entries."));
        Ok(())
    }

    fn submit(
        &self,
        service: &ArchiveService,
        username: &str,
        password_stdin: bool,
        form: SubmissionForm,
    ) -> Result<()> {
        let mut password = read_password(password_stdin, false)?;
        let login = service.login(username, &password);
        password.zeroize();
        let session = login?;

        let entry = service.submit(&session, form)?;
        success(&format!(
            "Saved entry #{} \"{}\" ({})",
            entry.id, entry.title, entry.language
        ));
        Ok(())
    }

    fn list(&self, service: &ArchiveService, filter: &EntryFilter, sort: SortKey) -> Result<()> {
        let entries = service.browse(filter, sort);
        println!("Showing {} entries", entries.len());
        for entry in &entries {
            println!(
                "{} {} {} {}",
                format!("#{}", entry.id).bold(),
                entry.title.green(),
                format!("[{} / {}]", entry.language, entry.category).cyan(),
                format!(
                    "{} by {}",
                    display_date(&entry.timestamp),
                    entry.contributor
                )
                .dimmed(),
            );
            println!("    {}", truncate_text(&entry.description, 100));
        }
        Ok(())
    }

    fn search(
        &self,
        service: &ArchiveService,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<()> {
        let hits = service.search(query, filters);
        println!("Found {} results", hits.len());
        for entry in &hits {
            println!(
                "{} {} {}",
                format!("#{}", entry.id).bold(),
                entry.title.green(),
                format!("[{} / {}]", entry.language, entry.category).cyan(),
            );
            println!("    {}", truncate_text(&entry.description, 100));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn export(
        &self,
        service: &ArchiveService,
        format: ExportFormat,
        filter: &EntryFilter,
        output: Option<PathBuf>,
        to_stdout: bool,
        include_media: bool,
        include_coordinates: bool,
    ) -> Result<()> {
        let (stamped_name, payload) =
            service.export(format, filter, include_media, include_coordinates)?;

        if to_stdout {
            let mut out = std::io::stdout().lock();
            out.write_all(payload.as_bytes())?;
            return Ok(());
        }

        let path = output.unwrap_or_else(|| PathBuf::from(stamped_name));
        std::fs::write(&path, &payload)?;
        success(&format!(
            "Export ready: {} ({})",
            path.display(),
            human_size(payload.len() as u64)
        ));
        Ok(())
    }

    async fn translate(&self, text: &str, source: Option<&str>, target: &str) -> Result<()> {
        vocab::validate_language(target)?;
        let translator = GlossaryTranslator::new();
        let translated = services::with_timeout(
            "translator",
            SERVICE_TIMEOUT,
            async { Ok(services::translate_or_original(&translator, text, source, target)) },
        )
        .await?;
        println!("{translated}");
        Ok(())
    }

    async fn detect(&self, text: &str) -> Result<()> {
        let translator = GlossaryTranslator::new();
        let language = services::with_timeout("translator", SERVICE_TIMEOUT, async {
            Ok(services::detect_or_unknown(&translator, text))
        })
        .await?;
        println!("{language}");
        Ok(())
    }

    fn profile(&self, service: &ArchiveService, username: &str) -> Result<()> {
        let Some((user, entries)) = service.profile(username)? else {
            warning(&format!("No such user: {username}"));
            return Ok(());
        };

        println!("{}", user.full_name.bold());
        println!("Username: {username}");
        println!("Email: {}", user.email);
        println!("Member since: {}", display_date(&user.registration_date));
        println!("Entries submitted: {}", user.entries_submitted);

        if entries.is_empty() {
            println!("No entries yet.");
        } else {
            println!("Recent contributions:");
            for entry in entries.iter().rev().take(5) {
                println!("  • {} ({})", entry.title, entry.category);
            }
            if entries.len() > 5 {
                println!("  ... and {} more", entries.len() - 5);
            }
        }
        Ok(())
    }

    fn stats(&self, service: &ArchiveService) -> Result<()> {
        let stats = service.stats();
        println!("Total entries:          {}", stats.total_entries);
        println!("Languages:              {}", stats.languages);
        println!("Categories:             {}", stats.categories);
        println!("Entries with media:     {}", stats.with_media);
        println!("Entries with location:  {}", stats.with_coordinates);
        Ok(())
    }

    fn vocab(&self) -> Result<()> {
        println!("{}", "Languages:".bold());
        for language in vocab::LANGUAGES {
            println!("  {language}");
        }
        println!("{}", "Categories:".bold());
        for category in vocab::CATEGORIES {
            println!("  {category}");
        }
        Ok(())
    }

    fn cleanup_media(&self, service: &ArchiveService) -> Result<()> {
        let entries = service.entry_store().load()?;
        let removed = service.media_store().cleanup_orphans(&entries)?;
        success(&format!("Removed {removed} orphaned media files"));
        Ok(())
    }

    fn clear(&self, service: &ArchiveService, yes: bool) -> Result<()> {
        if !yes {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt("This deletes every entry. Continue?")
                .default(false)
                .interact()
                .map_err(|e| ArchiveError::Other(e.to_string()))?;
            if !confirmed {
                return Err(ArchiveError::Cancelled);
            }
        }
        service.clear_entries()?;
        success("All entries cleared");
        Ok(())
    }
}

/// Read a password from stdin (`--password-stdin`) or prompt for it,
/// with a confirmation prompt on registration.
fn read_password(from_stdin: bool, confirm: bool) -> Result<String> {
    if from_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        let password = line.trim_end_matches(['\r', '\n']).to_string();
        if password.is_empty() {
            return Err(ArchiveError::MissingField("password"));
        }
        return Ok(password);
    }

    let password = rpassword::prompt_password("Password: ")
        .map_err(ArchiveError::Io)?;
    if confirm {
        let mut again = rpassword::prompt_password("Confirm password: ")
            .map_err(ArchiveError::Io)?;
        let matches = again == password;
        again.zeroize();
        if !matches {
            return Err(ArchiveError::PasswordMismatch);
        }
    }
    Ok(password)
}
