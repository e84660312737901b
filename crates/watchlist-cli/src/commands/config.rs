use super::{prompts, report_remote_failure};
use crate::output::{self, Output};
use crate::ui::Spinner;
use catalog_sources::{CatalogSource, TmdbClient};
use color_eyre::Result;
use comfy_table::{modifiers, presets, Attribute, Cell, Table};
use serde_json::json;
use watchlist_config::{Config, CredentialStore, PathManager, API_KEY_ENV_VAR};
use watchlist_models::MediaType;

pub async fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, output),
        crate::ConfigCommands::Tmdb { api_key, language, no_verify } => {
            configure_tmdb(api_key, language, no_verify, output).await
        }
    }
}

fn load_config(path_manager: &PathManager) -> Result<Config> {
    let config_file = path_manager.config_file();
    Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))
}

fn load_credentials(path_manager: &PathManager) -> Result<CredentialStore> {
    let credentials_file = path_manager.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    Ok(cred_store)
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config = load_config(&path_manager)?;
    let cred_store = load_credentials(&path_manager)?;

    let api_key_source = if std::env::var(API_KEY_ENV_VAR).map(|v| !v.trim().is_empty()).unwrap_or(false) {
        API_KEY_ENV_VAR
    } else {
        "credentials.toml"
    };
    let api_key = match cred_store.resolve_tmdb_api_key() {
        Some(key) if full => key,
        Some(key) => mask_string(&key),
        None => "<not set>".to_string(),
    };
    let language = config.tmdb.language.clone().unwrap_or_else(|| "<catalog default>".to_string());
    let watchlist_file = config.watchlist_file(&path_manager);

    if !output.is_human() {
        output.json(&json!({
            "config_file": path_manager.config_file(),
            "credentials_file": path_manager.credentials_file(),
            "watchlist_file": watchlist_file,
            "tmdb": {
                "base_url": config.tmdb.base_url,
                "image_base_url": config.tmdb.image_base_url,
                "language": config.tmdb.language,
                "timeout_seconds": config.tmdb.timeout_seconds,
                "api_key": api_key,
                "api_key_source": api_key_source,
            },
            "browse": {
                "trending_limit": config.browse.trending_limit,
                "search_limit": config.browse.search_limit,
            },
        }));
        return Ok(());
    }

    output::section_header("Configuration", output);

    let mut files_table = Table::new();
    files_table.load_preset(presets::UTF8_FULL);
    files_table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    files_table.set_header(vec![
        Cell::new("File").add_attribute(Attribute::Bold),
        Cell::new("Path").add_attribute(Attribute::Bold),
    ]);
    files_table.add_row(vec![Cell::new("Config"), Cell::new(path_manager.config_file().display())]);
    files_table.add_row(vec![Cell::new("Credentials"), Cell::new(path_manager.credentials_file().display())]);
    files_table.add_row(vec![Cell::new("Watchlist"), Cell::new(watchlist_file.display())]);
    output.println(files_table.to_string());

    let mut tmdb_table = Table::new();
    tmdb_table.load_preset(presets::UTF8_FULL);
    tmdb_table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    tmdb_table.set_header(vec![
        Cell::new("TMDB").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    tmdb_table.add_row(vec![Cell::new("API key"), Cell::new(format!("{} (from {})", api_key, api_key_source))]);
    tmdb_table.add_row(vec![Cell::new("Base URL"), Cell::new(&config.tmdb.base_url)]);
    tmdb_table.add_row(vec![Cell::new("Image base URL"), Cell::new(&config.tmdb.image_base_url)]);
    tmdb_table.add_row(vec![Cell::new("Language"), Cell::new(language)]);
    tmdb_table.add_row(vec![Cell::new("Timeout"), Cell::new(format!("{}s", config.tmdb.timeout_seconds))]);
    tmdb_table.add_row(vec![Cell::new("Trending items"), Cell::new(config.browse.trending_limit)]);
    tmdb_table.add_row(vec![Cell::new("Search results"), Cell::new(config.browse.search_limit)]);
    output.println(tmdb_table.to_string());

    if let Err(e) = config.validate() {
        output.warn(format!("Configuration problem: {}", e));
    }
    Ok(())
}

async fn configure_tmdb(
    api_key_arg: Option<String>,
    language_arg: Option<String>,
    no_verify: bool,
    output: &Output,
) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;

    let config_file = path_manager.config_file();
    let mut config = load_config(&path_manager)?;
    let mut cred_store = load_credentials(&path_manager)?;

    output::section_header("TMDB API Setup", output);
    output.println("Create a free API key at https://www.themoviedb.org/settings/api");
    output.println("");

    let api_key = match api_key_arg {
        Some(key) if !key.trim().is_empty() => key.trim().to_string(),
        Some(_) => return Err(color_eyre::eyre::eyre!("API key cannot be empty")),
        None => prompts::prompt_secret("TMDB API key", output)?,
    };

    let language = match language_arg {
        Some(language) => Some(language),
        None if output.is_human() => {
            let input = prompts::prompt_string(
                "Response language (e.g. en-US, press Enter for the catalog default)",
                config.tmdb.language.as_deref(),
            )?;
            Some(input.trim().to_string()).filter(|l| !l.is_empty())
        }
        None => config.tmdb.language.clone(),
    };
    config.tmdb.language = language;

    if !no_verify {
        let client = TmdbClient::from_config(&config.tmdb, Some(api_key.clone()))
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create catalog client: {}", e))?;

        let spinner = Spinner::start("Verifying API key...", output.is_human());
        let result = client.genres(MediaType::Movie).await;
        spinner.finish();

        match result {
            Ok(_) => output.success("API key verified"),
            Err(e) => {
                report_remote_failure("Verification", &e, output);
                if !prompts::prompt_yes_no_with_output("Save this key anyway?", Some(false), Some(output))? {
                    return Err(color_eyre::eyre::eyre!("API key verification failed"));
                }
            }
        }
    }

    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    cred_store.set_tmdb_api_key(api_key);
    cred_store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;

    output.success("TMDB configuration saved");
    if std::env::var(API_KEY_ENV_VAR).is_ok() {
        output.warn(format!("{} is set and takes precedence over the stored key", API_KEY_ENV_VAR));
    }
    Ok(())
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
