use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{get_config_path, Backend, Config, StoreConfig};
use crate::factors::{FactorConfig, EF_GAS, EF_GRID};
use crate::input::prompt::{prompt, prompt_with_default, prompt_yes_no};
use crate::records::get_records_path;
use crate::records::supabase::DEFAULT_TABLE;

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(12));
    }
    println!();
}

/// Ask for a positive multiplier, re-prompting until the input parses
fn prompt_multiplier(message: &str, default: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => return Ok(v),
            _ => println!("  Invalid: must be a positive number. Try again."),
        }
    }
}

fn prompt_store() -> Result<StoreConfig> {
    typewriter("Records can live in a local file or in a Supabase table.");
    let use_supabase = prompt_yes_no("Store records in Supabase?", false)?;

    if !use_supabase {
        let default_path = get_records_path();
        let path = prompt_with_default("Record file", &default_path.display().to_string())?;
        let path = PathBuf::from(path);
        return Ok(StoreConfig {
            backend: Backend::Local,
            path: (path != default_path).then_some(path),
            ..StoreConfig::default()
        });
    }

    println!();
    typewriter("The API key is not written to the config file.");
    typewriter("Set CARBON_TALLY_SUPABASE_KEY, or you will be asked for it when needed.");
    let url = loop {
        let input = prompt("Project URL (https://xyz.supabase.co): ")?;
        if input.starts_with("https://") || input.starts_with("http://") {
            break input;
        }
        println!("  Invalid: must start with https://. Try again.");
    };
    let table = prompt_with_default("Table", DEFAULT_TABLE)?;
    let timeout = loop {
        let input = prompt_with_default("Request timeout", "10s")?;
        match humantime::parse_duration(&input) {
            Ok(d) if !d.is_zero() => break input,
            Ok(_) => println!("  Invalid: must be greater than zero. Try again."),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    Ok(StoreConfig {
        backend: Backend::Supabase,
        path: None,
        url: Some(url),
        table: (table != DEFAULT_TABLE).then_some(table),
        timeout: (timeout != "10s").then_some(timeout),
    })
}

fn prompt_factors() -> Result<Option<FactorConfig>> {
    typewriter("Electric and gas-fired home items are multiplied by a grid and a gas factor.");
    typewriter("Keep the defaults unless your utility publishes its own figures.");
    if !prompt_yes_no("Customize grid and gas factors?", false)? {
        return Ok(None);
    }

    let grid = prompt_multiplier("Grid factor (kgCO2e per kWh)", EF_GRID)?;
    let gas = prompt_multiplier("Gas factor", EF_GAS)?;
    Ok(Some(FactorConfig {
        grid_factor: Some(grid),
        gas_factor: Some(gas),
        ..FactorConfig::default()
    }))
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("Carbon Tally Configuration Wizard");
    println!("=================================");
    println!();

    let user = prompt("Your user name (used to tag your records, blank to skip): ")?;
    let user = (!user.is_empty()).then_some(user);

    println!();
    let store = prompt_store()?;

    println!();
    let factors = prompt_factors()?;

    let config = Config {
        user,
        store,
        factors,
        impact: None,
    };

    if let Err(errors) = config.validate() {
        anyhow::bail!("Generated config is invalid:\n  - {}", errors.join("\n  - "));
    }

    println!();
    let config_path = match default_path {
        Some(p) => p,
        None => PathBuf::from(prompt_with_default(
            "Config file",
            &get_config_path().display().to_string(),
        )?),
    };

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            println!("Aborted. Existing config left unchanged.");
            return Ok(());
        }
    }

    let yaml = serde_saphyr::to_string(&config).context("Failed to serialize config")?;

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(&config_path)
        .with_context(|| format!("Failed to open atomic write file at {}", config_path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    typewriter(&format!("Config written to {}", config_path.display()));
    typewriter("Try: carbon-tally calc --interactive");

    Ok(())
}
