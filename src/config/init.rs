use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, validate_endpoint, Config};
use crate::config::{DEFAULT_RETRIES, DEFAULT_TIMEOUT};
use crate::scoring::{ScoringConfig, TargetBand, DEFAULT_PACE, DEFAULT_PAUSES};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    Ok(parse_yes_no(&input, default_yes))
}

fn parse_yes_no(input: &str, default_yes: bool) -> bool {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        default_yes
    } else {
        input == "y" || input == "yes"
    }
}

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

/// Parse a "target/tolerance" pair such as "150/50".
fn parse_band(input: &str) -> Result<TargetBand, String> {
    let (target, tolerance) = input
        .split_once('/')
        .ok_or_else(|| "expected TARGET/TOLERANCE, e.g. 150/50".to_string())?;
    let target: f64 = target
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", target.trim()))?;
    let tolerance: f64 = tolerance
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", tolerance.trim()))?;
    if !target.is_finite() {
        return Err("target must be a finite number".to_string());
    }
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err("tolerance must be greater than zero".to_string());
    }
    Ok(TargetBand { target, tolerance })
}

fn format_band(band: TargetBand) -> String {
    format!("{}/{}", band.target, band.tolerance)
}

/// Ask for a band until the answer parses. Returns None when the default is kept.
fn prompt_band(message: &str, default: TargetBand) -> Result<Option<TargetBand>> {
    loop {
        let input = prompt_with_default(message, &format_band(default))?;
        match parse_band(&input) {
            Ok(band) if band == default => return Ok(None),
            Ok(band) => return Ok(Some(band)),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("talkscore configuration");
    println!("=======================");
    println!();

    // 1. Analysis service
    typewriter("Recordings are scored by sending them to a speech analysis service.");
    typewriter("Leave the endpoint empty if you only score JSON files you already have.");
    let endpoint = loop {
        let input = prompt("Analysis endpoint URL: ")?;
        if input.is_empty() {
            break None;
        }
        match validate_endpoint(&input) {
            Ok(()) => break Some(input),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    let default_timeout = humantime::format_duration(DEFAULT_TIMEOUT).to_string();
    let timeout = loop {
        let input = prompt_with_default("Request timeout", &default_timeout)?;
        match humantime::parse_duration(&input) {
            Ok(d) if d.is_zero() => println!("  Invalid: must be greater than zero. Try again."),
            Ok(_) if input == default_timeout => break None,
            Ok(_) => break Some(input),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    let retries = loop {
        let input = prompt_with_default("Retries for failed uploads", &DEFAULT_RETRIES.to_string())?;
        match input.parse::<usize>() {
            Ok(n) if n == DEFAULT_RETRIES => break None,
            Ok(n) => break Some(n),
            Err(_) => println!("  Invalid: must be a whole number. Try again."),
        }
    };

    // 2. Scoring
    println!();
    typewriter("Pace and pauses are scored against a target with a tolerance on either side.");
    typewriter("A talk exactly on target scores 100; one a full tolerance away scores 0.");
    let scoring = if prompt_yes_no("Customize scoring targets? (n accepts defaults)", false)? {
        let pace = prompt_band("Pace in words per minute (target/tolerance)", DEFAULT_PACE)?;
        let pauses = prompt_band("Pauses per minute (target/tolerance)", DEFAULT_PAUSES)?;
        let scoring = ScoringConfig {
            pace,
            pauses,
            ..Default::default()
        };
        (scoring != ScoringConfig::default()).then_some(scoring)
    } else {
        None
    };

    // 3. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 4. Write config
    let config = Config {
        endpoint,
        timeout,
        retries,
        scoring,
    };
    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    typewriter("Metric weights can be tuned under scoring.weights in the config file.");
    println!("Run `talkscore score <FILE>` or `talkscore analyze <AUDIO>` to get started.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_band() {
        assert_eq!(
            parse_band("140/40"),
            Ok(TargetBand {
                target: 140.0,
                tolerance: 40.0
            })
        );
        assert_eq!(
            parse_band(" 6.5 / 3 "),
            Ok(TargetBand {
                target: 6.5,
                tolerance: 3.0
            })
        );
    }

    #[test]
    fn test_parse_band_rejects_bad_input() {
        assert!(parse_band("150").is_err());
        assert!(parse_band("fast/50").is_err());
        assert!(parse_band("150/0").is_err());
        assert!(parse_band("150/-5").is_err());
    }

    #[test]
    fn test_format_band_parses_back() {
        assert_eq!(parse_band(&format_band(DEFAULT_PACE)), Ok(DEFAULT_PACE));
        assert_eq!(format_band(DEFAULT_PAUSES), "6/5");
    }

    #[test]
    fn test_parse_yes_no() {
        assert!(parse_yes_no("", true));
        assert!(!parse_yes_no("", false));
        assert!(parse_yes_no("Yes", false));
        assert!(!parse_yes_no("nope", true));
    }
}
