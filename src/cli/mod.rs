use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{
    builder::{PossibleValue, PossibleValuesParser},
    value_parser, Arg, ArgAction, ArgMatches, Command,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    build_prompt, export_markdown, services::DEFAULT_EXPORT_DIR, BudgetLevel, Companions, Config,
    Dietary, Pace, PlanOptions, Preset, TravelPlanner, TripPreferences, Vibe,
};

/// CLI entry point for the travel-buddy tool
pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    let prefs = preferences_from_matches(&matches)?;
    if matches.get_flag("print-prompt") {
        println!("{}", build_prompt(&prefs.normalized()));
        return Ok(());
    }

    let config = config_from_matches(&matches, Config::from_env()?);
    let options = options_from_matches(&matches);
    let planner = TravelPlanner::new(config).context("failed to set up the model client")?;

    info!("Planning trip to {}", prefs.destination.trim());
    let plan = planner.plan_trip_with(prefs, &options).await;

    println!("{}", plan.markdown);

    if matches.get_flag("json") {
        println!("\n--- Structured Output ---");
        println!("{}", plan.structured_json());
    }

    if let Some(dir) = matches.get_one::<PathBuf>("export") {
        let path = export_markdown(&plan.markdown, dir)
            .with_context(|| format!("failed to export itinerary to {}", dir.display()))?;
        eprintln!("Exported itinerary to {}", path.display());
    }

    Ok(())
}

/// Argument definitions, separate from `run` so they can be exercised in tests.
pub fn command() -> Command {
    Command::new("travel-buddy")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate a personalized travel itinerary with an LLM")
        .arg(
            Arg::new("preset")
                .short('p')
                .long("preset")
                .value_name("NAME")
                .help("Start from a canned trip; other flags override its values")
                .value_parser(PossibleValuesParser::new(
                    Preset::ALL
                        .iter()
                        .map(|preset| PossibleValue::new(preset.as_str()).help(preset.label())),
                )),
        )
        .arg(
            Arg::new("destination")
                .short('d')
                .long("destination")
                .value_name("PLACE")
                .help("Destination city or region, e.g. \"Kyoto, Japan\""),
        )
        .arg(
            Arg::new("days")
                .short('n')
                .long("days")
                .value_name("DAYS")
                .help("Trip length in days")
                .value_parser(value_parser!(u32).range(1..=21)),
        )
        .arg(choice_arg("budget", "Budget level", BudgetLevel::VARIANTS))
        .arg(choice_arg("pace", "Pace", Pace::VARIANTS))
        .arg(choice_arg("vibe", "Vibe", Vibe::VARIANTS))
        .arg(choice_arg("companions", "Who is coming along", Companions::VARIANTS))
        .arg(choice_arg("dietary", "Dietary needs", Dietary::VARIANTS))
        .arg(
            Arg::new("must-do")
                .long("must-do")
                .value_name("TEXT")
                .help("Things the plan must include, e.g. \"tea ceremony, ramen\""),
        )
        .arg(
            Arg::new("avoid")
                .long("avoid")
                .value_name("TEXT")
                .help("Things the plan must avoid, e.g. \"long hikes, night buses\""),
        )
        .arg(
            Arg::new("quirkiness")
                .short('q')
                .long("quirkiness")
                .value_name("0-100")
                .help("0 is conventional, 100 is as offbeat as it gets")
                .value_parser(value_parser!(u8).range(0..=100)),
        )
        .arg(
            Arg::new("month")
                .long("month")
                .value_name("MONTH")
                .help("Month or season, e.g. \"April\" or \"Oct 2025\""),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Model to use (or set OPENAI_MODEL)"),
        )
        .arg(
            Arg::new("temperature")
                .long("temperature")
                .value_name("0.0-1.0")
                .help("Sampling temperature (or set OPENAI_TEMPERATURE)")
                .value_parser(parse_unit_temperature),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("API key (or set OPENAI_API_KEY)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("OpenAI-compatible base URL (or set OPENAI_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Request timeout in seconds (default: none)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("max-retries")
                .long("max-retries")
                .value_name("COUNT")
                .help("Retries on rate limiting or server errors")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Also print the structured itinerary as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("print-prompt")
                .long("print-prompt")
                .help("Print the prompt and exit without calling the model")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("export")
                .short('e')
                .long("export")
                .value_name("DIR")
                .help("Write the Markdown to a timestamped file")
                .num_args(0..=1)
                .default_missing_value(DEFAULT_EXPORT_DIR)
                .value_parser(value_parser!(PathBuf)),
        )
}

fn choice_arg(name: &'static str, help: &'static str, choices: &'static [&'static str]) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("CHOICE")
        .help(help)
        .value_parser(PossibleValuesParser::new(choices.iter().copied()))
}

fn parse_unit_temperature(raw: &str) -> std::result::Result<f32, String> {
    let value: f32 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("temperature must be between 0.0 and 1.0, got {value}"))
    }
}

/// Preset values first, then any explicit flags on top.
pub fn preferences_from_matches(matches: &ArgMatches) -> Result<TripPreferences> {
    let mut prefs = match matches.get_one::<String>("preset") {
        Some(name) => name.parse::<Preset>()?.preferences(),
        None => TripPreferences::default(),
    };

    if let Some(destination) = matches.get_one::<String>("destination") {
        prefs.destination = destination.clone();
    }
    if let Some(days) = matches.get_one::<u32>("days") {
        prefs.days = *days;
    }
    if let Some(budget) = matches.get_one::<String>("budget") {
        prefs.budget_level = budget.parse()?;
    }
    if let Some(pace) = matches.get_one::<String>("pace") {
        prefs.pace = pace.parse()?;
    }
    if let Some(vibe) = matches.get_one::<String>("vibe") {
        prefs.vibe = vibe.parse()?;
    }
    if let Some(companions) = matches.get_one::<String>("companions") {
        prefs.companions = companions.parse()?;
    }
    if let Some(dietary) = matches.get_one::<String>("dietary") {
        prefs.dietary = dietary.parse()?;
    }
    if let Some(must_do) = matches.get_one::<String>("must-do") {
        prefs.must_do = must_do.clone();
    }
    if let Some(avoid) = matches.get_one::<String>("avoid") {
        prefs.avoid = avoid.clone();
    }
    if let Some(quirkiness) = matches.get_one::<u8>("quirkiness") {
        prefs.quirkiness = *quirkiness;
    }
    if let Some(month) = matches.get_one::<String>("month") {
        prefs.month_hint = Some(month.clone());
    }

    Ok(prefs)
}

fn config_from_matches(matches: &ArgMatches, mut config: Config) -> Config {
    if let Some(api_key) = matches.get_one::<String>("api-key") {
        config = config.with_api_key(api_key.as_str());
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(secs) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(Some(Duration::from_secs(*secs)));
    }
    if let Some(retries) = matches.get_one::<usize>("max-retries") {
        config = config.with_max_retries(*retries);
    }
    config
}

fn options_from_matches(matches: &ArgMatches) -> PlanOptions {
    PlanOptions {
        model: matches.get_one::<String>("model").cloned(),
        temperature: matches.get_one::<f32>("temperature").copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        command()
            .try_get_matches_from(std::iter::once("travel-buddy").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let prefs = preferences_from_matches(&parse(&[])).unwrap();
        assert_eq!(prefs, TripPreferences::default());
    }

    #[test]
    fn test_flags_override_preset() {
        let prefs = preferences_from_matches(&parse(&[
            "--preset",
            "lisbon",
            "--days",
            "2",
            "--dietary",
            "vegan",
        ]))
        .unwrap();

        assert_eq!(prefs.destination, "Lisbon, Portugal");
        assert_eq!(prefs.days, 2);
        assert_eq!(prefs.dietary, Dietary::Vegan);
        assert_eq!(prefs.vibe, Vibe::Outdoors);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(command()
            .try_get_matches_from(["travel-buddy", "--days", "0"])
            .is_err());
        assert!(command()
            .try_get_matches_from(["travel-buddy", "--quirkiness", "101"])
            .is_err());
        assert!(command()
            .try_get_matches_from(["travel-buddy", "--temperature", "1.5"])
            .is_err());
        assert!(command()
            .try_get_matches_from(["travel-buddy", "--vibe", "chaotic"])
            .is_err());
    }

    #[test]
    fn test_preset_help_lists_labels() {
        let help = command().render_long_help().to_string();
        assert!(help.contains("Tokyo Foodie (5 days)"), "{help}");
        assert!(help.contains("NYC Culture (3 days, Offbeat)"), "{help}");
    }

    #[test]
    fn test_export_defaults_directory() {
        let matches = parse(&["--export"]);
        assert_eq!(
            matches.get_one::<PathBuf>("export"),
            Some(&PathBuf::from(DEFAULT_EXPORT_DIR))
        );
        assert!(parse(&[]).get_one::<PathBuf>("export").is_none());
    }

    #[test]
    fn test_model_overrides() {
        let matches = parse(&["--model", "gpt-4.1", "--temperature", "0.2"]);
        let options = options_from_matches(&matches);
        assert_eq!(options.model.as_deref(), Some("gpt-4.1"));
        assert_eq!(options.temperature, Some(0.2));

        let config = config_from_matches(&parse(&["--api-key", "sk-x"]), Config::default());
        assert_eq!(config.api_key(), Some("sk-x"));
    }
}
