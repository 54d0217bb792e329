use std::io::IsTerminal;

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use inquire::{CustomType, Text};
use tracing::warn;
use wxdash_core::{
    Config, DashboardContext, Snapshot, Theme, UiState, provider_from_config, run_dashboard,
};

use crate::terminal;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wxdash", version, about = "Weather station dashboard")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `show`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the latest observations and draw the dashboard.
    Show(ShowArgs),

    /// Edit the configuration file, prompting for anything not given as a flag.
    Configure(ConfigureArgs),

    /// Print, set or toggle the colour theme.
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeMode>,
    },

    /// Print where the configuration file lives.
    ConfigPath,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ShowArgs {
    /// How many observations to fetch for the charts.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Override the weather service base URL.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Override the display timezone, e.g. "Europe/Amsterdam".
    #[arg(long)]
    pub timezone: Option<String>,

    /// Print slot values and chart series as JSON instead of drawing.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigureArgs {
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// Metres above sea level.
    #[arg(long, allow_negative_numbers = true)]
    pub elevation: Option<f64>,

    #[arg(long)]
    pub timezone: Option<String>,

    /// Keep current values for anything not given as a flag.
    #[arg(long)]
    pub no_prompt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeMode {
    Dark,
    Light,
    Toggle,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command.unwrap_or_else(|| Command::Show(ShowArgs::default())) {
            Command::Show(args) => show(args).await,
            Command::Configure(args) => configure(args),
            Command::Theme { mode } => theme(mode),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn apply_show_overrides(config: &mut Config, args: &ShowArgs) {
    if let Some(limit) = args.limit {
        config.history_limit = limit;
    }
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if let Some(tz) = &args.timezone {
        config.timezone = tz.clone();
    }
}

async fn show(args: ShowArgs) -> Result<()> {
    let mut config = Config::load()?;
    apply_show_overrides(&mut config, &args);

    let ctx = DashboardContext::from_config(&config)?;
    let provider = provider_from_config(&config)?;

    let theme = UiState::load()
        .map(|state| state.theme)
        .unwrap_or_else(|err| {
            warn!(error = %format!("{err:#}"), "could not read theme preference");
            Theme::default()
        });

    let mut snapshot = Snapshot::new();
    let outcome = run_dashboard(provider.as_ref(), &mut snapshot, &ctx, Utc::now()).await;

    if !outcome.weather.is_ready() && !outcome.metar.is_ready() {
        warn!(url = %config.base_url, "weather service unavailable");
    }

    if args.json {
        println!("{}", snapshot.to_json()?);
    } else {
        let color = std::io::stdout().is_terminal();
        print!("{}", terminal::draw(&snapshot, theme, color));
    }

    Ok(())
}

fn configure(args: ConfigureArgs) -> Result<()> {
    let path = Config::config_file_path()?;
    // Read the file alone so environment overrides don't get saved.
    let mut config = Config::load_from(&path)?;

    let prompt = !args.no_prompt;

    config.base_url = match args.base_url {
        Some(url) => url,
        None if prompt => Text::new("Weather service URL:")
            .with_default(&config.base_url)
            .prompt()?,
        None => config.base_url,
    };
    config.latitude = ask_number(args.latitude, prompt, "Latitude:", config.latitude)?;
    config.longitude = ask_number(args.longitude, prompt, "Longitude:", config.longitude)?;
    config.elevation = ask_number(
        args.elevation,
        prompt,
        "Elevation (metres):",
        config.elevation,
    )?;
    config.timezone = match args.timezone {
        Some(tz) => tz,
        None if prompt => Text::new("Timezone (IANA name):")
            .with_default(&config.timezone)
            .prompt()?,
        None => config.timezone,
    };

    config.validate()?;
    config.save_to(&path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn ask_number(flag: Option<f64>, prompt: bool, message: &str, current: f64) -> Result<f64> {
    match flag {
        Some(value) => Ok(value),
        None if prompt => Ok(CustomType::<f64>::new(message)
            .with_default(current)
            .with_error_message("Please enter a number")
            .prompt()?),
        None => Ok(current),
    }
}

fn theme(mode: Option<ThemeMode>) -> Result<()> {
    let mut state = UiState::load()?;

    if let Some(mode) = mode {
        state.theme = match mode {
            ThemeMode::Dark => Theme::Dark,
            ThemeMode::Light => Theme::Light,
            ThemeMode::Toggle => state.theme.toggle(),
        };
        state.save()?;
    }

    println!("{}", state.theme);
    Ok(())
}
