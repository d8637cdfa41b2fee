use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use kitchen_dashboard::{
    AppError, AppState, Config, clock, commands, render, source::DatasetSource,
};
use kitchen_shared::{FileStorage, Storage};

/// kitchen-dashboard - what to cook today and what to buy this week
#[derive(Parser)]
#[command(name = "kitchen-dashboard")]
#[command(about = "Daily recipe rotation, prep reminders and weekly grocery list", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's recipe for the selected category and meal
    Today {
        /// Switch (and remember) the recipe category
        #[arg(long)]
        category: Option<String>,

        /// Switch (and remember) the meal slot
        #[arg(long)]
        meal: Option<String>,
    },
    /// List prep notes for the upcoming meals
    Prep,
    /// Show this week's grocery list
    Grocery {
        /// Days to plan for (overrides config file)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Toggle a grocery item as bought
    Check {
        name: String,

        #[arg(long)]
        unit: Option<String>,
    },
    /// Uncheck every grocery item of the current week
    Clear,
    /// List the recipe categories
    Categories,
    /// Keep rendering the dashboard, refreshing when the day changes
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    kitchen_dashboard::observability::init_observability(
        "kitchen-dashboard",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
        config.observability.json,
    )?;

    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&config.data.state_path)?);

    let dataset = match DatasetSource::new(&config.data, storage.clone()).load().await {
        Ok((dataset, from)) => {
            tracing::debug!(?from, "Recipe dataset ready");
            dataset
        }
        Err(AppError::DataUnavailable(reason)) => {
            tracing::error!(%reason, "No recipe data");
            println!("{}", render::LOAD_FAILED);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let tz = config.dashboard.timezone.as_deref();
    let now = clock::now(tz);
    let today = now.date();
    let slots = &config.dashboard.meal_slots;
    let default_meal = slots.slot_for_hour(now.hour()).unwrap_or_default().to_owned();

    let mut state = AppState::restore(dataset, &config.dashboard, storage.as_ref(), &default_meal)?;

    let output = match cli.command {
        Commands::Today { category, meal } => {
            if let Some(category) = category {
                state.select_category(&category, storage.as_ref())?;
            }
            if let Some(meal) = meal {
                state.select_meal(&meal, storage.as_ref())?;
            }
            commands::today(&state, today)
        }
        Commands::Prep => commands::prep(&state, today),
        Commands::Grocery { days } => {
            if let Some(days) = days {
                if days == 0 {
                    anyhow::bail!("--days must be at least 1");
                }
                state.horizon_days = days;
            }
            commands::grocery(&state, today, storage.as_ref())?
        }
        Commands::Check { name, unit } => {
            commands::check(&state, today, &name, unit.as_deref(), storage.as_ref())?
        }
        Commands::Clear => commands::clear(&state, today, storage.as_ref())?,
        Commands::Categories => commands::categories(&state),
        Commands::Watch => {
            commands::watch(&state, storage.as_ref(), tz, Duration::from_secs(60)).await?;
            return Ok(());
        }
    };

    print!("{output}");

    Ok(())
}
