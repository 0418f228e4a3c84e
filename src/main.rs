//! Binary entrypoint for the netquest CLI.
//!
//! Commands:
//! - `init [--demo]` - create `netquest.toml` if absent, seed the player sheet
//! - `status [--json]` - print the character sheet
//! - `quests` / `skills` / `projects` / `timeline` - list collections
//! - `complete-quest <id>` / `unlock-skill <id>` - run progression operations
//! - `grant-xp <amount>` / `train <attribute> <amount>` - direct grants
//! - `feed [--limit N] [--json]` - recent activity, newest first
//!
//! See the library crate docs for module-level details: `netquest::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use netquest::config::Config;
use netquest::rpg::{self, Attribute, RpgError, RpgStore};

#[derive(Parser)]
#[command(name = "netquest")]
#[command(about = "A cyberpunk RPG progression engine for a portfolio character sheet")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "netquest.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default config if needed and seed the player sheet
    Init {
        /// Also install demo quests, skills, and portfolio content
        #[arg(long)]
        demo: bool,
    },
    /// Print the character sheet
    Status {
        /// Emit the raw sheet as JSON
        #[arg(long)]
        json: bool,
    },
    /// List quests
    Quests,
    /// List the skill tree
    Skills,
    /// List portfolio projects
    Projects,
    /// List the work/education timeline
    Timeline,
    /// Complete a quest and collect its rewards
    CompleteQuest {
        /// Quest id
        id: String,
    },
    /// Unlock a skill (level-gated)
    UnlockSkill {
        /// Skill id
        id: String,
    },
    /// Grant XP directly to the player
    GrantXp {
        /// Amount of XP to grant
        amount: u64,
    },
    /// Grant XP to one attribute track
    Train {
        /// Attribute name (learning, collaboration, technical, intelligence, creative)
        attribute: String,
        /// Amount of attribute XP to grant
        amount: u32,
    },
    /// Show recent activity, newest first
    Feed {
        /// Maximum entries to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
        /// Emit entries as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging; Init creates it below if absent.
    let pre_config = Config::load(&cli.config).await.ok();
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init { demo } => {
            if pre_config.is_none() {
                Config::create_default(&cli.config).await?;
                info!("Configuration file created at {}", cli.config);
            }
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            let store = open_store(&config)?;
            let (sheet, created) = rpg::initialize_player(&store, &config.player)?;
            if created {
                println!("Player sheet created for {} (level 1).", sheet.name);
            } else {
                println!("Player sheet already exists for {}; left untouched.", sheet.name);
            }
            if demo {
                let inserted = rpg::seed_demo_content(&store)?;
                println!("Installed {} demo record(s).", inserted);
            }
        }
        Commands::Status { json } => {
            let (_config, store) = load_and_open(pre_config, &cli.config).await?;
            let sheet = store.get_player()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sheet)?);
            } else {
                print!("{}", rpg::format_player_sheet(&sheet));
            }
        }
        Commands::Quests => {
            let (_config, store) = load_and_open(pre_config, &cli.config).await?;
            let quests = store.list_quests()?;
            print!("{}", rpg::format_quest_list(&quests));
        }
        Commands::Skills => {
            let (_config, store) = load_and_open(pre_config, &cli.config).await?;
            let skills = store.list_skills()?;
            print!("{}", rpg::format_skill_tree(&skills));
        }
        Commands::Projects => {
            let (_config, store) = load_and_open(pre_config, &cli.config).await?;
            let projects = rpg::list_projects(&store)?;
            print!("{}", rpg::format_project_list(&projects));
        }
        Commands::Timeline => {
            let (_config, store) = load_and_open(pre_config, &cli.config).await?;
            let entries = rpg::list_experience(&store)?;
            print!("{}", rpg::format_experience_timeline(&entries));
        }
        Commands::CompleteQuest { id } => {
            let (_config, store) = load_and_open(pre_config, &cli.config).await?;
            let outcome = rpg::complete_quest(&store, &id)?;
            if outcome.already_completed {
                println!("Quest '{}' is already completed.", outcome.quest.title);
            } else {
                for entry in outcome.entries() {
                    println!("{}", rpg::format_entry(entry));
                }
                if let Some(sheet) = &outcome.sheet {
                    println!(
                        "Level {} — {}/{} xp (total {})",
                        sheet.level, sheet.current_xp, sheet.xp_to_next_level, sheet.total_xp
                    );
                }
            }
        }
        Commands::UnlockSkill { id } => {
            let (_config, store) = load_and_open(pre_config, &cli.config).await?;
            match rpg::unlock_skill(&store, &id) {
                Ok(outcome) if outcome.already_unlocked => {
                    println!("Skill '{}' is already unlocked.", outcome.skill.label);
                }
                Ok(outcome) => {
                    for entry in outcome.entries() {
                        println!("{}", rpg::format_entry(entry));
                    }
                }
                Err(err @ RpgError::LevelRequirement { .. }) => {
                    println!("Unlock failed: {}", err);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::GrantXp { amount } => {
            let (_config, store) = load_and_open(pre_config, &cli.config).await?;
            let grant = rpg::add_xp(&store, amount)?;
            if let Some(entry) = &grant.level_entry {
                println!("{}", rpg::format_entry(entry));
            }
            println!(
                "Level {} — {}/{} xp (total {})",
                grant.level, grant.current_xp, grant.xp_to_next_level, grant.total_xp
            );
        }
        Commands::Train { attribute, amount } => {
            let (_config, store) = load_and_open(pre_config, &cli.config).await?;
            let attribute: Attribute = attribute.parse()?;
            let gain = rpg::add_attribute_xp(&store, attribute, amount)?;
            println!(
                "{}: {} (+{} point(s), xp {}/100)",
                gain.attribute, gain.value, gain.points_gained, gain.attribute_xp
            );
        }
        Commands::Feed { limit, json } => {
            let (_config, store) = load_and_open(pre_config, &cli.config).await?;
            let entries = rpg::recent_activity(&store, limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", rpg::format_activity_feed(&entries));
            }
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> Result<RpgStore> {
    Ok(RpgStore::open(config.store_path())?)
}

async fn load_and_open(pre_config: Option<Config>, path: &str) -> Result<(Config, RpgStore)> {
    let config = match pre_config {
        Some(config) => config,
        None => Config::load(path).await?,
    };
    let store = open_store(&config)?;
    Ok((config, store))
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity overrides config
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    builder.format(|fmt, record| {
        writeln!(
            fmt,
            "{} [{}] {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            record.level(),
            record.args()
        )
    });
    if let Some(cfg) = config {
        if let Some(ref file) = cfg.logging.file {
            if let Ok(f) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
            {
                builder.target(env_logger::Target::Pipe(Box::new(f)));
            }
        }
    }
    let _ = builder.try_init();
}
