// Command line front end for the league engine.
// Reads a league snapshot, prints derived tables, and writes a new snapshot for admin commands.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ffl_hub::awards::{season_awards, weekly_awards};
use ffl_hub::config::generate_sample_config;
use ffl_hub::gate;
use ffl_hub::history::{compute_history_stats, rivalry};
use ffl_hub::ingest::parse_players_csv;
use ffl_hub::matchup::{format_moneyline, next_unscored_week, week_lines};
use ffl_hub::playoffs::{playoff_picture, playoff_probability_series, LosersBracket};
use ffl_hub::standings::{power_rankings, strength_of_schedule};
use ffl_hub::trade::analyze_trade;
use ffl_hub::{Config, League};

#[derive(Parser)]
#[command(name = "ffl-hub")]
#[command(about = "Fantasy football league hub: standings, lines, playoffs and history")]
struct Cli {
    /// YAML configuration file (defaults to ffl-hub.yaml if present)
    #[arg(short, long)]
    config: Option<String>,

    /// League snapshot JSON
    #[arg(short, long, default_value = "league.json")]
    league: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a freshly seeded league snapshot
    Init {
        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
    },
    /// Power rankings
    Rankings,
    /// Betting lines for a week (defaults to the next unscored week)
    Lines {
        #[arg(long)]
        week: Option<u32>,
    },
    /// Playoff seeds and brackets
    Playoffs,
    /// Week-by-week playoff projection
    Odds,
    /// Remaining strength of schedule
    ScheduleStrength,
    /// Career franchise records
    History,
    /// Every meeting between two franchises
    Rivalry {
        a: String,
        b: String,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Weekly and season awards
    Awards,
    /// Value a trade between two teams
    Trade {
        #[arg(long)]
        team_a: String,
        #[arg(long)]
        team_b: String,
        /// Player ids team A sends (comma separated)
        #[arg(long, value_delimiter = ',')]
        send_a: Vec<String>,
        /// Player ids team B sends (comma separated)
        #[arg(long, value_delimiter = ',')]
        send_b: Vec<String>,
    },
    /// Import players from a rankings CSV
    ImportCsv {
        file: String,
        /// Replace the whole player pool instead of appending new players
        #[arg(long)]
        replace: bool,
    },
    /// Schedule a game
    AddGame {
        #[arg(long)]
        week: u32,
        #[arg(long)]
        home: String,
        #[arg(long)]
        away: String,
    },
    /// Enter the score of the index-th game of a week
    Result {
        #[arg(long)]
        week: u32,
        #[arg(long, default_value = "0")]
        index: usize,
        #[arg(long)]
        home_score: f64,
        #[arg(long)]
        away_score: f64,
        /// Leave the game open instead of marking it final
        #[arg(long)]
        open: bool,
    },
    /// Set the commissioner password for the first time
    SetPassword { password: String, confirm: String },
    /// Unlock commissioner commands
    Unlock { password: String },
    /// Lock commissioner commands
    Lock,
    /// Print a sample configuration file
    SampleConfig,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load(path: &str) -> Result<League> {
    League::load(path).with_context(|| format!("loading league from {}", path))
}

fn save(league: &League, path: &str) -> Result<()> {
    league
        .save(path)
        .with_context(|| format!("saving league to {}", path))
}

/// Apply a commissioner transform. Leagues without a password are open.
fn commissioner<F>(league: &League, f: F) -> Result<League>
where
    F: FnOnce(&League) -> League,
{
    if gate::has_password(league) {
        Ok(gate::guarded(league, f)?)
    } else {
        Ok(f(league))
    }
}

fn team_name(league: &League, team_id: &str) -> String {
    league
        .team(team_id)
        .map_or_else(|| team_id.to_string(), |t| t.name.clone())
}

fn truncate(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn print_rankings(league: &League, config: &Config) {
    println!("\nPower Rankings:");
    println!(
        "{:>4} {:<24} {:>4} {:>4} {:>9} {:>9} {:>6}",
        "Rank", "Team", "W", "L", "PF", "PA", "Power"
    );
    println!("{}", "-".repeat(66));
    for (i, s) in power_rankings(league, &config.model).iter().enumerate() {
        println!(
            "{:>4} {:<24} {:>4} {:>4} {:>9.1} {:>9.1} {:>6.3}",
            i + 1,
            truncate(&s.name, 24),
            s.wins,
            s.losses,
            s.points_for,
            s.points_against,
            s.power_score
        );
    }
}

fn print_lines(league: &League, config: &Config, week: Option<u32>) {
    let week = week.unwrap_or_else(|| next_unscored_week(league));
    let lines = week_lines(league, week, &config.model);
    println!("\nWeek {} Lines:", week);
    if lines.is_empty() {
        println!("No games scheduled.");
        return;
    }
    for gl in lines {
        let l = &gl.line;
        let fav = if l.home_favored { &gl.home_id } else { &gl.away_id };
        println!(
            "{} vs {}  |  {} -{:.1}  O/U {:.1}  |  ML {} / {}  |  win {:.1}% / {:.1}%",
            team_name(league, &gl.home_id),
            team_name(league, &gl.away_id),
            team_name(league, fav),
            l.spread,
            l.over_under,
            format_moneyline(l.home_moneyline),
            format_moneyline(l.away_moneyline),
            l.home_win_prob * 100.0,
            l.away_win_prob * 100.0,
        );
    }
}

fn print_playoffs(league: &League, config: &Config) {
    let picture = playoff_picture(league, &config.playoffs);
    println!("\nProjected Seeds:");
    println!("{:>4} {:<24} {:>7} {:>9}", "Seed", "Team", "Record", "PF");
    println!("{}", "-".repeat(48));
    for s in &picture.seeds {
        println!(
            "{:>4} {:<24} {:>7} {:>9.1}",
            s.seed,
            truncate(&s.name, 24),
            format!("{}-{}", s.wins, s.losses),
            s.points_for
        );
    }
    println!("\nWinners Bracket:");
    for (hi, lo) in &picture.winners_pairings {
        println!("  ({}) {} vs ({}) {}", hi.seed, hi.name, lo.seed, lo.name);
    }
    println!("\nLosers Bracket:");
    match &picture.losers {
        LosersBracket::Populated { pairings, .. } => {
            for (hi, lo) in pairings {
                println!("  ({}) {} vs ({}) {}", hi.seed, hi.name, lo.seed, lo.name);
            }
        }
        LosersBracket::NotEnoughTeams { have, need } => {
            println!(
                "  Needs {} non-playoff teams; currently {}.",
                need, have
            );
        }
    }
}

fn print_odds(league: &League, config: &Config) {
    let series = playoff_probability_series(league, &config.model, &config.playoffs);
    print!("\n{:<24}", "Team");
    for row in &series {
        print!(" {:>4}", format!("W{}", row.week));
    }
    println!();
    for team in &league.teams {
        print!("{:<24}", truncate(&team.name, 24));
        for row in &series {
            print!(" {:>4}", if row.is_in(&team.id) { "IN" } else { "-" });
        }
        println!();
    }
}

fn print_schedule_strength(league: &League, config: &Config) {
    println!("\nRemaining Strength of Schedule (easiest first):");
    for s in strength_of_schedule(league, &config.model) {
        let weekly: Vec<String> = s
            .weekly
            .iter()
            .map(|w| w.map_or_else(|| "bye".to_string(), |v| format!("{:.2}", v)))
            .collect();
        println!(
            "{:<24} {:>6.3}  {}",
            truncate(&s.name, 24),
            s.remaining_avg,
            weekly.join(" ")
        );
    }
}

fn print_history(league: &League) {
    println!("\nFranchise History:");
    println!(
        "{:<24} {:>4} {:>5} {:>5} {:>6} {:>5} {:>5} {:>5} {:>5}",
        "Franchise", "Yrs", "W", "L", "Pct", "Ch", "PO", "Top3", "Top5"
    );
    println!("{}", "-".repeat(74));
    for st in compute_history_stats(league) {
        println!(
            "{:<24} {:>4} {:>5} {:>5} {:>6.3} {:>5} {:>5} {:>5} {:>5}",
            truncate(&st.name, 24),
            st.seasons,
            st.wins,
            st.losses,
            st.win_pct,
            st.championships,
            st.playoff_apps,
            st.top3,
            st.top5
        );
        if let (Some(easy), Some(tough)) = (&st.easiest, &st.toughest) {
            println!(
                "    easiest: {} ({:.3} over {})  toughest: {} ({:.3} over {})",
                league.history.franchise_name(&easy.opponent_id),
                easy.pct,
                easy.games,
                league.history.franchise_name(&tough.opponent_id),
                tough.pct,
                tough.games
            );
        }
    }
}

fn print_rivalry(league: &League, a: &str, b: &str, year: Option<i32>) {
    let r = rivalry(league, a, b, year);
    let name_a = league.history.franchise_name(a);
    let name_b = league.history.franchise_name(b);
    println!(
        "\n{} {} - {} {}  (avg margin {:+.1})",
        name_a, r.wins_a, r.wins_b, name_b, r.avg_margin
    );
    for g in &r.games {
        println!(
            "  {} wk {:>2}: {} {:.1} - {:.1} {}",
            g.year.map_or_else(|| "----".to_string(), |y| y.to_string()),
            g.week.map_or_else(|| "-".to_string(), |w| w.to_string()),
            league.history.franchise_name(&g.home_franchise_id),
            g.home_score,
            g.away_score,
            league.history.franchise_name(&g.away_franchise_id),
        );
    }
}

fn print_awards(league: &League) {
    println!("\nWeekly Awards:");
    for w in weekly_awards(league) {
        println!("Week {}", w.week);
        if let Some(top) = &w.top_score {
            println!("  Top score:       {} {:.1}", team_name(league, &top.team_id), top.score);
        }
        if let Some(n) = &w.narrowest_win {
            println!("  Narrowest win:   {} by {:.1}", team_name(league, &n.team_id), n.margin);
        }
        if let Some(b) = &w.biggest_blowout {
            println!("  Biggest blowout: {} by {:.1}", team_name(league, &b.team_id), b.margin);
        }
    }
    let season = season_awards(league);
    println!("\nSeason Awards:");
    if let Some(id) = season.most_points {
        println!("  Most points: {}", team_name(league, &id));
    }
    if let Some(id) = season.best_record {
        println!("  Best record: {}", team_name(league, &id));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, source) = Config::resolve(cli.config.as_deref());
    init_logging(&config.logging.level);
    source.report();

    let path = cli.league.as_str();
    match cli.command {
        Commands::SampleConfig => {
            print!("{}", generate_sample_config());
        }
        Commands::Init { force } => {
            if Path::new(path).exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path);
            }
            save(&League::seed(), path)?;
        }
        Commands::Rankings => print_rankings(&load(path)?, &config),
        Commands::Lines { week } => print_lines(&load(path)?, &config, week),
        Commands::Playoffs => print_playoffs(&load(path)?, &config),
        Commands::Odds => print_odds(&load(path)?, &config),
        Commands::ScheduleStrength => print_schedule_strength(&load(path)?, &config),
        Commands::History => print_history(&load(path)?),
        Commands::Rivalry { a, b, year } => print_rivalry(&load(path)?, &a, &b, year),
        Commands::Awards => print_awards(&load(path)?),
        Commands::Trade {
            team_a,
            team_b,
            send_a,
            send_b,
        } => {
            let league = load(path)?;
            let Some(t) = analyze_trade(&league, &team_a, &team_b, &send_a, &send_b, &config.trade)
            else {
                bail!("unknown team id ({} or {})", team_a, team_b);
            };
            println!("\nTrade Analysis:");
            for side in [&t.side_a, &t.side_b] {
                println!(
                    "{:<24} before {:>6.0}  after {:>6.0}  delta {:>+6.0}",
                    truncate(&team_name(&league, &side.team_id), 24),
                    side.before,
                    side.after,
                    side.delta
                );
            }
            println!("Grade: {} ({}), swing {:.0}", t.grade, t.grade.description(), t.swing);
        }
        Commands::ImportCsv { file, replace } => {
            let league = load(path)?;
            let text = fs::read_to_string(&file).with_context(|| format!("reading {}", file))?;
            let players = parse_players_csv(&text).with_context(|| format!("parsing {}", file))?;
            info!(count = players.len(), file = %file, "parsed players");
            let next = commissioner(&league, |l| {
                if replace {
                    l.with_players(players)
                } else {
                    l.merge_players(players)
                }
            })?;
            save(&next, path)?;
        }
        Commands::AddGame { week, home, away } => {
            let league = load(path)?;
            let next = commissioner(&league, |l| l.add_game(week, &home, &away))?;
            save(&next, path)?;
        }
        Commands::Result {
            week,
            index,
            home_score,
            away_score,
            open,
        } => {
            let league = load(path)?;
            let next = commissioner(&league, |l| {
                l.set_game_result(week, index, home_score, away_score, !open)
            })?;
            save(&next, path)?;
        }
        Commands::SetPassword { password, confirm } => {
            let league = load(path)?;
            save(&gate::set_password(&league, &password, &confirm)?, path)?;
        }
        Commands::Unlock { password } => {
            let league = load(path)?;
            save(&gate::unlock(&league, &password)?, path)?;
        }
        Commands::Lock => {
            let league = load(path)?;
            save(&gate::lock(&league), path)?;
        }
    }
    Ok(())
}
