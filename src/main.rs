use color_eyre::eyre::{Result, WrapErr};
use crossterm::style::{StyledContent, Stylize};
use log::{error, info};
use rand::rngs::ThreadRng;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;
use strum::IntoEnumIterator;

use zone_dice::error::AppError;
use zone_dice::history::{ROT_DAMAGE_STREAM, ROT_PROTECTION_STREAM, SKILL_STREAM};
use zone_dice::skills::{self, SkillInfo};
use zone_dice::{
    Attribute, CharacterSheet, DiceConfig, DiceError, DiceRoller, DieColor, DieResult, FileStorage,
    HistoryBook, RngFaces, RollSummary, RotConfig, RotPhase, RotWorkflow, Settings, logging,
};

const FREE_STREAM: &str = "dice";

const HELP: &str = "\
commands:
  pool <green> <yellow> <black>   set the free dice pool
  roll [description]              roll the free pool
  push                            push the last free roll
  history [stream]                show a stream's history (dice, skill, rot-protection, rot-damage)
  clear [stream]                  clear a stream's history
  skills                          list skills
  skill <id> [gear bonus]         roll a skill from the character sheet
  rot <points> [resistant] [suit <rating>]
                                  start a rot exposure
  rot roll                        roll the next rot step
  rot reset                       restart the rot exposure
  sheet                           show the character sheet
  quit";

struct Session {
    settings: Settings,
    book: HistoryBook<FileStorage>,
    sheet: CharacterSheet,
    faces: RngFaces<ThreadRng>,
    free: DiceRoller,
    skill: DiceRoller,
    protection: DiceRoller,
    damage: DiceRoller,
    rot: RotWorkflow,
}

impl Session {
    fn new(settings: Settings, storage: FileStorage) -> Self {
        let sheet = CharacterSheet::load(&storage);
        let book = HistoryBook::new(storage);
        // Without rot on the sheet the tray waits for a `rot <points>` command.
        let config = sheet
            .rot_config(settings.resistant_dice)
            .unwrap_or_else(|| RotConfig::default().resistant_dice(settings.resistant_dice));
        let rot = RotWorkflow::new(config);
        Self {
            free: DiceRoller::with_history(FREE_STREAM, book.load(FREE_STREAM)),
            skill: DiceRoller::with_history(SKILL_STREAM, book.load(SKILL_STREAM)),
            protection: DiceRoller::with_history(
                ROT_PROTECTION_STREAM,
                book.load(ROT_PROTECTION_STREAM),
            ),
            damage: DiceRoller::with_history(ROT_DAMAGE_STREAM, book.load(ROT_DAMAGE_STREAM)),
            faces: RngFaces::default(),
            settings,
            book,
            sheet,
            rot,
        }
    }

    fn tray(&self, stream: &str) -> Option<&DiceRoller> {
        [&self.free, &self.skill, &self.protection, &self.damage]
            .into_iter()
            .find(|tray| tray.stream() == stream)
    }

    fn tray_mut(&mut self, stream: &str) -> Option<&mut DiceRoller> {
        [
            &mut self.free,
            &mut self.skill,
            &mut self.protection,
            &mut self.damage,
        ]
        .into_iter()
        .find(|tray| tray.stream() == stream)
    }

    // Returns false when the user asked to quit.
    fn run_command(&mut self, line: &str) -> Result<bool> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => return Ok(false),
            ["help"] => println!("{}", HELP),
            ["pool", green, yellow, black] => {
                let config = DiceConfig::new(
                    parse_count(green),
                    parse_count(yellow),
                    parse_count(black),
                );
                self.free.set_config(config);
                println!(
                    "Pool: {} green, {} yellow, {} black",
                    config.green, config.yellow, config.black
                );
            }
            ["roll", description @ ..] => {
                let description = description.join(" ");
                let result = self
                    .free
                    .roll(&mut self.faces, &description)
                    .map(<[DieResult]>::to_vec);
                self.show_roll(FREE_STREAM, result)?;
            }
            ["push"] => {
                let result = self.free.push(&mut self.faces).map(<[DieResult]>::to_vec);
                self.show_roll(FREE_STREAM, result)?;
            }
            ["history"] => self.show_history(FREE_STREAM),
            ["history", stream] => self.show_history(stream),
            ["clear"] => self.clear_history(FREE_STREAM)?,
            ["clear", stream] => self.clear_history(stream)?,
            ["skills"] => show_skills(),
            ["skill", id] => self.roll_skill(id, 0)?,
            ["skill", id, gear] => self.roll_skill(id, parse_count(gear))?,
            ["rot", "roll"] => self.roll_rot()?,
            ["rot", "reset"] => {
                self.rot = self.rot.clone().reset();
                self.show_rot();
            }
            ["rot", points, options @ ..] => self.configure_rot(points, options),
            ["sheet"] => self.show_sheet(),
            _ => println!("{}", "Unknown command, try 'help'".red()),
        }
        Ok(true)
    }

    // Display a roll, wait for the dice to land, then persist the stream.
    fn show_roll(
        &mut self,
        stream: &str,
        result: Result<Vec<DieResult>, DiceError>,
    ) -> Result<()> {
        let dice = match result {
            Ok(dice) => dice,
            Err(e) => {
                println!("{}", e.to_string().red());
                return Ok(());
            }
        };

        println!("{}", "Rolling...".italic());
        thread::sleep(Duration::from_millis(self.settings.animation_ms));
        let Some(tray) = self.tray_mut(stream) else {
            return Ok(());
        };
        let summary = tray.settle();
        let can_push = tray.can_push();

        println!("{}", render_dice(&dice));
        print_summary(&summary, dice.iter().any(|d| d.color == DieColor::Black));
        if can_push {
            println!("{}", "You may push this roll.".yellow());
        }
        self.persist(stream)
    }

    fn persist(&mut self, stream: &str) -> Result<()> {
        let Some(tray) = self.tray(stream) else {
            return Ok(());
        };
        let history = tray.history().clone();
        self.book
            .save(stream, &history)
            .map_err(AppError::from)
            .wrap_err_with(|| format!("Failed to save history for '{}'", stream))
    }

    fn show_history(&self, stream: &str) {
        let Some(tray) = self.tray(stream) else {
            println!("{}", format!("Unknown stream '{}'", stream).red());
            return;
        };
        if tray.history().is_empty() {
            println!("No rolls yet");
            return;
        }
        for entry in tray.history().list() {
            let summary = entry.summary();
            let line = format!("{}: {}", entry.description, render_dice(&entry.results));
            if entry.is_push() {
                println!("{}", line.italic());
            } else {
                println!("{}", line);
            }
            print_summary(&summary, entry.has_equipment_dice());
        }
    }

    fn clear_history(&mut self, stream: &str) -> Result<()> {
        let Some(tray) = self.tray_mut(stream) else {
            println!("{}", format!("Unknown stream '{}'", stream).red());
            return Ok(());
        };
        tray.clear_history();
        self.book
            .clear(stream)
            .map_err(AppError::from)
            .wrap_err("Failed to clear history")
    }

    fn roll_skill(&mut self, id: &str, gear_bonus: u32) -> Result<()> {
        let Some(info) = skills::find_skill(id) else {
            println!("{}", AppError::UnknownSkill(id.to_string()).to_string().red());
            return Ok(());
        };
        let Some(pool) = self.sheet.pool_for(info, gear_bonus) else {
            println!("{}", format!("{} is not your specialist skill", info.name).red());
            return Ok(());
        };

        self.skill.set_config(pool);
        let result = self
            .skill
            .roll(&mut self.faces, &format!("{} Roll", info.name))
            .map(<[DieResult]>::to_vec);
        let rolled = result.is_ok();
        self.show_roll(SKILL_STREAM, result)?;
        if rolled {
            show_stunts(info, &self.skill.summary());
        }
        Ok(())
    }

    fn configure_rot(&mut self, points: &str, options: &[&str]) {
        let mut config = RotConfig::new(RotConfig::parse_rot_points(points))
            .resistant_dice(self.settings.resistant_dice);
        let mut options = options.iter();
        while let Some(option) = options.next() {
            match *option {
                "resistant" => config = config.resistant(true),
                "suit" => {
                    let rating = options
                        .next()
                        .map(|raw| RotConfig::parse_suit_rating(raw))
                        .unwrap_or(self.settings.default_suit_rating);
                    config = config.suit(Some(rating));
                }
                other => println!("{}", format!("Ignoring '{}'", other).yellow()),
            }
        }
        self.rot = self.rot.clone().reconfigure(config);
        self.show_rot();
    }

    fn roll_rot(&mut self) -> Result<()> {
        match *self.rot.phase() {
            RotPhase::AwaitingProtectionRoll { rot_point } => {
                let Some(pool) = self.rot.protection_pool() else {
                    return Ok(());
                };
                self.protection.set_config(pool);
                let description =
                    format!("Protection {}/{}", rot_point, self.rot.config().rot_points);
                let result = self
                    .protection
                    .roll(&mut self.faces, &description)
                    .map(<[DieResult]>::to_vec);
                let rolled = result.is_ok();
                self.show_roll(ROT_PROTECTION_STREAM, result)?;
                if rolled {
                    let summary = self.protection.summary();
                    self.rot = self.rot.clone().submit_protection_roll(&summary);
                }
            }
            RotPhase::AwaitingDamageRoll => {
                let Some(pool) = self.rot.damage_pool() else {
                    return Ok(());
                };
                self.damage.set_config(pool);
                let result = self
                    .damage
                    .roll(&mut self.faces, "Rot Damage")
                    .map(<[DieResult]>::to_vec);
                let rolled = result.is_ok();
                self.show_roll(ROT_DAMAGE_STREAM, result)?;
                if rolled {
                    let summary = self.damage.summary();
                    self.rot = self.rot.clone().submit_damage_roll(&summary);
                }
            }
            RotPhase::Complete(_) => println!("Exposure complete, use 'rot reset' to start over"),
        }
        self.show_rot();
        Ok(())
    }

    fn show_rot(&self) {
        let config = self.rot.config();
        println!(
            "Rot points: {}, resistant: {}, suit: {}",
            config.rot_points,
            config.rot_resistant,
            self.rot
                .suit_rating()
                .map_or("none".to_string(), |rating| rating.to_string())
        );
        match self.rot.phase() {
            RotPhase::AwaitingProtectionRoll { rot_point } => {
                println!("Awaiting protection roll for rot point {}", rot_point)
            }
            RotPhase::AwaitingDamageRoll => println!(
                "Awaiting damage roll with {} green dice",
                self.rot.remaining()
            ),
            RotPhase::Complete(outcome) => {
                if config.has_protection() {
                    println!("Rot Points Absorbed: {}", outcome.absorbed);
                    println!("Remaining Rot Points: {}", outcome.remaining);
                }
                println!("{}", format!("Damage Taken: {}", outcome.damage).bold());
                if let Some(rating) = outcome.new_suit_rating {
                    println!("New Rot Suit Rating: {}", rating);
                }
            }
        }
    }

    fn show_sheet(&self) {
        let sheet = &self.sheet;
        let name: &str = if sheet.name.is_empty() {
            "(unnamed)"
        } else {
            &sheet.name
        };
        println!("{} - {}", name.bold(), sheet.role);
        for attribute in Attribute::iter() {
            let score = sheet.attributes.get(attribute);
            println!("  {}: {} (trauma {})", attribute, score.value, score.trauma);
        }
        for (skill, value) in &sheet.skills {
            println!("  {}: {}", skill, value);
        }
        println!(
            "  {}: {}",
            sheet.role.specialist_skill_name(),
            sheet.specialist_skill
        );
        println!(
            "  Rot {} / XP {} / Mutation {}",
            sheet.rot_points, sheet.experience_points, sheet.mutation_points
        );
        let weight = format!(
            "  Carried {} of {}",
            sheet.carried_weight(),
            sheet.max_carry_weight()
        );
        if sheet.is_encumbered() {
            println!("{}", weight.red());
        } else {
            println!("{}", weight);
        }
    }
}

fn parse_count(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

fn styled_die(die: &DieResult) -> StyledContent<String> {
    let glyph = die.glyph();
    let styled = match die.color {
        DieColor::Green => glyph.green(),
        DieColor::Yellow => glyph.yellow(),
        DieColor::Black => glyph.dark_grey(),
    };
    if die.pushed { styled.underlined() } else { styled }
}

fn render_dice(dice: &[DieResult]) -> String {
    dice.iter()
        .map(|die| styled_die(die).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_summary(summary: &RollSummary, show_broken: bool) {
    let mut line = format!(
        "  Successes: {}  Failures: {}",
        summary.success_count, summary.failure_count
    );
    if show_broken {
        line.push_str(&format!("  Broken Gear: {}", summary.broken_gear_count));
    }
    println!("{}", line);
}

fn show_skills() {
    for skill in skills::base_skills().chain(skills::specialist_skills()) {
        println!("  {:<24} {} ({})", skill.id, skill.name, skill.attribute);
    }
}

fn show_stunts(info: &SkillInfo, summary: &RollSummary) {
    let stunts = info.available_stunts(summary);
    if stunts.is_empty() {
        return;
    }
    println!("{}", format!("{} Stunts", info.name).bold());
    for stunt in stunts {
        println!("  {}: {}", stunt.name.cyan(), stunt.description);
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let default_dir = logging::default_data_dir();
    let settings = Settings::load(&default_dir);
    let data_dir = settings.storage_dir(&default_dir);
    logging::init(&data_dir, settings.debug_mode)
        .map_err(AppError::from)
        .wrap_err("Failed to initialize logging")?;
    info!("Starting with data dir {}", data_dir.display());

    let mut session = Session::new(settings, FileStorage::new(&data_dir));
    println!("{}", "Zone dice. Type 'help' for commands.".bold());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match session.run_command(line.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!("{:#}", e);
                println!("{}", format!("{:#}", e).red());
            }
        }
    }
    Ok(())
}
