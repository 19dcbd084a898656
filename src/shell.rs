use anyhow::Result;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::browser::Browser;
use crate::layers::render::{render_details, statistics_text};

const HELP: &str = "\
commands:
  search <text>      filter by title/subject (no text clears)
  subject <name|->   exact subject, '-' unsets
  semester <n|->     semester number, '-' unsets
  type <tag|->       notes, papers, books, other; '-' unsets
  clear              reset every filter
  details <id>       show one resource
  download <id>      save a resource's file
  stats | subjects | reload | help | quit";

#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Search(String),
    Subject(Option<String>),
    Semester(Option<String>),
    Type(Option<String>),
    Clear,
    Details(i64),
    Download(i64),
    Stats,
    Subjects,
    Reload,
    Help,
    Quit,
}

fn selector(arg: &str) -> Option<String> {
    match arg {
        "" | "-" => None,
        value => Some(value.to_string()),
    }
}

fn id_arg(arg: &str) -> Result<i64, String> {
    arg.parse()
        .map_err(|_| format!("expected a numeric id, got {:?}", arg))
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim_start();
    // only the single separator is dropped; the search text keeps its spaces
    let (cmd, raw) = match line.split_once(char::is_whitespace) {
        Some((cmd, raw)) => (cmd, raw),
        None => (line, ""),
    };
    let arg = raw.trim();

    match cmd {
        "search" | "s" => Ok(ShellCommand::Search(raw.to_string())),
        "subject" => Ok(ShellCommand::Subject(selector(arg))),
        "semester" => Ok(ShellCommand::Semester(selector(arg))),
        "type" => Ok(ShellCommand::Type(selector(arg))),
        "clear" => Ok(ShellCommand::Clear),
        "details" | "d" => id_arg(arg).map(ShellCommand::Details),
        "download" | "dl" => id_arg(arg).map(ShellCommand::Download),
        "stats" => Ok(ShellCommand::Stats),
        "subjects" => Ok(ShellCommand::Subjects),
        "reload" => Ok(ShellCommand::Reload),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command {:?}, try 'help'", other)),
    }
}

/// Prints the outcome of a load: the grid, or a failure notice plus the empty state.
pub async fn load_and_show(browser: &mut Browser) {
    if let Err(e) = browser.load().await {
        eprintln!("❌ Failed to load resources. Error: {}", e);
    }
    print!("{}", browser.view().to_text());
}

pub async fn run(browser: &mut Browser, download_dir: &Path) -> Result<()> {
    load_and_show(browser).await;
    println!("\n{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("> ");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(msg) => {
                eprintln!("{}", msg);
                continue;
            }
        };
        tracing::debug!("Shell command: {:?}", command);

        match command {
            ShellCommand::Search(term) => {
                browser.update_criteria(|c| c.search = term);
            }
            ShellCommand::Subject(subject) => {
                browser.update_criteria(|c| c.subject = subject);
            }
            ShellCommand::Semester(semester) => {
                browser.update_criteria(|c| c.semester = semester);
            }
            ShellCommand::Type(kind) => {
                browser.update_criteria(|c| c.kind = kind);
            }
            ShellCommand::Clear => {
                browser.set_criteria(Default::default());
            }
            ShellCommand::Details(id) => {
                match browser.details(id) {
                    Some(resource) => println!("{}", render_details(resource)),
                    None => eprintln!("No resource with id {}", id),
                }
                continue;
            }
            ShellCommand::Download(id) => {
                if let Some(resource) = browser.details(id) {
                    println!("✅ Downloading \"{}\"...", resource.title);
                }
                match browser.download(id, download_dir).await {
                    Ok(outcome) => {
                        println!("✅ Saved to {}", outcome.saved.display());
                        if let Err(e) = outcome.refresh {
                            eprintln!("❌ Failed to load resources. Error: {}", e);
                        }
                    }
                    Err(e) => eprintln!("❌ Failed to download resource: {}", e),
                }
            }
            ShellCommand::Stats => {
                println!("{}", statistics_text(&browser.statistics()));
                continue;
            }
            ShellCommand::Subjects => {
                for subject in browser.subject_options() {
                    println!("  {}", subject);
                }
                continue;
            }
            ShellCommand::Reload => {
                load_and_show(browser).await;
                continue;
            }
            ShellCommand::Help => {
                println!("{}", HELP);
                continue;
            }
            ShellCommand::Quit => break,
        }

        print!("{}", browser.view().to_text());
    }
    Ok(())
}
