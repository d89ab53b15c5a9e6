//! Interactive chat command
//!
//! Lines starting with `/` are commands, anything else is a question.

use super::{build_tutor, load_documents, write_export};
use crate::app::ChatArgs;
use crate::output;
use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use studydesk_core::{Config, Providers, RoutingMode, Tutor, ALL_FAILED_LABEL};

const HELP: &str = "\
Commands:
  /new             archive this conversation and start a fresh one
  /sessions        list archived conversations
  /restore NAME    switch back to an archived conversation
  /load FILE...    replace the loaded course documents
  /clear           forget the loaded course documents
  /mode MODE       auto, fast, expert or reasoning
  /export PATH     write the last answer to a .docx or .pdf file
  /help            show this help
  /quit            leave";

enum Flow {
    Continue,
    Quit,
}

struct ChatLoop<'a> {
    tutor: Tutor,
    providers: Providers,
    mode: RoutingMode,
    config: &'a Config,
}

impl ChatLoop<'_> {
    async fn handle_command(&mut self, line: &str) -> Result<Flow> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let rest: Vec<&str> = parts.collect();

        match command {
            "/quit" | "/exit" => return Ok(Flow::Quit),
            "/help" => println!("{}", HELP),
            "/new" => match self.tutor.state_mut().new_session() {
                Some(name) => println!("Archived: {}", name),
                None => println!("New conversation"),
            },
            "/sessions" => {
                let names = self.tutor.state().archived_names();
                if names.is_empty() {
                    println!("No archived conversations");
                }
                for name in names {
                    println!("  {}", name);
                }
            }
            "/restore" => {
                let name = rest.join(" ");
                self.tutor.state_mut().restore(&name)?;
                println!("Restored: {}", name);
            }
            "/load" => {
                let paths: Vec<PathBuf> = rest.iter().map(PathBuf::from).collect();
                if paths.is_empty() {
                    println!("Usage: /load FILE...");
                } else {
                    load_documents(&mut self.tutor, &self.providers, &paths).await;
                }
            }
            "/clear" => {
                self.tutor.state_mut().clear_document();
                println!("Documents cleared");
            }
            "/mode" => {
                self.mode = rest.join(" ").parse()?;
                println!("Mode: {:?}", self.mode);
            }
            "/export" => {
                let Some(path) = rest.first() else {
                    println!("Usage: /export PATH");
                    return Ok(Flow::Continue);
                };
                let session = self.tutor.state().current();
                let answer = session
                    .last_answer()
                    .filter(|m| m.model_label.as_deref() != Some(ALL_FAILED_LABEL));
                match answer {
                    Some(message) => {
                        let title = session.title();
                        write_export(
                            std::path::Path::new(path),
                            &title,
                            &message.content,
                            false,
                            self.config,
                        )?;
                    }
                    None => println!("Nothing to export yet"),
                }
            }
            other => println!("Unknown command: {} (try /help)", other),
        }
        Ok(Flow::Continue)
    }

    async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        if line.starts_with('/') {
            return self.handle_command(line).await;
        }
        let answer = self.tutor.ask(line, self.mode).await;
        output::print_answer(&answer, crate::app::OutputFormat::Cli, false)?;
        println!();
        Ok(Flow::Continue)
    }
}

pub async fn run(args: ChatArgs, config: &Config) -> Result<()> {
    let (mut tutor, providers) = build_tutor(config).await?;
    load_documents(&mut tutor, &providers, &args.docs).await;

    eprintln!(
        "studydesk chat ({}). Type /help for commands.",
        tutor.subject().label()
    );

    let mut chat = ChatLoop {
        tutor,
        providers,
        mode: args.mode,
        config,
    };

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Command errors are reported without leaving the session
        match chat.handle_line(line).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("Error: {:#}", e),
        }
    }
    Ok(())
}
