//! REPL session management

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use super::command::{GenTarget, ReplCommand, parse};
use crate::advisor::Advisor;
use crate::document::{render_nuance_document, render_thread_document};
use crate::domain::{Thread, Topic, Turn, WorkshopField, catalogue};
use crate::engine::ConversationEngine;
use crate::error::KaraError;
use crate::store::ThreadStore;
use crate::workshop::{FieldStatus, WorkshopSession};

/// Line that ends multi-line field input
const END_OF_INPUT: &str = ".";

/// Interactive KARA session
pub struct ReplSession {
    engine: ConversationEngine,
    store: ThreadStore,
    workshop: WorkshopSession,
    canned: bool,
}

impl ReplSession {
    /// Create a new session over one advisor
    ///
    /// `canned` only changes the banner.
    pub fn new(advisor: Arc<dyn Advisor>, canned: bool) -> Self {
        Self {
            engine: ConversationEngine::new(advisor.clone()),
            store: ThreadStore::new(advisor.clone()),
            workshop: WorkshopSession::new(advisor),
            canned,
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self, initial_topic: Option<Topic>) -> Result<()> {
        self.print_welcome();

        if let Some(topic) = initial_topic {
            self.start(topic).await;
        } else {
            print_topics();
        }

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let in_workshop = self.workshop.is_open().await;
            let prompt = if in_workshop {
                format!("{} ", "workshop>".bright_magenta())
            } else {
                format!("{} ", ">".bright_green())
            };

            match rl.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    match parse(input, in_workshop) {
                        Ok(command) => {
                            debug!(?command, "ReplSession::run: dispatching");
                            if let SlashResult::Quit = self.handle_command(command, &mut rl).await? {
                                break;
                            }
                        }
                        Err(message) => {
                            println!("{} {}", "?".yellow(), message);
                            println!("Type {} for available commands", "/help".yellow());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "KARA - Guided UI/UX Ideation".bright_cyan().bold());
        if self.canned {
            println!("{}", "No API key configured: answers are canned examples.".yellow());
        }
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    async fn handle_command(&mut self, command: ReplCommand, rl: &mut DefaultEditor) -> Result<SlashResult> {
        match command {
            ReplCommand::Help => {
                let in_workshop = self.workshop.is_open().await;
                print_help(in_workshop);
            }
            ReplCommand::Quit => return Ok(SlashResult::Quit),
            ReplCommand::Topics => print_topics(),
            ReplCommand::Topic(ordinal) => match catalogue::by_ordinal(ordinal) {
                Some(topic) => self.start(topic).await,
                None => println!("{} No topic {}", "?".yellow(), ordinal),
            },
            ReplCommand::Follow(index) => {
                if self.select(index).await {
                    self.advance().await;
                }
            }
            ReplCommand::Select(index) => {
                self.select(index).await;
            }
            ReplCommand::Next => self.advance().await,
            ReplCommand::Show => self.show_conversation().await,
            ReplCommand::Reset => {
                self.engine.reset().await;
                println!("{}", "Conversation cleared.".dimmed());
            }
            ReplCommand::Bookmark => self.bookmark().await,
            ReplCommand::Threads => self.list_threads().await,
            ReplCommand::Research(thread) => self.research(thread).await,
            ReplCommand::Guidance(thread) => self.guidance(thread).await,
            ReplCommand::Workshop { thread, nuance } => self.open_workshop(thread, nuance).await,
            ReplCommand::Doc { thread, nuance } => self.document(thread, nuance).await,
            ReplCommand::Edit(field) => self.edit_field(field, rl).await?,
            ReplCommand::Gen(target) => self.generate(target).await,
            ReplCommand::Fields => self.show_fields().await,
            ReplCommand::SaveWorkshop => match self.workshop.save(&self.store).await {
                Ok(_) => println!("{}", "Workshop saved.".bright_green()),
                Err(e) => print_error(&e),
            },
            ReplCommand::Cancel => {
                self.workshop.close().await;
                println!("{}", "Workshop closed without saving.".dimmed());
            }
        }
        Ok(SlashResult::Continue)
    }

    async fn start(&self, topic: Topic) {
        println!("{}", "KARA is thinking...".dimmed());
        match self.engine.start(topic).await {
            Ok(turn) => print_turn(&turn, 1),
            Err(e) => print_error(&e),
        }
    }

    async fn select(&self, index: usize) -> bool {
        match self.engine.select_choice(index).await {
            Ok(choice) => {
                println!("{} {}", "Selected:".bright_cyan(), choice.title.bold());
                true
            }
            Err(e) => {
                print_error(&e);
                false
            }
        }
    }

    async fn advance(&self) {
        println!("{}", "KARA is thinking...".dimmed());
        match self.engine.advance().await {
            Ok(Some(turn)) => {
                let depth = self.engine.len().await;
                print_turn(&turn, depth);
            }
            Ok(None) => println!("{}", "Select a choice first.".dimmed()),
            Err(e) => {
                print_error(&e);
                println!("Type {} to try again.", "/retry".yellow());
            }
        }
    }

    async fn show_conversation(&self) {
        let turns = self.engine.turns().await;
        if turns.is_empty() {
            println!("{}", "No conversation yet. Pick a topic with /topic N.".dimmed());
            return;
        }
        for (i, turn) in turns.iter().enumerate() {
            print_turn(turn, i + 1);
        }
        if let Some(choice) = self.engine.selected().await {
            println!("{} {}", "Selected:".bright_cyan(), choice.title);
        }
    }

    async fn bookmark(&self) {
        match save_conversation(&self.engine, &self.store).await {
            Ok(title) => {
                println!("{} {}", "Saved thread:".bright_green(), title.bold());
                println!("{}", "Conversation closed. Pick a topic with /topic N.".dimmed());
            }
            Err(e) => print_error(&e),
        }
    }

    async fn list_threads(&self) {
        let threads = self.store.list().await;
        if threads.is_empty() {
            println!("{}", "No saved threads. Use /save during a conversation.".dimmed());
            return;
        }
        println!();
        println!("{}", "Saved Threads:".bright_cyan());
        for (i, thread) in threads.iter().enumerate() {
            let status = if thread.synthesis_in_progress {
                "researching".yellow()
            } else if thread.synthesis.is_some() {
                "researched".bright_green()
            } else {
                "".normal()
            };
            println!(
                "  {:>2}. {} {} {}",
                i + 1,
                thread.original_topic_title.bold(),
                format!("({} turns, {})", thread.turns.len(), thread.id.short()).dimmed(),
                status
            );
        }
        println!();
    }

    /// Thread by 0-based list position
    async fn thread_at(&self, index: usize) -> Option<Thread> {
        let thread = self.store.list().await.into_iter().nth(index);
        if thread.is_none() {
            println!("{} No thread {}", "?".yellow(), index + 1);
        }
        thread
    }

    async fn research(&self, index: usize) {
        let Some(thread) = self.thread_at(index).await else {
            return;
        };
        println!("{}", "KARA is analyzing the thread...".dimmed());
        match self.store.request_synthesis(&thread.id).await {
            Ok(_) => self.guidance(index).await,
            Err(e) => print_error(&e),
        }
    }

    async fn guidance(&self, index: usize) {
        let Some(thread) = self.thread_at(index).await else {
            return;
        };
        let Some(synthesis) = thread.synthesis else {
            println!("No deep research yet. Run {}.", format!("/research {}", index + 1).yellow());
            return;
        };

        println!();
        println!("{}", "Deep Research".bright_cyan().bold());
        println!("{}", synthesis.summary);
        println!();
        for (i, nuance) in synthesis.nuances.iter().enumerate() {
            let marker = if nuance.workshop.is_some() { " [workshop]" } else { "" };
            println!(
                "  {:>2}. {} {}{}",
                i + 1,
                nuance.title.bold(),
                format!("(importance {})", nuance.importance).dimmed(),
                marker.bright_green()
            );
            println!("      {}", nuance.detail);
        }
        println!();
        println!(
            "Open a workshop with {}",
            format!("/workshop {} <nuance>", index + 1).yellow()
        );
    }

    async fn open_workshop(&self, thread_index: usize, nuance_index: usize) {
        let Some(thread) = self.thread_at(thread_index).await else {
            return;
        };
        let Some(synthesis) = thread.synthesis.as_ref() else {
            println!("No deep research yet. Run {}.", format!("/research {}", thread_index + 1).yellow());
            return;
        };
        let Some(nuance) = synthesis.nuances.get(nuance_index) else {
            println!("{} No nuance {}", "?".yellow(), nuance_index + 1);
            return;
        };

        self.workshop.load_nuance(thread.id.clone(), nuance_index, nuance).await;
        println!();
        println!("{} {}", "Workshop:".bright_magenta().bold(), nuance.title.bold());
        println!("{}", nuance.detail.dimmed());
        self.show_fields().await;
        println!(
            "Use {} to write, {} for AI help, {} to store, {} to leave",
            "/edit FIELD".yellow(),
            "/gen FIELD|all".yellow(),
            "/save".yellow(),
            "/cancel".yellow()
        );
    }

    async fn edit_field(&self, field: WorkshopField, rl: &mut DefaultEditor) -> Result<()> {
        println!(
            "Enter {} (end with a line containing only '{}'):",
            field.label().bold(),
            END_OF_INPUT
        );
        let mut lines = Vec::new();
        loop {
            match rl.readline("") {
                Ok(line) if line.trim() == END_OF_INPUT => break,
                Ok(line) => lines.push(line),
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "Edit cancelled.".dimmed());
                    return Ok(());
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(eyre::eyre!("Readline error: {}", err)),
            }
        }
        self.workshop.edit_field(field, lines.join("\n")).await;
        println!("{} updated.", field.label());
        Ok(())
    }

    async fn generate(&self, target: GenTarget) {
        println!("{}", "KARA is writing...".dimmed());
        match target {
            GenTarget::One(field) => {
                if let Err(e) = self.workshop.generate_field(field).await {
                    print_error(&e);
                }
            }
            GenTarget::All => {
                for (field, result) in self.workshop.generate_all().await {
                    if let Err(e) = result {
                        println!("{} {}", format!("{}:", field.label()).red(), e.user_message());
                    }
                }
            }
        }
        self.show_fields().await;
    }

    async fn show_fields(&self) {
        println!();
        for field in WorkshopField::ALL {
            let view = self.workshop.field(field).await;
            let status = match view.status {
                FieldStatus::Generating => " (generating)".yellow(),
                FieldStatus::Idle => "".normal(),
            };
            println!("{}{}", field.label().bright_cyan(), status);
            if view.text.trim().is_empty() {
                println!("  {}", "(empty)".dimmed());
            } else {
                for line in view.text.lines() {
                    println!("  {}", line);
                }
            }
            if let Some(error) = view.error {
                println!("  {}", error.red());
            }
            println!();
        }
    }

    async fn document(&self, thread_index: usize, nuance_index: Option<usize>) {
        let Some(thread) = self.thread_at(thread_index).await else {
            return;
        };
        match nuance_index {
            None => println!("{}", render_thread_document(&thread)),
            Some(i) => match thread.synthesis.as_ref().and_then(|s| s.nuances.get(i)) {
                Some(nuance) => println!("{}", render_nuance_document(nuance)),
                None => println!("{} No nuance {} in thread {}", "?".yellow(), i + 1, thread_index + 1),
            },
        }
    }
}

/// Bookmark the conversation into the store, then close it
///
/// Returns the saved thread's title. The conversation is left untouched on failure.
async fn save_conversation(engine: &ConversationEngine, store: &ThreadStore) -> Result<String, KaraError> {
    let thread = engine.bookmark().await?;
    let title = thread.original_topic_title.clone();
    store.add(thread).await;
    engine.reset().await;
    Ok(title)
}

fn print_topics() {
    println!();
    println!("{}", "Topics:".bright_cyan());
    for topic in catalogue::topics() {
        if let Some(ordinal) = topic.ordinal() {
            println!("  {:>2}. {}", ordinal, topic.title().bold());
        }
    }
    println!();
    println!("Start with {}", "/topic N".yellow());
    println!();
}

fn print_turn(turn: &Turn, depth: usize) {
    println!();
    println!("{} {}", format!("[{}]", depth).dimmed(), turn.topic_title.bright_cyan().bold());
    println!();
    println!("{}", turn.recommendation.text);
    println!();
    for (i, choice) in turn.recommendation.choices.iter().enumerate() {
        println!("  {}. {}", (i + 1).to_string().yellow(), choice.title.bold());
        println!("     {}", choice.description.dimmed());
    }
    println!();
}

fn print_error(error: &KaraError) {
    println!("{} {}", "!".red(), error.user_message().red());
}

fn print_help(in_workshop: bool) {
    println!();
    if in_workshop {
        println!("{}", "Workshop Commands:".bright_cyan());
        println!("  {:20} Replace a field's text", "/edit FIELD".yellow());
        println!("  {:20} Ask KARA to write a field (or all)", "/gen FIELD|all".yellow());
        println!("  {:20} Show all fields", "/show".yellow());
        println!("  {:20} Save to the thread and leave", "/save".yellow());
        println!("  {:20} Leave without saving", "/cancel".yellow());
        println!();
        println!("Fields: keyObjectives (ko), actionSteps (as), successMetrics (sm)");
    } else {
        println!("{}", "Conversation:".bright_cyan());
        println!("  {:20} List topics", "/topics".yellow());
        println!("  {:20} Start a conversation", "/topic N".yellow());
        println!("  {:20} Follow choice N", "N".yellow());
        println!("  {:20} Select choice N without following", "/select N".yellow());
        println!("  {:20} Follow the selected choice (retry)", "/next".yellow());
        println!("  {:20} Show the conversation", "/show".yellow());
        println!("  {:20} Clear the conversation", "/reset".yellow());
        println!("  {:20} Save the conversation as a thread", "/save".yellow());
        println!();
        println!("{}", "Threads:".bright_cyan());
        println!("  {:20} List saved threads", "/threads".yellow());
        println!("  {:20} Run deep research on thread T", "/research T".yellow());
        println!("  {:20} Show deep research of thread T", "/guidance T".yellow());
        println!("  {:20} Plan nuance N of thread T", "/workshop T N".yellow());
        println!("  {:20} Print a thread or nuance document", "/doc T [N]".yellow());
    }
    println!();
    println!("  {:20} Show this help", "/help".yellow());
    println!("  {:20} Exit", "/quit".yellow());
    println!();
}

/// Result of handling a command
enum SlashResult {
    Continue,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::CannedAdvisor;
    use crate::error::PreconditionError;

    #[tokio::test]
    async fn test_save_conversation_closes_it() {
        let advisor = Arc::new(CannedAdvisor::new());
        let engine = ConversationEngine::new(advisor.clone());
        let store = ThreadStore::new(advisor);

        let topic = catalogue::by_ordinal(1).unwrap();
        engine.start(topic.clone()).await.unwrap();

        let title = save_conversation(&engine, &store).await.unwrap();
        assert_eq!(title, topic.title());
        assert!(engine.is_empty().await);
        assert!(engine.origin().await.is_none());

        // A second save has nothing to bookmark
        let err = save_conversation(&engine, &store).await.unwrap_err();
        assert!(matches!(
            err,
            KaraError::Precondition(PreconditionError::EmptyConversation)
        ));
        assert_eq!(store.len().await, 1);
    }
}
