use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{error, info};

use laptop_advisor::advisor::{Advisor, Outcome};
use laptop_advisor::catalog::CatalogStore;
use laptop_advisor::config::{AdvisorConfig, ConfigOverrides};
use laptop_advisor::i18n::Messages;
use laptop_advisor::llm::{ChatClient, TextGenerator};
use laptop_advisor::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before logging so the logging section applies too
    let mut config = AdvisorConfig::load().await?;
    ConfigOverrides::apply(&mut config);
    config.validate()?;

    init_logging(&config.logging)?;
    info!("Starting laptop advisor v{}", env!("CARGO_PKG_VERSION"));

    // Missing credential is fatal before the loop starts
    let credential = config.resolve_credential()?;

    let catalog = Arc::new(CatalogStore::load_or_empty(&config.catalog.path));
    info!(
        products = catalog.len(),
        path = %config.catalog.path.display(),
        "catalog loaded"
    );

    let messages = Messages::new(config.resolved_language());
    if catalog.is_empty() {
        println!("{}", messages.t("catalog.empty").yellow());
    }

    let generator: Arc<dyn TextGenerator> = Arc::new(ChatClient::new(&config.llm, credential));
    let mut advisor = Advisor::new(&config, catalog, generator, messages);

    print_banner(advisor.messages());

    let mut editor = DefaultEditor::new()?;
    let prompt = advisor.messages().t("prompt");

    loop {
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);

                match advisor.handle_command(trimmed).await {
                    Outcome::Exit => {
                        println!("{}", advisor.messages().t("exit.goodbye").green());
                        break;
                    }
                    Outcome::Reply(reply) => {
                        println!("\n{reply}\n");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", advisor.messages().t("interrupt.hint").yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", advisor.messages().t("exit.goodbye").green());
                break;
            }
            Err(e) => {
                error!(error = %e, "console read failed");
                let rendered = advisor
                    .messages()
                    .render("error.generic", &[("error", &e.to_string())]);
                eprintln!("{}", rendered.red());
                break;
            }
        }
    }

    info!("Laptop advisor shutting down");
    Ok(())
}

fn print_banner(messages: &Messages) {
    println!("{}", messages.t("banner.title").bright_cyan().bold());
    println!("{}", messages.t("banner.commands_header"));
    println!("{}", messages.t("banner.cmd_search"));
    println!("{}", messages.t("banner.cmd_recommend"));
    println!("{}", messages.t("banner.cmd_prefer"));
    println!("{}", messages.t("banner.cmd_compare"));
    println!("{}", messages.t("banner.cmd_exit"));
    println!();
}
