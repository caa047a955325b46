use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use passport_application::FlowController;
use passport_core::config::PassportConfig;
use passport_core::flow::FlowStep;
use passport_core::ports::ConsentStore;
use passport_core::reading::ReadingOutcome;
use passport_infrastructure::FileConsentStore;
use passport_interaction::{HttpReadingTransport, ReadingTransport, ResilientReadingClient, RetryPolicy};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use crate::repl::{SessionHelper, parse_slot};

type SessionEditor = Editor<SessionHelper, DefaultHistory>;

const DISCLAIMER: &[(&str, &str)] = &[
    ("免責聲明", "本程式僅供娛樂與自我探索用途，不代表專業醫療或心理建議。"),
    ("隱私提醒", "請勿輸入真實姓名或敏感隱私資訊。"),
    ("AI 說明", "結果由 Gemini AI 生成，請保持批判性思考。"),
];

pub async fn run(
    config: PassportConfig,
    config_path: Option<&Path>,
    local: bool,
    endpoint: Option<String>,
) -> Result<()> {
    let mut rl = SessionEditor::new()?;
    rl.set_helper(Some(SessionHelper));

    let consent = FileConsentStore::new().context("Failed to locate consent file")?;
    if !ensure_consent(&consent, &mut rl)? {
        println!("{}", "下次再見！".bright_green());
        return Ok(());
    }

    let policy = RetryPolicy::from(&config.client);
    if local {
        let service = super::reading_service(&config, config_path)?;
        let client = ResilientReadingClient::new(service, policy);
        session(FlowController::new(client, &config.flow), &mut rl).await
    } else {
        let transport =
            HttpReadingTransport::new(endpoint.unwrap_or_else(|| config.client.endpoint.clone()));
        tracing::info!(endpoint = transport.endpoint(), "using remote reading server");
        let client = ResilientReadingClient::new(transport, policy);
        session(FlowController::new(client, &config.flow), &mut rl).await
    }
}

fn ensure_consent(store: &dyn ConsentStore, rl: &mut SessionEditor) -> Result<bool> {
    if store.has_agreed()? {
        return Ok(true);
    }

    println!("{}", "嘿！在開啟旅程之前...".bright_magenta().bold());
    for (title, body) in DISCLAIMER {
        println!("{} {}", format!("[{title}]").yellow(), body);
    }

    match rl.readline("我已理解並進入 (y/n) ") {
        Ok(answer) if matches!(answer.trim(), "y" | "Y" | "yes") => {
            store.record_agreement()?;
            Ok(true)
        }
        Ok(_) | Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

async fn session<T: ReadingTransport>(
    mut flow: FlowController<T>,
    rl: &mut SessionEditor,
) -> Result<()> {
    println!("{}", "=== 心靈護照 ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/reset' to start over, '/coins' to check coins, or '/quit' to exit.".bright_black()
    );

    loop {
        let step = flow.step();
        if step == FlowStep::Welcome {
            println!("{}", flow.guide_line().bright_blue());
            flow.open_input();
            continue;
        }

        println!("{}", flow.guide_line().bright_blue());
        let prompt = match step {
            FlowStep::Draw => format!("[1-{}] >> ", flow.state().rules().deck_size),
            _ => ">> ".to_string(),
        };

        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        match input {
            "/quit" | "quit" | "exit" => break,
            "/coins" => {
                println!("{}", format!("coins: {}", flow.state().coins()).yellow());
                continue;
            }
            "/reset" => {
                if !flow.reset() {
                    println!("{}", "Nothing to reset yet.".bright_black());
                }
                continue;
            }
            _ => {}
        }

        match step {
            FlowStep::Input => {
                if !flow.submit_question(input) {
                    let max = flow.state().rules().max_question_chars;
                    println!("{}", format!("問題需為 1-{max} 個字").red());
                }
            }
            FlowStep::Draw => {
                let deck_size = flow.state().rules().deck_size;
                let Some(index) = parse_slot(input, deck_size) else {
                    println!("{}", format!("請輸入 1 到 {deck_size} 之間的數字").red());
                    continue;
                };
                println!("{}", "讓我看看星圖怎麼說...".bright_black());
                flow.draw(index).await;
                print_result(&flow);
            }
            FlowStep::Result => {
                println!("{}", "Type '/reset' for another reading.".bright_black());
            }
            FlowStep::Welcome | FlowStep::Loading => {}
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

fn print_result<T: ReadingTransport>(flow: &FlowController<T>) {
    let state = flow.state();
    if let Some(drawn) = state.drawn_card() {
        println!(
            "{}",
            format!("{} / {}", drawn.display_name_ch, drawn.display_name)
                .bright_magenta()
                .bold()
        );
    }

    match state.outcome() {
        Some(ReadingOutcome::Filtered { text }) => println!("{}", text.bright_yellow()),
        Some(outcome) => {
            for line in outcome.text().lines() {
                println!("{}", line.bright_blue());
            }
        }
        None => {}
    }
    println!("{}", format!("mood: {}", flow.mood()).bright_black());
}
