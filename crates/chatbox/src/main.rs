//! An interactive keyword chat in the terminal.

#[macro_use]
extern crate tracing;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chatbox::core::{ChatBuilder, ChatConfigBuilder};
use chatbox::terminal::terminal;
use chatbox::{FileStore, load_knowledge_base_or_default};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};

const DEFAULT_DATA_DIR: &str = ".chatbox";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let kb_path = env::var_os("CHATBOX_KNOWLEDGE_BASE").map(PathBuf::from);
    let entries = match load_knowledge_base_or_default(kb_path.as_deref()) {
        Ok(entries) => entries,
        Err(err) => {
            if let Some(path) = &kb_path {
                eprintln!("{}: {err}", path.display());
            }
            return;
        }
    };

    let mut config = ChatConfigBuilder::new();
    if let Ok(tick_ms) = env::var("CHATBOX_TICK_MS") {
        let Ok(tick_ms) = tick_ms.parse::<u64>() else {
            eprintln!("CHATBOX_TICK_MS must be a number of milliseconds");
            return;
        };
        config = config.with_tick_interval(Duration::from_millis(tick_ms));
    }
    let config = match config.build() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let data_dir = env::var_os("CHATBOX_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let store = match FileStore::open(&data_dir) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("cannot open the data directory: {err}");
            return;
        }
    };

    println!(
        "{}",
        "Type a message and press enter. /stop interrupts an answer, \
         /clear forgets the conversation, /quit exits."
            .dimmed()
    );

    let (surface, affordances) = terminal();
    let chat = ChatBuilder::new(store, surface, affordances)
        .with_knowledge_base(entries)
        .with_config(config)
        .build();

    let mut lines = io::BufReader::new(io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("error reading input: {}", err);
                break;
            }
        };

        match line.trim() {
            "/stop" => chat.stop(),
            "/clear" => chat.clear(),
            "/quit" => break,
            input => chat.submit(input),
        }
    }
    println!();
}
