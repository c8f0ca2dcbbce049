//! Interactive simulator: the real dialogue engine over stdin/stdout, no
//! messaging channel involved.

use std::io::{self, BufRead, Write};

use lagobot_core::config::{AppConfig, LoadOptions};

use crate::commands::{build_engine, CommandResult};

const SIMULATOR_USER_ID: &str = "TEST_USER";
const EXIT_WORDS: &[&str] = &["salir", "exit", "adios"];

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure(format!("config error: {error}"), 2),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(format!("failed to initialize async runtime: {error}"), 3)
        }
    };

    println!("=============================================");
    println!("🤖 ASISTENTE DE VENTAS (MODO SIMULADOR)");
    println!("=============================================");
    println!("Escribe 'salir' para terminar.");
    println!("---------------------------------------------");

    if !config.llm_enabled() {
        println!("ℹ️  Tip: configura llm.api_key para activar la IA generativa.");
        println!("   Por ahora responde en modo 'Reglas Básicas'. Prueba 'nevera' o 'lavadora'.");
    }

    let engine = runtime.block_on(build_engine(&config));

    println!("\nBot: ¡Hola! 👋 Bienvenido a {}. ¿Qué estás buscando hoy?\n", config.store.name);

    let stdin = io::stdin();
    loop {
        print!("Tú: ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&input.to_lowercase().as_str()) {
            println!("\nBot: ¡Gracias por visitarnos! 👋");
            break;
        }

        let reply = runtime.block_on(engine.handle_message(SIMULATOR_USER_ID, input));
        println!("Bot: {reply}\n");
    }

    CommandResult::success("")
}
