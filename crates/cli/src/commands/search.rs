use lagobot_core::config::{AppConfig, LoadOptions};
use lagobot_core::Catalog;
use lagobot_inventory::InventoryService;

use crate::commands::CommandResult;

pub fn run(query: &str) -> CommandResult {
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

    let results = runtime.block_on(async {
        let inventory = InventoryService::connect(&config.sheets).await;
        inventory.search(query).await
    });

    if results.is_empty() {
        return CommandResult::success(format!("no products matched `{query}`"));
    }

    let mut lines = vec![format!("{} product(s) matched `{query}`:", results.len())];
    for product in &results {
        let price = product
            .price
            .map(|price| format!("${price}"))
            .unwrap_or_else(|| "price pending".to_string());
        let stock = match product.stock {
            Some(units) if units > 0 => format!("{units} in stock"),
            Some(_) => "out of stock".to_string(),
            None => "stock unknown".to_string(),
        };
        lines.push(format!("  [{}] {} — {} — {}", product.reference, product.name, price, stock));
    }

    CommandResult::success(lines.join("\n"))
}
