//! Outbound reply texts. Spanish, WhatsApp-flavored markup, emoji included.
//!
//! Everything the user ever sees comes from here or from the generative
//! fallback; keeping the strings together keeps the tone consistent.

use crate::config::StoreConfig;
use crate::domain::product::ProductRecord;

/// Product description recorded when checkout starts without a prior search.
pub const DEFAULT_PRODUCT: &str = "Varios productos";

/// Display cap for search results.
pub const RESULT_DISPLAY_LIMIT: usize = 5;

pub fn checkout_prompt() -> String {
    "🛒 ¡Listo para enviar! Por favor escribe tu *Nombre Completo y Dirección de Envío* \
     en un solo mensaje para generar la orden."
        .to_string()
}

pub fn order_confirmed(store: &StoreConfig) -> String {
    format!(
        "✅ ¡Pedido registrado! Un asesor revisará tu orden y te contactará para el pago \
         y envío. ¡Gracias por elegir {}!",
        store.name
    )
}

pub fn order_failed(store: &StoreConfig) -> String {
    format!(
        "⚠️ Hubo un error registrando tu pedido. Por favor intenta más tarde o llama al {}.",
        store.contact_phone
    )
}

pub fn search_results(results: &[ProductRecord], store: &StoreConfig) -> String {
    let mut reply = "🔍 *Encontré estos productos:*\n\n".to_string();

    for product in results.iter().take(RESULT_DISPLAY_LIMIT) {
        reply.push_str(&format!("📦 *{}*\n   Ref: {}", product.name, product.reference));
        if let Some(price) = product.price {
            reply.push_str(&format!(" | 💵 ${price}"));
        }
        if product.in_stock() {
            reply.push_str(" | ✅ Disponible");
        } else {
            reply.push_str(" | ❌ Agotado");
        }
        reply.push_str("\n\n");
    }

    reply.push_str(&format!(
        "💰 Para comprar escribe *'Comprar'* o llama al {}.",
        store.contact_phone
    ));
    reply
}

pub fn generic_help(store: &StoreConfig) -> String {
    format!(
        "Hola, soy el asistente de {}. ¿En qué puedo ayudarte hoy? Puedes buscar productos \
         como 'nevera', 'lavadora', etc.",
        store.name
    )
}

pub fn welcome(store: &StoreConfig) -> String {
    format!(
        "👋 Hola, bienvenido a {}. Escribe el nombre del electrodoméstico que buscas \
         (ej: 'Lavadora Samsung').",
        store.name
    )
}

/// System instruction for the generative fallback.
pub fn persona_instruction(store: &StoreConfig) -> String {
    format!(
        "Eres un asistente de ventas amable para '{}'. Tu objetivo es vender. \
         Si te preguntan por productos, invítalos a buscar diciendo 'precio de x'. \
         Si quieren comprar, diles que escriban 'comprar'. \
         Sé conciso y usa emojis. El numero de contacto es {}.",
        store.name, store.contact_phone
    )
}
