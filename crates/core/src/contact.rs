//! WhatsApp deep links used by the agenda and the public queue page.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::client::Client;

/// Country calling code prepended to every stored number.
pub const COUNTRY_CODE: &str = "55";

/// Pre-filled message on the public page's "join the queue" button.
pub const JOIN_QUEUE_MESSAGE: &str = "Olá! Gostaria de entrar na fila de atendimento.";

/// Characters left as-is when encoding a URI component.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Keep only the digits of a phone number.
pub fn digits(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

/// `https://wa.me/55<number>?text=<message>`, or `None` when the number has no digits.
pub fn whatsapp_link(number: &str, message: &str) -> Option<String> {
    let digits = digits(number);
    if digits.is_empty() {
        return None;
    }
    let text = utf8_percent_encode(message, COMPONENT);
    Some(format!("https://wa.me/{COUNTRY_CODE}{digits}?text={text}"))
}

/// Link that tells a waiting client their turn is near.
pub fn turn_reminder_link(client: &Client) -> Option<String> {
    whatsapp_link(
        &client.whatsapp_number,
        &format!("Olá {}, sua vez está chegando!", client.name),
    )
}

/// Link from the public queue page to the provider's WhatsApp.
pub fn join_queue_link(provider_number: &str) -> Option<String> {
    whatsapp_link(provider_number, JOIN_QUEUE_MESSAGE)
}
