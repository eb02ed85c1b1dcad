//! WhatsApp contact links
//!
//! Builds the deep link a front end opens to message the other party of a
//! listing. Nothing here touches the network.

use url::form_urlencoded;

const WHATSAPP_BASE: &str = "https://wa.me/";

pub const SERVICE_INQUIRY: &str =
    "Hola {name}, vi tu servicio \"{title}\" en Agrom y me interesa. ¿Podrías darme más información?";

pub const REQUEST_INQUIRY: &str =
    "Hola {name}, vi tu solicitud de \"{service_type}\" en Agrom y me interesa. ¿Podrías darme más información?";

/// Keeps only ASCII digits
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Replaces `{key}` placeholders
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}

/// Percent-encodes like a URI component (spaces become `%20`, not `+`).
fn encode_component(text: &str) -> String {
    // byte_serialize escapes a literal '+' as %2B, so every '+' left is a space
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// `None` when the phone has no digits, which disables the contact action.
pub fn build_contact_link(phone: &str, message: &str) -> Option<String> {
    let digits = normalize_phone(phone);
    if digits.is_empty() {
        return None;
    }
    Some(format!(
        "{}{}?text={}",
        WHATSAPP_BASE,
        digits,
        encode_component(message)
    ))
}

pub fn service_inquiry_link(phone: Option<&str>, contractor_name: &str, title: &str) -> Option<String> {
    let message = render_template(SERVICE_INQUIRY, &[("name", contractor_name), ("title", title)]);
    phone.and_then(|p| build_contact_link(p, &message))
}

pub fn request_inquiry_link(
    phone: Option<&str>,
    producer_name: &str,
    service_type: &str,
) -> Option<String> {
    let message = render_template(
        REQUEST_INQUIRY,
        &[("name", producer_name), ("service_type", service_type)],
    );
    phone.and_then(|p| build_contact_link(p, &message))
}
